//! WeChat 웹 인증 서비스 모듈
//!
//! # Features
//!
//! - 인증 리다이렉트 URL 생성
//! - 인증 코드 → 사용자 액세스 토큰 교환, 토큰 갱신
//! - 사용자 정보 조회, 토큰 유효성 검증
//! - 서명된 OAuth state 발급/검증
//!
//! # Examples
//!
//! ```rust,ignore
//! use wechat_oauth::services::oauth::{OAuthState, WechatOAuthService};
//!
//! let service = WechatOAuthService::from_env()?;
//! let state = OAuthState::from_env()?.issue();
//! let url = service.authorization_url(Scope::Base, &redirect_uri, &state)?;
//! ```

pub mod component;
pub mod state_service;
pub mod wechat_oauth_service;

pub use component::*;
pub use state_service::*;
pub use wechat_oauth_service::*;
