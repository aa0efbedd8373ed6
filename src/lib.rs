//! WeChat 웹 인증 클라이언트
//!
//! WeChat 웹 인증(网页授权) 플로우를 위한 Rust 클라이언트입니다.
//! 공식계정 플랫폼 자격 증명을 직접 사용하는 모드와 제3자 플랫폼 컴포넌트가
//! 위임받아 인증하는 모드를 모두 지원합니다.
//!
//! # Features
//!
//! - **인증 URL 생성**: `snsapi_base` / `snsapi_userinfo` 범위의 리다이렉트 URL
//! - **토큰 발급/갱신**: 인증 코드 교환, 리프레시 토큰 갱신
//! - **사용자 정보**: 닉네임, 지역, 프로필 사진 조회
//! - **토큰 검증**: 사용자 액세스 토큰 유효성 확인
//! - **OAuth state**: CSRF 방지용 서명된 state 발급/검증
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ WechatOAuthService  │ ← 모드별 파라미터 구성
//! └─────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────┐
//! │   QueryTransport    │ ← GET 요청 (reqwest)
//! └─────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────┐
//! │   decode_response   │ ← errcode 검사, 역직렬화
//! └─────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use wechat_oauth::domain::constants::{Lang, Scope};
//! use wechat_oauth::services::oauth::WechatOAuthService;
//!
//! let service = WechatOAuthService::direct("wx123", "app-secret");
//! let url = service.authorization_url(Scope::UserInfo, "https://example.com/cb", "xyz")?;
//!
//! // 콜백에서
//! let token = service.grant_token(&code, Duration::from_secs(5)).await?;
//! let info = service
//!     .fetch_user_info(&token.open_id, &token.access_token, Lang::ZhCn, Duration::from_secs(5))
//!     .await?;
//! ```

pub mod core;
pub mod config;
pub mod domain;
pub mod services;
pub mod utils;
pub mod errors;
