//! # Configuration Module
//!
//! 환경 변수 기반 설정을 중앙에서 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`environment`] - 실행 환경 감지와 `.env` 파일 로딩
//! - [`wechat_config`] - WeChat 앱 자격 증명, 모드, 타임아웃
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use wechat_oauth::config::{load_env_file, WechatConfig};
//!
//! load_env_file();
//! let app_id = WechatConfig::app_id()?;
//! let timeout = WechatConfig::request_timeout()?;
//! ```

pub mod environment;
pub mod wechat_config;

pub use environment::*;
pub use wechat_config::*;
