//! WeChat 인증 응답 모델
//!
//! - [`wechat_token`] - 사용자 액세스 토큰 (`/sns/oauth2/access_token`, `/sns/oauth2/refresh_token`)
//! - [`wechat_user`] - 사용자 프로필 (`/sns/userinfo`)

pub mod wechat_token;
pub mod wechat_user;

pub use wechat_token::*;
pub use wechat_user::*;
