//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! - [`oauth`] - WeChat 웹 인증 플로우

pub mod oauth;
