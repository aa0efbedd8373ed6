//! # Domain Layer
//!
//! WeChat 웹 인증에서 주고받는 값들의 타입을 정의합니다.
//!
//! - [`constants`] - 엔드포인트, 범위, grant type, 언어, 운영 모드
//! - [`models`] - 토큰과 사용자 정보 응답 모델

pub mod constants;
pub mod models;
