//! # Core Infrastructure
//!
//! WeChat API 호출에 쓰이는 전송 계층과 응답 해석을 제공합니다.
//!
//! - [`http_client`] - 쿼리 파라미터 GET 요청, `errcode` 봉투 검사

pub mod http_client;

pub use http_client::*;
