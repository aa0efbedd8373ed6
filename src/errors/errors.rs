//! WeChat 인증 클라이언트 전역 에러 시스템
//!
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다. 모든 연산은 에러를 호출자에게 그대로 돌려주며,
//! 내부에서 재시도하거나 삼키지 않습니다.
//!
//! ## 에러 분류
//!
//! | WxError | 네트워크 호출 여부 | HTTP 응답 |
//! |---------|-------------------|-----------|
//! | `InvalidParameter` | 호출 전 실패 | 400 Bad Request |
//! | `Transport` | 호출 후 실패 | 502 Bad Gateway |
//! | `Provider` | 호출 후 실패 (errcode != 0) | 502 Bad Gateway |
//! | `Decode` | 호출 후 실패 | 500 Internal Server Error |
//! | `Config` | 호출 전 실패 | 500 Internal Server Error |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use wechat_oauth::errors::WxError;
//!
//! match service.fetch_user_info_with_lang_code(&open_id, &token, "ko", timeout).await {
//!     Err(WxError::InvalidParameter(name)) => log::warn!("잘못된 파라미터: {}", name),
//!     Err(e) => log::error!("사용자 정보 조회 실패: {}", e),
//!     Ok(info) => println!("{}", info.nickname),
//! }
//! ```

use thiserror::Error;

/// WeChat 인증 클라이언트 에러 타입
#[derive(Error, Debug)]
pub enum WxError {
    /// 호출자가 잘못된 파라미터를 전달한 경우
    ///
    /// 네트워크 호출 전에 감지되며, 잘못된 파라미터 이름을 담습니다.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// 네트워크 실패, 타임아웃, 2xx 이외의 응답
    #[error("Transport error: {0}")]
    Transport(String),

    /// WeChat 서버가 0이 아닌 `errcode`를 반환한 경우
    #[error("WeChat error {code}: {message}")]
    Provider {
        /// 공급자 에러 코드 (`errcode`)
        code: i64,
        /// 공급자 에러 메시지 (`errmsg`)
        message: String,
    },

    /// 응답 본문을 대상 타입으로 해석할 수 없는 경우
    #[error("Decode error: {0}")]
    Decode(String),

    /// 환경 설정 누락 또는 잘못된 값
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WxError {
    /// 네트워크 호출 전에 감지된 파라미터 검증 에러인지 확인합니다.
    pub fn is_validation(&self) -> bool {
        matches!(self, WxError::InvalidParameter(_))
    }

    /// WeChat 서버가 보고한 에러 코드를 반환합니다.
    pub fn provider_code(&self) -> Option<i64> {
        match self {
            WxError::Provider { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WxError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WxError::Transport(format!("요청 시간 초과: {}", e))
        } else if e.is_decode() {
            WxError::Decode(e.to_string())
        } else {
            WxError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for WxError {
    fn from(e: serde_json::Error) -> Self {
        WxError::Decode(e.to_string())
    }
}

impl actix_web::ResponseError for WxError {
    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 호스트 애플리케이션의 actix 핸들러가 `WxError`를 그대로 반환할 수 있도록
    /// 각 에러 타입을 적절한 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string(),
                "errcode": self.provider_code(),
            }))
    }

    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            WxError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            WxError::Transport(_) | WxError::Provider { .. } => StatusCode::BAD_GATEWAY,
            WxError::Decode(_) | WxError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type WxResult<T> = Result<T, WxError>;

/// 외부 라이브러리 에러를 WxError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 설정 에러로 변환합니다.
    fn config_context(self, msg: &str) -> WxResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn config_context(self, msg: &str) -> WxResult<T> {
        self.map_err(|e| WxError::Config(format!("{}: {}", msg, e)))
    }
}
