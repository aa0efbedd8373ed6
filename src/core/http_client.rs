//! # WeChat API 조회 클라이언트
//!
//! WeChat 인증 API는 모두 쿼리 파라미터를 사용하는 GET 요청이며,
//! 실패 시에도 HTTP 200과 함께 `{"errcode": N, "errmsg": "..."}` 형태의 본문을 돌려줍니다.
//!
//! 이 모듈은 두 부분으로 나뉩니다.
//!
//! - [`QueryTransport`]: 엔드포인트, 순서가 있는 파라미터, 타임아웃을 받아 응답 본문을 반환
//! - [`decode_response`]: 본문의 `errcode`를 검사한 뒤 대상 타입으로 역직렬화
//!
//! 기본 구현인 [`HttpQueryClient`]는 `reqwest`를 사용하며, 테스트에서는
//! 호출 기록을 남기는 스텁 구현으로 대체합니다.
//!
//! ```text
//! WechatOAuthService ──► QueryTransport::get ──► WeChat API
//!         │                     │
//!         │◄──── 응답 본문 ──────┘
//!         ▼
//!  decode_response::<T>  ── errcode != 0 ──► WxError::Provider
//! ```

use std::time::Duration;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use crate::errors::{WxError, WxResult};

/// 프로세스 전체에서 공유하는 HTTP 커넥션 풀
static SHARED_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// 순서가 있는 쿼리 파라미터
///
/// 삽입 순서가 곧 URL 상의 파라미터 순서입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    pub key: &'static str,
    pub value: String,
}

impl QueryParameter {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// 파라미터 목록에서 키에 해당하는 값을 찾습니다.
#[cfg(test)]
pub(crate) fn find_parameter<'a>(parameters: &'a [QueryParameter], key: &str) -> Option<&'a str> {
    parameters
        .iter()
        .find(|p| p.key == key)
        .map(|p| p.value.as_str())
}

/// 파라미터를 `key=value&...` 형태로 이어 붙입니다.
///
/// 값은 인코딩하지 않으므로, 인코딩이 필요한 값은 호출자가 미리 처리해야 합니다.
pub fn join_parameters(parameters: &[QueryParameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{}={}", p.key, p.value))
        .collect::<Vec<_>>()
        .join("&")
}

/// GET 요청을 수행하는 전송 계층
///
/// 네트워크 실패, 타임아웃, 2xx 이외의 응답은 모두 `WxError::Transport`로 반환해야 합니다.
/// 구현체는 주어진 타임아웃보다 오래 블로킹해서는 안 됩니다.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn get(
        &self,
        endpoint: &str,
        parameters: &[QueryParameter],
        timeout: Duration,
    ) -> WxResult<String>;
}

/// `reqwest` 기반 기본 전송 계층
#[derive(Debug, Clone)]
pub struct HttpQueryClient {
    client: reqwest::Client,
}

impl HttpQueryClient {
    /// 공유 커넥션 풀을 사용하는 클라이언트를 생성합니다.
    pub fn new() -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
        }
    }

    /// 프록시, TLS 등 별도 설정이 적용된 `reqwest::Client`를 사용합니다.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpQueryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryTransport for HttpQueryClient {
    async fn get(
        &self,
        endpoint: &str,
        parameters: &[QueryParameter],
        timeout: Duration,
    ) -> WxResult<String> {
        let query: Vec<(&str, &str)> = parameters
            .iter()
            .map(|p| (p.key, p.value.as_str()))
            .collect();

        log::debug!("WeChat API 요청: GET {}", endpoint);

        let response = self
            .client
            .get(endpoint)
            .query(&query)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WxError::Transport(format!(
                "{} 응답 ({}): {}", endpoint, status, error_text
            )));
        }

        Ok(response.text().await?)
    }
}

/// WeChat 공통 에러 봉투
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// 응답 본문의 `errcode`를 검사합니다.
///
/// `errcode`가 없거나 0이면 성공으로 간주합니다.
///
/// # Errors
///
/// * `WxError::Provider` - `errcode`가 0이 아닌 경우
/// * `WxError::Decode` - 본문이 JSON 객체가 아닌 경우
pub fn check_envelope(body: &str) -> WxResult<()> {
    let envelope: ErrorEnvelope = serde_json::from_str(body)?;

    if envelope.errcode != 0 {
        return Err(WxError::Provider {
            code: envelope.errcode,
            message: envelope.errmsg,
        });
    }

    Ok(())
}

/// 응답 본문을 검사한 뒤 대상 타입으로 역직렬화합니다.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> WxResult<T> {
    check_envelope(body)?;
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        openid: String,
    }

    #[test]
    fn test_decode_success_body() {
        let sample: Sample = decode_response(r#"{"openid":"OPENID"}"#).unwrap();
        assert_eq!(sample.openid, "OPENID");
    }

    #[test]
    fn test_decode_zero_errcode_envelope() {
        assert!(check_envelope(r#"{"errcode":0,"errmsg":"ok"}"#).is_ok());
    }

    #[test]
    fn test_decode_provider_error() {
        let result: WxResult<Sample> =
            decode_response(r#"{"errcode":40029,"errmsg":"invalid code"}"#);

        match result {
            Err(WxError::Provider { code, message }) => {
                assert_eq!(code, 40029);
                assert_eq!(message, "invalid code");
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed_body() {
        let result: WxResult<Sample> = decode_response("<html>bad gateway</html>");
        assert!(matches!(result, Err(WxError::Decode(_))));

        let missing_field: WxResult<Sample> = decode_response(r#"{"nickname":"x"}"#);
        assert!(matches!(missing_field, Err(WxError::Decode(_))));
    }

    #[actix_web::test]
    async fn test_http_query_client_against_local_server() {
        use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

        let server = HttpServer::new(|| {
            App::new()
                .route("/echo", web::get().to(|req: HttpRequest| async move {
                    HttpResponse::Ok().body(req.query_string().to_string())
                }))
                .route("/busy", web::get().to(|| async {
                    HttpResponse::ServiceUnavailable().body("busy")
                }))
                .route("/slow", web::get().to(|| async {
                    actix_web::rt::time::sleep(Duration::from_millis(500)).await;
                    HttpResponse::Ok().body("{}")
                }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let base = format!("http://{}", server.addrs()[0]);
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let client = HttpQueryClient::with_client(reqwest::Client::new());
        let parameters = vec![
            QueryParameter::new("appid", "wx123"),
            QueryParameter::new("openid", "OPENID"),
            QueryParameter::new("lang", "zh_CN"),
        ];

        // 파라미터 순서 유지
        let body = client
            .get(&format!("{}/echo", base), &parameters, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(body, "appid=wx123&openid=OPENID&lang=zh_CN");

        // 2xx 이외의 응답
        let busy = client
            .get(&format!("{}/busy", base), &parameters, Duration::from_secs(2))
            .await;
        assert!(matches!(busy, Err(WxError::Transport(ref msg)) if msg.contains("503")));

        // 타임아웃
        let slow = client
            .get(&format!("{}/slow", base), &parameters, Duration::from_millis(100))
            .await;
        assert!(matches!(slow, Err(WxError::Transport(_))));

        handle.stop(false).await;
    }

    #[test]
    fn test_parameter_helpers() {
        let parameters = vec![
            QueryParameter::new("appid", "wx123"),
            QueryParameter::new("response_type", "code"),
        ];

        assert_eq!(join_parameters(&parameters), "appid=wx123&response_type=code");
        assert_eq!(find_parameter(&parameters, "appid"), Some("wx123"));
        assert_eq!(find_parameter(&parameters, "secret"), None);
    }
}
