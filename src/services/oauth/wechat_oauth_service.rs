//! # WeChat 웹 인증 서비스
//!
//! WeChat 웹 인증(OAuth 2.0 유사 플로우)의 클라이언트 측 바인딩입니다.
//! 인증 리다이렉트 URL 생성, 인증 코드 교환, 토큰 갱신, 사용자 정보 조회,
//! 토큰 유효성 검증을 제공합니다.
//!
//! ## 인증 플로우
//!
//! ```text
//! ┌──────────────┐          ┌──────────────────┐          ┌──────────────┐
//! │   사용자      │          │ 호스트 애플리케이션 │          │  WeChat API  │
//! └──────────────┘          └──────────────────┘          └──────────────┘
//!        │ 1. 로그인 요청                │                            │
//!        ├─────────────────────────────►│                            │
//!        │ 2. authorization_url 로 302   │                            │
//!        │◄─────────────────────────────┤                            │
//!        │ 3. 동의 후 redirect_uri?code=CODE&state=STATE              │
//!        ├─────────────────────────────►│                            │
//!        │                              │ 4. grant_token(code)       │
//!        │                              ├───────────────────────────►│
//!        │                              │    UserAccessToken         │
//!        │                              │◄───────────────────────────┤
//!        │                              │ 5. fetch_user_info /       │
//!        │                              │    verify_token /          │
//!        │                              │    refresh_token (반복)     │
//!        │                              ├───────────────────────────►│
//! ```
//!
//! 서비스는 불변 설정만 가지므로 여러 작업에서 동시에 호출해도 안전합니다.
//! 재시도, 백오프, 캐싱은 하지 않으며 모든 에러는 호출자에게 그대로 반환됩니다.
//!
//! ## 운영 모드
//!
//! | 모드 | 토큰 교환 자격 증명 | 추가 파라미터 |
//! |------|--------------------|---------------|
//! | [`OAuthMode::Direct`] | `appid` + `secret` | 없음 |
//! | [`OAuthMode::Delegated`] | `appid` + 컴포넌트 토큰 | `component_appid`, `component_access_token` |

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use serde::de::DeserializeOwned;
use crate::config::{WechatConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::core::http_client::{
    check_envelope, decode_response, join_parameters, HttpQueryClient, QueryParameter,
    QueryTransport,
};
use crate::domain::constants::{
    GrantType, Lang, OAuthModeKind, Scope, ACCESS_TOKEN_URL, AUTHORIZE_URL, REDIRECT_FRAGMENT,
    REFRESH_TOKEN_URL, USER_INFO_URL, VERIFY_TOKEN_URL,
};
use crate::domain::models::oauth::{UserAccessToken, UserInfo};
use crate::errors::{WxError, WxResult};
use crate::services::oauth::component::ComponentCredentialProvider;
use crate::utils::string_utils::require_non_blank;

/// 인증 운영 모드와 모드별 자격 증명
///
/// 모드마다 필요한 필드만 가지므로, 직접 모드에 컴포넌트 파라미터가 섞이는 것과 같은
/// 잘못된 조합은 표현할 수 없습니다.
#[derive(Clone)]
pub enum OAuthMode {
    /// 공식계정 플랫폼 자격 증명을 직접 사용
    Direct {
        secret: String,
    },
    /// 제3자 플랫폼 컴포넌트가 공식계정을 대신하여 인증
    Delegated {
        component_app_id: String,
        credentials: Arc<dyn ComponentCredentialProvider>,
    },
}

impl OAuthMode {
    pub fn kind(&self) -> OAuthModeKind {
        match self {
            OAuthMode::Direct { .. } => OAuthModeKind::Mp,
            OAuthMode::Delegated { .. } => OAuthModeKind::Component,
        }
    }
}

impl fmt::Debug for OAuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthMode::Direct { .. } => f
                .debug_struct("Direct")
                .field("secret", &"***")
                .finish(),
            OAuthMode::Delegated { component_app_id, .. } => f
                .debug_struct("Delegated")
                .field("component_app_id", component_app_id)
                .finish_non_exhaustive(),
        }
    }
}

/// WeChat 웹 인증 클라이언트
///
/// ## 사용 예제
///
/// ```rust,ignore
/// use wechat_oauth::domain::constants::{Lang, Scope};
/// use wechat_oauth::services::oauth::WechatOAuthService;
///
/// let service = WechatOAuthService::from_env()?;
/// let timeout = service.default_timeout();
///
/// // 1. 사용자를 인증 페이지로 보냄
/// let url = service.authorization_url(Scope::UserInfo, "https://example.com/cb", &state)?;
///
/// // 2. 콜백에서 받은 코드로 토큰 발급
/// let token = service.grant_token(&code, timeout).await?;
///
/// // 3. 사용자 정보 조회
/// let info = service.fetch_user_info(&token.open_id, &token.access_token, Lang::ZhCn, timeout).await?;
/// ```
#[derive(Clone)]
pub struct WechatOAuthService {
    app_id: String,
    mode: OAuthMode,
    transport: Arc<dyn QueryTransport>,
    default_timeout: Duration,
}

impl WechatOAuthService {
    /// 기본 HTTP 전송 계층을 사용하는 서비스를 생성합니다.
    pub fn new(app_id: impl Into<String>, mode: OAuthMode) -> Self {
        Self {
            app_id: app_id.into(),
            mode,
            transport: Arc::new(HttpQueryClient::new()),
            default_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// 공식계정 플랫폼 직접 모드
    pub fn direct(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(app_id, OAuthMode::Direct { secret: secret.into() })
    }

    /// 제3자 플랫폼 컴포넌트 위임 모드
    pub fn delegated(
        app_id: impl Into<String>,
        component_app_id: impl Into<String>,
        credentials: Arc<dyn ComponentCredentialProvider>,
    ) -> Self {
        Self::new(
            app_id,
            OAuthMode::Delegated {
                component_app_id: component_app_id.into(),
                credentials,
            },
        )
    }

    /// 전송 계층을 교체합니다. 프록시가 필요한 환경이나 테스트에서 사용합니다.
    pub fn with_transport(mut self, transport: Arc<dyn QueryTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// 호출자가 작업에 넘길 기본 타임아웃을 지정합니다.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// 환경 변수로 직접 모드 서비스를 생성합니다.
    ///
    /// 기본 타임아웃은 `WECHAT_REQUEST_TIMEOUT_SECS`에서 읽습니다.
    ///
    /// # Errors
    ///
    /// * `WxError::Config` - `WECHAT_APP_ID`, `WECHAT_APP_SECRET` 누락,
    ///   잘못된 타임아웃, 또는 `WECHAT_OAUTH_MODE`가 `component`인 경우
    pub fn from_env() -> WxResult<Self> {
        match WechatConfig::mode()? {
            OAuthModeKind::Mp => Ok(Self::direct(
                WechatConfig::app_id()?,
                WechatConfig::app_secret()?,
            )
            .with_default_timeout(WechatConfig::request_timeout()?)),
            OAuthModeKind::Component => Err(WxError::Config(
                "WECHAT_OAUTH_MODE=component requires a component credential provider".to_string(),
            )),
        }
    }

    /// 환경 변수와 주입된 자격 증명 제공자로 컴포넌트 모드 서비스를 생성합니다.
    pub fn delegated_from_env(credentials: Arc<dyn ComponentCredentialProvider>) -> WxResult<Self> {
        Ok(Self::delegated(
            WechatConfig::app_id()?,
            WechatConfig::component_app_id()?,
            credentials,
        )
        .with_default_timeout(WechatConfig::request_timeout()?))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn mode(&self) -> &OAuthMode {
        &self.mode
    }

    /// 설정된 기본 요청 타임아웃. 각 작업은 여전히 타임아웃을 직접 받습니다.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// 사용자 인증 페이지로 이동할 URL을 생성합니다.
    ///
    /// `redirect_uri`는 퍼센트 인코딩되며 `state`는 그대로 전달됩니다.
    /// 컴포넌트 모드에서만 `component_appid`가 추가됩니다.
    ///
    /// # 생성 예시
    ///
    /// ```text
    /// https://open.weixin.qq.com/connect/oauth2/authorize?appid=wx123
    ///     &redirect_uri=https%3A%2F%2Fexample.com%2Fcb&response_type=code
    ///     &scope=snsapi_base&state=xyz#wechat_redirect
    /// ```
    ///
    /// # Errors
    ///
    /// * `WxError::InvalidParameter("redirect_uri")` - 빈 redirect_uri
    pub fn authorization_url(&self, scope: Scope, redirect_uri: &str, state: &str) -> WxResult<String> {
        let redirect_uri = require_non_blank(redirect_uri, "redirect_uri")?;

        let mut parameters = vec![
            QueryParameter::new("appid", self.app_id.as_str()),
            QueryParameter::new("redirect_uri", urlencoding::encode(redirect_uri)),
            QueryParameter::new("response_type", "code"),
            QueryParameter::new("scope", scope.as_str()),
            QueryParameter::new("state", state),
        ];
        match &self.mode {
            OAuthMode::Direct { .. } => {}
            OAuthMode::Delegated { component_app_id, .. } => {
                parameters.push(QueryParameter::new("component_appid", component_app_id.as_str()));
            }
        }

        let url = format!("{}?{}{}", AUTHORIZE_URL, join_parameters(&parameters), REDIRECT_FRAGMENT);
        log::debug!("인증 이동 URL 생성: {}", url);

        Ok(url)
    }

    /// 인증 코드로 사용자 액세스 토큰을 발급받습니다.
    ///
    /// 인증 코드는 1회용이며 5분 안에 사용해야 합니다. 실패 시 재시도하지 않습니다.
    ///
    /// # 요청 파라미터
    ///
    /// - 직접 모드: `appid`, `secret`, `code`, `grant_type=authorization_code`
    /// - 컴포넌트 모드: `appid`, `code`, `grant_type=authorization_code`,
    ///   `component_appid`, `component_access_token`
    ///
    /// # Errors
    ///
    /// * `WxError::InvalidParameter("code")` - 빈 코드 (네트워크 호출 없음)
    /// * `WxError::Provider` - 만료되었거나 이미 사용된 코드 (예: 40029, 40163)
    /// * `WxError::Transport` - 네트워크 실패 또는 타임아웃
    pub async fn grant_token(&self, code: &str, timeout: Duration) -> WxResult<UserAccessToken> {
        let code = require_non_blank(code, "code")?;
        log::debug!("인증 코드 교환: {}", code);

        let parameters = match &self.mode {
            OAuthMode::Direct { secret } => vec![
                QueryParameter::new("appid", self.app_id.as_str()),
                QueryParameter::new("secret", secret.as_str()),
                QueryParameter::new("code", code),
                QueryParameter::new("grant_type", GrantType::AuthorizationCode.as_str()),
            ],
            OAuthMode::Delegated { component_app_id, credentials } => vec![
                QueryParameter::new("appid", self.app_id.as_str()),
                QueryParameter::new("code", code),
                QueryParameter::new("grant_type", GrantType::AuthorizationCode.as_str()),
                QueryParameter::new("component_appid", component_app_id.as_str()),
                QueryParameter::new(
                    "component_access_token",
                    component_token(credentials.as_ref()).await?,
                ),
            ],
        };

        self.query(ACCESS_TOKEN_URL, &parameters, timeout)
            .await
            .inspect_err(|e| log::error!("인증 코드 교환 실패: {}", e))
    }

    /// 리프레시 토큰으로 사용자 액세스 토큰을 갱신합니다.
    ///
    /// 직접 모드에서도 `secret`은 필요하지 않습니다.
    pub async fn refresh_token(&self, refresh_token: &str, timeout: Duration) -> WxResult<UserAccessToken> {
        let refresh_token = require_non_blank(refresh_token, "refresh_token")?;

        let parameters = match &self.mode {
            OAuthMode::Direct { .. } => vec![
                QueryParameter::new("appid", self.app_id.as_str()),
                QueryParameter::new("grant_type", GrantType::RefreshToken.as_str()),
                QueryParameter::new("refresh_token", refresh_token),
            ],
            OAuthMode::Delegated { component_app_id, credentials } => vec![
                QueryParameter::new("appid", self.app_id.as_str()),
                QueryParameter::new("grant_type", GrantType::RefreshToken.as_str()),
                QueryParameter::new("refresh_token", refresh_token),
                QueryParameter::new("component_appid", component_app_id.as_str()),
                QueryParameter::new(
                    "component_access_token",
                    component_token(credentials.as_ref()).await?,
                ),
            ],
        };

        self.query(REFRESH_TOKEN_URL, &parameters, timeout)
            .await
            .inspect_err(|e| log::error!("토큰 갱신 실패: {}", e))
    }

    /// 인증된 사용자의 프로필을 조회합니다.
    ///
    /// `access_token`은 사용자 액세스 토큰이며, 공식계정이나 컴포넌트의 토큰이 아닙니다.
    pub async fn fetch_user_info(
        &self,
        open_id: &str,
        access_token: &str,
        lang: Lang,
        timeout: Duration,
    ) -> WxResult<UserInfo> {
        let open_id = require_non_blank(open_id, "openid")?;
        let access_token = require_non_blank(access_token, "access_token")?;

        let parameters = [
            QueryParameter::new("access_token", access_token),
            QueryParameter::new("openid", open_id),
            QueryParameter::new("lang", lang.as_str()),
        ];

        self.query(USER_INFO_URL, &parameters, timeout)
            .await
            .inspect_err(|e| log::error!("사용자 정보 조회 실패: {}", e))
    }

    /// 문자열 언어 코드를 받는 [`fetch_user_info`](Self::fetch_user_info)
    ///
    /// 빈 문자열은 `zh_CN`으로 처리합니다.
    ///
    /// # Errors
    ///
    /// * `WxError::InvalidParameter("lang")` - 지원하지 않는 언어 코드 (네트워크 호출 없음)
    pub async fn fetch_user_info_with_lang_code(
        &self,
        open_id: &str,
        access_token: &str,
        lang: &str,
        timeout: Duration,
    ) -> WxResult<UserInfo> {
        let lang = Lang::parse(lang)?;
        self.fetch_user_info(open_id, access_token, lang, timeout).await
    }

    /// 사용자 액세스 토큰이 유효한지 검증합니다.
    ///
    /// 응답에는 `errcode`/`errmsg` 외에 의미 있는 데이터가 없으므로 성공 여부만 반환합니다.
    /// 성공하면 `Ok(true)`, 실패하면 원인 에러를 반환합니다.
    pub async fn verify_token(&self, open_id: &str, access_token: &str, timeout: Duration) -> WxResult<bool> {
        let open_id = require_non_blank(open_id, "openid")?;
        let access_token = require_non_blank(access_token, "access_token")?;

        let parameters = [
            QueryParameter::new("access_token", access_token),
            QueryParameter::new("openid", open_id),
        ];

        let body = self
            .transport
            .get(VERIFY_TOKEN_URL, &parameters, timeout)
            .await
            .inspect_err(|e| log::error!("사용자 액세스 토큰 검증 실패: {}", e))?;

        check_envelope(&body)
            .inspect_err(|e| log::warn!("사용자 액세스 토큰 검증 실패: {}", e))?;

        Ok(true)
    }

    /// [`verify_token`](Self::verify_token)의 결과를 `bool`로만 받습니다.
    ///
    /// 에러 원인은 로그로만 남습니다.
    pub async fn is_token_valid(&self, open_id: &str, access_token: &str, timeout: Duration) -> bool {
        self.verify_token(open_id, access_token, timeout)
            .await
            .unwrap_or(false)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        parameters: &[QueryParameter],
        timeout: Duration,
    ) -> WxResult<T> {
        let body = self.transport.get(endpoint, parameters, timeout).await?;
        decode_response(&body)
    }
}

impl fmt::Debug for WechatOAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WechatOAuthService")
            .field("app_id", &self.app_id)
            .field("mode", &self.mode)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

async fn component_token(credentials: &dyn ComponentCredentialProvider) -> WxResult<String> {
    credentials
        .component_access_token()
        .await
        .inspect_err(|e| log::error!("컴포넌트 액세스 토큰 조회 실패: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use crate::core::http_client::find_parameter;
    use crate::services::oauth::component::FixedComponentToken;

    const TIMEOUT: Duration = Duration::from_secs(3);

    const TOKEN_BODY: &str = r#"{
        "access_token": "USER_ACCESS_TOKEN",
        "expires_in": 7200,
        "refresh_token": "USER_REFRESH_TOKEN",
        "openid": "OPENID",
        "scope": "snsapi_userinfo"
    }"#;

    const USER_INFO_BODY: &str = r#"{
        "openid": "OPENID",
        "nickname": "NICKNAME",
        "sex": 2,
        "province": "PROVINCE",
        "city": "CITY",
        "country": "COUNTRY",
        "headimgurl": "https://thirdwx.qlogo.cn/mmopen/abc/46",
        "privilege": []
    }"#;

    #[derive(Debug, Clone)]
    struct RecordedCall {
        endpoint: String,
        parameters: Vec<QueryParameter>,
        timeout: Duration,
    }

    /// 고정된 응답을 돌려주고 호출을 기록하는 전송 계층
    struct StubTransport {
        response: Result<String, String>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl StubTransport {
        fn responding(body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(body.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        fn last_call(&self) -> RecordedCall {
            self.calls().pop().expect("no request recorded")
        }
    }

    #[async_trait]
    impl QueryTransport for StubTransport {
        async fn get(
            &self,
            endpoint: &str,
            parameters: &[QueryParameter],
            timeout: Duration,
        ) -> WxResult<String> {
            self.calls.lock().unwrap().push(RecordedCall {
                endpoint: endpoint.to_string(),
                parameters: parameters.to_vec(),
                timeout,
            });

            self.response
                .clone()
                .map_err(WxError::Transport)
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ComponentCredentialProvider for FailingProvider {
        async fn component_access_token(&self) -> WxResult<String> {
            Err(WxError::Transport("component token unavailable".to_string()))
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn direct_service(stub: &Arc<StubTransport>) -> WechatOAuthService {
        let transport: Arc<dyn QueryTransport> = stub.clone();
        WechatOAuthService::direct("wx123", "app-secret").with_transport(transport)
    }

    fn delegated_service(stub: &Arc<StubTransport>) -> WechatOAuthService {
        let transport: Arc<dyn QueryTransport> = stub.clone();
        WechatOAuthService::delegated(
            "wx123",
            "wxcomponent",
            Arc::new(FixedComponentToken::new("COMPONENT_TOKEN")),
        )
        .with_transport(transport)
    }

    fn keys(parameters: &[QueryParameter]) -> Vec<&'static str> {
        parameters.iter().map(|p| p.key).collect()
    }

    #[test]
    fn test_authorization_url_direct() {
        let service = direct_service(&StubTransport::responding("{}"));

        let url = service
            .authorization_url(Scope::Base, "https://example.com/cb", "xyz")
            .unwrap();

        assert_eq!(
            url,
            "https://open.weixin.qq.com/connect/oauth2/authorize?appid=wx123\
             &redirect_uri=https%3A%2F%2Fexample.com%2Fcb&response_type=code\
             &scope=snsapi_base&state=xyz#wechat_redirect"
        );
        assert!(!url.contains("component_appid"));
    }

    #[test]
    fn test_authorization_url_delegated() {
        let service = delegated_service(&StubTransport::responding("{}"));

        let url = service
            .authorization_url(Scope::UserInfo, "https://example.com/cb?from=menu", "STATE")
            .unwrap();

        for key in [
            "?appid=",
            "&redirect_uri=",
            "&response_type=code",
            "&scope=",
            "&state=",
            "&component_appid=",
        ] {
            assert_eq!(url.matches(key).count(), 1, "{} should appear once in {}", key, url);
        }
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcb%3Ffrom%3Dmenu"));
        assert!(url.ends_with("&component_appid=wxcomponent#wechat_redirect"));
    }

    #[test]
    fn test_authorization_url_is_deterministic() {
        let service = direct_service(&StubTransport::responding("{}"));

        let first = service.authorization_url(Scope::UserInfo, "https://example.com/cb", "s1").unwrap();
        let second = service.authorization_url(Scope::UserInfo, "https://example.com/cb", "s1").unwrap();
        assert_eq!(first, second);

        assert!(matches!(
            service.authorization_url(Scope::Base, "", "s1"),
            Err(WxError::InvalidParameter(ref name)) if name == "redirect_uri"
        ));
    }

    #[actix_web::test]
    async fn test_grant_token_direct() {
        init_logger();
        let stub = StubTransport::responding(TOKEN_BODY);
        let service = direct_service(&stub);

        let token = service.grant_token("AUTH_CODE", TIMEOUT).await.unwrap();
        assert_eq!(token.access_token, "USER_ACCESS_TOKEN");
        assert_eq!(token.open_id, "OPENID");

        let call = stub.last_call();
        assert_eq!(call.endpoint, ACCESS_TOKEN_URL);
        assert_eq!(call.timeout, TIMEOUT);
        assert_eq!(keys(&call.parameters), vec!["appid", "secret", "code", "grant_type"]);
        assert_eq!(find_parameter(&call.parameters, "secret"), Some("app-secret"));
        assert_eq!(find_parameter(&call.parameters, "code"), Some("AUTH_CODE"));
        assert_eq!(find_parameter(&call.parameters, "grant_type"), Some("authorization_code"));
    }

    #[actix_web::test]
    async fn test_grant_token_delegated() {
        let stub = StubTransport::responding(TOKEN_BODY);
        let service = delegated_service(&stub);

        service.grant_token("AUTH_CODE", TIMEOUT).await.unwrap();

        let call = stub.last_call();
        assert_eq!(
            keys(&call.parameters),
            vec!["appid", "code", "grant_type", "component_appid", "component_access_token"]
        );
        assert_eq!(find_parameter(&call.parameters, "component_appid"), Some("wxcomponent"));
        assert_eq!(
            find_parameter(&call.parameters, "component_access_token"),
            Some("COMPONENT_TOKEN")
        );
        assert_eq!(find_parameter(&call.parameters, "secret"), None);
    }

    #[actix_web::test]
    async fn test_grant_token_provider_error() {
        init_logger();
        let stub = StubTransport::responding(r#"{"errcode":40029,"errmsg":"invalid code"}"#);
        let service = direct_service(&stub);

        let result = service.grant_token("USED_CODE", TIMEOUT).await;
        assert_eq!(result.unwrap_err().provider_code(), Some(40029));
        assert_eq!(stub.calls().len(), 1);
    }

    #[actix_web::test]
    async fn test_grant_token_validation_and_credentials_failure() {
        let stub = StubTransport::responding(TOKEN_BODY);
        let service = direct_service(&stub);
        assert!(service.grant_token("  ", TIMEOUT).await.unwrap_err().is_validation());

        let transport: Arc<dyn QueryTransport> = stub.clone();
        let failing = WechatOAuthService::delegated("wx123", "wxcomponent", Arc::new(FailingProvider))
            .with_transport(transport);
        assert!(matches!(
            failing.grant_token("AUTH_CODE", TIMEOUT).await,
            Err(WxError::Transport(_))
        ));

        assert!(stub.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_refresh_token_direct() {
        let stub = StubTransport::responding(TOKEN_BODY);
        let service = direct_service(&stub);

        let token = service.refresh_token("USER_REFRESH_TOKEN", TIMEOUT).await.unwrap();
        assert_eq!(token.refresh_token, "USER_REFRESH_TOKEN");

        let call = stub.last_call();
        assert_eq!(call.endpoint, REFRESH_TOKEN_URL);
        assert_eq!(keys(&call.parameters), vec!["appid", "grant_type", "refresh_token"]);
        assert_eq!(find_parameter(&call.parameters, "grant_type"), Some("refresh_token"));
        assert!(call.parameters.iter().all(|p| !p.key.starts_with("component")));
    }

    #[actix_web::test]
    async fn test_refresh_token_delegated() {
        let stub = StubTransport::responding(TOKEN_BODY);
        let service = delegated_service(&stub);

        service.refresh_token("USER_REFRESH_TOKEN", TIMEOUT).await.unwrap();

        let call = stub.last_call();
        assert_eq!(
            keys(&call.parameters),
            vec!["appid", "grant_type", "refresh_token", "component_appid", "component_access_token"]
        );
        assert_eq!(
            find_parameter(&call.parameters, "component_access_token"),
            Some("COMPONENT_TOKEN")
        );
    }

    #[actix_web::test]
    async fn test_fetch_user_info() {
        let stub = StubTransport::responding(USER_INFO_BODY);
        let service = direct_service(&stub);

        let info = service
            .fetch_user_info("OPENID", "USER_ACCESS_TOKEN", Lang::En, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(info.nickname, "NICKNAME");
        assert_eq!(info.avatar_url(), Some("https://thirdwx.qlogo.cn/mmopen/abc/46"));

        let call = stub.last_call();
        assert_eq!(call.endpoint, USER_INFO_URL);
        assert_eq!(keys(&call.parameters), vec!["access_token", "openid", "lang"]);
        assert_eq!(find_parameter(&call.parameters, "lang"), Some("en"));
    }

    #[actix_web::test]
    async fn test_fetch_user_info_invalid_lang_makes_no_request() {
        let stub = StubTransport::responding(USER_INFO_BODY);
        let service = direct_service(&stub);

        let error = service
            .fetch_user_info_with_lang_code("OPENID", "USER_ACCESS_TOKEN", "ko_KR", TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(error, WxError::InvalidParameter(ref name) if name == "lang"));
        assert!(stub.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_fetch_user_info_empty_lang_defaults_to_zh_cn() {
        let stub = StubTransport::responding(USER_INFO_BODY);
        let service = direct_service(&stub);

        let defaulted = service
            .fetch_user_info_with_lang_code("OPENID", "USER_ACCESS_TOKEN", "", TIMEOUT)
            .await
            .unwrap();
        let explicit = service
            .fetch_user_info_with_lang_code("OPENID", "USER_ACCESS_TOKEN", "zh_CN", TIMEOUT)
            .await
            .unwrap();

        assert_eq!(defaulted, explicit);
        let calls = stub.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].parameters, calls[1].parameters);
        assert_eq!(find_parameter(&calls[0].parameters, "lang"), Some("zh_CN"));
    }

    #[actix_web::test]
    async fn test_verify_token_success() {
        let stub = StubTransport::responding(r#"{"errcode":0,"errmsg":"ok"}"#);
        let service = delegated_service(&stub);

        assert!(service.verify_token("OPENID", "USER_ACCESS_TOKEN", TIMEOUT).await.unwrap());

        let call = stub.last_call();
        assert_eq!(call.endpoint, VERIFY_TOKEN_URL);
        assert_eq!(keys(&call.parameters), vec!["access_token", "openid"]);
    }

    #[actix_web::test]
    async fn test_verify_token_failures() {
        init_logger();
        let invalid = StubTransport::responding(r#"{"errcode":40003,"errmsg":"invalid openid"}"#);
        let result = direct_service(&invalid)
            .verify_token("OPENID", "USER_ACCESS_TOKEN", TIMEOUT)
            .await;
        assert_eq!(result.unwrap_err().provider_code(), Some(40003));

        let unreachable = StubTransport::failing("connection timed out");
        let service = direct_service(&unreachable);
        assert!(matches!(
            service.verify_token("OPENID", "USER_ACCESS_TOKEN", TIMEOUT).await,
            Err(WxError::Transport(_))
        ));
        assert!(!service.is_token_valid("OPENID", "USER_ACCESS_TOKEN", TIMEOUT).await);
    }

    #[test]
    fn test_mode_debug_hides_secret() {
        let service = direct_service(&StubTransport::responding("{}"));
        let debug = format!("{:?}", service);

        assert!(debug.contains("wx123"));
        assert!(!debug.contains("app-secret"));
        assert_eq!(service.mode().kind(), OAuthModeKind::Mp);
        assert_eq!(service.default_timeout(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_from_env_direct() {
        use crate::config::wechat_config::with_env;

        with_env(
            &[
                ("WECHAT_OAUTH_MODE", None),
                ("WECHAT_APP_ID", Some("wxenv")),
                ("WECHAT_APP_SECRET", Some("env-secret")),
                ("WECHAT_REQUEST_TIMEOUT_SECS", Some("7")),
            ],
            || {
                let service = WechatOAuthService::from_env().unwrap();

                assert_eq!(service.app_id(), "wxenv");
                assert!(matches!(service.mode(), OAuthMode::Direct { secret } if secret == "env-secret"));
                assert_eq!(service.default_timeout(), Duration::from_secs(7));
            },
        );
    }

    #[test]
    fn test_from_env_config_errors() {
        use crate::config::wechat_config::with_env;

        with_env(
            &[
                ("WECHAT_OAUTH_MODE", Some("component")),
                ("WECHAT_APP_ID", Some("wxenv")),
                ("WECHAT_APP_SECRET", Some("env-secret")),
                ("WECHAT_REQUEST_TIMEOUT_SECS", None),
            ],
            || {
                assert!(matches!(WechatOAuthService::from_env(), Err(WxError::Config(_))));
            },
        );

        with_env(
            &[
                ("WECHAT_OAUTH_MODE", Some("mp")),
                ("WECHAT_APP_ID", Some("wxenv")),
                ("WECHAT_APP_SECRET", None),
            ],
            || {
                assert!(matches!(WechatOAuthService::from_env(), Err(WxError::Config(_))));
            },
        );
    }

    #[test]
    fn test_delegated_from_env() {
        use crate::config::wechat_config::with_env;

        let provider = || -> Arc<dyn ComponentCredentialProvider> {
            Arc::new(FixedComponentToken::new("COMPONENT_TOKEN"))
        };

        with_env(
            &[
                ("WECHAT_APP_ID", Some("wxenv")),
                ("WECHAT_COMPONENT_APP_ID", None),
                ("WECHAT_REQUEST_TIMEOUT_SECS", None),
            ],
            || {
                match WechatOAuthService::delegated_from_env(provider()) {
                    Err(WxError::Config(msg)) => assert!(msg.contains("WECHAT_COMPONENT_APP_ID")),
                    other => panic!("Expected Config error, got {:?}", other),
                }
            },
        );

        with_env(
            &[
                ("WECHAT_APP_ID", Some("wxenv")),
                ("WECHAT_COMPONENT_APP_ID", Some("wxcomponent")),
                ("WECHAT_REQUEST_TIMEOUT_SECS", None),
            ],
            || {
                let service = WechatOAuthService::delegated_from_env(provider()).unwrap();

                assert_eq!(service.mode().kind(), OAuthModeKind::Component);
                assert_eq!(service.default_timeout(), DEFAULT_REQUEST_TIMEOUT);
            },
        );
    }
}
