//! # WeChat Authorization Configuration Module
//!
//! WeChat 웹 인증에 필요한 앱 자격 증명과 요청 설정을 환경 변수에서 읽어옵니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### 공식계정 플랫폼 직접 모드 (mp)
//! ```bash
//! export WECHAT_OAUTH_MODE="mp"
//! export WECHAT_APP_ID="wx1234567890abcdef"
//! export WECHAT_APP_SECRET="your-app-secret"
//! ```
//!
//! ### 제3자 플랫폼 컴포넌트 모드 (component)
//! ```bash
//! export WECHAT_OAUTH_MODE="component"
//! export WECHAT_APP_ID="wx1234567890abcdef"          # 위임받은 공식계정
//! export WECHAT_COMPONENT_APP_ID="wxcomponent0001"   # 제3자 플랫폼
//! ```
//!
//! ### 선택 설정
//! ```bash
//! export WECHAT_REQUEST_TIMEOUT_SECS="5"
//! export WECHAT_OAUTH_STATE_SECRET="your-oauth-state-secret"
//! export WECHAT_OAUTH_STATE_TTL_MINUTES="10"
//! ```

use std::env;
use std::time::Duration;
use crate::domain::constants::OAuthModeKind;
use crate::errors::{ErrorContext, WxError, WxResult};

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_STATE_TTL_MINUTES: i64 = 10;
const MAX_STATE_TTL_MINUTES: i64 = 24 * 60;

/// 환경 변수 없이 생성한 서비스의 기본 요청 타임아웃
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// WeChat 웹 인증 설정
///
/// 모든 값은 호출 시점의 환경 변수에서 읽습니다. 서비스 생성 시 한 번 읽어
/// [`crate::services::oauth::WechatOAuthService`]에 고정되므로 이후 변경은 반영되지 않습니다.
///
/// ## 보안 고려사항
///
/// - `WECHAT_APP_SECRET`은 서버 사이드에서만 사용하며 로그에 출력하지 않습니다
/// - 컴포넌트 모드에서는 앱 시크릿 대신 컴포넌트 액세스 토큰을 사용합니다
pub struct WechatConfig;

impl WechatConfig {
    /// 공식계정 앱 ID (`appid`)
    ///
    /// # Errors
    ///
    /// `WECHAT_APP_ID`가 설정되지 않았거나 비어 있으면 `WxError::Config`
    pub fn app_id() -> WxResult<String> {
        required("WECHAT_APP_ID")
    }

    /// 공식계정 앱 시크릿. 직접 모드에서만 필요합니다.
    pub fn app_secret() -> WxResult<String> {
        required("WECHAT_APP_SECRET")
    }

    /// 제3자 플랫폼 컴포넌트 앱 ID. 컴포넌트 모드에서만 필요합니다.
    pub fn component_app_id() -> WxResult<String> {
        required("WECHAT_COMPONENT_APP_ID")
    }

    /// 운영 모드. 기본값은 `mp` 입니다.
    pub fn mode() -> WxResult<OAuthModeKind> {
        match env::var("WECHAT_OAUTH_MODE") {
            Ok(value) => OAuthModeKind::from_str(&value),
            Err(_) => Ok(OAuthModeKind::Mp),
        }
    }

    /// API 요청 타임아웃. 기본값 5초.
    ///
    /// `WechatOAuthService::from_env`가 서비스의 기본 타임아웃으로 사용합니다.
    pub fn request_timeout() -> WxResult<Duration> {
        parse_timeout_secs(env::var("WECHAT_REQUEST_TIMEOUT_SECS").ok().as_deref())
    }

    /// OAuth state 서명용 비밀키
    ///
    /// 설정되지 않은 경우 기본값을 사용하지만 경고 로그가 출력됩니다.
    pub fn state_secret() -> String {
        env::var("WECHAT_OAUTH_STATE_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("WECHAT_OAUTH_STATE_SECRET not set, using default (not secure for production!)");
                "oauth-state-secret".to_string()
            })
    }

    /// 발급한 state의 유효 시간 (분). 기본값 10분, 최대 1일.
    ///
    /// # Errors
    ///
    /// 숫자가 아니거나 1분 미만, 1일 초과이면 `WxError::Config`
    pub fn state_ttl_minutes() -> WxResult<i64> {
        parse_ttl_minutes(env::var("WECHAT_OAUTH_STATE_TTL_MINUTES").ok().as_deref())
    }
}

fn required(name: &str) -> WxResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(WxError::Config(format!("{} must be set", name))),
    }
}

fn parse_timeout_secs(raw: Option<&str>) -> WxResult<Duration> {
    let secs = match raw {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .config_context("WECHAT_REQUEST_TIMEOUT_SECS")?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    if secs == 0 {
        return Err(WxError::Config(
            "WECHAT_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

fn parse_ttl_minutes(raw: Option<&str>) -> WxResult<i64> {
    let minutes = match raw {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .config_context("WECHAT_OAUTH_STATE_TTL_MINUTES")?,
        None => DEFAULT_STATE_TTL_MINUTES,
    };

    if !(1..=MAX_STATE_TTL_MINUTES).contains(&minutes) {
        return Err(WxError::Config(format!(
            "WECHAT_OAUTH_STATE_TTL_MINUTES must be between 1 and {}",
            MAX_STATE_TTL_MINUTES
        )));
    }

    Ok(minutes)
}

/// 환경 변수를 바꾸는 테스트를 직렬화합니다.
///
/// 잠금을 쥔 동안 변수를 설정하고, 클로저가 끝나면(패닉 포함) 이전 값으로 되돌립니다.
#[cfg(test)]
pub(crate) fn with_env<T>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct Restore(Vec<(String, Option<String>)>);

    impl Drop for Restore {
        fn drop(&mut self) {
            for (name, value) in &self.0 {
                set_env(name, value.as_deref());
            }
        }
    }

    fn set_env(name: &str, value: Option<&str>) {
        // 모든 변경은 ENV_LOCK 안에서만 일어납니다.
        unsafe {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }

    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = Restore(
        vars.iter()
            .map(|(name, _)| (name.to_string(), env::var(name).ok()))
            .collect(),
    );

    for (name, value) in vars {
        set_env(name, *value);
    }

    f()
}
