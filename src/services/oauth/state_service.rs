//! # OAuth state 발급 및 검증
//!
//! 인증 리다이렉트의 `state` 파라미터는 WeChat이 콜백에 그대로 돌려주는 값입니다.
//! CSRF 방지를 위해 서버가 서명한 state를 발급하고, 콜백에서 서명과 유효 시간을 검증합니다.
//!
//! WeChat은 state에 영문자와 숫자만, 최대 128바이트까지 허용하므로 구분자 없이
//! 고정 길이 필드를 이어 붙입니다.
//!
//! ```text
//! ┌──────────────┬──────────────────┬───────────────────────────┐
//! │ nonce (32)   │ 발급 시각 (16)    │ HMAC-SHA256 서명 (64)      │
//! └──────────────┴──────────────────┴───────────────────────────┘
//!   uuid v4 hex    unix 초, hex       hmac(secret, nonce ‖ ts), hex
//! ```
//!
//! 서명은 상수 시간으로 비교합니다.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;
use crate::config::WechatConfig;
use crate::errors::{WxError, WxResult};

const NONCE_LEN: usize = 32;
const TIMESTAMP_LEN: usize = 16;
const SIGNATURE_LEN: usize = 64;
const STATE_LEN: usize = NONCE_LEN + TIMESTAMP_LEN + SIGNATURE_LEN;

type HmacSha256 = Hmac<Sha256>;

/// 서명된 OAuth state 발급기
#[derive(Clone)]
pub struct OAuthState {
    mac: HmacSha256,
    ttl: Duration,
}

impl OAuthState {
    /// # Errors
    ///
    /// * `WxError::Config` - `ttl`이 0 이하인 경우
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> WxResult<Self> {
        if ttl <= Duration::zero() {
            return Err(WxError::Config("OAuth state TTL must be positive".to_string()));
        }

        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|e| WxError::Config(format!("OAuth state secret: {}", e)))?;

        Ok(Self { mac, ttl })
    }

    /// `WECHAT_OAUTH_STATE_SECRET`, `WECHAT_OAUTH_STATE_TTL_MINUTES` 설정으로 생성합니다.
    ///
    /// # Errors
    ///
    /// * `WxError::Config` - 유효 시간 설정이 잘못된 경우
    pub fn from_env() -> WxResult<Self> {
        let minutes = WechatConfig::state_ttl_minutes()?;
        let ttl = Duration::try_minutes(minutes).ok_or_else(|| {
            WxError::Config("WECHAT_OAUTH_STATE_TTL_MINUTES is out of range".to_string())
        })?;

        Self::new(WechatConfig::state_secret(), ttl)
    }

    /// 새 state를 발급합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let states = OAuthState::from_env()?;
    /// let state = states.issue();
    /// let url = service.authorization_url(Scope::UserInfo, &redirect_uri, &state)?;
    ///
    /// // 콜백 핸들러
    /// states.verify(&query.state)?;
    /// let token = service.grant_token(&query.code, timeout).await?;
    /// ```
    pub fn issue(&self) -> String {
        self.issue_at(Utc::now())
    }

    pub fn issue_at(&self, now: DateTime<Utc>) -> String {
        let nonce = Uuid::new_v4().simple().to_string();
        let timestamp = format!("{:016x}", now.timestamp() as u64);
        let signature = self.sign(&nonce, &timestamp);

        format!("{}{}{}", nonce, timestamp, signature)
    }

    /// 콜백으로 돌아온 state를 검증합니다.
    ///
    /// # Errors
    ///
    /// * `WxError::InvalidParameter("state")` - 형식 오류, 서명 불일치, 유효 시간 초과
    pub fn verify(&self, state: &str) -> WxResult<()> {
        self.verify_at(state, Utc::now())
    }

    pub fn verify_at(&self, state: &str, now: DateTime<Utc>) -> WxResult<()> {
        if state.len() != STATE_LEN || !state.is_ascii() {
            return Err(invalid_state());
        }

        let nonce = &state[..NONCE_LEN];
        let timestamp = &state[NONCE_LEN..NONCE_LEN + TIMESTAMP_LEN];
        let signature = &state[NONCE_LEN + TIMESTAMP_LEN..];

        let expected = self.sign(nonce, timestamp);
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            log::warn!("OAuth state 서명 불일치");
            return Err(invalid_state());
        }

        let issued_secs = u64::from_str_radix(timestamp, 16).map_err(|_| invalid_state())?;
        let issued_secs = i64::try_from(issued_secs).map_err(|_| invalid_state())?;
        let issued_at = DateTime::<Utc>::from_timestamp(issued_secs, 0)
            .ok_or_else(invalid_state)?;

        let age = now - issued_at;
        if age < Duration::zero() || age > self.ttl {
            log::warn!("OAuth state 유효 시간 초과: {}초 경과", age.num_seconds());
            return Err(invalid_state());
        }

        Ok(())
    }

    fn sign(&self, nonce: &str, timestamp: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(nonce.as_bytes());
        mac.update(timestamp.as_bytes());

        format!("{:x}", mac.finalize().into_bytes())
    }
}

fn invalid_state() -> WxError {
    WxError::InvalidParameter("state".to_string())
}
