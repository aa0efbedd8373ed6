//! 제3자 플랫폼 컴포넌트 자격 증명
//!
//! 컴포넌트 위임 모드에서는 앱 시크릿 대신 `component_access_token`을 사용합니다.
//! 이 토큰의 발급, 캐싱, 갱신은 호스트 애플리케이션의 책임이며,
//! 이 크레이트는 [`ComponentCredentialProvider`] trait을 통해 호출 시점에 값을 받아옵니다.

use async_trait::async_trait;
use crate::errors::WxResult;

/// 현재 유효한 컴포넌트 액세스 토큰을 제공하는 협력자
///
/// 토큰 교환과 갱신 요청마다 한 번씩 호출됩니다.
///
/// # Examples
///
/// ```rust,ignore
/// struct RedisComponentToken { redis: Arc<RedisClient> }
///
/// #[async_trait]
/// impl ComponentCredentialProvider for RedisComponentToken {
///     async fn component_access_token(&self) -> WxResult<String> {
///         self.redis.get("wechat:component_access_token").await
///             .map_err(|e| WxError::Transport(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait ComponentCredentialProvider: Send + Sync {
    async fn component_access_token(&self) -> WxResult<String>;
}

/// 고정된 컴포넌트 액세스 토큰
///
/// 토큰을 외부에서 주기적으로 교체하는 대신 서비스를 다시 생성하는 단순한 배포에 사용합니다.
#[derive(Debug, Clone)]
pub struct FixedComponentToken(String);

impl FixedComponentToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl ComponentCredentialProvider for FixedComponentToken {
    async fn component_access_token(&self) -> WxResult<String> {
        Ok(self.0.clone())
    }
}
