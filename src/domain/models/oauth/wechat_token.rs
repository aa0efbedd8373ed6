//! # WeChat 사용자 액세스 토큰 모델
//!
//! 인증 코드 교환(`/sns/oauth2/access_token`)과 토큰 갱신
//! (`/sns/oauth2/refresh_token`) 응답을 표현합니다.
//! 만료 관리는 호출자의 책임이며, 이 모델은 만료 시각 계산만 돕습니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::constants::Scope;
use crate::utils::string_utils::deserialize_optional_string;

/// 사용자 인증 결과로 발급된 액세스 토큰
///
/// ## 응답 예시
///
/// ```json
/// {
///   "access_token": "ACCESS_TOKEN",
///   "expires_in": 7200,
///   "refresh_token": "REFRESH_TOKEN",
///   "openid": "OPENID",
///   "scope": "snsapi_userinfo",
///   "unionid": "o6_bmasdasdsad6_2sgVt7hMZOPfL"
/// }
/// ```
///
/// 앱 또는 컴포넌트 수준의 액세스 토큰과는 다른, 최종 사용자 단위의 토큰입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccessToken {
    /// 사용자 액세스 토큰
    pub access_token: String,
    /// 만료까지 남은 시간 (초 단위)
    pub expires_in: i64,
    /// 리프레시 토큰
    pub refresh_token: String,
    /// 인증한 사용자의 앱 단위 식별자
    #[serde(rename = "openid")]
    pub open_id: String,
    /// 부여된 권한 범위 (쉼표 구분)
    pub scope: String,
    /// 개방 플랫폼 단위 식별자 (개방 플랫폼에 묶인 경우에만 존재)
    #[serde(
        rename = "unionid",
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub union_id: Option<String>,
}

impl UserAccessToken {
    /// 토큰이 발급된 시각을 기준으로 만료 시각을 계산합니다.
    ///
    /// `expires_in`이 표현할 수 없을 만큼 크면 `None`을 반환합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let issued_at = Utc::now();
    /// let token = service.grant_token(&code, timeout).await?;
    /// let expires_at = token.expires_at(issued_at);
    /// ```
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
    }

    /// 주어진 시각에 토큰이 만료되었는지 확인합니다.
    pub fn is_expired_at(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.expires_at(issued_at).is_some_and(|expires_at| now >= expires_at)
    }

    /// 부여된 범위 문자열을 [`Scope`] 목록으로 해석합니다.
    ///
    /// 알 수 없는 범위 값은 건너뜁니다.
    pub fn scopes(&self) -> Vec<Scope> {
        self.scope
            .split(',')
            .filter_map(|s| Scope::from_str(s).ok())
            .collect()
    }

    /// 사용자 정보 조회 권한(`snsapi_userinfo`)이 포함되어 있는지 확인합니다.
    pub fn allows_user_info(&self) -> bool {
        self.scopes().contains(&Scope::UserInfo)
    }
}
