//! # WeChat 사용자 정보 모델
//!
//! `/sns/userinfo` 응답을 역직렬화하기 위한 모델입니다.
//! `snsapi_userinfo` 범위로 발급된 사용자 액세스 토큰이 있어야 조회할 수 있습니다.

use serde::{Deserialize, Serialize};
use crate::utils::string_utils::deserialize_optional_string;

/// 인증된 사용자의 프로필 정보
///
/// ## 응답 예시
///
/// ```json
/// {
///   "openid": "OPENID",
///   "nickname": "NICKNAME",
///   "sex": 1,
///   "province": "PROVINCE",
///   "city": "CITY",
///   "country": "COUNTRY",
///   "headimgurl": "https://thirdwx.qlogo.cn/mmopen/.../46",
///   "privilege": ["PRIVILEGE1", "PRIVILEGE2"],
///   "unionid": "o6_bmasdasdsad6_2sgVt7hMZOPfL"
/// }
/// ```
///
/// 지역 필드와 프로필 사진은 사용자가 설정하지 않았으면 빈 문자열로 내려옵니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// 앱 단위 사용자 식별자
    #[serde(rename = "openid")]
    pub open_id: String,
    /// 닉네임
    #[serde(default)]
    pub nickname: String,
    /// 성별 코드 (0: 미상, 1: 남성, 2: 여성)
    #[serde(default)]
    pub sex: i32,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    /// 프로필 사진 URL
    #[serde(rename = "headimgurl", default)]
    pub head_img_url: String,
    /// 사용자 특권 정보 (예: WeChat 카드 사용자)
    #[serde(default)]
    pub privilege: Vec<String>,
    #[serde(
        rename = "unionid",
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub union_id: Option<String>,
}

/// 사용자 성별
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl UserInfo {
    /// `sex` 코드를 [`Gender`]로 변환합니다.
    pub fn gender(&self) -> Gender {
        match self.sex {
            1 => Gender::Male,
            2 => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    /// 프로필 사진이 설정되어 있으면 URL을 반환합니다.
    pub fn avatar_url(&self) -> Option<&str> {
        if self.head_img_url.is_empty() {
            None
        } else {
            Some(&self.head_img_url)
        }
    }
}
