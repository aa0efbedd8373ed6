//! # WeChat 공통 상수
//!
//! WeChat 웹 인증 API가 정의한 엔드포인트와 열거형 값들입니다.
//! 문자열 비교 대신 닫힌 열거형을 사용하여 잘못된 값이 컴파일 단계에서 걸러지도록 합니다.
//!
//! | 열거형 | 값 |
//! |--------|-----|
//! | [`Scope`] | `snsapi_base`, `snsapi_userinfo` |
//! | [`GrantType`] | `refresh_token`, `authorization_code`, `client_credential` |
//! | [`Lang`] | `zh_CN`, `zh_TW`, `en` |
//! | [`OAuthModeKind`] | 컴포넌트(1), 공식계정 플랫폼(2) |

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::errors::WxError;

/// 사용자 인증 페이지 (리다이렉트 대상)
pub const AUTHORIZE_URL: &str = "https://open.weixin.qq.com/connect/oauth2/authorize";
/// 인증 코드 → 사용자 액세스 토큰 교환
pub const ACCESS_TOKEN_URL: &str = "https://api.weixin.qq.com/sns/oauth2/access_token";
/// 사용자 액세스 토큰 갱신
pub const REFRESH_TOKEN_URL: &str = "https://api.weixin.qq.com/sns/oauth2/refresh_token";
/// 사용자 액세스 토큰 유효성 검증
pub const VERIFY_TOKEN_URL: &str = "https://api.weixin.qq.com/sns/auth";
/// 사용자 프로필 조회
pub const USER_INFO_URL: &str = "https://api.weixin.qq.com/sns/userinfo";

/// 인증 URL 끝에 반드시 붙어야 하는 fragment
pub const REDIRECT_FRAGMENT: &str = "#wechat_redirect";

/// OAuth 인증 범위
///
/// `snsapi_base`는 사용자 동의 화면 없이 openid만 얻을 수 있고,
/// `snsapi_userinfo`는 동의 후 닉네임, 프로필 사진 등을 조회할 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "snsapi_base")]
    Base,
    #[serde(rename = "snsapi_userinfo")]
    UserInfo,
}

impl Scope {
    /// 문자열에서 Scope를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `WxError::InvalidParameter("scope")` - 알 수 없는 값인 경우
    pub fn from_str(s: &str) -> Result<Self, WxError> {
        match s.trim() {
            "snsapi_base" => Ok(Scope::Base),
            "snsapi_userinfo" => Ok(Scope::UserInfo),
            _ => Err(WxError::InvalidParameter("scope".to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Base => "snsapi_base",
            Scope::UserInfo => "snsapi_userinfo",
        }
    }
}

/// 토큰 발급 방식 (`grant_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// 리프레시 토큰으로 갱신
    RefreshToken,
    /// 인증 코드로 교환
    AuthorizationCode,
    /// 앱 자격 증명 (서버 간 토큰)
    ClientCredential,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::RefreshToken => "refresh_token",
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::ClientCredential => "client_credential",
        }
    }
}

/// 사용자 정보 응답 언어
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    /// 간체 중국어 (기본값)
    #[default]
    #[serde(rename = "zh_CN")]
    ZhCn,
    /// 번체 중국어
    #[serde(rename = "zh_TW")]
    ZhTw,
    /// 영어
    #[serde(rename = "en")]
    En,
}

impl Lang {
    /// 호출자가 전달한 언어 코드를 해석합니다.
    ///
    /// 빈 문자열은 기본 언어(`zh_CN`)로 처리합니다.
    ///
    /// # Errors
    ///
    /// * `WxError::InvalidParameter("lang")` - `zh_CN`, `zh_TW`, `en` 이외의 값
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// assert_eq!(Lang::parse("").unwrap(), Lang::ZhCn);
    /// assert_eq!(Lang::parse("en").unwrap(), Lang::En);
    /// assert!(Lang::parse("ko").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, WxError> {
        match s {
            "" | "zh_CN" => Ok(Lang::ZhCn),
            "zh_TW" => Ok(Lang::ZhTw),
            "en" => Ok(Lang::En),
            _ => Err(WxError::InvalidParameter("lang".to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::ZhCn => "zh_CN",
            Lang::ZhTw => "zh_TW",
            Lang::En => "en",
        }
    }
}

/// 인증 운영 모드 구분값
///
/// 실제 자격 증명은 [`crate::services::oauth::OAuthMode`]가 보관하며,
/// 이 열거형은 설정 파일과 로그에서 모드를 식별하는 용도로만 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthModeKind {
    /// 제3자 플랫폼 컴포넌트 위임 모드
    Component = 1,
    /// 공식계정 플랫폼 직접 모드
    Mp = 2,
}

impl OAuthModeKind {
    /// 문자열에서 모드를 생성합니다. 이름과 숫자 코드를 모두 허용합니다.
    pub fn from_str(s: &str) -> Result<Self, WxError> {
        match s.trim().to_lowercase().as_str() {
            "component" | "1" => Ok(OAuthModeKind::Component),
            "mp" | "2" => Ok(OAuthModeKind::Mp),
            _ => Err(WxError::Config(format!("Unsupported oauth mode: {}", s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthModeKind::Component => "component",
            OAuthModeKind::Mp => "mp",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OAuthModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
