//! # 문자열 유틸리티
//! 
//! 요청 파라미터 검증과 응답 필드 정리에 쓰는 공통 함수들입니다.

use serde::Deserialize;
use crate::errors::WxError;

/// 필수 문자열 파라미터 검증
/// 
/// 빈 문자열이나 공백만 있는 경우 `InvalidParameter`를 반환합니다.
/// 유효한 경우 값을 변경하지 않고 그대로 돌려주므로, 인증 코드나 토큰처럼
/// 원문 그대로 전달해야 하는 값에도 사용할 수 있습니다.
/// 
/// # 인자
/// * `value` - 검증할 문자열
/// * `field_name` - 파라미터 이름 (에러에 그대로 담김)
/// 
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::require_non_blank;
/// 
/// assert_eq!(require_non_blank("CODE", "code").unwrap(), "CODE");
/// assert!(require_non_blank("   ", "code").is_err());
/// ```
pub fn require_non_blank<'a>(value: &'a str, field_name: &str) -> Result<&'a str, WxError> {
    if !is_valid_string(value) {
        return Err(WxError::InvalidParameter(field_name.to_string()));
    }
    Ok(value)
}

/// 선택적 문자열 필드 정리
/// 
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some 옵션으로 반환합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 문자열이 유효한지 확인 (빈 문자열이 아니고 공백만으로 구성되지 않음)
pub fn is_valid_string(value: &str) -> bool {
    !value.trim().is_empty()
}

/// 선택적 문자열 필드를 위한 serde deserializer
/// 
/// WeChat은 값이 없는 필드를 생략하기도 하고 빈 문자열로 내려주기도 합니다.
/// 두 경우를 모두 None으로 맞춥니다. 필드가 생략될 수 있으면 `default`와 함께 사용합니다.
/// 
/// # 예제
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Token {
///     #[serde(default, deserialize_with = "deserialize_optional_string")]
///     unionid: Option<String>,
/// }
/// 
/// // JSON: {"unionid": "U"} → Some("U")
/// // JSON: {"unionid": ""} → None
/// // JSON: {} → None
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}
