//! 실행 환경 및 `.env` 파일 로딩

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경
    Production,
}

impl Environment {
    /// `PROFILE` 환경 변수로 현재 실행 환경을 감지합니다. 기본값은 `dev` 입니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("PROFILE").unwrap_or_else(|_| "dev".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 환경별 `.env` 파일 이름을 반환합니다.
    pub fn env_file(&self) -> &'static str {
        match self {
            Environment::Development => ".env.dev",
            Environment::Test => ".env.test",
            Environment::Staging => ".env.staging",
            Environment::Production => ".env.prod",
        }
    }
}

/// 환경별 설정 파일을 로드합니다
///
/// `PROFILE` 환경변수(기본값 `dev`)에 해당하는 `.env.{profile}` 파일을 먼저 시도하고,
/// 없으면 기본 `.env` 파일을 로드합니다. 이미 설정된 환경 변수는 덮어쓰지 않습니다.
///
/// 호스트 애플리케이션이 시작 시 한 번 호출하는 것을 전제로 합니다.
///
/// # Examples
///
/// ```bash
/// # 개발 환경
/// PROFILE=dev ./my-app
///
/// # 운영 환경
/// PROFILE=prod ./my-app
/// ```
pub fn load_env_file() {
    let file_name = Environment::current().env_file();

    match dotenv::from_filename(file_name) {
        Ok(_) => log::info!("{} 파일 로드 됨", file_name),
        Err(e) => {
            log::warn!("{} 파일 로드 실패: {}", file_name, e);
            if dotenv::dotenv().is_ok() {
                log::info!("기본 .env 파일 로드");
            }
        }
    }
}
