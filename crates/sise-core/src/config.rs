//! 설정 관리.
//!
//! 애플리케이션 설정을 정의하고 파일/환경 변수에서 로드합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 수집 설정
    pub fetch: FetchConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 수집(스크래핑) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// HTML 페이지 기본 URL
    pub base_url: String,
    /// 종목 요약 JSON API 기본 URL
    pub api_base_url: String,
    /// 실시간 폴링 JSON API 기본 URL
    pub polling_base_url: String,
    /// User-Agent 헤더
    pub user_agent: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 연속 요청 사이의 지연 (밀리초)
    pub request_delay_ms: u64,
    /// 동시 수집 시 한 wave의 최대 페이지 수
    pub max_concurrent_pages: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://finance.naver.com".to_string(),
            api_base_url: "https://api.finance.naver.com".to_string(),
            polling_base_url: "https://polling.finance.naver.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 30,
            request_delay_ms: 0,
            max_concurrent_pages: 8,
        }
    }
}

impl FetchConfig {
    /// 요청 타임아웃을 `Duration`으로 반환합니다.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 요청 간 지연을 `Duration`으로 반환합니다.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `SISE__` 접두사와 `__` 구분자를 사용합니다.
    /// 예: `SISE__FETCH__REQUEST_DELAY_MS=200`
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SISE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 환경 변수만으로 설정을 로드합니다. 설정 파일이 없어도 동작합니다.
    ///
    /// 지정되지 않은 키는 기본값을 유지합니다.
    pub fn from_env() -> std::result::Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("SISE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
