//! 네이버 금융 HTTP 클라이언트.
//!
//! 페이지 단위 HTML 수집과 JSON API 호출의 공통 토대입니다. HTML 응답은
//! EUC-KR이므로 바이트를 직접 디코딩합니다.

use std::sync::Arc;

use chrono::NaiveDate;
use encoding_rs::EUC_KR;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use sise_core::{Clock, FetchConfig, Market, SystemClock};

use crate::error::{NaverError, Result};

/// 한 페이지 수집 결과.
///
/// 페이지 범위를 벗어난 요청은 오류가 아니라 [`Page::End`]입니다.
/// 페이지 순회 루프는 이 값으로 종료를 판단합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// 디코딩된 HTML 본문
    Content(String),
    /// 더 이상 페이지가 없음
    End,
}

/// 네이버 금융 클라이언트.
///
/// 현재가/일별 이력/시장 순위 수집 메서드는 기능별 모듈에 나뉘어
/// 있습니다 ([`crate::quote`], [`crate::history`], [`crate::market`],
/// [`crate::api`]).
pub struct NaverClient {
    client: Client,
    config: FetchConfig,
    clock: Arc<dyn Clock>,
}

impl NaverClient {
    /// 기본 설정으로 생성합니다.
    pub fn new() -> Self {
        Self::with_config(FetchConfig::default())
    }

    /// 지정한 설정으로 생성합니다.
    pub fn with_config(config: FetchConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            client,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// 시계를 교체합니다. 테스트에서 날짜를 고정할 때 씁니다.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 오늘 날짜 (주입된 시계 기준).
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// 연속 요청 사이의 예의상 지연.
    pub(crate) async fn polite_delay(&self) {
        let delay = self.config.request_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// 한 wave의 최대 페이지 수. 최소 1은 보장합니다.
    pub(crate) fn wave_cap(&self) -> usize {
        self.config.max_concurrent_pages.max(1)
    }

    // ==================== URL ====================

    pub(crate) fn quote_url(&self, code: &str) -> String {
        format!("{}/item/sise.nhn?code={}", self.config.base_url, code)
    }

    pub(crate) fn daily_url(&self, code: &str, page: u32) -> String {
        format!(
            "{}/item/sise_day.nhn?code={}&page={}",
            self.config.base_url, code, page
        )
    }

    pub(crate) fn market_url(&self, market: Market, page: u32) -> String {
        format!(
            "{}/sise/sise_market_sum.nhn?sosok={}&page={}",
            self.config.base_url,
            market.sosok(),
            page
        )
    }

    pub(crate) fn summary_url(&self, code: &str) -> String {
        format!(
            "{}/service/itemSummary.nhn?itemcode={}",
            self.config.api_base_url, code
        )
    }

    pub(crate) fn realtime_url(&self, code: &str) -> String {
        format!(
            "{}/api/realtime.nhn?query=SERVICE_ITEM:{}",
            self.config.polling_base_url, code
        )
    }

    // ==================== 수집 ====================

    /// HTML 페이지 하나를 수집해 EUC-KR로 디코딩합니다.
    ///
    /// 404는 [`Page::End`]로 돌려주고, 그 밖의 실패 상태는 오류입니다.
    pub(crate) async fn fetch_html(&self, url: &str) -> Result<Page> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(url, "page not found, treating as end of pagination");
            return Ok(Page::End);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NaverError::RateLimited);
        }
        if !status.is_success() {
            return Err(NaverError::Status {
                status,
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let (decoded, _, had_errors) = EUC_KR.decode(&bytes);
        if had_errors {
            return Err(NaverError::Decode {
                url: url.to_string(),
            });
        }

        Ok(Page::Content(decoded.into_owned()))
    }

    /// JSON API 응답을 수집해 역직렬화합니다.
    ///
    /// JSON 엔드포인트도 HTML 페이지와 같은 EUC-KR 인코딩입니다.
    pub(crate) async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NaverError::RateLimited);
        }
        if !status.is_success() {
            return Err(NaverError::Status {
                status,
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let (decoded, _, had_errors) = EUC_KR.decode(&bytes);
        if had_errors {
            return Err(NaverError::Decode {
                url: url.to_string(),
            });
        }

        serde_json::from_str(&decoded)
            .map_err(|e| NaverError::Parse(format!("invalid JSON from `{url}`: {e}")))
    }
}

impl Default for NaverClient {
    fn default() -> Self {
        Self::new()
    }
}
