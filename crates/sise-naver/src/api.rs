//! 네이버 금융 JSON API.
//!
//! HTML 스크레이핑과 별개로 제공되는 두 엔드포인트를 감쌉니다.
//! - `itemSummary.nhn`: 종목 요약 (시가총액, PER, EPS, PBR 등)
//! - `realtime.nhn`: 폴링용 실시간 시세

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sise_core::StockCode;

use crate::client::NaverClient;
use crate::error::{NaverError, Result};

/// 종목 요약 (`itemSummary.nhn` 응답).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSummary {
    /// 시가총액 (억원)
    #[serde(rename = "marketSum")]
    pub market_sum: i64,
    /// 현재가
    pub now: i64,
    /// 전일비
    pub diff: i64,
    /// 등락률 (%)
    pub rate: Decimal,
    /// 거래량
    pub quant: i64,
    /// 당일 고가
    pub high: i64,
    /// 당일 저가
    pub low: i64,
    /// PER. 적자 종목 등은 빠져 있음
    #[serde(default)]
    pub per: Option<Decimal>,
    /// 주당순이익
    #[serde(default)]
    pub eps: Option<Decimal>,
    /// 주가순자산비율
    #[serde(default)]
    pub pbr: Option<Decimal>,
}

/// `realtime.nhn` 최상위 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeResponse {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    pub result: RealtimeResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeResult {
    #[serde(rename = "pollingInterval", default)]
    pub polling_interval: Option<u64>,
    pub areas: Vec<RealtimeArea>,
    #[serde(default)]
    pub time: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeArea {
    pub name: String,
    pub datas: Vec<RealtimeItem>,
}

/// 실시간 시세 항목. 필드명은 API의 축약형 그대로입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeItem {
    /// 종목 코드
    pub cd: String,
    /// 종목명
    pub nm: String,
    /// 현재가
    pub nv: i64,
    /// 전일비
    pub cv: i64,
    /// 등락률 (%)
    pub cr: Decimal,
    /// 전일 종가
    #[serde(default)]
    pub pcv: Option<i64>,
    /// 시가
    #[serde(default)]
    pub ov: Option<i64>,
    /// 고가
    #[serde(default)]
    pub hv: Option<i64>,
    /// 저가
    #[serde(default)]
    pub lv: Option<i64>,
    /// 누적 거래량
    #[serde(default)]
    pub aq: Option<i64>,
    /// 누적 거래대금
    #[serde(default)]
    pub aa: Option<i64>,
    /// 장 상태 (`OPEN`/`CLOSE` 등)
    #[serde(default)]
    pub ms: Option<String>,
}

impl NaverClient {
    /// 종목 요약을 가져옵니다.
    pub async fn summary(&self, code: &StockCode) -> Result<ItemSummary> {
        self.fetch_json(&self.summary_url(code.as_str())).await
    }

    /// 실시간 폴링 API에서 종목 하나의 시세를 가져옵니다.
    pub async fn realtime(&self, code: &StockCode) -> Result<RealtimeItem> {
        let url = self.realtime_url(code.as_str());
        let response: RealtimeResponse = self.fetch_json(&url).await?;

        if response.result_code != "success" {
            return Err(NaverError::Parse(format!(
                "realtime API returned `{}`",
                response.result_code
            )));
        }

        response
            .result
            .areas
            .into_iter()
            .flat_map(|area| area.datas)
            .next()
            .ok_or_else(|| NaverError::SymbolNotFound {
                code: code.to_string(),
            })
    }
}
