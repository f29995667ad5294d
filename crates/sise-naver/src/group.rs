//! 종목 묶음 수집.
//!
//! 여러 종목의 현재가와 이력을 묶어 한 날짜 기준의 단면을 볼 수 있게
//! 합니다. 현재가는 설정된 상한 안에서 묶음 단위로 동시에 수집하고,
//! 실패한 종목은 경고만 남기고 건너뜁니다.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{info, warn};

use sise_core::{DailyPrice, PriceHistory, StockCode, StockQuote};

use crate::client::NaverClient;
use crate::error::Result;
use crate::history::HistoryRange;

/// 종목 묶음. 현재가 목록과 코드별 이력을 보관합니다.
#[derive(Debug, Default)]
pub struct StockGroup {
    quotes: Vec<StockQuote>,
    histories: BTreeMap<String, PriceHistory>,
}

impl StockGroup {
    pub fn new(quotes: Vec<StockQuote>) -> Self {
        Self {
            quotes,
            histories: BTreeMap::new(),
        }
    }

    pub fn quotes(&self) -> &[StockQuote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// 코드로 이력을 찾습니다. 아직 안 실렸으면 `None`입니다.
    pub fn history(&self, code: &str) -> Option<&PriceHistory> {
        self.histories.get(code)
    }

    pub fn insert_history(&mut self, code: impl Into<String>, history: PriceHistory) {
        self.histories.insert(code.into(), history);
    }

    /// 한 날짜의 종목별 단면. 그 날 행이 없는 종목은 빠집니다.
    pub fn snapshot_on(&self, date: NaiveDate) -> Vec<(&str, DailyPrice)> {
        self.histories
            .iter()
            .filter_map(|(code, history)| {
                history
                    .rows()
                    .iter()
                    .find(|row| row.date == date)
                    .map(|row| (code.as_str(), *row))
            })
            .collect()
    }
}

impl NaverClient {
    /// 여러 종목의 현재가를 묶음 단위로 동시에 수집합니다.
    ///
    /// 한 묶음의 크기는 동시 페이지 상한과 같습니다. 실패한 종목은
    /// 경고를 남기고 결과에서 빠집니다.
    pub async fn group(&self, codes: &[StockCode]) -> StockGroup {
        let mut quotes = Vec::new();
        for chunk in codes.chunks(self.wave_cap()) {
            let wave = chunk
                .iter()
                .map(|code| async move { (code, self.quote(code).await) });
            for (code, result) in join_all(wave).await {
                match result {
                    Ok(quote) => quotes.push(quote),
                    Err(e) => warn!(code = %code, error = %e, "현재가 수집 실패, 건너뜀"),
                }
            }
            self.polite_delay().await;
        }

        info!(
            requested = codes.len(),
            fetched = quotes.len(),
            "종목 묶음 수집 완료"
        );
        StockGroup::new(quotes)
    }

    /// 묶음의 각 종목 이력을 차례로 수집해 채웁니다.
    pub async fn load_group_histories(
        &self,
        group: &mut StockGroup,
        range: &HistoryRange,
    ) -> Result<()> {
        let codes: Vec<String> = group.quotes().iter().map(|q| q.code.clone()).collect();
        for code_str in codes {
            let code = StockCode::new(&code_str)?;
            let history = self.history(&code, range).await?;
            group.insert_history(code_str, history);
            self.polite_delay().await;
        }
        Ok(())
    }
}
