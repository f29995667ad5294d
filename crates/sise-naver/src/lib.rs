//! 네이버 금융 수집기.
//!
//! 이 crate는 다음을 제공합니다:
//! - EUC-KR HTML/JSON 페이지 수집 클라이언트
//! - 현재가 스냅샷 수집 (`/item/sise.nhn`)
//! - 일별 시세 이력 수집: 순차 / wave 단위 동시 (`/item/sise_day.nhn`)
//! - KOSPI/KOSDAQ 시장 순위 스냅샷 (`/sise/sise_market_sum.nhn`)
//! - 요약/실시간 JSON API (`itemSummary.nhn`, `realtime.nhn`)
//! - 종목 묶음 수집

pub mod api;
pub mod client;
pub mod error;
pub mod group;
pub mod history;
pub mod market;
pub mod parse;
pub mod quote;

pub use client::{NaverClient, Page};
pub use error::{NaverError, Result};

// 수집 타입 재내보내기
pub use api::{ItemSummary, RealtimeItem, RealtimeResponse};
pub use group::StockGroup;
pub use history::{
    collect_history, collect_history_concurrent, DailyPageSource, HistoryRange, ROWS_PER_PAGE,
};
