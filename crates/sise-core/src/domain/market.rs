//! 시장(KOSPI/KOSDAQ) 구분과 시장 순위 스냅샷.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{CoreError, Result};

/// 시장 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// 유가증권시장 (코스피)
    Kospi,
    /// 코스닥
    Kosdaq,
}

impl Market {
    /// 시장별 순위 페이지의 `sosok` 쿼리 값.
    ///
    /// 0이 KOSPI, 1이 KOSDAQ입니다. 과거에 뒤바뀐 적이 있는 값이므로
    /// 테스트로 고정해 둡니다.
    pub fn sosok(&self) -> &'static str {
        match self {
            Self::Kospi => "0",
            Self::Kosdaq => "1",
        }
    }

    /// 페이지에 표시되는 한글 시장명에서 파싱합니다.
    pub fn from_korean(s: &str) -> Option<Self> {
        if s.contains("코스피") {
            Some(Self::Kospi)
        } else if s.contains("코스닥") {
            Some(Self::Kosdaq)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kospi => write!(f, "KOSPI"),
            Self::Kosdaq => write!(f, "KOSDAQ"),
        }
    }
}

impl std::str::FromStr for Market {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "KOSPI" => Ok(Self::Kospi),
            "KOSDAQ" => Ok(Self::Kosdaq),
            _ => Err(CoreError::InvalidMarket {
                input: s.to_string(),
            }),
        }
    }
}

/// 시장 순위 페이지의 한 종목 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRow {
    /// 시장 내 순위
    pub rank: u32,
    /// 종목 코드
    pub code: String,
    /// 종목명
    pub name: String,
    /// 현재가 (원)
    pub price: i64,
    /// 등락률 (%)
    pub change: Decimal,
    /// 시가총액 (억원)
    pub market_cap: i64,
    /// 거래량
    pub volume: i64,
    /// PER (N/A는 None)
    pub per: Option<Decimal>,
    /// ROE (N/A는 None)
    pub roe: Option<Decimal>,
}

/// 정렬/추출에 쓰는 시장 스냅샷 컬럼.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketColumn {
    Rank,
    Price,
    Change,
    MarketCap,
    Volume,
    Per,
    Roe,
}

impl MarketColumn {
    const AVAILABLE: &'static str = "rank, price, change, market_cap, volume, per, roe";
}

impl std::str::FromStr for MarketColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rank" => Ok(Self::Rank),
            "price" => Ok(Self::Price),
            "change" => Ok(Self::Change),
            "market_cap" | "marketcap" => Ok(Self::MarketCap),
            "volume" => Ok(Self::Volume),
            "per" => Ok(Self::Per),
            "roe" => Ok(Self::Roe),
            _ => Err(CoreError::InvalidColumn {
                input: s.to_string(),
                available: Self::AVAILABLE.to_string(),
            }),
        }
    }
}

/// 특정 시점의 시장 전체 순위 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// 어느 시장의 스냅샷인지
    market: Market,
    rows: Vec<MarketRow>,
}

impl MarketSnapshot {
    pub fn new(market: Market, rows: Vec<MarketRow>) -> Self {
        Self { market, rows }
    }

    pub fn market(&self) -> Market {
        self.market
    }

    pub fn rows(&self) -> &[MarketRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 상위 n개 행을 갖는 스냅샷을 반환합니다. n이 전체보다 크면 전체를 반환합니다.
    pub fn top(&self, n: usize) -> Self {
        Self {
            market: self.market,
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// 하위 n개 행을 갖는 스냅샷을 반환합니다.
    pub fn bottom(&self, n: usize) -> Self {
        let skip = self.rows.len().saturating_sub(n);
        Self {
            market: self.market,
            rows: self.rows.iter().skip(skip).cloned().collect(),
        }
    }

    /// 지정한 컬럼으로 정렬합니다. 값이 없는 행(PER/ROE의 N/A)은 항상 뒤로 갑니다.
    pub fn sort_by(&mut self, column: MarketColumn, ascending: bool) {
        self.rows.sort_by(|a, b| {
            let ka = Self::sort_key(a, column);
            let kb = Self::sort_key(b, column);
            match (ka, kb) {
                (Some(x), Some(y)) => {
                    if ascending {
                        x.cmp(&y)
                    } else {
                        y.cmp(&x)
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }

    /// 지정한 컬럼의 값을 벡터로 추출합니다. N/A 값은 건너뜁니다.
    pub fn values(&self, column: MarketColumn) -> Vec<Decimal> {
        self.rows
            .iter()
            .filter_map(|row| Self::sort_key(row, column))
            .collect()
    }

    fn sort_key(row: &MarketRow, column: MarketColumn) -> Option<Decimal> {
        match column {
            MarketColumn::Rank => Some(Decimal::from(row.rank)),
            MarketColumn::Price => Some(Decimal::from(row.price)),
            MarketColumn::Change => Some(row.change),
            MarketColumn::MarketCap => Some(Decimal::from(row.market_cap)),
            MarketColumn::Volume => Some(Decimal::from(row.volume)),
            MarketColumn::Per => row.per,
            MarketColumn::Roe => row.roe,
        }
    }
}
