//! 현재가 스냅샷.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::daily::DailyPrice;
use super::market::Market;
use crate::types::group_digits;

/// 한 종목의 현재가 스냅샷.
///
/// 조회 시점의 페이지 내용을 그대로 담는 불변 레코드입니다. 장 시작 전에는
/// 당일 시가/고가/저가가 아직 없으므로 해당 필드는 `None`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    /// 종목 코드
    pub code: String,
    /// 종목명
    pub name: String,
    /// 소속 시장
    pub market: Market,
    /// 시장 내 순위
    pub rank: u32,
    /// 페이지에 표시된 기준 시각 (예: `2020.01.03 15:30`)
    pub timestamp: String,
    /// 현재가/종가 (원)
    pub price: i64,
    /// 당일 시가 (원)
    pub open: Option<i64>,
    /// 당일 고가 (원)
    pub high: Option<i64>,
    /// 당일 저가 (원)
    pub low: Option<i64>,
    /// 당일 거래량
    pub volume: i64,
    /// PER (WISEfn 제공란)
    pub per: Option<Decimal>,
    /// 외국인 소진율 (%)
    pub foreign_rate: Option<Decimal>,
}

impl StockQuote {
    /// 당일 장중 데이터(시가)가 잡혀 있는지 여부.
    pub fn has_intraday(&self) -> bool {
        matches!(self.open, Some(open) if open > 0)
    }

    /// 시가 대비 현재가 등락률(%). 시가가 없거나 0이면 0입니다.
    pub fn change(&self) -> Decimal {
        match self.open {
            Some(open) if open != 0 => {
                (Decimal::from(self.price - open) / Decimal::from(open)) * Decimal::from(100)
            }
            _ => Decimal::ZERO,
        }
    }

    /// 당일 고가-저가 폭을 시가 대비 백분율로. 값이 모자라면 0입니다.
    pub fn hl_gap(&self) -> Decimal {
        match (self.open, self.high, self.low) {
            (Some(open), Some(high), Some(low)) if open != 0 => {
                (Decimal::from(high - low) / Decimal::from(open)) * Decimal::from(100)
            }
            _ => Decimal::ZERO,
        }
    }

    /// 스냅샷을 지정한 날짜의 일별 시세 행으로 변환합니다.
    ///
    /// 이력 페이지에 아직 오늘 행이 없을 때 오늘 행을 합성하는 데 쓰입니다.
    /// 장중 데이터가 없으면 `None`입니다.
    pub fn to_daily(&self, date: NaiveDate) -> Option<DailyPrice> {
        match (self.open, self.high, self.low) {
            (Some(open), Some(high), Some(low)) if open > 0 => Some(DailyPrice {
                date,
                open,
                high,
                low,
                close: self.price,
                volume: self.volume,
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for StockQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_opt = |v: Option<i64>| v.map(group_digits).unwrap_or_else(|| "-".to_string());
        writeln!(f, "[{}] ({}, {})", self.name, self.market, self.code)?;
        writeln!(f, "<{}>", self.timestamp)?;
        writeln!(f, "Price:        {}", group_digits(self.price))?;
        writeln!(f, "High:         {}", fmt_opt(self.high))?;
        writeln!(f, "Low:          {}", fmt_opt(self.low))?;
        writeln!(f, "Open:         {}", fmt_opt(self.open))?;
        write!(f, "Trade Volume: {}", group_digits(self.volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote() -> StockQuote {
        StockQuote {
            code: "005930".to_string(),
            name: "삼성전자".to_string(),
            market: Market::Kospi,
            rank: 1,
            timestamp: "2020.01.03 15:30".to_string(),
            price: 55_500,
            open: Some(56_000),
            high: Some(56_600),
            low: Some(54_800),
            volume: 15_422_255,
            per: Some(dec!(8.77)),
            foreign_rate: Some(dec!(56.41)),
        }
    }

    #[test]
    fn test_change_and_hl_gap() {
        let q = quote();
        assert_eq!(q.change(), dec!(-500) / dec!(56000) * dec!(100));
        assert_eq!(q.hl_gap(), dec!(1800) / dec!(56000) * dec!(100));
    }

    #[test]
    fn test_pre_market_quote_has_no_intraday() {
        let q = StockQuote {
            open: None,
            high: None,
            low: None,
            ..quote()
        };
        assert!(!q.has_intraday());
        assert_eq!(q.change(), Decimal::ZERO);
        assert_eq!(q.hl_gap(), Decimal::ZERO);
        assert!(q.to_daily(NaiveDate::from_ymd_opt(2020, 1, 3).unwrap()).is_none());
    }

    #[test]
    fn test_to_daily_carries_quote_fields() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let row = quote().to_daily(date).unwrap();
        assert_eq!(row.date, date);
        assert_eq!(row.open, 56_000);
        assert_eq!(row.close, 55_500);
        assert_eq!(row.volume, 15_422_255);
    }

    #[test]
    fn test_display_format() {
        let text = quote().to_string();
        assert!(text.starts_with("[삼성전자] (KOSPI, 005930)"));
        assert!(text.contains("Price:        55,500"));
        assert!(text.contains("Trade Volume: 15,422,255"));
    }
}
