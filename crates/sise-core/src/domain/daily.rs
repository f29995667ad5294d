//! 일별 시세 행과 시세 이력 컬렉션.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// 하루치 시세 행.
///
/// 날짜에 대해 전순서를 갖는 불변 값 레코드입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPrice {
    /// 거래일
    pub date: NaiveDate,
    /// 시가 (원)
    pub open: i64,
    /// 고가 (원)
    pub high: i64,
    /// 저가 (원)
    pub low: i64,
    /// 종가 (원)
    pub close: i64,
    /// 거래량
    pub volume: i64,
}

impl DailyPrice {
    /// 고가-저가 폭을 시가 대비 백분율로 반환합니다. 시가가 0이면 0입니다.
    pub fn hl_gap(&self) -> Decimal {
        if self.open == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.high - self.low) / Decimal::from(self.open)) * Decimal::from(100)
    }

    /// 시가 대비 종가 등락률(%)을 반환합니다. 시가가 0이면 0입니다.
    pub fn change(&self) -> Decimal {
        if self.open == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.close - self.open) / Decimal::from(self.open)) * Decimal::from(100)
    }
}

/// 이력 컬렉션에서 정렬/추출에 쓰는 컬럼.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryColumn {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
    HlGap,
    Change,
}

impl HistoryColumn {
    const AVAILABLE: &'static str = "date, open, high, low, close, volume, hl_gap, change";
}

impl std::str::FromStr for HistoryColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            "volume" => Ok(Self::Volume),
            "hl_gap" | "hlgap" => Ok(Self::HlGap),
            "change" => Ok(Self::Change),
            _ => Err(CoreError::InvalidColumn {
                input: s.to_string(),
                available: Self::AVAILABLE.to_string(),
            }),
        }
    }
}

/// 행 선택 방식. 정확히 하나의 방식만 표현할 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 전체
    All,
    /// 최신순 상위 n개
    Top(usize),
    /// 하위(가장 오래된 쪽) n개
    Bottom(usize),
    /// 양끝을 포함하는 날짜 구간
    Dates { start: NaiveDate, end: NaiveDate },
}

impl Selection {
    /// 날짜 구간 선택을 만듭니다. `start > end`이면 오류입니다.
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self::Dates { start, end })
    }
}

/// 한 종목의 일별 시세 이력.
///
/// 행은 항상 날짜 내림차순(최신이 앞)으로 유지되고 날짜는 유일합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// 종목 코드
    pub code: String,
    rows: Vec<DailyPrice>,
}

impl PriceHistory {
    /// 행 목록에서 이력을 만듭니다. 날짜 내림차순으로 정렬하고 중복 날짜는
    /// 먼저 나온 행만 남깁니다.
    pub fn from_rows(code: impl Into<String>, mut rows: Vec<DailyPrice>) -> Self {
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.dedup_by_key(|row| row.date);
        Self {
            code: code.into(),
            rows,
        }
    }

    pub fn rows(&self) -> &[DailyPrice] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 가장 최근 행.
    pub fn latest(&self) -> Option<&DailyPrice> {
        self.rows.first()
    }

    /// 가장 오래된 행.
    pub fn oldest(&self) -> Option<&DailyPrice> {
        self.rows.last()
    }

    /// 선택 방식에 따라 일부 행만 갖는 이력을 반환합니다.
    pub fn select(&self, selection: Selection) -> Self {
        let rows: Vec<DailyPrice> = match selection {
            Selection::All => self.rows.clone(),
            Selection::Top(n) => self.rows.iter().take(n).copied().collect(),
            Selection::Bottom(n) => {
                let skip = self.rows.len().saturating_sub(n);
                self.rows.iter().skip(skip).copied().collect()
            }
            Selection::Dates { start, end } => self
                .rows
                .iter()
                .filter(|row| row.date >= start && row.date <= end)
                .copied()
                .collect(),
        };
        Self {
            code: self.code.clone(),
            rows,
        }
    }

    /// 지정한 컬럼으로 정렬합니다.
    pub fn sort_by(&mut self, column: HistoryColumn, ascending: bool) {
        self.rows.sort_by(|a, b| {
            let ord = match column {
                HistoryColumn::Date => a.date.cmp(&b.date),
                _ => Self::numeric_key(a, column).cmp(&Self::numeric_key(b, column)),
            };
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }

    /// 지정한 숫자 컬럼의 값을 최신순으로 추출합니다.
    ///
    /// `Date` 컬럼은 숫자가 아니므로 [`PriceHistory::dates`]를 사용합니다.
    pub fn values(&self, column: HistoryColumn) -> Result<Vec<Decimal>> {
        if column == HistoryColumn::Date {
            return Err(CoreError::InvalidColumn {
                input: "date".to_string(),
                available: "open, high, low, close, volume, hl_gap, change".to_string(),
            });
        }
        Ok(self
            .rows
            .iter()
            .map(|row| Self::numeric_key(row, column))
            .collect())
    }

    /// 행들의 날짜를 최신순으로 추출합니다.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|row| row.date).collect()
    }

    fn numeric_key(row: &DailyPrice, column: HistoryColumn) -> Decimal {
        match column {
            HistoryColumn::Open => Decimal::from(row.open),
            HistoryColumn::High => Decimal::from(row.high),
            HistoryColumn::Low => Decimal::from(row.low),
            HistoryColumn::Close => Decimal::from(row.close),
            HistoryColumn::Volume => Decimal::from(row.volume),
            HistoryColumn::HlGap => row.hl_gap(),
            HistoryColumn::Change => row.change(),
            HistoryColumn::Date => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32, close: i64) -> DailyPrice {
        DailyPrice {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: 1_000,
            high: 1_100,
            low: 900,
            close,
            volume: 10_000,
        }
    }

    #[test]
    fn test_hl_gap_and_change() {
        let row = DailyPrice {
            date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            open: 1_000,
            high: 1_100,
            low: 900,
            close: 1_050,
            volume: 1,
        };
        assert_eq!(row.hl_gap(), dec!(20));
        assert_eq!(row.change(), dec!(5));
    }

    #[test]
    fn test_zero_open_defines_zero_percentages() {
        let row = DailyPrice {
            date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            open: 0,
            high: 1_100,
            low: 900,
            close: 1_050,
            volume: 1,
        };
        assert_eq!(row.hl_gap(), Decimal::ZERO);
        assert_eq!(row.change(), Decimal::ZERO);
    }

    #[test]
    fn test_from_rows_sorts_and_dedups() {
        let history = PriceHistory::from_rows(
            "005930",
            vec![
                day(2020, 1, 2, 100),
                day(2020, 1, 6, 400),
                day(2020, 1, 3, 200),
                day(2020, 1, 3, 999), // 같은 날짜는 버려진다
            ],
        );

        assert_eq!(history.len(), 3);
        assert_eq!(
            history.dates(),
            vec![
                NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
                NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            ]
        );
        assert_eq!(history.latest().unwrap().close, 400);
        assert_eq!(history.oldest().unwrap().close, 100);
    }

    #[test]
    fn test_select_top_bottom() {
        let history = PriceHistory::from_rows(
            "005930",
            vec![day(2020, 1, 2, 100), day(2020, 1, 3, 200), day(2020, 1, 6, 400)],
        );

        let top = history.select(Selection::Top(2));
        assert_eq!(top.len(), 2);
        assert_eq!(top.latest().unwrap().close, 400);

        let bottom = history.select(Selection::Bottom(1));
        assert_eq!(bottom.len(), 1);
        assert_eq!(bottom.latest().unwrap().close, 100);

        assert_eq!(history.select(Selection::All).len(), 3);
        assert_eq!(history.select(Selection::Top(99)).len(), 3);
    }

    #[test]
    fn test_select_dates_inclusive() {
        let history = PriceHistory::from_rows(
            "005930",
            vec![day(2020, 1, 2, 100), day(2020, 1, 3, 200), day(2020, 1, 6, 400)],
        );

        let selection = Selection::dates(
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
        )
        .unwrap();
        let window = history.select(selection);
        assert_eq!(window.len(), 2);
        assert_eq!(window.latest().unwrap().close, 200);
        assert_eq!(window.oldest().unwrap().close, 100);
    }

    #[test]
    fn test_selection_dates_validates_order() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert!(matches!(
            Selection::dates(start, end),
            Err(CoreError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_sort_by_column() {
        let mut history = PriceHistory::from_rows(
            "005930",
            vec![day(2020, 1, 2, 300), day(2020, 1, 3, 100), day(2020, 1, 6, 200)],
        );

        history.sort_by(HistoryColumn::Close, true);
        let closes: Vec<i64> = history.rows().iter().map(|row| row.close).collect();
        assert_eq!(closes, vec![100, 200, 300]);

        history.sort_by(HistoryColumn::Date, false);
        assert_eq!(history.latest().unwrap().close, 200);
    }

    #[test]
    fn test_values_rejects_date_column() {
        let history = PriceHistory::from_rows("005930", vec![day(2020, 1, 2, 100)]);
        assert!(history.values(HistoryColumn::Close).is_ok());
        assert!(history.values(HistoryColumn::Date).is_err());
    }

    #[test]
    fn test_column_parsing() {
        assert_eq!("close".parse::<HistoryColumn>().unwrap(), HistoryColumn::Close);
        assert_eq!("HL_GAP".parse::<HistoryColumn>().unwrap(), HistoryColumn::HlGap);
        let err = "macd".parse::<HistoryColumn>().unwrap_err();
        assert!(err.to_string().contains("Possible columns"));
    }
}
