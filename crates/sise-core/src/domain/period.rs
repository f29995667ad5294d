//! 상대 기간.

use chrono::{Days, Months, NaiveDate};

use crate::error::{CoreError, Result};

/// 오늘 기준 과거 방향의 상대 기간.
///
/// "6개월 전부터" 같은 조회 구간 지정에 씁니다. 닫힌 variant 집합이므로
/// 둘 이상의 단위를 섞어 쓸 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Period {
    /// 주어진 오늘 날짜에서 이 기간만큼 거슬러 올라간 날짜를 반환합니다.
    ///
    /// 월/년 단위는 달력 기준입니다 (3월 31일의 1개월 전은 2월 말일).
    pub fn before(&self, today: NaiveDate) -> NaiveDate {
        match *self {
            Self::Days(n) => today
                .checked_sub_days(Days::new(u64::from(n)))
                .unwrap_or(NaiveDate::MIN),
            Self::Weeks(n) => today
                .checked_sub_days(Days::new(u64::from(n) * 7))
                .unwrap_or(NaiveDate::MIN),
            Self::Months(n) => today
                .checked_sub_months(Months::new(n))
                .unwrap_or(NaiveDate::MIN),
            Self::Years(n) => today
                .checked_sub_months(Months::new(n.saturating_mul(12)))
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = CoreError;

    /// `30d`, `2w`, `6m`, `1y` 형태를 파싱합니다.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let err = || CoreError::InvalidPeriod {
            input: s.to_string(),
        };

        let unit = s.chars().last().ok_or_else(err)?;
        let count: u32 = s[..s.len() - unit.len_utf8()].parse().map_err(|_| err())?;
        if count == 0 {
            return Err(err());
        }
        match unit {
            'd' | 'D' => Ok(Self::Days(count)),
            'w' | 'W' => Ok(Self::Weeks(count)),
            'm' | 'M' => Ok(Self::Months(count)),
            'y' | 'Y' => Ok(Self::Years(count)),
            _ => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_before_days_and_weeks() {
        let today = date(2020, 1, 31);
        assert_eq!(Period::Days(1).before(today), date(2020, 1, 30));
        assert_eq!(Period::Days(31).before(today), date(2019, 12, 31));
        assert_eq!(Period::Weeks(2).before(today), date(2020, 1, 17));
    }

    #[test]
    fn test_before_months_clamp_to_month_end() {
        // 3월 31일의 1개월 전은 2월 29일(윤년)이다.
        assert_eq!(Period::Months(1).before(date(2020, 3, 31)), date(2020, 2, 29));
        assert_eq!(Period::Months(6).before(date(2020, 1, 15)), date(2019, 7, 15));
    }

    #[test]
    fn test_before_years() {
        assert_eq!(Period::Years(1).before(date(2020, 2, 29)), date(2019, 2, 28));
        assert_eq!(Period::Years(3).before(date(2020, 1, 3)), date(2017, 1, 3));
    }

    #[test]
    fn test_parsing() {
        assert_eq!("30d".parse::<Period>().unwrap(), Period::Days(30));
        assert_eq!("2W".parse::<Period>().unwrap(), Period::Weeks(2));
        assert_eq!("6m".parse::<Period>().unwrap(), Period::Months(6));
        assert_eq!("1y".parse::<Period>().unwrap(), Period::Years(1));

        for bad in ["", "d", "10", "0d", "-3d", "3 months"] {
            assert!(bad.parse::<Period>().is_err(), "should reject {:?}", bad);
        }
    }
}
