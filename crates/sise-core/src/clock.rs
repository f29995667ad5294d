//! 시각 소스.
//!
//! "오늘"이 필요한 로직은 전역 시각 대신 [`Clock`]을 주입받습니다.
//! 테스트에서는 [`FixedClock`]으로 날짜를 고정할 수 있습니다.

use chrono::NaiveDate;
use chrono_tz::Asia::Seoul;

/// 오늘 날짜를 제공하는 시각 소스.
pub trait Clock: Send + Sync {
    /// 오늘 날짜 (한국 거래일 기준).
    fn today(&self) -> NaiveDate;
}

/// 시스템 시각 기반 시계. 한국 시장 기준이므로 KST로 계산합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&Seoul).date_naive()
    }
}

/// 고정된 날짜를 돌려주는 시계.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
