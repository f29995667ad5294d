//! 코어 도메인 오류 타입.

use thiserror::Error;

/// 입력 검증 및 도메인 오류.
///
/// 네트워크 호출 이전에 발생하는 오류만 다룹니다. 원격 조회 오류는
/// 클라이언트 크레이트의 오류 타입이 담당합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// 잘못된 종목 코드
    #[error("Invalid stock code `{code}`. A code is 6 letters or digits like `005930`")]
    InvalidCode { code: String },

    /// 잘못된 날짜 형식
    #[error("`{input}` is not a valid date. Use 'YYYY-MM-DD' format with an actual date")]
    InvalidDate { input: String },

    /// 잘못된 날짜 범위
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// 잘못된 행 개수
    #[error("Row count must be greater than 0")]
    InvalidCount,

    /// 잘못된 상대 기간
    #[error("`{input}` is not a valid period. Use a number with d/w/m/y, like `30d` or `6m`")]
    InvalidPeriod { input: String },

    /// 잘못된 시장 이름
    #[error("Market should be either 'KOSPI' or 'KOSDAQ', got `{input}`")]
    InvalidMarket { input: String },

    /// 존재하지 않는 컬럼
    #[error("Unknown column `{input}`. Possible columns are {available}")]
    InvalidColumn { input: String, available: String },
}

/// 코어 작업 Result 타입.
pub type Result<T> = std::result::Result<T, CoreError>;
