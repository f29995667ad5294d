//! 공용 기본 타입.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// 검증된 종목 코드.
///
/// 네이버 금융이 쓰는 6자리 코드입니다. 대부분 숫자이지만 우선주/ETN 등은
/// 영문자가 섞일 수 있습니다 (예: `00088K`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockCode(String);

impl StockCode {
    /// 코드를 검증해서 생성합니다. 6자리 영문/숫자가 아니면 오류입니다.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into().trim().to_string();
        let valid = code.len() == 6 && code.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(CoreError::InvalidCode { code });
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StockCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StockCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for StockCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// 정수를 세 자리마다 쉼표로 묶어 표시합니다. 페이지 표기와 같은 형식입니다.
pub fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
