//! 네이버 금융 클라이언트 오류 타입.

use thiserror::Error;

/// 원격 조회 오류.
///
/// 원격이 죽은 경우(`Http`)와 원격이 예상 밖의 문서를 돌려준 경우(`Parse`)를
/// 구분합니다. 페이지 범위 초과는 오류가 아니라 [`crate::client::Page::End`]로
/// 표현됩니다.
#[derive(Debug, Error)]
pub enum NaverError {
    /// HTTP 전송 오류
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 성공이 아닌 응답 상태
    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// 요청 한도 초과
    #[error("Rate limited by remote")]
    RateLimited,

    /// 응답 본문 디코딩 실패
    #[error("Failed to decode response body as EUC-KR: {url}")]
    Decode { url: String },

    /// 문서 구조가 예상과 다름
    #[error("Unexpected document shape: {0}")]
    Parse(String),

    /// 종목을 찾을 수 없음
    #[error("No stock was found with code `{code}`")]
    SymbolNotFound { code: String },

    /// 입력 검증 오류
    #[error(transparent)]
    Invalid(#[from] sise_core::CoreError),
}

/// 네이버 클라이언트 Result 타입.
pub type Result<T> = std::result::Result<T, NaverError>;
