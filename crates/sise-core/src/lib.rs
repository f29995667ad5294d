//! # Sise Core
//!
//! 한국 주식 시세 툴킷의 핵심 도메인 모델과 타입을 제공합니다:
//! - 현재가 스냅샷, 일별 시세 이력, 시장 순위 스냅샷
//! - 행 선택/정렬/컬럼 추출
//! - 종목 코드, 상대 기간, 주입형 시계
//! - 설정 관리 및 로깅 인프라

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use clock::*;
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
