//! CLI 명령어 구현 모듈.

pub mod capture;
pub mod history;
pub mod quote;
pub mod summary;
