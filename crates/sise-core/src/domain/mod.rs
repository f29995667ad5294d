//! 시세 도메인 모델.

mod daily;
mod market;
mod period;
mod quote;
pub mod stats;

pub use daily::*;
pub use market::*;
pub use period::*;
pub use quote::*;
