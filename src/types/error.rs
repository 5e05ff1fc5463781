use thiserror::Error;

use crate::services::calendar::{MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};

/// lucal error types
#[derive(Error, Debug)]
pub enum LucalError {
    /// Requested year is outside the range the lunar tables cover
    #[error(
        "年份需要在 {min} 到 {max} 之间 (收到 {0})",
        min = MIN_SUPPORTED_YEAR,
        max = MAX_SUPPORTED_YEAR
    )]
    YearOutOfRange(i32),

    /// Month is not in 1..=12
    #[error("月份需要在 1-12 之间 (收到 {0})")]
    InvalidMonth(i64),

    /// Holiday data could not be read or parsed
    #[error("holiday data error: {0}")]
    Holiday(String),

    /// Holiday download failed
    #[error("download error: {0}")]
    Download(String),

    /// Configuration / argument error
    #[error("{0}")]
    Config(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for lucal
pub type Result<T> = std::result::Result<T, LucalError>;
