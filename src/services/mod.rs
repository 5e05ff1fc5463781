//! Services producing calendar data: lunar dates, solar terms, holidays

pub mod calendar;
pub mod downloader;
pub mod holidays;
pub mod lunar;
pub mod solar_term;

pub use calendar::{CalendarService, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
pub use downloader::{DownloadEvent, DownloadHandle, DownloadProgress, DownloadSummary, HolidayDownloader};
pub use holidays::HolidayStore;
pub use lunar::{LunarDate, LunarSource, TableLunarSource};
pub use solar_term::solar_term_on;
