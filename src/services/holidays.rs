//! Holiday data store
//!
//! Reads the published `holidays.json` from the user cache directory (or an
//! explicit path) and decides whether it is recent enough to trust.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, Months};
use directories::BaseDirs;
use fs2::FileExt;

use crate::types::{HolidayData, HolidayYear, LucalError, Result};

/// Holiday data older than this is considered stale
const CACHE_VALID_MONTHS: u32 = 6;

const APP_DIR: &str = "lucal";
const FILE_NAME: &str = "holidays.json";

pub struct HolidayStore {
    path: PathBuf,
}

impl HolidayStore {
    /// Store at the default cache location
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::default_cache_path()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<user cache dir>/lucal/holidays.json`
    pub fn default_cache_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| LucalError::Config("Cannot determine cache directory".into()))?;
        Ok(base_dirs.cache_dir().join(APP_DIR).join(FILE_NAME))
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// True when the file exists and was modified within the last six months
    pub fn is_cache_valid(&self) -> bool {
        Self::modified(&self.path).is_some_and(|modified| is_fresh(modified, Local::now()))
    }

    /// Load the store's file. A missing file yields empty data.
    pub fn load(&self) -> Result<HolidayData> {
        if !self.exists() {
            tracing::debug!(path = %self.path.display(), "no holiday data on disk");
            return Ok(HolidayData::default());
        }
        Self::load_from_file(&self.path)
    }

    /// Read and parse a holiday file, holding a shared lock while reading
    pub fn load_from_file(path: &Path) -> Result<HolidayData> {
        let mut file = File::open(path)?;
        file.lock_shared()
            .map_err(|e| LucalError::Holiday(format!("Failed to acquire read lock: {}", e)))?;

        let mut bytes = Vec::new();
        let read = file.read_to_end(&mut bytes);
        let _ = file.unlock();
        read?;

        let data = Self::parse(&mut bytes)?;
        if let Some(info) = data.year_info() {
            tracing::debug!(
                path = %path.display(),
                min_year = info.min_year,
                max_year = info.max_year,
                years = info.count,
                "loaded holiday data"
            );
        }
        Ok(data)
    }

    /// Parse the published JSON format. The buffer is used as scratch space.
    pub fn parse(bytes: &mut [u8]) -> Result<HolidayData> {
        let years: Vec<HolidayYear> = simd_json::from_slice(bytes)
            .map_err(|e| LucalError::Holiday(format!("Invalid holiday file: {}", e)))?;
        Ok(HolidayData::from_years(years))
    }

    fn modified(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

/// Whether a file modified at `modified` is still usable at `now`
pub fn is_fresh(modified: SystemTime, now: DateTime<Local>) -> bool {
    let Some(cutoff) = now.checked_sub_months(Months::new(CACHE_VALID_MONTHS)) else {
        return false;
    };
    DateTime::<Local>::from(modified) > cutoff
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
        {"year": "2025", "holiday": {
            "10-01": {"holiday": true, "name": "国庆节", "wage": 3, "date": "2025-10-01"},
            "09-28": {"holiday": false, "name": "国庆节前补班", "wage": 1, "after": false, "target": "国庆节", "date": "2025-09-28"}
        }},
        {"year": "2026", "holiday": {
            "01-01": {"holiday": "true", "name": "元旦", "wage": 3, "date": "2026-01-01"}
        }}
    ]"#;

    fn create_test_store(content: Option<&str>) -> (HolidayStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(FILE_NAME);
        if let Some(content) = content {
            fs::write(&path, content).unwrap();
        }
        (HolidayStore::with_path(path), temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========== loading ==========

    #[test]
    fn test_load_sample() {
        let (store, _temp) = create_test_store(Some(SAMPLE));
        let data = store.load().unwrap();

        let national_day = data.lookup(date(2025, 10, 1)).unwrap();
        assert!(national_day.is_holiday);
        assert_eq!(national_day.name, "国庆节");
        assert!(!data.lookup(date(2025, 9, 28)).unwrap().is_holiday);
        // string flag counts as holiday
        assert!(data.lookup(date(2026, 1, 1)).unwrap().is_holiday);
        assert!(data.lookup(date(2025, 10, 9)).is_none());
    }

    #[test]
    fn test_year_info() {
        let (store, _temp) = create_test_store(Some(SAMPLE));
        let info = store.load().unwrap().year_info().unwrap();
        assert_eq!((info.min_year, info.max_year, info.count), (2025, 2026, 2));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (store, _temp) = create_test_store(None);
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_holiday_error() {
        let (store, _temp) = create_test_store(Some("{ not json"));
        assert!(matches!(store.load(), Err(LucalError::Holiday(_))));
    }

    #[test]
    fn test_wrong_shape_is_holiday_error() {
        let (store, _temp) = create_test_store(Some(r#"{"year": "2025"}"#));
        assert!(matches!(store.load(), Err(LucalError::Holiday(_))));
    }

    #[test]
    fn test_parse_in_place() {
        let mut bytes = SAMPLE.as_bytes().to_vec();
        let data = HolidayStore::parse(&mut bytes).unwrap();
        assert!(!data.is_empty());
    }

    // ========== freshness ==========

    #[test]
    fn test_new_file_is_valid() {
        let (store, _temp) = create_test_store(Some(SAMPLE));
        assert!(store.is_cache_valid());
    }

    #[test]
    fn test_missing_file_is_not_valid() {
        let (store, _temp) = create_test_store(None);
        assert!(!store.is_cache_valid());
    }

    #[test]
    fn test_old_file_is_not_valid() {
        let (store, _temp) = create_test_store(Some(SAMPLE));
        let file = File::options().write(true).open(store.path()).unwrap();
        let long_ago = SystemTime::now() - Duration::from_secs(200 * 24 * 60 * 60);
        file.set_modified(long_ago).unwrap();
        assert!(!store.is_cache_valid());
    }

    #[test]
    fn test_is_fresh_boundary() {
        let now = Local.with_ymd_and_hms(2025, 11, 18, 12, 0, 0).unwrap();
        let five_months = Local.with_ymd_and_hms(2025, 6, 18, 12, 0, 0).unwrap();
        let seven_months = Local.with_ymd_and_hms(2025, 4, 18, 12, 0, 0).unwrap();
        assert!(is_fresh(five_months.into(), now));
        assert!(!is_fresh(seven_months.into(), now));
    }

    #[test]
    fn test_default_cache_path_layout() {
        if let Ok(path) = HolidayStore::default_cache_path() {
            assert!(path.ends_with("lucal/holidays.json"));
        }
    }
}
