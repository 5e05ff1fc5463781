//! Holiday data types (the published `holidays.json` format)

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// A single date entry in the holiday file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HolidayEntry {
    /// `true` for a day off, `false` for a compensatory workday
    #[serde(default, deserialize_with = "flexible_bool")]
    pub holiday: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub wage: i32,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<i32>,
}

/// Some published files carry the holiday flag as a string; any non-empty
/// string means holiday, anything else that isn't a bool means workday.
fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Bool(bool),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Flexible::deserialize(deserializer)? {
        Flexible::Bool(b) => b,
        Flexible::Text(s) => !s.is_empty(),
        Flexible::Other(_) => false,
    })
}

/// One element of the top-level JSON array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayYear {
    pub year: String,
    #[serde(default)]
    pub holiday: HashMap<String, HolidayEntry>,
}

/// Holiday lookup result for one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayInfo {
    /// `true` for a holiday, `false` for a workday (调休)
    pub is_holiday: bool,
    pub name: String,
}

/// Years covered by a holiday file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearInfo {
    pub min_year: i32,
    pub max_year: i32,
    pub count: usize,
}

/// Holiday entries indexed by year, then by "MM-DD"
#[derive(Debug, Clone, Default)]
pub struct HolidayData {
    years: HashMap<String, HashMap<String, HolidayEntry>>,
}

impl HolidayData {
    pub fn from_years(years: Vec<HolidayYear>) -> Self {
        Self {
            years: years.into_iter().map(|y| (y.year, y.holiday)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Holiday information for a date; `None` means no data, not an error
    pub fn lookup(&self, date: NaiveDate) -> Option<HolidayInfo> {
        let year = self.years.get(&date.year().to_string())?;
        let entry = year.get(&format!("{:02}-{:02}", date.month(), date.day()))?;
        Some(HolidayInfo {
            is_holiday: entry.holiday,
            name: entry.name.clone(),
        })
    }

    /// Range of parseable years in the data, `None` if there are none
    pub fn year_info(&self) -> Option<YearInfo> {
        let years: Vec<i32> = self
            .years
            .keys()
            .filter_map(|y| y.parse::<i32>().ok())
            .collect();
        Some(YearInfo {
            min_year: *years.iter().min()?,
            max_year: *years.iter().max()?,
            count: years.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"year": "2025", "holiday": {
            "01-01": {"holiday": true, "name": "元旦", "wage": 3, "date": "2025-01-01"},
            "01-26": {"holiday": false, "name": "春节前补班", "wage": 1, "after": false, "target": "春节", "date": "2025-01-26"},
            "10-01": {"holiday": "yes", "name": "国庆节", "wage": 3, "date": "2025-10-01", "rest": 1}
        }},
        {"year": "2024", "holiday": {}},
        {"year": "bogus", "holiday": {}}
    ]"#;

    fn sample() -> HolidayData {
        let years: Vec<HolidayYear> = serde_json::from_str(SAMPLE).unwrap();
        HolidayData::from_years(years)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lookup_holiday() {
        let info = sample().lookup(date(2025, 1, 1)).unwrap();
        assert!(info.is_holiday);
        assert_eq!(info.name, "元旦");
    }

    #[test]
    fn test_lookup_workday() {
        let info = sample().lookup(date(2025, 1, 26)).unwrap();
        assert!(!info.is_holiday);
    }

    #[test]
    fn test_lookup_missing_is_none() {
        assert!(sample().lookup(date(2025, 1, 2)).is_none());
        assert!(sample().lookup(date(2030, 1, 1)).is_none());
    }

    #[test]
    fn test_string_holiday_flag() {
        let info = sample().lookup(date(2025, 10, 1)).unwrap();
        assert!(info.is_holiday);
    }

    #[test]
    fn test_empty_string_and_other_flags_are_workdays() {
        let entry: HolidayEntry = serde_json::from_str(r#"{"holiday": "", "name": "x"}"#).unwrap();
        assert!(!entry.holiday);
        let entry: HolidayEntry = serde_json::from_str(r#"{"holiday": 1, "name": "x"}"#).unwrap();
        assert!(!entry.holiday);
    }

    #[test]
    fn test_year_info_skips_invalid_years() {
        let info = sample().year_info().unwrap();
        assert_eq!(info.min_year, 2024);
        assert_eq!(info.max_year, 2025);
        assert_eq!(info.count, 2);
    }

    #[test]
    fn test_year_info_empty() {
        assert!(HolidayData::default().year_info().is_none());
    }
}
