//! Calendar view types shared by the date service and the renderer

use chrono::NaiveDate;

/// Holiday classification of a single Gregorian day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HolidayStatus {
    #[default]
    None,
    /// Public holiday (day off)
    Holiday,
    /// Compensatory working day (调休) on what would be a weekend
    Workday,
}

/// A single day as handed to the grid builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day_of_month: u32,
    /// Solar term, lunar month name or lunar day name; empty when unknown
    pub secondary_label: String,
    pub in_current_month: bool,
    pub is_today: bool,
    pub holiday_status: HolidayStatus,
    /// Holiday name from the holiday data, if any
    pub holiday_name: Option<String>,
}

/// Seven consecutive days, Sunday first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    cells: Vec<DayCell>,
}

impl WeekRow {
    pub const DAYS: usize = 7;

    /// # Panics
    ///
    /// Panics unless exactly seven cells are given. A short or long week means
    /// the date service is broken, and rendering it would misalign every column.
    pub fn new(cells: Vec<DayCell>) -> Self {
        assert_eq!(
            cells.len(),
            Self::DAYS,
            "a week row needs exactly {} days, got {}",
            Self::DAYS,
            cells.len()
        );
        Self { cells }
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }
}

/// One month laid out into Sunday-first weeks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub weeks: Vec<WeekRow>,
}

impl MonthView {
    /// Title used above every month block, e.g. "2025 年 11 月"
    pub fn title_for(year: i32, month: u32) -> String {
        format!("{} 年 {} 月", year, month)
    }
}

/// Whether a request shows a single month or the whole year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Month,
    Year,
}

/// Year/month/mode that should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub year: i32,
    /// May be outside 1..=12 until normalized
    pub month: i32,
    pub mode: ViewMode,
}

impl Request {
    /// Keep the month within 1..=12 by rolling the year
    pub fn normalize(self) -> Self {
        let zero_based = self.month - 1;
        Self {
            year: self.year + zero_based.div_euclid(12),
            month: zero_based.rem_euclid(12) + 1,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(day: u32) -> DayCell {
        DayCell {
            date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            day_of_month: day,
            secondary_label: String::new(),
            in_current_month: true,
            is_today: false,
            holiday_status: HolidayStatus::None,
            holiday_name: None,
        }
    }

    #[test]
    fn test_week_row_accepts_seven_days() {
        let row = WeekRow::new((1..=7).map(cell).collect());
        assert_eq!(row.cells().len(), 7);
        assert_eq!(row.cells()[0].day_of_month, 1);
    }

    #[test]
    #[should_panic(expected = "exactly 7 days")]
    fn test_week_row_rejects_short_week() {
        WeekRow::new((1..=6).map(cell).collect());
    }

    #[test]
    fn test_title_format() {
        assert_eq!(MonthView::title_for(2025, 11), "2025 年 11 月");
    }

    #[test]
    fn test_request_normalize_in_range() {
        let req = Request {
            year: 2025,
            month: 5,
            mode: ViewMode::Month,
        };
        assert_eq!(req.normalize(), req);
    }

    #[test]
    fn test_request_normalize_overflow() {
        let req = Request {
            year: 2025,
            month: 14,
            mode: ViewMode::Month,
        }
        .normalize();
        assert_eq!((req.year, req.month), (2026, 2));
    }

    #[test]
    fn test_request_normalize_underflow() {
        let req = Request {
            year: 2025,
            month: 0,
            mode: ViewMode::Month,
        }
        .normalize();
        assert_eq!((req.year, req.month), (2024, 12));

        let req = Request {
            year: 2025,
            month: -12,
            mode: ViewMode::Year,
        }
        .normalize();
        assert_eq!((req.year, req.month), (2023, 12));
        assert_eq!(req.mode, ViewMode::Year);
    }
}
