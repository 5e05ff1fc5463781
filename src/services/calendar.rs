//! Calendar service: builds month views from the lunar, solar term and
//! holiday sources

use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};

use crate::services::lunar::{LunarSource, TableLunarSource};
use crate::services::solar_term::solar_term_on;
use crate::types::{DayCell, HolidayData, HolidayStatus, LucalError, MonthView, Result, WeekRow};

/// Earliest year that can be displayed
pub const MIN_SUPPORTED_YEAR: i32 = 1900;
/// Latest year that can be displayed. Past the lunar table (2100) the
/// month still renders, with blank labels.
pub const MAX_SUPPORTED_YEAR: i32 = 3000;

pub struct CalendarService {
    today: NaiveDate,
    holidays: HolidayData,
    lunar: Box<dyn LunarSource>,
}

impl CalendarService {
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
            holidays: HolidayData::default(),
            lunar: Box::new(TableLunarSource::new()),
        }
    }

    /// Override the date marked as today
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_holidays(mut self, holidays: HolidayData) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn with_lunar_source(mut self, lunar: Box<dyn LunarSource>) -> Self {
        self.lunar = lunar;
        self
    }

    pub fn has_holiday_data(&self) -> bool {
        !self.holidays.is_empty()
    }

    /// Lay out one month in Sunday-first weeks
    pub fn month(&self, year: i32, month: u32) -> Result<MonthView> {
        if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year) {
            return Err(LucalError::YearOutOfRange(year));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(LucalError::InvalidMonth(i64::from(month)))?;
        let next_first = first
            .checked_add_months(Months::new(1))
            .ok_or(LucalError::YearOutOfRange(year))?;

        let mut cursor = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
        let mut weeks = Vec::with_capacity(6);
        loop {
            let cells = (0..WeekRow::DAYS)
                .map(|offset| self.day_cell(cursor + Duration::days(offset as i64), month))
                .collect();
            weeks.push(WeekRow::new(cells));
            cursor += Duration::days(WeekRow::DAYS as i64);
            if cursor >= next_first && cursor.weekday() == Weekday::Sun {
                break;
            }
        }

        Ok(MonthView {
            year,
            month,
            title: MonthView::title_for(year, month),
            weeks,
        })
    }

    /// All twelve months of `year`
    pub fn year(&self, year: i32) -> Result<Vec<MonthView>> {
        (1..=12).map(|month| self.month(year, month)).collect()
    }

    /// Solar term, else the lunar month on its first day, else the lunar day
    pub fn secondary_label(&self, date: NaiveDate) -> String {
        if let Some(term) = solar_term_on(date) {
            return term.to_string();
        }
        match self.lunar.lunar_date(date) {
            Some(lunar) if lunar.is_first_day() => lunar.month_alias(),
            Some(lunar) => lunar.day_alias(),
            None => String::new(),
        }
    }

    fn day_cell(&self, date: NaiveDate, month: u32) -> DayCell {
        let holiday = self.holidays.lookup(date);
        let holiday_status = match &holiday {
            Some(info) if info.is_holiday => HolidayStatus::Holiday,
            Some(_) => HolidayStatus::Workday,
            None => HolidayStatus::None,
        };
        DayCell {
            date,
            day_of_month: date.day(),
            secondary_label: self.secondary_label(date),
            in_current_month: date.month() == month,
            is_today: date == self.today,
            holiday_status,
            holiday_name: holiday.map(|info| info.name),
        }
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}
