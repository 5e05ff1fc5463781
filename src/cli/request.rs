//! Positional argument handling: `[YEAR_OR_MONTH] [MONTH]`

use chrono::{Datelike, NaiveDate};

use crate::types::{LucalError, Request, Result, ViewMode};

fn parse_number(value: &str, field: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| LucalError::Config(format!("无法将 {:?} 解析为 {}", value, field)))
}

/// Turn the `-y` flag and positional arguments into a request.
///
/// - no arguments: the current month
/// - one argument: with `-y` it is a year; otherwise 1-12 picks a month of
///   the current year and anything else shows that whole year
/// - two arguments: year and month (not allowed with `-y`)
pub fn parse_request(show_year: bool, args: &[String], today: NaiveDate) -> Result<Request> {
    let mut year = today.year();
    let mut month = today.month() as i32;
    let mut show_year = show_year;

    match args {
        [] => {}
        [value] if show_year => year = parse_number(value, "year")?,
        [value] => {
            let n = parse_number(value, "month/year")?;
            if (1..=12).contains(&n) {
                month = n;
            } else {
                year = n;
                show_year = true;
            }
        }
        [_, _] if show_year => {
            return Err(LucalError::Config(
                "使用 -y 时最多只需要指定一个年份参数".into(),
            ));
        }
        [y, m] => {
            let y = parse_number(y, "year")?;
            let m = parse_number(m, "month")?;
            if !(1..=12).contains(&m) {
                return Err(LucalError::InvalidMonth(i64::from(m)));
            }
            year = y;
            month = m;
        }
        _ => return Err(LucalError::Config("参数过多，请参考 --help".into())),
    }

    let mode = if show_year {
        ViewMode::Year
    } else {
        ViewMode::Month
    };
    Ok(Request { year, month, mode }.normalize())
}
