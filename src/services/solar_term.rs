//! The 24 solar terms (节气)
//!
//! Computed with the century-constant approximation
//! `day = floor(Y * 0.2422 + C) - L`, where `Y` is the year within the
//! century and `L` the number of leap years before it. Valid for 1901-2100
//! once the handful of published corrections are applied.

use chrono::{Datelike, NaiveDate};

const FIRST_YEAR: i32 = 1901;
const LAST_YEAR: i32 = 2100;

const YEAR_FACTOR: f64 = 0.2422;

/// Two terms per month, January first
const TERM_NAMES: [&str; 24] = [
    "小寒", "大寒", "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至",
    "小暑", "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至",
];

#[rustfmt::skip]
const C_20TH: [f64; 24] = [
    6.11, 20.84, 4.6295, 19.4599, 6.3826, 21.4155, 5.59, 20.888, 6.318, 21.86, 6.5, 22.2,
    7.928, 23.65, 8.35, 23.95, 8.44, 23.822, 9.098, 24.218, 8.218, 23.08, 7.9, 22.6,
];

#[rustfmt::skip]
const C_21ST: [f64; 24] = [
    5.4055, 20.12, 3.87, 18.73, 5.63, 20.646, 4.81, 20.1, 5.52, 21.04, 5.678, 21.37,
    7.108, 22.83, 7.5, 23.13, 7.646, 23.042, 8.318, 23.438, 7.438, 22.36, 7.18, 21.94,
];

/// (year, term index, day correction) where the formula is off by one
#[rustfmt::skip]
const CORRECTIONS: [(i32, usize, i32); 21] = [
    (1982, 0, 1), (2019, 0, -1), (2082, 1, 1), (2026, 3, -1), (2084, 5, 1),
    (1911, 8, 1), (2008, 9, 1), (1902, 10, 1), (1928, 11, 1), (1925, 12, 1),
    (2016, 12, 1), (1922, 13, 1), (2002, 14, 1), (1927, 16, 1), (1942, 17, 1),
    (2089, 19, 1), (2089, 20, 1), (1978, 21, 1), (1954, 22, 1), (1918, 23, -1),
    (2021, 23, -1),
];

/// Day of month on which term `index` falls in `year`
fn term_day(year: i32, index: usize) -> Option<u32> {
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        return None;
    }
    let (y, constants) = if year >= 2000 {
        (year - 2000, &C_21ST)
    } else {
        (year - 1900, &C_20TH)
    };
    // 小寒 大寒 立春 雨水 fall before the leap day of their own year
    let leap_years = if index < 4 { (y - 1).div_euclid(4) } else { y.div_euclid(4) };
    let base = (f64::from(y) * YEAR_FACTOR + constants[index]).floor() as i32 - leap_years;
    let correction = CORRECTIONS
        .iter()
        .find(|(cy, ci, _)| *cy == year && *ci == index)
        .map_or(0, |(_, _, c)| *c);
    u32::try_from(base + correction).ok()
}

/// Name of the solar term falling on `date`, if any
pub fn solar_term_on(date: NaiveDate) -> Option<&'static str> {
    let first = (date.month0() * 2) as usize;
    (first..first + 2)
        .find(|&idx| term_day(date.year(), idx) == Some(date.day()))
        .map(|idx| TERM_NAMES[idx])
}
