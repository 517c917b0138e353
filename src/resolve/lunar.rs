//! Lunar-calendar and solar-term arithmetic.
//!
//! The lunisolar data is the packed per-year table used across open-source
//! Chinese calendar implementations: bits 4–15 give the 12 month lengths
//! (set = 30 days), bits 0–3 the leap month number (0 = none), bit 16 the
//! leap month length. The epoch anchor is 1900-01-31 (lunar 1900/1/1).
//! Supported lunar years: 1900–2049; dates outside the window resolve to
//! `None` and the calling resolver drops the tag.
//!
//! Solar terms use the century-coefficient day formula (day within the
//! term's month = ⌊y·0.2422 + C⌋ − leap-day correction), which matches the
//! published Beijing-time term dates for the supported window.

use chrono::{Duration, NaiveDate};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2049;

#[rustfmt::skip]
static LUNAR_INFO: [u32; 150] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x06e95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b5a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
];

fn info(year: i32) -> Option<u32> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    Some(LUNAR_INFO[(year - MIN_YEAR) as usize])
}

/// Leap month number of a lunar year, 0 when there is none.
pub fn leap_month(year: i32) -> u32 {
    info(year).map(|i| i & 0xf).unwrap_or(0)
}

fn leap_days(year: i32) -> u32 {
    let i = match info(year) {
        Some(i) => i,
        None => return 0,
    };
    if i & 0xf == 0 {
        0
    } else if i & 0x10000 != 0 {
        30
    } else {
        29
    }
}

/// Days in a regular lunar month (1..=12).
fn month_days(year: i32, month: u32) -> u32 {
    match info(year) {
        Some(i) if (1..=12).contains(&month) => {
            if i & (0x10000 >> month) != 0 {
                30
            } else {
                29
            }
        }
        _ => 0,
    }
}

fn year_days(year: i32) -> u32 {
    let mut days = 348;
    if let Some(i) = info(year) {
        let mut bit = 0x8000;
        while bit > 0x8 {
            if i & bit != 0 {
                days += 1;
            }
            bit >>= 1;
        }
    }
    days + leap_days(year)
}

/// Gregorian date of lunar new year (lunar 1/1) for a lunar year.
pub fn new_year(year: i32) -> Option<NaiveDate> {
    info(year)?;
    let mut date = NaiveDate::from_ymd_opt(1900, 1, 31)?;
    for y in MIN_YEAR..year {
        date += Duration::days(i64::from(year_days(y)));
    }
    Some(date)
}

/// Convert a lunar date to its Gregorian date. `leap` requests the leap
/// month of that number, and is rejected when the year has a different
/// (or no) leap month.
pub fn to_gregorian(year: i32, month: u32, day: u32, leap: bool) -> Option<NaiveDate> {
    info(year)?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let lm = leap_month(year);
    if leap && lm != month {
        return None;
    }
    let target_len = if leap { leap_days(year) } else { month_days(year, month) };
    if day == 0 || day > target_len {
        return None;
    }
    let mut offset: i64 = 0;
    for m in 1..month {
        offset += i64::from(month_days(year, m));
        if lm == m {
            offset += i64::from(leap_days(year));
        }
    }
    if leap {
        // The leap month follows the regular month of the same number.
        offset += i64::from(month_days(year, month));
    }
    offset += i64::from(day) - 1;
    Some(new_year(year)? + Duration::days(offset))
}

// Solar term day-of-month coefficients, ordered from 小寒 (index 0, early
// January) through 冬至 (index 23, late December). Terms at even indices
// fall in the first half of their month, odd indices in the second half.
#[rustfmt::skip]
static TERM_C_20TH: [f64; 24] = [
    6.11, 20.84, 4.6295, 19.4599, 6.3826, 21.4155, 5.59, 20.888, 6.318, 21.86, 6.5, 22.2,
    7.928, 23.65, 8.35, 23.95, 8.44, 23.822, 9.098, 24.218, 8.218, 23.08, 7.9, 22.6,
];
#[rustfmt::skip]
static TERM_C_21ST: [f64; 24] = [
    5.4055, 20.12, 3.87, 18.73, 5.63, 20.646, 4.81, 20.1, 5.52, 21.04, 5.678, 21.37,
    7.108, 22.83, 7.5, 23.13, 7.646, 23.042, 8.318, 23.438, 7.438, 22.36, 7.18, 21.94,
];

/// Solar term ids in table order.
pub static TERM_IDS: [&str; 24] = [
    "xiaohan", "dahan", "lichun", "yushui", "jingzhe", "chunfen", "qingming", "guyu",
    "lixia", "xiaoman", "mangzhong", "xiazhi", "xiaoshu", "dashu", "liqiu", "chushu",
    "bailu", "qiufen", "hanlu", "shuangjiang", "lidong", "xiaoxue", "daxue", "dongzhi",
];

/// Gregorian date of the `idx`-th solar term (0 = 小寒) in `year`.
pub fn solar_term(year: i32, idx: usize) -> Option<NaiveDate> {
    if idx >= 24 {
        return None;
    }
    let c = if (1901..=2000).contains(&year) {
        TERM_C_20TH[idx]
    } else if (2001..=2100).contains(&year) {
        TERM_C_21ST[idx]
    } else {
        return None;
    };
    let y = year % 100;
    let leaps = if idx < 4 {
        // January/February terms count the previous year's leap days.
        (y - 1).div_euclid(4)
    } else {
        y.div_euclid(4)
    };
    let day = (f64::from(y) * 0.2422 + c).floor() as i32 - leaps;
    let month = (idx / 2 + 1) as u32;
    NaiveDate::from_ymd_opt(year, month, u32::try_from(day).ok()?)
}

pub fn term_index(id: &str) -> Option<usize> {
    TERM_IDS.iter().position(|t| *t == id)
}
