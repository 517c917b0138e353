//! Calendar arithmetic helpers shared by the resolvers.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Add months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let total = i64::from(date.year())
        .checked_mul(12)?
        .checked_add(i64::from(date.month()) - 1)?
        .checked_add(months)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = (total.rem_euclid(12) + 1) as u32;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Add years, clamping Feb 29 to Feb 28 off leap years.
pub fn add_years(date: NaiveDate, years: i64) -> Option<NaiveDate> {
    let year = i32::try_from(i64::from(date.year()).checked_add(years)?).ok()?;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

/// Monday of the week containing `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let back = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(back)
}

/// The `n`-th (1-based) occurrence of `dow` (0=Monday) in a month.
pub fn nth_dow_of_month(year: i32, month: u32, dow: u32, n: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_dow = first.weekday().num_days_from_monday();
    let offset = (dow + 7 - first_dow) % 7;
    let day = 1 + offset + (n.checked_sub(1)?) * 7;
    if day > days_in_month(year, month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The final occurrence of `dow` (0=Monday) in a month.
pub fn last_dow_of_month(year: i32, month: u32, dow: u32) -> Option<NaiveDate> {
    let last_day = days_in_month(year, month);
    let last = NaiveDate::from_ymd_opt(year, month, last_day)?;
    let last_dow = last.weekday().num_days_from_monday();
    let back = (last_dow + 7 - dow) % 7;
    Some(last - Duration::days(i64::from(back)))
}

/// Gauss computus: Gregorian Easter Sunday.
pub fn easter_date(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = ((h + l - 7 * m + 114) / 31) as u32;
    let day = ((h + l - 7 * m + 114) % 31 + 1) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Instants outside this window are dropped by resolvers.
pub fn in_era(dt: &DateTime<Utc>) -> bool {
    (1..=9999).contains(&dt.year())
}

pub fn day_start(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

pub fn day_end(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(23, 59, 59)?.and_utc())
}

/// Keep the wall-clock time of `base` while moving to `date`.
pub fn with_clock_of(date: NaiveDate, base: &DateTime<Utc>) -> Option<DateTime<Utc>> {
    Some(
        date.and_hms_opt(base.hour(), base.minute(), base.second())?
            .and_utc(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month_leap() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn test_add_months_clamps() {
        let jan31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            add_months(jan31, 1),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
        assert_eq!(
            add_months(jan31, -2),
            NaiveDate::from_ymd_opt(2024, 11, 30)
        );
    }

    #[test]
    fn test_monday_of_week() {
        // 2025-01-21 is a Tuesday.
        let tue = NaiveDate::from_ymd_opt(2025, 1, 21).unwrap();
        assert_eq!(monday_of_week(tue), NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
        let mon = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert_eq!(monday_of_week(mon), mon);
    }

    #[test]
    fn test_nth_dow_of_month() {
        // Thanksgiving 2025: 4th Thursday of November = Nov 27.
        assert_eq!(
            nth_dow_of_month(2025, 11, 3, 4),
            NaiveDate::from_ymd_opt(2025, 11, 27)
        );
        // First Tuesday of October 2025 = Oct 7.
        assert_eq!(
            nth_dow_of_month(2025, 10, 1, 1),
            NaiveDate::from_ymd_opt(2025, 10, 7)
        );
        // No fifth Monday in February 2025.
        assert_eq!(nth_dow_of_month(2025, 2, 0, 5), None);
    }

    #[test]
    fn test_last_dow_of_month() {
        // Memorial Day 2025: last Monday of May = May 26.
        assert_eq!(
            last_dow_of_month(2025, 5, 0),
            NaiveDate::from_ymd_opt(2025, 5, 26)
        );
    }

    #[test]
    fn test_easter() {
        assert_eq!(easter_date(2025), NaiveDate::from_ymd_opt(2025, 4, 20));
        assert_eq!(easter_date(2024), NaiveDate::from_ymd_opt(2024, 3, 31));
    }
}
