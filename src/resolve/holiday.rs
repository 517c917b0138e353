//! Holiday id → date-of-year rules.
//!
//! Fixed dates, nth/last-weekday rules, Easter offsets, lunar-anchored
//! festivals, and solar terms. Ids are shared across languages; the
//! grammar decides which surface forms map to which id.

use chrono::{Duration, NaiveDate};

use super::calendar::{easter_date, last_dow_of_month, nth_dow_of_month};
use super::lunar;

/// The date a holiday falls on in a given Gregorian year, or `None` when
/// the id is unknown or the year is outside the supported lunar window.
pub fn date_in_year(id: &str, year: i32) -> Option<NaiveDate> {
    match id {
        // Fixed-date holidays.
        "new_year" => NaiveDate::from_ymd_opt(year, 1, 1),
        "valentines" => NaiveDate::from_ymd_opt(year, 2, 14),
        "womens_day" => NaiveDate::from_ymd_opt(year, 3, 8),
        "arbor_day" => NaiveDate::from_ymd_opt(year, 3, 12),
        "st_patricks" => NaiveDate::from_ymd_opt(year, 3, 17),
        "april_fools" => NaiveDate::from_ymd_opt(year, 4, 1),
        "labor_day_cn" => NaiveDate::from_ymd_opt(year, 5, 1),
        "youth_day" => NaiveDate::from_ymd_opt(year, 5, 4),
        "children_day" => NaiveDate::from_ymd_opt(year, 6, 1),
        "independence_day" => NaiveDate::from_ymd_opt(year, 7, 4),
        "army_day" => NaiveDate::from_ymd_opt(year, 8, 1),
        "teachers_day" => NaiveDate::from_ymd_opt(year, 9, 10),
        "national_day" => NaiveDate::from_ymd_opt(year, 10, 1),
        "halloween" => NaiveDate::from_ymd_opt(year, 10, 31),
        "singles_day" | "veterans_day" => NaiveDate::from_ymd_opt(year, 11, 11),
        "christmas_eve" => NaiveDate::from_ymd_opt(year, 12, 24),
        "christmas" => NaiveDate::from_ymd_opt(year, 12, 25),
        "new_year_eve" => NaiveDate::from_ymd_opt(year, 12, 31),
        "groundhog_day" => NaiveDate::from_ymd_opt(year, 2, 2),

        // Weekday-rule holidays.
        "mlk_day" => nth_dow_of_month(year, 1, 0, 3),
        "mothers_day" => nth_dow_of_month(year, 5, 6, 2),
        "fathers_day" => nth_dow_of_month(year, 6, 6, 3),
        "labor_day_us" => nth_dow_of_month(year, 9, 0, 1),
        "thanksgiving" => nth_dow_of_month(year, 11, 3, 4),
        "black_friday" => nth_dow_of_month(year, 11, 3, 4).map(|d| d + Duration::days(1)),
        "memorial_day" => last_dow_of_month(year, 5, 0),

        // Easter-anchored.
        "easter" => easter_date(year),
        "good_friday" => easter_date(year).map(|d| d - Duration::days(2)),

        // Lunar-anchored festivals.
        "spring_festival" => lunar::to_gregorian(year, 1, 1, false),
        "lantern_festival" => lunar::to_gregorian(year, 1, 15, false),
        "dragon_boat" => lunar::to_gregorian(year, 5, 5, false),
        "qixi" => lunar::to_gregorian(year, 7, 7, false),
        "ghost_festival" => lunar::to_gregorian(year, 7, 15, false),
        "mid_autumn" => lunar::to_gregorian(year, 8, 15, false),
        "double_ninth" => lunar::to_gregorian(year, 9, 9, false),
        "laba" => lunar::to_gregorian(year, 12, 8, false),
        // Lunar new year's eve: the occurrence within this Gregorian year,
        // i.e. the day before this year's lunar new year.
        "new_year_eve_cn" => lunar::new_year(year).map(|d| d - Duration::days(1)),

        // Solar terms.
        _ => lunar::term_index(id).and_then(|idx| lunar::solar_term(year, idx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_dates() {
        assert_eq!(date_in_year("national_day", 2025), Some(ymd(2025, 10, 1)));
        assert_eq!(date_in_year("christmas", 2025), Some(ymd(2025, 12, 25)));
    }

    #[test]
    fn test_rule_based() {
        assert_eq!(date_in_year("thanksgiving", 2025), Some(ymd(2025, 11, 27)));
        assert_eq!(date_in_year("black_friday", 2025), Some(ymd(2025, 11, 28)));
        assert_eq!(date_in_year("memorial_day", 2025), Some(ymd(2025, 5, 26)));
        assert_eq!(date_in_year("mothers_day", 2025), Some(ymd(2025, 5, 11)));
    }

    #[test]
    fn test_lunar_anchored() {
        assert_eq!(date_in_year("spring_festival", 2025), Some(ymd(2025, 1, 29)));
        assert_eq!(date_in_year("dragon_boat", 2025), Some(ymd(2025, 5, 31)));
        assert_eq!(date_in_year("mid_autumn", 2025), Some(ymd(2025, 10, 6)));
        // 除夕 in 2025: the day before CNY 2025 (Jan 29) is Jan 28.
        assert_eq!(date_in_year("new_year_eve_cn", 2025), Some(ymd(2025, 1, 28)));
    }

    #[test]
    fn test_solar_terms() {
        assert_eq!(date_in_year("dongzhi", 2025), Some(ymd(2025, 12, 21)));
        assert_eq!(date_in_year("qingming", 2025), Some(ymd(2025, 4, 4)));
    }

    #[test]
    fn test_unknown_id() {
        assert_eq!(date_in_year("not_a_holiday", 2025), None);
    }
}
