//! Chinese corpus tests. Reference instant: 2025-01-21T08:00:00Z, a Tuesday.

use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use timetag::{Extraction, Extractor, ExtractorConfig, Language, QueryTag, TimeResult};

fn extractor() -> &'static Extractor {
    static EX: OnceLock<Extractor> = OnceLock::new();
    EX.get_or_init(|| Extractor::new(ExtractorConfig::new(Language::Chinese)).unwrap())
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 21, 8, 0, 0).unwrap()
}

fn run(text: &str) -> Extraction {
    extractor().extract(text, Some(base()))
}

fn iso(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[track_caller]
fn check_point(text: &str, expected: &str, tag: QueryTag) {
    let out = run(text);
    assert_eq!(
        out.results,
        vec![TimeResult::Point(iso(expected))],
        "results for {text:?}"
    );
    assert_eq!(out.query_tag, tag, "query tag for {text:?}");
}

#[track_caller]
fn check_range(text: &str, from: &str, to: &str, tag: QueryTag) {
    let out = run(text);
    assert_eq!(
        out.results,
        vec![TimeResult::Range(iso(from), iso(to))],
        "results for {text:?}"
    );
    assert_eq!(out.query_tag, tag, "query tag for {text:?}");
}

#[track_caller]
fn check_none(text: &str) {
    let out = run(text);
    assert!(out.results.is_empty(), "expected no results for {text:?}, got {:?}", out.results);
    assert_eq!(out.query_tag, QueryTag::None, "query tag for {text:?}");
}

// ---- seed scenarios ----

#[test]
fn test_seed_tomorrow_morning_nine() {
    check_point("明天上午9点", "2025-01-22T09:00:00Z", QueryTag::Relative);
}

#[test]
fn test_seed_range_morning_to_afternoon() {
    check_range(
        "从明天上午9点到下午5点",
        "2025-01-22T09:00:00Z",
        "2025-01-22T17:00:00Z",
        QueryTag::Range,
    );
}

#[test]
fn test_seed_triple_next_monday() {
    check_range(
        "下下下周一",
        "2025-02-10T00:00:00Z",
        "2025-02-10T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_seed_winter_solstice() {
    check_range(
        "冬至那天",
        "2025-12-21T00:00:00Z",
        "2025-12-21T23:59:59Z",
        QueryTag::Holiday,
    );
}

#[test]
fn test_seed_bare_number() {
    check_none("45901");
}

// ---- absolute dates ----

#[test]
fn test_full_date() {
    check_range(
        "2025年1月22日",
        "2025-01-22T00:00:00Z",
        "2025-01-22T23:59:59Z",
        QueryTag::Absolute,
    );
}

#[test]
fn test_iso_date() {
    check_range(
        "2025-03-05",
        "2025-03-05T00:00:00Z",
        "2025-03-05T23:59:59Z",
        QueryTag::Absolute,
    );
}

#[test]
fn test_month_day_defaults_to_base_year() {
    check_range(
        "3月5日",
        "2025-03-05T00:00:00Z",
        "2025-03-05T23:59:59Z",
        QueryTag::Absolute,
    );
}

#[test]
fn test_chinese_numeral_date() {
    check_range(
        "二〇二五年十月一日",
        "2025-10-01T00:00:00Z",
        "2025-10-01T23:59:59Z",
        QueryTag::Absolute,
    );
}

#[test]
fn test_year_month_span() {
    check_range(
        "2026年2月",
        "2026-02-01T00:00:00Z",
        "2026-02-28T23:59:59Z",
        QueryTag::Absolute,
    );
}

#[test]
fn test_year_only_span() {
    check_range(
        "2025年",
        "2025-01-01T00:00:00Z",
        "2025-12-31T23:59:59Z",
        QueryTag::Absolute,
    );
}

#[test]
fn test_month_only_span() {
    check_range(
        "10月",
        "2025-10-01T00:00:00Z",
        "2025-10-31T23:59:59Z",
        QueryTag::Absolute,
    );
}

#[test]
fn test_date_with_clock() {
    check_point("2025年1月22日 14:30", "2025-01-22T14:30:00Z", QueryTag::Absolute);
}

#[test]
fn test_relative_month_with_day() {
    check_range(
        "下个月5号",
        "2025-02-05T00:00:00Z",
        "2025-02-05T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_bare_day_of_month_is_dropped() {
    check_none("5号");
}

#[test]
fn test_invalid_calendar_day_yields_nothing() {
    // 2月30日 parses as a tag but resolves to no valid day; the bare "2月"
    // reading is locked out by the longer match, so nothing is returned.
    check_none("2025年2月30日");
}

// ---- relative days, weeks, months, years ----

#[test]
fn test_named_days() {
    check_range("今天", "2025-01-21T00:00:00Z", "2025-01-21T23:59:59Z", QueryTag::Relative);
    check_range("昨天", "2025-01-20T00:00:00Z", "2025-01-20T23:59:59Z", QueryTag::Relative);
    check_range("大后天", "2025-01-24T00:00:00Z", "2025-01-24T23:59:59Z", QueryTag::Relative);
}

#[test]
fn test_next_week_span() {
    check_range(
        "下周",
        "2025-01-27T00:00:00Z",
        "2025-02-02T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_last_week_friday() {
    check_range(
        "上周五",
        "2025-01-17T00:00:00Z",
        "2025-01-17T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_next_month_span() {
    check_range(
        "下个月",
        "2025-02-01T00:00:00Z",
        "2025-02-28T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_next_year_span() {
    check_range(
        "明年",
        "2026-01-01T00:00:00Z",
        "2026-12-31T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_first_half_year() {
    check_range(
        "上半年",
        "2025-01-01T00:00:00Z",
        "2025-06-30T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_tonight_with_clock() {
    check_point("今晚8点", "2025-01-21T20:00:00Z", QueryTag::Relative);
}

#[test]
fn test_weekend() {
    check_range(
        "周末",
        "2025-01-25T00:00:00Z",
        "2025-01-26T23:59:59Z",
        QueryTag::Relative,
    );
    check_range(
        "下周末",
        "2025-02-01T00:00:00Z",
        "2025-02-02T23:59:59Z",
        QueryTag::Relative,
    );
}

// ---- weekdays ----

#[test]
fn test_bare_weekday_is_current_week() {
    check_range(
        "周四",
        "2025-01-23T00:00:00Z",
        "2025-01-23T23:59:59Z",
        QueryTag::Relative,
    );
    check_range(
        "星期天",
        "2025-01-26T00:00:00Z",
        "2025-01-26T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_nth_weekday_of_month() {
    check_range(
        "10月的第三个星期二",
        "2025-10-21T00:00:00Z",
        "2025-10-21T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_ordinal_weekday_without_month_uses_base_month() {
    check_range(
        "第三个星期二",
        "2025-01-21T00:00:00Z",
        "2025-01-21T23:59:59Z",
        QueryTag::Relative,
    );
}

// ---- periods and clocks ----

#[test]
fn test_afternoon_clock() {
    check_point("下午3点", "2025-01-21T15:00:00Z", QueryTag::Relative);
    // The period's end hour reads inclusively.
    check_point("下午6点", "2025-01-21T18:00:00Z", QueryTag::Relative);
}

#[test]
fn test_twelve_at_night_is_midnight() {
    check_point("晚上12点", "2025-01-21T00:00:00Z", QueryTag::Relative);
}

#[test]
fn test_bare_clock_prefers_next_occurrence() {
    // Base is 08:00; a bare "3点" resolves to 15:00 (within twelve hours),
    // while "9点" is already ahead and stays in the morning.
    check_point("3点", "2025-01-21T15:00:00Z", QueryTag::Relative);
    check_point("9点", "2025-01-21T09:00:00Z", QueryTag::Relative);
}

#[test]
fn test_evening_half_past() {
    check_point("晚上8点半", "2025-01-21T20:30:00Z", QueryTag::Relative);
}

#[test]
fn test_noon_is_a_point() {
    check_point("中午", "2025-01-21T12:00:00Z", QueryTag::Relative);
}

#[test]
fn test_digital_clock() {
    check_point("9:30", "2025-01-21T09:30:00Z", QueryTag::Relative);
}

#[test]
fn test_dawn_clock_tomorrow() {
    check_point("明天凌晨5点", "2025-01-22T05:00:00Z", QueryTag::Relative);
}

#[test]
fn test_quarter_past() {
    check_point("8点一刻", "2025-01-21T08:15:00Z", QueryTag::Relative);
}

// ---- deltas ----

#[test]
fn test_days_later() {
    check_point("3天后", "2025-01-24T08:00:00Z", QueryTag::Relative);
}

#[test]
fn test_hours_later() {
    check_point("两个小时后", "2025-01-21T10:00:00Z", QueryTag::Relative);
}

#[test]
fn test_week_ago() {
    check_point("一周前", "2025-01-14T08:00:00Z", QueryTag::Relative);
}

#[test]
fn test_fuzzy_days() {
    check_point("几天后", "2025-01-24T08:00:00Z", QueryTag::Relative);
}

#[test]
fn test_half_hour_later() {
    check_point("半小时后", "2025-01-21T08:30:00Z", QueryTag::Relative);
}

#[test]
fn test_recent_year_bracket() {
    check_range(
        "近一年",
        "2024-01-21T08:00:00Z",
        "2025-01-21T08:00:00Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_within_days() {
    check_range(
        "三天内",
        "2025-01-21T08:00:00Z",
        "2025-01-24T08:00:00Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_delta_with_clock() {
    check_point("3天后下午3点", "2025-01-24T15:00:00Z", QueryTag::Relative);
}

// ---- holidays ----

#[test]
fn test_fixed_holiday() {
    check_range(
        "国庆节",
        "2025-10-01T00:00:00Z",
        "2025-10-01T23:59:59Z",
        QueryTag::Holiday,
    );
}

#[test]
fn test_spring_festival() {
    check_range(
        "春节",
        "2025-01-29T00:00:00Z",
        "2025-01-29T23:59:59Z",
        QueryTag::Holiday,
    );
}

#[test]
fn test_mid_autumn() {
    check_range(
        "中秋节",
        "2025-10-06T00:00:00Z",
        "2025-10-06T23:59:59Z",
        QueryTag::Holiday,
    );
}

#[test]
fn test_next_year_spring_festival() {
    check_range(
        "明年春节",
        "2026-02-17T00:00:00Z",
        "2026-02-17T23:59:59Z",
        QueryTag::Relative,
    );
}

#[test]
fn test_lunar_new_year_eve() {
    check_range(
        "除夕",
        "2025-01-28T00:00:00Z",
        "2025-01-28T23:59:59Z",
        QueryTag::Holiday,
    );
}

#[test]
fn test_thanksgiving_rule() {
    check_range(
        "感恩节",
        "2025-11-27T00:00:00Z",
        "2025-11-27T23:59:59Z",
        QueryTag::Holiday,
    );
}

#[test]
fn test_solar_terms() {
    check_range(
        "清明节",
        "2025-04-04T00:00:00Z",
        "2025-04-04T23:59:59Z",
        QueryTag::Holiday,
    );
    check_range(
        "立春",
        "2025-02-03T00:00:00Z",
        "2025-02-03T23:59:59Z",
        QueryTag::Holiday,
    );
}

// ---- lunar dates ----

#[test]
fn test_marked_lunar_date() {
    check_range(
        "农历八月十五",
        "2025-10-06T00:00:00Z",
        "2025-10-06T23:59:59Z",
        QueryTag::Lunar,
    );
}

#[test]
fn test_first_lunar_month() {
    check_range(
        "正月初一",
        "2025-01-29T00:00:00Z",
        "2025-01-29T23:59:59Z",
        QueryTag::Lunar,
    );
    check_range(
        "正月十五",
        "2025-02-12T00:00:00Z",
        "2025-02-12T23:59:59Z",
        QueryTag::Lunar,
    );
}

// ---- ranges ----

#[test]
fn test_date_range() {
    check_range(
        "3月5日到3月8日",
        "2025-03-05T00:00:00Z",
        "2025-03-08T23:59:59Z",
        QueryTag::Range,
    );
}

#[test]
fn test_clock_range() {
    check_range(
        "9点到11点",
        "2025-01-21T09:00:00Z",
        "2025-01-21T11:00:00Z",
        QueryTag::Range,
    );
}

#[test]
fn test_cross_midnight_range() {
    check_range(
        "晚上8点到早上6点",
        "2025-01-21T20:00:00Z",
        "2025-01-22T06:00:00Z",
        QueryTag::Range,
    );
}

#[test]
fn test_day_range() {
    check_range(
        "从今天到后天",
        "2025-01-21T00:00:00Z",
        "2025-01-23T23:59:59Z",
        QueryTag::Range,
    );
}

// ---- centuries and decades ----

#[test]
fn test_century_decade_qualified() {
    check_range(
        "20世纪60年代前期",
        "1960-01-01T00:00:00Z",
        "1962-12-31T23:59:59Z",
        QueryTag::Range,
    );
}

#[test]
fn test_last_century() {
    check_range(
        "上个世纪",
        "1900-01-01T00:00:00Z",
        "1999-12-31T23:59:59Z",
        QueryTag::Range,
    );
}

#[test]
fn test_bare_decade() {
    check_range(
        "80年代",
        "1980-01-01T00:00:00Z",
        "1989-12-31T23:59:59Z",
        QueryTag::Range,
    );
}

// ---- recurring ----

#[test]
fn test_every_day() {
    check_range(
        "每天",
        "2025-01-21T00:00:00Z",
        "2025-01-21T23:59:59Z",
        QueryTag::Recurring,
    );
}

#[test]
fn test_every_wednesday() {
    check_range(
        "每周三",
        "2025-01-22T00:00:00Z",
        "2025-01-22T23:59:59Z",
        QueryTag::Recurring,
    );
}

#[test]
fn test_every_morning_clock() {
    check_point("每天早上8点", "2025-01-21T08:00:00Z", QueryTag::Recurring);
}

#[test]
fn test_every_year_date() {
    check_range(
        "每年10月1日",
        "2025-10-01T00:00:00Z",
        "2025-10-01T23:59:59Z",
        QueryTag::Recurring,
    );
}

// ---- multiple expressions ----

#[test]
fn test_two_independent_expressions() {
    let out = run("明天下午3点，周五上午9点");
    assert_eq!(
        out.results,
        vec![
            TimeResult::Point(iso("2025-01-22T15:00:00Z")),
            TimeResult::Point(iso("2025-01-24T09:00:00Z")),
        ]
    );
    assert_eq!(out.query_tag, QueryTag::Relative);
}

// ---- disambiguation guards ----

#[test]
fn test_noise_degree_constructions() {
    check_none("简洁一点");
    check_none("快一点");
}

#[test]
fn test_noise_idiom() {
    check_none("一日之计在于晨");
}

#[test]
fn test_noise_name_collision() {
    check_none("黎明的演唱会");
}

#[test]
fn test_noise_id_like_digits() {
    check_none("身份证号110101199003071234");
}

// ---- universal properties ----

#[test]
fn test_determinism() {
    for text in ["明天上午9点", "从今天到后天", "冬至", "乱七八糟"] {
        assert_eq!(run(text), run(text), "non-deterministic for {text:?}");
    }
}

#[test]
fn test_interval_validity_everywhere() {
    let inputs = [
        "明天上午9点", "从明天上午9点到下午5点", "下下下周一", "冬至那天",
        "晚上8点到早上6点", "近一年", "上个世纪", "每周三", "农历八月十五",
        "10月的第三个星期二", "2025年2月", "下周末",
    ];
    for text in inputs {
        for result in run(text).results {
            if let TimeResult::Range(from, to) = result {
                assert!(from <= to, "inverted interval for {text:?}");
            }
        }
    }
}

#[test]
fn test_base_time_linearity_for_day_delta() {
    let ex = extractor();
    let shifted = base() + chrono::Duration::hours(5);
    let a = ex.extract("3天后", Some(base()));
    let b = ex.extract("3天后", Some(shifted));
    match (&a.results[0], &b.results[0]) {
        (TimeResult::Point(p), TimeResult::Point(q)) => {
            assert_eq!(*q - *p, chrono::Duration::hours(5));
        }
        other => panic!("expected points, got {other:?}"),
    }
}
