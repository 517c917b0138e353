//! Specialized resolvers: one branch per tag family.
//!
//! Each resolver is a pure function of `(tag, base, ctx)`; the context
//! carries anchors already established by the merger (an explicit year for
//! "明年春节", a month for "十月的第三个星期二" said with the month in an
//! earlier tag). Resolvers never do I/O and never fail loudly; a tag that
//! cannot be resolved is dropped.

pub mod calendar;
pub mod holiday;
pub mod lunar;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};

use crate::tag::{Meridiem, PeriodKind, SpanQualifier, Tag, Unit, WeekMod};
use self::calendar::{add_months, add_years, days_in_month, monday_of_week};

/// A standalone resolution of a date-like tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved {
    /// One calendar day.
    Day(NaiveDate),
    /// An inclusive span of days (week, month, decade, weekend...).
    DaySpan(NaiveDate, NaiveDate),
    /// An exact instant (fine-grained deltas).
    Moment(DateTime<Utc>),
    /// An instant span ("近一年", "the past 3 days").
    MomentSpan(DateTime<Utc>, DateTime<Utc>),
}

impl Resolved {
    /// The day used when a later clock or period tag narrows this anchor.
    pub fn anchor_day(&self) -> NaiveDate {
        match self {
            Resolved::Day(d) => *d,
            Resolved::DaySpan(a, _) => *a,
            Resolved::Moment(m) => m.date_naive(),
            Resolved::MomentSpan(a, _) => a.date_naive(),
        }
    }
}

/// Anchors carried from already-processed tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveCtx {
    /// Year anchor, e.g. from "明年" or "2026年" preceding a holiday.
    pub year: Option<i32>,
    /// Month anchor `(year, month)` for nth-weekday references.
    pub month: Option<(i32, u32)>,
}

fn month_span(year: i32, month: u32) -> Option<Resolved> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
    Some(Resolved::DaySpan(first, last))
}

fn year_span(year: i32, half: Option<u32>) -> Option<Resolved> {
    let (from, to) = match half {
        Some(1) => ((1, 1), (6, 30)),
        Some(2) => ((7, 1), (12, 31)),
        _ => ((1, 1), (12, 31)),
    };
    Some(Resolved::DaySpan(
        NaiveDate::from_ymd_opt(year, from.0, from.1)?,
        NaiveDate::from_ymd_opt(year, to.0, to.1)?,
    ))
}

/// Narrow a run of `len` years starting at `start` by a qualifier. Decades
/// split 3/4/3, centuries by thirds.
fn qualify_years(start: i32, len: i32, qualifier: SpanQualifier) -> (i32, i32) {
    let third = len / 3;
    match qualifier {
        SpanQualifier::All => (start, start + len - 1),
        SpanQualifier::Early => (start, start + third - 1),
        SpanQualifier::Mid => (start + third, start + len - third - 1),
        SpanQualifier::Late => (start + len - third, start + len - 1),
    }
}

fn years_span(start: i32, len: i32, qualifier: SpanQualifier) -> Option<Resolved> {
    let (from, to) = qualify_years(start, len, qualifier);
    Some(Resolved::DaySpan(
        NaiveDate::from_ymd_opt(from, 1, 1)?,
        NaiveDate::from_ymd_opt(to, 12, 31)?,
    ))
}

fn shift(base: DateTime<Utc>, unit: Unit, n: i64) -> Option<DateTime<Utc>> {
    match unit {
        Unit::Second => base.checked_add_signed(Duration::try_seconds(n)?),
        Unit::Minute => base.checked_add_signed(Duration::try_minutes(n)?),
        Unit::Hour => base.checked_add_signed(Duration::try_hours(n)?),
        Unit::Day => base.checked_add_signed(Duration::try_days(n)?),
        Unit::Week => base.checked_add_signed(Duration::try_days(n.checked_mul(7)?)?),
        Unit::Month => {
            let date = add_months(base.date_naive(), n)?;
            calendar::with_clock_of(date, &base)
        }
        Unit::Year => {
            let date = add_years(base.date_naive(), n)?;
            calendar::with_clock_of(date, &base)
        }
    }
}

fn resolve_week_tag(
    weekday: u32,
    modifier: WeekMod,
    month: Option<u32>,
    weekend: bool,
    base: DateTime<Utc>,
    ctx: &ResolveCtx,
) -> Option<Resolved> {
    let today = base.date_naive();
    if weekend {
        let weeks: i64 = match modifier {
            WeekMod::Next => 1,
            WeekMod::Last => -1,
            _ => 0,
        };
        let saturday = monday_of_week(today)
            .checked_add_signed(Duration::try_days(weeks * 7 + 5)?)?;
        return Some(Resolved::DaySpan(saturday, saturday + Duration::days(1)));
    }
    match modifier {
        WeekMod::This | WeekMod::Next | WeekMod::Last | WeekMod::AfterNext => {
            let weeks: i64 = match modifier {
                WeekMod::Next => 1,
                WeekMod::Last => -1,
                WeekMod::AfterNext => 2,
                _ => 0,
            };
            let day = monday_of_week(today)
                .checked_add_signed(Duration::try_days(weeks * 7 + i64::from(weekday))?)?;
            Some(Resolved::Day(day))
        }
        WeekMod::Nth(k) => {
            let (year, m) = anchor_month(month, base, ctx);
            calendar::nth_dow_of_month(year, m, weekday, k).map(Resolved::Day)
        }
        WeekMod::LastOf => {
            let (year, m) = anchor_month(month, base, ctx);
            calendar::last_dow_of_month(year, m, weekday).map(Resolved::Day)
        }
    }
}

fn anchor_month(tag_month: Option<u32>, base: DateTime<Utc>, ctx: &ResolveCtx) -> (i32, u32) {
    match (tag_month, ctx.month) {
        (Some(m), _) => (ctx.year.unwrap_or(base.year()), m),
        (None, Some((y, m))) => (y, m),
        (None, None) => (base.year(), base.month()),
    }
}

fn resolve_recur(
    unit: Unit,
    weekday: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    base: DateTime<Utc>,
) -> Option<Resolved> {
    let today = base.date_naive();
    match unit {
        Unit::Day => Some(Resolved::Day(today)),
        Unit::Week => match weekday {
            Some(w) => {
                let mut target =
                    monday_of_week(today).checked_add_signed(Duration::try_days(i64::from(w))?)?;
                if target < today {
                    target += Duration::days(7);
                }
                Some(Resolved::Day(target))
            }
            None => {
                let monday = monday_of_week(today);
                Some(Resolved::DaySpan(monday, monday + Duration::days(6)))
            }
        },
        Unit::Month => match day {
            Some(d) => {
                let mut year = base.year();
                let mut m = base.month();
                for _ in 0..2 {
                    if d <= days_in_month(year, m) {
                        let candidate = NaiveDate::from_ymd_opt(year, m, d)?;
                        if candidate >= today {
                            return Some(Resolved::Day(candidate));
                        }
                    }
                    let next = add_months(NaiveDate::from_ymd_opt(year, m, 1)?, 1)?;
                    year = next.year();
                    m = next.month();
                }
                NaiveDate::from_ymd_opt(year, m, d).map(Resolved::Day)
            }
            None => month_span(base.year(), base.month()),
        },
        Unit::Year => match (month, day) {
            (Some(m), Some(d)) => {
                let candidate = NaiveDate::from_ymd_opt(base.year(), m, d);
                match candidate {
                    Some(c) if c >= today => Some(Resolved::Day(c)),
                    _ => NaiveDate::from_ymd_opt(base.year() + 1, m, d).map(Resolved::Day),
                }
            }
            _ => year_span(base.year(), None),
        },
        Unit::Hour => {
            let truncated = base.date_naive().and_hms_opt(base.hour(), 0, 0)?.and_utc();
            truncated
                .checked_add_signed(Duration::try_hours(1)?)
                .map(Resolved::Moment)
        }
        _ => None,
    }
}

/// Resolve a date-like tag to a standalone value. Returns `None` for tag
/// families the merger handles itself (clock, period, connectors) and for
/// unresolvable dates (invalid calendar day, outside the lunar window,
/// outside the supported era).
pub fn resolve_date(tag: &Tag, base: DateTime<Utc>, ctx: &ResolveCtx) -> Option<Resolved> {
    let resolved = match tag {
        Tag::Utc { year, month, day } => match (year, month, day) {
            (y, Some(m), Some(d)) => {
                let year = y.or(ctx.year).unwrap_or(base.year());
                NaiveDate::from_ymd_opt(year, *m, *d).map(Resolved::Day)
            }
            (y, Some(m), None) => {
                let year = y.or(ctx.year).unwrap_or(base.year());
                month_span(year, *m)
            }
            (Some(y), None, None) => year_span(*y, None),
            _ => None,
        },
        Tag::Rel {
            unit,
            offset,
            weekday,
            half,
            ..
        } => {
            let today = base.date_naive();
            match unit {
                Unit::Day => today
                    .checked_add_signed(Duration::try_days(i64::from(*offset))?)
                    .map(Resolved::Day),
                Unit::Week => {
                    let monday = monday_of_week(today)
                        .checked_add_signed(Duration::try_days(i64::from(*offset) * 7)?)?;
                    match weekday {
                        Some(w) => monday
                            .checked_add_signed(Duration::try_days(i64::from(*w))?)
                            .map(Resolved::Day),
                        None => Some(Resolved::DaySpan(monday, monday + Duration::days(6))),
                    }
                }
                Unit::Month => {
                    let first = NaiveDate::from_ymd_opt(base.year(), base.month(), 1)?;
                    let shifted = add_months(first, i64::from(*offset))?;
                    month_span(shifted.year(), shifted.month())
                }
                Unit::Year => year_span(base.year().checked_add(*offset)?, *half),
                _ => None,
            }
        }
        Tag::Week {
            weekday,
            modifier,
            month,
            weekend,
        } => resolve_week_tag(*weekday, *modifier, *month, *weekend, base, ctx),
        Tag::Holiday { id } => {
            let year = ctx.year.unwrap_or_else(|| base.year());
            holiday::date_in_year(id, year).map(Resolved::Day)
        }
        Tag::Lunar {
            year,
            month,
            day,
            leap,
        } => {
            let year = year.or(ctx.year).unwrap_or_else(|| base.year());
            lunar::to_gregorian(year, *month, *day, *leap).map(Resolved::Day)
        }
        Tag::Delta {
            unit,
            amount,
            dir,
            bracket,
            ..
        } => {
            let n = amount.checked_mul(i64::from(*dir))?;
            let shifted = shift(base, *unit, n)?;
            if *bracket {
                let (from, to) = if shifted <= base {
                    (shifted, base)
                } else {
                    (base, shifted)
                };
                Some(Resolved::MomentSpan(from, to))
            } else {
                Some(Resolved::Moment(shifted))
            }
        }
        Tag::Century {
            value,
            offset,
            qualifier,
        } => {
            let start = match (value, offset) {
                (Some(v), _) => i32::try_from(*v).ok()?.checked_sub(1)?.checked_mul(100)?,
                (None, Some(o)) => (base.year().div_euclid(100)).checked_add(*o)?.checked_mul(100)?,
                (None, None) => return None,
            };
            years_span(start, 100, *qualifier)
        }
        Tag::Decade {
            value,
            century,
            qualifier,
        } => {
            let v = i32::try_from(*value).ok()?;
            let start = match century {
                Some(c) => i32::try_from(*c).ok()?.checked_sub(1)?.checked_mul(100)? + v % 100,
                None if v >= 100 => v - v % 10,
                None => {
                    let decade = v - v % 10;
                    if decade >= 30 {
                        1900 + decade
                    } else {
                        2000 + decade
                    }
                }
            };
            years_span(start, 10, *qualifier)
        }
        Tag::Recur {
            unit,
            weekday,
            month,
            day,
            ..
        } => resolve_recur(*unit, *weekday, *month, *day, base),
        _ => None,
    };

    // Era sanity: drop anything outside year 1..=9999.
    resolved.filter(|r| match r {
        Resolved::Day(d) => (1..=9999).contains(&d.year()),
        Resolved::DaySpan(a, b) => (1..=9999).contains(&a.year()) && (1..=9999).contains(&b.year()),
        Resolved::Moment(m) => calendar::in_era(m),
        Resolved::MomentSpan(a, b) => calendar::in_era(a) && calendar::in_era(b),
    })
}

/// Resolve a clock reading on a given day. `period` disambiguates a
/// 12-hour-ambiguous hour; without one, an unanchored clock prefers the
/// next future occurrence within twelve hours of the base.
pub fn resolve_clock(
    hour: u32,
    minute: u32,
    second: u32,
    meridiem: Option<Meridiem>,
    period: Option<PeriodKind>,
    anchored: bool,
    day: NaiveDate,
    base: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let ambiguous = meridiem.is_none() && hour <= 12;
    let h = match meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour + 12,
        Some(Meridiem::Am) if hour == 12 => 0,
        Some(_) => hour,
        None if !ambiguous => hour,
        None => match period {
            // Hour 12 on the evening side of the day is midnight ("晚上12点").
            Some(PeriodKind::Evening) | Some(PeriodKind::Night) | Some(PeriodKind::Midnight)
                if hour == 12 =>
            {
                0
            }
            // "中午1点" reads as 13:00.
            Some(PeriodKind::Noon) if hour < 6 => hour + 12,
            Some(p) => {
                let (start_h, end_h) = p.bounds();
                let shifted = hour + 12;
                // End hour inclusive: "下午6点" is 18:00, like "晚上6点".
                // An explicit hour 0 stays literal.
                if (1..12).contains(&hour) && shifted <= 23 && shifted >= start_h && shifted <= end_h
                {
                    shifted
                } else {
                    hour
                }
            }
            None if !anchored => {
                let t1 = day.and_hms_opt(hour, minute, second)?.and_utc();
                let shifted = hour + 12;
                if t1 >= base || shifted > 23 {
                    hour
                } else {
                    let t2 = day.and_hms_opt(shifted, minute, second)?.and_utc();
                    if t2 >= base && t2 - base <= Duration::hours(12) {
                        shifted
                    } else {
                        hour
                    }
                }
            }
            None => hour,
        },
    };
    Some(day.and_hms_opt(h, minute, second)?.and_utc())
}

/// The interval a part-of-day denotes on a given day. Point-like periods
/// (noon, midnight) collapse to a single instant.
pub fn period_span(kind: PeriodKind, day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (start_h, end_h) = kind.bounds();
    let start = day.and_hms_opt(start_h, 0, 0)?.and_utc();
    let end = if end_h >= 24 {
        day.and_hms_opt(23, 59, 59)?.and_utc()
    } else {
        day.and_hms_opt(end_h, 0, 0)?.and_utc()
    };
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 21, 8, 0, 0).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rel_day() {
        let tag = Tag::parse("[REL unit=day offset=1]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::Day(ymd(2025, 1, 22)))
        );
    }

    #[test]
    fn test_rel_week_with_weekday() {
        // Base is Tuesday 2025-01-21; three weeks ahead, Monday.
        let tag = Tag::parse("[REL unit=week offset=3 weekday=0]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::Day(ymd(2025, 2, 10)))
        );
    }

    #[test]
    fn test_rel_week_span() {
        let tag = Tag::parse("[REL unit=week offset=1]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::DaySpan(ymd(2025, 1, 27), ymd(2025, 2, 2)))
        );
    }

    #[test]
    fn test_week_this_thursday() {
        let tag = Tag::parse("[WEEK weekday=3 modifier=this]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::Day(ymd(2025, 1, 23)))
        );
    }

    #[test]
    fn test_week_nth_of_month() {
        let tag = Tag::parse("[WEEK weekday=1 modifier=nth:1 month=10]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::Day(ymd(2025, 10, 7)))
        );
    }

    #[test]
    fn test_holiday_with_year_anchor() {
        let tag = Tag::parse("[HOLIDAY id=spring_festival]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::Day(ymd(2025, 1, 29)))
        );
        let ctx = ResolveCtx {
            year: Some(2026),
            month: None,
        };
        assert_eq!(
            resolve_date(&tag, base(), &ctx),
            Some(Resolved::Day(ymd(2026, 2, 17)))
        );
    }

    #[test]
    fn test_delta_moment() {
        let tag = Tag::parse("[DELTA unit=day amount=3 dir=1]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::Moment(
                Utc.with_ymd_and_hms(2025, 1, 24, 8, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_delta_bracket_past() {
        let tag = Tag::parse("[DELTA unit=year amount=1 dir=-1 bracket=true]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::MomentSpan(
                Utc.with_ymd_and_hms(2024, 1, 21, 8, 0, 0).unwrap(),
                base()
            ))
        );
    }

    #[test]
    fn test_decade() {
        let tag = Tag::parse("[DECADE value=80 qualifier=all]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::DaySpan(ymd(1980, 1, 1), ymd(1989, 12, 31)))
        );
    }

    #[test]
    fn test_decade_with_century_and_qualifier() {
        let tag = Tag::parse("[DECADE value=60 century=20 qualifier=early]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::DaySpan(ymd(1960, 1, 1), ymd(1962, 12, 31)))
        );
    }

    #[test]
    fn test_relative_century() {
        let tag = Tag::parse("[CENTURY offset=-1 qualifier=all]").unwrap();
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::DaySpan(ymd(1900, 1, 1), ymd(1999, 12, 31)))
        );
    }

    #[test]
    fn test_recur_weekday() {
        let tag = Tag::parse("[RECUR unit=week weekday=0]").unwrap();
        // Base is Tuesday; next Monday is 2025-01-27.
        assert_eq!(
            resolve_date(&tag, base(), &ResolveCtx::default()),
            Some(Resolved::Day(ymd(2025, 1, 27)))
        );
    }

    #[test]
    fn test_clock_period_disambiguation() {
        let day = ymd(2025, 1, 22);
        // afternoon 5 → 17:00
        let t = resolve_clock(5, 0, 0, None, Some(PeriodKind::Afternoon), true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 22, 17, 0, 0).unwrap()));
        // morning 9 stays 09:00
        let t = resolve_clock(9, 0, 0, None, Some(PeriodKind::Morning), true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 22, 9, 0, 0).unwrap()));
        // evening 8:30 → 20:30
        let t = resolve_clock(8, 30, 0, None, Some(PeriodKind::Evening), true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 22, 20, 30, 0).unwrap()));
    }

    #[test]
    fn test_clock_period_end_hour_is_inclusive() {
        let day = ymd(2025, 1, 22);
        // afternoon 6 → 18:00, matching the evening reading of the same hour
        let t = resolve_clock(6, 0, 0, None, Some(PeriodKind::Afternoon), true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 22, 18, 0, 0).unwrap()));
        let t = resolve_clock(6, 0, 0, None, Some(PeriodKind::Evening), true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 22, 18, 0, 0).unwrap()));
    }

    #[test]
    fn test_clock_twelve_at_night_is_midnight() {
        let day = ymd(2025, 1, 22);
        for period in [PeriodKind::Evening, PeriodKind::Night, PeriodKind::Midnight] {
            let t = resolve_clock(12, 0, 0, None, Some(period), true, day, base());
            assert_eq!(
                t,
                Some(Utc.with_ymd_and_hms(2025, 1, 22, 0, 0, 0).unwrap()),
                "hour 12 with {period:?}"
            );
        }
        // Noon keeps 12:00.
        let t = resolve_clock(12, 0, 0, None, Some(PeriodKind::Noon), true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 22, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_clock_future_bias_unanchored() {
        let day = ymd(2025, 1, 21);
        // Base 08:00; "3点" → 15:00 (next occurrence within 12h).
        let t = resolve_clock(3, 0, 0, None, None, false, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 21, 15, 0, 0).unwrap()));
        // "9点" → 09:00 (already ahead of base).
        let t = resolve_clock(9, 0, 0, None, None, false, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 21, 9, 0, 0).unwrap()));
    }

    #[test]
    fn test_clock_meridiem() {
        let day = ymd(2025, 1, 23);
        let t = resolve_clock(5, 0, 0, Some(Meridiem::Pm), None, true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 23, 17, 0, 0).unwrap()));
        let t = resolve_clock(12, 0, 0, Some(Meridiem::Am), None, true, day, base());
        assert_eq!(t, Some(Utc.with_ymd_and_hms(2025, 1, 23, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_invalid_calendar_day_dropped() {
        let tag = Tag::parse("[UTC year=2025 month=2 day=30]").unwrap();
        assert_eq!(resolve_date(&tag, base(), &ResolveCtx::default()), None);
    }
}
