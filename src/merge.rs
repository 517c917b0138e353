//! Context merger: walk the ordered tag stream, combine adjacent
//! compatible tags into full date-times, assemble ranges, and emit the
//! final results plus the query tag.
//!
//! The walk keeps one expression accumulator (date anchor, part-of-day,
//! clock) and a range phase. A date-like tag arriving while the current
//! expression already has an anchor flushes it and starts a new one, so
//! disjoint expressions in one utterance become independent results. A
//! year or month anchor followed by a holiday, lunar date, or partial date
//! refines the anchor in place instead ("明年春节", "十月的第三个星期二").

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::resolve::{self, calendar, Resolved, ResolveCtx};
use crate::tag::{Meridiem, PeriodKind, SpannedTag, Tag, TagFamily, Unit, WeekMod};
use crate::{Extraction, QueryTag, TimeResult};

#[derive(Debug, Clone, Copy)]
struct ClockSpec {
    hour: u32,
    minute: u32,
    second: u32,
    meridiem: Option<Meridiem>,
}

#[derive(Debug, Default, Clone)]
struct Expr {
    anchor: Option<Resolved>,
    /// Anchor came from a tag inside this expression (not inherited from
    /// the other range endpoint).
    anchor_own: bool,
    period: Option<PeriodKind>,
    clock: Option<ClockSpec>,
    first_family: Option<TagFamily>,
}

impl Expr {
    fn has_content(&self) -> bool {
        self.anchor.is_some() || self.period.is_some() || self.clock.is_some()
    }

    fn note(&mut self, family: TagFamily) {
        self.first_family.get_or_insert(family);
    }
}

#[derive(Debug, PartialEq)]
enum Phase {
    Plain,
    RangeStart,
    RangeEnd,
}

pub(crate) fn merge(tags: &[SpannedTag], base: DateTime<Utc>) -> Extraction {
    Merger::new(base).run(tags)
}

struct Merger {
    base: DateTime<Utc>,
    results: Vec<TimeResult>,
    result_families: Vec<TagFamily>,
    any_range: bool,
    any_recur: bool,
    year_hint: Option<i32>,
    month_hint: Option<(i32, u32)>,
    pending_ordinal: Option<u32>,
}

impl Merger {
    fn new(base: DateTime<Utc>) -> Self {
        Merger {
            base,
            results: Vec::new(),
            result_families: Vec::new(),
            any_range: false,
            any_recur: false,
            year_hint: None,
            month_hint: None,
            pending_ordinal: None,
        }
    }

    fn run(mut self, tags: &[SpannedTag]) -> Extraction {
        let mut cur = Expr::default();
        let mut start: Option<Expr> = None;
        let mut phase = Phase::Plain;

        for st in tags {
            match &st.tag {
                Tag::Noise => {}
                Tag::RangeOpen => {
                    match phase {
                        Phase::RangeEnd => self.finalize_range(start.take(), &mut cur),
                        _ => self.flush(&mut cur),
                    }
                    phase = Phase::RangeStart;
                }
                Tag::RangeSep { strong } => match phase {
                    Phase::RangeStart if cur.has_content() => {
                        start = Some(std::mem::take(&mut cur));
                        phase = Phase::RangeEnd;
                    }
                    Phase::Plain if *strong && cur.has_content() => {
                        start = Some(std::mem::take(&mut cur));
                        phase = Phase::RangeEnd;
                    }
                    Phase::RangeEnd if cur.has_content() => {
                        self.finalize_range(start.take(), &mut cur);
                        phase = Phase::Plain;
                    }
                    _ => {}
                },
                Tag::RangeClose => {
                    if phase == Phase::RangeEnd && cur.has_content() {
                        self.finalize_range(start.take(), &mut cur);
                        phase = Phase::Plain;
                    }
                }
                Tag::Ordinal { k } => self.pending_ordinal = Some(*k),
                Tag::Period { kind } => {
                    if cur.period.is_some() && cur.clock.is_some() {
                        self.flush(&mut cur);
                    }
                    cur.period = Some(*kind);
                    cur.note(TagFamily::Period);
                }
                Tag::Clock {
                    hour,
                    minute,
                    second,
                    meridiem,
                } => {
                    if cur.clock.is_some() {
                        self.flush(&mut cur);
                    }
                    cur.clock = Some(ClockSpec {
                        hour: *hour,
                        minute: *minute,
                        second: *second,
                        meridiem: *meridiem,
                    });
                    cur.note(TagFamily::Clock);
                }
                tag if tag.is_date_like() => self.apply_date_like(tag, &mut cur),
                _ => {}
            }
        }

        match phase {
            Phase::RangeEnd => {
                if cur.has_content() {
                    self.finalize_range(start.take(), &mut cur);
                } else if let Some(mut s) = start.take() {
                    self.flush(&mut s);
                }
            }
            _ => self.flush(&mut cur),
        }

        let query_tag = self.query_tag();
        Extraction {
            results: self.results,
            query_tag,
        }
    }

    fn apply_date_like(&mut self, tag: &Tag, cur: &mut Expr) {
        if matches!(tag, Tag::Recur { .. }) {
            self.any_recur = true;
        }

        // Year-anchor refinement: "明年" / "2026年" followed by a holiday,
        // lunar date, or partial date re-resolves against that year.
        let refines_year = self.year_hint.is_some()
            && matches!(
                tag,
                Tag::Holiday { .. } | Tag::Lunar { .. } | Tag::Utc { year: None, .. }
            );
        // Month-anchor refinement: "十月" (+ optional ordinal) followed by a
        // weekday reference selects the nth weekday of that month, and a
        // bare day-of-month narrows the month to that day ("下个月5号").
        let week_with_ordinal = matches!(
            tag,
            Tag::Week {
                modifier: WeekMod::This,
                month: None,
                weekend: false,
                ..
            }
        ) && self.pending_ordinal.is_some();
        let bare_day = matches!(
            tag,
            Tag::Utc {
                year: None,
                month: None,
                day: Some(_),
            }
        );
        let refines_month = self.month_hint.is_some() && (week_with_ordinal || bare_day);

        if cur.anchor.is_some() && !refines_year && !refines_month {
            self.flush(cur);
        }

        if bare_day {
            // Meaningful only against a month anchor; dropped otherwise.
            if let (Some((y, m)), Tag::Utc { day: Some(d), .. }) = (self.month_hint, tag) {
                if let Some(date) = chrono::NaiveDate::from_ymd_opt(y, m, *d) {
                    cur.anchor = Some(Resolved::Day(date));
                    cur.anchor_own = true;
                    cur.note(TagFamily::Utc);
                    self.month_hint = None;
                }
            }
            return;
        }

        let ctx = ResolveCtx {
            year: self.year_hint,
            month: self.month_hint,
        };

        let effective;
        let tag = if week_with_ordinal {
            let k = self.pending_ordinal.take().unwrap_or(1);
            if let Tag::Week {
                weekday, weekend, ..
            } = tag
            {
                effective = Tag::Week {
                    weekday: *weekday,
                    modifier: WeekMod::Nth(k),
                    month: None,
                    weekend: *weekend,
                };
                &effective
            } else {
                tag
            }
        } else {
            tag
        };

        if let Some(resolved) = resolve::resolve_date(tag, self.base, &ctx) {
            cur.anchor = Some(resolved);
            cur.anchor_own = true;
            cur.note(tag.family());

            // Record hints for later refinement.
            self.year_hint = None;
            self.month_hint = None;
            match tag {
                Tag::Utc {
                    year: Some(y),
                    month: None,
                    day: None,
                } => self.year_hint = Some(*y),
                Tag::Rel {
                    unit: Unit::Year,
                    offset,
                    half: None,
                    ..
                } => self.year_hint = Some(self.base.year() + offset),
                Tag::Utc {
                    month: Some(m),
                    day: None,
                    year,
                } => self.month_hint = Some((year.unwrap_or_else(|| self.base.year()), *m)),
                Tag::Rel {
                    unit: Unit::Month, ..
                } => {
                    if let Some(Resolved::DaySpan(a, _)) = cur.anchor {
                        self.month_hint = Some((a.year(), a.month()));
                    }
                }
                _ => {}
            }

            // Fused part-of-day on relative days ("明早", "tonight").
            if let Tag::Rel {
                period: Some(p), ..
            } = tag
            {
                cur.period = Some(*p);
            }
            if let Tag::Recur {
                period: Some(p), ..
            } = tag
            {
                cur.period = Some(*p);
            }
        } else {
            log::debug!("dropped unresolvable tag {tag}");
        }
    }

    /// Emit the current expression as a standalone result.
    fn flush(&mut self, expr: &mut Expr) {
        let expr = std::mem::take(expr);
        if !expr.has_content() {
            return;
        }
        self.pending_ordinal = None;
        let family = expr.first_family;
        if let Some(result) = self.standalone(&expr) {
            if result_in_era(&result) {
                self.results.push(result);
                if let Some(f) = family {
                    self.result_families.push(f);
                }
            }
        }
    }

    fn standalone(&self, expr: &Expr) -> Option<TimeResult> {
        if let Some(clock) = expr.clock {
            let day = expr
                .anchor
                .as_ref()
                .map(Resolved::anchor_day)
                .unwrap_or_else(|| self.base.date_naive());
            let dt = resolve::resolve_clock(
                clock.hour,
                clock.minute,
                clock.second,
                clock.meridiem,
                expr.period,
                expr.anchor.is_some(),
                day,
                self.base,
            )?;
            return Some(TimeResult::Point(dt));
        }
        if let Some(period) = expr.period {
            let day = expr
                .anchor
                .as_ref()
                .map(Resolved::anchor_day)
                .unwrap_or_else(|| self.base.date_naive());
            let (from, to) = resolve::period_span(period, day)?;
            return Some(if from == to {
                TimeResult::Point(from)
            } else {
                TimeResult::Range(from, to)
            });
        }
        match expr.anchor? {
            Resolved::Day(d) => Some(TimeResult::Range(
                calendar::day_start(d)?,
                calendar::day_end(d)?,
            )),
            Resolved::DaySpan(a, b) => Some(TimeResult::Range(
                calendar::day_start(a)?,
                calendar::day_end(b)?,
            )),
            Resolved::Moment(m) => Some(TimeResult::Point(m)),
            Resolved::MomentSpan(a, b) => Some(TimeResult::Range(a, b)),
        }
    }

    /// One range endpoint. Start endpoints take the opening edge of spans,
    /// end endpoints the closing edge.
    fn endpoint(&self, expr: &Expr, is_start: bool) -> Option<DateTime<Utc>> {
        if let Some(clock) = expr.clock {
            let day = expr
                .anchor
                .as_ref()
                .map(Resolved::anchor_day)
                .unwrap_or_else(|| self.base.date_naive());
            return resolve::resolve_clock(
                clock.hour,
                clock.minute,
                clock.second,
                clock.meridiem,
                expr.period,
                expr.anchor.is_some(),
                day,
                self.base,
            );
        }
        if let Some(period) = expr.period {
            let day = expr
                .anchor
                .as_ref()
                .map(Resolved::anchor_day)
                .unwrap_or_else(|| self.base.date_naive());
            let (from, to) = resolve::period_span(period, day)?;
            return Some(if is_start { from } else { to });
        }
        match expr.anchor? {
            Resolved::Day(d) => {
                if is_start {
                    calendar::day_start(d)
                } else {
                    calendar::day_end(d)
                }
            }
            Resolved::DaySpan(a, b) => {
                if is_start {
                    calendar::day_start(a)
                } else {
                    calendar::day_end(b)
                }
            }
            Resolved::Moment(m) => Some(m),
            Resolved::MomentSpan(a, b) => Some(if is_start { a } else { b }),
        }
    }

    fn finalize_range(&mut self, start: Option<Expr>, end: &mut Expr) {
        let mut start = match start {
            Some(s) => s,
            None => {
                self.flush(end);
                return;
            }
        };
        let mut end = std::mem::take(end);
        self.pending_ordinal = None;

        // Endpoint with no date of its own inherits the other's anchor.
        if end.anchor.is_none() && start.anchor.is_some() {
            end.anchor = start.anchor;
            end.anchor_own = false;
        } else if start.anchor.is_none() && end.anchor.is_some() {
            start.anchor = end.anchor;
            start.anchor_own = false;
        }

        let from = self.endpoint(&start, true);
        let to = self.endpoint(&end, false);
        let (mut from, mut to) = match (from, to) {
            (Some(f), Some(t)) => (f, t),
            (Some(_), None) => {
                // The end never resolved; emit the start alone.
                self.flush(&mut start);
                return;
            }
            _ => return,
        };

        // Cross-midnight: an end carrying only a clock that lands at or
        // before the start belongs to the next day.
        if to <= from && end.clock.is_some() && !end.anchor_own {
            if let Some(bumped) = Duration::try_days(1).and_then(|d| to.checked_add_signed(d)) {
                to = bumped;
            }
        }
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }

        let result = TimeResult::Range(from, to);
        if result_in_era(&result) {
            self.any_range = true;
            self.push(result, start.first_family.or(end.first_family));
        }
    }

    fn push(&mut self, result: TimeResult, family: Option<TagFamily>) {
        self.results.push(result);
        if let Some(f) = family {
            self.result_families.push(f);
        }
    }

    fn query_tag(&self) -> QueryTag {
        if self.results.is_empty() {
            return QueryTag::None;
        }
        if self.any_recur {
            return QueryTag::Recurring;
        }
        if self.any_range {
            return QueryTag::Range;
        }
        match self.result_families.first() {
            Some(TagFamily::Utc) => QueryTag::Absolute,
            Some(TagFamily::Holiday) => QueryTag::Holiday,
            Some(TagFamily::Lunar) => QueryTag::Lunar,
            Some(TagFamily::Century) | Some(TagFamily::Decade) => QueryTag::Range,
            Some(_) | None => QueryTag::Relative,
        }
    }
}

fn result_in_era(result: &TimeResult) -> bool {
    match result {
        TimeResult::Point(p) => calendar::in_era(p),
        TimeResult::Range(a, b) => calendar::in_era(a) && calendar::in_era(b),
    }
}
