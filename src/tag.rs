//! Typed tags and their bracketed wire format.
//!
//! The tagging stage emits tags as bracketed strings such as
//! `[REL unit=day offset=1]` or `[CLOCK hour=9 minute=30]`. The
//! postprocessor parses them into [`Tag`] records; everything downstream
//! works on the typed form.

use std::fmt;

/// Byte span `[start, end)` into the original input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Calendar / clock granularity used by relative and recurring tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
            Unit::Year => "year",
        }
    }

    pub fn from_str(s: &str) -> Option<Unit> {
        match s {
            "second" => Some(Unit::Second),
            "minute" => Some(Unit::Minute),
            "hour" => Some(Unit::Hour),
            "day" => Some(Unit::Day),
            "week" => Some(Unit::Week),
            "month" => Some(Unit::Month),
            "year" => Some(Unit::Year),
            _ => None,
        }
    }
}

/// Named part of day with default hour bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Dawn,
    Morning,
    Noon,
    Afternoon,
    Evening,
    Night,
    Midnight,
}

impl PeriodKind {
    /// Default `(start_hour, end_hour)` bounds. Point-like periods (noon,
    /// midnight) have equal bounds.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            PeriodKind::Dawn => (4, 6),
            PeriodKind::Morning => (6, 12),
            PeriodKind::Noon => (12, 12),
            PeriodKind::Afternoon => (12, 18),
            PeriodKind::Evening => (18, 24),
            PeriodKind::Night => (18, 24),
            PeriodKind::Midnight => (0, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Dawn => "dawn",
            PeriodKind::Morning => "morning",
            PeriodKind::Noon => "noon",
            PeriodKind::Afternoon => "afternoon",
            PeriodKind::Evening => "evening",
            PeriodKind::Night => "night",
            PeriodKind::Midnight => "midnight",
        }
    }

    pub fn from_str(s: &str) -> Option<PeriodKind> {
        match s {
            "dawn" => Some(PeriodKind::Dawn),
            "morning" => Some(PeriodKind::Morning),
            "noon" => Some(PeriodKind::Noon),
            "afternoon" => Some(PeriodKind::Afternoon),
            "evening" => Some(PeriodKind::Evening),
            "night" => Some(PeriodKind::Night),
            "midnight" => Some(PeriodKind::Midnight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Qualifier narrowing a decade or century to a sub-span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanQualifier {
    Early,
    Mid,
    Late,
    All,
}

impl SpanQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanQualifier::Early => "early",
            SpanQualifier::Mid => "mid",
            SpanQualifier::Late => "late",
            SpanQualifier::All => "all",
        }
    }

    fn from_str(s: &str) -> Option<SpanQualifier> {
        match s {
            "early" => Some(SpanQualifier::Early),
            "mid" => Some(SpanQualifier::Mid),
            "late" => Some(SpanQualifier::Late),
            "all" => Some(SpanQualifier::All),
            _ => None,
        }
    }
}

/// Weekday modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekMod {
    This,
    Next,
    Last,
    /// "wednesday after next": skip one extra week.
    AfterNext,
    /// k-th occurrence within the anchoring month.
    Nth(u32),
    /// Final occurrence within the anchoring month.
    LastOf,
}

impl fmt::Display for WeekMod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekMod::This => f.write_str("this"),
            WeekMod::Next => f.write_str("next"),
            WeekMod::Last => f.write_str("last"),
            WeekMod::AfterNext => f.write_str("afternext"),
            WeekMod::Nth(k) => write!(f, "nth:{k}"),
            WeekMod::LastOf => f.write_str("lastof"),
        }
    }
}

impl WeekMod {
    fn parse(s: &str) -> Option<WeekMod> {
        match s {
            "this" => Some(WeekMod::This),
            "next" => Some(WeekMod::Next),
            "last" => Some(WeekMod::Last),
            "afternext" => Some(WeekMod::AfterNext),
            "lastof" => Some(WeekMod::LastOf),
            _ => {
                let k = s.strip_prefix("nth:")?.parse().ok()?;
                Some(WeekMod::Nth(k))
            }
        }
    }
}

/// Coarse tag family, used for dominance filtering and query-tag selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFamily {
    Utc,
    Rel,
    Week,
    Period,
    Clock,
    Holiday,
    Lunar,
    Delta,
    RangeOpen,
    RangeSep,
    RangeClose,
    Century,
    Decade,
    Recur,
    Ordinal,
    Noise,
}

/// A typed tag emitted by the tagging stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// Absolute date, possibly partial (year only, month only, month+day).
    Utc {
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
    },
    /// Relative offset from the base in calendar units. `weekday` narrows a
    /// week offset to a day; `period` carries a fused part-of-day
    /// ("明早", "tonight"); `half` selects a half-year (1 or 2).
    Rel {
        unit: Unit,
        offset: i32,
        weekday: Option<u32>,
        period: Option<PeriodKind>,
        half: Option<u32>,
    },
    /// Weekday reference. `month` anchors nth/last-of forms; `weekend`
    /// widens the reference to the Saturday–Sunday span.
    Week {
        weekday: u32,
        modifier: WeekMod,
        month: Option<u32>,
        weekend: bool,
    },
    Period {
        kind: PeriodKind,
    },
    Clock {
        hour: u32,
        minute: u32,
        second: u32,
        meridiem: Option<Meridiem>,
    },
    Holiday {
        id: String,
    },
    Lunar {
        year: Option<i32>,
        month: u32,
        day: u32,
        leap: bool,
    },
    /// Signed offset of `amount * unit` in direction `dir` (+1 future,
    /// -1 past). `bracket` marks fuzzy spans like "近一年" that resolve to
    /// an interval between the shifted instant and the base.
    Delta {
        unit: Unit,
        amount: i64,
        dir: i32,
        fuzzy: bool,
        bracket: bool,
    },
    RangeOpen,
    /// `strong` separators ("到", "to") may open a range on their own;
    /// weak ones ("and") only continue an explicitly opened range.
    RangeSep {
        strong: bool,
    },
    RangeClose,
    /// Century, either absolute (`value` = 20 for the 20th century) or
    /// relative to the base (`offset` = -1 for "上个世纪").
    Century {
        value: Option<u32>,
        offset: Option<i32>,
        qualifier: SpanQualifier,
    },
    /// Decade: `value` is either a full start year (1980) or a two-digit
    /// decade (80, 60) resolved against `century` or the usual 19xx/20xx
    /// convention.
    Decade {
        value: u32,
        century: Option<u32>,
        qualifier: SpanQualifier,
    },
    Recur {
        unit: Unit,
        weekday: Option<u32>,
        month: Option<u32>,
        day: Option<u32>,
        period: Option<PeriodKind>,
    },
    Ordinal {
        k: u32,
    },
    Noise,
}

impl Tag {
    pub fn family(&self) -> TagFamily {
        match self {
            Tag::Utc { .. } => TagFamily::Utc,
            Tag::Rel { .. } => TagFamily::Rel,
            Tag::Week { .. } => TagFamily::Week,
            Tag::Period { .. } => TagFamily::Period,
            Tag::Clock { .. } => TagFamily::Clock,
            Tag::Holiday { .. } => TagFamily::Holiday,
            Tag::Lunar { .. } => TagFamily::Lunar,
            Tag::Delta { .. } => TagFamily::Delta,
            Tag::RangeOpen => TagFamily::RangeOpen,
            Tag::RangeSep { .. } => TagFamily::RangeSep,
            Tag::RangeClose => TagFamily::RangeClose,
            Tag::Century { .. } => TagFamily::Century,
            Tag::Decade { .. } => TagFamily::Decade,
            Tag::Recur { .. } => TagFamily::Recur,
            Tag::Ordinal { .. } => TagFamily::Ordinal,
            Tag::Noise => TagFamily::Noise,
        }
    }

    /// Specificity rank for dominance filtering: a tag fully covered by an
    /// equal-or-higher ranked tag is dropped.
    pub fn specificity(&self) -> u8 {
        match self.family() {
            TagFamily::Utc => 90,
            TagFamily::Lunar => 80,
            TagFamily::Holiday => 70,
            TagFamily::Century | TagFamily::Decade | TagFamily::Recur => 60,
            TagFamily::Rel => 50,
            TagFamily::Week => 40,
            TagFamily::Period => 30,
            TagFamily::Clock => 20,
            TagFamily::Delta => 10,
            _ => 0,
        }
    }

    /// True for families that can anchor a calendar day (or day span).
    pub fn is_date_like(&self) -> bool {
        matches!(
            self.family(),
            TagFamily::Utc
                | TagFamily::Rel
                | TagFamily::Week
                | TagFamily::Holiday
                | TagFamily::Lunar
                | TagFamily::Delta
                | TagFamily::Century
                | TagFamily::Decade
                | TagFamily::Recur
        )
    }
}

/// A tag plus the source span it was recognized at.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedTag {
    pub span: Span,
    pub tag: Tag,
}

/// Error raised when a bracketed tag string does not parse against the
/// tag schema. Recoverable: the postprocessor logs and skips the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagParseError {
    pub input: String,
    pub reason: String,
}

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad tag {:?}: {}", self.input, self.reason)
    }
}

impl std::error::Error for TagParseError {}

fn err(input: &str, reason: impl Into<String>) -> TagParseError {
    TagParseError {
        input: input.to_string(),
        reason: reason.into(),
    }
}

struct Fields<'a> {
    input: &'a str,
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn opt_parse<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, TagParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .parse::<T>()
                .map(Some)
                .map_err(|_| err(self.input, format!("bad value for {key}"))),
        }
    }

    fn req_parse<T: std::str::FromStr>(&self, key: &str) -> Result<T, TagParseError> {
        self.opt_parse(key)?
            .ok_or_else(|| err(self.input, format!("missing field {key}")))
    }

    fn opt_bool(&self, key: &str) -> Result<bool, TagParseError> {
        match self.get(key) {
            None => Ok(false),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(_) => Err(err(self.input, format!("bad value for {key}"))),
        }
    }

    fn opt_period(&self, key: &str) -> Result<Option<PeriodKind>, TagParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => PeriodKind::from_str(v)
                .map(Some)
                .ok_or_else(|| err(self.input, "bad period kind")),
        }
    }

    fn qualifier(&self) -> Result<SpanQualifier, TagParseError> {
        match self.get("qualifier") {
            None => Ok(SpanQualifier::All),
            Some(v) => SpanQualifier::from_str(v).ok_or_else(|| err(self.input, "bad qualifier")),
        }
    }

    fn unit(&self) -> Result<Unit, TagParseError> {
        let v = self
            .get("unit")
            .ok_or_else(|| err(self.input, "missing field unit"))?;
        Unit::from_str(v).ok_or_else(|| err(self.input, "bad unit"))
    }
}

impl Tag {
    /// Parse the bracketed wire format, e.g. `[REL unit=day offset=1]`.
    pub fn parse(s: &str) -> Result<Tag, TagParseError> {
        let inner = s
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| err(s, "not bracketed"))?;
        let mut parts = inner.split_whitespace();
        let family = parts.next().ok_or_else(|| err(s, "empty tag"))?;
        let mut pairs = Vec::new();
        for part in parts {
            let (k, v) = part
                .split_once('=')
                .ok_or_else(|| err(s, format!("bad field {part:?}")))?;
            pairs.push((k, v));
        }
        let f = Fields { input: s, pairs };

        match family {
            "UTC" => {
                let year = f.opt_parse::<i32>("year")?;
                let month = f.opt_parse::<u32>("month")?;
                let day = f.opt_parse::<u32>("day")?;
                if year.is_none() && month.is_none() && day.is_none() {
                    return Err(err(s, "UTC tag with no fields"));
                }
                if let Some(m) = month {
                    if !(1..=12).contains(&m) {
                        return Err(err(s, "month out of range"));
                    }
                }
                if let Some(d) = day {
                    if !(1..=31).contains(&d) {
                        return Err(err(s, "day out of range"));
                    }
                }
                Ok(Tag::Utc { year, month, day })
            }
            "REL" => Ok(Tag::Rel {
                unit: f.unit()?,
                offset: f.req_parse("offset")?,
                weekday: f.opt_parse("weekday")?,
                period: f.opt_period("period")?,
                half: f.opt_parse("half")?,
            }),
            "WEEK" => {
                let weekday: u32 = f.req_parse("weekday")?;
                if weekday > 6 {
                    return Err(err(s, "weekday out of range"));
                }
                let modifier = match f.get("modifier") {
                    None => WeekMod::This,
                    Some(v) => WeekMod::parse(v).ok_or_else(|| err(s, "bad modifier"))?,
                };
                Ok(Tag::Week {
                    weekday,
                    modifier,
                    month: f.opt_parse("month")?,
                    weekend: f.opt_bool("weekend")?,
                })
            }
            "PERIOD" => {
                let kind = f
                    .get("kind")
                    .and_then(PeriodKind::from_str)
                    .ok_or_else(|| err(s, "bad or missing period kind"))?;
                Ok(Tag::Period { kind })
            }
            "CLOCK" => {
                let hour: u32 = f.req_parse("hour")?;
                let minute: u32 = f.opt_parse("minute")?.unwrap_or(0);
                let second: u32 = f.opt_parse("second")?.unwrap_or(0);
                if hour > 23 || minute > 59 || second > 59 {
                    return Err(err(s, "clock field out of range"));
                }
                let meridiem = match f.get("meridiem") {
                    None => None,
                    Some("am") => Some(Meridiem::Am),
                    Some("pm") => Some(Meridiem::Pm),
                    Some(_) => return Err(err(s, "bad meridiem")),
                };
                Ok(Tag::Clock {
                    hour,
                    minute,
                    second,
                    meridiem,
                })
            }
            "HOLIDAY" => {
                let id = f.get("id").ok_or_else(|| err(s, "missing field id"))?;
                Ok(Tag::Holiday { id: id.to_string() })
            }
            "LUNAR" => {
                let month: u32 = f.req_parse("month")?;
                let day: u32 = f.req_parse("day")?;
                if !(1..=12).contains(&month) || !(1..=30).contains(&day) {
                    return Err(err(s, "lunar date out of range"));
                }
                Ok(Tag::Lunar {
                    year: f.opt_parse("year")?,
                    month,
                    day,
                    leap: f.opt_bool("leap")?,
                })
            }
            "DELTA" => {
                let dir: i32 = f.opt_parse("dir")?.unwrap_or(1);
                if dir != 1 && dir != -1 {
                    return Err(err(s, "bad dir"));
                }
                Ok(Tag::Delta {
                    unit: f.unit()?,
                    amount: f.req_parse("amount")?,
                    dir,
                    fuzzy: f.opt_bool("fuzzy")?,
                    bracket: f.opt_bool("bracket")?,
                })
            }
            "RANGE_OPEN" => Ok(Tag::RangeOpen),
            "RANGE_SEP" => {
                let strong = match f.get("strong") {
                    None => true,
                    Some("true") => true,
                    Some("false") => false,
                    Some(_) => return Err(err(s, "bad strong flag")),
                };
                Ok(Tag::RangeSep { strong })
            }
            "RANGE_CLOSE" => Ok(Tag::RangeClose),
            "CENTURY" => {
                let value = f.opt_parse::<u32>("value")?;
                let offset = f.opt_parse::<i32>("offset")?;
                if value.is_none() && offset.is_none() {
                    return Err(err(s, "CENTURY needs value or offset"));
                }
                Ok(Tag::Century {
                    value,
                    offset,
                    qualifier: f.qualifier()?,
                })
            }
            "DECADE" => Ok(Tag::Decade {
                value: f.req_parse("value")?,
                century: f.opt_parse("century")?,
                qualifier: f.qualifier()?,
            }),
            "RECUR" => Ok(Tag::Recur {
                unit: f.unit()?,
                weekday: f.opt_parse("weekday")?,
                month: f.opt_parse("month")?,
                day: f.opt_parse("day")?,
                period: f.opt_period("period")?,
            }),
            "ORDINAL" => Ok(Tag::Ordinal {
                k: f.req_parse("k")?,
            }),
            "NOISE" => Ok(Tag::Noise),
            other => Err(err(s, format!("unknown family {other:?}"))),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, k: &str, v: &Option<T>) -> fmt::Result {
            if let Some(v) = v {
                write!(f, " {k}={v}")?;
            }
            Ok(())
        }
        fn flag(f: &mut fmt::Formatter<'_>, k: &str, v: bool) -> fmt::Result {
            if v {
                write!(f, " {k}=true")?;
            }
            Ok(())
        }

        match self {
            Tag::Utc { year, month, day } => {
                write!(f, "[UTC")?;
                opt(f, "year", year)?;
                opt(f, "month", month)?;
                opt(f, "day", day)?;
                write!(f, "]")
            }
            Tag::Rel {
                unit,
                offset,
                weekday,
                period,
                half,
            } => {
                write!(f, "[REL unit={} offset={offset}", unit.as_str())?;
                opt(f, "weekday", weekday)?;
                opt(f, "period", &period.map(|p| p.as_str()))?;
                opt(f, "half", half)?;
                write!(f, "]")
            }
            Tag::Week {
                weekday,
                modifier,
                month,
                weekend,
            } => {
                write!(f, "[WEEK weekday={weekday} modifier={modifier}")?;
                opt(f, "month", month)?;
                flag(f, "weekend", *weekend)?;
                write!(f, "]")
            }
            Tag::Period { kind } => write!(f, "[PERIOD kind={}]", kind.as_str()),
            Tag::Clock {
                hour,
                minute,
                second,
                meridiem,
            } => {
                write!(f, "[CLOCK hour={hour} minute={minute}")?;
                if *second != 0 {
                    write!(f, " second={second}")?;
                }
                if let Some(m) = meridiem {
                    write!(
                        f,
                        " meridiem={}",
                        if *m == Meridiem::Am { "am" } else { "pm" }
                    )?;
                }
                write!(f, "]")
            }
            Tag::Holiday { id } => write!(f, "[HOLIDAY id={id}]"),
            Tag::Lunar {
                year,
                month,
                day,
                leap,
            } => {
                write!(f, "[LUNAR")?;
                opt(f, "year", year)?;
                write!(f, " month={month} day={day}")?;
                flag(f, "leap", *leap)?;
                write!(f, "]")
            }
            Tag::Delta {
                unit,
                amount,
                dir,
                fuzzy,
                bracket,
            } => {
                write!(f, "[DELTA unit={} amount={amount} dir={dir}", unit.as_str())?;
                flag(f, "fuzzy", *fuzzy)?;
                flag(f, "bracket", *bracket)?;
                write!(f, "]")
            }
            Tag::RangeOpen => write!(f, "[RANGE_OPEN]"),
            Tag::RangeSep { strong } => {
                if *strong {
                    write!(f, "[RANGE_SEP]")
                } else {
                    write!(f, "[RANGE_SEP strong=false]")
                }
            }
            Tag::RangeClose => write!(f, "[RANGE_CLOSE]"),
            Tag::Century {
                value,
                offset,
                qualifier,
            } => {
                write!(f, "[CENTURY")?;
                opt(f, "value", value)?;
                opt(f, "offset", offset)?;
                write!(f, " qualifier={}]", qualifier.as_str())
            }
            Tag::Decade {
                value,
                century,
                qualifier,
            } => {
                write!(f, "[DECADE value={value}")?;
                opt(f, "century", century)?;
                write!(f, " qualifier={}]", qualifier.as_str())
            }
            Tag::Recur {
                unit,
                weekday,
                month,
                day,
                period,
            } => {
                write!(f, "[RECUR unit={}", unit.as_str())?;
                opt(f, "weekday", weekday)?;
                opt(f, "month", month)?;
                opt(f, "day", day)?;
                opt(f, "period", &period.map(|p| p.as_str()))?;
                write!(f, "]")
            }
            Tag::Ordinal { k } => write!(f, "[ORDINAL k={k}]"),
            Tag::Noise => write!(f, "[NOISE]"),
        }
    }
}
