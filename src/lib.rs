#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub(crate) mod cache;
pub(crate) mod error;
pub(crate) mod grammar;
pub(crate) mod language;
pub(crate) mod merge;
pub(crate) mod postprocess;
pub(crate) mod preprocess;
pub(crate) mod resolve;
pub(crate) mod tag;
pub(crate) mod tagger;

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

pub use error::Error;
pub use language::Language;

/// One recognized time expression: an instant or a closed interval.
///
/// Serializes to the wire shape used by the batch output: a point becomes
/// one ISO-8601 UTC string, a range a two-element string array.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeResult {
    /// A single instant.
    Point(DateTime<Utc>),
    /// A closed interval; `start <= end` always holds.
    Range(DateTime<Utc>, DateTime<Utc>),
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

impl Serialize for TimeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeResult::Point(p) => serializer.serialize_str(&format_instant(p)),
            TimeResult::Range(a, b) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(&format_instant(a))?;
                seq.serialize_element(&format_instant(b))?;
                seq.end()
            }
        }
    }
}

/// Coarse classification of the dominant expression kind in an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum QueryTag {
    Absolute,
    Relative,
    Range,
    Holiday,
    Lunar,
    Recurring,
    None,
}

impl QueryTag {
    /// The lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryTag::Absolute => "absolute",
            QueryTag::Relative => "relative",
            QueryTag::Range => "range",
            QueryTag::Holiday => "holiday",
            QueryTag::Lunar => "lunar",
            QueryTag::Recurring => "recurring",
            QueryTag::None => "none",
        }
    }
}

impl fmt::Display for QueryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QueryTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The outcome of one `extract` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// Recognized expressions in input order; empty when nothing matched.
    pub results: Vec<TimeResult>,
    /// Classification of the utterance.
    pub query_tag: QueryTag,
}

impl Extraction {
    fn none() -> Self {
        Extraction {
            results: Vec::new(),
            query_tag: QueryTag::None,
        }
    }
}

/// Construction options for [`Extractor`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Recognition language.
    pub language: Language,
    /// Directory for the compiled grammar artifact. `None` disables
    /// on-disk caching.
    pub cache_dir: Option<PathBuf>,
    /// Force recompilation even when a matching artifact exists.
    pub overwrite_cache: bool,
}

impl ExtractorConfig {
    /// Config with caching disabled.
    pub fn new(language: Language) -> Self {
        ExtractorConfig {
            language,
            cache_dir: None,
            overwrite_cache: false,
        }
    }
}

/// Lightweight usage counters, updated atomically during `extract`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractorStats {
    /// Total `extract` calls.
    pub extractions: u64,
    /// Calls that produced at least one result.
    pub matched: u64,
}

/// Recognizes and resolves natural-language time expressions.
///
/// Construction compiles (or loads from cache) the language's grammar;
/// the compiled state is immutable afterwards, so one `Extractor` can be
/// shared freely across threads. `extract` is pure apart from the stats
/// counters.
pub struct Extractor {
    grammar: grammar::Grammar,
    language: Language,
    extractions: AtomicU64,
    matched: AtomicU64,
}

impl Extractor {
    /// Build an extractor. Fails only on grammar compilation or artifact
    /// write problems.
    pub fn new(config: ExtractorConfig) -> Result<Extractor, Error> {
        let grammar = cache::load_or_compile(
            config.language,
            config.cache_dir.as_deref(),
            config.overwrite_cache,
        )?;
        Ok(Extractor {
            grammar,
            language: config.language,
            extractions: AtomicU64::new(0),
            matched: AtomicU64::new(0),
        })
    }

    /// The configured language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Content hash of the compiled grammar (the cache key).
    pub fn grammar_hash(&self) -> &str {
        &self.grammar.hash
    }

    /// Recognize time expressions in `text` against `base` (defaults to
    /// the current wall clock). Never fails: unrecognized or malformed
    /// text yields an empty result list with the `none` query tag.
    pub fn extract(&self, text: &str, base: Option<DateTime<Utc>>) -> Extraction {
        self.extractions.fetch_add(1, Ordering::Relaxed);
        let base = base.unwrap_or_else(Utc::now);
        let pre = preprocess::preprocess(text, self.language);
        if pre.text.is_empty() {
            return Extraction::none();
        }
        let raw = tagger::apply(&self.grammar, &pre);
        let tags = postprocess::postprocess(raw);
        let extraction = merge::merge(&tags, base);
        if !extraction.results.is_empty() {
            self.matched.fetch_add(1, Ordering::Relaxed);
        }
        extraction
    }

    /// String-level surface: `base_time` must be an ISO-8601 UTC instant
    /// such as `2025-01-21T08:00:00Z`; a malformed value fails fast.
    pub fn extract_str(&self, text: &str, base_time: Option<&str>) -> Result<Extraction, Error> {
        let base = match base_time {
            Some(s) => Some(parse_base_time(s)?),
            None => None,
        };
        Ok(self.extract(text, base))
    }

    /// Snapshot of the usage counters.
    pub fn stats(&self) -> ExtractorStats {
        ExtractorStats {
            extractions: self.extractions.load(Ordering::Relaxed),
            matched: self.matched.load(Ordering::Relaxed),
        }
    }
}

/// Parse an ISO-8601 UTC instant for use as a base time.
pub fn parse_base_time(s: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| Error::InvalidBaseTime {
            input: s.to_string(),
            source,
        })
}
