use thiserror::Error;

/// Errors surfaced by the public API.
///
/// Only construction and input validation can fail; `extract` itself never
/// returns an error (unrecognized or malformed text yields an empty result
/// list instead).
#[derive(Debug, Error)]
pub enum Error {
    /// The caller-supplied base time string is not a valid ISO-8601 UTC instant.
    #[error("invalid base time {input:?}: {source}")]
    InvalidBaseTime {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A rule pattern in the grammar failed to compile.
    #[error("grammar rule {rule:?} failed to compile: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// A rule pattern references a sub-pattern symbol that was never defined.
    #[error("grammar rule {rule:?} references undefined symbol {symbol:?}")]
    UnknownSymbol { rule: String, symbol: String },

    /// A rule emit spec names a filter that does not exist.
    #[error("grammar rule {rule:?} uses unknown emit filter {filter:?}")]
    UnknownFilter { rule: String, filter: String },

    /// The grammar cache artifact could not be written.
    #[error("failed to write grammar artifact: {0}")]
    CacheWrite(#[source] std::io::Error),
}
