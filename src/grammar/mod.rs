//! Rule grammar: declarative, weighted fragments composed per language.
//!
//! A fragment maps a surface pattern to a bracketed tag via an
//! [`EmitSpec`](emit::EmitSpec). Fragments compose by union; weights
//! implement priority (lower weight wins on ambiguity). Patterns may
//! reference named sub-patterns (`@name@`) defined earlier in the builder;
//! references are resolved once, in definition order, before composition.

pub mod emit;
pub mod en;
pub mod zh;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::language::Language;
use emit::EmitSpec;

// Priority bands. Lower weight wins when two fragments match at the same
// position; composite fragments sit below the fragments they extend so the
// longer, more specific reading is preferred.
pub(crate) const W_NOISE: u32 = 0;
pub(crate) const W_UTC: u32 = 10;
pub(crate) const W_UTC_PARTIAL: u32 = 12;
pub(crate) const W_LUNAR: u32 = 14;
pub(crate) const W_HOLIDAY: u32 = 16;
pub(crate) const W_RECUR: u32 = 18;
pub(crate) const W_SPAN: u32 = 20;
pub(crate) const W_WEEK_COMPOSED: u32 = 22;
pub(crate) const W_WEEK: u32 = 24;
pub(crate) const W_REL: u32 = 26;
pub(crate) const W_DELTA: u32 = 28;
pub(crate) const W_PERIOD: u32 = 30;
pub(crate) const W_CLOCK: u32 = 32;
pub(crate) const W_YEAR_ONLY: u32 = 34;
pub(crate) const W_MONTH_ONLY: u32 = 36;
pub(crate) const W_ORDINAL: u32 = 38;
pub(crate) const W_RANGE: u32 = 40;

/// One rule fragment: pattern source plus emit spec. Fully declarative,
/// which is what makes the grammar artifact serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub name: String,
    pub weight: u32,
    pub pattern: String,
    pub emit: EmitSpec,
}

/// A compiled grammar: the fragment set plus one compiled automaton per
/// fragment. Immutable after construction and shareable across threads.
pub struct Grammar {
    pub language: Language,
    pub fragments: Vec<Fragment>,
    pub(crate) compiled: Vec<Regex>,
    pub hash: String,
}

impl Grammar {
    /// Compile a fragment set. Pattern errors are fatal (grammar load
    /// failure at construction).
    pub fn compile(
        language: Language,
        fragments: Vec<Fragment>,
        hash: String,
    ) -> Result<Grammar, Error> {
        let mut compiled = Vec::with_capacity(fragments.len());
        for frag in &fragments {
            let re = Regex::new(&frag.pattern).map_err(|e| Error::Pattern {
                rule: frag.name.clone(),
                source: Box::new(e),
            })?;
            compiled.push(re);
        }
        Ok(Grammar {
            language,
            fragments,
            compiled,
            hash,
        })
    }
}

/// Builds a language's fragment list, resolving `@symbol@` references and
/// validating emit filters as rules are added. The first error wins and is
/// reported from [`GrammarBuilder::finish`].
pub(crate) struct GrammarBuilder {
    symbols: Vec<(String, String)>,
    fragments: Vec<Fragment>,
    error: Option<Error>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        GrammarBuilder {
            symbols: Vec::new(),
            fragments: Vec::new(),
            error: None,
        }
    }

    /// Define a named sub-pattern. May reference previously defined symbols.
    pub fn define(&mut self, name: &str, pattern: &str) {
        match self.resolve(pattern) {
            Ok(resolved) => self.symbols.push((name.to_string(), resolved)),
            Err(symbol) => self.fail_symbol(name, symbol),
        }
    }

    /// Add a rule fragment.
    pub fn rule(&mut self, name: &str, weight: u32, pattern: &str, spec: EmitSpec) {
        let resolved = match self.resolve(pattern) {
            Ok(r) => r,
            Err(symbol) => {
                self.fail_symbol(name, symbol);
                return;
            }
        };
        for filter in spec.filters() {
            if !emit::filter_exists(filter) {
                if self.error.is_none() {
                    self.error = Some(Error::UnknownFilter {
                        rule: name.to_string(),
                        filter: filter.to_string(),
                    });
                }
                return;
            }
        }
        self.fragments.push(Fragment {
            name: name.to_string(),
            weight,
            pattern: resolved,
            emit: spec,
        });
    }

    pub fn finish(self) -> Result<Vec<Fragment>, Error> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.fragments),
        }
    }

    fn fail_symbol(&mut self, rule: &str, symbol: String) {
        if self.error.is_none() {
            self.error = Some(Error::UnknownSymbol {
                rule: rule.to_string(),
                symbol,
            });
        }
    }

    /// Substitute `@name@` references. Symbols are stored pre-resolved, so
    /// one pass suffices and cycles cannot form.
    fn resolve(&self, pattern: &str) -> Result<String, String> {
        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;
        while let Some(at) = rest.find('@') {
            out.push_str(&rest[..at]);
            let tail = &rest[at + 1..];
            let close = tail.find('@').ok_or_else(|| tail.to_string())?;
            let name = &tail[..close];
            let resolved = self
                .symbols
                .iter()
                .rev()
                .find(|(n, _)| n == name)
                .map(|(_, p)| p.as_str())
                .ok_or_else(|| name.to_string())?;
            out.push_str("(?:");
            out.push_str(resolved);
            out.push(')');
            rest = &tail[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// The built-in fragment set for a language.
pub fn fragments_for(language: Language) -> Result<Vec<Fragment>, Error> {
    match language {
        Language::Chinese => zh::fragments(),
        Language::English => en::fragments(),
    }
}
