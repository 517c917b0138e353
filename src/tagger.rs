//! Tagging stage: apply the compiled grammar to preprocessed text.
//!
//! Every fragment is matched over the whole input; candidates are then
//! reduced to a single best non-overlapping cover, scanning left to right.
//! At a shared start position the lowest weight wins, then the longest
//! match, then fragment order: the deterministic equivalent of a
//! shortest-path pass over the weighted union. Because the sweep keeps
//! consuming candidates after each locked span, disjoint expressions later
//! in the utterance are picked up in the same pass. Locked spans are final:
//! no candidate starting inside one is considered again.

use smallvec::SmallVec;

use crate::grammar::Grammar;
use crate::preprocess::Preprocessed;
use crate::tag::Span;

/// A raw tag string plus its span in source coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTag {
    pub span: Span,
    pub text: String,
}

struct Candidate {
    start: usize,
    end: usize,
    weight: u32,
    order: usize,
    text: String,
}

/// Run the grammar over preprocessed text and emit the best tag cover.
pub fn apply(grammar: &Grammar, pre: &Preprocessed) -> SmallVec<[RawTag; 8]> {
    let mut candidates: Vec<Candidate> = Vec::new();

    for (order, fragment) in grammar.fragments.iter().enumerate() {
        let re = &grammar.compiled[order];
        for caps in re.captures_iter(&pre.text) {
            let m = caps.get(0).expect("group 0 always present");
            if m.start() == m.end() {
                continue;
            }
            if let Some(text) = fragment.emit.render(&caps) {
                candidates.push(Candidate {
                    start: m.start(),
                    end: m.end(),
                    weight: fragment.weight,
                    order,
                    text,
                });
            }
        }
    }

    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.weight.cmp(&b.weight))
            .then(b.end.cmp(&a.end))
            .then(a.order.cmp(&b.order))
    });

    let mut out = SmallVec::new();
    let mut locked_end = 0usize;
    for cand in candidates {
        if cand.start < locked_end {
            continue;
        }
        log::debug!(
            "tag {} at [{}, {}) weight {}",
            cand.text,
            cand.start,
            cand.end,
            cand.weight
        );
        locked_end = cand.end;
        out.push(RawTag {
            span: pre.source_span(Span::new(cand.start, cand.end)),
            text: cand.text,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::preprocess::preprocess;

    fn tag_texts(language: Language, text: &str) -> Vec<String> {
        let fragments = crate::grammar::fragments_for(language).unwrap();
        let grammar = Grammar::compile(language, fragments, String::new()).unwrap();
        let pre = preprocess(text, language);
        apply(&grammar, &pre).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_zh_simple_sequence() {
        let tags = tag_texts(Language::Chinese, "明天上午9点");
        assert_eq!(
            tags,
            vec![
                "[REL unit=day offset=1]",
                "[PERIOD kind=morning]",
                "[CLOCK hour=9]",
            ]
        );
    }

    #[test]
    fn test_zh_chained_week_prefers_composite() {
        let tags = tag_texts(Language::Chinese, "下下下周一");
        assert_eq!(tags, vec!["[REL unit=week offset=3 weekday=0]"]);
    }

    #[test]
    fn test_zh_noise_covers_clock_reading() {
        let tags = tag_texts(Language::Chinese, "简洁一点");
        assert_eq!(tags, vec!["[NOISE]"]);
    }

    #[test]
    fn test_zh_range_sequence() {
        let tags = tag_texts(Language::Chinese, "从明天上午9点到下午5点");
        assert_eq!(
            tags,
            vec![
                "[RANGE_OPEN]",
                "[REL unit=day offset=1]",
                "[PERIOD kind=morning]",
                "[CLOCK hour=9]",
                "[RANGE_SEP]",
                "[PERIOD kind=afternoon]",
                "[CLOCK hour=5]",
            ]
        );
    }

    #[test]
    fn test_en_day_after_tomorrow_locks_inner_tomorrow() {
        let tags = tag_texts(Language::English, "the day after tomorrow 5pm");
        assert_eq!(
            tags,
            vec![
                "[REL unit=day offset=2]",
                "[CLOCK hour=5 meridiem=pm]",
            ]
        );
    }

    #[test]
    fn test_en_decade() {
        let tags = tag_texts(Language::English, "the 80s");
        assert_eq!(tags, vec!["[DECADE value=80]"]);
    }

    #[test]
    fn test_bare_number_is_untagged() {
        assert!(tag_texts(Language::Chinese, "45901").is_empty());
        assert!(tag_texts(Language::English, "45901").is_empty());
    }
}
