//! Postprocessing: raw tag strings → validated, ordered typed tags.
//!
//! A tag that fails to parse against the schema is logged and skipped,
//! never fatal. NOISE spans suppress any tag they cover, then dominance
//! filtering drops tags fully covered by an equal-or-more specific tag,
//! and the survivors are returned in span order.

use smallvec::SmallVec;

use crate::tag::{Span, SpannedTag, Tag};
use crate::tagger::RawTag;

pub fn postprocess(raw: SmallVec<[RawTag; 8]>) -> SmallVec<[SpannedTag; 8]> {
    let mut parsed: SmallVec<[SpannedTag; 8]> = SmallVec::new();
    let mut noise: SmallVec<[Span; 2]> = SmallVec::new();

    for rt in raw {
        match Tag::parse(&rt.text) {
            Ok(Tag::Noise) => noise.push(rt.span),
            Ok(tag) => parsed.push(SpannedTag { span: rt.span, tag }),
            Err(e) => {
                log::warn!("skipping unparseable tag: {e}");
            }
        }
    }

    // NOISE suppression: drop anything inside a noise span.
    parsed.retain(|st| !noise.iter().any(|n| n.contains(&st.span)));

    // Dominance: drop a tag fully covered by a distinct tag of
    // equal-or-higher specificity.
    let snapshot: Vec<(Span, u8)> = parsed
        .iter()
        .map(|st| (st.span, st.tag.specificity()))
        .collect();
    parsed.retain(|st| {
        !snapshot.iter().any(|(span, spec)| {
            *span != st.span && span.contains(&st.span) && *spec >= st.tag.specificity()
        })
    });

    parsed.sort_by_key(|st| (st.span.start, st.span.end));
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TagFamily;

    fn raw(start: usize, end: usize, text: &str) -> RawTag {
        RawTag {
            span: Span::new(start, end),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_parse_failures_are_skipped() {
        let tags = postprocess(SmallVec::from_vec(vec![
            raw(0, 2, "[REL unit=day offset=1]"),
            raw(3, 5, "[GARBAGE"),
        ]));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag.family(), TagFamily::Rel);
    }

    #[test]
    fn test_noise_suppresses_covered_tags() {
        let tags = postprocess(SmallVec::from_vec(vec![
            raw(0, 12, "[NOISE]"),
            raw(6, 12, "[CLOCK hour=1]"),
        ]));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_dominance_drop() {
        // A CLOCK fully covered by a UTC tag is dropped.
        let tags = postprocess(SmallVec::from_vec(vec![
            raw(0, 10, "[UTC year=2025 month=1 day=22]"),
            raw(4, 8, "[CLOCK hour=1]"),
        ]));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag.family(), TagFamily::Utc);
    }

    #[test]
    fn test_sorted_by_span() {
        let tags = postprocess(SmallVec::from_vec(vec![
            raw(10, 12, "[CLOCK hour=9]"),
            raw(0, 2, "[REL unit=day offset=1]"),
        ]));
        assert_eq!(tags[0].span.start, 0);
        assert_eq!(tags[1].span.start, 10);
    }
}
