//! Input normalization.
//!
//! Applies, in order: full-width → half-width folding for digits and
//! punctuation, ASCII lowercasing, traditional → simplified Chinese via a
//! static table, and whitespace-run collapsing. The folded text carries
//! per-byte maps back to the original input so downstream spans can be
//! reported in source coordinates.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::language::Language;
use crate::tag::Span;

/// Traditional → simplified map covering the time vocabulary the grammar
/// matches on. Only single-char, equal-width mappings.
static T2S: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [
        ('點', '点'),
        ('時', '时'),
        ('鐘', '钟'),
        ('兩', '两'),
        ('週', '周'),
        ('禮', '礼'),
        ('後', '后'),
        ('號', '号'),
        ('農', '农'),
        ('曆', '历'),
        ('歷', '历'),
        ('陰', '阴'),
        ('舊', '旧'),
        ('閏', '闰'),
        ('歲', '岁'),
        ('節', '节'),
        ('誕', '诞'),
        ('聖', '圣'),
        ('國', '国'),
        ('慶', '庆'),
        ('勞', '劳'),
        ('動', '动'),
        ('婦', '妇'),
        ('兒', '儿'),
        ('師', '师'),
        ('親', '亲'),
        ('萬', '万'),
        ('臘', '腊'),
        ('從', '从'),
        ('間', '间'),
        ('裡', '里'),
        ('裏', '里'),
        ('當', '当'),
        ('現', '现'),
        ('幾', '几'),
        ('個', '个'),
        ('這', '这'),
        ('來', '来'),
        ('東', '东'),
        ('陽', '阳'),
        ('燈', '灯'),
        ('龍', '龙'),
        ('華', '华'),
        ('紀', '纪'),
        ('紅', '红'),
        ('內', '内'),
    ]
    .into_iter()
    .collect()
});

/// Normalized text plus byte maps back into the original input.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// The folded text the grammar is matched against.
    pub text: String,
    /// For each byte of `text`, the start offset of the source char.
    src_start: Vec<usize>,
    /// For each byte of `text`, the end offset of the source char.
    src_end: Vec<usize>,
}

impl Preprocessed {
    /// Map a span over the folded text back to source coordinates.
    pub fn source_span(&self, span: Span) -> Span {
        if span.is_empty() || self.text.is_empty() {
            return Span::new(0, 0);
        }
        let start = self.src_start.get(span.start).copied().unwrap_or(0);
        let end = self
            .src_end
            .get(span.end - 1)
            .copied()
            .unwrap_or_else(|| self.src_end.last().copied().unwrap_or(0));
        Span::new(start, end)
    }
}

fn fold_char(c: char, language: Language) -> char {
    // Full-width ASCII block and the ideographic space.
    let c = match c {
        '\u{3000}' => ' ',
        '\u{ff01}'..='\u{ff5e}' => {
            char::from_u32(c as u32 - 0xfee0).unwrap_or(c)
        }
        _ => c,
    };
    let c = c.to_ascii_lowercase();
    if language == Language::Chinese {
        if let Some(&s) = T2S.get(&c) {
            return s;
        }
    }
    c
}

/// Normalize `text` for tagging. Pure and total; never fails.
pub fn preprocess(text: &str, language: Language) -> Preprocessed {
    let mut out = String::with_capacity(text.len());
    let mut src_start = Vec::with_capacity(text.len());
    let mut src_end = Vec::with_capacity(text.len());
    let mut pending_space: Option<(usize, usize)> = None;

    for (pos, raw) in text.char_indices() {
        let src_to = pos + raw.len_utf8();
        let c = fold_char(raw, language);
        if c.is_whitespace() {
            // Collapse runs; drop leading whitespace entirely.
            if !out.is_empty() {
                pending_space = Some(match pending_space {
                    Some((from, _)) => (from, src_to),
                    None => (pos, src_to),
                });
            }
            continue;
        }
        if let Some((from, to)) = pending_space.take() {
            out.push(' ');
            src_start.push(from);
            src_end.push(to);
        }
        let at = out.len();
        out.push(c);
        for _ in at..out.len() {
            src_start.push(pos);
            src_end.push(src_to);
        }
    }
    // Trailing whitespace is dropped along with any pending space.

    debug_assert_eq!(out.len(), src_start.len());
    Preprocessed {
        text: out,
        src_start,
        src_end,
    }
}
