//! Totality regression: hostile and degenerate inputs must never panic and
//! must come back as `([], none)` when nothing real was recognized.

use chrono::{TimeZone, Utc};
use timetag::{Extractor, ExtractorConfig, Language, QueryTag};

fn check_total(language: Language, inputs: &[&str]) {
    let ex = Extractor::new(ExtractorConfig::new(language)).unwrap();
    let base = Utc.with_ymd_and_hms(2025, 1, 21, 8, 0, 0).unwrap();
    for text in inputs {
        let out = ex.extract(text, Some(base));
        for result in &out.results {
            if let timetag::TimeResult::Range(from, to) = result {
                assert!(from <= to, "inverted interval for {text:?}");
            }
        }
    }
}

#[test]
fn test_zh_disambiguation_list_returns_none() {
    let ex = Extractor::new(ExtractorConfig::new(Language::Chinese)).unwrap();
    let base = Utc.with_ymd_and_hms(2025, 1, 21, 8, 0, 0).unwrap();
    for text in [
        "简洁一点",
        "说得简单一点",
        "好一点点",
        "一日之计在于晨",
        "黎明的演唱会",
        "订单号110101199003071234",
        "45901",
    ] {
        let out = ex.extract(text, Some(base));
        assert!(out.results.is_empty(), "expected none for {text:?}, got {:?}", out.results);
        assert_eq!(out.query_tag, QueryTag::None, "for {text:?}");
    }
}

#[test]
fn test_degenerate_inputs_do_not_panic() {
    let hostile = [
        "",
        " ",
        "\t\n\r",
        "：：：：",
        "99999999999999999999999999999999",
        "年月日时分秒",
        "点点点点点",
        "从从从到到到",
        "每每每",
        "第第第",
        "----////::::",
        "🎉🎉🎉",
        "\u{0}\u{1}\u{2}",
    ];
    check_total(Language::Chinese, &hostile);
    check_total(Language::English, &hostile);
}

#[test]
fn test_long_input_is_handled() {
    let long_zh = "废话".repeat(2000) + "明天上午9点" + &"废话".repeat(2000);
    let ex = Extractor::new(ExtractorConfig::new(Language::Chinese)).unwrap();
    let base = Utc.with_ymd_and_hms(2025, 1, 21, 8, 0, 0).unwrap();
    let out = ex.extract(&long_zh, Some(base));
    assert_eq!(out.results.len(), 1);
    assert_eq!(out.query_tag, QueryTag::Relative);
}

#[test]
fn test_mixed_script_input() {
    let ex = Extractor::new(ExtractorConfig::new(Language::Chinese)).unwrap();
    let base = Utc.with_ymd_and_hms(2025, 1, 21, 8, 0, 0).unwrap();
    // Full-width digits and traditional characters normalize first.
    let out = ex.extract("明天９：３０開會", Some(base));
    assert_eq!(out.results.len(), 1);
}
