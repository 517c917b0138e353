//! Declarative emit specs.
//!
//! Each rule fragment pairs a pattern with an [`EmitSpec`]: the tag family
//! to emit plus how to fill each payload field from the match (a capture
//! group, optionally passed through a named filter, or a constant). Keeping
//! the emit side as data rather than closures is what makes the compiled
//! grammar serializable into the on-disk artifact.

use serde::{Deserialize, Serialize};

/// Where a field value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Capture group index of the fragment pattern.
    Group(usize),
    /// Literal value.
    Const(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub source: FieldSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// Family plus field specs; renders to the bracketed wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitSpec {
    pub family: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// Start an emit spec for the given tag family.
pub fn emit(family: &str) -> EmitSpec {
    EmitSpec {
        family: family.to_string(),
        fields: Vec::new(),
    }
}

impl EmitSpec {
    fn push(mut self, name: &str, source: FieldSource, filter: Option<&str>, optional: bool) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            source,
            filter: filter.map(str::to_string),
            optional,
        });
        self
    }

    /// Constant field value.
    pub fn set(self, name: &str, value: &str) -> Self {
        self.push(name, FieldSource::Const(value.to_string()), None, false)
    }

    /// Required capture group, passed through `filter`. The fragment emits
    /// nothing when the group is absent or the filter rejects the value.
    pub fn group(self, name: &str, idx: usize, filter: &str) -> Self {
        self.push(name, FieldSource::Group(idx), Some(filter), false)
    }

    /// Optional capture group: the field is omitted when the group did not
    /// participate in the match or the filter rejects it.
    pub fn opt_group(self, name: &str, idx: usize, filter: &str) -> Self {
        self.push(name, FieldSource::Group(idx), Some(filter), true)
    }

    /// Render against a concrete match. `None` means the fragment does not
    /// apply (failed validation filter or missing required group).
    pub fn render(&self, caps: &regex::Captures<'_>) -> Option<String> {
        let mut out = String::with_capacity(32);
        out.push('[');
        out.push_str(&self.family);
        for field in &self.fields {
            let raw = match &field.source {
                FieldSource::Const(v) => Some(v.clone()),
                FieldSource::Group(i) => caps.get(*i).map(|m| m.as_str().trim().to_string()),
            };
            let raw = match raw {
                Some(r) if !r.is_empty() => r,
                _ if field.optional => continue,
                _ => return None,
            };
            let value = match &field.filter {
                Some(name) => match apply_filter(name, &raw) {
                    Some(v) => v,
                    None if field.optional => continue,
                    None => return None,
                },
                None => raw,
            };
            out.push(' ');
            out.push_str(&field.name);
            out.push('=');
            out.push_str(&value);
        }
        out.push(']');
        Some(out)
    }

    /// All filter names referenced by this spec, for build-time validation.
    pub fn filters(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.filter.as_deref())
    }
}

// ============================================================
// Numeral canonicalization
// ============================================================

fn zh_digit(c: char) -> Option<i64> {
    match c {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' | '两' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// Parse an Arabic or Chinese numeral. Handles structured tens (十五, 二十三,
/// 廿三, 卅一) and plain digit concatenation (二〇二五).
pub fn zh_num(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok();
    }
    match s {
        "十" => return Some(10),
        "廿" => return Some(20),
        "卅" => return Some(30),
        _ => {}
    }
    if let Some(rest) = s.strip_prefix('廿') {
        return Some(20 + zh_digit(rest.chars().next()?)?);
    }
    if let Some(rest) = s.strip_prefix('卅') {
        return Some(30 + zh_digit(rest.chars().next()?)?);
    }
    if let Some((a, b)) = s.split_once('十') {
        let tens = if a.is_empty() {
            1
        } else {
            zh_digit(a.chars().next()?)?
        };
        let ones = if b.is_empty() {
            0
        } else {
            zh_digit(b.chars().next()?)?
        };
        return Some(tens * 10 + ones);
    }
    // Plain digit concatenation: 二〇二五 → 2025, 九八 → 98.
    let mut value: i64 = 0;
    for c in s.chars() {
        value = value.checked_mul(10)?.checked_add(zh_digit(c)?)?;
    }
    Some(value)
}

fn num_in(s: &str, lo: i64, hi: i64) -> Option<String> {
    let v = zh_num(s)?;
    if (lo..=hi).contains(&v) {
        Some(v.to_string())
    } else {
        None
    }
}

// ============================================================
// Filter catalog
// ============================================================

fn weekday_zh(s: &str) -> Option<String> {
    let d = match s {
        "一" => 0,
        "二" => 1,
        "三" => 2,
        "四" => 3,
        "五" => 4,
        "六" => 5,
        "日" | "天" => 6,
        _ => return None,
    };
    Some(d.to_string())
}

fn weekday_en(s: &str) -> Option<String> {
    let d = match s {
        "monday" | "mon" => 0,
        "tuesday" | "tue" | "tues" => 1,
        "wednesday" | "wed" => 2,
        "thursday" | "thu" | "thur" | "thurs" => 3,
        "friday" | "fri" => 4,
        "saturday" | "sat" => 5,
        "sunday" | "sun" => 6,
        _ => return None,
    };
    Some(d.to_string())
}

fn month_en(s: &str) -> Option<String> {
    let m = match s {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(m.to_string())
}

fn period_zh(s: &str) -> Option<String> {
    let kind = match s {
        "凌晨" | "清晨" | "拂晓" | "黎明" => "dawn",
        "早上" | "早晨" | "一早" | "上午" | "早" => "morning",
        "中午" | "正午" => "noon",
        "下午" | "午后" => "afternoon",
        "傍晚" | "晚上" | "晚间" | "晚" => "evening",
        "夜里" | "夜晚" | "夜间" | "深夜" => "night",
        "半夜" | "午夜" => "midnight",
        _ => return None,
    };
    Some(kind.to_string())
}

fn period_en(s: &str) -> Option<String> {
    let kind = match s {
        "dawn" => "dawn",
        "morning" => "morning",
        "noon" | "midday" => "noon",
        "afternoon" => "afternoon",
        "evening" => "evening",
        "night" => "night",
        "midnight" => "midnight",
        _ => return None,
    };
    Some(kind.to_string())
}

fn chain_zh(s: &str) -> Option<String> {
    let mut n: i64 = 0;
    for c in s.chars() {
        match c {
            '下' => n += 1,
            '上' => n -= 1,
            _ => return None,
        }
    }
    if n == 0 {
        return None;
    }
    Some(n.to_string())
}

fn unit_zh(s: &str) -> Option<String> {
    let unit = if s.starts_with('秒') {
        "second"
    } else if s.starts_with('分') {
        "minute"
    } else if s.starts_with("小时") || s.starts_with("钟头") || s.starts_with("个小时") {
        "hour"
    } else if s == "天" || s == "日" {
        "day"
    } else if s == "周" || s == "星期" || s == "礼拜" {
        "week"
    } else if s == "月" || s == "个月" {
        "month"
    } else if s == "年" {
        "year"
    } else {
        return None;
    };
    Some(unit.to_string())
}

fn unit_en(s: &str) -> Option<String> {
    match s {
        "second" | "minute" | "hour" | "day" | "week" | "month" | "year" => Some(s.to_string()),
        _ => None,
    }
}

fn lunar_day(s: &str) -> Option<String> {
    if let Some(rest) = s.strip_prefix('初') {
        let v = zh_num(rest)?;
        return num_in(&v.to_string(), 1, 10);
    }
    num_in(s, 1, 30)
}

fn lunar_month(s: &str) -> Option<String> {
    match s {
        "正" => Some("1".to_string()),
        "冬" => Some("11".to_string()),
        "腊" => Some("12".to_string()),
        _ => num_in(s, 1, 12),
    }
}

fn ordword_en(s: &str) -> Option<String> {
    let k = match s {
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        "eleventh" => 11,
        "twelfth" => 12,
        _ => return None,
    };
    Some(format!("nth:{k}"))
}

fn ord_en(s: &str) -> Option<String> {
    let digits = s
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim();
    num_in(digits, 1, 31)
}

fn term_zh(s: &str) -> Option<String> {
    let id = match s {
        "小寒" => "xiaohan",
        "大寒" => "dahan",
        "立春" => "lichun",
        "雨水" => "yushui",
        "惊蛰" => "jingzhe",
        "春分" => "chunfen",
        "清明" => "qingming",
        "谷雨" => "guyu",
        "立夏" => "lixia",
        "小满" => "xiaoman",
        "芒种" => "mangzhong",
        "夏至" => "xiazhi",
        "小暑" => "xiaoshu",
        "大暑" => "dashu",
        "立秋" => "liqiu",
        "处暑" => "chushu",
        "白露" => "bailu",
        "秋分" => "qiufen",
        "寒露" => "hanlu",
        "霜降" => "shuangjiang",
        "立冬" => "lidong",
        "小雪" => "xiaoxue",
        "大雪" => "daxue",
        "冬至" => "dongzhi",
        _ => return None,
    };
    Some(id.to_string())
}

fn relday_zh(s: &str) -> Option<String> {
    let offset = match s {
        "大前天" => -3,
        "前天" => -2,
        "昨天" | "昨日" | "昨" => -1,
        "今天" | "今日" | "当天" | "今" => 0,
        "明天" | "明日" | "明" => 1,
        "后天" => 2,
        "大后天" => 3,
        _ => return None,
    };
    Some(offset.to_string())
}

fn relyear_zh(s: &str) -> Option<String> {
    let offset = match s {
        "前年" => -2,
        "去年" => -1,
        "今年" => 0,
        "明年" => 1,
        "后年" => 2,
        _ => return None,
    };
    Some(offset.to_string())
}

fn apply_named(name: &str, s: &str) -> Option<String> {
    match name {
        "num" => zh_num(s).map(|v| v.to_string()),
        "month" => num_in(s, 1, 12),
        "day31" => num_in(s, 1, 31),
        "hour" => num_in(s, 0, 23),
        "minute" => num_in(s, 0, 59),
        "year" => num_in(s, 1, 9999),
        "weekday_zh" => weekday_zh(s),
        "weekday_en" => weekday_en(s),
        "month_en" => month_en(s),
        "period_zh" => period_zh(s),
        "period_en" => period_en(s),
        "mod_zh" => match s {
            "上" => Some("-1".to_string()),
            "这" | "本" | "今" => Some("0".to_string()),
            "下" => Some("1".to_string()),
            _ => None,
        },
        "wmod_en" => match s {
            "this" | "next" | "last" => Some(s.to_string()),
            _ => None,
        },
        "offset_en" => match s {
            "this" => Some("0".to_string()),
            "next" => Some("1".to_string()),
            "last" => Some("-1".to_string()),
            _ => None,
        },
        "wmod_zh" => match s {
            "上" => Some("last".to_string()),
            "这" | "本" => Some("this".to_string()),
            "下" => Some("next".to_string()),
            _ => None,
        },
        "chain_zh" => chain_zh(s),
        "dir_zh" => {
            if s.ends_with('前') {
                Some("-1".to_string())
            } else if s.ends_with('后') || s.ends_with('内') {
                Some("1".to_string())
            } else {
                None
            }
        }
        "dir_en" => {
            if s == "ago" {
                Some("-1".to_string())
            } else if s == "later" || s == "from now" {
                Some("1".to_string())
            } else {
                None
            }
        }
        "fuzzy_zh" => {
            if s == "几" {
                Some("3".to_string())
            } else {
                num_in(s, 1, 9999)
            }
        }
        "fuzzy_en" => match s {
            "a" | "an" => Some("1".to_string()),
            "a couple of" | "a couple" => Some("2".to_string()),
            "a few" | "few" | "several" => Some("3".to_string()),
            _ => num_in(s, 1, 9999),
        },
        "unit_zh" => unit_zh(s),
        "unit_en" => unit_en(s),
        "ampm" => {
            if s.starts_with('a') {
                Some("am".to_string())
            } else if s.starts_with('p') {
                Some("pm".to_string())
            } else {
                None
            }
        }
        "quarter_zh" => match s {
            "一" => Some("15".to_string()),
            "三" => Some("45".to_string()),
            _ => None,
        },
        "lunar_day" => lunar_day(s),
        "lunar_month" => lunar_month(s),
        "ordword_en" => ordword_en(s),
        "ord_en" => ord_en(s),
        "qual_zh" => match s {
            "前期" | "初期" | "初" => Some("early".to_string()),
            "中期" => Some("mid".to_string()),
            "后期" | "末期" | "末" | "晚期" => Some("late".to_string()),
            _ => None,
        },
        "qual_en" => match s {
            "early" | "mid" | "late" => Some(s.to_string()),
            _ => None,
        },
        "hour_minus1" => {
            let v = zh_num(s)?;
            if (1..=23).contains(&v) {
                Some((v - 1).to_string())
            } else {
                None
            }
        }
        "term_zh" => term_zh(s),
        "relday_zh" => relday_zh(s),
        "relyear_zh" => relyear_zh(s),
        "nth" => {
            let v = zh_num(s)?;
            if (1..=5).contains(&v) {
                Some(format!("nth:{v}"))
            } else {
                None
            }
        }
        "half_zh" => match s {
            "上" => Some("1".to_string()),
            "下" => Some("2".to_string()),
            _ => None,
        },
        "cent_mod_zh" => match s {
            "上" => Some("-1".to_string()),
            "这" | "本" => Some("0".to_string()),
            _ => None,
        },
        "flag" => Some("true".to_string()),
        _ => None,
    }
}

/// Apply a named filter. Returns `None` both for rejected values and for
/// unknown filter names; the latter is caught at grammar build time via
/// [`filter_exists`].
pub fn apply_filter(name: &str, s: &str) -> Option<String> {
    apply_named(name, s)
}

/// Build-time check that an emit spec only references known filters.
pub fn filter_exists(name: &str) -> bool {
    const KNOWN: &[&str] = &[
        "num",
        "month",
        "day31",
        "hour",
        "minute",
        "year",
        "weekday_zh",
        "weekday_en",
        "month_en",
        "period_zh",
        "period_en",
        "mod_zh",
        "wmod_en",
        "wmod_zh",
        "offset_en",
        "chain_zh",
        "dir_zh",
        "dir_en",
        "fuzzy_zh",
        "fuzzy_en",
        "unit_zh",
        "unit_en",
        "ampm",
        "quarter_zh",
        "lunar_day",
        "lunar_month",
        "ordword_en",
        "ord_en",
        "qual_zh",
        "qual_en",
        "hour_minus1",
        "term_zh",
        "relday_zh",
        "relyear_zh",
        "nth",
        "half_zh",
        "cent_mod_zh",
        "flag",
    ];
    KNOWN.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zh_num_plain() {
        assert_eq!(zh_num("3"), Some(3));
        assert_eq!(zh_num("2025"), Some(2025));
        assert_eq!(zh_num("三"), Some(3));
        assert_eq!(zh_num("两"), Some(2));
        assert_eq!(zh_num("〇"), Some(0));
    }

    #[test]
    fn test_zh_num_tens() {
        assert_eq!(zh_num("十"), Some(10));
        assert_eq!(zh_num("十五"), Some(15));
        assert_eq!(zh_num("二十"), Some(20));
        assert_eq!(zh_num("二十三"), Some(23));
        assert_eq!(zh_num("廿三"), Some(23));
        assert_eq!(zh_num("卅一"), Some(31));
    }

    #[test]
    fn test_zh_num_concat_year() {
        assert_eq!(zh_num("二〇二五"), Some(2025));
        assert_eq!(zh_num("一九八〇"), Some(1980));
    }

    #[test]
    fn test_zh_num_rejects() {
        assert_eq!(zh_num(""), None);
        assert_eq!(zh_num("abc"), None);
        assert_eq!(zh_num("点"), None);
    }

    #[test]
    fn test_lunar_day_forms() {
        assert_eq!(apply_filter("lunar_day", "初一"), Some("1".to_string()));
        assert_eq!(apply_filter("lunar_day", "初十"), Some("10".to_string()));
        assert_eq!(apply_filter("lunar_day", "十五"), Some("15".to_string()));
        assert_eq!(apply_filter("lunar_day", "廿三"), Some("23".to_string()));
        assert_eq!(apply_filter("lunar_day", "三十"), Some("30".to_string()));
    }

    #[test]
    fn test_validation_filters() {
        assert_eq!(apply_filter("month", "13"), None);
        assert_eq!(apply_filter("hour", "24"), None);
        assert_eq!(apply_filter("minute", "59"), Some("59".to_string()));
    }

    #[test]
    fn test_render_with_groups() {
        let re = regex::Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日").unwrap();
        let caps = re.captures("2025年1月22日").unwrap();
        let spec = emit("UTC")
            .group("year", 1, "year")
            .group("month", 2, "month")
            .group("day", 3, "day31");
        assert_eq!(
            spec.render(&caps),
            Some("[UTC year=2025 month=1 day=22]".to_string())
        );
    }

    #[test]
    fn test_render_rejects_bad_month() {
        let re = regex::Regex::new(r"(\d{1,2})月(\d{1,2})日").unwrap();
        let caps = re.captures("13月5日").unwrap();
        let spec = emit("UTC").group("month", 1, "month").group("day", 2, "day31");
        assert_eq!(spec.render(&caps), None);
    }

    #[test]
    fn test_render_optional_group() {
        let re = regex::Regex::new(r"(\d{1,2})点(?:(\d{1,2})分)?").unwrap();
        let spec = emit("CLOCK").group("hour", 1, "hour").opt_group("minute", 2, "minute");
        let caps = re.captures("9点").unwrap();
        assert_eq!(spec.render(&caps), Some("[CLOCK hour=9]".to_string()));
        let caps = re.captures("9点30分").unwrap();
        assert_eq!(spec.render(&caps), Some("[CLOCK hour=9 minute=30]".to_string()));
    }
}
