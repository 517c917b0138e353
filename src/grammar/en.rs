//! English rule fragments.
//!
//! Matched against preprocessed (lowercased, width-folded) text. Word
//! boundaries matter here in a way they don't for Chinese: connectors like
//! "to" and "and" would otherwise fire inside ordinary words.

use super::emit::emit;
use super::{
    Fragment, GrammarBuilder, W_CLOCK, W_DELTA, W_HOLIDAY, W_MONTH_ONLY, W_NOISE, W_ORDINAL,
    W_PERIOD, W_RANGE, W_RECUR, W_REL, W_SPAN, W_UTC, W_UTC_PARTIAL, W_WEEK, W_WEEK_COMPOSED,
    W_YEAR_ONLY,
};
use crate::error::Error;

fn holiday(b: &mut GrammarBuilder, name: &str, pattern: &str, id: &str) {
    b.rule(name, W_HOLIDAY, pattern, emit("HOLIDAY").set("id", id));
}

pub fn fragments() -> Result<Vec<Fragment>, Error> {
    let mut b = GrammarBuilder::new();

    b.define(
        "wd",
        "monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun",
    );
    b.define(
        "month",
        "january|february|march|april|may|june|july|august|september|sept|october|november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec",
    );
    // Bare month references; "may" is left out to avoid the modal verb.
    b.define(
        "monthword",
        "january|february|march|april|june|july|august|september|october|november|december",
    );
    b.define("clockh", r"2[0-3]|1\d|0?\d");
    b.define("min2", "[0-5][0-9]");
    b.define("fuzzy", "a couple of|a couple|a few|few|several|an|a");
    b.define("unit", "second|minute|hour|day|week|month|year");
    b.define(
        "ordw",
        "first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth",
    );
    b.define("meridiem", r"am|pm|a\.m\.|p\.m\.");

    // ---- disambiguation guards ----
    b.rule("noise/digit run", W_NOISE, r"\d{8,}", emit("NOISE"));
    b.rule("noise/version run", W_NOISE, r"\d+\.\d+\.\d+", emit("NOISE"));

    // ---- absolute dates ----
    b.rule(
        "date/ymd",
        W_UTC,
        r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b",
        emit("UTC")
            .group("year", 1, "year")
            .group("month", 2, "month")
            .group("day", 3, "day31"),
    );
    b.rule(
        "date/mdy slash",
        W_UTC_PARTIAL,
        r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b",
        emit("UTC")
            .group("month", 1, "month")
            .group("day", 2, "day31")
            .group("year", 3, "year"),
    );
    b.rule(
        "date/month day year",
        W_UTC,
        r"\b(@month@)\s+(\d{1,2})(?:st|nd|rd|th)?\s*,?\s+(\d{4})\b",
        emit("UTC")
            .group("month", 1, "month_en")
            .group("day", 2, "day31")
            .group("year", 3, "year"),
    );
    b.rule(
        "date/month day",
        W_UTC_PARTIAL,
        r"\b(@month@)\s+(\d{1,2})(?:st|nd|rd|th)?\b",
        emit("UTC")
            .group("month", 1, "month_en")
            .group("day", 2, "day31"),
    );
    b.rule(
        "date/day of month",
        W_UTC_PARTIAL,
        r"\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?(@month@)(?:\s*,?\s+(\d{4}))?\b",
        emit("UTC")
            .group("day", 1, "day31")
            .group("month", 2, "month_en")
            .opt_group("year", 3, "year"),
    );
    b.rule(
        "date/month only",
        W_MONTH_ONLY,
        r"\b(@monthword@)\b",
        emit("UTC").group("month", 1, "month_en"),
    );
    b.rule(
        "date/in year",
        W_YEAR_ONLY,
        r"\bin\s+(1[6-9]\d{2}|20\d{2})\b",
        emit("UTC").group("year", 1, "year"),
    );

    // ---- relative days / weeks / months / years ----
    b.rule(
        "rel/day after tomorrow",
        W_WEEK_COMPOSED,
        r"\b(?:the\s+)?day\s+after\s+tomorrow\b",
        emit("REL").set("unit", "day").set("offset", "2"),
    );
    b.rule(
        "rel/day before yesterday",
        W_WEEK_COMPOSED,
        r"\b(?:the\s+)?day\s+before\s+yesterday\b",
        emit("REL").set("unit", "day").set("offset", "-2"),
    );
    b.rule(
        "rel/tomorrow",
        W_REL,
        r"\btomorrow\b",
        emit("REL").set("unit", "day").set("offset", "1"),
    );
    b.rule(
        "rel/yesterday",
        W_REL,
        r"\byesterday\b",
        emit("REL").set("unit", "day").set("offset", "-1"),
    );
    b.rule(
        "rel/today",
        W_REL,
        r"\btoday\b",
        emit("REL").set("unit", "day").set("offset", "0"),
    );
    b.rule(
        "rel/tonight",
        W_WEEK_COMPOSED,
        r"\btonight\b",
        emit("REL")
            .set("unit", "day")
            .set("offset", "0")
            .set("period", "evening"),
    );
    b.rule(
        "rel/this next last week",
        W_REL,
        r"\b(this|next|last)\s+week\b",
        emit("REL").set("unit", "week").group("offset", 1, "offset_en"),
    );
    b.rule(
        "rel/week after next",
        W_WEEK_COMPOSED,
        r"\bweek\s+after\s+next\b",
        emit("REL").set("unit", "week").set("offset", "2"),
    );
    b.rule(
        "rel/this next last month",
        W_REL,
        r"\b(this|next|last)\s+month\b",
        emit("REL").set("unit", "month").group("offset", 1, "offset_en"),
    );
    b.rule(
        "rel/this next last year",
        W_REL,
        r"\b(this|next|last)\s+year\b",
        emit("REL").set("unit", "year").group("offset", 1, "offset_en"),
    );

    // ---- weekdays ----
    b.rule(
        "week/modified weekday",
        W_WEEK_COMPOSED,
        r"\b(this|next|last)\s+(@wd@)\b",
        emit("WEEK")
            .group("weekday", 2, "weekday_en")
            .group("modifier", 1, "wmod_en"),
    );
    b.rule(
        "week/weekday after next",
        W_WEEK_COMPOSED,
        r"\b(@wd@)\s+after\s+next\b",
        emit("WEEK")
            .group("weekday", 1, "weekday_en")
            .set("modifier", "afternext"),
    );
    b.rule(
        "week/nth weekday of month",
        W_WEEK_COMPOSED,
        r"\b(?:the\s+)?(@ordw@)\s+(@wd@)\s+(?:of|in)\s+(@month@)\b",
        emit("WEEK")
            .group("weekday", 2, "weekday_en")
            .group("modifier", 1, "ordword_en")
            .group("month", 3, "month_en"),
    );
    b.rule(
        "week/last weekday of month",
        W_WEEK_COMPOSED,
        r"\b(?:the\s+)?last\s+(@wd@)\s+(?:of|in)\s+(@month@)\b",
        emit("WEEK")
            .group("weekday", 1, "weekday_en")
            .set("modifier", "lastof")
            .group("month", 2, "month_en"),
    );
    b.rule(
        "week/bare weekday",
        W_WEEK,
        r"\b(@wd@)\b",
        emit("WEEK").group("weekday", 1, "weekday_en"),
    );
    b.rule(
        "week/weekend",
        W_WEEK,
        r"\b(?:(this|next|last)\s+)?weekend\b",
        emit("WEEK")
            .set("weekday", "5")
            .opt_group("modifier", 1, "wmod_en")
            .set("weekend", "true"),
    );

    // ---- parts of day ----
    b.rule(
        "period/named",
        W_PERIOD,
        r"\b(?:in\s+the\s+)?(morning|afternoon|evening|night|dawn|midday|noon|midnight)\b",
        emit("PERIOD").group("kind", 1, "period_en"),
    );

    // ---- clock times ----
    b.rule(
        "clock/digital",
        W_CLOCK,
        r"\b(@clockh@):(@min2@)(?::(@min2@))?(?:\s*(@meridiem@))?",
        emit("CLOCK")
            .group("hour", 1, "hour")
            .group("minute", 2, "minute")
            .opt_group("second", 3, "minute")
            .opt_group("meridiem", 4, "ampm"),
    );
    b.rule(
        "clock/hour meridiem",
        W_CLOCK,
        r"\b(@clockh@)\s*(@meridiem@)",
        emit("CLOCK")
            .group("hour", 1, "hour")
            .group("meridiem", 2, "ampm"),
    );
    b.rule(
        "clock/oclock",
        W_CLOCK,
        r"\b(@clockh@)\s*o'?clock\b",
        emit("CLOCK").group("hour", 1, "hour"),
    );
    b.rule(
        "clock/half past",
        W_CLOCK,
        r"\bhalf\s+past\s+(@clockh@)\b",
        emit("CLOCK").group("hour", 1, "hour").set("minute", "30"),
    );
    b.rule(
        "clock/quarter past",
        W_CLOCK,
        r"\bquarter\s+past\s+(@clockh@)\b",
        emit("CLOCK").group("hour", 1, "hour").set("minute", "15"),
    );
    b.rule(
        "clock/quarter to",
        W_CLOCK,
        r"\bquarter\s+to\s+(@clockh@)\b",
        emit("CLOCK")
            .group("hour", 1, "hour_minus1")
            .set("minute", "45"),
    );
    b.rule(
        "clock/at hour",
        W_CLOCK,
        r"\bat\s+(@clockh@)\b",
        emit("CLOCK").group("hour", 1, "hour"),
    );

    // ---- deltas ----
    b.rule(
        "delta/in",
        W_DELTA,
        r"\bin\s+(@fuzzy@|\d{1,3})\s+(@unit@)s?(?:\s+time)?\b",
        emit("DELTA")
            .group("amount", 1, "fuzzy_en")
            .group("unit", 2, "unit_en")
            .set("dir", "1"),
    );
    b.rule(
        "delta/ago",
        W_DELTA,
        r"\b(@fuzzy@|\d{1,3})\s+(@unit@)s?\s+ago\b",
        emit("DELTA")
            .group("amount", 1, "fuzzy_en")
            .group("unit", 2, "unit_en")
            .set("dir", "-1"),
    );
    b.rule(
        "delta/from now",
        W_DELTA,
        r"\b(@fuzzy@|\d{1,3})\s+(@unit@)s?\s+(?:from\s+now|later)\b",
        emit("DELTA")
            .group("amount", 1, "fuzzy_en")
            .group("unit", 2, "unit_en")
            .set("dir", "1"),
    );
    b.rule(
        "delta/half hour shifted",
        W_DELTA,
        r"\bhalf\s+an?\s+hour\s+(ago|from now|later)\b",
        emit("DELTA")
            .set("unit", "minute")
            .set("amount", "30")
            .group("dir", 1, "dir_en"),
    );
    b.rule(
        "delta/in half hour",
        W_DELTA,
        r"\bin\s+half\s+an?\s+hour\b",
        emit("DELTA")
            .set("unit", "minute")
            .set("amount", "30")
            .set("dir", "1"),
    );
    b.rule(
        "delta/past bracket",
        W_DELTA,
        r"\b(?:the\s+)?(?:past|last)\s+(@fuzzy@|\d{1,3})\s+(@unit@)s?\b",
        emit("DELTA")
            .group("amount", 1, "fuzzy_en")
            .group("unit", 2, "unit_en")
            .set("dir", "-1")
            .set("bracket", "true"),
    );
    b.rule(
        "delta/next bracket",
        W_DELTA,
        r"\b(?:the\s+)?(?:next|coming)\s+(@fuzzy@|\d{1,3})\s+(@unit@)s?\b",
        emit("DELTA")
            .group("amount", 1, "fuzzy_en")
            .group("unit", 2, "unit_en")
            .set("dir", "1")
            .set("bracket", "true"),
    );

    // ---- range connectors ----
    b.rule("range/open from", W_RANGE, r"\bfrom\b", emit("RANGE_OPEN"));
    b.rule("range/open between", W_RANGE, r"\bbetween\b", emit("RANGE_OPEN"));
    b.rule(
        "range/sep",
        W_RANGE,
        r"\bto\b|\buntil\b|\btill\b|\bthrough\b|\bthru\b",
        emit("RANGE_SEP"),
    );
    b.rule(
        "range/sep and",
        W_RANGE + 2,
        r"\band\b",
        emit("RANGE_SEP").set("strong", "false"),
    );
    b.rule("range/sep dash", W_RANGE, "[–—]", emit("RANGE_SEP"));

    // ---- recurring ----
    b.rule(
        "recur/daily",
        W_RECUR,
        r"\bevery\s+day\b|\bdaily\b",
        emit("RECUR").set("unit", "day"),
    );
    b.rule(
        "recur/weekday",
        W_RECUR,
        r"\bevery\s+(@wd@)\b",
        emit("RECUR")
            .set("unit", "week")
            .group("weekday", 1, "weekday_en"),
    );
    b.rule(
        "recur/weekly",
        W_RECUR,
        r"\bevery\s+week\b|\bweekly\b",
        emit("RECUR").set("unit", "week"),
    );
    b.rule(
        "recur/monthly",
        W_RECUR,
        r"\bevery\s+month\b|\bmonthly\b",
        emit("RECUR").set("unit", "month"),
    );
    b.rule(
        "recur/yearly",
        W_RECUR,
        r"\bevery\s+year\b|\byearly\b|\bannually\b",
        emit("RECUR").set("unit", "year"),
    );
    b.rule(
        "recur/period",
        W_RECUR,
        r"\bevery\s+(morning|afternoon|evening|night)\b",
        emit("RECUR")
            .set("unit", "day")
            .group("period", 1, "period_en"),
    );
    b.rule(
        "recur/hourly",
        W_RECUR,
        r"\bevery\s+hour\b|\bhourly\b",
        emit("RECUR").set("unit", "hour"),
    );

    // ---- centuries and decades ----
    b.rule(
        "span/decade qualified",
        W_SPAN - 1,
        r"\b(?:the\s+)?(early|mid|late)[-\s](?:the\s+)?(\d{4}|\d{2})s\b",
        emit("DECADE")
            .group("qualifier", 1, "qual_en")
            .group("value", 2, "num"),
    );
    b.rule(
        "span/decade",
        W_SPAN,
        r"\b(?:the\s+)?(\d{4}|\d{2})s\b",
        emit("DECADE").group("value", 1, "num"),
    );
    b.rule(
        "span/century qualified",
        W_SPAN - 1,
        r"\b(?:the\s+)?(early|mid|late)\s+(\d{1,2})(?:st|nd|rd|th)\s+century\b",
        emit("CENTURY")
            .group("qualifier", 1, "qual_en")
            .group("value", 2, "num"),
    );
    b.rule(
        "span/century",
        W_SPAN,
        r"\b(?:the\s+)?(\d{1,2})(?:st|nd|rd|th)\s+century\b",
        emit("CENTURY").group("value", 1, "num"),
    );
    b.rule(
        "span/relative century",
        W_SPAN,
        r"\b(?:the\s+)?(last|this)\s+century\b",
        emit("CENTURY").group("offset", 1, "offset_en"),
    );

    // ---- holidays ----
    holiday(&mut b, "holiday/new year eve", r"\bnew\s+year'?s?\s+eve\b", "new_year_eve");
    holiday(
        &mut b,
        "holiday/new year",
        r"\bnew\s+year'?s?(?:\s+day)?\b",
        "new_year",
    );
    holiday(
        &mut b,
        "holiday/valentines",
        r"\b(?:st\.?\s+)?valentine'?s?\s+day\b",
        "valentines",
    );
    holiday(
        &mut b,
        "holiday/st patricks",
        r"\bst\.?\s+patrick'?s?\s+day\b",
        "st_patricks",
    );
    holiday(
        &mut b,
        "holiday/april fools",
        r"\bapril\s+fools?'?\s+day\b|\bapril\s+fools\b",
        "april_fools",
    );
    holiday(&mut b, "holiday/easter", r"\beaster(?:\s+sunday)?\b", "easter");
    holiday(&mut b, "holiday/good friday", r"\bgood\s+friday\b", "good_friday");
    holiday(
        &mut b,
        "holiday/independence day",
        r"\bindependence\s+day\b|\b(?:the\s+)?fourth\s+of\s+july\b",
        "independence_day",
    );
    holiday(&mut b, "holiday/halloween", r"\bhalloween\b", "halloween");
    holiday(
        &mut b,
        "holiday/thanksgiving",
        r"\bthanksgiving(?:\s+day)?\b",
        "thanksgiving",
    );
    holiday(&mut b, "holiday/black friday", r"\bblack\s+friday\b", "black_friday");
    holiday(
        &mut b,
        "holiday/christmas eve",
        r"\b(?:christmas|xmas)\s+eve\b",
        "christmas_eve",
    );
    holiday(
        &mut b,
        "holiday/christmas",
        r"\b(?:christmas|xmas)(?:\s+day)?\b",
        "christmas",
    );
    holiday(&mut b, "holiday/mothers day", r"\bmother'?s?\s+day\b", "mothers_day");
    holiday(&mut b, "holiday/fathers day", r"\bfather'?s?\s+day\b", "fathers_day");
    holiday(&mut b, "holiday/labor day", r"\blabou?r\s+day\b", "labor_day_us");
    holiday(&mut b, "holiday/memorial day", r"\bmemorial\s+day\b", "memorial_day");
    holiday(
        &mut b,
        "holiday/mlk day",
        r"\bmlk\s+day\b|\bmartin\s+luther\s+king(?:\s+jr\.?)?(?:'s)?\s+day\b",
        "mlk_day",
    );
    holiday(&mut b, "holiday/veterans day", r"\bveterans?\s+day\b", "veterans_day");
    holiday(
        &mut b,
        "holiday/groundhog day",
        r"\bgroundhog'?s?\s+day\b",
        "groundhog_day",
    );
    holiday(
        &mut b,
        "holiday/chinese new year",
        r"\b(?:chinese|lunar)\s+new\s+year(?:'?s)?(?:\s+day)?\b",
        "spring_festival",
    );

    // ---- ordinals ----
    b.rule(
        "ordinal",
        W_ORDINAL,
        r"\b(\d{1,2})(?:st|nd|rd|th)\b",
        emit("ORDINAL").group("k", 1, "ord_en"),
    );

    b.finish()
}
