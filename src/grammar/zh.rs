//! Chinese rule fragments.
//!
//! Patterns are matched against preprocessed text: half-width, lowercase,
//! simplified. Weights follow the priority bands in the grammar module;
//! composite fragments (week + weekday, month + nth weekday) sit below the
//! fragments they extend so the longer reading wins at a shared start.

use super::emit::emit;
use super::{
    Fragment, GrammarBuilder, W_CLOCK, W_DELTA, W_HOLIDAY, W_LUNAR, W_MONTH_ONLY, W_NOISE,
    W_ORDINAL, W_PERIOD, W_RANGE, W_RECUR, W_REL, W_SPAN, W_UTC, W_UTC_PARTIAL, W_WEEK,
    W_WEEK_COMPOSED, W_YEAR_ONLY,
};
use crate::error::Error;

fn holiday(b: &mut GrammarBuilder, name: &str, pattern: &str, id: &str) {
    b.rule(name, W_HOLIDAY, pattern, emit("HOLIDAY").set("id", id));
}

fn delta_half(b: &mut GrammarBuilder, name: &str, pattern: &str, unit: &str, amount: &str) {
    b.rule(
        name,
        W_DELTA,
        pattern,
        emit("DELTA")
            .set("unit", unit)
            .set("amount", amount)
            .group("dir", 1, "dir_zh"),
    );
}

pub fn fragments() -> Result<Vec<Fragment>, Error> {
    let mut b = GrammarBuilder::new();

    b.define("zhd", "[〇零一二三四五六七八九]");
    b.define(
        "zhnum",
        r"[一二三四五六七八九两]?十[一二三四五六七八九]?|廿[一二三四五六七八九]?|卅[一二三四五六七八九]?|[〇零一二三四五六七八九两]+|\d{1,4}",
    );
    b.define(
        "zhhour",
        r"2[0-3]|[01]?\d|二十[一二三]?|十[一二三四五六七八九]?|[零〇一二三四五六七八九两]",
    );
    b.define("weekw", "星期|周|礼拜");
    b.define("wd", "[一二三四五六日天]");
    b.define(
        "unit",
        "秒钟|秒|分钟|小时|钟头|天|日|周|星期|礼拜|个月|月|年",
    );
    b.define("chuday", "初[〇零一二三四五六七八九十]");

    // ---- disambiguation guards ----
    b.rule("noise/digit run", W_NOISE, r"\d{8,}", emit("NOISE"));
    b.rule(
        "noise/degree yidian",
        W_NOISE,
        "(?:有|差|好|简洁|简单|容易|方便|快|慢|早|晚|大|小|多|少|高|低|便宜|贵|注意|小心)(?:了|得)?一(?:点点|点儿|点)",
        emit("NOISE"),
    );
    b.rule("noise/yidian suffix", W_NOISE, "一点(?:点|儿)", emit("NOISE"));
    b.rule(
        "noise/liming as name",
        W_NOISE,
        "黎明(?:的|说|讲|表示|先生|女士|老师|同学)",
        emit("NOISE"),
    );
    b.rule("noise/idiom", W_NOISE, "一日之计在于晨", emit("NOISE"));

    // ---- absolute dates ----
    b.rule(
        "date/ymd numeric",
        W_UTC,
        r"(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})",
        emit("UTC")
            .group("year", 1, "year")
            .group("month", 2, "month")
            .group("day", 3, "day31"),
    );
    b.rule(
        "date/ymd",
        W_UTC,
        r"(\d{4}|@zhd@{4})年(@zhnum@)月(@zhnum@)[日号]",
        emit("UTC")
            .group("year", 1, "year")
            .group("month", 2, "month")
            .group("day", 3, "day31"),
    );
    b.rule(
        "date/month day",
        W_UTC_PARTIAL,
        "(@zhnum@)月(@zhnum@)[日号]",
        emit("UTC").group("month", 1, "month").group("day", 2, "day31"),
    );
    b.rule(
        "date/year month",
        W_UTC_PARTIAL,
        r"(\d{4}|@zhd@{4})年(@zhnum@)月",
        emit("UTC").group("year", 1, "year").group("month", 2, "month"),
    );
    b.rule(
        "date/year only",
        W_YEAR_ONLY,
        r"(\d{4}|@zhd@{4})年",
        emit("UTC").group("year", 1, "year"),
    );
    b.rule(
        "date/month only",
        W_MONTH_ONLY,
        "(@zhnum@)月份?",
        emit("UTC").group("month", 1, "month"),
    );
    // Bare day-of-month: only meaningful after a month anchor ("下个月5号");
    // standalone it resolves to nothing and is dropped.
    b.rule(
        "date/day of month",
        W_ORDINAL,
        "(@zhnum@)[日号]",
        emit("UTC").group("day", 1, "day31"),
    );

    // ---- relative days / weeks / months / years ----
    b.rule(
        "rel/named day",
        W_REL,
        "(大前天|前天|昨天|昨日|今天|今日|当天|明天|明日|后天|大后天)",
        emit("REL")
            .set("unit", "day")
            .group("offset", 1, "relday_zh"),
    );
    b.rule(
        "rel/day with period",
        W_WEEK_COMPOSED,
        "(今|明|昨)(早上|早晨|晚上|晚间|早|晚)",
        emit("REL")
            .set("unit", "day")
            .group("offset", 1, "relday_zh")
            .group("period", 2, "period_zh"),
    );
    b.rule(
        "rel/chained week with weekday",
        W_WEEK_COMPOSED,
        "([上下]+)个?(?:@weekw@)(@wd@)",
        emit("REL")
            .set("unit", "week")
            .group("offset", 1, "chain_zh")
            .group("weekday", 2, "weekday_zh"),
    );
    b.rule(
        "rel/chained week",
        W_REL,
        "([上下]+)个?(?:@weekw@)",
        emit("REL").set("unit", "week").group("offset", 1, "chain_zh"),
    );
    b.rule(
        "rel/this week with weekday",
        W_WEEK_COMPOSED,
        "(?:这|本)个?(?:@weekw@)(@wd@)",
        emit("REL")
            .set("unit", "week")
            .set("offset", "0")
            .group("weekday", 1, "weekday_zh"),
    );
    b.rule(
        "rel/this week",
        W_REL,
        "(?:这|本)个?(?:@weekw@)",
        emit("REL").set("unit", "week").set("offset", "0"),
    );
    b.rule(
        "rel/weekend",
        W_WEEK,
        "([上下这本])?个?周末",
        emit("WEEK")
            .set("weekday", "5")
            .opt_group("modifier", 1, "wmod_zh")
            .set("weekend", "true"),
    );
    b.rule(
        "rel/month",
        W_REL,
        "([上这本下])个?月",
        emit("REL").set("unit", "month").group("offset", 1, "mod_zh"),
    );
    b.rule(
        "rel/year",
        W_REL,
        "(前年|去年|今年|明年|后年)",
        emit("REL").set("unit", "year").group("offset", 1, "relyear_zh"),
    );
    b.rule(
        "rel/half year",
        W_WEEK_COMPOSED,
        "([上下])半年",
        emit("REL")
            .set("unit", "year")
            .set("offset", "0")
            .group("half", 1, "half_zh"),
    );

    // ---- weekdays ----
    b.rule(
        "week/bare weekday",
        W_WEEK,
        "(?:@weekw@)(@wd@)",
        emit("WEEK").group("weekday", 1, "weekday_zh"),
    );
    b.rule(
        "week/nth weekday of month",
        W_WEEK_COMPOSED,
        "(@zhnum@)月份?的?第(@zhnum@)个(?:@weekw@)(@wd@)",
        emit("WEEK")
            .group("weekday", 3, "weekday_zh")
            .group("modifier", 2, "nth")
            .group("month", 1, "month"),
    );
    b.rule(
        "week/last weekday of month",
        W_WEEK_COMPOSED,
        "(@zhnum@)月份?的?最后一个(?:@weekw@)(@wd@)",
        emit("WEEK")
            .group("weekday", 2, "weekday_zh")
            .set("modifier", "lastof")
            .group("month", 1, "month"),
    );

    // ---- parts of day ----
    b.rule(
        "period/named",
        W_PERIOD,
        "(凌晨|清晨|拂晓|黎明|早上|早晨|一早|上午|中午|正午|下午|午后|傍晚|晚上|晚间|夜里|夜晚|夜间|深夜|半夜|午夜)",
        emit("PERIOD").group("kind", 1, "period_zh"),
    );

    // ---- clock times ----
    b.rule(
        "clock/digital",
        W_CLOCK,
        r"(2[0-3]|[01]?\d):([0-5]\d)(?::([0-5]\d))?",
        emit("CLOCK")
            .group("hour", 1, "hour")
            .group("minute", 2, "minute")
            .opt_group("second", 3, "minute"),
    );
    b.rule(
        "clock/half past",
        W_CLOCK,
        "(@zhhour@)点半",
        emit("CLOCK").group("hour", 1, "hour").set("minute", "30"),
    );
    b.rule(
        "clock/quarter",
        W_CLOCK,
        "(@zhhour@)点([一三])刻",
        emit("CLOCK")
            .group("hour", 1, "hour")
            .group("minute", 2, "quarter_zh"),
    );
    b.rule(
        "clock/hour minute",
        W_CLOCK,
        "(@zhhour@)点(@zhnum@)分?",
        emit("CLOCK")
            .group("hour", 1, "hour")
            .group("minute", 2, "minute"),
    );
    b.rule(
        "clock/hour minute shi",
        W_CLOCK,
        "(@zhhour@)时(@zhnum@)分",
        emit("CLOCK")
            .group("hour", 1, "hour")
            .group("minute", 2, "minute"),
    );
    b.rule(
        "clock/hour",
        W_CLOCK,
        "(@zhhour@)点(?:钟|整)?",
        emit("CLOCK").group("hour", 1, "hour"),
    );

    // ---- deltas ----
    b.rule(
        "delta/offset",
        W_DELTA,
        "(@zhnum@|几)个?(@unit@)(?:之|以)?(前|后)",
        emit("DELTA")
            .group("amount", 1, "fuzzy_zh")
            .group("unit", 2, "unit_zh")
            .group("dir", 3, "dir_zh"),
    );
    delta_half(&mut b, "delta/half hour", "半个?小时(?:之|以)?(前|后)", "minute", "30");
    delta_half(&mut b, "delta/half day", "半天(?:之|以)?(前|后)", "hour", "12");
    delta_half(&mut b, "delta/half month", "半个?月(?:之|以)?(前|后)", "day", "15");
    delta_half(&mut b, "delta/half year", "半年(?:之|以)?(前|后)", "month", "6");
    b.rule(
        "delta/recent bracket",
        W_DELTA,
        "近(@zhnum@|几)个?(@unit@)",
        emit("DELTA")
            .group("amount", 1, "fuzzy_zh")
            .group("unit", 2, "unit_zh")
            .set("dir", "-1")
            .set("bracket", "true"),
    );
    b.rule(
        "delta/within",
        W_DELTA,
        "(@zhnum@|几)个?(@unit@)(?:之|以)?内",
        emit("DELTA")
            .group("amount", 1, "fuzzy_zh")
            .group("unit", 2, "unit_zh")
            .set("dir", "1")
            .set("bracket", "true"),
    );

    // ---- holidays: fixed-date ----
    holiday(&mut b, "holiday/new year", "元旦节?", "new_year");
    holiday(&mut b, "holiday/valentines", "情人节", "valentines");
    holiday(&mut b, "holiday/womens day", "(?:三八)?妇女节", "womens_day");
    holiday(&mut b, "holiday/arbor day", "植树节", "arbor_day");
    holiday(&mut b, "holiday/april fools", "愚人节", "april_fools");
    holiday(&mut b, "holiday/labor day", "(?:五一)?劳动节", "labor_day_cn");
    holiday(&mut b, "holiday/youth day", "(?:五四)?青年节", "youth_day");
    holiday(&mut b, "holiday/children day", "(?:六一)?儿童节", "children_day");
    holiday(&mut b, "holiday/army day", "(?:八一)?建军节", "army_day");
    holiday(&mut b, "holiday/teachers day", "教师节", "teachers_day");
    holiday(&mut b, "holiday/national day", "国庆节?", "national_day");
    holiday(&mut b, "holiday/halloween", "万圣节", "halloween");
    holiday(&mut b, "holiday/singles day", "光棍节|双十一", "singles_day");
    holiday(&mut b, "holiday/christmas eve", "平安夜", "christmas_eve");
    holiday(&mut b, "holiday/christmas", "圣诞节?", "christmas");
    holiday(&mut b, "holiday/mothers day", "母亲节", "mothers_day");
    holiday(&mut b, "holiday/fathers day", "父亲节", "fathers_day");
    holiday(&mut b, "holiday/thanksgiving", "感恩节", "thanksgiving");
    holiday(&mut b, "holiday/easter", "复活节", "easter");

    // ---- holidays: lunar-anchored ----
    holiday(
        &mut b,
        "holiday/spring festival",
        "春节|农历新年|大年初一",
        "spring_festival",
    );
    holiday(&mut b, "holiday/lantern festival", "元宵节", "lantern_festival");
    holiday(&mut b, "holiday/dragon boat", "端午节?", "dragon_boat");
    holiday(&mut b, "holiday/qixi", "七夕节?", "qixi");
    holiday(&mut b, "holiday/ghost festival", "中元节", "ghost_festival");
    holiday(&mut b, "holiday/mid autumn", "中秋节?", "mid_autumn");
    holiday(&mut b, "holiday/double ninth", "重阳节?", "double_ninth");
    holiday(&mut b, "holiday/laba", "腊八节?", "laba");
    holiday(
        &mut b,
        "holiday/lunar new year eve",
        "除夕|大年三十|年三十",
        "new_year_eve_cn",
    );

    // ---- solar terms ----
    b.rule(
        "holiday/solar term",
        W_HOLIDAY,
        "(立春|雨水|惊蛰|春分|清明|谷雨|立夏|小满|芒种|夏至|小暑|大暑|立秋|处暑|白露|秋分|寒露|霜降|立冬|小雪|大雪|冬至|小寒|大寒)(?:节气?)?",
        emit("HOLIDAY").group("id", 1, "term_zh"),
    );

    // ---- lunar dates ----
    b.rule(
        "lunar/marked",
        W_LUNAR,
        r"(?:农历|阴历|旧历)(?:(\d{4}|@zhd@{4})年)?(闰)?(正|冬|腊|@zhnum@)月(@chuday@|@zhnum@)[日号]?",
        emit("LUNAR")
            .opt_group("year", 1, "year")
            .group("month", 3, "lunar_month")
            .group("day", 4, "lunar_day")
            .opt_group("leap", 2, "flag"),
    );
    b.rule(
        "lunar/named month",
        W_LUNAR,
        "(正|冬|腊)月(@chuday@|@zhnum@)[日号]?",
        emit("LUNAR")
            .group("month", 1, "lunar_month")
            .group("day", 2, "lunar_day"),
    );
    b.rule(
        "lunar/chu day",
        W_LUNAR,
        "(@zhnum@)月(@chuday@)",
        emit("LUNAR")
            .group("month", 1, "lunar_month")
            .group("day", 2, "lunar_day"),
    );

    // ---- range connectors ----
    b.rule("range/open", W_RANGE, "从|自从", emit("RANGE_OPEN"));
    b.rule("range/sep", W_RANGE, "直到|到|至", emit("RANGE_SEP"));
    b.rule("range/sep dash", W_RANGE, "[~～—–]|--", emit("RANGE_SEP"));
    b.rule("range/close", W_RANGE, "之间|期间", emit("RANGE_CLOSE"));

    // ---- recurring ----
    b.rule("recur/daily", W_RECUR, "每天|每日", emit("RECUR").set("unit", "day"));
    b.rule(
        "recur/weekday",
        W_RECUR,
        "每(?:@weekw@)(@wd@)",
        emit("RECUR")
            .set("unit", "week")
            .group("weekday", 1, "weekday_zh"),
    );
    b.rule(
        "recur/weekly",
        W_RECUR,
        "每个?(?:@weekw@)",
        emit("RECUR").set("unit", "week"),
    );
    b.rule(
        "recur/monthly day",
        W_RECUR,
        "每个?月(@zhnum@)[日号]",
        emit("RECUR").set("unit", "month").group("day", 1, "day31"),
    );
    b.rule("recur/monthly", W_RECUR, "每个?月", emit("RECUR").set("unit", "month"));
    b.rule(
        "recur/yearly date",
        W_RECUR,
        "每年(@zhnum@)月(@zhnum@)[日号]",
        emit("RECUR")
            .set("unit", "year")
            .group("month", 1, "month")
            .group("day", 2, "day31"),
    );
    b.rule("recur/yearly", W_RECUR, "每年", emit("RECUR").set("unit", "year"));
    b.rule("recur/hourly", W_RECUR, "每个?小时", emit("RECUR").set("unit", "hour"));

    // ---- centuries and decades ----
    b.rule(
        "span/century decade",
        W_SPAN,
        r"(\d{1,2}|@zhnum@)世纪(\d{1,2}|@zhnum@)年代(前期|初期|初|中期|后期|末期|末)?",
        emit("DECADE")
            .group("century", 1, "num")
            .group("value", 2, "num")
            .opt_group("qualifier", 3, "qual_zh"),
    );
    b.rule(
        "span/decade",
        W_SPAN,
        r"(\d{1,2}|@zhnum@)年代(前期|初期|初|中期|后期|末期|末)?",
        emit("DECADE")
            .group("value", 1, "num")
            .opt_group("qualifier", 2, "qual_zh"),
    );
    b.rule(
        "span/century",
        W_SPAN,
        r"(\d{1,2}|@zhnum@)世纪(前期|初期|初|中期|后期|末期|末)?",
        emit("CENTURY")
            .group("value", 1, "num")
            .opt_group("qualifier", 2, "qual_zh"),
    );
    b.rule(
        "span/relative century",
        W_SPAN,
        "([上这本])个?世纪(前期|初期|初|中期|后期|末期|末)?",
        emit("CENTURY")
            .group("offset", 1, "cent_mod_zh")
            .opt_group("qualifier", 2, "qual_zh"),
    );

    // ---- ordinals ----
    b.rule(
        "ordinal",
        W_ORDINAL,
        "第(@zhnum@)个?",
        emit("ORDINAL").group("k", 1, "num"),
    );

    b.finish()
}
