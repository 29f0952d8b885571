//! Timestamp recognition for transcript lines.
//!
//! Exports vary by locale and platform. Every message line starts with one of
//! these timestamp shapes:
//!
//! - US: `1/2/23, 9:41 PM - …`
//! - EU dot: `31.12.23, 21:41 - …`
//! - EU slash: `31/12/2023, 21:41 - …`
//! - iOS bracketed: `[31/12/2023, 21:41:00] …`
//! - ISO: `2023-12-31, 21:41 - …`
//!
//! Lines are first run through a cheap combined pre-check so that the common
//! case (a continuation line) is rejected without touching the detailed
//! grammars. Grammars are then tried in the fixed order of
//! [`TimestampFormat::all`]; the first structural match decides.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Anything that could plausibly open with a date.
const PRECHECK_PATTERN: &str = r"^\[?[0-9]{1,4}[/.\-][0-9]{1,2}[/.\-][0-9]{2,4}[,\s]";

static PRECHECK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRECHECK_PATTERN).expect("pre-check pattern is valid"));

/// Order in which a grammar captures the three date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrder {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

/// The timestamp grammars, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `M/D/YY[YY], H:MM[:SS] [AM|PM] - `
    UsSlash,
    /// `D.M.YY[YY], H:MM[:SS] [AM|PM] - `
    EuDot,
    /// `D/M/YYYY, H:MM[:SS] - `
    EuSlash,
    /// `[D/M/YY[YY], H:MM[:SS] [AM|PM]] `
    Bracketed,
    /// `YYYY-M-D, H:MM[:SS] - `
    Iso,
}

impl TimestampFormat {
    /// Returns every grammar in the order they are tried.
    pub fn all() -> &'static [TimestampFormat] {
        &[
            TimestampFormat::UsSlash,
            TimestampFormat::EuDot,
            TimestampFormat::EuSlash,
            TimestampFormat::Bracketed,
            TimestampFormat::Iso,
        ]
    }

    /// Returns the regex pattern for this grammar.
    ///
    /// Capture groups: three date fields (in the grammar's own order), hour,
    /// minute, optional second, optional meridiem.
    pub fn pattern(self) -> &'static str {
        match self {
            TimestampFormat::UsSlash => {
                r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4}),?\s+([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?\s*(AM|PM|am|pm)?\s*-\s*"
            }
            TimestampFormat::EuDot => {
                r"^([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{2,4}),?\s+([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?\s*(AM|PM|am|pm)?\s*-\s*"
            }
            TimestampFormat::EuSlash => {
                r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4}),?\s+([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?\s*(AM|PM|am|pm)?\s*-\s*"
            }
            TimestampFormat::Bracketed => {
                r"^\[([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4}),?\s+([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?\s*(AM|PM|am|pm)?\]\s*"
            }
            TimestampFormat::Iso => {
                r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2}),?\s+([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?\s*(AM|PM|am|pm)?\s*-\s*"
            }
        }
    }

    /// Returns a sample line prefix in this grammar.
    pub fn example(self) -> &'static str {
        match self {
            TimestampFormat::UsSlash => "12/31/23, 9:41 PM - ",
            TimestampFormat::EuDot => "31.12.23, 21:41 - ",
            TimestampFormat::EuSlash => "31/12/2023, 21:41 - ",
            TimestampFormat::Bracketed => "[31/12/2023, 21:41:00] ",
            TimestampFormat::Iso => "2023-12-31, 21:41 - ",
        }
    }

    fn field_order(self) -> FieldOrder {
        match self {
            TimestampFormat::UsSlash => FieldOrder::MonthDayYear,
            TimestampFormat::EuDot | TimestampFormat::EuSlash | TimestampFormat::Bracketed => {
                FieldOrder::DayMonthYear
            }
            TimestampFormat::Iso => FieldOrder::YearMonthDay,
        }
    }
}

/// A grammar paired with its compiled matcher.
struct Grammar {
    format: TimestampFormat,
    regex: Regex,
}

impl Grammar {
    fn new(format: TimestampFormat) -> Self {
        Self {
            format,
            regex: Regex::new(format.pattern()).expect("timestamp grammar is valid"),
        }
    }

    /// Builds the timestamp from a structural match, or `None` if the
    /// captured fields do not form a real date and time.
    fn extract(&self, caps: &Captures<'_>) -> Option<NaiveDateTime> {
        let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

        let (a, b, c) = (field(1)?, field(2)?, field(3)?);
        let (year, month, day) = match self.format.field_order() {
            FieldOrder::MonthDayYear => (normalize_year(c), a, b),
            FieldOrder::DayMonthYear => (normalize_year(c), b, a),
            FieldOrder::YearMonthDay => (a as i32, b, c),
        };

        let hour = to_24_hour(field(4)?, caps.get(7).map(|m| m.as_str()));
        let minute = field(5)?;
        let second = field(6).unwrap_or(0);

        build_datetime(year, month, day, hour, minute, second)
    }
}

/// The grammar table, compiled once per process.
static GRAMMARS: LazyLock<Vec<Grammar>> = LazyLock::new(|| {
    TimestampFormat::all()
        .iter()
        .map(|&format| Grammar::new(format))
        .collect()
});

/// A timestamp found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizedTimestamp<'a> {
    /// Which grammar matched.
    pub format: TimestampFormat,
    /// The parsed wall-clock time.
    pub datetime: NaiveDateTime,
    /// Everything after the timestamp and its separator.
    pub remainder: &'a str,
}

/// Recognizes timestamps at the start of transcript lines.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::timestamp::{TimestampFormat, TimestampRecognizer};
/// use chrono::Timelike;
///
/// let recognizer = TimestampRecognizer::new();
/// let ts = recognizer.recognize("1/2/23, 9:41 PM - Alice: Hi").unwrap();
///
/// assert_eq!(ts.format, TimestampFormat::UsSlash);
/// assert_eq!(ts.datetime.hour(), 21);
/// assert_eq!(ts.remainder, "Alice: Hi");
///
/// assert!(recognizer.recognize("just some text").is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampRecognizer {
    day_first_fallback: bool,
}

impl TimestampRecognizer {
    /// Creates a recognizer where the first structural match decides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recognizer that moves on to the next grammar when a
    /// structural match carries an impossible date.
    pub fn with_day_first_fallback(enabled: bool) -> Self {
        Self {
            day_first_fallback: enabled,
        }
    }

    /// Cheap pre-check: could this line start with a timestamp at all?
    pub fn could_start_message(&self, line: &str) -> bool {
        looks_like_timestamp(line)
    }

    /// Tries every grammar in priority order against the start of `line`.
    ///
    /// Returns `None` (leaving the line untouched) if the pre-check fails, no
    /// grammar matches, or the matching grammar yields an invalid date.
    pub fn recognize<'a>(&self, line: &'a str) -> Option<RecognizedTimestamp<'a>> {
        if !looks_like_timestamp(line) {
            return None;
        }

        for grammar in GRAMMARS.iter() {
            let Some(caps) = grammar.regex.captures(line) else {
                continue;
            };

            if let Some(datetime) = grammar.extract(&caps) {
                let consumed = caps.get(0).map_or(0, |m| m.end());
                return Some(RecognizedTimestamp {
                    format: grammar.format,
                    datetime,
                    remainder: &line[consumed..],
                });
            }

            if !self.day_first_fallback {
                return None;
            }
        }

        None
    }
}

/// Returns `true` if `line` passes the combined timestamp pre-check.
///
/// This is also the signal used to score how much a file looks like a chat
/// transcript.
pub fn looks_like_timestamp(line: &str) -> bool {
    PRECHECK.is_match(line)
}

/// Expands two-digit years into the 2000s.
pub fn normalize_year(year: u32) -> i32 {
    if year < 100 {
        2000 + year as i32
    } else {
        year as i32
    }
}

/// Converts a 12-hour clock reading to 24-hour.
///
/// PM with hour < 12 adds 12, AM with hour 12 becomes 0, everything else is
/// left as written (including hours without a meridiem).
pub fn to_24_hour(hour: u32, meridiem: Option<&str>) -> u32 {
    match meridiem {
        Some(m) if m.eq_ignore_ascii_case("pm") && hour < 12 => hour + 12,
        Some(m) if m.eq_ignore_ascii_case("am") && hour == 12 => 0,
        _ => hour,
    }
}

fn build_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<NaiveDateTime> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(date.and_time(time))
}
