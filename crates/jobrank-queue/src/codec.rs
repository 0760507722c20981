//! Priority codec: caller priorities to sortable scores and back.
//!
//! A score packs two values into one integer:
//!
//! ```text
//! score = (MAX_PRIORITY - clamped_priority) * PRIORITY_MULTIPLIER + epoch_seconds
//! ```
//!
//! The sorted set serves the smallest score first, so the highest caller
//! priority lands in the lowest band and, within a band, the earliest
//! second wins. Two jobs pushed in the same second at the same priority
//! are ordered by the store's own tie-break.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use tracing::trace;

/// Lowest caller-facing priority.
pub const MIN_PRIORITY: i64 = 0;

/// Highest caller-facing priority.
pub const MAX_PRIORITY: i64 = 1000;

/// Width of one priority band in a score.
///
/// Must stay larger than any epoch-seconds value the queues will see,
/// otherwise adjacent bands overlap. 10^13 seconds is far beyond the
/// current epoch; revisit if the clock source ever changes units.
pub const PRIORITY_MULTIPLIER: i64 = 10_000_000_000_000;

/// Symbolic priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedPriority {
    Highest,
    High,
    Normal,
    Low,
    Lowest,
}

impl NamedPriority {
    /// Numeric caller-facing priority of the level.
    pub fn value(self) -> i64 {
        match self {
            NamedPriority::Highest => MAX_PRIORITY,
            NamedPriority::High => 750,
            NamedPriority::Normal => 500,
            NamedPriority::Low => 250,
            NamedPriority::Lowest => MIN_PRIORITY,
        }
    }

    /// Name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            NamedPriority::Highest => "highest",
            NamedPriority::High => "high",
            NamedPriority::Normal => "normal",
            NamedPriority::Low => "low",
            NamedPriority::Lowest => "lowest",
        }
    }
}

impl fmt::Display for NamedPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamedPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "highest" => Ok(NamedPriority::Highest),
            "high" => Ok(NamedPriority::High),
            "normal" => Ok(NamedPriority::Normal),
            "low" => Ok(NamedPriority::Low),
            "lowest" => Ok(NamedPriority::Lowest),
            other => Err(format!("unknown priority level: {}", other)),
        }
    }
}

/// Priority as supplied by a caller.
///
/// Every input resolves to an integer in `[MIN_PRIORITY, MAX_PRIORITY]`;
/// anything that cannot be read as a number resolves to `MIN_PRIORITY`.
#[derive(Debug, Clone, PartialEq)]
pub enum Priority {
    /// A symbolic level.
    Named(NamedPriority),
    /// An integer, clamped into range.
    Value(i64),
    /// A float, truncated toward zero then clamped. NaN and infinities
    /// have no integer reading and resolve to `MIN_PRIORITY`.
    Float(f64),
    /// Free text: a level name or a leading integer.
    Text(String),
    /// No priority given.
    Unset,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Named(NamedPriority::Normal)
    }
}

impl Priority {
    /// Resolves the input to its clamped caller-facing priority.
    pub fn clamped(&self) -> i64 {
        match self {
            Priority::Named(level) => level.value(),
            Priority::Value(value) => clamp(*value),
            Priority::Float(value) if !value.is_finite() => MIN_PRIORITY,
            Priority::Float(value) => clamp(*value as i64),
            Priority::Text(text) => match text.parse::<NamedPriority>() {
                Ok(level) => level.value(),
                Err(_) => clamp(leading_integer(text)),
            },
            Priority::Unset => MIN_PRIORITY,
        }
    }
}

impl From<NamedPriority> for Priority {
    fn from(level: NamedPriority) -> Self {
        Priority::Named(level)
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Priority::Value(value)
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Priority::Value(value.into())
    }
}

impl From<u32> for Priority {
    fn from(value: u32) -> Self {
        Priority::Value(value.into())
    }
}

impl From<f64> for Priority {
    fn from(value: f64) -> Self {
        Priority::Float(value)
    }
}

impl From<&str> for Priority {
    fn from(text: &str) -> Self {
        Priority::Text(text.to_string())
    }
}

impl From<String> for Priority {
    fn from(text: String) -> Self {
        Priority::Text(text)
    }
}

impl<T: Into<Priority>> From<Option<T>> for Priority {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Priority::Unset)
    }
}

fn clamp(value: i64) -> i64 {
    value.clamp(MIN_PRIORITY, MAX_PRIORITY)
}

/// Reads the integer prefix of `text`: optional whitespace, an optional
/// sign, then digits. No digits reads as 0; overflow saturates.
fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Maps between caller-facing priority and the stored level.
///
/// `MAX_PRIORITY - x` is its own inverse over `[0, MAX_PRIORITY]`, so the
/// same function encodes a caller priority and decodes a stored one.
pub fn to_caller_priority(priority: i64) -> i64 {
    MAX_PRIORITY - priority
}

/// Current unix time in seconds.
pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Score for `priority` inserted at `epoch_seconds`.
pub fn score_at(priority: &Priority, epoch_seconds: i64) -> i64 {
    let level = to_caller_priority(priority.clamped());
    let score = level * PRIORITY_MULTIPLIER + epoch_seconds;
    trace!(?priority, level, score, "computed job score");
    score
}

/// Score for `priority` inserted now.
pub fn encode(priority: &Priority) -> i64 {
    score_at(priority, now_epoch_seconds())
}

/// The two values packed into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreParts {
    /// Stored level; `0` is served first.
    pub priority: i64,
    /// Insertion time in unix seconds.
    pub inserted_at: i64,
}

impl ScoreParts {
    /// Caller-facing priority recovered from the stored level.
    pub fn caller_priority(&self) -> i64 {
        to_caller_priority(self.priority)
    }
}

/// Splits a score into its stored level and insertion time.
pub fn decode(score: i64) -> ScoreParts {
    ScoreParts {
        priority: score.div_euclid(PRIORITY_MULTIPLIER),
        inserted_at: score.rem_euclid(PRIORITY_MULTIPLIER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    #[test]
    fn test_named_levels() {
        assert_eq!(Priority::from(NamedPriority::Highest).clamped(), 1000);
        assert_eq!(Priority::from(NamedPriority::High).clamped(), 750);
        assert_eq!(Priority::from(NamedPriority::Normal).clamped(), 500);
        assert_eq!(Priority::from(NamedPriority::Low).clamped(), 250);
        assert_eq!(Priority::from(NamedPriority::Lowest).clamped(), 0);
        assert_eq!(Priority::from("high").clamped(), 750);
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(Priority::default().clamped(), 500);
    }

    #[test]
    fn test_numeric_inputs_are_clamped() {
        assert_eq!(Priority::from(9999).clamped(), 1000);
        assert_eq!(Priority::from(-5).clamped(), 0);
        assert_eq!(Priority::from(3.99).clamped(), 3);
        assert_eq!(Priority::from(1e300).clamped(), 1000);
    }

    #[test]
    fn test_non_finite_floats_are_lowest() {
        assert_eq!(Priority::from(f64::NAN).clamped(), MIN_PRIORITY);
        assert_eq!(Priority::from(f64::INFINITY).clamped(), MIN_PRIORITY);
        assert_eq!(Priority::from(f64::NEG_INFINITY).clamped(), MIN_PRIORITY);
    }

    #[test]
    fn test_text_inputs_read_leading_integer() {
        assert_eq!(Priority::from("7777").clamped(), 1000);
        assert_eq!(Priority::from("6.28").clamped(), 6);
        assert_eq!(Priority::from(" 42abc").clamped(), 42);
        assert_eq!(Priority::from("+12").clamped(), 12);
        assert_eq!(Priority::from("-12").clamped(), 0);
        assert_eq!(Priority::from("HIGH").clamped(), 0);
        assert_eq!(Priority::from("").clamped(), 0);
        assert_eq!(Priority::from("99999999999999999999999").clamped(), 1000);
    }

    #[test]
    fn test_absent_is_lowest() {
        assert_eq!(Priority::from(None::<i64>).clamped(), 0);
        assert_eq!(Priority::from(Some(80)).clamped(), 80);
    }

    #[test]
    fn test_round_trip_over_full_range() {
        for p in MIN_PRIORITY..=MAX_PRIORITY {
            let parts = decode(score_at(&Priority::from(p), T0));
            assert_eq!(parts.caller_priority(), p);
            assert_eq!(parts.inserted_at, T0);
        }
    }

    #[test]
    fn test_round_trip_with_live_clock() {
        let before = now_epoch_seconds();
        let parts = decode(encode(&Priority::from(75)));
        let after = now_epoch_seconds();

        assert_eq!(parts.priority, 925);
        assert_eq!(parts.caller_priority(), 75);
        assert!(parts.inserted_at >= before && parts.inserted_at <= after);
    }

    #[test]
    fn test_named_scores_are_strictly_ordered() {
        let score = |level| score_at(&Priority::from(level), T0);

        assert!(score(NamedPriority::Highest) < score(NamedPriority::High));
        assert!(score(NamedPriority::High) < score(NamedPriority::Normal));
        assert!(score(NamedPriority::Normal) < score(NamedPriority::Low));
        assert!(score(NamedPriority::Low) < score(NamedPriority::Lowest));
    }

    #[test]
    fn test_priority_beats_insertion_time() {
        let late_high = score_at(&Priority::from(501), T0 + 1_000_000);
        let early_low = score_at(&Priority::from(500), T0);
        assert!(late_high < early_low);
    }

    #[test]
    fn test_earlier_insertion_wins_within_priority() {
        let p = Priority::from(300);
        assert!(score_at(&p, T0) < score_at(&p, T0 + 1));
    }

    #[test]
    fn test_caller_priority_is_self_inverse() {
        for p in [0, 1, 250, 999, 1000] {
            assert_eq!(to_caller_priority(to_caller_priority(p)), p);
        }
    }
}
