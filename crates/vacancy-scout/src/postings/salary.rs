use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;
use tracing::warn;

/// Text stored in place of a salary the source did not disclose.
pub const UNSPECIFIED: &str = "unspecified";

const CURRENCY_MARKERS: [&str; 5] = ["руб.", "руб", "rub", "rur", "₽"];

/// Salary as received from a source, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum SalaryInput {
    Number(f64),
    Text(String),
}

impl From<f64> for SalaryInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for SalaryInput {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for SalaryInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SalaryInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Normalized salary: a non-negative amount or an explicit "not disclosed" marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Salary {
    Numeric(f64),
    Unspecified,
}

impl Salary {
    /// Normalize optional source input. Never fails; anything that does not
    /// yield a finite, non-negative amount becomes [`Salary::Unspecified`].
    pub fn from_input(input: Option<SalaryInput>) -> Self {
        match input {
            None => Self::Unspecified,
            Some(SalaryInput::Number(amount)) => Self::from_amount(amount),
            Some(SalaryInput::Text(text)) => Self::from_text(&text),
        }
    }

    /// Parse free-form salary text such as `"100 000 - 150 000 руб."`.
    ///
    /// Only the part before the first `-` is considered, so ranges resolve to
    /// their lower bound.
    pub fn from_text(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case(UNSPECIFIED) {
            return Self::Unspecified;
        }

        let lower_bound = text.split('-').next().unwrap_or_default();
        let compact: String = lower_bound
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();
        let amount = strip_currency(&compact);

        match amount.parse::<f64>() {
            Ok(value) => Self::from_amount(value),
            Err(_) => Self::Unspecified,
        }
    }

    /// Read a stored salary field. Only JSON numbers count as amounts.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_f64) {
            Some(amount) => Self::from_amount(amount),
            None => Self::Unspecified,
        }
    }

    fn from_amount(amount: f64) -> Self {
        if amount.is_finite() && amount >= 0.0 {
            Self::Numeric(amount)
        } else {
            Self::Unspecified
        }
    }

    pub fn amount(self) -> Option<f64> {
        match self {
            Self::Numeric(amount) => Some(amount),
            Self::Unspecified => None,
        }
    }

    /// Storage form: a JSON number, or the [`UNSPECIFIED`] text.
    pub fn to_json(self) -> Value {
        match self {
            Self::Numeric(amount) => serde_json::Number::from_f64(amount)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(UNSPECIFIED.to_string())),
            Self::Unspecified => Value::String(UNSPECIFIED.to_string()),
        }
    }
}

/// An undisclosed salary is not orderable against anything else. Two undisclosed
/// salaries compare equal so that the ordering stays consistent with `==`.
impl PartialOrd for Salary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Numeric(lhs), Self::Numeric(rhs)) => lhs.partial_cmp(rhs),
            (Self::Unspecified, Self::Unspecified) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(amount) => write!(f, "{amount}"),
            Self::Unspecified => f.write_str(UNSPECIFIED),
        }
    }
}

fn strip_currency(text: &str) -> &str {
    let lowered = text.to_lowercase();
    for marker in CURRENCY_MARKERS {
        if lowered.ends_with(marker) && lowered.len() == text.len() {
            return text.get(..text.len() - marker.len()).unwrap_or(text);
        }
    }
    text
}

/// Inclusive salary interval used by the salary filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl SalaryRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `(0, +inf)`: the range every disclosed salary falls into.
    pub const fn accept_all() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    pub fn is_accept_all(&self) -> bool {
        *self == Self::accept_all()
    }

    /// Bounds are inclusive. A range with `min > max` contains nothing.
    pub fn contains(&self, amount: f64) -> bool {
        self.min <= amount && amount <= self.max
    }

    /// Parse a `"<min>-<max>"` expression typed at the console.
    ///
    /// Malformed input falls back to [`SalaryRange::accept_all`] together with a
    /// warning; an empty expression falls back silently. Bounds are not
    /// reordered.
    pub fn parse(expr: &str) -> RangeParse {
        if expr.is_empty() {
            return RangeParse::ok(Self::accept_all());
        }

        let parts: Vec<&str> = expr.split('-').collect();
        let [min, max] = parts.as_slice() else {
            return RangeParse::fallback(expr, RangeWarning::WrongPartCount(parts.len()));
        };

        let (Ok(min), Ok(max)) = (min.trim().parse::<f64>(), max.trim().parse::<f64>()) else {
            return RangeParse::fallback(expr, RangeWarning::NotANumber);
        };

        if min < 0.0 || max < 0.0 {
            return RangeParse::fallback(expr, RangeWarning::Negative);
        }

        RangeParse::ok(Self::new(min, max))
    }
}

/// Why a range expression was replaced by the accept-all fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWarning {
    WrongPartCount(usize),
    NotANumber,
    Negative,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeWarning::WrongPartCount(count) => write!(
                f,
                "expected exactly two '-'-separated bounds, found {count} part(s)"
            ),
            RangeWarning::NotANumber => write!(f, "salary bounds must be numbers"),
            RangeWarning::Negative => write!(f, "salary bounds cannot be negative"),
        }
    }
}

/// Result of [`SalaryRange::parse`]: always a usable range, plus an optional warning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeParse {
    pub range: SalaryRange,
    pub warning: Option<RangeWarning>,
}

impl RangeParse {
    fn ok(range: SalaryRange) -> Self {
        Self {
            range,
            warning: None,
        }
    }

    fn fallback(expr: &str, warning: RangeWarning) -> Self {
        warn!(expression = expr, %warning, "salary range rejected, accepting all salaries");
        Self {
            range: SalaryRange::accept_all(),
            warning: Some(warning),
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.range.min, self.range.max)
    }
}
