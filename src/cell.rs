//! Loosely typed worksheet cells
//!
//! Worksheet parsers hand over cells that are a number, some text, or
//! nothing at all. [`Cell`] makes that explicit and owns the two coercions
//! the rest of the crate relies on:
//!
//! - [`Cell::number`]: "parse as float, treat non-numeric as absent".
//! - [`Cell::key_string`]: the string form used to compare grouping keys.
//!   Numeric `10` and text `"10"` produce the same key, so they group together.
//!
//! ```rust
//! use pivotfit::Cell;
//!
//! assert_eq!(Cell::from("12kg").number(), Some(12.0));
//! assert_eq!(Cell::from("abc").number(), None);
//! assert_eq!(Cell::from(10.0).key_string(), Cell::from("10").key_string());
//! ```
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single worksheet value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Cell {
    /// A numeric cell
    Number(f64),

    /// A text cell; may still hold a number that needs parsing
    Text(String),

    /// An empty cell, or a field missing from the row
    #[default]
    Absent,
}

impl Cell {
    /// Returns the cell coerced to a number, if it has one.
    ///
    /// - Numbers are returned as-is, except `NaN` which counts as absent.
    /// - Text is parsed by its longest leading decimal prefix, after leading whitespace,
    ///   so `"3.5 kg"` is `3.5` and `"1e3x"` is `1000`.
    /// - `Absent` has no number.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_float_prefix(s),
            Cell::Absent => None,
        }
    }

    /// Returns the string form of this cell used in grouping keys.
    ///
    /// Whole numbers print without a fractional part, numbers outside `[1e-6, 1e21)` print
    /// in exponent form (`1e+21`) and `Absent` prints as `null`.
    #[must_use]
    pub fn key_string(&self) -> String {
        self.to_string()
    }

    /// Returns true if the cell is [`Cell::Absent`]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Number(n) if n.is_infinite() && *n > 0.0 => write!(f, "Infinity"),
            Cell::Number(n) if n.is_infinite() => write!(f, "-Infinity"),
            Cell::Number(n) if *n == 0.0 => write!(f, "0"),
            Cell::Number(n) => write_number(f, *n),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Absent => write!(f, "null"),
        }
    }
}

/// Shortest round-trip digits, in exponent form (`1e+21`, `1.5e-7`) outside `[1e-6, 1e21)`,
/// the way a spreadsheet front end stringifies numbers.
fn write_number(f: &mut std::fmt::Formatter<'_>, n: f64) -> std::fmt::Result {
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{n}");
    }

    let exponential = format!("{n:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&exponential),
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Absent, Into::into)
    }
}

impl From<serde_json::Value> for Cell {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Absent,
            serde_json::Value::Number(n) => n.as_f64().map_or(Cell::Absent, Cell::Number),
            serde_json::Value::String(s) => Cell::Text(s),
            serde_json::Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<Cell> for serde_json::Value {
    fn from(value: Cell) -> Self {
        match value {
            Cell::Number(n) => serde_json::Number::from_f64(n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Cell::Text(s) => serde_json::Value::String(s),
            Cell::Absent => serde_json::Value::Null,
        }
    }
}

/// Parses the longest leading decimal number in `s`.
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with an optional
/// fractional part, an optional exponent, or the literal `Infinity`.
/// Anything after the number is ignored.
///
/// Returns `None` if no digits were found.
///
/// ```rust
/// # use pivotfit::cell::parse_float_prefix;
/// assert_eq!(parse_float_prefix("  -4.5e1 apples"), Some(-45.0));
/// assert_eq!(parse_float_prefix(".5"), Some(0.5));
/// assert_eq!(parse_float_prefix("1e"), Some(1.0));
/// assert_eq!(parse_float_prefix("-"), None);
/// ```
#[must_use]
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let sign = if bytes[0] == b'-' { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts if it has at least one digit
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
