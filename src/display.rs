//! Utilities for displaying trendline equations
//!
//! Trendlines are shown to users as hover text like `y = 2.000x + 3.000`.
//! This module turns a coefficient list (lowest degree first) into that string.
//!
//! # Key Concepts
//! - **[`Term`]**: Represents a single polynomial term with a sign and body.
//! - **[`Sign`]**: Tracks whether a term is positive or negative.
//!
//! # Helpers
//! - [`format_coefficient`]: Formats a numeric coefficient, skipping zeros.
//! - [`format_variable`]: Adds a Unicode superscript exponent to `x`.
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use crate::value::Value;

pub mod unicode;

/// Default precision for trendline equations, matching the dashboard hover text
pub const DEFAULT_PRECISION: usize = 3;

/// Default range in which scientific notation is not used
#[must_use]
pub fn default_fixed_range<T: Value>() -> Option<std::ops::Range<T>> {
    const RANGE: std::ops::Range<f64> = 1e-3..1e6;
    let s = T::try_cast(RANGE.start).ok()?;
    let e = T::try_cast(RANGE.end).ok()?;
    Some(s..e)
}

/// Represents the sign of a polynomial term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    ///
    /// # Example
    /// ```
    /// # use pivotfit::display::Sign;
    /// assert_eq!(Sign::from_coef(3.0), Sign::Positive);
    /// assert_eq!(Sign::from_coef(-2.0), Sign::Negative);
    /// ```
    pub fn from_coef<T: Value>(coef: T) -> Self {
        if Value::is_sign_negative(&coef) {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// Returns the character representation of the sign.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// Represents a single term of a polynomial for display purposes.
///
/// A `Term` combines the **sign** and the **formatted body** of a polynomial
/// component (e.g., `"2.000x²"`, `"3.140"`, `"x"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term (positive or negative).
    pub sign: Sign,

    /// The body of the term, without its sign.
    pub body: String,
}

impl Term {
    /// Creates a new polynomial term with the given sign and body.
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }

    /// Formats the term of `coef·x^degree`, or `None` if it rounds to zero at `precision`.
    pub fn monomial<T: Value>(coef: T, degree: i32, precision: usize) -> Option<Self> {
        let coef_str = format_coefficient(coef, degree, precision)?;
        let body = format!("{coef_str}{}", format_variable("x", degree));
        Some(Self::new(Sign::from_coef(coef), body))
    }
}

/// Formats a numeric coefficient for display in a polynomial term.
///
/// - Returns `None` if the coefficient rounds to zero at `precision`.
/// - Returns an empty string for a unit coefficient on a non-constant term (`x`, not `1.000x`).
/// - Formats as a decimal if the absolute value is between `1e-3` and `1e6`.
/// - Formats in scientific notation otherwise.
///
/// The sign is not included; see [`Sign::from_coef`].
///
/// # Example
/// ```
/// # use pivotfit::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(0.0001, 1, 3), None);
/// assert_eq!(format_coefficient(-2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1.0, 2, 2), Some(String::new()));
/// assert_eq!(format_coefficient(1e7, 1, 2), Some("1.00e7".to_string()));
/// ```
pub fn format_coefficient<T: Value>(coef: T, degree: i32, precision: usize) -> Option<String> {
    let abs = Value::abs(coef);
    let fixed = format!("{abs:.precision$}");

    if fixed.parse::<f64>().is_ok_and(|v| v == 0.0) {
        return None;
    }

    if degree != 0 && fixed == format!("{:.precision$}", 1.0) {
        return Some(String::new());
    }

    Some(unicode::float(abs, default_fixed_range(), precision))
}

/// Formats `x` raised to `exp` for display.
///
/// # Examples
/// ```
/// # use pivotfit::display::format_variable;
/// assert_eq!(format_variable("x", 0), "");
/// assert_eq!(format_variable("x", 1), "x");
/// assert_eq!(format_variable("x", 3), "x³");
/// ```
#[must_use]
pub fn format_variable(base: &str, exp: i32) -> String {
    match exp {
        0 => String::new(),
        1 => base.to_string(),
        _ => format!("{base}{}", unicode::superscript(&exp.to_string())),
    }
}

/// Formats a polynomial as `y = ...`, highest degree first.
///
/// `coefficients[i]` is the coefficient of `x^i`. Terms that round to zero are skipped;
/// if every term does, the result is `y = 0`.
///
/// # Example
/// ```
/// # use pivotfit::display::format_equation;
/// assert_eq!(format_equation(&[3.0, 2.0], 3), "y = 2.000x + 3.000");
/// assert_eq!(format_equation(&[-1.0, 0.0, 0.5], 2), "y = 0.50x² - 1.00");
/// ```
#[must_use]
pub fn format_equation<T: Value>(coefficients: &[T], precision: usize) -> String {
    let mut terms = coefficients
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(degree, &coef)| Term::monomial(coef, degree as i32, precision));

    let Some(first) = terms.next() else {
        return "y = 0".to_string();
    };

    // First term carries no leading '+'
    let mut out = String::from("y = ");
    if first.sign == Sign::Negative {
        out.push('-');
    }
    out.push_str(&first.body);

    for term in terms {
        out.push(' ');
        out.push(term.sign.char());
        out.push(' ');
        out.push_str(&term.body);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(Sign::from_coef(1.0), Sign::Positive);
        assert_eq!(Sign::from_coef(-1.0), Sign::Negative);
        assert_eq!(Sign::from_coef(0.0), Sign::Positive);
        assert_eq!(Sign::Negative.char(), '-');
    }

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(2.5, 0, 3), Some("2.500".to_string()));
        assert_eq!(format_coefficient(1.0, 0, 3), Some("1.000".to_string()));
        assert_eq!(format_coefficient(0.99999999, 1, 3), Some(String::new()));
        assert_eq!(format_coefficient(1e-12, 0, 3), None);
        assert_eq!(format_coefficient(2e-4, 0, 6), Some("2.000000e-4".to_string()));
    }

    #[test]
    fn test_format_equation() {
        assert_eq!(format_equation(&[3.0, 2.0], 3), "y = 2.000x + 3.000");
        assert_eq!(format_equation(&[-3.0, 2.0], 3), "y = 2.000x - 3.000");
        assert_eq!(format_equation(&[1.0, -1.0], 1), "y = -x + 1.0");
        assert_eq!(format_equation(&[1e-14, -2e-15, 1.0], 3), "y = x²");
        assert_eq!(format_equation(&[2.0, 0.0, 0.0, 4.0], 2), "y = 4.00x³ + 2.00");
        assert_eq!(format_equation::<f64>(&[0.0, 0.0], 3), "y = 0");
        assert_eq!(format_equation::<f64>(&[], 3), "y = 0");
    }
}
