//! Error-bar magnitudes for plotted points
//!
//! Each point gets one non-negative magnitude, computed either from the point's own
//! value ([`ErrorBar::Fixed`], [`ErrorBar::Percent`]) or from the raw samples its group
//! retained during aggregation ([`ErrorBar::Stdev`], [`ErrorBar::Sterror`]).
//!
//! ```rust
//! use pivotfit::{aggregate, compute_errors, row, Aggregation, ErrorBar};
//!
//! let rows = vec![
//!     row! { "cat" => "A", "v" => 1.0 },
//!     row! { "cat" => "A", "v" => 3.0 },
//!     row! { "cat" => "B", "v" => 5.0 },
//! ];
//! let groups = aggregate(&rows, &["cat"], &["v"], Aggregation::Mean);
//!
//! let errors = compute_errors(&groups, "v", ErrorBar::Stdev);
//! assert!((errors[0] - 2f64.sqrt()).abs() < 1e-12);
//! assert_eq!(errors[1], 0.0); // one sample has no spread
//!
//! let errors = compute_errors(&groups, "v", ErrorBar::Percent { value: 10.0 });
//! assert_eq!(errors, vec![0.2, 0.5]);
//! ```
use serde::{Deserialize, Serialize};

use crate::{aggregate::AggregatedRow, statistics};

/// How error magnitudes are derived.
///
/// Serialized as `{"type": "fixed", "value": 0.5}`, `{"type": "stdev"}` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ErrorBar {
    /// No error bars; every magnitude is 0
    #[default]
    None,

    /// The same magnitude for every point
    Fixed {
        /// Magnitude, applied by absolute value
        value: f64,
    },

    /// A percentage of each point's own value
    Percent {
        /// Percentage, applied by absolute value
        value: f64,
    },

    /// Sample standard deviation of the group's samples
    Stdev,

    /// Standard error of the mean of the group's samples
    Sterror,
}

impl ErrorBar {
    /// Builds an error-bar setting from the dashboard's type string and parameter.
    ///
    /// The parameter is ignored for `none`, `stdev` and `sterror`.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownOption`] for any other type string.
    pub fn parse(kind: &str, value: f64) -> crate::Result<Self> {
        match kind {
            "none" => Ok(Self::None),
            "fixed" => Ok(Self::Fixed { value }),
            "percent" => Ok(Self::Percent { value }),
            "stdev" => Ok(Self::Stdev),
            "sterror" => Ok(Self::Sterror),
            _ => Err(crate::Error::UnknownOption {
                kind: "error bar",
                value: kind.to_string(),
            }),
        }
    }

    /// Returns true unless this is [`ErrorBar::None`]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Error magnitude for one point.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// fixed   = |v|
    /// percent = |value| · |v| / 100
    /// stdev   = sqrt( Σ (x_i - mean)² / (n - 1) )     (0 when n < 2)
    /// sterror = stdev / sqrt(n)                         (0 when n = 0)
    /// ```
    /// </div>
    ///
    /// # Parameters
    /// - `value`: The point's plotted value.
    /// - `samples`: The raw observations behind the point.
    ///
    /// # Returns
    /// A non-negative magnitude. NaN inputs yield 0.
    #[must_use]
    pub fn magnitude(&self, value: f64, samples: &[f64]) -> f64 {
        let error = match *self {
            Self::None => 0.0,
            Self::Fixed { value: v } => v.abs(),
            Self::Percent { value: p } => value.abs() * (p.abs() / 100.0),
            Self::Stdev => statistics::sample_stddev(samples.iter().copied()),
            Self::Sterror => statistics::standard_error(samples.iter().copied()),
        };

        if error.is_nan() {
            0.0
        } else {
            error
        }
    }
}

/// Computes one error magnitude per row for value field `field`.
///
/// The point's value is the row's cell coerced to a number (0 if it does not parse),
/// and its samples are the ones the row retained for `field`.
///
/// # Returns
/// An error series aligned positionally with `rows`.
#[must_use]
pub fn compute_errors(rows: &[AggregatedRow], field: &str, bar: ErrorBar) -> Vec<f64> {
    rows.iter()
        .map(|row| bar.magnitude(row.value(field).unwrap_or(0.0), row.samples(field)))
        .collect()
}
