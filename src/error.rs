//! Error types for aggregation, trend fitting and pipeline configuration
//!
//! This module defines the failures surfaced to callers, along with a
//! convenient `Result` alias.
//!
//! Malformed numeric cells are never errors: they are skipped during
//! aggregation. Empty input is not an error either; it aggregates to an
//! empty result.

/// Errors that can occur while building chart data.
///
/// Structural failures of the optional overlays (trendlines) are reported
/// with these variants so the caller can drop the overlay and still render
/// the primary series.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot fit a trendline with fewer than 2 paired points.
    #[error("At least 2 paired (x, y) points are required for a trendline, got {n}")]
    InsufficientData {
        /// Number of points supplied
        n: usize,
    },

    /// The x and y sequences handed to a fit have different lengths.
    #[error("x and y must have the same length [x: {x}, y: {y}]")]
    LengthMismatch {
        /// Number of x values
        x: usize,
        /// Number of y values
        y: usize,
    },

    /// Polynomial trendlines need a degree of at least 1.
    #[error("Polynomial degree `{0}` is not supported; use a degree of 1 or more")]
    InvalidDegree(usize),

    /// Cannot compute a polynomial fit because the normal-equations matrix is singular
    ///
    /// Usually the degree is too high for the data, or the x values are (nearly) identical.
    /// Fall back to a lower degree or omit the trendline.
    #[error(
        "Normal-equations matrix (X^T X) is not invertible; the x values may be collinear or too few for the degree. [n: {n}, k: {k}]"
    )]
    SingularMatrix {
        /// Number of data points
        n: usize,
        /// Number of coefficients
        k: usize,
    },

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// A configuration string did not name a known option.
    #[error("Unknown {kind} `{value}`")]
    UnknownOption {
        /// Which option was being parsed (e.g. `aggregation`)
        kind: &'static str,
        /// The rejected input
        value: String,
    },

    /// The pipeline configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A dataset or configuration could not be read from or written to JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for chart data preparation
pub type Result<T> = std::result::Result<T, Error>;
