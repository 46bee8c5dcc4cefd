//! Assertions for testing aggregation and trendline results.
//!
//! Floating-point results rarely compare exactly equal, so these macros compare within a
//! relative tolerance instead.
//!
//! ### [`crate::assert_close`]
//! Asserts that two floating-point values are approximately equal.
//! - `assert_eq!` equivalent for floats.
//! - The default tolerance is [`DEFAULT_TOLERANCE`], relative to the larger of the two
//!   magnitudes (or absolute, below 1). Pass `tol = ...` to override it.
//!
//! ```rust
//! # use pivotfit::assert_close;
//! assert_close!(0.1 + 0.2, 0.3);
//! assert_close!(1.0, 1.001, tol = 1e-2);
//! ```
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two slices of equal length.
//!
//! ```rust
//! # use pivotfit::assert_all_close;
//! let fitted = vec![0.1 + 0.2, 2.0];
//! assert_all_close!(fitted, [0.3, 2.0]);
//! ```
//!
//! ### [`crate::assert_r_squared`]
//! Asserts that a [`crate::TrendResult`] explains its source data at least as well as a threshold.
//! - The threshold defaults to `0.9`.
//!
//! ```rust
//! # use pivotfit::{assert_r_squared, trend::fit_linear};
//! let fit = fit_linear(&[0.0, 1.0, 2.0, 3.0], &[1.0, 2.9, 5.2, 7.0]).unwrap();
//! assert_r_squared!(fit, 0.99);
//! ```
use crate::value::Value;


/// Default relative tolerance for [`crate::assert_close`] and [`crate::assert_all_close`]
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Returns true if `a` and `b` differ by at most `tol`, relative to `max(1, |a|, |b|)`.
///
/// The tolerance is never tighter than a few units of machine epsilon for `T`, so
/// `f32` comparisons with the default tolerance remain meaningful.
///
/// NaN is never close to anything, including NaN.
pub fn is_close<T: Value>(a: T, b: T, tol: f64) -> bool {
    if a == b {
        return true;
    }

    let four = T::two() * T::two();
    let floor = T::epsilon() * four;
    let tol = T::try_cast(tol).map_or(floor, |tol| <T as nalgebra::RealField>::max(tol, floor));

    let scale = [Value::abs(a), Value::abs(b)]
        .into_iter()
        .fold(T::one(), <T as nalgebra::RealField>::max);
    Value::abs(a - b) <= tol * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        assert!(is_close(0.1 + 0.2, 0.3, DEFAULT_TOLERANCE));
        assert!(is_close(1e12, 1e12 + 1.0, DEFAULT_TOLERANCE));
        assert!(!is_close(1.0, 1.001, DEFAULT_TOLERANCE));
        assert!(is_close(1.0, 1.001, 1e-2));
        assert!(!is_close(f64::NAN, f64::NAN, 1.0));
        assert!(is_close(f64::INFINITY, f64::INFINITY, 0.0));
        assert!(is_close(1.0f32, 1.000_000_1, DEFAULT_TOLERANCE));
    }

    #[test]
    #[should_panic(expected = "src[1]")]
    fn test_all_close_reports_index() {
        crate::assert_all_close!([1.0, 2.0], [1.0, 2.5]);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_all_close_length() {
        crate::assert_all_close!([1.0, 2.0], [1.0]);
    }
}
