//! Descriptive statistics and goodness-of-fit measures
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`sample_stddev`]: Bessel-corrected standard deviation, as used for error bars.
//! - [`standard_error`]: Standard error of the mean.
//!
//! # Model Fit
//! - [`r_squared`]: Proportion of variance explained by a trendline. Higher is better (0 to 1).
//! - [`residual_sum_of_squares`] / [`total_sum_of_squares`]: The two halves of R².
//!
//! # Examples
//!
//! ```rust
//! use pivotfit::statistics::{r_squared, sample_stddev};
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! assert!(r2 > 0.9);
//!
//! let s = sample_stddev(y.iter().copied());
//! assert_eq!(s, 1.0);
//! ```
use crate::value::Value;

/// Computes the arithmetic mean of a sequence of values.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// Mean = (Σ x_i) / N
/// ```
/// </div>
///
/// # Returns
/// The arithmetic mean of all elements in `data`.
/// - Returns zero if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = pivotfit::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut sum = T::zero();
    let mut count = T::zero();
    for value in data {
        sum += value;
        count += T::one();
    }

    if count == T::zero() {
        return T::zero();
    }
    sum / count
}

/// Computes the sample standard deviation and mean of a sequence of values.
/// - Uses the Bessel-corrected formula (divides by `N - 1`).
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// s = sqrt( (Σ (x_i - Mean)²) / (N - 1) )
/// ```
/// </div>
///
/// # Returns
/// `(stddev, mean)`. The standard deviation is zero when there are fewer than 2 values,
/// since a single observation has no spread to estimate.
pub fn sample_stddev_and_mean<T: Value>(data: impl Iterator<Item = T>) -> (T, T) {
    let data: Vec<_> = data.collect();
    let mean = mean(data.iter().copied());
    if data.len() < 2 {
        return (T::zero(), mean);
    }

    let mut sum_sq_diff = T::zero();
    for &value in &data {
        sum_sq_diff += Value::powi(value - mean, 2);
    }

    let n = T::from_positive_int(data.len());
    ((sum_sq_diff / (n - T::one())).sqrt(), mean)
}

/// Computes the sample (Bessel-corrected) standard deviation of a sequence of values.
///
/// Returns zero for fewer than 2 values.
///
/// See [`sample_stddev_and_mean`].
///
/// # Examples
/// ```rust
/// let s: f64 = pivotfit::statistics::sample_stddev([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter());
/// assert!((s - 2.138089935299395).abs() < 1e-12);
/// ```
pub fn sample_stddev<T: Value>(data: impl Iterator<Item = T>) -> T {
    sample_stddev_and_mean(data).0
}

/// Computes the standard error of the mean.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// SE = s / sqrt(N)
/// where
///   s = sample standard deviation (N - 1 denominator)
/// ```
/// </div>
///
/// # Returns
/// Zero for an empty sequence, and for a single value (whose standard deviation is zero).
pub fn standard_error<T: Value>(data: impl Iterator<Item = T>) -> T {
    let data: Vec<_> = data.collect();
    if data.is_empty() {
        return T::zero();
    }

    let stddev = sample_stddev(data.iter().copied());
    stddev / T::from_positive_int(data.len()).sqrt()
}

/// Sum of squared differences between observed and predicted values.
///
/// ```math
/// SS_res = Σ (y_i - y_fit_i)²
/// ```
pub fn residual_sum_of_squares<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    y.zip(y_fit)
        .fold(T::zero(), |acc, (y, y_fit)| acc + Value::powi(y - y_fit, 2))
}

/// Sum of squared differences between observed values and their mean.
///
/// ```math
/// SS_tot = Σ (y_i - y_mean)²
/// ```
pub fn total_sum_of_squares<T: Value>(y: impl Iterator<Item = T>) -> T {
    let y: Vec<_> = y.collect();
    let y_mean = mean(y.iter().copied());
    y.into_iter()
        .fold(T::zero(), |acc, y| acc + Value::powi(y - y_mean, 2))
}

/// Calculate the R-squared value for a set of data.
///
/// R-squared tells you how well the trendline explains the data:
/// - `0` means the model explains none of the variation.
/// - `1` means the model explains all the variation.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - (SS_res / SS_tot)
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
/// If `SS_tot` is zero (every `y` is the same) R² is defined as `0`.
/// </div>
///
/// # Parameters
/// - `y`: The actual (observed) values.
/// - `y_fit`: The predicted values from the model.
///
/// # Example
/// ```rust
/// # use pivotfit::statistics::r_squared;
/// let y = vec![3.0, 3.0, 3.0];
/// let y_fit = vec![3.0, 3.0, 3.0];
/// assert_eq!(r_squared(y.into_iter(), y_fit.into_iter()), 0.0);
/// ```
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let y: Vec<_> = y.collect();
    let ss_tot = total_sum_of_squares(y.iter().copied());
    if ss_tot == T::zero() {
        return T::zero();
    }

    let ss_res = residual_sum_of_squares(y.into_iter(), y_fit);
    T::one() - ss_res / ss_tot
}
