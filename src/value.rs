//! Numeric types used by statistics and trend fitting.
//!
//! This module defines the [`Value`] trait, which abstracts the float types
//! that trendlines and statistics can be computed in, ensuring compatibility
//! with nalgebra and floating-point operations.
//!
//! Spreadsheet cells are always read as `f64`; the trait exists so that the
//! numeric core can also run in `f32` when memory matters more than precision.
//!
//! # Example
//!
//! ```rust
//! use pivotfit::value::Value;
//!
//! let two = f64::two();
//! let squared = Value::powi(two, 2);
//! assert_eq!(squared, 4.0);
//! ```
use crate::error::Error;

/// Numeric type for statistics and trendlines
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Converts the value to `f64`, for reporting
    fn as_f64(&self) -> Option<f64> {
        num_traits::cast(*self)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Check if the value is negative
    fn is_sign_negative(&self) -> bool {
        self < &Self::zero()
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}
