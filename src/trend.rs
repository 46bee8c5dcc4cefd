//! Least-squares trendlines
//!
//! Fits a curve through paired `(x, y)` values for display as a chart overlay:
//! - [`fit_linear`]: closed-form ordinary least squares.
//! - [`fit_polynomial`]: polynomial least squares through the normal equations.
//!
//! Both return a [`TrendResult`] with the coefficients (lowest degree first),
//! the fitted `y` at every input `x`, and the R² of the fit.
//!
//! # Numerical limitations
//! [`fit_polynomial`] solves `(XᵀX) c = Xᵀy` by inverting `XᵀX`. This squares the
//! condition number of the design matrix, so it is reliable for degree ≤ ~3 and
//! well-separated x values. Near-duplicate or very large x values with higher degrees
//! are reported as [`Error::SingularMatrix`] rather than producing garbage.
//!
//! [`PolynomialSolver::Qr`] factorizes the design matrix directly and is better
//! behaved on ill-conditioned data; its results can differ from the normal equations
//! in the last few digits, so it is opt-in.
//!
//! ```rust
//! use pivotfit::trend::{fit_linear, fit_polynomial};
//!
//! let fit = fit_linear::<f64>(&[0.0, 1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0, 11.0]).unwrap();
//! assert!((fit.slope() - 2.0).abs() < 1e-12);
//! assert!((fit.intercept() - 3.0).abs() < 1e-12);
//!
//! let fit = fit_polynomial::<f64>(&[1.0, 2.0, 3.0], &[1.0, 4.0, 9.0], 2).unwrap();
//! assert_eq!(fit.equation(3), "y = x²");
//! ```
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::{
    display,
    error::{Error, Result},
    statistics,
    value::Value,
};

/// Trendline to overlay on a series.
///
/// Serialized as `{"type": "none"}`, `{"type": "linear"}` or `{"type": "poly", "degree": 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trendline {
    /// No trendline
    #[default]
    None,

    /// Straight line, see [`fit_linear`]
    Linear,

    /// Polynomial of the given degree, see [`fit_polynomial`]
    Poly {
        /// Highest power of `x`
        degree: usize,
    },
}

impl Trendline {
    /// Builds a trendline from the dashboard's `none|linear|poly` type string and degree.
    ///
    /// The degree is ignored unless `kind` is `poly`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOption`] for any other type string.
    pub fn parse(kind: &str, degree: usize) -> Result<Self> {
        match kind {
            "none" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            "poly" => Ok(Self::Poly { degree }),
            _ => Err(Error::UnknownOption {
                kind: "trendline",
                value: kind.to_string(),
            }),
        }
    }

    /// Fits this trendline to `xs`/`ys`.
    ///
    /// Returns `None` for [`Trendline::None`].
    pub fn fit<T: Value>(
        &self,
        xs: &[T],
        ys: &[T],
        solver: PolynomialSolver,
    ) -> Option<Result<TrendResult<T>>> {
        match self {
            Self::None => None,
            Self::Linear => Some(fit_linear(xs, ys)),
            Self::Poly { degree } => Some(fit_polynomial_with(xs, ys, *degree, solver)),
        }
    }
}

/// Method used to solve the polynomial least-squares problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolynomialSolver {
    /// Invert `XᵀX` and multiply by `Xᵀy`.
    #[default]
    NormalEquations,

    /// Householder QR of the design matrix, then back-substitution.
    Qr,
}

/// A fitted trendline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult<T: Value = f64> {
    coefficients: Vec<T>,
    fitted: Vec<T>,
    r_squared: T,
}

impl<T: Value> TrendResult<T> {
    fn new(coefficients: Vec<T>, xs: &[T], ys: &[T]) -> Result<Self> {
        if coefficients.iter().any(|c| c.is_nan()) {
            return Err(Error::Algebra("NaN in coefficients"));
        }

        let fitted: Vec<T> = xs.iter().map(|&x| horner(&coefficients, x)).collect();
        let r_squared = statistics::r_squared(ys.iter().copied(), fitted.iter().copied());
        Ok(Self {
            coefficients,
            fitted,
            r_squared,
        })
    }

    /// Coefficients, lowest degree first: `coefficients()[i]` multiplies `x^i`
    #[must_use]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Fitted y value at each input x, in input order
    #[must_use]
    pub fn fitted(&self) -> &[T] {
        &self.fitted
    }

    /// Coefficient of determination against the input y values.
    ///
    /// Zero if the input y values were all equal.
    #[must_use]
    pub fn r_squared(&self) -> T {
        self.r_squared
    }

    /// Degree of the fitted polynomial
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Constant term
    #[must_use]
    pub fn intercept(&self) -> T {
        self.coefficients.first().copied().unwrap_or_else(T::zero)
    }

    /// Coefficient of `x`
    #[must_use]
    pub fn slope(&self) -> T {
        self.coefficients.get(1).copied().unwrap_or_else(T::zero)
    }

    /// Evaluates the trendline at `x`
    #[must_use]
    pub fn predict(&self, x: T) -> T {
        horner(&self.coefficients, x)
    }

    /// Human-readable equation, e.g. `y = 2.000x + 3.000`
    #[must_use]
    pub fn equation(&self, precision: usize) -> String {
        display::format_equation(&self.coefficients, precision)
    }
}

/// Evaluates a polynomial with coefficients lowest degree first.
fn horner<T: Value>(coefficients: &[T], x: T) -> T {
    coefficients
        .iter()
        .rev()
        .fold(T::zero(), |acc, &c| acc * x + c)
}

fn check_pairs<T>(xs: &[T], ys: &[T]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(Error::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }

    if xs.len() < 2 {
        return Err(Error::InsufficientData { n: xs.len() });
    }

    Ok(())
}

/// Fits a straight line by ordinary least squares.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// slope     = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
/// intercept = (Σy − slope·Σx) / n
/// ```
/// </div>
///
/// If every x is identical the slope is undefined; it is reported as `0`, with the
/// intercept at the mean of `ys`, giving a flat line through the data.
///
/// # Errors
/// - [`Error::LengthMismatch`] if `xs` and `ys` differ in length.
/// - [`Error::InsufficientData`] if there are fewer than 2 points.
/// - [`Error::Algebra`] if the inputs produce NaN coefficients.
pub fn fit_linear<T: Value>(xs: &[T], ys: &[T]) -> Result<TrendResult<T>> {
    check_pairs(xs, ys)?;

    let n = T::from_positive_int(xs.len());
    let mut sum_x = T::zero();
    let mut sum_y = T::zero();
    let mut sum_xy = T::zero();
    let mut sum_x2 = T::zero();
    for (&x, &y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    let degenerate = denominator == T::zero() || xs.iter().all(|&x| x == xs[0]);

    let (slope, intercept) = if degenerate {
        (T::zero(), sum_y / n)
    } else {
        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        (slope, (sum_y - slope * sum_x) / n)
    };

    TrendResult::new(vec![intercept, slope], xs, ys)
}

/// Fits a polynomial of `degree` by solving the normal equations.
///
/// Equivalent to [`fit_polynomial_with`] using [`PolynomialSolver::NormalEquations`].
///
/// # Errors
/// See [`fit_polynomial_with`].
pub fn fit_polynomial<T: Value>(xs: &[T], ys: &[T], degree: usize) -> Result<TrendResult<T>> {
    fit_polynomial_with(xs, ys, degree, PolynomialSolver::NormalEquations)
}

/// Fits a polynomial of `degree` by least squares.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// Builds the `n × (degree + 1)` design matrix `X` with `X[i][j] = xs[i]^j` and solves
/// ```math
/// (XᵀX) c = Xᵀy
/// ```
/// for the coefficient vector `c`, either by inverting `XᵀX` or through a QR
/// factorization of `X`, depending on `solver`.
///
/// `XᵀX` is scaled to a unit diagonal before it is inverted, and treated as singular
/// when the ratio of its smallest to largest eigenvalue is at most `ε · n · (degree + 1)`.
/// The scaling makes that ratio independent of the magnitude of the data, so it flags
/// near-collinear powers of `x` without rejecting well-posed high-degree fits.
/// </div>
///
/// # Errors
/// - [`Error::LengthMismatch`] if `xs` and `ys` differ in length.
/// - [`Error::InsufficientData`] if there are fewer than 2 points.
/// - [`Error::InvalidDegree`] if `degree` is 0.
/// - [`Error::SingularMatrix`] if `degree >= n`, or the system is (nearly) singular.
///   Fall back to a lower degree, or omit the trendline.
/// - [`Error::Algebra`] if the solution contains NaN.
pub fn fit_polynomial_with<T: Value>(
    xs: &[T],
    ys: &[T],
    degree: usize,
    solver: PolynomialSolver,
) -> Result<TrendResult<T>> {
    check_pairs(xs, ys)?;
    if degree == 0 {
        return Err(Error::InvalidDegree(degree));
    }

    let n = xs.len();
    let k = degree + 1;
    if degree >= n {
        return Err(Error::SingularMatrix { n, k });
    }

    i32::try_from(degree).map_err(|_| Error::InvalidDegree(degree))?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let x = DMatrix::from_fn(n, k, |i, j| Value::powi(xs[i], j as i32));
    let y = DVector::from_column_slice(ys);

    let coefficients = match solver {
        PolynomialSolver::NormalEquations => solve_normal_equations(&x, &y),
        PolynomialSolver::Qr => solve_qr(x, &y),
    }
    .ok_or(Error::SingularMatrix { n, k })?;

    TrendResult::new(coefficients.iter().copied().collect(), xs, ys)
}

/// Solves `(XᵀX) c = Xᵀy` by matrix inversion. `None` if `XᵀX` is singular.
///
/// `XᵀX` is first scaled to a unit diagonal, `S = D⁻¹ᐟ² XᵀX D⁻¹ᐟ²`, so that the rank
/// test does not depend on the magnitude of the powers of `x`. `S` is singular when
/// `min|λ| <= max|λ| · ε · n · k`; otherwise `c = D⁻¹ᐟ² S⁻¹ D⁻¹ᐟ² Xᵀy`.
fn solve_normal_equations<T: Value>(x: &DMatrix<T>, y: &DVector<T>) -> Option<DVector<T>> {
    let (n, k) = x.shape();
    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;

    // A zero column of X means a zero diagonal entry
    let diagonal = xtx.diagonal();
    if diagonal.iter().any(|&d| d <= T::zero()) {
        return None;
    }
    let d = diagonal.map(|d| T::one() / d.sqrt());
    let scaled = DMatrix::from_fn(k, k, |i, j| xtx[(i, j)] * d[i] * d[j]);

    let eigenvalues = scaled.symmetric_eigenvalues();
    let largest = eigenvalues
        .iter()
        .fold(T::zero(), |acc, &e| nalgebra::RealField::max(acc, Value::abs(e)));
    let smallest = eigenvalues
        .iter()
        .fold(largest, |acc, &e| nalgebra::RealField::min(acc, Value::abs(e)));
    let tolerance = largest * T::epsilon() * T::from_positive_int(n * k);
    if smallest.is_nan() || smallest <= tolerance {
        return None;
    }

    let inverse = scaled.try_inverse()?;
    Some((inverse * xty.component_mul(&d)).component_mul(&d))
}

/// Solves the least-squares problem through `X = QR`, then `R c = Qᵀy`. `None` if `R` is rank deficient.
fn solve_qr<T: Value>(x: DMatrix<T>, y: &DVector<T>) -> Option<DVector<T>> {
    let n = x.nrows();
    let qr = x.qr();
    let (q, r) = (qr.q(), qr.r());

    let diagonal = r.diagonal();
    let max_diag = diagonal
        .iter()
        .fold(T::zero(), |acc, &d| nalgebra::RealField::max(acc, Value::abs(d)));
    let tolerance = max_diag * T::epsilon() * T::from_positive_int(n);
    if max_diag == T::zero() || diagonal.iter().any(|&d| Value::abs(d) <= tolerance) {
        return None;
    }

    let qty = q.transpose() * y;
    r.solve_upper_triangular(&qty)
}
