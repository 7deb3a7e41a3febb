//! Sequential Gaussian filtering in standard and square-root form.
//!
//! A belief is a [`GaussianState`]: either mean and covariance
//! ([`GaussianState::Standard`]) or mean and lower-triangular Cholesky
//! factor ([`GaussianState::Sqrt`]). Models are plain closures wrapped in a
//! [`FunctionalModel`] together with their additive noise. Each step, a
//! [`Linearization`] strategy turns a model into an [`AffineModel`] about a
//! reference belief, and [`predict`] / [`update`] apply the affine Kalman
//! equations of the matching representation.
//!
//! - [`Extended`]: first-order Taylor expansion (analytic or
//!   finite-difference Jacobian).
//! - [`Cubature`]: third-degree spherical-radial cubature, statistical
//!   linear regression on `2n` points.
//!
//! [`SequentialFilter`] (or the free function [`filtering`]) runs the whole
//! recursion over an observation sequence, optionally re-linearizing about
//! an externally supplied nominal [`Trajectory`].
//!
//! # Example
//!
//! ```
//! use gaussfilt::estimate::{Extended, FunctionalModel, GaussianState, SequentialFilter};
//! use gaussfilt::{DynMatrix, DynVector};
//!
//! // Random walk observed directly.
//! let q = GaussianState::standard(DynVector::zeros(1, 0.0_f64), DynMatrix::eye(1, 0.0) * 0.01).unwrap();
//! let r = GaussianState::standard(DynVector::zeros(1, 0.0_f64), DynMatrix::eye(1, 0.0) * 0.5).unwrap();
//! let transition = FunctionalModel::new(|x: &DynVector<f64>| x.clone(), q);
//! let observation = FunctionalModel::new(|x: &DynVector<f64>| x.clone(), r);
//!
//! let filter = SequentialFilter::new(transition, observation, Extended);
//! let x0 = GaussianState::standard(DynVector::zeros(1, 0.0), DynMatrix::eye(1, 0.0)).unwrap();
//! let ys: Vec<_> = [0.9, 1.1, 1.0].iter().map(|&y| DynVector::from_slice(&[y])).collect();
//!
//! let out = filter.run(&ys, &x0, None).unwrap();
//! assert_eq!(out.len(), 4);
//! assert_eq!(out.first(), Some(&x0));
//! assert!(out.last().unwrap().mean()[0] > 0.5);
//! ```

mod cubature;
mod extended;
mod filter;
mod linearize;
mod model;
mod sqrt;
mod standard;
mod state;
mod step;


pub use cubature::Cubature;
pub use extended::Extended;
pub use filter::{filtering, SequentialFilter};
pub use linearize::{AffineModel, Linearization, Noise};
pub use model::{FunctionalModel, Jacobian};
pub use state::{GaussianState, Representation, Trajectory};
pub use step::{predict, update};

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::LinalgError;
use crate::traits::FloatScalar;

/// Incompatible dimensions or representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMismatch {
    /// An operand has the wrong shape (`(rows, cols)`; vectors are `(n, 1)`).
    Dimension {
        operand: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// A square-root factor has nonzero entries above the diagonal.
    NotLowerTriangular { operand: &'static str },
    /// Standard and square-root quantities were mixed.
    Representation {
        expected: Representation,
        got: Representation,
    },
    /// A nominal trajectory does not have one entry per observation plus the prior.
    TrajectoryLength { expected: usize, got: usize },
}

impl core::fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ShapeMismatch::Dimension {
                operand,
                expected,
                got,
            } => write!(
                f,
                "{} has shape {}x{}, expected {}x{}",
                operand, got.0, got.1, expected.0, expected.1
            ),
            ShapeMismatch::NotLowerTriangular { operand } => {
                write!(f, "{} is not lower triangular", operand)
            }
            ShapeMismatch::Representation { expected, got } => {
                write!(f, "{} representation where {} was expected", got, expected)
            }
            ShapeMismatch::TrajectoryLength { expected, got } => {
                write!(f, "trajectory has {} states, expected {}", got, expected)
            }
        }
    }
}

/// Errors from state estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    /// Model, state or observation shapes are incompatible.
    ShapeMismatch(ShapeMismatch),
    /// A covariance (or a rank-one update of one) is not positive (semi-)definite.
    NotPositiveDefinite,
    /// The innovation system cannot be solved.
    SingularSystem,
}

impl core::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EstimateError::ShapeMismatch(m) => write!(f, "shape mismatch: {}", m),
            EstimateError::NotPositiveDefinite => {
                write!(f, "covariance matrix is not positive definite")
            }
            EstimateError::SingularSystem => write!(f, "innovation covariance is singular"),
        }
    }
}

impl From<ShapeMismatch> for EstimateError {
    fn from(m: ShapeMismatch) -> Self {
        EstimateError::ShapeMismatch(m)
    }
}

impl From<LinalgError> for EstimateError {
    fn from(e: LinalgError) -> Self {
        match e {
            LinalgError::Singular => EstimateError::SingularSystem,
            LinalgError::NotPositiveDefinite => EstimateError::NotPositiveDefinite,
        }
    }
}

/// An [`EstimateError`] raised while filtering, tagged with the step that failed.
///
/// Steps are numbered from `1` (the step consuming the first observation);
/// step `0` means the prior or the nominal trajectory was rejected before
/// any step ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterError {
    pub step: usize,
    pub error: EstimateError,
}

impl core::fmt::Display for FilterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "filtering failed at step {}: {}", self.step, self.error)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ShapeMismatch {}

#[cfg(feature = "std")]
impl std::error::Error for EstimateError {}

#[cfg(feature = "std")]
impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// `Err` unless `got == expected`.
pub(crate) fn check_shape(
    operand: &'static str,
    expected: (usize, usize),
    got: (usize, usize),
) -> Result<(), EstimateError> {
    if got == expected {
        Ok(())
    } else {
        Err(ShapeMismatch::Dimension {
            operand,
            expected,
            got,
        }
        .into())
    }
}

/// Forward-difference Jacobian of `f: Rⁿ → Rᵐ` at `x`.
///
/// Uses step size `h_j = sqrt(ε) * max(|x_j|, 1)` for each component.
pub(crate) fn fd_jacobian<T: FloatScalar>(
    f: &impl Fn(&DynVector<T>) -> DynVector<T>,
    x: &DynVector<T>,
) -> DynMatrix<T> {
    let sqrt_eps = T::epsilon().sqrt();
    let f0 = f(x);
    let mut jac = DynMatrix::zeros(f0.len(), x.len(), T::zero());
    let mut x_pert = x.clone();

    for j in 0..x.len() {
        let xj = x[j];
        let h = sqrt_eps * xj.abs().max(T::one());
        x_pert[j] = xj + h;
        let f_pert = f(&x_pert);
        x_pert[j] = xj;

        for i in 0..f0.len().min(f_pert.len()) {
            jac[(i, j)] = (f_pert[i] - f0[i]) / h;
        }
    }

    jac
}
