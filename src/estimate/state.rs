use alloc::vec::Vec;
use core::ops::Index;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::CholeskyDecomposition;
use crate::traits::FloatScalar;

use super::{check_shape, EstimateError, ShapeMismatch};

/// Which of the two covariance representations a belief uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Mean and full covariance.
    Standard,
    /// Mean and lower-triangular Cholesky factor.
    Sqrt,
}

impl core::fmt::Display for Representation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Representation::Standard => write!(f, "standard"),
            Representation::Sqrt => write!(f, "square-root"),
        }
    }
}

/// A multivariate Gaussian belief.
///
/// Both variants describe the same distribution; `Sqrt` carries `L` with
/// `L·Lᵀ` the covariance and never forms the covariance itself. Prefer the
/// validating constructors [`standard`](Self::standard) and
/// [`sqrt`](Self::sqrt) over building variants directly.
///
/// ```
/// use gaussfilt::estimate::{GaussianState, Representation};
/// use gaussfilt::{DynMatrix, DynVector};
///
/// let cov = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 2.0]);
/// let x = GaussianState::standard(DynVector::from_slice(&[1.0, 0.0]), cov.clone()).unwrap();
///
/// let s = x.to_sqrt().unwrap();
/// assert_eq!(s.representation(), Representation::Sqrt);
/// let back = s.covariance();
/// assert!((back[(0, 1)] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GaussianState<T> {
    Standard {
        mean: DynVector<T>,
        cov: DynMatrix<T>,
    },
    Sqrt {
        mean: DynVector<T>,
        chol: DynMatrix<T>,
    },
}

impl<T: FloatScalar> GaussianState<T> {
    /// Mean and covariance. The covariance must be `n×n`.
    pub fn standard(mean: DynVector<T>, cov: DynMatrix<T>) -> Result<Self, EstimateError> {
        let state = GaussianState::Standard { mean, cov };
        state.validate()?;
        Ok(state)
    }

    /// Mean and lower-triangular factor `L` of the covariance `L·Lᵀ`.
    pub fn sqrt(mean: DynVector<T>, chol: DynMatrix<T>) -> Result<Self, EstimateError> {
        let state = GaussianState::Sqrt { mean, chol };
        state.validate()?;
        Ok(state)
    }

    /// Check the structural invariants: a square `n×n` covariance or factor,
    /// and a lower-triangular factor.
    pub fn validate(&self) -> Result<(), EstimateError> {
        let n = self.dim();
        match self {
            GaussianState::Standard { cov, .. } => check_shape("covariance", (n, n), cov.shape()),
            GaussianState::Sqrt { chol, .. } => {
                check_shape("covariance factor", (n, n), chol.shape())?;
                if !chol.is_lower_triangular() {
                    return Err(ShapeMismatch::NotLowerTriangular {
                        operand: "covariance factor",
                    }
                    .into());
                }
                Ok(())
            }
        }
    }

    #[inline]
    pub fn representation(&self) -> Representation {
        match self {
            GaussianState::Standard { .. } => Representation::Standard,
            GaussianState::Sqrt { .. } => Representation::Sqrt,
        }
    }

    #[inline]
    pub fn mean(&self) -> &DynVector<T> {
        match self {
            GaussianState::Standard { mean, .. } | GaussianState::Sqrt { mean, .. } => mean,
        }
    }

    /// State dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.mean().len()
    }

    /// The covariance, formed as `L·Lᵀ` for the square-root variant.
    pub fn covariance(&self) -> DynMatrix<T> {
        match self {
            GaussianState::Standard { cov, .. } => cov.clone(),
            GaussianState::Sqrt { chol, .. } => chol * &chol.transpose(),
        }
    }

    /// A lower-triangular `L` with `L·Lᵀ` equal to the covariance.
    ///
    /// The square-root variant returns its own factor. The standard variant
    /// is factored with the semidefinite Cholesky decomposition, so singular
    /// covariances are accepted (their null directions get zero columns);
    /// `NotPositiveDefinite` if the covariance has a negative direction or
    /// is not symmetric, i.e. if `L·Lᵀ` does not reproduce it.
    pub fn factor(&self) -> Result<DynMatrix<T>, EstimateError> {
        match self {
            GaussianState::Sqrt { chol, .. } => Ok(chol.clone()),
            GaussianState::Standard { cov, .. } => {
                let l = CholeskyDecomposition::new_semidefinite(cov)?.into_l();
                let tol = T::epsilon().sqrt() * cov.max_abs().max(T::one());
                let residual = (&l * &l.transpose() - cov).max_abs();
                if residual <= tol {
                    Ok(l)
                } else {
                    Err(EstimateError::NotPositiveDefinite)
                }
            }
        }
    }

    /// The same belief in standard form.
    pub fn to_standard(&self) -> Self {
        GaussianState::Standard {
            mean: self.mean().clone(),
            cov: self.covariance(),
        }
    }

    /// The same belief in square-root form (see [`factor`](Self::factor)).
    pub fn to_sqrt(&self) -> Result<Self, EstimateError> {
        Ok(GaussianState::Sqrt {
            mean: self.mean().clone(),
            chol: self.factor()?,
        })
    }

    /// The same belief in the requested representation.
    pub fn to_representation(&self, repr: Representation) -> Result<Self, EstimateError> {
        match repr {
            Representation::Standard => Ok(self.to_standard()),
            Representation::Sqrt => self.to_sqrt(),
        }
    }
}

/// Time-ordered sequence of beliefs sharing one representation and dimension.
///
/// Returned by the filter (prior first), and accepted as a nominal
/// trajectory to linearize about.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<T> {
    states: Vec<GaussianState<T>>,
}

impl<T: FloatScalar> Trajectory<T> {
    /// Collect `states`, checking that they agree in representation and dimension.
    pub fn new(states: Vec<GaussianState<T>>) -> Result<Self, EstimateError> {
        if let Some(first) = states.first() {
            let (repr, n) = (first.representation(), first.dim());
            for state in &states {
                state.validate()?;
                if state.representation() != repr {
                    return Err(ShapeMismatch::Representation {
                        expected: repr,
                        got: state.representation(),
                    }
                    .into());
                }
                check_shape("trajectory state", (n, 1), (state.dim(), 1))?;
            }
        }
        Ok(Self { states })
    }

    /// Representation of the states, `None` if empty.
    pub fn representation(&self) -> Option<Representation> {
        self.states.first().map(GaussianState::representation)
    }

    /// Copy of every mean, in order.
    pub fn means(&self) -> Vec<DynVector<T>> {
        self.states.iter().map(|s| s.mean().clone()).collect()
    }
}

impl<T> Trajectory<T> {
    /// States pushed by the filter are homogeneous by construction.
    pub(crate) fn from_states(states: Vec<GaussianState<T>>) -> Self {
        Self { states }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn get(&self, t: usize) -> Option<&GaussianState<T>> {
        self.states.get(t)
    }

    #[inline]
    pub fn first(&self) -> Option<&GaussianState<T>> {
        self.states.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&GaussianState<T>> {
        self.states.last()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, GaussianState<T>> {
        self.states.iter()
    }

    pub fn into_states(self) -> Vec<GaussianState<T>> {
        self.states
    }
}

impl<T> Index<usize> for Trajectory<T> {
    type Output = GaussianState<T>;

    #[inline]
    fn index(&self, t: usize) -> &GaussianState<T> {
        &self.states[t]
    }
}

impl<'a, T> IntoIterator for &'a Trajectory<T> {
    type Item = &'a GaussianState<T>;
    type IntoIter = core::slice::Iter<'a, GaussianState<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}
