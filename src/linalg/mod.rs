//! Matrix factorizations behind the filters.
//!
//! Free functions operate on `&mut impl MatrixMut<T>` in place; the
//! allocating wrappers (`tria`, `cholesky_rank_one_update`,
//! `CholeskyDecomposition`) take and return [`DynMatrix`](crate::DynMatrix).
//!
//! - [`tria`] — lower-triangular `L` with `L·Lᵀ = M·Mᵀ` via Householder QR.
//! - [`cholesky_rank_one_update`] / [`cholesky_update_many`] — `O(n²)`
//!   rank-one corrections of a Cholesky factor.
//! - [`CholeskyDecomposition`] — SPD solves, and the semidefinite variant
//!   used to draw sigma points from a possibly singular covariance.

pub(crate) mod cholesky;
pub(crate) mod cholupdate;
pub(crate) mod qr;

#[cfg(test)]
mod tests;

pub use cholesky::{
    back_substitute_lt, cholesky_in_place, cholesky_semidefinite_in_place, forward_substitute,
    solve_lower_triangular, solve_lower_triangular_semidefinite, CholeskyDecomposition,
};
pub use cholupdate::{cholesky_rank_one_update, cholesky_update_many, cholupdate_in_place};
pub use qr::{qr_r_in_place, tria};

/// Errors from linear algebra operations.
///
/// ```
/// use gaussfilt::DynMatrix;
/// use gaussfilt::linalg::{CholeskyDecomposition, LinalgError};
///
/// let not_pd = DynMatrix::from_rows(2, 2, &[1.0_f64, 5.0, 5.0, 1.0]);
/// assert_eq!(
///     CholeskyDecomposition::new(&not_pd).unwrap_err(),
///     LinalgError::NotPositiveDefinite,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinalgError {
    /// Matrix is singular (a zero pivot in a triangular solve).
    Singular,
    /// Matrix is not positive definite (Cholesky or rank-one update failed).
    NotPositiveDefinite,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::NotPositiveDefinite => write!(f, "matrix is not positive definite"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
