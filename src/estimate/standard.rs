//! Kalman equations on mean and full covariance.

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::CholeskyDecomposition;
use crate::traits::FloatScalar;

use super::EstimateError;

/// `(A·m + b, Q + A·P·Aᵀ)`.
pub(crate) fn predict<T: FloatScalar>(
    a: &DynMatrix<T>,
    q: &DynMatrix<T>,
    b: &DynVector<T>,
    mean: &DynVector<T>,
    cov: &DynMatrix<T>,
) -> (DynVector<T>, DynMatrix<T>) {
    let mean = a * mean + b;
    let cov = q + &(a * cov) * &a.transpose();
    (mean, cov)
}

/// Posterior after observing `y = H·x + c + ε`, `ε ~ N(0, R)`.
///
/// The gain `G = P·Hᵀ·S⁻¹` comes from a Cholesky solve against the
/// innovation covariance `S = R + H·P·Hᵀ`, so `S` must be positive
/// definite: with singular `S` (e.g. `R = 0` and `H·P·Hᵀ` rank deficient)
/// this fails with `SingularSystem`. A pivot `lᵢᵢ² ≤ sqrt(ε)·max|S|` counts
/// as singular, since rounding alone leaves such pivots positive. The
/// square-root update has no such restriction.
pub(crate) fn update<T: FloatScalar>(
    h: &DynMatrix<T>,
    r: &DynMatrix<T>,
    c: &DynVector<T>,
    mean: &DynVector<T>,
    cov: &DynMatrix<T>,
    y: &DynVector<T>,
) -> Result<(DynVector<T>, DynMatrix<T>), EstimateError> {
    let innovation = y - (h * mean + c);
    let s = r + &(h * cov) * &h.transpose();
    let chol = CholeskyDecomposition::new(&s).map_err(|_| EstimateError::SingularSystem)?;
    let l = chol.l_full();
    let tol = T::epsilon().sqrt() * s.max_abs();
    if (0..l.nrows()).any(|i| l[(i, i)] * l[(i, i)] <= tol) {
        return Err(EstimateError::SingularSystem);
    }

    // G = P·(S⁻¹·H)ᵀ, S symmetric
    let gain = cov * &chol.solve_matrix(h).transpose();

    let mean = mean + &gain * &innovation;
    let cov = cov - &(&gain * &s) * &gain.transpose();
    Ok((mean, cov))
}
