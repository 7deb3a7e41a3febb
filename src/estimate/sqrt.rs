//! Kalman equations on mean and Cholesky factor.
//!
//! Factors are combined with [`tria`], so no covariance is ever squared
//! and no innovation covariance is ever inverted.

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::{solve_lower_triangular_semidefinite, tria};
use crate::traits::FloatScalar;

use super::EstimateError;

/// `(A·m + b, tria([A·L, L_Q]))`.
pub(crate) fn predict<T: FloatScalar>(
    a: &DynMatrix<T>,
    lq: &DynMatrix<T>,
    b: &DynVector<T>,
    mean: &DynVector<T>,
    chol: &DynMatrix<T>,
) -> (DynVector<T>, DynMatrix<T>) {
    let mean = a * mean + b;
    let chol = tria(&DynMatrix::hstack(&[&(a * chol), lq]));
    (mean, chol)
}

/// Posterior after observing `y = H·x + c + ε`, `ε ~ N(0, L_R·L_Rᵀ)`.
///
/// Triangularizes
///
/// ```text
/// ⎡ H·L  L_R ⎤      ⎡ Lₛ  0  ⎤
/// ⎣  L    0  ⎦  →   ⎣ K̃   L' ⎦
/// ```
///
/// where `Lₛ` factors the innovation covariance, `K̃ = G·Lₛ` and `L'` is
/// the posterior factor; the mean update is `m + K̃·Lₛ⁺·v`. Zero
/// observation noise is fine, including redundant observations: a
/// vanishing pivot of `Lₛ` comes with a zero column of `K̃`, and that
/// whitened component is dropped. `SingularSystem` only if the innovation
/// has a component outside the range of `Lₛ`.
pub(crate) fn update<T: FloatScalar>(
    h: &DynMatrix<T>,
    lr: &DynMatrix<T>,
    c: &DynVector<T>,
    mean: &DynVector<T>,
    chol: &DynMatrix<T>,
    y: &DynVector<T>,
) -> Result<(DynVector<T>, DynMatrix<T>), EstimateError> {
    let nx = mean.len();
    let ny = y.len();

    let mut block = DynMatrix::zeros(ny + nx, nx + ny, T::zero());
    block.set_block(0, 0, &(h * chol));
    block.set_block(0, nx, lr);
    block.set_block(ny, 0, chol);
    let fused = tria(&block);

    let innovation_factor = fused.block(0, 0, ny, ny);
    let scaled_gain = fused.block(ny, 0, nx, ny);
    let chol = fused.block(ny, ny, nx, nx);

    let innovation = y - (h * mean + c);
    let whitened = solve_lower_triangular_semidefinite(&innovation_factor, &innovation)?;
    let mean = mean + &scaled_gain * &whitened;
    Ok((mean, chol))
}
