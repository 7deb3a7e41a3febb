//! Cholesky rank-1 update and downdate.
//!
//! Given lower-triangular `L` where `P = L·Lᵀ`, compute `L'` such that
//! `P' = L'·L'ᵀ = L·Lᵀ + multiplier·v·vᵀ` in `O(n²)` without refactoring.

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixMut};

/// In-place rank-1 update (`sign = +1`) or downdate (`sign = -1`).
///
/// `l` must be lower-triangular on entry (the upper triangle is ignored
/// and left untouched). `w` is used as workspace and is overwritten.
///
/// Update, a Givens rotation per column (works even when `L[j,j] = 0`):
///
///   `r = sqrt(L[j,j]² + w[j]²)`, `c = L[j,j]/r`, `s = w[j]/r`,
///   `L[i,j] = c·L[i,j] + s·w[i]`, `w[i] = c·w[i] - s·L[i,j]_old`
///
/// Downdate, the hyperbolic form of LINPACK `dchdd`:
///
///   `r = sqrt(L[j,j]² - w[j]²)`, `c = r/L[j,j]`, `s = w[j]/L[j,j]`,
///   `L[i,j] = (L[i,j] - s·w[i]) / c`, `w[i] = c·w[i] - s·L[i,j]_new`
///
/// Fails with `NotPositiveDefinite` as soon as a pivot `r²` is not
/// strictly positive; `l` is then partially modified.
pub fn cholupdate_in_place<T: FloatScalar>(
    l: &mut impl MatrixMut<T>,
    w: &mut [T],
    sign: T,
) -> Result<(), LinalgError> {
    let n = l.nrows();
    assert_eq!(n, l.ncols(), "Cholesky update requires a square factor");
    assert_eq!(w.len(), n, "update vector length mismatch");

    let downdate = sign < T::zero();

    for j in 0..n {
        let ljj = *l.get(j, j);
        let wj = w[j];
        let arg = if downdate {
            ljj * ljj - wj * wj
        } else {
            ljj * ljj + wj * wj
        };

        if !(arg > T::zero()) {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let r = arg.sqrt();

        if downdate {
            let c = r / ljj;
            let s = wj / ljj;
            *l.get_mut(j, j) = r;
            for i in (j + 1)..n {
                let lij = (*l.get(i, j) - s * w[i]) / c;
                *l.get_mut(i, j) = lij;
                w[i] = c * w[i] - s * lij;
            }
        } else {
            let c = ljj / r;
            let s = wj / r;
            *l.get_mut(j, j) = r;
            for i in (j + 1)..n {
                let lij = *l.get(i, j);
                *l.get_mut(i, j) = c * lij + s * w[i];
                w[i] = c * w[i] - s * lij;
            }
        }
    }

    Ok(())
}

/// Rank-1 Cholesky update: `L'·L'ᵀ = L·Lᵀ + multiplier·v·vᵀ`.
///
/// A negative `multiplier` is a downdate. Returns `NotPositiveDefinite`
/// if the updated matrix is not positive definite.
///
/// ```
/// use gaussfilt::{DynMatrix, DynVector};
/// use gaussfilt::linalg::cholesky_rank_one_update;
///
/// let l = DynMatrix::eye(2, 0.0_f64);
/// let v = DynVector::from_slice(&[1.0, 1.0]);
/// let l2 = cholesky_rank_one_update(&l, &v, 1.0).unwrap();
/// let p = &l2 * &l2.transpose();
/// assert!((p[(0, 0)] - 2.0).abs() < 1e-12);
/// assert!((p[(0, 1)] - 1.0).abs() < 1e-12);
/// ```
pub fn cholesky_rank_one_update<T: FloatScalar>(
    l: &DynMatrix<T>,
    v: &DynVector<T>,
    multiplier: T,
) -> Result<DynMatrix<T>, LinalgError> {
    let mut out = l.lower_triangle();
    let scale = multiplier.abs().sqrt();
    let mut w: alloc::vec::Vec<T> = v.iter().map(|&x| x * scale).collect();
    cholupdate_in_place(&mut out, &mut w, multiplier.signum())?;
    Ok(out)
}

/// Apply [`cholesky_rank_one_update`] for each row of `vs`, in order.
///
/// The result factors `L·Lᵀ + multiplier·Σₖ vₖ·vₖᵀ`, where `vₖ` is row `k`.
pub fn cholesky_update_many<T: FloatScalar>(
    l: &DynMatrix<T>,
    vs: &DynMatrix<T>,
    multiplier: T,
) -> Result<DynMatrix<T>, LinalgError> {
    assert_eq!(vs.ncols(), l.nrows(), "update vectors must have the factor's dimension");
    let mut out = l.lower_triangle();
    let scale = multiplier.abs().sqrt();
    let sign = multiplier.signum();
    let mut w = alloc::vec![T::zero(); l.nrows()];
    for k in 0..vs.nrows() {
        for (i, wi) in w.iter_mut().enumerate() {
            *wi = vs[(k, i)] * scale;
        }
        cholupdate_in_place(&mut out, &mut w, sign)?;
    }
    Ok(out)
}
