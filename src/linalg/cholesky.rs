use alloc::vec;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

// ---------------------------------------------------------------------------
// Free functions over MatrixMut
// ---------------------------------------------------------------------------

/// Subtract the contributions of columns `0..j` from column `j` (rows `j..n`).
#[inline]
fn eliminate_column<T: FloatScalar>(a: &mut impl MatrixMut<T>, j: usize) {
    let n = a.nrows();
    for k in 0..j {
        let ljk = *a.get(j, k);
        if ljk == T::zero() {
            continue;
        }
        for i in j..n {
            let v = *a.get(i, j) - *a.get(i, k) * ljk;
            *a.get_mut(i, j) = v;
        }
    }
}

/// Cholesky decomposition in place: `A = L·Lᵀ`.
///
/// Only the lower triangle of `a` is read. On return the lower triangle
/// (including the diagonal) holds `L`; the upper triangle is untouched.
///
/// Returns `NotPositiveDefinite` if a pivot is not strictly positive.
pub fn cholesky_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Cholesky decomposition requires a square matrix");

    for j in 0..n {
        eliminate_column(a, j);

        let diag = *a.get(j, j);
        if !(diag > T::zero()) {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = diag.sqrt();
        *a.get_mut(j, j) = ljj;

        let inv_ljj = T::one() / ljj;
        for x in a.col_as_mut_slice(j, j + 1).iter_mut() {
            *x = *x * inv_ljj;
        }
    }

    Ok(())
}

/// Cholesky factorization of a positive *semi*-definite matrix, in place.
///
/// Identical to [`cholesky_in_place`] except that a non-positive pivot
/// marks a rank-deficient direction: the whole column of `L` is set to
/// zero and the factorization continues. `L·Lᵀ` then reproduces the
/// input on its range. A NaN pivot is still `NotPositiveDefinite`.
pub fn cholesky_semidefinite_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Cholesky decomposition requires a square matrix");

    for j in 0..n {
        eliminate_column(a, j);

        let diag = *a.get(j, j);
        if diag.is_nan() {
            return Err(LinalgError::NotPositiveDefinite);
        }
        if diag <= T::zero() {
            for x in a.col_as_mut_slice(j, j).iter_mut() {
                *x = T::zero();
            }
            continue;
        }
        let ljj = diag.sqrt();
        *a.get_mut(j, j) = ljj;

        let inv_ljj = T::one() / ljj;
        for x in a.col_as_mut_slice(j, j + 1).iter_mut() {
            *x = *x * inv_ljj;
        }
    }

    Ok(())
}

/// Solve `L·x = b` by forward substitution, where `L` is lower triangular.
#[inline]
pub fn forward_substitute<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - *l.get(i, j) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve `Lᵀ·x = b` by back substitution, where `L` is lower triangular.
#[inline]
pub fn back_substitute_lt<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum = sum - *l.get(j, i) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve `L·x = b` for a lower-triangular `L`.
///
/// Returns `Singular` if a diagonal entry is exactly zero.
///
/// ```
/// use gaussfilt::{DynMatrix, DynVector};
/// use gaussfilt::linalg::solve_lower_triangular;
///
/// let l = DynMatrix::from_rows(2, 2, &[2.0_f64, 0.0, 1.0, 4.0]);
/// let x = solve_lower_triangular(&l, &DynVector::from_slice(&[2.0, 9.0])).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_lower_triangular<T: FloatScalar>(
    l: &DynMatrix<T>,
    b: &DynVector<T>,
) -> Result<DynVector<T>, LinalgError> {
    let n = l.nrows();
    assert!(l.is_square(), "triangular solve requires a square matrix");
    assert_eq!(b.len(), n, "right-hand side length mismatch");
    if (0..n).any(|i| l[(i, i)] == T::zero()) {
        return Err(LinalgError::Singular);
    }
    let mut x = DynVector::zeros(n, T::zero());
    forward_substitute(l, b.as_slice(), x.as_mut_slice());
    Ok(x)
}

/// Solve `L·x = b` for a lower-triangular `L` that may be rank deficient.
///
/// A pivot with `|lᵢᵢ| ≤ sqrt(ε)·max|L|` marks a direction `L` does not
/// span: `xᵢ` is set to zero, and row `i` must already be satisfied by the
/// components solved so far. Returns `Singular` if it is not, i.e. if `b`
/// is not (numerically) in the range of `L`.
///
/// ```
/// use gaussfilt::{DynMatrix, DynVector};
/// use gaussfilt::linalg::solve_lower_triangular_semidefinite;
///
/// // Second row repeats the first, scaled.
/// let l = DynMatrix::from_rows(2, 2, &[1.0_f64, 0.0, 2.0, 0.0]);
/// let x = solve_lower_triangular_semidefinite(&l, &DynVector::from_slice(&[3.0, 6.0])).unwrap();
/// assert_eq!(x.as_slice(), &[3.0, 0.0]);
///
/// assert!(solve_lower_triangular_semidefinite(&l, &DynVector::from_slice(&[3.0, 5.0])).is_err());
/// ```
pub fn solve_lower_triangular_semidefinite<T: FloatScalar>(
    l: &DynMatrix<T>,
    b: &DynVector<T>,
) -> Result<DynVector<T>, LinalgError> {
    let n = l.nrows();
    assert!(l.is_square(), "triangular solve requires a square matrix");
    assert_eq!(b.len(), n, "right-hand side length mismatch");

    let sqrt_eps = T::epsilon().sqrt();
    let l_max = l.max_abs();
    let pivot_tol = sqrt_eps * l_max;

    let mut x = DynVector::zeros(n, T::zero());
    for i in 0..n {
        let mut residual = b[i];
        let mut scale = b[i].abs();
        for j in 0..i {
            let t = l[(i, j)] * x[j];
            residual = residual - t;
            scale = scale + t.abs();
        }

        let lii = l[(i, i)];
        if lii.abs() > pivot_tol {
            x[i] = residual / lii;
        } else if !(residual.abs() <= sqrt_eps * scale.max(l_max)) {
            return Err(LinalgError::Singular);
        }
    }
    Ok(x)
}

// ---------------------------------------------------------------------------
// CholeskyDecomposition
// ---------------------------------------------------------------------------

/// Cholesky decomposition of a symmetric positive-definite matrix.
///
/// # Example
///
/// ```
/// use gaussfilt::{DynMatrix, DynVector};
/// use gaussfilt::linalg::CholeskyDecomposition;
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = CholeskyDecomposition::new(&a).unwrap();
///
/// let x = chol.solve(&DynVector::from_slice(&[8.0, 7.0]));
/// let ax = &a * &x;
/// assert!((ax[0] - 8.0).abs() < 1e-12);
/// assert!((ax[1] - 7.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    /// Lower triangle holds L; upper triangle holds leftovers of the input.
    l: DynMatrix<T>,
}

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Decompose a symmetric positive-definite matrix.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        let mut l = a.clone();
        cholesky_in_place(&mut l)?;
        Ok(Self { l })
    }

    /// Decompose a symmetric positive semi-definite matrix, zeroing the
    /// columns of rank-deficient directions.
    pub fn new_semidefinite(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        let mut l = a.clone();
        cholesky_semidefinite_in_place(&mut l)?;
        Ok(Self { l })
    }

    /// The lower-triangular factor with zeros above the diagonal.
    pub fn l_full(&self) -> DynMatrix<T> {
        self.l.lower_triangle()
    }

    /// Consume the decomposition, returning the full lower-triangular factor.
    pub fn into_l(self) -> DynMatrix<T> {
        self.l.lower_triangle()
    }

    /// Solve `A·x = b`.
    pub fn solve(&self, b: &DynVector<T>) -> DynVector<T> {
        let n = self.l.nrows();
        assert_eq!(b.len(), n, "right-hand side length mismatch");
        let mut y = vec![T::zero(); n];
        let mut x = DynVector::zeros(n, T::zero());
        forward_substitute(&self.l, b.as_slice(), &mut y);
        back_substitute_lt(&self.l, &y, x.as_mut_slice());
        x
    }

    /// Solve `A·X = B` column by column.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> DynMatrix<T> {
        let n = self.l.nrows();
        assert_eq!(b.nrows(), n, "right-hand side row mismatch");
        let mut x = DynMatrix::zeros(n, b.ncols(), T::zero());
        let mut y = vec![T::zero(); n];
        for j in 0..b.ncols() {
            forward_substitute(&self.l, b.col_as_slice(j, 0), &mut y);
            back_substitute_lt(&self.l, &y, x.col_as_mut_slice(j, 0));
        }
        x
    }
}
