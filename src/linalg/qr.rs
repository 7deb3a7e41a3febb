use alloc::vec::Vec;

use crate::dynmatrix::DynMatrix;
use crate::traits::{FloatScalar, MatrixMut};

/// Householder reduction to upper-triangular form, in place.
///
/// On return the upper triangle of `a` (`min(M, N)` rows) holds `R` of
/// `A = Q·R` and everything below the diagonal is zero; `Q` is discarded.
///
/// A column whose sub-diagonal part is already zero is skipped, so
/// rank-deficient input is not an error: the corresponding `R` diagonal
/// entry is simply zero.
pub fn qr_r_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) {
    let m = a.nrows();
    let n = a.ncols();
    let k = m.min(n);
    let mut v: Vec<T> = Vec::with_capacity(m);

    for col in 0..k {
        let mut norm_sq = T::zero();
        for i in col..m {
            let x = *a.get(i, col);
            norm_sq = norm_sq + x * x;
        }
        if norm_sq == T::zero() {
            continue;
        }

        let norm = norm_sq.sqrt();
        let alpha = *a.get(col, col);
        // sigma = sign(alpha)·‖x‖ so that v0 = alpha + sigma avoids cancellation
        let sigma = if alpha < T::zero() { -norm } else { norm };
        let v0 = alpha + sigma;
        let tau = v0 / sigma;

        // v = [1, x[col+1..] / v0]
        v.clear();
        v.push(T::one());
        for i in (col + 1)..m {
            v.push(*a.get(i, col) / v0);
        }

        // A[col.., j] -= tau · v · (vᵀ · A[col.., j])
        for j in (col + 1)..n {
            let mut dot = T::zero();
            for (off, &vi) in v.iter().enumerate() {
                dot = dot + vi * *a.get(col + off, j);
            }
            dot = dot * tau;
            for (off, &vi) in v.iter().enumerate() {
                let x = *a.get(col + off, j) - dot * vi;
                *a.get_mut(col + off, j) = x;
            }
        }

        *a.get_mut(col, col) = -sigma;
        for i in (col + 1)..m {
            *a.get_mut(i, col) = T::zero();
        }
    }
}

/// Triangularize: lower-triangular `L` (`n×n`) with `L·Lᵀ = M·Mᵀ`.
///
/// `M` is `n×m`. The factor is obtained from the Householder QR of `Mᵀ`
/// (`Mᵀ = Q·R` gives `M·Mᵀ = Rᵀ·R`, so `L = Rᵀ`); `M·Mᵀ` is never formed.
/// This is what lets square-root filters fuse several factor
/// contributions, e.g. `[A·L, L_Q]`, into one factor without squaring.
///
/// Columns of `L` are sign-normalized so the diagonal is non-negative.
/// When `m < n`, `Mᵀ` is zero-padded to `n` rows; the identity still holds.
///
/// ```
/// use gaussfilt::DynMatrix;
/// use gaussfilt::linalg::tria;
///
/// let m = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// let l = tria(&m);
/// let lhs = &l * &l.transpose();
/// let rhs = &m * &m.transpose();
/// for i in 0..2 {
///     for j in 0..2 {
///         assert!((lhs[(i, j)] - rhs[(i, j)]).abs() < 1e-10);
///     }
/// }
/// assert_eq!(l[(0, 1)], 0.0);
/// ```
pub fn tria<T: FloatScalar>(m: &DynMatrix<T>) -> DynMatrix<T> {
    let n = m.nrows();
    let rows = m.ncols().max(n);

    let mut a = DynMatrix::zeros(rows, n, T::zero());
    a.set_block(0, 0, &m.transpose());
    qr_r_in_place(&mut a);

    let mut l = DynMatrix::zeros(n, n, T::zero());
    for i in 0..n {
        let flip = a[(i, i)] < T::zero();
        for j in i..n {
            let r = a[(i, j)];
            l[(j, i)] = if flip { -r } else { r };
        }
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn qr_r_matches_known_factor() {
        // Classic example: |R| diagonal is [14, 175, 35].
        let mut a = DynMatrix::from_rows(
            3,
            3,
            &[12.0_f64, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0],
        );
        qr_r_in_place(&mut a);
        assert_near(a[(0, 0)].abs(), 14.0, 1e-10, "r00");
        assert_near(a[(1, 1)].abs(), 175.0, 1e-10, "r11");
        assert_near(a[(2, 2)].abs(), 35.0, 1e-10, "r22");
        assert_eq!(a[(1, 0)], 0.0);
        assert_eq!(a[(2, 1)], 0.0);
    }

    #[test]
    fn tria_zero_column_is_not_an_error() {
        let m = DynMatrix::from_rows(2, 3, &[0.0_f64, 0.0, 0.0, 1.0, 2.0, 2.0]);
        let l = tria(&m);
        assert!(l.is_lower_triangular());
        assert_eq!(l[(0, 0)], 0.0);
        let llt = &l * &l.transpose();
        assert_near(llt[(0, 0)], 0.0, 1e-12, "llt00");
        assert_near(llt[(0, 1)], 0.0, 1e-12, "llt01");
        assert_near(llt[(1, 1)], 9.0, 1e-12, "llt11");
    }

    #[test]
    fn tria_wide_and_narrow() {
        // n = 3 rows, m = 1 column: zero padded
        let m = DynMatrix::from_rows(3, 1, &[1.0_f64, 2.0, 2.0]);
        let l = tria(&m);
        let llt = &l * &l.transpose();
        let mmt = &m * &m.transpose();
        for i in 0..3 {
            for j in 0..3 {
                assert_near(llt[(i, j)], mmt[(i, j)], 1e-12, "LLᵀ");
            }
        }
        assert!(l.is_lower_triangular());
    }

    #[test]
    fn tria_of_cholesky_factor_is_itself() {
        let l0 = DynMatrix::from_rows(2, 2, &[2.0_f64, 0.0, 1.0, 3.0]);
        let l = tria(&l0);
        for i in 0..2 {
            for j in 0..2 {
                assert_near(l[(i, j)], l0[(i, j)], 1e-12, "L");
            }
        }
    }

    #[test]
    fn tria_diagonal_non_negative() {
        let m = DynMatrix::from_rows(2, 2, &[-3.0_f64, 0.0, 1.0, -2.0]);
        let l = tria(&m);
        assert!(l[(0, 0)] >= 0.0);
        assert!(l[(1, 1)] >= 0.0);
    }
}
