use alloc::vec;
use core::ops::{Add, Mul, Neg, Sub};

use crate::traits::Scalar;

use super::{DynMatrix, DynVector};

// ── Kernels ─────────────────────────────────────────────────────────

fn zip_with<T: Scalar>(
    a: &DynMatrix<T>,
    b: &DynMatrix<T>,
    op: &str,
    f: impl Fn(T, T) -> T,
) -> DynMatrix<T> {
    assert_eq!(
        (a.nrows, a.ncols),
        (b.nrows, b.ncols),
        "dimension mismatch: {}x{} {} {}x{}",
        a.nrows, a.ncols, op, b.nrows, b.ncols,
    );
    DynMatrix {
        data: a.data.iter().zip(b.data.iter()).map(|(&x, &y)| f(x, y)).collect(),
        nrows: a.nrows,
        ncols: a.ncols,
    }
}

fn matadd<T: Scalar>(a: &DynMatrix<T>, b: &DynMatrix<T>) -> DynMatrix<T> {
    zip_with(a, b, "+", |x, y| x + y)
}

fn matsub<T: Scalar>(a: &DynMatrix<T>, b: &DynMatrix<T>) -> DynMatrix<T> {
    zip_with(a, b, "-", |x, y| x - y)
}

fn matmul<T: Scalar>(a: &DynMatrix<T>, b: &DynMatrix<T>) -> DynMatrix<T> {
    assert_eq!(
        a.ncols, b.nrows,
        "dimension mismatch: {}x{} * {}x{}",
        a.nrows, a.ncols, b.nrows, b.ncols,
    );
    let (m, n, p) = (a.nrows, a.ncols, b.ncols);
    let mut data = vec![T::zero(); m * p];
    // Column-major: out[:, j] += a[:, k] * b[k, j]
    for j in 0..p {
        let out = &mut data[j * m..(j + 1) * m];
        for k in 0..n {
            let bkj = b.data[j * n + k];
            if bkj == T::zero() {
                continue;
            }
            let a_col = &a.data[k * m..(k + 1) * m];
            for (o, &aik) in out.iter_mut().zip(a_col.iter()) {
                *o = *o + aik * bkj;
            }
        }
    }
    DynMatrix { data, nrows: m, ncols: p }
}

fn matvec<T: Scalar>(a: &DynMatrix<T>, v: &DynVector<T>) -> DynVector<T> {
    assert_eq!(
        a.ncols,
        v.len(),
        "dimension mismatch: {}x{} * {}-vector",
        a.nrows, a.ncols, v.len(),
    );
    let m = a.nrows;
    let mut out = vec![T::zero(); m];
    for (k, &vk) in v.data.iter().enumerate() {
        let a_col = &a.data[k * m..(k + 1) * m];
        for (o, &aik) in out.iter_mut().zip(a_col.iter()) {
            *o = *o + aik * vk;
        }
    }
    DynVector { data: out }
}

// ── Matrix ⊕ Matrix, for every owned/borrowed combination ──────────

macro_rules! impl_matrix_binop {
    ($trait:ident, $method:ident, $kernel:ident) => {
        impl<T: Scalar> $trait<&DynMatrix<T>> for &DynMatrix<T> {
            type Output = DynMatrix<T>;
            fn $method(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
                $kernel(self, rhs)
            }
        }

        impl<T: Scalar> $trait<DynMatrix<T>> for &DynMatrix<T> {
            type Output = DynMatrix<T>;
            fn $method(self, rhs: DynMatrix<T>) -> DynMatrix<T> {
                $kernel(self, &rhs)
            }
        }

        impl<T: Scalar> $trait<&DynMatrix<T>> for DynMatrix<T> {
            type Output = DynMatrix<T>;
            fn $method(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
                $kernel(&self, rhs)
            }
        }

        impl<T: Scalar> $trait<DynMatrix<T>> for DynMatrix<T> {
            type Output = DynMatrix<T>;
            fn $method(self, rhs: DynMatrix<T>) -> DynMatrix<T> {
                $kernel(&self, &rhs)
            }
        }
    };
}

impl_matrix_binop!(Add, add, matadd);
impl_matrix_binop!(Sub, sub, matsub);
impl_matrix_binop!(Mul, mul, matmul);

// ── Matrix * Vector ─────────────────────────────────────────────────

impl<T: Scalar> Mul<&DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;
    fn mul(self, rhs: &DynVector<T>) -> DynVector<T> {
        matvec(self, rhs)
    }
}

impl<T: Scalar> Mul<DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;
    fn mul(self, rhs: DynVector<T>) -> DynVector<T> {
        matvec(self, &rhs)
    }
}

impl<T: Scalar> Mul<&DynVector<T>> for DynMatrix<T> {
    type Output = DynVector<T>;
    fn mul(self, rhs: &DynVector<T>) -> DynVector<T> {
        matvec(&self, rhs)
    }
}

// ── Scalar multiplication and negation ──────────────────────────────

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn mul(self, rhs: T) -> DynMatrix<T> {
        DynMatrix {
            data: self.data.iter().map(|&x| x * rhs).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> Mul<T> for DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn mul(mut self, rhs: T) -> DynMatrix<T> {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
        self
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn neg(mut self) -> DynMatrix<T> {
        for x in self.data.iter_mut() {
            *x = -*x;
        }
        self
    }
}

// ── Vector arithmetic ───────────────────────────────────────────────

fn zip_vec<T: Scalar>(
    a: &DynVector<T>,
    b: &DynVector<T>,
    op: &str,
    f: impl Fn(T, T) -> T,
) -> DynVector<T> {
    assert_eq!(
        a.len(),
        b.len(),
        "length mismatch: {} {} {}",
        a.len(),
        op,
        b.len(),
    );
    DynVector {
        data: a.data.iter().zip(b.data.iter()).map(|(&x, &y)| f(x, y)).collect(),
    }
}

macro_rules! impl_vector_binop {
    ($trait:ident, $method:ident, $sym:expr, $f:expr) => {
        impl<T: Scalar> $trait<&DynVector<T>> for &DynVector<T> {
            type Output = DynVector<T>;
            fn $method(self, rhs: &DynVector<T>) -> DynVector<T> {
                zip_vec(self, rhs, $sym, $f)
            }
        }

        impl<T: Scalar> $trait<DynVector<T>> for &DynVector<T> {
            type Output = DynVector<T>;
            fn $method(self, rhs: DynVector<T>) -> DynVector<T> {
                zip_vec(self, &rhs, $sym, $f)
            }
        }

        impl<T: Scalar> $trait<&DynVector<T>> for DynVector<T> {
            type Output = DynVector<T>;
            fn $method(self, rhs: &DynVector<T>) -> DynVector<T> {
                zip_vec(&self, rhs, $sym, $f)
            }
        }

        impl<T: Scalar> $trait<DynVector<T>> for DynVector<T> {
            type Output = DynVector<T>;
            fn $method(self, rhs: DynVector<T>) -> DynVector<T> {
                zip_vec(&self, &rhs, $sym, $f)
            }
        }
    };
}

impl_vector_binop!(Add, add, "+", |x, y| x + y);
impl_vector_binop!(Sub, sub, "-", |x, y| x - y);

impl<T: Scalar> Mul<T> for &DynVector<T> {
    type Output = DynVector<T>;
    fn mul(self, rhs: T) -> DynVector<T> {
        DynVector {
            data: self.data.iter().map(|&x| x * rhs).collect(),
        }
    }
}

impl<T: Scalar> Mul<T> for DynVector<T> {
    type Output = DynVector<T>;
    fn mul(mut self, rhs: T) -> DynVector<T> {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
        self
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for DynVector<T> {
    type Output = DynVector<T>;
    fn neg(mut self) -> DynVector<T> {
        for x in self.data.iter_mut() {
            *x = -*x;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matmul_rectangular() {
        let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DynMatrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!(c, DynMatrix::from_rows(2, 2, &[58.0, 64.0, 139.0, 154.0]));
    }

    #[test]
    fn matvec_matches_matmul() {
        let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let v = DynVector::from_slice(&[1.0, -1.0, 2.0]);
        let av = &a * &v;
        let am = &a * DynMatrix::from(v.clone());
        assert_eq!(av.as_slice(), am.as_slice());
        assert_eq!(av.as_slice(), &[5.0, 11.0]);
    }

    #[test]
    fn add_sub_scale() {
        let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        let b = DynMatrix::eye(2, 0.0_f64);
        let c = &a + &b;
        assert_eq!(c[(0, 0)], 2.0);
        let d = c - &b;
        assert_eq!(d, a);
        let e = &a * 2.0;
        assert_eq!(e[(1, 1)], 8.0);
        assert_eq!((-e)[(1, 1)], -8.0);
    }

    #[test]
    #[should_panic]
    fn add_dimension_mismatch() {
        let a = DynMatrix::zeros(2, 2, 0.0_f64);
        let b = DynMatrix::zeros(2, 3, 0.0_f64);
        let _ = a + b;
    }

    #[test]
    fn vector_ops() {
        let a = DynVector::from_slice(&[1.0_f64, 2.0]);
        let b = DynVector::from_slice(&[0.5, 0.5]);
        assert_eq!((&a + &b).as_slice(), &[1.5, 2.5]);
        assert_eq!((&a - &b).as_slice(), &[0.5, 1.5]);
        assert_eq!((a * 2.0).as_slice(), &[2.0, 4.0]);
    }
}
