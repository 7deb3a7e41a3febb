use crate::traits::Scalar;

use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    /// Extract a sub-matrix of size `rows x cols` starting at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    ///
    /// ```
    /// use gaussfilt::DynMatrix;
    /// let m = DynMatrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let b = m.block(1, 1, 2, 2);
    /// assert_eq!(b[(0, 0)], 4.0);
    /// assert_eq!(b[(1, 1)], 8.0);
    /// ```
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Self {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.nrows, self.ncols,
        );
        DynMatrix::from_fn(rows, cols, |r, c| self[(i + r, j + c)])
    }

    /// Write a sub-matrix into self starting at position `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn set_block(&mut self, i: usize, j: usize, src: &DynMatrix<T>) {
        assert!(
            i + src.nrows <= self.nrows && j + src.ncols <= self.ncols,
            "set_block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, src.nrows, src.ncols, self.nrows, self.ncols,
        );
        for c in 0..src.ncols {
            for r in 0..src.nrows {
                self[(i + r, j + c)] = src[(r, c)];
            }
        }
    }

    /// Concatenate matrices side by side: `[a, b, ...]`.
    ///
    /// All parts must have the same number of rows.
    ///
    /// ```
    /// use gaussfilt::DynMatrix;
    /// let a = DynMatrix::eye(2, 0.0_f64);
    /// let b = DynMatrix::from_rows(2, 1, &[5.0, 6.0]);
    /// let ab = DynMatrix::hstack(&[&a, &b]);
    /// assert_eq!(ab.ncols(), 3);
    /// assert_eq!(ab[(1, 2)], 6.0);
    /// ```
    pub fn hstack(parts: &[&DynMatrix<T>]) -> Self {
        let nrows = parts.first().map_or(0, |p| p.nrows);
        let mut data = alloc::vec::Vec::with_capacity(nrows * parts.iter().map(|p| p.ncols).sum::<usize>());
        let mut ncols = 0;
        for p in parts {
            assert_eq!(
                p.nrows, nrows,
                "hstack row mismatch: {} vs {}",
                p.nrows, nrows,
            );
            // Column-major storage makes horizontal concatenation a plain append.
            data.extend_from_slice(&p.data);
            ncols += p.ncols;
        }
        Self { data, nrows, ncols }
    }

    /// Stack matrices vertically: `[a; b; ...]`.
    ///
    /// All parts must have the same number of columns.
    pub fn vstack(parts: &[&DynMatrix<T>]) -> Self {
        let ncols = parts.first().map_or(0, |p| p.ncols);
        let nrows = parts.iter().map(|p| p.nrows).sum();
        let mut out = Self::zeros(nrows, ncols, T::zero());
        let mut row = 0;
        for p in parts {
            assert_eq!(
                p.ncols, ncols,
                "vstack column mismatch: {} vs {}",
                p.ncols, ncols,
            );
            out.set_block(row, 0, p);
            row += p.nrows;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_roundtrip() {
        let m = DynMatrix::from_fn(4, 5, |i, j| (10 * i + j) as f64);
        let b = m.block(1, 2, 2, 3);
        assert_eq!(b[(0, 0)], 12.0);
        assert_eq!(b[(1, 2)], 24.0);

        let mut z = DynMatrix::zeros(4, 5, 0.0_f64);
        z.set_block(1, 2, &b);
        assert_eq!(z[(2, 4)], 24.0);
        assert_eq!(z[(0, 0)], 0.0);
    }

    #[test]
    fn hstack_vstack() {
        let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        let b = DynMatrix::from_rows(2, 1, &[5.0, 6.0]);
        let h = DynMatrix::hstack(&[&a, &b]);
        assert_eq!(h, DynMatrix::from_rows(2, 3, &[1.0, 2.0, 5.0, 3.0, 4.0, 6.0]));

        let c = DynMatrix::from_rows(1, 2, &[7.0, 8.0]);
        let v = DynMatrix::vstack(&[&a, &c]);
        assert_eq!(v, DynMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 7.0, 8.0]));
    }

    #[test]
    #[should_panic]
    fn hstack_row_mismatch() {
        let a = DynMatrix::zeros(2, 2, 0.0_f64);
        let b = DynMatrix::zeros(3, 1, 0.0_f64);
        let _ = DynMatrix::hstack(&[&a, &b]);
    }
}
