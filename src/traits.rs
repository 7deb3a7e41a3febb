use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Real floating-point element type used by every filter and factorization.
///
/// Blanket-implemented for `f32` and `f64`. `Send + Sync` so states and
/// models can cross threads when filtering independent sequences.
pub trait FloatScalar: Scalar + Float + Send + Sync {}

impl<T: Scalar + Float + Send + Sync> FloatScalar for T {}

/// Read-only access to a column-major matrix-like type.
///
/// The linear algebra kernels in [`crate::linalg`] are free functions
/// over this trait rather than methods on a concrete type.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Contiguous view of `col` from `row_start` to the last row.
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (Cholesky, Householder, rank-one updates).
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Mutable contiguous view of `col` from `row_start` to the last row.
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];
}
