use alloc::boxed::Box;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::traits::FloatScalar;

use super::{fd_jacobian, GaussianState};

/// Boxed analytic Jacobian `x ↦ ∂f/∂x`.
pub type Jacobian<T> = Box<dyn Fn(&DynVector<T>) -> DynMatrix<T> + Send + Sync>;

/// A model `x ↦ f(x) + ε` with additive Gaussian noise `ε`.
///
/// The noise mean acts as a constant offset and its covariance (or
/// factor) is the process or observation noise. The noise may be given in
/// either representation; it is converted to the representation of the
/// belief being linearized about.
///
/// ```
/// use gaussfilt::estimate::{FunctionalModel, GaussianState};
/// use gaussfilt::{DynMatrix, DynVector};
///
/// let noise = GaussianState::standard(DynVector::zeros(2, 0.0_f64), DynMatrix::eye(2, 0.0)).unwrap();
/// let rotate = FunctionalModel::new(
///     |x: &DynVector<f64>| DynVector::from_slice(&[-x[1], x[0]]),
///     noise,
/// )
/// .with_jacobian(|_| DynMatrix::from_rows(2, 2, &[0.0, -1.0, 1.0, 0.0]));
///
/// let y = rotate.evaluate(&DynVector::from_slice(&[1.0, 0.0]));
/// assert_eq!(y.as_slice(), &[0.0, 1.0]);
/// ```
pub struct FunctionalModel<T, F> {
    function: F,
    jacobian: Option<Jacobian<T>>,
    noise: GaussianState<T>,
}

impl<T, F> FunctionalModel<T, F>
where
    T: FloatScalar,
    F: Fn(&DynVector<T>) -> DynVector<T>,
{
    pub fn new(function: F, noise: GaussianState<T>) -> Self {
        Self {
            function,
            jacobian: None,
            noise,
        }
    }

    /// Attach an analytic Jacobian, used by [`Extended`](super::Extended)
    /// instead of forward differences.
    pub fn with_jacobian(
        mut self,
        jacobian: impl Fn(&DynVector<T>) -> DynMatrix<T> + Send + Sync + 'static,
    ) -> Self {
        self.jacobian = Some(Box::new(jacobian));
        self
    }

    /// `f(x)`, without noise.
    #[inline]
    pub fn evaluate(&self, x: &DynVector<T>) -> DynVector<T> {
        (self.function)(x)
    }

    /// Jacobian of `f` at `x`: the analytic one if attached, else forward differences.
    pub fn jacobian(&self, x: &DynVector<T>) -> DynMatrix<T> {
        match &self.jacobian {
            Some(jac) => jac(x),
            None => fd_jacobian(&self.function, x),
        }
    }

    #[inline]
    pub fn has_jacobian(&self) -> bool {
        self.jacobian.is_some()
    }

    #[inline]
    pub fn noise(&self) -> &GaussianState<T> {
        &self.noise
    }

    /// Output dimension, as given by the noise.
    #[inline]
    pub fn output_dim(&self) -> usize {
        self.noise.dim()
    }
}

impl<T: core::fmt::Debug, F> core::fmt::Debug for FunctionalModel<T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunctionalModel")
            .field("jacobian", &self.jacobian.is_some())
            .field("noise", &self.noise)
            .finish_non_exhaustive()
    }
}
