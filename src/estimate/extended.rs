use crate::dynmatrix::DynVector;
use crate::traits::FloatScalar;

use super::linearize::model_noise;
use super::{check_shape, AffineModel, EstimateError, FunctionalModel, GaussianState, Linearization};

/// First-order Taylor linearization at the reference mean.
///
/// `A = ∂f/∂x (m)` and `offset = f(m) − A·m + noise mean`, with the noise
/// passed through unchanged. The reference covariance is ignored. The
/// Jacobian is the model's analytic one if it has one, otherwise a
/// forward-difference approximation.
///
/// ```
/// use gaussfilt::estimate::{Extended, FunctionalModel, GaussianState, Linearization};
/// use gaussfilt::{DynMatrix, DynVector};
///
/// let noise = GaussianState::standard(DynVector::zeros(1, 0.0_f64), DynMatrix::eye(1, 0.0)).unwrap();
/// let square = FunctionalModel::new(|x: &DynVector<f64>| DynVector::from_slice(&[x[0] * x[0]]), noise)
///     .with_jacobian(|x| DynMatrix::from_rows(1, 1, &[2.0 * x[0]]));
///
/// let at = GaussianState::standard(DynVector::from_slice(&[3.0]), DynMatrix::eye(1, 0.0)).unwrap();
/// let affine = Extended.linearize(&square, &at).unwrap();
/// assert_eq!(affine.a[(0, 0)], 6.0);
/// assert_eq!(affine.offset[0], -9.0); // 9 - 6·3
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extended;

impl<T: FloatScalar> Linearization<T> for Extended {
    fn linearize<F>(
        &self,
        model: &FunctionalModel<T, F>,
        reference: &GaussianState<T>,
    ) -> Result<AffineModel<T>, EstimateError>
    where
        F: Fn(&DynVector<T>) -> DynVector<T>,
    {
        let m = reference.mean();
        let ny = model.output_dim();

        let fm = model.evaluate(m);
        check_shape("model output", (ny, 1), (fm.len(), 1))?;
        let a = model.jacobian(m);
        check_shape("model Jacobian", (ny, m.len()), a.shape())?;

        let (noise_mean, noise) = model_noise(model, reference.representation())?;
        let offset = fm - &a * m + noise_mean;
        AffineModel::new(a, noise, offset)
    }
}
