use crate::dynmatrix::DynVector;
use crate::traits::FloatScalar;

use super::{check_shape, sqrt, standard, AffineModel, EstimateError, GaussianState, Noise, ShapeMismatch};

fn check_affine<T: FloatScalar>(
    model: &AffineModel<T>,
    state: &GaussianState<T>,
) -> Result<(), EstimateError> {
    state.validate()?;
    let (m, n) = (model.output_dim(), state.dim());
    check_shape("affine matrix", (m, n), model.a.shape())?;
    check_shape("affine offset", (m, 1), (model.offset.len(), 1))?;
    check_shape("affine noise", (m, m), model.noise.matrix().shape())
}

fn representation_mismatch<T: FloatScalar>(
    model: &AffineModel<T>,
    state: &GaussianState<T>,
) -> EstimateError {
    ShapeMismatch::Representation {
        expected: state.representation(),
        got: model.representation(),
    }
    .into()
}

/// One-step-ahead belief through `x ↦ A·x + b + ε`.
///
/// The noise of `transition` must be in the representation of `prior`.
///
/// ```
/// use gaussfilt::estimate::{predict, AffineModel, GaussianState, Noise};
/// use gaussfilt::{DynMatrix, DynVector};
///
/// let prior = GaussianState::sqrt(DynVector::from_slice(&[1.0_f64]), DynMatrix::eye(1, 0.0)).unwrap();
/// let model = AffineModel::new(
///     DynMatrix::from_rows(1, 1, &[3.0]),
///     Noise::Factor(DynMatrix::from_rows(1, 1, &[4.0])),
///     DynVector::from_slice(&[0.5]),
/// )
/// .unwrap();
///
/// let next = predict(&model, &prior).unwrap();
/// assert_eq!(next.mean()[0], 3.5);
/// assert!((next.covariance()[(0, 0)] - 25.0).abs() < 1e-12); // 3² + 4²
/// ```
pub fn predict<T: FloatScalar>(
    transition: &AffineModel<T>,
    prior: &GaussianState<T>,
) -> Result<GaussianState<T>, EstimateError> {
    check_affine(transition, prior)?;
    check_shape("affine matrix", (prior.dim(), prior.dim()), transition.a.shape())?;

    let AffineModel { a, noise, offset } = transition;
    let state = match (prior, noise) {
        (GaussianState::Standard { mean, cov }, Noise::Covariance(q)) => {
            let (mean, cov) = standard::predict(a, q, offset, mean, cov);
            GaussianState::Standard { mean, cov }
        }
        (GaussianState::Sqrt { mean, chol }, Noise::Factor(lq)) => {
            let (mean, chol) = sqrt::predict(a, lq, offset, mean, chol);
            GaussianState::Sqrt { mean, chol }
        }
        _ => return Err(representation_mismatch(transition, prior)),
    };
    Ok(state)
}

/// Posterior after observing `y` through `x ↦ H·x + c + ε`.
///
/// The noise of `observation` must be in the representation of `predicted`.
/// In standard form the innovation covariance has to be positive definite
/// (`SingularSystem` otherwise); the square-root form also handles zero
/// observation noise.
pub fn update<T: FloatScalar>(
    observation: &AffineModel<T>,
    predicted: &GaussianState<T>,
    y: &DynVector<T>,
) -> Result<GaussianState<T>, EstimateError> {
    check_affine(observation, predicted)?;
    check_shape("observation", (observation.output_dim(), 1), (y.len(), 1))?;

    let AffineModel { a: h, noise, offset } = observation;
    let state = match (predicted, noise) {
        (GaussianState::Standard { mean, cov }, Noise::Covariance(r)) => {
            let (mean, cov) = standard::update(h, r, offset, mean, cov, y)?;
            GaussianState::Standard { mean, cov }
        }
        (GaussianState::Sqrt { mean, chol }, Noise::Factor(lr)) => {
            let (mean, chol) = sqrt::update(h, lr, offset, mean, chol, y)?;
            GaussianState::Sqrt { mean, chol }
        }
        _ => return Err(representation_mismatch(observation, predicted)),
    };
    Ok(state)
}
