use crate::dynmatrix::{DynMatrix, DynVector};
use crate::traits::FloatScalar;

use super::{check_shape, EstimateError, FunctionalModel, GaussianState, Representation};

/// Additive noise of an affine model, in the representation of the belief
/// it will be combined with.
#[derive(Debug, Clone, PartialEq)]
pub enum Noise<T> {
    /// Full covariance `Q`.
    Covariance(DynMatrix<T>),
    /// Factor `L_Q` with `L_Q·L_Qᵀ = Q`.
    Factor(DynMatrix<T>),
}

impl<T> Noise<T> {
    #[inline]
    pub fn representation(&self) -> Representation {
        match self {
            Noise::Covariance(_) => Representation::Standard,
            Noise::Factor(_) => Representation::Sqrt,
        }
    }

    #[inline]
    pub fn matrix(&self) -> &DynMatrix<T> {
        match self {
            Noise::Covariance(m) | Noise::Factor(m) => m,
        }
    }
}

/// `x ↦ A·x + offset + ε`, the local approximation of a [`FunctionalModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct AffineModel<T> {
    pub a: DynMatrix<T>,
    pub noise: Noise<T>,
    pub offset: DynVector<T>,
}

impl<T: FloatScalar> AffineModel<T> {
    /// Checks that `offset` and the (square) noise matrix match the rows of `a`.
    pub fn new(a: DynMatrix<T>, noise: Noise<T>, offset: DynVector<T>) -> Result<Self, EstimateError> {
        let m = a.nrows();
        check_shape("offset", (m, 1), (offset.len(), 1))?;
        check_shape("noise", (m, m), noise.matrix().shape())?;
        Ok(Self { a, noise, offset })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.a.ncols()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.a.nrows()
    }

    #[inline]
    pub fn representation(&self) -> Representation {
        self.noise.representation()
    }
}

/// Strategy for approximating a nonlinear model by an affine one about a
/// reference belief.
///
/// The returned noise must use the reference's representation. The filter
/// only sees the resulting [`AffineModel`], so any strategy can be
/// substituted without touching the recursion.
pub trait Linearization<T: FloatScalar> {
    fn linearize<F>(
        &self,
        model: &FunctionalModel<T, F>,
        reference: &GaussianState<T>,
    ) -> Result<AffineModel<T>, EstimateError>
    where
        F: Fn(&DynVector<T>) -> DynVector<T>;
}

/// The model noise as `(mean, noise)` in representation `repr`.
pub(crate) fn model_noise<T, F>(
    model: &FunctionalModel<T, F>,
    repr: Representation,
) -> Result<(DynVector<T>, Noise<T>), EstimateError>
where
    T: FloatScalar,
    F: Fn(&DynVector<T>) -> DynVector<T>,
{
    let noise = model.noise();
    noise.validate()?;
    let matrix = match repr {
        Representation::Standard => Noise::Covariance(noise.covariance()),
        Representation::Sqrt => Noise::Factor(noise.factor()?),
    };
    Ok((noise.mean().clone(), matrix))
}
