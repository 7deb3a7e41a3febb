use alloc::vec::Vec;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::tria;
use crate::traits::FloatScalar;

use super::linearize::model_noise;
use super::{
    check_shape, AffineModel, EstimateError, Extended, FunctionalModel,
    GaussianState, Linearization, Noise,
};

/// Statistical linear regression on the third-degree spherical-radial
/// cubature rule.
///
/// The `2n` points `m ± √n·L·eⱼ` (equal weights `1/(2n)`, `L·Lᵀ = P`) are
/// pushed through the model. `A` is the regression slope `D·L⁻¹` with
/// `Dⱼ = (f(m + √n·Leⱼ) − f(m − √n·Leⱼ)) / (2√n)`, the offset recenters on
/// the propagated mean `f̄`, and the regression residuals
/// `eᵢ = f(xᵢ) − f̄ − A·(xᵢ − m)` add their spread `Ω` to the model noise:
/// `Ω + Q` in standard form, `tria([√w·E, L_Q])` in square-root form.
///
/// No derivatives are needed. Directions in which the reference covariance
/// is singular collapse to a single point and get a zero slope.
///
/// ```
/// use gaussfilt::estimate::{Cubature, FunctionalModel, GaussianState, Linearization, Noise};
/// use gaussfilt::{DynMatrix, DynVector};
///
/// let noise = GaussianState::standard(DynVector::zeros(1, 0.0_f64), DynMatrix::zeros(1, 1, 0.0)).unwrap();
/// let square = FunctionalModel::new(|x: &DynVector<f64>| DynVector::from_slice(&[x[0] * x[0]]), noise);
///
/// // m = 0, P = 1: points ±1 both map to 1, so the slope is 0 and the
/// // offset is the cubature mean E[x²] = 1.
/// let at = GaussianState::standard(DynVector::from_slice(&[0.0]), DynMatrix::eye(1, 0.0)).unwrap();
/// let affine = Cubature.linearize(&square, &at).unwrap();
/// assert_eq!(affine.a[(0, 0)], 0.0);
/// assert_eq!(affine.offset[0], 1.0);
/// assert_eq!(affine.noise, Noise::Covariance(DynMatrix::zeros(1, 1, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cubature;

impl<T: FloatScalar> Linearization<T> for Cubature {
    fn linearize<F>(
        &self,
        model: &FunctionalModel<T, F>,
        reference: &GaussianState<T>,
    ) -> Result<AffineModel<T>, EstimateError>
    where
        F: Fn(&DynVector<T>) -> DynVector<T>,
    {
        let n = reference.dim();
        if n == 0 {
            return Extended.linearize(model, reference);
        }
        let ny = model.output_dim();
        let m = reference.mean();
        let l = reference.factor()?;

        // usize -> float casts only fail for exotic float types; NaN then poisons the result.
        let nf = T::from(n).unwrap_or_else(T::nan);
        let scale = nf.sqrt();
        let w = T::one() / (nf + nf);
        let half_inv_scale = T::one() / (scale + scale);

        // Propagate the points pairwise, accumulating the slope columns D
        // and the weighted mean.
        let mut images: Vec<(DynVector<T>, DynVector<T>)> = Vec::with_capacity(n);
        let mut d = DynMatrix::zeros(ny, n, T::zero());
        let mut f_mean = DynVector::zeros(ny, T::zero());
        for j in 0..n {
            let offset = l.column(j) * scale;
            let f_plus = model.evaluate(&(m + &offset));
            let f_minus = model.evaluate(&(m - &offset));
            check_shape("model output", (ny, 1), (f_plus.len(), 1))?;
            check_shape("model output", (ny, 1), (f_minus.len(), 1))?;

            for i in 0..ny {
                d[(i, j)] = (f_plus[i] - f_minus[i]) * half_inv_scale;
                f_mean[i] = f_mean[i] + (f_plus[i] + f_minus[i]) * w;
            }
            images.push((f_plus, f_minus));
        }

        let a = regression_slope(&d, &l);

        // Residuals of the ± point pair j: (f± − f̄) ∓ √n·A·L·eⱼ.
        let al = &a * &l;
        let mut residuals = DynMatrix::zeros(ny, 2 * n, T::zero());
        for (j, (f_plus, f_minus)) in images.iter().enumerate() {
            for i in 0..ny {
                let fitted = scale * al[(i, j)];
                residuals[(i, 2 * j)] = f_plus[i] - f_mean[i] - fitted;
                residuals[(i, 2 * j + 1)] = f_minus[i] - f_mean[i] + fitted;
            }
        }

        let (noise_mean, base) = model_noise(model, reference.representation())?;
        let noise = match base {
            Noise::Covariance(q) => {
                Noise::Covariance(&(&residuals * &residuals.transpose()) * w + q)
            }
            Noise::Factor(lq) => {
                let weighted = residuals * w.sqrt();
                Noise::Factor(tria(&DynMatrix::hstack(&[&weighted, &lq])))
            }
        };

        let offset = f_mean - &a * m + noise_mean;
        AffineModel::new(a, noise, offset)
    }
}

/// `A` with `A·L = D`, solving `Lᵀ·aᵣ = dᵣ` for each row by back
/// substitution. Zero pivots of `L` give zero entries of `A`.
fn regression_slope<T: FloatScalar>(d: &DynMatrix<T>, l: &DynMatrix<T>) -> DynMatrix<T> {
    let (ny, n) = d.shape();
    let mut a = DynMatrix::zeros(ny, n, T::zero());
    for r in 0..ny {
        for i in (0..n).rev() {
            let lii = l[(i, i)];
            if lii == T::zero() {
                continue;
            }
            let mut sum = d[(r, i)];
            for j in (i + 1)..n {
                sum = sum - l[(j, i)] * a[(r, j)];
            }
            a[(r, i)] = sum / lii;
        }
    }
    a
}
