use alloc::vec::Vec;

use log::{debug, trace};

use crate::dynmatrix::DynVector;
use crate::traits::FloatScalar;

use super::{
    predict, update, EstimateError, FilterError, FunctionalModel, GaussianState, Linearization,
    ShapeMismatch, Trajectory,
};

/// Sequential filter: a transition model, an observation model and a
/// linearization strategy.
///
/// Each step linearizes the transition about the previous posterior (or a
/// nominal state), predicts, linearizes the observation about the
/// prediction (or a nominal state) and updates. The representation of the
/// prior decides which set of equations runs; model noise is converted to
/// match.
///
/// # Example
///
/// ```
/// use gaussfilt::estimate::{Cubature, FunctionalModel, GaussianState, SequentialFilter};
/// use gaussfilt::{DynMatrix, DynVector};
///
/// let dt = 0.1;
/// let q = GaussianState::standard(DynVector::zeros(2, 0.0_f64), DynMatrix::eye(2, 0.0) * 1e-3).unwrap();
/// let r = GaussianState::standard(DynVector::zeros(1, 0.0_f64), DynMatrix::eye(1, 0.0) * 0.1).unwrap();
///
/// // Constant velocity, range-like observation of position.
/// let transition = FunctionalModel::new(
///     move |x: &DynVector<f64>| DynVector::from_slice(&[x[0] + dt * x[1], x[1]]),
///     q,
/// );
/// let observation = FunctionalModel::new(
///     |x: &DynVector<f64>| DynVector::from_slice(&[(1.0 + x[0] * x[0]).sqrt()]),
///     r,
/// );
/// let filter = SequentialFilter::new(transition, observation, Cubature);
///
/// let x0 = GaussianState::standard(DynVector::from_slice(&[1.0, 0.5]), DynMatrix::eye(2, 0.0))
///     .unwrap()
///     .to_sqrt()
///     .unwrap();
/// let ys: Vec<_> = (1..=20)
///     .map(|t| DynVector::from_slice(&[(1.0 + (1.0 + 0.05 * t as f64).powi(2)).sqrt()]))
///     .collect();
///
/// let out = filter.run(&ys, &x0, None).unwrap();
/// assert_eq!(out.len(), 21);
/// ```
pub struct SequentialFilter<T, F, G, S> {
    transition: FunctionalModel<T, F>,
    observation: FunctionalModel<T, G>,
    linearization: S,
}

impl<T: core::fmt::Debug, F, G, S: core::fmt::Debug> core::fmt::Debug
    for SequentialFilter<T, F, G, S>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SequentialFilter")
            .field("transition", &self.transition)
            .field("observation", &self.observation)
            .field("linearization", &self.linearization)
            .finish()
    }
}

impl<T, F, G, S> SequentialFilter<T, F, G, S>
where
    T: FloatScalar,
    F: Fn(&DynVector<T>) -> DynVector<T>,
    G: Fn(&DynVector<T>) -> DynVector<T>,
    S: Linearization<T>,
{
    pub fn new(
        transition: FunctionalModel<T, F>,
        observation: FunctionalModel<T, G>,
        linearization: S,
    ) -> Self {
        Self {
            transition,
            observation,
            linearization,
        }
    }

    #[inline]
    pub fn transition(&self) -> &FunctionalModel<T, F> {
        &self.transition
    }

    #[inline]
    pub fn observation(&self) -> &FunctionalModel<T, G> {
        &self.observation
    }

    #[inline]
    pub fn linearization(&self) -> &S {
        &self.linearization
    }

    /// One predict/update cycle from `state` with observation `y`.
    ///
    /// `predict_reference` and `update_reference` default to `state` and
    /// the predicted belief respectively.
    pub fn step(
        &self,
        state: &GaussianState<T>,
        y: &DynVector<T>,
        predict_reference: Option<&GaussianState<T>>,
        update_reference: Option<&GaussianState<T>>,
    ) -> Result<GaussianState<T>, EstimateError> {
        filter_step(
            &self.transition,
            &self.observation,
            &self.linearization,
            state,
            y,
            predict_reference,
            update_reference,
        )
    }

    /// Filter `observations` starting from the prior `x0`.
    ///
    /// Returns `observations.len() + 1` beliefs, the first being `x0`.
    /// If `nominal` is given, step `t` linearizes the transition about
    /// `nominal[t − 1]` and the observation about `nominal[t]`; it must have
    /// the representation of `x0`, its dimension and
    /// `observations.len() + 1` entries.
    pub fn run(
        &self,
        observations: &[DynVector<T>],
        x0: &GaussianState<T>,
        nominal: Option<&Trajectory<T>>,
    ) -> Result<Trajectory<T>, FilterError> {
        filtering(
            observations,
            x0,
            &self.transition,
            &self.observation,
            &self.linearization,
            nominal,
        )
    }

    /// [`run`](Self::run) over independent `(observations, prior)` pairs,
    /// without a nominal trajectory. Sequences are filtered in parallel.
    #[cfg(feature = "parallel")]
    pub fn run_batch(
        &self,
        sequences: &[(&[DynVector<T>], &GaussianState<T>)],
    ) -> Vec<Result<Trajectory<T>, FilterError>>
    where
        F: Sync,
        G: Sync,
        S: Sync,
    {
        use rayon::prelude::*;

        sequences
            .par_iter()
            .map(|(observations, x0)| self.run(observations, x0, None))
            .collect()
    }

    /// [`run`](Self::run) over independent `(observations, prior)` pairs,
    /// without a nominal trajectory.
    #[cfg(not(feature = "parallel"))]
    pub fn run_batch(
        &self,
        sequences: &[(&[DynVector<T>], &GaussianState<T>)],
    ) -> Vec<Result<Trajectory<T>, FilterError>> {
        sequences
            .iter()
            .map(|(observations, x0)| self.run(observations, x0, None))
            .collect()
    }
}

/// Filter `observations` from the prior `x0` with the given models and
/// linearization strategy.
///
/// Same as [`SequentialFilter::run`], for callers that keep the models
/// elsewhere.
pub fn filtering<T, F, G, S>(
    observations: &[DynVector<T>],
    x0: &GaussianState<T>,
    transition: &FunctionalModel<T, F>,
    observation: &FunctionalModel<T, G>,
    linearization: &S,
    nominal: Option<&Trajectory<T>>,
) -> Result<Trajectory<T>, FilterError>
where
    T: FloatScalar,
    F: Fn(&DynVector<T>) -> DynVector<T>,
    G: Fn(&DynVector<T>) -> DynVector<T>,
    S: Linearization<T>,
{
    let k = observations.len();
    debug!(
        "filtering {} observations in {} form (dim {}, nominal: {})",
        k,
        x0.representation(),
        x0.dim(),
        nominal.is_some()
    );

    x0.validate().map_err(|error| FilterError { step: 0, error })?;
    if let Some(nominal) = nominal {
        check_nominal(nominal, x0, k).map_err(|error| {
            debug!("nominal trajectory rejected: {}", error);
            FilterError { step: 0, error }
        })?;
    }

    let mut states = Vec::with_capacity(k + 1);
    states.push(x0.clone());

    for (t, y) in (1..=k).zip(observations) {
        let predict_reference = nominal.map(|n| &n[t - 1]);
        let update_reference = nominal.map(|n| &n[t]);
        let current = &states[t - 1];

        let next = filter_step(
            transition,
            observation,
            linearization,
            current,
            y,
            predict_reference,
            update_reference,
        )
        .map_err(|error| {
            debug!("step {} of {} failed: {}", t, k, error);
            FilterError { step: t, error }
        })?;

        trace!("step {}: mean = {:?}", t, next.mean().as_slice());
        states.push(next);
    }

    Ok(Trajectory::from_states(states))
}

fn filter_step<T, F, G, S>(
    transition: &FunctionalModel<T, F>,
    observation: &FunctionalModel<T, G>,
    linearization: &S,
    state: &GaussianState<T>,
    y: &DynVector<T>,
    predict_reference: Option<&GaussianState<T>>,
    update_reference: Option<&GaussianState<T>>,
) -> Result<GaussianState<T>, EstimateError>
where
    T: FloatScalar,
    F: Fn(&DynVector<T>) -> DynVector<T>,
    G: Fn(&DynVector<T>) -> DynVector<T>,
    S: Linearization<T>,
{
    let affine = linearization.linearize(transition, predict_reference.unwrap_or(state))?;
    let predicted = predict(&affine, state)?;

    let affine = linearization.linearize(observation, update_reference.unwrap_or(&predicted))?;
    update(&affine, &predicted, y)
}

fn check_nominal<T: FloatScalar>(
    nominal: &Trajectory<T>,
    x0: &GaussianState<T>,
    k: usize,
) -> Result<(), EstimateError> {
    if nominal.len() != k + 1 {
        return Err(ShapeMismatch::TrajectoryLength {
            expected: k + 1,
            got: nominal.len(),
        }
        .into());
    }
    for state in nominal {
        if state.representation() != x0.representation() {
            return Err(ShapeMismatch::Representation {
                expected: x0.representation(),
                got: state.representation(),
            }
            .into());
        }
        super::check_shape("nominal state", (x0.dim(), 1), (state.dim(), 1))?;
        state.validate()?;
    }
    Ok(())
}
