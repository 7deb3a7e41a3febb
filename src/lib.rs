//! # gaussfilt
//!
//! Sequential Gaussian filtering for nonlinear state-space models, in
//! standard (mean + covariance) and square-root (mean + Cholesky factor)
//! form. Pure Rust, no-std compatible (needs `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use gaussfilt::estimate::{Extended, FunctionalModel, GaussianState, SequentialFilter};
//! use gaussfilt::{DynMatrix, DynVector};
//!
//! let noise = |n: usize, var: f64| {
//!     GaussianState::standard(DynVector::zeros(n, 0.0), DynMatrix::eye(n, 0.0) * var).unwrap()
//! };
//!
//! // Constant velocity, position observed.
//! let transition = FunctionalModel::new(
//!     |x: &DynVector<f64>| DynVector::from_slice(&[x[0] + 0.1 * x[1], x[1]]),
//!     noise(2, 1e-4),
//! );
//! let observation = FunctionalModel::new(
//!     |x: &DynVector<f64>| DynVector::from_slice(&[x[0]]),
//!     noise(1, 1e-2),
//! );
//! let filter = SequentialFilter::new(transition, observation, Extended);
//!
//! let ys: Vec<_> = (1..=50).map(|t| DynVector::from_slice(&[0.1 * t as f64])).collect();
//! let x0 = noise(2, 1.0).to_sqrt().unwrap();
//! let out = filter.run(&ys, &x0, None).unwrap();
//!
//! let v = out.last().unwrap().mean()[1];
//! assert!((v - 1.0).abs() < 0.05);
//! ```
//!
//! ## Modules
//!
//! - [`estimate`] — [`GaussianState`](estimate::GaussianState) in both
//!   representations, closure-based
//!   [`FunctionalModel`](estimate::FunctionalModel)s, the
//!   [`Linearization`](estimate::Linearization) strategies
//!   [`Extended`](estimate::Extended) and [`Cubature`](estimate::Cubature),
//!   the per-representation predict/update equations and the
//!   [`SequentialFilter`](estimate::SequentialFilter) recursion.
//!
//! - [`linalg`] — Cholesky factorization (strict and semidefinite),
//!   triangular solves, Householder triangularization [`linalg::tria`] and
//!   rank-one Cholesky updates. Free functions operate on
//!   `&mut impl MatrixMut<T>` in place.
//!
//! - [`dynmatrix`] — Heap-allocated, column-major [`DynMatrix<T>`] with
//!   runtime dimensions, and the column vector [`DynVector<T>`].
//!
//! - [`traits`] — Element and access traits:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats, used by every factorization and filter
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for algorithms
//!
//! ## Logging
//!
//! Filtering passes report through the [`log`](https://docs.rs/log) facade:
//! `debug` at the start of a pass and when a step fails, `trace` for every
//! step. No logger is installed by the library.
//!
//! ## Cargo features
//!
//! | Feature    | Default  | Description |
//! |------------|----------|-------------|
//! | `std`      | yes      | Hardware FPU via system libm, `std::error::Error` impls |
//! | `libm`     | baseline | Pure-Rust software float fallback |
//! | `parallel` | no       | `SequentialFilter::run_batch` across sequences via `rayon` |
//! | `all`      | no       | All features: `std` + `parallel` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod estimate;
pub mod linalg;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynVector};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
