use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::*;
use crate::dynmatrix::{DynMatrix, DynVector};

const DIMS: [usize; 4] = [2, 3, 10, 11];

fn randn(rng: &mut StdRng, nrows: usize, ncols: usize) -> DynMatrix<f64> {
    let data = (0..nrows * ncols).map(|_| rng.sample(StandardNormal)).collect();
    DynMatrix::from_vec(nrows, ncols, data)
}

fn randn_vector(rng: &mut StdRng, n: usize) -> DynVector<f64> {
    DynVector::from_vec((0..n).map(|_| rng.sample(StandardNormal)).collect())
}

/// Random lower-triangular factor with entries in `[0, 1)`.
fn rand_lower(rng: &mut StdRng, n: usize) -> DynMatrix<f64> {
    let mut l = DynMatrix::zeros(n, n, 0.0);
    for j in 0..n {
        for i in j..n {
            l[(i, j)] = rng.gen::<f64>();
        }
    }
    l
}

fn gram(l: &DynMatrix<f64>) -> DynMatrix<f64> {
    l * &l.transpose()
}

fn assert_allclose(actual: &DynMatrix<f64>, expected: &DynMatrix<f64>, rtol: f64, atol: f64) {
    assert_eq!(actual.shape(), expected.shape());
    for i in 0..actual.nrows() {
        for j in 0..actual.ncols() {
            let (a, e) = (actual[(i, j)], expected[(i, j)]);
            assert!(
                (a - e).abs() <= atol + rtol * e.abs(),
                "({}, {}): {} vs {} (diff {})",
                i,
                j,
                a,
                e,
                (a - e).abs()
            );
        }
    }
}

/// `Some(P)` if `P` is comfortably positive definite, `None` otherwise.
fn well_conditioned(p: DynMatrix<f64>) -> Option<DynMatrix<f64>> {
    let l = CholeskyDecomposition::new(&p).ok()?.l_full();
    let min_pivot = (0..l.nrows()).map(|i| l[(i, i)] * l[(i, i)]).fold(f64::INFINITY, f64::min);
    (min_pivot > 1e-4).then_some(p)
}

// ── tria ────────────────────────────────────────────────────────────

#[test]
fn tria_reproduces_gram_matrix() {
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        for &n in &DIMS {
            for &m in &[n, n + 3, 2 * n] {
                let a = randn(&mut rng, n, m);
                let l = tria(&a);
                assert!(l.is_lower_triangular());
                assert_allclose(&gram(&l), &gram(&a), 1e-4, 1e-10);
            }
        }
    }
}

#[test]
fn tria_matches_cholesky_up_to_sign() {
    let mut rng = StdRng::seed_from_u64(7);
    for &n in &DIMS {
        let a = randn(&mut rng, n, 2 * n);
        let l = tria(&a);
        let chol = CholeskyDecomposition::new(&gram(&a)).unwrap().l_full();
        // Diagonal is normalized non-negative, so the factor is the Cholesky factor.
        assert_allclose(&l, &chol, 1e-6, 1e-8);
    }
}

#[test]
fn tria_of_stacked_factors_fuses_covariances() {
    // tria([A·L, L_Q]) must factor A·P·Aᵀ + Q.
    let mut rng = StdRng::seed_from_u64(11);
    let n = 3;
    let a = randn(&mut rng, n, n);
    let l = rand_lower(&mut rng, n);
    let lq = rand_lower(&mut rng, n);
    let fused = tria(&DynMatrix::hstack(&[&(&a * &l), &lq]));
    let expected = &(&a * &gram(&l)) * &a.transpose() + gram(&lq);
    assert_allclose(&gram(&fused), &expected, 1e-8, 1e-10);
}

// ── Rank-one updates ────────────────────────────────────────────────

#[test]
fn rank_one_update_matches_outer_product() {
    for &multiplier in &[1.0, -0.1] {
        for seed in [0_u64, 42, 666] {
            let mut rng = StdRng::seed_from_u64(seed);
            for &n in &DIMS {
                let l = rand_lower(&mut rng, n);
                let v = randn_vector(&mut rng, n);
                let expected = gram(&l) + v.outer(&v) * multiplier;
                let Some(expected) = well_conditioned(expected) else {
                    continue;
                };
                let updated = cholesky_rank_one_update(&l, &v, multiplier).unwrap();
                assert!(updated.is_lower_triangular());
                assert_allclose(&gram(&updated), &expected, 1e-4, 1e-8);
            }
        }
    }
}

#[test]
fn rank_one_update_equals_refactorization() {
    let mut rng = StdRng::seed_from_u64(3);
    let n = 4;
    let l = rand_lower(&mut rng, n) + DynMatrix::eye(n, 0.0);
    let v = DynVector::from_fn(n, |i| 0.25 * (i as f64 + 1.0));
    let updated = cholesky_rank_one_update(&l, &v, 1.0).unwrap();
    let direct = CholeskyDecomposition::new(&(gram(&l) + v.outer(&v)))
        .unwrap()
        .l_full();
    assert_allclose(&updated, &direct, 1e-10, 1e-12);
}

#[test]
fn rank_one_update_from_singular_factor() {
    // L = 0: the update alone defines the result.
    let l = DynMatrix::zeros(1, 1, 0.0_f64);
    let v = DynVector::from_slice(&[2.0]);
    let updated = cholesky_rank_one_update(&l, &v, 1.0).unwrap();
    assert!((updated[(0, 0)] - 2.0).abs() < 1e-15);
}

#[test]
fn downdate_to_indefinite_fails() {
    let l = DynMatrix::eye(2, 0.0_f64);
    let v = DynVector::from_slice(&[2.0, 0.0]);
    assert_eq!(
        cholesky_rank_one_update(&l, &v, -1.0).unwrap_err(),
        LinalgError::NotPositiveDefinite
    );
}

#[test]
fn update_then_downdate_roundtrip() {
    let l = DynMatrix::from_rows(3, 3, &[2.0_f64, 0.0, 0.0, 0.5, 1.5, 0.0, -0.3, 0.2, 1.0]);
    let v = DynVector::from_slice(&[0.4, -0.7, 0.9]);
    let up = cholesky_rank_one_update(&l, &v, 1.0).unwrap();
    let back = cholesky_rank_one_update(&up, &v, -1.0).unwrap();
    assert_allclose(&back, &l, 1e-10, 1e-12);
}

#[test]
fn update_many_matches_sequential() {
    const BATCH: usize = 3;
    for &multiplier in &[1.0, -0.1] {
        for seed in [0_u64, 1, 2, 42, 666] {
            let mut rng = StdRng::seed_from_u64(seed);
            for &n in &DIMS {
                let l = rand_lower(&mut rng, n);
                let data = (0..BATCH * n).map(|_| rng.gen::<f64>()).collect();
                let vs = DynMatrix::from_vec(BATCH, n, data);

                let mut expected = gram(&l);
                for k in 0..BATCH {
                    let vk = DynVector::from_fn(n, |i| vs[(k, i)]);
                    expected = expected + vk.outer(&vk) * multiplier;
                }
                let Some(expected) = well_conditioned(expected) else {
                    continue;
                };

                let many = match cholesky_update_many(&l, &vs, multiplier) {
                    Ok(m) => m,
                    // An intermediate partial sum can be indefinite even
                    // though the final one is not.
                    Err(LinalgError::NotPositiveDefinite) if multiplier < 0.0 => continue,
                    Err(e) => panic!("unexpected {:?}", e),
                };
                assert_allclose(&gram(&many), &expected, 1e-4, 1e-8);

                let mut sequential = l.clone();
                for k in 0..BATCH {
                    let vk = DynVector::from_fn(n, |i| vs[(k, i)]);
                    sequential = cholesky_rank_one_update(&sequential, &vk, multiplier).unwrap();
                }
                assert_allclose(&many, &sequential, 1e-12, 1e-12);
            }
        }
    }
}
