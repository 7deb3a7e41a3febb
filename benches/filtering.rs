use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use gaussfilt::estimate::{
    Cubature, Extended, FunctionalModel, GaussianState, Linearization, Representation,
    SequentialFilter,
};
use gaussfilt::linalg::{cholesky_rank_one_update, tria};
use gaussfilt::{DynMatrix, DynVector};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dense(nrows: usize, ncols: usize) -> DynMatrix<f64> {
    DynMatrix::from_fn(nrows, ncols, |i, j| ((i * 7 + j * 3) % 11) as f64 / 11.0 - 0.4)
}

fn lower(n: usize) -> DynMatrix<f64> {
    DynMatrix::from_fn(n, n, |i, j| {
        if i == j {
            1.0 + i as f64 * 0.1
        } else if i > j {
            0.05 * (i + j) as f64
        } else {
            0.0
        }
    })
}

fn noise(n: usize, var: f64) -> GaussianState<f64> {
    GaussianState::standard(DynVector::zeros(n, 0.0), DynMatrix::eye(n, 0.0) * var).unwrap()
}

/// Coordinated-turn-like transition, range/bearing-like observation.
fn bench_filter<S: Linearization<f64>>(
    linearization: S,
) -> SequentialFilter<
    f64,
    impl Fn(&DynVector<f64>) -> DynVector<f64>,
    impl Fn(&DynVector<f64>) -> DynVector<f64>,
    S,
> {
    let dt = 0.1;
    let transition = FunctionalModel::new(
        move |x: &DynVector<f64>| {
            let (s, c) = (x[4] * dt).sin_cos();
            DynVector::from_slice(&[
                x[0] + dt * x[2],
                x[1] + dt * x[3],
                c * x[2] - s * x[3],
                s * x[2] + c * x[3],
                x[4],
            ])
        },
        noise(5, 1e-3),
    );
    let observation = FunctionalModel::new(
        |x: &DynVector<f64>| {
            DynVector::from_slice(&[(x[0] * x[0] + x[1] * x[1]).sqrt(), x[1].atan2(x[0])])
        },
        noise(2, 1e-2),
    );
    SequentialFilter::new(transition, observation, linearization)
}

fn observations(k: usize) -> Vec<DynVector<f64>> {
    (1..=k)
        .map(|t| {
            let a = 0.05 * t as f64;
            DynVector::from_slice(&[10.0 + a, a.sin() * 0.3 + 0.7])
        })
        .collect()
}

fn prior(repr: Representation) -> GaussianState<f64> {
    GaussianState::standard(
        DynVector::from_slice(&[7.0, 7.0, 0.5, 0.0, 0.1]),
        DynMatrix::eye(5, 0.0),
    )
    .unwrap()
    .to_representation(repr)
    .unwrap()
}

// ---------------------------------------------------------------------------
// Factorization primitives
// ---------------------------------------------------------------------------

fn tria_bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("tria");
    for n in [3, 6, 12] {
        let m = dense(n, 2 * n);
        g.bench_with_input(BenchmarkId::from_parameter(n), &m, |b, m| {
            b.iter(|| tria(std::hint::black_box(m)))
        });
    }
    g.finish();
}

fn rank_one_bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("cholesky_rank_one_update");
    for n in [3, 6, 12] {
        let l = lower(n);
        let v = DynVector::from_fn(n, |i| 0.1 * (i as f64 + 1.0));
        g.bench_with_input(BenchmarkId::new("update", n), &(l.clone(), v.clone()), |b, (l, v)| {
            b.iter(|| cholesky_rank_one_update(std::hint::black_box(l), v, 1.0))
        });
        g.bench_with_input(BenchmarkId::new("downdate", n), &(l, v), |b, (l, v)| {
            b.iter(|| cholesky_rank_one_update(std::hint::black_box(l), v, -0.1))
        });
    }
    g.finish();
}

// ---------------------------------------------------------------------------
// Full recursion: representation × strategy
// ---------------------------------------------------------------------------

fn filtering_bench(c: &mut Criterion) {
    let ys = observations(100);
    let mut g = c.benchmark_group("filtering_100_steps");

    for repr in [Representation::Standard, Representation::Sqrt] {
        let x0 = prior(repr);

        let filter = bench_filter(Extended);
        g.bench_function(format!("extended/{}", repr), |b| {
            b.iter(|| filter.run(std::hint::black_box(&ys), &x0, None))
        });

        let filter = bench_filter(Cubature);
        g.bench_function(format!("cubature/{}", repr), |b| {
            b.iter(|| filter.run(std::hint::black_box(&ys), &x0, None))
        });
    }

    g.finish();
}

criterion_group!(benches, tria_bench, rank_one_bench, filtering_bench);
criterion_main!(benches);
