use std::hint::black_box;

use copula_partners::partner_selection::candidates::prepare_combinations;
use copula_partners::partner_selection::data::ranked_returns;
use copula_partners::partner_selection::extremal::inverse_covariance_matrix;
use copula_partners::partner_selection::scoring::diagonal_measure;
use copula_partners::partner_selection::scoring::extremal_scores;
use copula_partners::partner_selection::scoring::multivariate_rho;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use ndarray::Array2;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

const ROWS: usize = 500;

fn ranked(cols: usize) -> Array2<f64> {
  let mut rng = StdRng::seed_from_u64(42);
  let r = Array2::random_using((ROWS, cols), Normal::new(0.0, 0.01).unwrap(), &mut rng);
  ranked_returns(r.view())
}

fn bench_scorers(c: &mut Criterion) {
  let mut group = c.benchmark_group("quadruple_scoring");
  group.sample_size(10);
  let inv = inverse_covariance_matrix(8).unwrap();

  for k in [10usize, 20, 30] {
    let u = ranked(k + 1);
    let combos = prepare_combinations(k + 1).unwrap();

    group.bench_with_input(BenchmarkId::new("extended", k), &k, |b, _| {
      b.iter(|| black_box(multivariate_rho(u.view(), &combos).unwrap()))
    });
    group.bench_with_input(BenchmarkId::new("geometric", k), &k, |b, _| {
      b.iter(|| black_box(diagonal_measure(u.view(), &combos).unwrap()))
    });
    group.bench_with_input(BenchmarkId::new("extremal", k), &k, |b, _| {
      b.iter(|| black_box(extremal_scores(u.view(), &combos, inv.view()).unwrap()))
    });
  }

  group.finish();
}

fn bench_covariance(c: &mut Criterion) {
  c.bench_function("extremal_inverse_covariance", |b| {
    b.iter(|| black_box(inverse_covariance_matrix(black_box(8)).unwrap()))
  });
}

criterion_group!(benches, bench_scorers, bench_covariance);
criterion_main!(benches);
