//! # Quadruple Scoring
//!
//! $$
//! \rho_1=h_d\left(-1+\frac{2^d}{n}\sum_{t=1}^n\prod_{i=1}^d\left(1-\hat u_{it}\right)\right),
//! \qquad h_d=\frac{d+1}{2^d-d-1}
//! $$
//!
//! $$
//! T_n=n\,\hat T^\top\Sigma^{-1}\hat T,\qquad
//! \hat T_l=\frac1n\sum_{t=1}^n\prod_{d=1}^4 f\left(\hat u_{dt},l_d\right)
//! $$
//!
//! Scores every candidate quadruple of a target and picks the winner.
//! Column 0 of every data subset is the target, the remaining columns are its
//! partner candidates, and combinations index those columns.
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray_stats::QuantileExt;
use rayon::prelude::*;

use super::extremal::exponent_tuples;
use super::extremal::tail_factor;
use super::extremal::DIM;
use super::extremal::N_TUPLES;
use crate::error::CopulaError;
use crate::error::Result;

/// Winning combination of one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadrupleScore {
  /// Position of the winner in the combination list.
  pub index: usize,
  pub score: f64,
}

#[derive(Clone, Copy)]
enum Objective {
  Max,
  Min,
}

/// First best finite score; `NaN` scores are skipped.
fn best(scores: Vec<f64>, objective: Objective) -> Result<QuadrupleScore> {
  let scores = Array1::from(scores);
  let index = match objective {
    Objective::Max => scores.argmax_skipnan(),
    Objective::Min => scores.argmin_skipnan(),
  }
  .map_err(|_| CopulaError::InvalidInputType("no finite quadruple score".into()))?;

  Ok(QuadrupleScore {
    index,
    score: scores[index],
  })
}

fn check_combinations(data: &ArrayView2<f64>, combos: &[[usize; 4]]) -> Result<()> {
  if combos.is_empty() || data.nrows() == 0 {
    return Err(CopulaError::EmptyInput);
  }
  let cols = data.ncols();
  if combos.iter().flatten().any(|&c| c >= cols) {
    return Err(CopulaError::InvalidInputType(format!(
      "combination index out of range for {cols} columns"
    )));
  }
  Ok(())
}

/// Sum of the six pairwise correlations of a quadruple.
pub fn quadruple_correlation(corr: ArrayView2<f64>, quad: &[usize; 4]) -> f64 {
  let mut total = 0.0;
  for a in 0..DIM {
    for b in 0..DIM {
      total += corr[[quad[a], quad[b]]];
    }
  }
  (total - DIM as f64) / 2.0
}

/// Traditional procedure: highest sum of pairwise Spearman correlations.
///
/// `corr` is the correlation submatrix of the target and its candidates.
pub fn sum_correlations(corr: ArrayView2<f64>, combos: &[[usize; 4]]) -> Result<QuadrupleScore> {
  check_combinations(&corr, combos)?;
  let scores = combos
    .par_iter()
    .map(|quad| quadruple_correlation(corr, quad))
    .collect();
  best(scores, Objective::Max)
}

/// Mean of the three multivariate Spearman's rho estimators of `u` (`n x d`).
pub fn spearman_rho(u: ArrayView2<f64>) -> f64 {
  let (n, d) = u.dim();
  let n = n as f64;
  let pow = 2f64.powi(d as i32);
  let h_d = (d as f64 + 1.0) / (pow - d as f64 - 1.0);
  let pairs = (d * (d - 1) / 2) as f64;

  let mut lower = 0.0;
  let mut upper = 0.0;
  let mut pairwise = 0.0;
  for row in u.rows() {
    lower += row.iter().map(|x| 1.0 - x).product::<f64>();
    upper += row.iter().product::<f64>();
    for k in 0..d {
      for l in (k + 1)..d {
        pairwise += (1.0 - row[k]) * (1.0 - row[l]);
      }
    }
  }

  let rho1 = h_d * (-1.0 + pow / n * lower);
  let rho2 = h_d * (-1.0 + pow / n * upper);
  let rho3 = -3.0 + 12.0 / (n * pairs) * pairwise;
  (rho1 + rho2 + rho3) / 3.0
}

/// Extended procedure: highest multivariate Spearman's rho.
///
/// `u` holds the ECDF-transformed returns of the target and its candidates.
pub fn multivariate_rho(u: ArrayView2<f64>, combos: &[[usize; 4]]) -> Result<QuadrupleScore> {
  check_combinations(&u, combos)?;
  let scores = combos
    .par_iter()
    .map(|quad| spearman_rho(u.select(Axis(1), quad).view()))
    .collect();
  best(scores, Objective::Max)
}

/// Summed Euclidean distance of the rows of `u` to the hyper-diagonal.
pub fn diagonal_distance(u: ArrayView2<f64>) -> f64 {
  let d = u.ncols() as f64;
  u.rows()
    .into_iter()
    .map(|row| {
      let norm2 = row.dot(&row);
      let proj = row.sum();
      (norm2 - proj * proj / d).max(0.0).sqrt()
    })
    .sum()
}

/// Geometric procedure: smallest total distance to the hyper-diagonal.
///
/// `ranked` holds the ranked returns of the target and its candidates.
pub fn diagonal_measure(ranked: ArrayView2<f64>, combos: &[[usize; 4]]) -> Result<QuadrupleScore> {
  check_combinations(&ranked, combos)?;
  let scores = combos
    .par_iter()
    .map(|quad| diagonal_distance(ranked.select(Axis(1), quad).view()))
    .collect();
  best(scores, Objective::Min)
}

/// Rank-based tail statistic `n * T' * inv_cov * T` of a single `n x 4` sample.
pub fn extremal_measure(u: ArrayView2<f64>, inv_cov: ArrayView2<f64>) -> f64 {
  let n = u.nrows();
  let tuples = exponent_tuples();
  let mut t = Array1::<f64>::zeros(N_TUPLES);
  for row in u.rows() {
    for (k, l) in tuples.iter().enumerate() {
      t[k] += (0..DIM).map(|d| tail_factor(row[d], l[d])).product::<f64>();
    }
  }
  t /= n as f64;
  n as f64 * t.dot(&inv_cov.dot(&t))
}

/// Extremal procedure: largest deviation from independence in the joint tails.
///
/// `ranked` holds the ranked returns of the target and its candidates and
/// `inv_cov` is the inverse extremal covariance matrix.
pub fn extremal_scores(
  ranked: ArrayView2<f64>,
  combos: &[[usize; 4]],
  inv_cov: ArrayView2<f64>,
) -> Result<QuadrupleScore> {
  check_combinations(&ranked, combos)?;
  if inv_cov.dim() != (N_TUPLES, N_TUPLES) {
    return Err(CopulaError::InvalidInputType(format!(
      "inverse covariance must be {N_TUPLES}x{N_TUPLES}"
    )));
  }

  // Tail factors depend only on the column, not on the quadruple.
  let factors: [Array2<f64>; 2] = [
    ranked.mapv(|x| tail_factor(x, 1)),
    ranked.mapv(|x| tail_factor(x, 2)),
  ];
  let tuples = exponent_tuples();
  let n = ranked.nrows();

  let scores = combos
    .par_iter()
    .map(|quad| {
      let mut t = Array1::<f64>::zeros(N_TUPLES);
      for row in 0..n {
        for (k, l) in tuples.iter().enumerate() {
          let mut prod = 1.0;
          for d in 0..DIM {
            prod *= factors[(l[d] - 1) as usize][[row, quad[d]]];
          }
          t[k] += prod;
        }
      }
      t /= n as f64;
      n as f64 * t.dot(&inv_cov.dot(&t))
    })
    .collect();
  best(scores, Objective::Max)
}
