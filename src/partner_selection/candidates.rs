//! # Candidate Generation
//!
//! $$
//! \mathcal Q(i)=\left\{(i,j,k,l): \{j,k,l\}\subset N_K(i),\ j<k<l\right\},
//! \qquad |\mathcal Q(i)|=\binom{K}{3}
//! $$
//!
use std::cmp::Reverse;

use ndarray::ArrayView2;
use ordered_float::OrderedFloat;

use crate::error::CopulaError;
use crate::error::Result;

/// For every column, the `k` other columns with the highest correlation.
///
/// Ties keep column order. A column never lists itself.
pub fn top_k_neighbors(corr: ArrayView2<f64>, k: usize) -> Vec<Vec<usize>> {
  let n = corr.nrows();
  (0..n)
    .map(|i| {
      let mut others: Vec<usize> = (0..n).filter(|&j| j != i).collect();
      others.sort_by_key(|&j| Reverse(OrderedFloat(corr[[i, j]])));
      others.truncate(k);
      others
    })
    .collect()
}

/// All `(0, j, k, l)` with `1 <= j < k < l < num_stocks`.
///
/// Index 0 is the target; the rest index its partner candidates.
pub fn prepare_combinations(num_stocks: usize) -> Result<Vec<[usize; 4]>> {
  if num_stocks < 4 {
    return Err(CopulaError::InvalidInputType(format!(
      "need the target and at least 3 candidates, got {num_stocks} stocks"
    )));
  }

  let mut out = Vec::with_capacity(binomial3(num_stocks - 1));
  for j in 1..num_stocks {
    for k in (j + 1)..num_stocks {
      for l in (k + 1)..num_stocks {
        out.push([0, j, k, l]);
      }
    }
  }
  Ok(out)
}

/// Every 3-subset of `neighbors`, in their listed order, prefixed with `target`.
pub fn enumerate_quadruples(target: usize, neighbors: &[usize]) -> Result<Vec<[usize; 4]>> {
  let local = prepare_combinations(neighbors.len() + 1)?;
  Ok(
    local
      .into_iter()
      .map(|[_, j, k, l]| [target, neighbors[j - 1], neighbors[k - 1], neighbors[l - 1]])
      .collect(),
  )
}

fn binomial3(m: usize) -> usize {
  if m < 3 {
    0
  } else {
    m * (m - 1) * (m - 2) / 6
  }
}
