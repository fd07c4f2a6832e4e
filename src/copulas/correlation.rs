//! # Correlation
//!
//! $$
//! \rho_{ij}=\frac{\operatorname{Cov}(X_i,X_j)}{\sigma_i\sigma_j},\qquad
//! \tau_b=\frac{n_c-n_d}{\sqrt{(n_0-n_1)(n_0-n_2)}}
//! $$
//!
use std::cmp::Ordering;

use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;

use crate::error::CopulaError;
use crate::error::Result;

/// Kendall's tau-b between two equally long samples.
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Result<f64> {
  if x.is_empty() || y.is_empty() {
    return Err(CopulaError::EmptyInput);
  }
  if x.len() != y.len() {
    return Err(CopulaError::InvalidInputType(format!(
      "samples must have equal length, got {} and {}",
      x.len(),
      y.len()
    )));
  }

  let (tau, ..) = kendalls::tau_b_with_comparator(x, y, |a: &f64, b: &f64| {
    a.partial_cmp(b).unwrap_or(Ordering::Greater)
  })
  .map_err(|e| CopulaError::InvalidInputType(format!("Kendall's tau: {e}")))?;

  Ok(tau)
}

/// Maximum-likelihood covariance (divide by `n`) of the columns of `data`.
pub fn empirical_covariance(data: ArrayView2<f64>) -> Result<Array2<f64>> {
  let n = data.nrows();
  if n == 0 {
    return Err(CopulaError::EmptyInput);
  }

  let mean = data
    .mean_axis(Axis(0))
    .ok_or(CopulaError::EmptyInput)?;
  let centered = &data - &mean;
  Ok(centered.t().dot(&centered) / n as f64)
}

/// Pearson correlation matrix of the columns of `data`.
///
/// Columns with zero variance get zero correlation with every other column.
pub fn correlation_matrix(data: ArrayView2<f64>) -> Result<Array2<f64>> {
  let cols = data.ncols();
  let cov = empirical_covariance(data)?;
  let mut corr = Array2::<f64>::eye(cols);

  for i in 0..cols {
    for j in (i + 1)..cols {
      let denom = (cov[[i, i]] * cov[[j, j]]).sqrt();
      let r = if denom > 1e-15 {
        (cov[[i, j]] / denom).clamp(-1.0, 1.0)
      } else {
        0.0
      };
      corr[[i, j]] = r;
      corr[[j, i]] = r;
    }
  }

  Ok(corr)
}
