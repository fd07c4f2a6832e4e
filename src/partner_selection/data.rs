//! # Partner Selection Data
//!
//! $$
//! r_t=\frac{P_t}{P_{t-1}}-1,\qquad
//! \hat u_t=\frac{\operatorname{rank}(r_t)}{n}
//! $$
//!
//! Return preprocessing for the partner-selection procedures.
use std::cmp::Ordering;

use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;
use tracing::debug;

use crate::copulas::empirical::Ecdf;
use crate::copulas::empirical::EcdfBounds;
use crate::error::CopulaError;
use crate::error::Result;

/// Replace missing (`NaN` or infinite) values with the last valid value of the column.
///
/// Leading gaps stay `NaN`.
pub fn forward_fill(data: &mut Array2<f64>) {
  for mut col in data.axis_iter_mut(Axis(1)) {
    let mut last = f64::NAN;
    for v in col.iter_mut() {
      if v.is_finite() {
        last = *v;
      } else {
        *v = last;
      }
    }
  }
}

/// Daily percentage returns of a price table.
///
/// Prices are forward filled, infinite returns are treated as missing and
/// forward filled, and any row still holding a gap is dropped. The first
/// observation never has a return.
pub fn returns(prices: ArrayView2<f64>) -> Result<Array2<f64>> {
  if prices.nrows() < 2 || prices.ncols() == 0 {
    return Err(CopulaError::EmptyInput);
  }

  let mut filled = prices.to_owned();
  forward_fill(&mut filled);

  let (rows, cols) = filled.dim();
  let mut pct = Array2::<f64>::from_elem((rows - 1, cols), f64::NAN);
  for t in 1..rows {
    for j in 0..cols {
      pct[[t - 1, j]] = filled[[t, j]] / filled[[t - 1, j]] - 1.0;
    }
  }
  forward_fill(&mut pct);

  let keep: Vec<usize> = pct
    .axis_iter(Axis(0))
    .enumerate()
    .filter(|(_, row)| row.iter().all(|v| v.is_finite()))
    .map(|(t, _)| t)
    .collect();

  if keep.is_empty() {
    return Err(CopulaError::EmptyInput);
  }
  debug!(
    observations = rows,
    kept = keep.len(),
    "computed returns from prices"
  );

  Ok(pct.select(Axis(0), &keep))
}

/// Percentile rank of every column, ties broken by order of appearance.
///
/// Values lie in `(0, 1]`.
pub fn ranked_returns(returns: ArrayView2<f64>) -> Array2<f64> {
  let (rows, cols) = returns.dim();
  let mut ranked = Array2::<f64>::zeros((rows, cols));

  for j in 0..cols {
    let col = returns.column(j);
    let mut order: Vec<usize> = (0..rows).collect();
    // Stable sort keeps equal values in order of appearance.
    order.sort_by(|&a, &b| col[a].partial_cmp(&col[b]).unwrap_or(Ordering::Equal));
    for (rank, &t) in order.iter().enumerate() {
      ranked[[t, j]] = (rank + 1) as f64 / rows as f64;
    }
  }

  ranked
}

/// Raw empirical CDF of every column evaluated on the column itself.
pub fn ecdf_returns(returns: ArrayView2<f64>) -> Result<Array2<f64>> {
  let mut out = Array2::<f64>::zeros(returns.dim());
  for (j, col) in returns.axis_iter(Axis(1)).enumerate() {
    let sample = col.to_vec();
    let ecdf = Ecdf::with_bounds(&sample, EcdfBounds::unit())?;
    out.column_mut(j).assign(&ecdf.cdf_array(&col));
  }
  Ok(out)
}
