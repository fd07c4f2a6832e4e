//! # Empirical
//!
//! $$
//! F_n(x)=\min\left(\max\left(\frac{1}{n}\sum_{i=1}^n \mathbf 1\{X_i\le x\},\,p_{\text{floor}}\right),\,p_{\text{cap}}\right)
//! $$
//!
use std::cmp::Ordering;

use ndarray::Array1;
use ndarray::ArrayBase;
use ndarray::Data;
use ndarray::Ix1;

use crate::error::CopulaError;
use crate::error::Result;

/// Probability floor and cap applied to the output of an [`Ecdf`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcdfBounds {
  pub floor: f64,
  pub cap: f64,
}

impl Default for EcdfBounds {
  fn default() -> Self {
    Self {
      floor: 1e-5,
      cap: 0.99999,
    }
  }
}

impl EcdfBounds {
  /// Unclamped bounds, i.e. the raw empirical CDF.
  pub fn unit() -> Self {
    Self {
      floor: 0.0,
      cap: 1.0,
    }
  }
}

/// Bounded empirical cumulative distribution function of a sample.
#[derive(Debug, Clone)]
pub struct Ecdf {
  sorted: Vec<f64>,
  bounds: EcdfBounds,
}

impl Ecdf {
  /// ECDF with the default floor `1e-5` and cap `0.99999`.
  pub fn new(sample: &[f64]) -> Result<Self> {
    Self::with_bounds(sample, EcdfBounds::default())
  }

  pub fn with_bounds(sample: &[f64], bounds: EcdfBounds) -> Result<Self> {
    if sample.is_empty() {
      return Err(CopulaError::EmptyInput);
    }
    if !(bounds.floor <= bounds.cap) {
      return Err(CopulaError::InvalidParameter(format!(
        "probability floor {} exceeds cap {}",
        bounds.floor, bounds.cap
      )));
    }
    if sample.iter().any(|x| x.is_nan()) {
      return Err(CopulaError::InvalidInputType(
        "sample contains NaN values".into(),
      ));
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    Ok(Self { sorted, bounds })
  }

  pub fn bounds(&self) -> EcdfBounds {
    self.bounds
  }

  pub fn len(&self) -> usize {
    self.sorted.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sorted.is_empty()
  }

  /// Fraction of sample points `<= x`, clamped to `[floor, cap]`.
  pub fn cdf(&self, x: f64) -> f64 {
    let count = self.sorted.partition_point(|&v| v <= x);
    let p = count as f64 / self.sorted.len() as f64;
    p.max(self.bounds.floor).min(self.bounds.cap)
  }

  /// Element-wise [`Ecdf::cdf`].
  pub fn cdf_array<S>(&self, x: &ArrayBase<S, Ix1>) -> Array1<f64>
  where
    S: Data<Elem = f64>,
  {
    x.mapv(|v| self.cdf(v))
  }

  /// Evaluate the ECDF of `sample` on the sample itself.
  pub fn transform(sample: &[f64], bounds: EcdfBounds) -> Result<Vec<f64>> {
    let ecdf = Self::with_bounds(sample, bounds)?;
    Ok(sample.iter().map(|&x| ecdf.cdf(x)).collect())
  }
}

/// Closure form of [`Ecdf`], for callers that only need `x -> F(x)`.
pub fn build_ecdf(sample: &[f64], floor: f64, cap: f64) -> Result<impl Fn(f64) -> f64> {
  let ecdf = Ecdf::with_bounds(sample, EcdfBounds { floor, cap })?;
  Ok(move |x: f64| ecdf.cdf(x))
}
