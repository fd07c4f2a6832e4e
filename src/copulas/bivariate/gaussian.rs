//! # Gaussian
//!
//! $$
//! c_\rho(u,v)=\frac{1}{\sqrt{1-\rho^2}}
//! \exp\left(-\frac{\rho^2(x^2+y^2)-2\rho xy}{2(1-\rho^2)}\right),\qquad x=\Phi^{-1}(u),\ y=\Phi^{-1}(v)
//! $$
//!
use ndarray::Array2;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

use super::BivariateCopula;
use super::CopulaType;
use crate::error::CopulaError;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct GaussianCopula {
  pub cov: Array2<f64>,
  pub rho: f64,
  std_norm: Normal,
}

impl GaussianCopula {
  /// Build from a 2x2 covariance matrix. Only the implied correlation is used.
  pub fn from_cov(cov: &Array2<f64>) -> Result<Self> {
    let rho = correlation_from_cov(cov)?;
    let std_norm =
      Normal::new(0.0, 1.0).map_err(|e| CopulaError::InvalidParameter(e.to_string()))?;
    Ok(Self {
      cov: cov.clone(),
      rho,
      std_norm,
    })
  }
}

/// `rho = cov[0,1] / sqrt(cov[0,0] cov[1,1])`, required to lie in `(-1, 1)`.
pub(crate) fn correlation_from_cov(cov: &Array2<f64>) -> Result<f64> {
  if cov.dim() != (2, 2) {
    return Err(CopulaError::InvalidInputType(format!(
      "expected a 2x2 covariance matrix, got {:?}",
      cov.dim()
    )));
  }
  let (a, b, d) = (cov[[0, 0]], cov[[0, 1]], cov[[1, 1]]);
  if !(a > 0.0 && d > 0.0) || !b.is_finite() {
    return Err(CopulaError::InvalidParameter(
      "covariance matrix must have positive, finite variances".into(),
    ));
  }

  let rho = b / (a * d).sqrt();
  if !(rho.abs() < 1.0) {
    return Err(CopulaError::InvalidParameter(format!(
      "correlation must lie in (-1, 1), got {rho}"
    )));
  }
  Ok(rho)
}

impl BivariateCopula for GaussianCopula {
  fn r#type(&self) -> CopulaType {
    CopulaType::Gaussian
  }

  fn params(&self) -> Vec<f64> {
    vec![self.rho]
  }

  fn density(&self, u: f64, v: f64) -> f64 {
    let rho = self.rho;
    let x = self.std_norm.inverse_cdf(u);
    let y = self.std_norm.inverse_cdf(v);
    let one_minus = 1.0 - rho * rho;

    let exponent = -(rho * rho * (x * x + y * y) - 2.0 * rho * x * y) / (2.0 * one_minus);
    exponent.exp() / one_minus.sqrt()
  }

  fn kendall_tau(&self) -> f64 {
    2.0 / std::f64::consts::PI * self.rho.asin()
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn uses_correlation_implied_by_covariance() {
    let copula = GaussianCopula::from_cov(&array![[4.0, 1.0], [1.0, 1.0]]).unwrap();
    assert_abs_diff_eq!(copula.rho, 0.5, epsilon = 1e-12);
  }

  #[test]
  fn zero_correlation_is_independence() {
    let copula = GaussianCopula::from_cov(&array![[1.0, 0.0], [0.0, 1.0]]).unwrap();
    assert_abs_diff_eq!(copula.density(0.13, 0.81), 1.0, epsilon = 1e-12);
  }

  #[test]
  fn rejects_degenerate_covariance() {
    assert!(GaussianCopula::from_cov(&array![[1.0, 1.0], [1.0, 1.0]]).is_err());
    assert!(GaussianCopula::from_cov(&array![[0.0, 0.0], [0.0, 1.0]]).is_err());
    assert!(GaussianCopula::from_cov(&array![[1.0, 0.0, 0.0]]).is_err());
  }
}
