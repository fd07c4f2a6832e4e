//! # Student-t
//!
//! $$
//! c_{\rho,\nu}(u,v)=\frac{f_{\rho,\nu}\left(t_\nu^{-1}(u),t_\nu^{-1}(v)\right)}{f_\nu\left(t_\nu^{-1}(u)\right)f_\nu\left(t_\nu^{-1}(v)\right)}
//! $$
//!
use ndarray::Array2;
use statrs::distribution::Continuous;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::StudentsT;
use statrs::function::gamma::ln_gamma;

use super::gaussian::correlation_from_cov;
use super::BivariateCopula;
use super::CopulaType;
use crate::error::CopulaError;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct StudentCopula {
  pub cov: Array2<f64>,
  pub rho: f64,
  pub dof: f64,
  t_dist: StudentsT,
}

impl StudentCopula {
  pub fn from_cov(cov: &Array2<f64>, dof: f64) -> Result<Self> {
    if !(dof.is_finite() && dof > 0.0) {
      return Err(CopulaError::InvalidParameter(format!(
        "degrees of freedom must be positive, got {dof}"
      )));
    }
    let rho = correlation_from_cov(cov)?;
    let t_dist = student_t(dof)?;
    Ok(Self {
      cov: cov.clone(),
      rho,
      dof,
      t_dist,
    })
  }

  fn ln_bivariate_t(&self, x: f64, y: f64) -> f64 {
    let (rho, nu) = (self.rho, self.dof);
    let one_minus = 1.0 - rho * rho;
    let quad = (x * x - 2.0 * rho * x * y + y * y) / (nu * one_minus);

    ln_gamma((nu + 2.0) / 2.0)
      - ln_gamma(nu / 2.0)
      - (nu * std::f64::consts::PI).ln()
      - 0.5 * one_minus.ln()
      - (nu + 2.0) / 2.0 * quad.ln_1p()
  }
}

/// Standard Student-t distribution with `dof` degrees of freedom.
pub(crate) fn student_t(dof: f64) -> Result<StudentsT> {
  StudentsT::new(0.0, 1.0, dof).map_err(|e| CopulaError::InvalidParameter(e.to_string()))
}

impl BivariateCopula for StudentCopula {
  fn r#type(&self) -> CopulaType {
    CopulaType::Student
  }

  fn params(&self) -> Vec<f64> {
    vec![self.rho, self.dof]
  }

  fn density(&self, u: f64, v: f64) -> f64 {
    let x = self.t_dist.inverse_cdf(u);
    let y = self.t_dist.inverse_cdf(v);
    let ln_marginals = self.t_dist.ln_pdf(x) + self.t_dist.ln_pdf(y);
    (self.ln_bivariate_t(x, y) - ln_marginals).exp()
  }

  fn kendall_tau(&self) -> f64 {
    2.0 / std::f64::consts::PI * self.rho.asin()
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;
  use crate::copulas::bivariate::GaussianCopula;

  #[test]
  fn large_dof_approaches_gaussian() {
    let cov = array![[1.0, 0.45], [0.45, 1.0]];
    let student = StudentCopula::from_cov(&cov, 1e4).unwrap();
    let gaussian = GaussianCopula::from_cov(&cov).unwrap();
    for &(u, v) in &[(0.2, 0.3), (0.5, 0.5), (0.9, 0.7)] {
      assert_relative_eq!(student.density(u, v), gaussian.density(u, v), max_relative = 5e-3);
    }
  }

  #[test]
  fn carries_degrees_of_freedom() {
    let copula = StudentCopula::from_cov(&array![[1.0, 0.2], [0.2, 1.0]], 4.0).unwrap();
    assert_eq!(copula.params(), vec![0.2, 4.0]);
    assert!(StudentCopula::from_cov(&array![[1.0, 0.2], [0.2, 1.0]], 0.0).is_err());
  }
}
