//! # N13
//!
//! Family 4.2.13 of Nelsen's catalogue.
//!
//! $$
//! \varphi_\theta(t)=(1-\ln t)^\theta-1,\qquad
//! C_\theta(u,v)=\exp\left(1-\left[(1-\ln u)^\theta+(1-\ln v)^\theta-1\right]^{1/\theta}\right)
//! $$
//!
use super::invert_tau;
use super::Archimedean;
use super::BivariateCopula;
use super::CopulaType;
use crate::error::CopulaError;
use crate::error::Result;

const THETA_SEARCH: (f64, f64) = (1e-4, 100.0);

#[derive(Debug, Clone)]
pub struct N13 {
  pub theta: f64,
}

impl N13 {
  pub fn new(theta: f64) -> Result<Self> {
    if !(theta.is_finite() && theta > 0.0) {
      return Err(CopulaError::InvalidParameter(format!(
        "N13 theta must be finite and positive, got {theta}"
      )));
    }
    Ok(Self { theta })
  }
}

pub(crate) fn theta_from_tau(tau: f64) -> Result<f64> {
  invert_tau(
    |theta| N13 { theta }.generator_tau(),
    tau,
    THETA_SEARCH.0,
    THETA_SEARCH.1,
  )
}

impl BivariateCopula for N13 {
  fn r#type(&self) -> CopulaType {
    CopulaType::N13
  }

  fn params(&self) -> Vec<f64> {
    vec![self.theta]
  }

  fn density(&self, u: f64, v: f64) -> f64 {
    self.generator_density(u, v)
  }

  fn kendall_tau(&self) -> f64 {
    self.generator_tau()
  }
}

impl Archimedean for N13 {
  fn theta(&self) -> f64 {
    self.theta
  }

  fn generator(&self, t: f64) -> f64 {
    (1.0 - t.ln()).powf(self.theta) - 1.0
  }

  fn generator_d1(&self, t: f64) -> f64 {
    -self.theta * (1.0 - t.ln()).powf(self.theta - 1.0) / t
  }

  fn generator_d2(&self, t: f64) -> f64 {
    let s = 1.0 - t.ln();
    self.theta * s.powf(self.theta - 2.0) * (self.theta - t.ln()) / (t * t)
  }

  fn generator_inv(&self, s: f64) -> f64 {
    (1.0 - (1.0 + s).powf(1.0 / self.theta)).exp()
  }
}
