//! # N14
//!
//! Family 4.2.14 of Nelsen's catalogue.
//!
//! $$
//! \varphi_\theta(t)=\left(t^{-1/\theta}-1\right)^\theta,\qquad
//! \tau=\frac{2\theta-1}{2\theta+1}
//! $$
//!
use super::check_theta;
use super::Archimedean;
use super::BivariateCopula;
use super::CopulaType;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct N14 {
  pub theta: f64,
}

impl N14 {
  pub fn new(theta: f64) -> Result<Self> {
    check_theta(CopulaType::N14, theta)?;
    Ok(Self { theta })
  }
}

pub(crate) fn theta_from_tau(tau: f64) -> f64 {
  (1.0 + tau) / (2.0 * (1.0 - tau))
}

impl BivariateCopula for N14 {
  fn r#type(&self) -> CopulaType {
    CopulaType::N14
  }

  fn params(&self) -> Vec<f64> {
    vec![self.theta]
  }

  fn density(&self, u: f64, v: f64) -> f64 {
    self.generator_density(u, v)
  }

  fn kendall_tau(&self) -> f64 {
    (2.0 * self.theta - 1.0) / (2.0 * self.theta + 1.0)
  }
}

impl Archimedean for N14 {
  fn theta(&self) -> f64 {
    self.theta
  }

  fn generator(&self, t: f64) -> f64 {
    (t.powf(-1.0 / self.theta) - 1.0).powf(self.theta)
  }

  fn generator_d1(&self, t: f64) -> f64 {
    let a = t.powf(-1.0 / self.theta) - 1.0;
    -a.powf(self.theta - 1.0) * t.powf(-1.0 / self.theta - 1.0)
  }

  fn generator_d2(&self, t: f64) -> f64 {
    let theta = self.theta;
    let a = t.powf(-1.0 / theta) - 1.0;
    let first = if theta == 1.0 {
      0.0
    } else {
      (theta - 1.0) / theta * a.powf(theta - 2.0) * t.powf(-2.0 / theta - 2.0)
    };
    first + (1.0 + 1.0 / theta) * a.powf(theta - 1.0) * t.powf(-1.0 / theta - 2.0)
  }

  fn generator_inv(&self, s: f64) -> f64 {
    (1.0 + s.powf(1.0 / self.theta)).powf(-self.theta)
  }
}
