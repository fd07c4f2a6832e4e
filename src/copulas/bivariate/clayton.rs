//! # Clayton
//!
//! $$
//! C_\theta(u,v)=\max\left(u^{-\theta}+v^{-\theta}-1,0\right)^{-1/\theta},\qquad
//! \tau=\frac{\theta}{\theta+2}
//! $$
//!
use super::check_theta;
use super::Archimedean;
use super::BivariateCopula;
use super::CopulaType;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Clayton {
  pub theta: f64,
}

impl Clayton {
  pub fn new(theta: f64) -> Result<Self> {
    check_theta(CopulaType::Clayton, theta)?;
    Ok(Self { theta })
  }
}

pub(crate) fn theta_from_tau(tau: f64) -> f64 {
  2.0 * tau / (1.0 - tau)
}

impl BivariateCopula for Clayton {
  fn r#type(&self) -> CopulaType {
    CopulaType::Clayton
  }

  fn params(&self) -> Vec<f64> {
    vec![self.theta]
  }

  fn density(&self, u: f64, v: f64) -> f64 {
    let theta = self.theta;
    if theta == 0.0 {
      return 1.0;
    }

    let b = u.powf(-theta) + v.powf(-theta) - 1.0;
    if b <= 0.0 {
      return 0.0;
    }

    let a = (theta + 1.0) * (u * v).powf(-theta - 1.0);
    let c = -(2.0 * theta + 1.0) / theta;
    a * b.powf(c)
  }

  fn kendall_tau(&self) -> f64 {
    self.theta / (self.theta + 2.0)
  }
}

impl Archimedean for Clayton {
  fn theta(&self) -> f64 {
    self.theta
  }

  fn generator(&self, t: f64) -> f64 {
    if self.theta == 0.0 {
      return -t.ln();
    }
    (t.powf(-self.theta) - 1.0) / self.theta
  }

  fn generator_d1(&self, t: f64) -> f64 {
    -t.powf(-self.theta - 1.0)
  }

  fn generator_d2(&self, t: f64) -> f64 {
    (self.theta + 1.0) * t.powf(-self.theta - 2.0)
  }

  fn generator_inv(&self, s: f64) -> f64 {
    if self.theta == 0.0 {
      return (-s).exp();
    }
    (1.0 + self.theta * s).max(0.0).powf(-1.0 / self.theta)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn cdf_matches_closed_form() {
    let copula = Clayton::new(2.0).unwrap();
    let (u, v) = (0.3_f64, 0.6_f64);
    let expected = (u.powf(-2.0) + v.powf(-2.0) - 1.0).powf(-0.5);
    assert_abs_diff_eq!(copula.cdf(u, v), expected, epsilon = 1e-12);
  }

  #[test]
  fn zero_theta_is_independence() {
    let copula = Clayton::new(0.0).unwrap();
    assert_eq!(copula.density(0.2, 0.9), 1.0);
    assert_abs_diff_eq!(copula.cdf(0.2, 0.9), 0.18, epsilon = 1e-12);
  }

  #[test]
  fn negative_theta_has_zero_density_outside_support() {
    let copula = Clayton::new(-0.8).unwrap();
    assert_eq!(copula.density(0.05, 0.05), 0.0);
    assert!(copula.density(0.9, 0.9) > 0.0);
  }
}
