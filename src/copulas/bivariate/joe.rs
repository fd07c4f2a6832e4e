//! # Joe
//!
//! $$
//! C_\theta(u,v)=1-\left(\bar u^\theta+\bar v^\theta-\bar u^\theta\bar v^\theta\right)^{1/\theta},\qquad
//! \bar u = 1-u
//! $$
//!
use super::check_theta;
use super::invert_tau;
use super::Archimedean;
use super::BivariateCopula;
use super::CopulaType;
use crate::error::Result;

const THETA_SEARCH_MAX: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct Joe {
  pub theta: f64,
}

impl Joe {
  pub fn new(theta: f64) -> Result<Self> {
    check_theta(CopulaType::Joe, theta)?;
    Ok(Self { theta })
  }
}

impl Joe {
  /// `((1 - t)^theta, 1 - (1 - t)^theta)`, both without cancellation.
  fn tail_power(&self, t: f64) -> (f64, f64) {
    let log_w = self.theta * (-t).ln_1p();
    (log_w.exp(), -log_w.exp_m1())
  }
}

pub(crate) fn theta_from_tau(tau: f64) -> Result<f64> {
  invert_tau(|theta| Joe { theta }.generator_tau(), tau, 1.0, THETA_SEARCH_MAX)
}

impl BivariateCopula for Joe {
  fn r#type(&self) -> CopulaType {
    CopulaType::Joe
  }

  fn params(&self) -> Vec<f64> {
    vec![self.theta]
  }

  fn density(&self, u: f64, v: f64) -> f64 {
    let theta = self.theta;
    let ut = (1.0 - u).powf(theta);
    let vt = (1.0 - v).powf(theta);
    let s = ut + vt - ut * vt;

    s.powf(1.0 / theta - 2.0)
      * (1.0 - u).powf(theta - 1.0)
      * (1.0 - v).powf(theta - 1.0)
      * (theta - 1.0 + s)
  }

  fn kendall_tau(&self) -> f64 {
    self.generator_tau()
  }
}

impl Archimedean for Joe {
  fn theta(&self) -> f64 {
    self.theta
  }

  fn generator(&self, t: f64) -> f64 {
    let (w, one_minus_w) = self.tail_power(t);
    if w < 0.5 {
      -(-w).ln_1p()
    } else {
      -one_minus_w.ln()
    }
  }

  fn generator_d1(&self, t: f64) -> f64 {
    let (_, one_minus_w) = self.tail_power(t);
    -self.theta * ((self.theta - 1.0) * (-t).ln_1p()).exp() / one_minus_w
  }

  fn generator_d2(&self, t: f64) -> f64 {
    let theta = self.theta;
    let (_, one_minus_w) = self.tail_power(t);
    let a = theta * (theta - 1.0) * (1.0 - t).powf(theta - 2.0) / one_minus_w;
    let b = theta * theta * (1.0 - t).powf(2.0 * theta - 2.0) / (one_minus_w * one_minus_w);
    a + b
  }

  fn generator_inv(&self, s: f64) -> f64 {
    1.0 - (-(-s).exp_m1()).powf(1.0 / self.theta)
  }

  fn cdf(&self, u: f64, v: f64) -> f64 {
    let ut = (1.0 - u).powf(self.theta);
    let vt = (1.0 - v).powf(self.theta);
    1.0 - (ut + vt - ut * vt).powf(1.0 / self.theta)
  }
}
