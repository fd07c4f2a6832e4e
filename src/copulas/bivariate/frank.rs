//! # Frank
//!
//! $$
//! C_\theta(u,v)=-\frac{1}{\theta}\ln\left(1+\frac{(e^{-\theta u}-1)(e^{-\theta v}-1)}{e^{-\theta}-1}\right),\qquad
//! \tau=1-\frac{4}{\theta}\left(1-D_1(\theta)\right)
//! $$
//!
use gauss_quad::GaussLegendre;

use super::check_theta;
use super::invert_tau;
use super::Archimedean;
use super::BivariateCopula;
use super::CopulaType;
use crate::error::CopulaError;
use crate::error::Result;

/// Search bracket for the tau inversion. `tau(200) > 0.98`.
const THETA_SEARCH: f64 = 200.0;

#[derive(Debug, Clone)]
pub struct Frank {
  pub theta: f64,
}

impl Frank {
  pub fn new(theta: f64) -> Result<Self> {
    check_theta(CopulaType::Frank, theta)?;
    Ok(Self { theta })
  }

  fn g(&self, z: f64) -> f64 {
    (-self.theta * z).exp_m1()
  }
}

/// Debye function of the first kind, `D_1(x) = x^{-1} \int_0^x t / (e^t - 1) dt`.
fn debye1(quad: &GaussLegendre, x: f64) -> f64 {
  let integrand = |t: f64| if t == 0.0 { 1.0 } else { t / t.exp_m1() };
  quad.integrate(0.0, x, integrand) / x
}

fn tau_of_theta(quad: &GaussLegendre, theta: f64) -> f64 {
  if theta.abs() < 1e-10 {
    return 0.0;
  }
  1.0 - 4.0 / theta * (1.0 - debye1(quad, theta))
}

fn legendre() -> Result<GaussLegendre> {
  GaussLegendre::new(64).map_err(|e| CopulaError::Integration(e.to_string()))
}

pub(crate) fn theta_from_tau(tau: f64) -> Result<f64> {
  if tau == 0.0 {
    return Ok(0.0);
  }
  let quad = legendre()?;
  invert_tau(|theta| tau_of_theta(&quad, theta), tau, -THETA_SEARCH, THETA_SEARCH)
}

impl BivariateCopula for Frank {
  fn r#type(&self) -> CopulaType {
    CopulaType::Frank
  }

  fn params(&self) -> Vec<f64> {
    vec![self.theta]
  }

  fn density(&self, u: f64, v: f64) -> f64 {
    let theta = self.theta;
    if theta == 0.0 {
      return 1.0;
    }

    let num = -theta * self.g(1.0) * (1.0 + self.g(u + v));
    let den = self.g(u) * self.g(v) + self.g(1.0);
    num / (den * den)
  }

  fn kendall_tau(&self) -> f64 {
    match legendre() {
      Ok(quad) => tau_of_theta(&quad, self.theta),
      Err(_) => f64::NAN,
    }
  }
}

impl Archimedean for Frank {
  fn theta(&self) -> f64 {
    self.theta
  }

  fn generator(&self, t: f64) -> f64 {
    -(self.g(t) / self.g(1.0)).ln()
  }

  fn generator_d1(&self, t: f64) -> f64 {
    let e = (-self.theta * t).exp();
    self.theta * e / self.g(t)
  }

  fn generator_d2(&self, t: f64) -> f64 {
    let e = (-self.theta * t).exp();
    let g = self.g(t);
    self.theta * self.theta * e / (g * g)
  }

  fn generator_inv(&self, s: f64) -> f64 {
    -(1.0 + (-s).exp() * self.g(1.0)).ln() / self.theta
  }

  fn cdf(&self, u: f64, v: f64) -> f64 {
    if self.theta == 0.0 {
      return u * v;
    }
    -(1.0 + self.g(u) * self.g(v) / self.g(1.0)).ln() / self.theta
  }
}
