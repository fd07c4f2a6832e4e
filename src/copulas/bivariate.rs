//! # Bivariate
//!
//! $$
//! C(u,v)=\psi\left(\varphi(u)+\varphi(v)\right),\qquad
//! \tau_C = 1 + 4\int_0^1 \frac{\varphi(t)}{\varphi'(t)}\,dt
//! $$
//!
use std::fmt::Debug;
use std::str::FromStr;

use gauss_quad::GaussLegendre;
use ndarray::Array1;
use ndarray::Array2;
use roots::find_root_brent;
use roots::SimpleConvergency;

use crate::error::CopulaError;
use crate::error::Result;

pub mod clayton;
pub mod frank;
pub mod gaussian;
pub mod gumbel;
pub mod joe;
pub mod n13;
pub mod n14;
pub mod student;

pub use clayton::Clayton;
pub use frank::Frank;
pub use gaussian::GaussianCopula;
pub use gumbel::Gumbel;
pub use joe::Joe;
pub use n13::N13;
pub use n14::N14;
pub use student::StudentCopula;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopulaType {
  Gumbel,
  Clayton,
  Frank,
  Joe,
  N13,
  N14,
  Gaussian,
  Student,
}

/// Name lookup used by [`CopulaType::from_str`].
const FAMILY_NAMES: [(&str, CopulaType); 9] = [
  ("gumbel", CopulaType::Gumbel),
  ("clayton", CopulaType::Clayton),
  ("frank", CopulaType::Frank),
  ("joe", CopulaType::Joe),
  ("n13", CopulaType::N13),
  ("n14", CopulaType::N14),
  ("gaussian", CopulaType::Gaussian),
  ("student", CopulaType::Student),
  ("student-t", CopulaType::Student),
];

impl CopulaType {
  /// Families parameterized by a single scalar fitted from Kendall's tau.
  pub const ARCHIMEDEAN: [CopulaType; 6] = [
    CopulaType::Gumbel,
    CopulaType::Clayton,
    CopulaType::Frank,
    CopulaType::Joe,
    CopulaType::N13,
    CopulaType::N14,
  ];

  pub fn is_elliptical(self) -> bool {
    matches!(self, CopulaType::Gaussian | CopulaType::Student)
  }

  /// Admissible parameter range. For elliptical families this is the range of rho.
  pub fn theta_bounds(self) -> (f64, f64) {
    match self {
      CopulaType::Gumbel | CopulaType::Joe | CopulaType::N14 => (1.0, f64::INFINITY),
      CopulaType::Clayton => (-1.0, f64::INFINITY),
      CopulaType::Frank => (f64::NEG_INFINITY, f64::INFINITY),
      CopulaType::N13 => (0.0, f64::INFINITY),
      CopulaType::Gaussian | CopulaType::Student => (-1.0, 1.0),
    }
  }

  /// Translate Kendall's tau into the family parameter.
  ///
  /// Archimedean families are clamped to the range they can express, e.g. a
  /// negative tau maps Gumbel to independence (`theta = 1`). Elliptical
  /// families return `rho = sin(pi * tau / 2)`.
  pub fn tau_to_theta(self, tau: f64) -> Result<f64> {
    if !(-1.0..=1.0).contains(&tau) {
      return Err(CopulaError::InvalidParameter(format!(
        "Kendall's tau must be in [-1, 1], got {tau}"
      )));
    }

    let theta = match self {
      CopulaType::Gumbel => gumbel::theta_from_tau(tau),
      CopulaType::Clayton => clayton::theta_from_tau(tau),
      CopulaType::Frank => frank::theta_from_tau(tau)?,
      CopulaType::Joe => joe::theta_from_tau(tau)?,
      CopulaType::N13 => n13::theta_from_tau(tau)?,
      CopulaType::N14 => n14::theta_from_tau(tau),
      CopulaType::Gaussian | CopulaType::Student => (std::f64::consts::FRAC_PI_2 * tau).sin(),
    };

    let (lower, upper) = self.theta_bounds();
    let theta = theta.max(lower).min(upper);
    if !theta.is_finite() {
      return Err(CopulaError::InvalidParameter(format!(
        "tau = {tau} has no finite {self:?} parameter"
      )));
    }

    Ok(theta)
  }
}

impl FromStr for CopulaType {
  type Err = CopulaError;

  fn from_str(s: &str) -> Result<Self> {
    let key = s.trim().to_lowercase();
    FAMILY_NAMES
      .iter()
      .find(|(name, _)| *name == key)
      .map(|(_, family)| *family)
      .ok_or_else(|| CopulaError::InvalidParameter(format!("unknown copula family `{s}`")))
  }
}

/// Parameters handed to [`choose_copula`].
#[derive(Debug, Clone)]
pub enum CopulaParams {
  Theta(f64),
  Covariance {
    cov: Array2<f64>,
    dof: Option<f64>,
  },
}

/// Build a copula of the given family from its parameters.
pub fn choose_copula(family: CopulaType, params: CopulaParams) -> Result<Box<dyn BivariateCopula>> {
  match (family, params) {
    (CopulaType::Gumbel, CopulaParams::Theta(theta)) => Ok(Box::new(Gumbel::new(theta)?)),
    (CopulaType::Clayton, CopulaParams::Theta(theta)) => Ok(Box::new(Clayton::new(theta)?)),
    (CopulaType::Frank, CopulaParams::Theta(theta)) => Ok(Box::new(Frank::new(theta)?)),
    (CopulaType::Joe, CopulaParams::Theta(theta)) => Ok(Box::new(Joe::new(theta)?)),
    (CopulaType::N13, CopulaParams::Theta(theta)) => Ok(Box::new(N13::new(theta)?)),
    (CopulaType::N14, CopulaParams::Theta(theta)) => Ok(Box::new(N14::new(theta)?)),
    (CopulaType::Gaussian, CopulaParams::Covariance { cov, .. }) => {
      Ok(Box::new(GaussianCopula::from_cov(&cov)?))
    }
    (CopulaType::Student, CopulaParams::Covariance { cov, dof }) => {
      let dof = dof.ok_or(CopulaError::MissingParameter("dof"))?;
      Ok(Box::new(StudentCopula::from_cov(&cov, dof)?))
    }
    (family, CopulaParams::Theta(_)) => Err(CopulaError::InvalidFamily(family)),
    (family, CopulaParams::Covariance { .. }) => Err(CopulaError::InvalidParameter(format!(
      "{family:?} is parameterized by a scalar theta, not a covariance matrix"
    ))),
  }
}

/// A fitted bivariate copula.
pub trait BivariateCopula: Debug + Send + Sync {
  fn r#type(&self) -> CopulaType;

  /// Fitted parameters: `[theta]`, `[rho]` or `[rho, dof]`.
  fn params(&self) -> Vec<f64>;

  /// Copula density `c(u, v)`.
  fn density(&self, u: f64, v: f64) -> f64;

  /// Kendall's tau implied by the fitted parameters.
  fn kendall_tau(&self) -> f64;

  /// Row-wise density of an `(n x 2)` matrix of uniforms.
  #[allow(non_snake_case)]
  fn pdf(&self, X: &Array2<f64>) -> Array1<f64> {
    X.rows().into_iter().map(|row| self.density(row[0], row[1])).collect()
  }

  #[allow(non_snake_case)]
  fn log_pdf(&self, X: &Array2<f64>) -> Array1<f64> {
    self.pdf(X).ln()
  }
}

/// Generator form of an Archimedean copula.
pub trait Archimedean {
  fn theta(&self) -> f64;

  fn generator(&self, t: f64) -> f64;

  fn generator_d1(&self, t: f64) -> f64;

  fn generator_d2(&self, t: f64) -> f64;

  fn generator_inv(&self, s: f64) -> f64;

  fn cdf(&self, u: f64, v: f64) -> f64 {
    self.generator_inv(self.generator(u) + self.generator(v))
  }

  /// `c(u,v) = -phi''(C) phi'(u) phi'(v) / phi'(C)^3`
  fn generator_density(&self, u: f64, v: f64) -> f64 {
    let c = self.cdf(u, v);
    -self.generator_d2(c) * self.generator_d1(u) * self.generator_d1(v) / self.generator_d1(c).powi(3)
  }

  /// Kendall's tau from the generator, integrated numerically.
  ///
  /// `[0, 1]` is split into panels that halve towards both ends, where
  /// `phi / phi'` stops being smooth, with a Gauss-Legendre rule on each.
  fn generator_tau(&self) -> f64 {
    let Ok(quad) = GaussLegendre::new(TAU_NODES) else {
      return f64::NAN;
    };
    let integrand = |t: f64| {
      let ratio = self.generator(t) / self.generator_d1(t);
      // 0/0 only where t rounds onto an end point, and the ratio vanishes there.
      if ratio.is_finite() {
        ratio
      } else {
        0.0
      }
    };

    let edges = tau_panel_edges();
    let integral: f64 = edges
      .windows(2)
      .map(|w| quad.integrate(w[0], w[1], integrand))
      .sum();
    1.0 + 4.0 * integral
  }
}

/// Gauss-Legendre nodes per panel of [`Archimedean::generator_tau`].
const TAU_NODES: usize = 16;

/// `0, 2^-60, ..., 1/4, 1/2, 1 - 1/4, ..., 1 - 2^-50, 1`
fn tau_panel_edges() -> Vec<f64> {
  let mut edges = vec![0.0];
  edges.extend((1..=60).rev().map(|k| 0.5f64.powi(k)));
  edges.extend((2..=50).map(|k| 1.0 - 0.5f64.powi(k)));
  edges.push(1.0);
  edges
}

pub(crate) fn check_theta(family: CopulaType, theta: f64) -> Result<()> {
  let (lower, upper) = family.theta_bounds();
  if theta.is_nan() || theta < lower || theta > upper || theta.is_infinite() {
    return Err(CopulaError::InvalidParameter(format!(
      "{family:?} theta must be finite and in [{lower}, {upper}], got {theta}"
    )));
  }
  Ok(())
}

/// Solve `tau(theta) = tau` for a tau function increasing in theta.
///
/// Targets outside `[tau(lower), tau(upper)]` are clamped to the bracket end.
pub(crate) fn invert_tau<F>(tau_of_theta: F, tau: f64, lower: f64, upper: f64) -> Result<f64>
where
  F: Fn(f64) -> f64,
{
  if tau_of_theta(lower) >= tau {
    return Ok(lower);
  }
  if tau_of_theta(upper) <= tau {
    return Ok(upper);
  }

  let mut convergency = SimpleConvergency {
    eps: 1e-12,
    max_iter: 200,
  };
  find_root_brent(lower, upper, |theta| tau_of_theta(theta) - tau, &mut convergency)
    .map_err(|e| CopulaError::Integration(format!("tau inversion did not converge: {e:?}")))
}
