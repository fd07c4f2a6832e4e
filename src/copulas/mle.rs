//! # Maximum likelihood
//!
//! $$
//! \hat\theta=\tau_C^{-1}(\hat\tau),\qquad
//! \ell(\hat\theta)=\sum_{i=1}^n \ln c_{\hat\theta}(u_i,v_i)
//! $$
//!
use ndarray::Array2;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;
use tracing::debug;
use tracing::info;

use super::bivariate::choose_copula;
use super::bivariate::student::student_t;
use super::bivariate::BivariateCopula;
use super::bivariate::CopulaParams;
use super::bivariate::CopulaType;
use super::correlation::empirical_covariance;
use super::correlation::kendall_tau;
use super::criteria::aic;
use super::criteria::hqic;
use super::criteria::sic;
use crate::error::CopulaError;
use crate::error::Result;

fn check_marginals(x: &[f64], y: &[f64]) -> Result<()> {
  if x.is_empty() || y.is_empty() {
    return Err(CopulaError::EmptyInput);
  }
  if x.len() != y.len() {
    return Err(CopulaError::InvalidInputType(format!(
      "marginals must have equal length, got {} and {}",
      x.len(),
      y.len()
    )));
  }
  if x.iter().chain(y).any(|u| !(0.0..=1.0).contains(u)) {
    return Err(CopulaError::InvalidInputType(
      "marginal values must be in the interval [0, 1]".into(),
    ));
  }
  Ok(())
}

/// Elliptical fits map marginals through a quantile function, which is
/// infinite at 0 and 1.
fn check_open_marginals(x: &[f64], y: &[f64], family: CopulaType) -> Result<()> {
  if x.iter().chain(y).any(|&u| u == 0.0 || u == 1.0) {
    return Err(CopulaError::InvalidInputType(format!(
      "{family:?} marginals must lie strictly inside (0, 1); bound the ECDF away from 0 and 1"
    )));
  }
  Ok(())
}

/// Empirical theta of an Archimedean family from Kendall's tau.
///
/// `x` and `y` must already be uniform marginals.
pub fn fit_theta(x: &[f64], y: &[f64], family: CopulaType) -> Result<f64> {
  if family.is_elliptical() {
    return Err(CopulaError::InvalidFamily(family));
  }
  check_marginals(x, y)?;

  let tau = kendall_tau(x, y)?;
  let theta = family.tau_to_theta(tau)?;
  debug!(?family, tau, theta, "fitted theta from Kendall's tau");

  Ok(theta)
}

/// Sum of log densities of `model` at every `(x_i, y_i)`.
pub fn log_likelihood(model: &dyn BivariateCopula, x: &[f64], y: &[f64]) -> Result<f64> {
  check_marginals(x, y)?;

  let mut sum = 0.0;
  for (index, (&u, &v)) in x.iter().zip(y).enumerate() {
    let density = model.density(u, v);
    if !(density > 0.0) || !density.is_finite() {
      return Err(CopulaError::DegenerateFit { index, density });
    }
    sum += density.ln();
  }

  Ok(sum)
}

/// Empirical covariance of the marginals mapped through `quantile`.
fn quantile_covariance<F>(x: &[f64], y: &[f64], quantile: F) -> Result<Array2<f64>>
where
  F: Fn(f64) -> f64,
{
  let mut values = Array2::<f64>::zeros((x.len(), 2));
  for (i, (&u, &v)) in x.iter().zip(y).enumerate() {
    values[[i, 0]] = quantile(u);
    values[[i, 1]] = quantile(v);
  }
  empirical_covariance(values.view())
}

/// Fit `family` to uniform marginals and return `(log_likelihood, model)`.
///
/// Archimedean families are fitted through Kendall's tau. Gaussian and
/// Student-t families are fitted from the covariance of the marginals mapped
/// through the normal or Student-t quantile function; Student-t requires `dof`.
pub fn fit_and_score(
  x: &[f64],
  y: &[f64],
  family: CopulaType,
  dof: Option<f64>,
) -> Result<(f64, Box<dyn BivariateCopula>)> {
  check_marginals(x, y)?;
  if family.is_elliptical() {
    check_open_marginals(x, y, family)?;
  }

  let model = match family {
    CopulaType::Gaussian => {
      let std_norm =
        Normal::new(0.0, 1.0).map_err(|e| CopulaError::InvalidParameter(e.to_string()))?;
      let cov = quantile_covariance(x, y, |u| std_norm.inverse_cdf(u))?;
      choose_copula(family, CopulaParams::Covariance { cov, dof: None })?
    }
    CopulaType::Student => {
      let dof = dof.ok_or(CopulaError::MissingParameter("dof"))?;
      let t_dist = student_t(dof)?;
      let cov = quantile_covariance(x, y, |u| t_dist.inverse_cdf(u))?;
      choose_copula(
        family,
        CopulaParams::Covariance {
          cov,
          dof: Some(dof),
        },
      )?
    }
    _ => {
      let theta = fit_theta(x, y, family)?;
      choose_copula(family, CopulaParams::Theta(theta))?
    }
  };

  let ll = log_likelihood(model.as_ref(), x, y)?;
  debug!(?family, params = ?model.params(), log_likelihood = ll, "scored copula");

  Ok((ll, model))
}

/// Fitted model together with its information criteria.
#[derive(Debug)]
pub struct FitSummary {
  pub family: CopulaType,
  pub log_likelihood: f64,
  pub sic: f64,
  pub aic: f64,
  pub hqic: f64,
  pub model: Box<dyn BivariateCopula>,
}

/// Number of parameters estimated for a family.
pub fn parameter_count(family: CopulaType) -> usize {
  match family {
    CopulaType::Student => 2,
    _ => 1,
  }
}

/// Fit every family in `families` and compute SIC, AIC and HQIC for each.
///
/// Stops at the first family that fails to fit.
pub fn fit_all(
  x: &[f64],
  y: &[f64],
  families: &[CopulaType],
  dof: Option<f64>,
) -> Result<Vec<FitSummary>> {
  let n = x.len();
  let mut out = Vec::with_capacity(families.len());

  for &family in families {
    let (ll, model) = fit_and_score(x, y, family, dof)?;
    let k = parameter_count(family);
    out.push(FitSummary {
      family,
      log_likelihood: ll,
      sic: sic(ll, n, k)?,
      aic: aic(ll, n, k)?,
      hqic: hqic(ll, n, k)?,
      model,
    });
  }

  if let Some(best) = out
    .iter()
    .min_by(|a, b| a.sic.total_cmp(&b.sic))
  {
    info!(family = ?best.family, sic = best.sic, "best copula by SIC");
  }

  Ok(out)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use rand::rngs::StdRng;
  use rand::Rng;
  use rand::SeedableRng;
  use rand_distr::StandardNormal;
  use tracing_test::traced_test;

  use super::*;
  use crate::copulas::bivariate::Clayton;
  use crate::copulas::empirical::Ecdf;

  /// Pseudo-observations of a Gaussian sample with correlation `rho`.
  fn gaussian_pseudo_obs(n: usize, rho: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for _ in 0..n {
      let z1: f64 = rng.sample(StandardNormal);
      let z2: f64 = rng.sample(StandardNormal);
      a.push(z1);
      b.push(rho * z1 + (1.0 - rho * rho).sqrt() * z2);
    }
    let ea = Ecdf::new(&a).unwrap();
    let eb = Ecdf::new(&b).unwrap();
    (
      a.iter().map(|&v| ea.cdf(v)).collect(),
      b.iter().map(|&v| eb.cdf(v)).collect(),
    )
  }

  #[test]
  fn fit_theta_rejects_elliptical_families() {
    let (x, y) = gaussian_pseudo_obs(50, 0.5, 1);
    assert_eq!(
      fit_theta(&x, &y, CopulaType::Gaussian).unwrap_err(),
      CopulaError::InvalidFamily(CopulaType::Gaussian)
    );
    assert_eq!(
      fit_theta(&x, &y, CopulaType::Student).unwrap_err(),
      CopulaError::InvalidFamily(CopulaType::Student)
    );
  }

  #[test]
  fn fit_theta_matches_closed_form_inversion() {
    let (x, y) = gaussian_pseudo_obs(300, 0.6, 2);
    let tau = kendall_tau(&x, &y).unwrap();
    let theta = fit_theta(&x, &y, CopulaType::Clayton).unwrap();
    assert_abs_diff_eq!(theta, 2.0 * tau / (1.0 - tau), epsilon = 1e-12);
  }

  #[test]
  fn student_requires_degrees_of_freedom() {
    let (x, y) = gaussian_pseudo_obs(50, 0.5, 3);
    let err = fit_and_score(&x, &y, CopulaType::Student, None).unwrap_err();
    assert_eq!(err, CopulaError::MissingParameter("dof"));
  }

  #[test]
  fn log_likelihood_round_trips_for_every_family() {
    let (x, y) = gaussian_pseudo_obs(400, 0.55, 4);
    let families = [
      CopulaType::Gumbel,
      CopulaType::Clayton,
      CopulaType::Frank,
      CopulaType::Joe,
      CopulaType::N13,
      CopulaType::N14,
      CopulaType::Gaussian,
      CopulaType::Student,
    ];

    for family in families {
      let (ll, model) = fit_and_score(&x, &y, family, Some(4.0)).unwrap();
      let direct: f64 = x
        .iter()
        .zip(&y)
        .map(|(&u, &v)| model.density(u, v).ln())
        .sum();
      assert_relative_eq!(ll, direct, max_relative = 1e-12);
      assert_eq!(model.r#type(), family);
    }
  }

  #[test]
  fn elliptical_fit_recovers_correlation() {
    let (x, y) = gaussian_pseudo_obs(2000, 0.7, 5);
    let (_, model) = fit_and_score(&x, &y, CopulaType::Gaussian, None).unwrap();
    assert_abs_diff_eq!(model.params()[0], 0.7, epsilon = 0.05);

    let (_, model) = fit_and_score(&x, &y, CopulaType::Student, Some(6.0)).unwrap();
    assert_eq!(model.params()[1], 6.0);
  }

  #[test]
  fn non_positive_density_is_degenerate() {
    let model = Clayton::new(-0.8).unwrap();
    let err = log_likelihood(&model, &[0.9, 0.05], &[0.9, 0.05]).unwrap_err();
    assert!(matches!(err, CopulaError::DegenerateFit { index: 1, .. }));
  }

  #[test]
  fn rejects_values_outside_unit_interval() {
    let err = fit_and_score(&[0.2, 1.5], &[0.3, 0.4], CopulaType::Frank, None).unwrap_err();
    assert!(matches!(err, CopulaError::InvalidInputType(_)));
    assert_eq!(
      fit_and_score(&[], &[], CopulaType::Frank, None).unwrap_err(),
      CopulaError::EmptyInput
    );
  }

  #[test]
  fn elliptical_fits_reject_marginals_on_the_boundary() {
    let (mut x, y) = gaussian_pseudo_obs(50, 0.5, 7);
    x[3] = 1.0;
    for (family, dof) in [(CopulaType::Gaussian, None), (CopulaType::Student, Some(4.0))] {
      let err = fit_and_score(&x, &y, family, dof).unwrap_err();
      assert!(matches!(err, CopulaError::InvalidInputType(ref m) if m.contains("(0, 1)")));
    }

    x[3] = 0.0;
    let err = fit_and_score(&x, &y, CopulaType::Gaussian, None).unwrap_err();
    assert!(matches!(err, CopulaError::InvalidInputType(_)));

    // Archimedean families fit through ranks and accept the end points.
    x[3] = 0.5;
    let mut y = y;
    y[0] = 1.0;
    assert!(fit_theta(&x, &y, CopulaType::Clayton).is_ok());
  }

  #[test]
  #[traced_test]
  fn fit_all_prefers_gaussian_on_gaussian_data() {
    let (x, y) = gaussian_pseudo_obs(1000, 0.7, 6);
    let fits = fit_all(
      &x,
      &y,
      &[CopulaType::Gaussian, CopulaType::Clayton, CopulaType::Gumbel],
      None,
    )
    .unwrap();

    assert_eq!(fits.len(), 3);
    assert!(fits[0].sic < fits[1].sic);
    assert!(fits[0].sic < fits[2].sic);
    for fit in &fits {
      assert!(fit.aic.is_finite() && fit.hqic.is_finite());
    }
    assert!(logs_contain("best copula by SIC"));
  }
}
