//! # Information criteria
//!
//! $$
//! \mathrm{SIC}=k\ln n-2\ell,\qquad
//! \mathrm{AIC}=\frac{2n}{n-k-1}k-2\ell,\qquad
//! \mathrm{HQIC}=2k\ln\ln n-2\ell
//! $$
//!
//! Lower values indicate a better fit.
use crate::error::CopulaError;
use crate::error::Result;

fn check(n: usize, k: usize, min_n: usize) -> Result<()> {
  if k == 0 || n < min_n {
    return Err(CopulaError::InvalidSampleSize { n, k });
  }
  Ok(())
}

/// Schwarz (Bayesian) information criterion.
pub fn sic(log_likelihood: f64, n: usize, k: usize) -> Result<f64> {
  check(n, k, 1)?;
  Ok((n as f64).ln() * k as f64 - 2.0 * log_likelihood)
}

/// Small-sample corrected Akaike information criterion. Requires `n > k + 1`.
pub fn aic(log_likelihood: f64, n: usize, k: usize) -> Result<f64> {
  check(n, k, k + 2)?;
  let (n, k) = (n as f64, k as f64);
  Ok((2.0 * n / (n - k - 1.0)) * k - 2.0 * log_likelihood)
}

/// Hannan-Quinn information criterion. Requires `n > 1`.
pub fn hqic(log_likelihood: f64, n: usize, k: usize) -> Result<f64> {
  check(n, k, 2)?;
  Ok(2.0 * (n as f64).ln().ln() * k as f64 - 2.0 * log_likelihood)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn known_values() {
    assert_abs_diff_eq!(sic(-5.0, 10, 1).unwrap(), 10f64.ln() + 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(aic(-5.0, 10, 1).unwrap(), 2.5 + 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(hqic(-5.0, 10, 1).unwrap(), 2.0 * 10f64.ln().ln() + 10.0, epsilon = 1e-12);
  }

  #[test]
  fn decreasing_in_log_likelihood() {
    for (lo, hi) in [(-10.0, -5.0), (-5.0, 0.0), (0.0, 12.5)] {
      assert!(sic(hi, 50, 2).unwrap() < sic(lo, 50, 2).unwrap());
      assert!(aic(hi, 50, 2).unwrap() < aic(lo, 50, 2).unwrap());
      assert!(hqic(hi, 50, 2).unwrap() < hqic(lo, 50, 2).unwrap());
    }
  }

  #[test]
  fn aic_guards_division_by_zero() {
    assert_eq!(
      aic(-5.0, 2, 1).unwrap_err(),
      CopulaError::InvalidSampleSize { n: 2, k: 1 }
    );
    assert!(aic(-5.0, 3, 1).is_ok());
  }

  #[test]
  fn hqic_and_sic_guard_sample_size() {
    assert!(hqic(-1.0, 1, 1).is_err());
    assert!(sic(-1.0, 0, 1).is_err());
    assert!(sic(-1.0, 10, 0).is_err());
  }
}
