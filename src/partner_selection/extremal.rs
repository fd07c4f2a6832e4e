//! # Extremal Covariance
//!
//! $$
//! \Sigma_{ij}=\int_{[0,1]^4}\prod_{d=1}^{4} f\left(u_d,l^{(i)}_d\right)
//! f\left(u_d,l^{(j)}_d\right)\,\mathrm du,\qquad
//! f(t,1)=(t-1)(3t-1),\quad f(t,2)=t(2-3t)
//! $$
//!
//! Covariance of the rank-based tail statistic under independence and its
//! inverse, used by the extremal partner-selection procedure.
use std::sync::Arc;
use std::sync::OnceLock;

use gauss_quad::GaussLegendre;
use nalgebra::DMatrix;
use ndarray::Array2;
use tracing::debug;

use crate::error::CopulaError;
use crate::error::Result;

/// Dimension of a quadruple.
pub const DIM: usize = 4;
/// Number of exponent tuples in `{1, 2}^4`.
pub const N_TUPLES: usize = 1 << DIM;

/// Exponent tuples of `{1, 2}^4` in lexicographic order.
pub fn exponent_tuples() -> [[u8; DIM]; N_TUPLES] {
  let mut out = [[1u8; DIM]; N_TUPLES];
  for (i, tuple) in out.iter_mut().enumerate() {
    for (d, l) in tuple.iter_mut().enumerate() {
      *l = 1 + ((i >> (DIM - 1 - d)) & 1) as u8;
    }
  }
  out
}

/// Tail weighting polynomial for a single coordinate.
#[inline]
pub fn tail_factor(t: f64, exponent: u8) -> f64 {
  if exponent == 1 {
    (t - 1.0) * (3.0 * t - 1.0)
  } else {
    t * (2.0 - 3.0 * t)
  }
}

fn legendre(nodes: usize) -> Result<GaussLegendre> {
  if nodes < 3 {
    return Err(CopulaError::InvalidParameter(format!(
      "need at least 3 quadrature nodes per dimension, got {nodes}"
    )));
  }
  GaussLegendre::new(nodes).map_err(|e| CopulaError::Integration(e.to_string()))
}

/// 16x16 covariance matrix by nested Gauss-Legendre quadrature over `[0, 1]^4`.
///
/// The integrands are polynomials of degree 4 per coordinate, so the rule is
/// exact from 3 nodes on. Only the upper triangle is integrated.
pub fn covariance_matrix(nodes: usize) -> Result<Array2<f64>> {
  let quad = legendre(nodes)?;
  let tuples = exponent_tuples();
  let mut cov = Array2::<f64>::zeros((N_TUPLES, N_TUPLES));

  for i in 0..N_TUPLES {
    for j in i..N_TUPLES {
      let (a, b) = (tuples[i], tuples[j]);
      let g = |d: usize, u: f64| tail_factor(u, a[d]) * tail_factor(u, b[d]);
      let value = quad.integrate(0.0, 1.0, |u0| {
        quad.integrate(0.0, 1.0, |u1| {
          quad.integrate(0.0, 1.0, |u2| {
            quad.integrate(0.0, 1.0, |u3| g(0, u0) * g(1, u1) * g(2, u2) * g(3, u3))
          })
        })
      });
      cov[[i, j]] = value;
      cov[[j, i]] = value;
    }
  }

  debug!(nodes, "integrated extremal covariance matrix");
  Ok(cov)
}

/// Inverse of a symmetric, square matrix.
pub fn invert_covariance(cov: &Array2<f64>) -> Result<Array2<f64>> {
  let (n, m) = cov.dim();
  if n != m {
    return Err(CopulaError::InvalidInputType(format!(
      "covariance must be square, got {n}x{m}"
    )));
  }
  for i in 0..n {
    for j in (i + 1)..n {
      if (cov[[i, j]] - cov[[j, i]]).abs() > 1e-10 {
        return Err(CopulaError::InvalidInputType(
          "covariance must be symmetric".into(),
        ));
      }
    }
  }

  let mat = DMatrix::from_fn(n, n, |i, j| cov[[i, j]]);
  let inv = mat.try_inverse().ok_or(CopulaError::SingularCovariance)?;
  if inv.iter().any(|v| !v.is_finite()) {
    return Err(CopulaError::SingularCovariance);
  }

  Ok(Array2::from_shape_fn((n, n), |(i, j)| inv[(i, j)]))
}

/// Inverse of [`covariance_matrix`].
pub fn inverse_covariance_matrix(nodes: usize) -> Result<Array2<f64>> {
  invert_covariance(&covariance_matrix(nodes)?)
}

/// Compute-once holder for the inverse extremal covariance matrix.
///
/// Share it through an `Arc` between engines that use the same quadrature.
#[derive(Debug)]
pub struct CovarianceCache {
  nodes: usize,
  inner: OnceLock<Arc<Array2<f64>>>,
}

impl CovarianceCache {
  pub fn new(nodes: usize) -> Self {
    Self {
      nodes,
      inner: OnceLock::new(),
    }
  }

  pub fn nodes(&self) -> usize {
    self.nodes
  }

  /// Inverse covariance matrix, computed on the first call.
  ///
  /// A failed computation is not cached.
  pub fn get(&self) -> Result<Arc<Array2<f64>>> {
    if let Some(inv) = self.inner.get() {
      return Ok(Arc::clone(inv));
    }
    let inv = Arc::new(inverse_covariance_matrix(self.nodes)?);
    Ok(Arc::clone(self.inner.get_or_init(|| inv)))
  }
}

impl Default for CovarianceCache {
  fn default() -> Self {
    Self::new(8)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;

  use super::*;

  fn agreement(i: usize, j: usize) -> i32 {
    let t = exponent_tuples();
    (0..DIM).filter(|&d| t[i][d] == t[j][d]).count() as i32
  }

  #[test]
  fn tuples_are_lexicographic() {
    let t = exponent_tuples();
    assert_eq!(t[0], [1, 1, 1, 1]);
    assert_eq!(t[1], [1, 1, 1, 2]);
    assert_eq!(t[2], [1, 1, 2, 1]);
    assert_eq!(t[15], [2, 2, 2, 2]);
  }

  #[test]
  fn covariance_entries_factorize() {
    let cov = covariance_matrix(8).unwrap();
    for i in 0..N_TUPLES {
      for j in 0..N_TUPLES {
        let same = agreement(i, j);
        let expected = (2.0f64 / 15.0).powi(same) * (1.0f64 / 30.0).powi(DIM as i32 - same);
        assert_relative_eq!(cov[[i, j]], expected, max_relative = 1e-10);
        assert_abs_diff_eq!(cov[[i, j]], cov[[j, i]], epsilon = 1e-10);
      }
    }
  }

  #[test]
  fn inverse_has_closed_form() {
    let inv = inverse_covariance_matrix(5).unwrap();
    for i in 0..N_TUPLES {
      for j in 0..N_TUPLES {
        let same = agreement(i, j);
        let expected = 8f64.powi(same) * (-2f64).powi(DIM as i32 - same);
        assert_abs_diff_eq!(inv[[i, j]], expected, epsilon = 1e-6);
      }
    }
  }

  #[test]
  fn double_inversion_is_identity() {
    let cov = covariance_matrix(6).unwrap();
    let back = invert_covariance(&invert_covariance(&cov).unwrap()).unwrap();
    for (a, b) in cov.iter().zip(back.iter()) {
      assert_relative_eq!(*a, *b, max_relative = 1e-8);
    }
  }

  #[test]
  fn rejects_bad_inputs() {
    assert!(matches!(
      covariance_matrix(2),
      Err(CopulaError::InvalidParameter(_))
    ));
    assert_eq!(
      invert_covariance(&Array2::zeros((3, 3))).unwrap_err(),
      CopulaError::SingularCovariance
    );
  }

  #[test]
  fn cache_computes_once() {
    let cache = CovarianceCache::default();
    assert_eq!(cache.nodes(), 8);
    let a = cache.get().unwrap();
    let b = cache.get().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.dim(), (N_TUPLES, N_TUPLES));
  }
}
