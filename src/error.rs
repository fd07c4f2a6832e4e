//! # Errors
//!
//! $$
//! \mathcal{E} = \{\text{input}, \text{family}, \text{fit}, \text{numerics}\}
//! $$
//!
use thiserror::Error;

use crate::copulas::bivariate::CopulaType;

pub type Result<T> = std::result::Result<T, CopulaError>;

/// Errors raised by copula fitting and partner selection.
///
/// Input validation happens before any computation starts; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CopulaError {
  #[error("input does not contain any data")]
  EmptyInput,

  #[error("invalid input: {0}")]
  InvalidInputType(String),

  #[error("copula family {0:?} cannot be fitted through Kendall's tau")]
  InvalidFamily(CopulaType),

  #[error("missing required parameter `{0}`")]
  MissingParameter(&'static str),

  #[error("non-positive copula density {density} at observation {index}")]
  DegenerateFit { index: usize, density: f64 },

  #[error("sample size n = {n} is too small for k = {k} parameters")]
  InvalidSampleSize { n: usize, k: usize },

  #[error("extremal covariance matrix is singular")]
  SingularCovariance,

  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  #[error("numerical integration failed: {0}")]
  Integration(String),
}
