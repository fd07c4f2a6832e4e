//! # Copulas
//!
//! $$
//! c(u,v)=\frac{\partial^2 C(u,v)}{\partial u\,\partial v}
//! $$
//!
pub mod bivariate;
pub mod correlation;
pub mod criteria;
pub mod empirical;
pub mod mle;

pub use crate::error::Result;
