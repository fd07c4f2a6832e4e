//! # copula-partners
//!
//! $$
//! F_{X_1,\dots,X_d}(x)=C\left(F_1(x_1),\dots,F_d(x_d)\right)
//! $$
//!
//! Bivariate copula fitting by maximum likelihood and vine-copula partner
//! selection over quadruples of assets.
//!
//! - [`copulas`]: empirical CDF, copula families, Kendall's tau, ML fitting and
//!   information criteria.
//! - [`partner_selection`]: return preparation, candidate generation and the
//!   four quadruple scorers (traditional, extended, geometric, extremal).
#![allow(clippy::needless_range_loop)]

pub mod copulas;
pub mod error;
pub mod partner_selection;

pub use error::CopulaError;
pub use error::Result;
