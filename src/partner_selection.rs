//! # Partner Selection
//!
//! $$
//! q^\*(i)=\arg\operatorname{opt}_{\{j,k,l\}\subset N_{50}(i)} S\left(i,j,k,l\right)
//! $$
//!
//! Selection of three partner stocks for each target stock, following the
//! traditional, extended, geometric and extremal procedures of Stübinger,
//! Mangold and Krauss (2018), "Statistical arbitrage with vine copulas".

pub mod candidates;
pub mod data;
pub mod engine;
pub mod extremal;
pub mod scoring;
pub mod types;

pub use candidates::enumerate_quadruples;
pub use candidates::prepare_combinations;
pub use candidates::top_k_neighbors;
pub use data::ecdf_returns;
pub use data::ranked_returns;
pub use data::returns;
pub use engine::PartnerSelection;
pub use extremal::CovarianceCache;
pub use scoring::QuadrupleScore;
pub use types::PartnerSelectionConfig;
pub use types::SelectedQuadruple;
pub use types::SelectionMethod;
pub use types::Universe;
