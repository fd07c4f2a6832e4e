//! # Partner Selection Engine
//!
//! $$
//! \hat u_{it}=\frac{\operatorname{rank}(r_{it})}{T},\qquad
//! \rho^S_{ij}=\operatorname{corr}\left(\hat u_i,\hat u_j\right)
//! $$
//!
use std::sync::Arc;

use ndarray::Array2;
use ndarray::Axis;
use rayon::prelude::*;
use tracing::debug;
use tracing::info;

use super::candidates::enumerate_quadruples;
use super::candidates::prepare_combinations;
use super::candidates::top_k_neighbors;
use super::data::ecdf_returns;
use super::data::ranked_returns;
use super::data::returns;
use super::extremal::CovarianceCache;
use super::scoring::diagonal_measure;
use super::scoring::extremal_scores;
use super::scoring::multivariate_rho;
use super::scoring::sum_correlations;
use super::scoring::QuadrupleScore;
use super::types::PartnerSelectionConfig;
use super::types::SelectedQuadruple;
use super::types::SelectionMethod;
use super::types::Universe;
use crate::copulas::correlation::correlation_matrix;
use crate::error::CopulaError;
use crate::error::Result;

/// Precomputed state for selecting partner quadruples in a universe.
#[derive(Debug)]
pub struct PartnerSelection {
  universe: Universe,
  config: PartnerSelectionConfig,
  returns: Array2<f64>,
  ranked: Array2<f64>,
  ecdf: Array2<f64>,
  corr: Array2<f64>,
  neighbors: Vec<Vec<usize>>,
  cov_cache: Arc<CovarianceCache>,
}

impl PartnerSelection {
  pub fn new(universe: Universe, config: PartnerSelectionConfig) -> Result<Self> {
    let cache = Arc::new(CovarianceCache::new(config.quadrature_nodes));
    Self::with_covariance_cache(universe, config, cache)
  }

  /// Same as [`PartnerSelection::new`] but reuses an existing extremal covariance cache.
  pub fn with_covariance_cache(
    universe: Universe,
    config: PartnerSelectionConfig,
    cov_cache: Arc<CovarianceCache>,
  ) -> Result<Self> {
    let returns = returns(universe.prices().view())?;
    let ranked = ranked_returns(returns.view());
    let ecdf = ecdf_returns(returns.view())?;
    let corr = correlation_matrix(ranked.view())?;
    let neighbors = top_k_neighbors(corr.view(), config.top_k);

    info!(
      assets = universe.n_assets(),
      observations = returns.nrows(),
      top_k = config.top_k,
      quadrature_nodes = cov_cache.nodes(),
      "prepared partner selection"
    );

    Ok(Self {
      universe,
      config,
      returns,
      ranked,
      ecdf,
      corr,
      neighbors,
      cov_cache,
    })
  }

  pub fn universe(&self) -> &Universe {
    &self.universe
  }

  pub fn config(&self) -> &PartnerSelectionConfig {
    &self.config
  }

  pub fn returns(&self) -> &Array2<f64> {
    &self.returns
  }

  pub fn ranked_returns(&self) -> &Array2<f64> {
    &self.ranked
  }

  pub fn ecdf_returns(&self) -> &Array2<f64> {
    &self.ecdf
  }

  /// Spearman correlation matrix of the returns.
  pub fn correlation(&self) -> &Array2<f64> {
    &self.corr
  }

  /// Most correlated partner candidates of `target`, best first.
  pub fn neighbors(&self, target: usize) -> Option<&[usize]> {
    self.neighbors.get(target).map(Vec::as_slice)
  }

  /// Every candidate quadruple of `target` as tickers, target first.
  pub fn all_quadruples(&self, target: usize) -> Result<Vec<[String; 4]>> {
    let neighbors = self.target_neighbors(target)?;
    let quads = enumerate_quadruples(target, neighbors)?;
    Ok(quads.iter().map(|q| self.tickers_of(q)).collect())
  }

  /// Highest sum of pairwise Spearman correlations.
  pub fn traditional(&self, n_targets: usize) -> Result<Vec<SelectedQuadruple>> {
    self.run(SelectionMethod::Traditional, n_targets, |cols, combos| {
      let sub = self.corr.select(Axis(0), cols);
      let sub = sub.select(Axis(1), cols);
      sum_correlations(sub.view(), combos)
    })
  }

  /// Highest multivariate Spearman's rho on the empirical CDF of returns.
  pub fn extended(&self, n_targets: usize) -> Result<Vec<SelectedQuadruple>> {
    self.run(SelectionMethod::Extended, n_targets, |cols, combos| {
      multivariate_rho(self.ecdf.select(Axis(1), cols).view(), combos)
    })
  }

  /// Smallest total distance of ranked returns to the hyper-diagonal.
  pub fn geometric(&self, n_targets: usize) -> Result<Vec<SelectedQuadruple>> {
    self.run(SelectionMethod::Geometric, n_targets, |cols, combos| {
      diagonal_measure(self.ranked.select(Axis(1), cols).view(), combos)
    })
  }

  /// Largest rank-based tail dependence statistic.
  pub fn extremal(&self, n_targets: usize) -> Result<Vec<SelectedQuadruple>> {
    let inv_cov = self.cov_cache.get()?;
    self.run(SelectionMethod::Extremal, n_targets, |cols, combos| {
      extremal_scores(
        self.ranked.select(Axis(1), cols).view(),
        combos,
        inv_cov.view(),
      )
    })
  }

  pub fn select(&self, method: SelectionMethod, n_targets: usize) -> Result<Vec<SelectedQuadruple>> {
    match method {
      SelectionMethod::Traditional => self.traditional(n_targets),
      SelectionMethod::Extended => self.extended(n_targets),
      SelectionMethod::Geometric => self.geometric(n_targets),
      SelectionMethod::Extremal => self.extremal(n_targets),
    }
  }

  fn target_neighbors(&self, target: usize) -> Result<&[usize]> {
    self.neighbors(target).ok_or_else(|| {
      CopulaError::InvalidParameter(format!(
        "target {target} outside a universe of {} assets",
        self.universe.n_assets()
      ))
    })
  }

  fn tickers_of(&self, quad: &[usize; 4]) -> [String; 4] {
    let tickers = self.universe.tickers();
    quad.map(|i| tickers[i].clone())
  }

  /// Score the first `n_targets` assets with `score` and map winners back to tickers.
  ///
  /// `score` receives the universe columns of the target followed by its
  /// neighbors, and the local combinations over those columns.
  fn run<F>(
    &self,
    method: SelectionMethod,
    n_targets: usize,
    score: F,
  ) -> Result<Vec<SelectedQuadruple>>
  where
    F: Fn(&[usize], &[[usize; 4]]) -> Result<QuadrupleScore> + Sync,
  {
    let n_targets = n_targets.min(self.universe.n_assets());

    let one = |target: usize| -> Result<SelectedQuadruple> {
      let mut cols = Vec::with_capacity(self.config.top_k + 1);
      cols.push(target);
      cols.extend_from_slice(self.target_neighbors(target)?);

      let combos = prepare_combinations(cols.len())?;
      let best = score(&cols, &combos)?;
      let quad = combos[best.index].map(|local| cols[local]);
      debug!(
        ?method,
        target = %self.universe.tickers()[target],
        score = best.score,
        candidates = combos.len(),
        "selected partners"
      );

      Ok(SelectedQuadruple {
        tickers: self.tickers_of(&quad),
        score: best.score,
      })
    };

    let results: Vec<Result<SelectedQuadruple>> = if self.config.parallel {
      (0..n_targets).into_par_iter().map(one).collect()
    } else {
      (0..n_targets).map(one).collect()
    };

    let selected = results.into_iter().collect::<Result<Vec<_>>>()?;
    info!(?method, targets = selected.len(), "partner selection finished");
    Ok(selected)
  }
}
