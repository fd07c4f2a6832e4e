//! # Partner Selection Types
//!
//! $$
//! P\in\mathbb R^{T\times N},\qquad q=(i,j,k,l)
//! $$
//!
//! Input universe, configuration and result containers.
use std::io::Read;
use std::str::FromStr;

use ndarray::Array2;

use crate::error::CopulaError;
use crate::error::Result;

/// Price table: one column per asset, one row per observation.
#[derive(Clone, Debug)]
pub struct Universe {
  tickers: Vec<String>,
  prices: Array2<f64>,
}

impl Universe {
  /// Missing prices are encoded as `NaN`; infinite prices are treated the same way.
  pub fn new(tickers: Vec<String>, prices: Array2<f64>) -> Result<Self> {
    if prices.nrows() == 0 || prices.ncols() == 0 {
      return Err(CopulaError::EmptyInput);
    }
    if tickers.len() != prices.ncols() {
      return Err(CopulaError::InvalidInputType(format!(
        "{} tickers for {} price columns",
        tickers.len(),
        prices.ncols()
      )));
    }
    Ok(Self { tickers, prices })
  }

  /// Read a price table from comma separated text.
  ///
  /// The header holds a label for the first column followed by the tickers.
  /// Every other record holds a date label followed by one price per ticker.
  /// Fields may be quoted; empty fields are missing prices.
  pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
    let mut rdr = csv::ReaderBuilder::new()
      .has_headers(true)
      .trim(csv::Trim::All)
      .from_reader(reader);

    let tickers: Vec<String> = rdr
      .headers()
      .map_err(|e| CopulaError::InvalidInputType(format!("CSV header: {e}")))?
      .iter()
      .skip(1)
      .map(str::to_string)
      .collect();

    let mut values = Vec::new();
    let mut rows = 0;
    for record in rdr.records() {
      let record = record.map_err(|e| CopulaError::InvalidInputType(format!("CSV: {e}")))?;
      let line = record.position().map_or(0, |p| p.line());
      for field in record.iter().skip(1) {
        let price = if field.is_empty() {
          f64::NAN
        } else {
          field.parse::<f64>().map_err(|e| {
            CopulaError::InvalidInputType(format!("line {line}: `{field}`: {e}"))
          })?
        };
        values.push(price);
      }
      rows += 1;
    }

    let prices = Array2::from_shape_vec((rows, tickers.len()), values)
      .map_err(|e| CopulaError::InvalidInputType(e.to_string()))?;
    Self::new(tickers, prices)
  }

  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  pub fn prices(&self) -> &Array2<f64> {
    &self.prices
  }

  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }
}

/// The four partner-selection procedures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMethod {
  /// Highest sum of pairwise Spearman correlations.
  Traditional,
  /// Highest multivariate Spearman's rho.
  Extended,
  /// Smallest total distance to the hyper-diagonal.
  Geometric,
  /// Largest deviation from independence in the joint tails.
  Extremal,
}

impl SelectionMethod {
  pub const ALL: [SelectionMethod; 4] = [
    SelectionMethod::Traditional,
    SelectionMethod::Extended,
    SelectionMethod::Geometric,
    SelectionMethod::Extremal,
  ];
}

impl FromStr for SelectionMethod {
  type Err = CopulaError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "traditional" => Ok(Self::Traditional),
      "extended" => Ok(Self::Extended),
      "geometric" => Ok(Self::Geometric),
      "extremal" => Ok(Self::Extremal),
      other => Err(CopulaError::InvalidParameter(format!(
        "unknown selection method `{other}`"
      ))),
    }
  }
}

/// Runtime configuration for [`super::PartnerSelection`].
#[derive(Clone, Debug)]
pub struct PartnerSelectionConfig {
  /// Number of most correlated stocks kept as partner candidates.
  pub top_k: usize,
  /// Process targets on the rayon thread pool. Candidates of a single target
  /// are always scored in parallel.
  pub parallel: bool,
  /// Gauss-Legendre nodes per dimension for the extremal covariance integrals.
  pub quadrature_nodes: usize,
}

impl Default for PartnerSelectionConfig {
  fn default() -> Self {
    Self {
      top_k: 50,
      parallel: true,
      quadrature_nodes: 8,
    }
  }
}

/// Winning quadruple for one target; `tickers[0]` is the target.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedQuadruple {
  pub tickers: [String; 4],
  pub score: f64,
}

impl SelectedQuadruple {
  pub fn target(&self) -> &str {
    &self.tickers[0]
  }

  pub fn partners(&self) -> &[String] {
    &self.tickers[1..]
  }
}
