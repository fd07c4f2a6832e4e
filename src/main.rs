use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use copula_partners::partner_selection::PartnerSelection;
use copula_partners::partner_selection::PartnerSelectionConfig;
use copula_partners::partner_selection::SelectionMethod;
use copula_partners::partner_selection::Universe;
use prettytable::row;
use prettytable::Table;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Select copula partner quadruples from a CSV price table.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
  /// CSV with a date column followed by one price column per ticker
  path: PathBuf,

  /// Number of leading assets to use as targets
  #[arg(default_value_t = 10)]
  n_targets: usize,

  /// traditional, extended, geometric or extremal; all when omitted
  method: Option<SelectionMethod>,
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "copula_partners=info".into()))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let args = Args::parse();
  let methods = match args.method {
    Some(m) => vec![m],
    None => SelectionMethod::ALL.to_vec(),
  };

  let path = &args.path;
  let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
  let universe = Universe::from_csv(BufReader::new(file))
    .with_context(|| format!("cannot read prices from {}", path.display()))?;
  info!(path = %path.display(), assets = universe.n_assets(), "loaded universe");

  let engine = PartnerSelection::new(universe, PartnerSelectionConfig::default())?;

  let mut table = Table::new();
  table.set_titles(row!["method", "target", "partners", "score"]);
  for method in methods {
    for q in engine.select(method, args.n_targets)? {
      table.add_row(row![
        format!("{method:?}"),
        q.target(),
        q.partners().join(" "),
        format!("{:.6}", q.score)
      ]);
    }
  }
  table.printstd();

  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn args_are_well_formed() {
    Args::command().debug_assert();
  }

  #[test]
  fn positional_defaults() {
    let args = Args::try_parse_from(["copula-partners", "prices.csv"]).unwrap();
    assert_eq!(args.path, PathBuf::from("prices.csv"));
    assert_eq!(args.n_targets, 10);
    assert_eq!(args.method, None);

    let args = Args::try_parse_from(["copula-partners", "p.csv", "3", "extremal"]).unwrap();
    assert_eq!(args.n_targets, 3);
    assert_eq!(args.method, Some(SelectionMethod::Extremal));
  }

  #[test]
  fn bad_arguments_are_rejected() {
    assert!(Args::try_parse_from(["copula-partners"]).is_err());
    assert!(Args::try_parse_from(["copula-partners", "p.csv", "many"]).is_err());
    assert!(Args::try_parse_from(["copula-partners", "p.csv", "3", "nearest"]).is_err());
  }
}
