use std::io::BufReader;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;

use copula_partners::partner_selection::PartnerSelection;
use copula_partners::partner_selection::PartnerSelectionConfig;
use copula_partners::partner_selection::SelectionMethod;
use copula_partners::partner_selection::Universe;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::StandardNormal;

/// Two sectors of four stocks each plus independent noise stocks.
fn sector_prices_csv(rows: usize, seed: u64) -> String {
  let assets = 12;
  let mut rng = StdRng::seed_from_u64(seed);
  let mut prices = vec![100.0f64; assets];
  let mut out = String::from("date");
  for j in 0..assets {
    out.push_str(&format!(",T{j:02}"));
  }
  out.push('\n');

  for t in 0..rows {
    let sector_a: f64 = rng.sample(StandardNormal);
    let sector_b: f64 = rng.sample(StandardNormal);
    out.push_str(&format!("d{t}"));
    for (j, p) in prices.iter_mut().enumerate() {
      let own: f64 = rng.sample(StandardNormal);
      let shock = match j {
        0..=3 => sector_a + 0.2 * own,
        4..=7 => sector_b + 0.2 * own,
        _ => own,
      };
      *p *= 1.0 + 0.01 * shock;
      // Occasional gap in a noise stock.
      if j == 11 && t % 37 == 5 {
        out.push(',');
      } else {
        out.push_str(&format!(",{p:.6}"));
      }
    }
    out.push('\n');
  }
  out
}

fn engine_from_csv(text: &str) -> PartnerSelection {
  let mut file = tempfile::tempfile().unwrap();
  file.write_all(text.as_bytes()).unwrap();
  file.seek(SeekFrom::Start(0)).unwrap();

  let universe = Universe::from_csv(BufReader::new(file)).unwrap();
  let config = PartnerSelectionConfig {
    top_k: 7,
    ..Default::default()
  };
  PartnerSelection::new(universe, config).unwrap()
}

#[test]
fn sectors_are_recovered_from_csv() {
  let engine = engine_from_csv(&sector_prices_csv(400, 7));
  assert_eq!(engine.universe().n_assets(), 12);

  for method in [
    SelectionMethod::Traditional,
    SelectionMethod::Extended,
    SelectionMethod::Geometric,
  ] {
    let selected = engine.select(method, 8).unwrap();
    assert_eq!(selected.len(), 8);
    for (i, q) in selected.iter().enumerate() {
      let sector = if i < 4 { 0..4 } else { 4..8 };
      let mut members: Vec<String> = sector.map(|j| format!("T{j:02}")).collect();
      let mut got = q.tickers.to_vec();
      members.sort();
      got.sort();
      assert_eq!(got, members, "{method:?} target {i}");
    }
  }
}

#[test]
fn extremal_selection_is_deterministic() {
  let text = sector_prices_csv(300, 9);
  let a = engine_from_csv(&text).extremal(4).unwrap();
  let b = engine_from_csv(&text).extremal(4).unwrap();
  assert_eq!(a, b);
  for q in &a {
    assert!(q.score.is_finite());
    assert_eq!(q.partners().len(), 3);
  }
}

#[test]
fn every_candidate_is_a_top_k_neighbor() {
  let engine = engine_from_csv(&sector_prices_csv(200, 11));
  let neighbors = engine.neighbors(0).unwrap().to_vec();
  let tickers = engine.universe().tickers().to_vec();
  let quads = engine.all_quadruples(0).unwrap();
  assert_eq!(quads.len(), 35);
  for q in quads {
    assert_eq!(q[0], "T00");
    for partner in &q[1..] {
      let idx = tickers.iter().position(|t| t == partner).unwrap();
      assert!(neighbors.contains(&idx));
    }
  }
}
