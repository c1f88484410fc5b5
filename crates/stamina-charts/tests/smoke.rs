use std::fs;

use sha2::{Digest, Sha256};
use stamina_charts::config::ChartConfig;
use stamina_charts::runner::SweepRunner;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path, max_cards: u32) -> ChartConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
sweep:
  max_cards: {max_cards}
outputs:
  cells_jsonl: "{cells}"
  summary_md: "{summary}"
  plots_dir: "{plots}"
logging:
  enable_structured: false
"#,
        cells = output_dir.join("cells.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
        plots = output_dir.join("plots").display()
    );

    let mut cfg: ChartConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn sweep_smoke_test_produces_stable_jsonl_hash() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), 12);
    let outputs = config.resolved_outputs();

    let runner = SweepRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("sweep completes");

    assert_eq!(summary.max_cards, 12);
    assert_eq!(summary.cells_written, 507);
    assert_eq!(summary.masked_cells, 261);

    let jsonl = fs::read_to_string(&summary.cells_path).expect("cells readable");
    assert_eq!(jsonl.lines().count(), 507);

    let first: serde_json::Value =
        serde_json::from_str(jsonl.lines().next().expect("first row")).expect("row decodes");
    assert_eq!(first["chart"], "max_turns");
    assert_eq!(first["cell_id"], "H00_D00");
    assert_eq!(first["value"], 0);
    assert_eq!(first["masked"], false);

    let mut hasher = Sha256::new();
    hasher.update(jsonl.as_bytes());
    let digest = hasher.finalize();

    let actual = hex::encode(digest);
    assert_eq!(
        actual, "8eadd7ba827a8d82d582b354f1480f378f4038d07779852fa12d7a9aa4a79c2d",
        "JSONL output hash changed; update expected value if intentional"
    );

    assert!(summary.summary_path.exists(), "summary markdown missing");
    let summary_md = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(summary_md.contains("| MaxTurns | Optimizing turns | 169 | 78 | 36 |"));

    // Plot rendering is optional; ensure any failure surfaces explicitly
    for plot_path in &summary.plot_paths {
        assert!(plot_path.exists(), "plot path reported but missing on disk");
    }
}

#[test]
fn masked_cells_write_null_values() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), 4);
    let outputs = config.resolved_outputs();

    let runner = SweepRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("sweep completes");
    assert_eq!(summary.cells_written, 75);

    let jsonl = fs::read_to_string(&summary.cells_path).expect("cells readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes"))
        .collect();

    let find = |chart: &str, hand: u64, discard: u64| -> &serde_json::Value {
        rows.iter()
            .find(|row| row["chart"] == chart && row["hand"] == hand && row["discard"] == discard)
            .unwrap_or_else(|| panic!("missing row {chart} ({hand}, {discard})"))
    };

    let full_hand = find("max_turns", 4, 0);
    assert_eq!(full_hand["value"], 4);
    assert_eq!(full_hand["masked"], false);

    let over_budget = find("max_turns", 4, 1);
    assert!(over_budget["value"].is_null());
    assert_eq!(over_budget["masked"], true);

    let empty_pool = find("damage_prefer_hand", 0, 0);
    assert!(empty_pool["value"].is_null());
    assert_eq!(empty_pool["masked"], true);

    let thin_discard = find("damage_from_discard", 1, 1);
    assert!(thin_discard["value"].is_null());
    assert_eq!(thin_discard["masked"], true);
}
