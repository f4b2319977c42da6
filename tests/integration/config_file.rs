//! Loading a configuration from disk and building an engine from it.

use rust_decimal_macros::dec;
use tickcalc::config::AppConfig;
use tickcalc::RoundingMode;

const CONFIG: &str = r#"
[event]
desired_total_value = 1000000
total_participants = 80000
cost_per_participant = 750
non_paying_lower = 20000
non_paying_upper = 30000
tiers = [550, 750, 1000, 1250]
allocation_percentages = [40, 30, 20, 10]
first_batch_total = 20000
num_batches = 2

[engine]
rounding = "half_even"
strict_batch_limit = true
"#;

fn temp_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("tickcalc_test_{}.toml", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

#[test]
fn test_load_and_build() {
    let path = temp_path();
    std::fs::write(&path, CONFIG).unwrap();

    let cfg = AppConfig::load(&path).unwrap();
    assert!(cfg.event.validate().is_empty());

    let engine = cfg.build_engine().unwrap();
    assert_eq!(engine.rounding(), RoundingMode::HalfEven);
    assert_eq!(engine.global_ticket_cap(), 40_000);
    assert_eq!(engine.revenue_target(), dec!(41250000));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_strict_limit_from_config() {
    let cfg = AppConfig::from_toml_str(CONFIG).unwrap();
    let mut engine = cfg.build_engine().unwrap();

    engine.add_batch(&[1, 1, 1, 1]).unwrap();
    engine.add_batch(&[1, 1, 1, 1]).unwrap();
    assert!(engine.add_batch(&[1, 1, 1, 1]).is_err());
    assert_eq!(engine.batch_count(), 2);
}

#[test]
fn test_malformed_file_reports_path() {
    let path = temp_path();
    std::fs::write(&path, "[event]\ntiers = \"not a list\"\n").unwrap();

    let err = AppConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains(&path));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_shipped_config_parses() {
    let cfg = AppConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/tickcalc.toml")).unwrap();
    assert_eq!(cfg.event.tier_count(), 4);
    assert!(cfg.build_engine().is_ok());
}
