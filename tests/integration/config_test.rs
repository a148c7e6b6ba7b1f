//! Configuration loading from disk

use poly_history::config::{Config, HistoryErrorPolicy, WindowPolicy};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_example_config_loads_from_disk() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();
    assert_eq!(config.api.clob_url, "https://clob.polymarket.com");
    assert_eq!(config.collect.output_dir, PathBuf::from("market_histories"));
    assert_eq!(config.collect.window_policy, WindowPolicy::AnyResolution);
    assert_eq!(config.collect.on_history_error, HistoryErrorPolicy::Skip);
}

#[test]
fn test_config_file_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
            [collect]
            output_dir = "/var/lib/histories"
            lookback_days = 365
            window_policy = "ended_only"
        "#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.collect.output_dir, PathBuf::from("/var/lib/histories"));
    assert_eq!(config.collect.lookback_days, 365);
    assert_eq!(config.collect.window_policy, WindowPolicy::EndedOnly);
    assert_eq!(config.backtest.data_dir, PathBuf::from("market_histories"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[collect\nlookback_days = ").unwrap();
    assert!(Config::load(&path).is_err());
}
