//! Config file resolution and layering tests
//!
//! Tests touching `MTONE_CONFIG` run serially since the process environment is shared.

use mtone_common::config::{resolve_api_key, TomlConfig, CONFIG_ENV_VAR};
use mtone_common::params::{LegacyParamsFile, SynthesisOverrides};
use serial_test::serial;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_cli_path_beats_env_var() {
    let dir = TempDir::new().unwrap();
    let cli = write(&dir, "cli.toml", "[synthesis]\nduration_ms = 111\n");
    let env = write(&dir, "env.toml", "[synthesis]\nduration_ms = 222\n");

    std::env::set_var(CONFIG_ENV_VAR, &env);
    let config = TomlConfig::load_resolved(Some(&cli)).unwrap();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.synthesis.duration_ms, Some(111));
}

#[test]
#[serial]
fn test_env_var_used_without_cli() {
    let dir = TempDir::new().unwrap();
    let env = write(&dir, "env.toml", "[logging]\nlevel = \"debug\"\n");

    std::env::set_var(CONFIG_ENV_VAR, &env);
    let config = TomlConfig::load_resolved(None).unwrap();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.logging.level, "debug");
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    let result = TomlConfig::load_resolved(Some(Path::new("/nonexistent/mtone.toml")));
    assert!(result.is_err());
}

#[test]
fn test_layering_toml_legacy_cli() {
    let dir = TempDir::new().unwrap();
    let toml_path = write(
        &dir,
        "config.toml",
        "[synthesis]\nduration_ms = 300\namplitude = 0.5\nf0_high = 230.0\n",
    );
    let json_path = write(&dir, "params.json", r#"{"F0_HIGH": 250.0, "RANGE_HZ": 60.0}"#);

    let toml_layer = TomlConfig::load(&toml_path).unwrap().synthesis;
    let legacy_layer = LegacyParamsFile::load(&json_path).unwrap().into_overrides();
    let cli_layer = SynthesisOverrides {
        amplitude: Some(0.7),
        ..Default::default()
    };

    let params = toml_layer
        .merge(legacy_layer)
        .merge(cli_layer)
        .resolve()
        .unwrap();

    assert_eq!(params.duration_ms, 300);
    assert_eq!(params.f0_high, 250.0);
    assert_eq!(params.f0_low, 190.0);
    assert_eq!(params.amplitude, 0.7);
}

#[test]
#[serial]
fn test_api_key_env_beats_toml() {
    std::env::set_var("MTONE_TEST_KEY_A", "from-env");
    let key = resolve_api_key("Test", &["MTONE_TEST_KEY_A"], Some("from-toml"));
    std::env::remove_var("MTONE_TEST_KEY_A");
    assert_eq!(key.as_deref(), Some("from-env"));
}

#[test]
#[serial]
fn test_api_key_falls_back_through_env_names_then_toml() {
    std::env::remove_var("MTONE_TEST_KEY_B");
    std::env::set_var("MTONE_TEST_KEY_C", "second");
    let key = resolve_api_key("Test", &["MTONE_TEST_KEY_B", "MTONE_TEST_KEY_C"], None);
    std::env::remove_var("MTONE_TEST_KEY_C");
    assert_eq!(key.as_deref(), Some("second"));

    let key = resolve_api_key("Test", &["MTONE_TEST_KEY_B"], Some("  "));
    assert_eq!(key, None);

    let key = resolve_api_key("Test", &["MTONE_TEST_KEY_B"], Some("toml-key"));
    assert_eq!(key.as_deref(), Some("toml-key"));
}
