//! Configuration loading
//!
//! Config file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MTONE_CONFIG`)
//! 3. Platform config file (`<config dir>/mtone/config.toml`), if present
//! 4. Built-in defaults (fallback)

use crate::params::SynthesisOverrides;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MTONE_CONFIG";

/// Audio-capable models queried when `[eval] models` is not set
pub const DEFAULT_MODELS: &[&str] = &[
    "openai/gpt-audio-2025-08-28",
    "openai/gpt-4o-audio-preview",
    "gemini/gemini-2.5-pro",
    "gemini/gemini-2.0-flash",
];

/// Complete TOML configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub synthesis: SynthesisOverrides,
    pub eval: EvalConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[eval]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Model identifiers in `provider/model` form
    pub models: Vec<String>,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            timeout_secs: 90,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            openai_api_key: None,
            gemini_api_key: None,
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolve the config file location and load it
    ///
    /// An explicitly named file (CLI or env) must exist; the platform default
    /// file is optional and silently skipped when absent.
    pub fn load_resolved(cli_arg: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_arg {
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }
}

/// Platform default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mtone").join("config.toml"))
}

/// Resolve an API key from environment variables, then the TOML value
///
/// **Priority:** ENV → TOML. Blank values are ignored. Warns when several
/// sources are configured.
pub fn resolve_api_key(label: &str, env_vars: &[&str], toml_value: Option<&str>) -> Option<String> {
    let env_key = env_vars
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| is_valid_key(v));
    let toml_key = toml_value.filter(|v| is_valid_key(v)).map(str::to_string);

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} API key found in both environment and TOML. Using environment (highest priority).",
            label
        );
    }

    if let Some(key) = env_key {
        info!("{} API key loaded from environment variable", label);
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("{} API key loaded from TOML config", label);
        return Some(key);
    }

    None
}

fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.eval.models.len(), 4);
        assert_eq!(config.eval.timeout_secs, 90);
        assert_eq!(config.synthesis, SynthesisOverrides::default());
    }

    #[test]
    fn test_synthesis_section_parses() {
        let config: TomlConfig = toml::from_str(
            r#"
            [synthesis]
            duration_ms = 300
            f0_high = 250.0
            fade_curve = "s_curve"
            "#,
        )
        .unwrap();
        assert_eq!(config.synthesis.duration_ms, Some(300));
        assert_eq!(config.synthesis.f0_high, Some(250.0));
        assert_eq!(
            config.synthesis.fade_curve,
            Some(crate::fade_curves::FadeCurve::SCurve)
        );
    }

    #[test]
    fn test_unknown_synthesis_key_rejected() {
        let result: std::result::Result<TomlConfig, _> =
            toml::from_str("[synthesis]\nsample_rte = 8000\n");
        assert!(result.is_err());
    }
}
