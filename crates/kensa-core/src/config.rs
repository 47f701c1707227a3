//! Configuration loading and parsing
//!
//! Provides functionality to load and parse `kensa.toml` configuration
//! files controlling the symbolic execution engine.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "kensa.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["engine"];
const KNOWN_ENGINE_KEYS: &[&str] = &["max_block_executions", "analyze_functions"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Bound on block executions per analyzed scope; exploration stops
    /// once the budget is spent.
    pub max_block_executions: usize,
    /// Whether function bodies are analyzed in addition to the top level.
    pub analyze_functions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_block_executions: crate::se::execution::MAX_BLOCK_EXECUTIONS,
            analyze_functions: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<ConfigResult, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<ConfigResult, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_key_warnings(content);
        for warning in &warnings {
            tracing::debug!(%warning, "config warning");
        }

        Ok(ConfigResult { config, warnings })
    }
}

fn unknown_key_warnings(content: &str) -> Vec<String> {
    let Ok(value) = content.parse::<toml::Table>() else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for key in value.keys() {
        if !KNOWN_TOP_LEVEL_KEYS.contains(&key.as_str()) {
            warnings.push(format!("unknown configuration key '{key}'"));
        }
    }
    if let Some(toml::Value::Table(engine)) = value.get("engine") {
        for key in engine.keys() {
            if !KNOWN_ENGINE_KEYS.contains(&key.as_str()) {
                warnings.push(format!("unknown configuration key 'engine.{key}'"));
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ConfigResult {
        Config::parse(content, Path::new("kensa.toml")).expect("valid config")
    }

    #[test]
    fn empty_config_uses_defaults() {
        let result = parse("");

        assert_eq!(
            result.config.engine.max_block_executions,
            crate::se::execution::MAX_BLOCK_EXECUTIONS
        );
        assert!(result.config.engine.analyze_functions);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn engine_settings_are_parsed() {
        let result = parse("[engine]\nmax_block_executions = 50\nanalyze_functions = false\n");

        assert_eq!(result.config.engine.max_block_executions, 50);
        assert!(!result.config.engine.analyze_functions);
    }

    #[test]
    fn unknown_keys_produce_warnings() {
        let result = parse("[engine]\nmax_block_executions = 10\nbogus = 1\n\n[extra]\nx = 2\n");

        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().any(|w| w.contains("engine.bogus")));
        assert!(result.warnings.iter().any(|w| w.contains("'extra'")));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let error = Config::parse("engine = [", Path::new("kensa.toml")).unwrap_err();
        assert!(matches!(error, ConfigError::ParseError { .. }));
    }
}
