//! Resolver configuration: compiler invocation, cache bounds, build timeout.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// External compiler invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerConfig {
    /// Compiler executable; receives the contract source on stdin and writes
    /// the artifact to stdout.
    pub program: String,

    /// Arguments passed to the compiler.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "mpcc".to_string(),
            args: Vec::new(),
        }
    }
}

/// Top-level resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolverConfig {
    /// External compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Maximum number of cached artifacts before LRU eviction.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Wall-clock budget for one compiler run, in seconds.
    #[serde(default = "default_build_timeout_secs")]
    pub build_timeout_secs: u64,
}

fn default_cache_capacity() -> usize {
    20
}

fn default_build_timeout_secs() -> u64 {
    10
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            compiler: CompilerConfig::default(),
            cache_capacity: default_cache_capacity(),
            build_timeout_secs: default_build_timeout_secs(),
        }
    }
}

impl ResolverConfig {
    /// Build timeout as a [`Duration`].
    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout_secs)
    }
}

/// Errors raised while validating resolver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("compiler program must not be empty")]
    EmptyCompilerProgram,

    #[error("cache capacity must be greater than zero")]
    ZeroCacheCapacity,

    #[error("build timeout must be greater than zero")]
    ZeroBuildTimeout,
}

/// Load resolver configuration from a JSON file.
///
/// A missing file yields the default configuration; a present but invalid
/// file is an error.
pub fn load_config_from_path(path: &Path) -> anyhow::Result<ResolverConfig> {
    if !path.exists() {
        return Ok(ResolverConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: ResolverConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate a resolver configuration.
pub fn validate_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    if config.compiler.program.trim().is_empty() {
        return Err(ConfigError::EmptyCompilerProgram);
    }
    if config.cache_capacity == 0 {
        return Err(ConfigError::ZeroCacheCapacity);
    }
    if config.build_timeout_secs == 0 {
        return Err(ConfigError::ZeroBuildTimeout);
    }
    Ok(())
}
