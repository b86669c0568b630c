//! Configuration for the plotting layer.

use std::env;

use crate::error::{PlotError, Result};
use crate::layout::algorithms;
use crate::version::EngineVersion;

pub const ENV_ENGINE_VERSION: &str = "PLOT_COMPAT_ENGINE_VERSION";
pub const ENV_STRICT_LABELS: &str = "PLOT_COMPAT_STRICT_LABELS";
pub const ENV_LAYOUT: &str = "PLOT_COMPAT_LAYOUT";

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Pin the engine release instead of asking the engine. None = probe it.
    pub engine_version: Option<EngineVersion>,
    /// Refuse to drop labels instead of warning.
    pub strict_labels: bool,
    /// Algorithm used when a graph call names no layout.
    pub default_layout: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            engine_version: None,
            strict_labels: false,
            default_layout: algorithms::DEFAULT_ALGORITHM.to_string(),
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `PLOT_COMPAT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`PlotConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_ENGINE_VERSION).filter(|v| !v.trim().is_empty()) {
            config.engine_version = Some(EngineVersion::parse(&raw)?);
        }
        if let Some(raw) = lookup(ENV_STRICT_LABELS) {
            config.strict_labels = parse_flag(ENV_STRICT_LABELS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LAYOUT).filter(|v| !v.trim().is_empty()) {
            algorithms::lookup(raw.trim())?;
            config.default_layout = raw.trim().to_string();
        }
        Ok(config)
    }

    pub fn with_engine_version(mut self, version: EngineVersion) -> Self {
        self.engine_version = Some(version);
        self
    }

    pub fn with_strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(PlotError::InvalidOption {
            key: key.to_string(),
            expected: "a boolean flag",
        }),
    }
}
