//! Engine version detection.
//!
//! The installed engine reports its version once; the parsed
//! [`EngineVersion`] is cached in a [`VersionProbe`]. Pinning a probe to a
//! fixed version is an explicit operation so callers (and tests) can drive
//! the adaptation layer under any engine release.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::engine::Engine;
use crate::error::{PlotError, Result};

// ── EngineVersion ────────────────────────────────────────────────────────────

/// A `major.minor.patch` engine release, ordered semantically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    /// First release with `tick_labels` on box plots and `side` on violins.
    pub const V3_9_0: EngineVersion = EngineVersion::new(3, 9, 0);

    /// First release whose violin/box calls take `orientation` and whose
    /// inset indicator is a single composite object.
    pub const V3_10_0: EngineVersion = EngineVersion::new(3, 10, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse an engine version string.
    ///
    /// Accepts `3.10.0`, `3.9` (patch 0), and strings with pre-release or
    /// local suffixes such as `3.8.0rc1` or `3.10.0.dev12+g1a2b3c`; the
    /// suffix is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let caps = version_pattern()
            .captures(raw)
            .ok_or_else(|| PlotError::VersionParse(raw.to_string()))?;
        let component = |idx: usize| -> Result<u32> {
            match caps.get(idx) {
                None => Ok(0),
                Some(m) => m
                    .as_str()
                    .parse::<u32>()
                    .map_err(|_| PlotError::VersionParse(raw.to_string())),
            }
        };
        Ok(Self::new(component(1)?, component(2)?, component(3)?))
    }
}

impl FromStr for EngineVersion {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*v?(\d+)\.(\d+)(?:\.(\d+))?").expect("version pattern is a valid regex")
    })
}

// ── VersionProbe ─────────────────────────────────────────────────────────────

/// Resolves the engine version at most once and caches it.
#[derive(Debug, Default)]
pub struct VersionProbe {
    cached: OnceLock<EngineVersion>,
}

impl VersionProbe {
    pub const fn new() -> Self {
        Self {
            cached: OnceLock::new(),
        }
    }

    /// A probe that reports `version` and never queries an engine.
    pub fn pinned(version: EngineVersion) -> Self {
        Self {
            cached: OnceLock::from(version),
        }
    }

    /// The process-wide probe used when no version is configured.
    pub fn global() -> &'static VersionProbe {
        static GLOBAL: VersionProbe = VersionProbe::new();
        &GLOBAL
    }

    /// Return the cached version, querying `engine` on the first call.
    pub fn resolve<E: Engine + ?Sized>(&self, engine: &E) -> Result<EngineVersion> {
        if let Some(version) = self.cached.get() {
            return Ok(*version);
        }
        let raw = engine.version_string();
        let parsed = EngineVersion::parse(&raw)?;
        debug!(raw = %raw, version = %parsed, "resolved engine version");
        Ok(*self.cached.get_or_init(|| parsed))
    }

    /// Replace whatever was cached with `version`.
    pub fn pin(&mut self, version: EngineVersion) {
        self.cached = OnceLock::from(version);
    }

    /// The cached version, if one was resolved or pinned.
    pub fn cached(&self) -> Option<EngineVersion> {
        self.cached.get().copied()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
