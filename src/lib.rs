//! plot-compat — version-adaptation layer for a 2-D plotting engine.
//!
//! Higher-level chart calls (network graphs, grouped violin and box plots,
//! inset indicators) that behave the same on every supported engine
//! release.
//!
//! Modules:
//!   version    — EngineVersion, VersionProbe
//!   options    — OptionValue, OptionMap
//!   translate  — rule table and keyword Translator
//!   labels     — label padding / truncation
//!   layout     — Network, named algorithms, LayoutSpec, rescale
//!   engine     — Engine / Artifact traits, MemoryEngine
//!   axes       — the public chart calls
//!   config     — PlotConfig

pub mod axes;
pub mod config;
pub mod engine;
pub mod error;
pub mod labels;
pub mod layout;
pub mod options;
pub mod translate;
pub mod version;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use axes::{Axes, GraphArgs, GraphArtifacts, GraphLabels, Plotted, StatArgs};
pub use config::PlotConfig;
pub use engine::{Artifact, Bounds, Engine, Inset, InsetIndicator, MemoryEngine};
pub use error::{PlotError, Result};
pub use labels::{PlotWarning, ResolvedLabels, resolve_labels};
pub use layout::{GraphInput, GraphSource, Layout, LayoutSpec, Network, NodeId, Point};
pub use options::{OptionMap, OptionValue};
pub use translate::{OperationKind, RuleTable, Translator};
pub use version::{EngineVersion, VersionProbe};

/// Crate version, with the git revision when built from a checkout.
pub const VERSION: &str = env!("PLOT_COMPAT_VERSION");

/// Translate `tokens` (`key=value`) for `operation` on `engine_version`.
///
/// Shared by the CLI and the WASM bindings. `artifacts` sizes per-artist
/// options such as `hatches`.
pub fn translate_tokens<S: AsRef<str>>(
    operation: &str,
    tokens: &[S],
    engine_version: &str,
    artifacts: usize,
) -> Result<OptionMap> {
    let op: OperationKind = operation.parse()?;
    let version = EngineVersion::parse(engine_version)?;
    let options = OptionMap::parse_assignments(tokens)?;
    Translator::default().translate(op, options, version, artifacts)
}
