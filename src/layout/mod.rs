//! Graph normalization and node placement.

pub mod algorithms;
pub mod graph;
pub mod types;

use std::fmt;

use tracing::debug;

pub use graph::{GraphInput, GraphSource, Network};
pub use types::{BoundingBox, Layout, NodeId, Point};

use crate::error::{PlotError, Result};

/// Caller-supplied layout generator.
pub type LayoutGenerator = Box<dyn Fn(&Network) -> Layout>;

/// How node positions are obtained.
#[derive(Default)]
pub enum LayoutSpec {
    /// The configured default algorithm.
    #[default]
    Default,
    /// A named algorithm, `_layout` suffix optional.
    Named(String),
    /// Positions computed ahead of time.
    Precomputed(Layout),
    /// A function of the drawn network.
    Generator(LayoutGenerator),
}

impl LayoutSpec {
    pub fn generator(f: impl Fn(&Network) -> Layout + 'static) -> Self {
        LayoutSpec::Generator(Box::new(f))
    }
}

impl fmt::Debug for LayoutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutSpec::Default => f.write_str("Default"),
            LayoutSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            LayoutSpec::Precomputed(layout) => {
                f.debug_tuple("Precomputed").field(&layout.len()).finish()
            }
            LayoutSpec::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

impl From<&str> for LayoutSpec {
    fn from(name: &str) -> Self {
        LayoutSpec::Named(name.to_string())
    }
}

impl From<String> for LayoutSpec {
    fn from(name: String) -> Self {
        LayoutSpec::Named(name)
    }
}

impl From<Layout> for LayoutSpec {
    fn from(layout: Layout) -> Self {
        LayoutSpec::Precomputed(layout)
    }
}

/// Produce one position for every node of `network`.
///
/// `default_algorithm` is used for [`LayoutSpec::Default`]. Positions for
/// nodes outside `network` are dropped; a missing node or a NaN/infinite
/// coordinate is an error. With `rescale` the result is mapped into the unit
/// square.
pub fn resolve_layout(
    network: &Network,
    spec: &LayoutSpec,
    default_algorithm: &str,
    rescale: bool,
) -> Result<Layout> {
    let mut layout = match spec {
        LayoutSpec::Default => algorithms::lookup(default_algorithm)?(network),
        LayoutSpec::Named(name) => algorithms::lookup(name)?(network),
        LayoutSpec::Precomputed(layout) => layout.clone(),
        LayoutSpec::Generator(f) => f(network),
    };

    if let Some(missing) = network.nodes().into_iter().find(|&id| !layout.contains(id)) {
        return Err(PlotError::MissingPosition(missing));
    }
    if layout.len() > network.node_count() {
        let before = layout.len();
        layout.retain(|id| network.contains_node(id));
        debug!(dropped = before - layout.len(), "ignoring positions for undrawn nodes");
    }
    if let Some(bad) = layout.first_non_finite() {
        return Err(PlotError::NonFinitePosition(bad));
    }

    Ok(if rescale { layout.rescaled() } else { layout })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
