//! Plot dispatcher: the public chart calls.
//!
//! Each call resolves its derived values (layout, labels), translates its
//! options for the engine release, and only then touches the engine. Any
//! error raised before the native call leaves the engine untouched.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::PlotConfig;
use crate::engine::{Bounds, Engine, Inset};
use crate::error::{PlotError, Result};
use crate::labels::{PlotWarning, attach_labels, resolve_labels};
use crate::layout::{GraphInput, Layout, LayoutSpec, Network, NodeId, Point, resolve_layout};
use crate::options::OptionMap;
use crate::translate::{HATCH, HATCHES, ORIENTATION, OperationKind, Translator, VERT};
use crate::version::{EngineVersion, VersionProbe};

// ── Results ──────────────────────────────────────────────────────────────────

/// A call's artifacts plus the recoverable warnings it raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Plotted<T> {
    pub value: T,
    pub warnings: Vec<PlotWarning>,
}

/// Artifacts drawn by [`Axes::graph`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphArtifacts<A> {
    pub nodes: A,
    pub edges: A,
    pub labels: Vec<A>,
    /// Final positions of the drawn nodes.
    pub layout: Layout,
}

// ── Arguments ────────────────────────────────────────────────────────────────

/// Which node labels a graph draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GraphLabels {
    #[default]
    None,
    /// Each node's id.
    Ids,
    /// Explicit text per node; nodes without an entry stay unlabeled.
    Map(BTreeMap<NodeId, String>),
}

impl<S: Into<String>> FromIterator<(NodeId, S)> for GraphLabels {
    fn from_iter<I: IntoIterator<Item = (NodeId, S)>>(iter: I) -> Self {
        GraphLabels::Map(iter.into_iter().map(|(id, s)| (id, s.into())).collect())
    }
}

/// Arguments to [`Axes::graph`].
#[derive(Debug, Default)]
pub struct GraphArgs {
    pub nodes: Option<Vec<NodeId>>,
    pub edges: Option<Vec<(NodeId, NodeId)>>,
    pub labels: GraphLabels,
    pub layout: LayoutSpec,
    pub rescale: bool,
    pub node_options: OptionMap,
    pub edge_options: OptionMap,
    pub label_options: OptionMap,
}

impl GraphArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.nodes = Some(nodes.into_iter().collect());
        self
    }

    pub fn edges(mut self, edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        self.edges = Some(edges.into_iter().collect());
        self
    }

    pub fn labels(mut self, labels: GraphLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn layout(mut self, layout: impl Into<LayoutSpec>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn rescale(mut self, rescale: bool) -> Self {
        self.rescale = rescale;
        self
    }

    pub fn node_options(mut self, options: OptionMap) -> Self {
        self.node_options = options;
        self
    }

    pub fn edge_options(mut self, options: OptionMap) -> Self {
        self.edge_options = options;
        self
    }

    pub fn label_options(mut self, options: OptionMap) -> Self {
        self.label_options = options;
        self
    }
}

/// Arguments shared by the violin and box calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatArgs {
    pub labels: Option<Vec<String>>,
    /// None = vertical, unless `options` already spells an orientation.
    pub vert: Option<bool>,
    /// One hatch for every body.
    pub hatch: Option<String>,
    /// One hatch per body.
    pub hatches: Option<Vec<String>>,
    /// Passed through after translation.
    pub options: OptionMap,
}

impl StatArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn vert(mut self, vert: bool) -> Self {
        self.vert = Some(vert);
        self
    }

    pub fn hatch(mut self, hatch: impl Into<String>) -> Self {
        self.hatch = Some(hatch.into());
        self
    }

    pub fn hatches<S: Into<String>>(mut self, hatches: impl IntoIterator<Item = S>) -> Self {
        self.hatches = Some(hatches.into_iter().map(Into::into).collect());
        self
    }

    pub fn options(mut self, options: OptionMap) -> Self {
        self.options = options;
        self
    }

    fn into_option_map(self) -> (Option<Vec<String>>, OptionMap) {
        let mut map = self.options;
        match self.vert {
            Some(vert) => map.insert(VERT, vert),
            None if !map.contains_key(VERT) && !map.contains_key(ORIENTATION) => {
                map.insert(VERT, true)
            }
            None => {}
        }
        if let Some(hatch) = self.hatch {
            map.insert(HATCH, hatch);
        }
        if let Some(hatches) = self.hatches {
            map.insert(HATCHES, hatches);
        }
        (self.labels, map)
    }
}

// ── Axes ─────────────────────────────────────────────────────────────────────

/// Chart calls bound to one engine.
#[derive(Debug)]
pub struct Axes<E: Engine> {
    engine: E,
    version: EngineVersion,
    translator: Translator,
    config: PlotConfig,
}

impl<E: Engine> Axes<E> {
    /// Bind to `engine`. The engine release comes from `config` when pinned
    /// there, otherwise from the process-wide probe.
    pub fn new(engine: E, config: PlotConfig) -> Result<Self> {
        let version = match config.engine_version {
            Some(version) => version,
            None => VersionProbe::global().resolve(&engine)?,
        };
        debug!(%version, "axes bound to engine");
        Ok(Self {
            engine,
            version,
            translator: Translator::default(),
            config,
        })
    }

    /// Bind with an explicit release, ignoring configuration and probe.
    pub fn with_version(engine: E, version: EngineVersion) -> Self {
        Self {
            engine,
            version,
            translator: Translator::default(),
            config: PlotConfig::default().with_engine_version(version),
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn version(&self) -> EngineVersion {
        self.version
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    // ── graph ────────────────────────────────────────────────────────────────

    /// Draw a network: node markers, edge segments and optional labels.
    pub fn graph<'a>(
        &mut self,
        input: impl Into<GraphInput<'a>>,
        args: GraphArgs,
    ) -> Result<Plotted<GraphArtifacts<E::Artifact>>> {
        let full = Network::from_input(input.into())?;
        let network = full.restrict(args.nodes.as_deref(), args.edges.as_deref())?;
        let layout = resolve_layout(
            &network,
            &args.layout,
            &self.config.default_layout,
            args.rescale,
        )?;

        let ids = network.nodes();
        let points = ids
            .iter()
            .map(|&id| position(&layout, id))
            .collect::<Result<Vec<Point>>>()?;
        let segments = network
            .edges()
            .into_iter()
            .map(|(a, b)| -> Result<(Point, Point)> {
                Ok((position(&layout, a)?, position(&layout, b)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let (label_nodes, label_texts) = graph_label_texts(&network, &args.labels);
        let resolved = resolve_labels(
            label_texts.as_deref(),
            label_nodes.len(),
            self.config.strict_labels,
        )?;

        let node_options = self.translate(OperationKind::GraphNodes, args.node_options, ids.len())?;
        let edge_options =
            self.translate(OperationKind::GraphEdges, args.edge_options, segments.len())?;
        let label_options = self.translate(
            OperationKind::GraphLabels,
            args.label_options,
            resolved.labels.len(),
        )?;

        let nodes = self.engine.scatter(&points, &node_options)?;
        let edges = self.engine.line_collection(&segments, &edge_options)?;
        let mut labels = Vec::with_capacity(resolved.labels.len());
        for (&id, text) in label_nodes.iter().zip(&resolved.labels) {
            let at = position(&layout, id)?;
            labels.push(self.engine.text(at, text, &label_options)?);
        }
        attach_labels(&mut labels, &resolved.labels);

        debug!(
            nodes = ids.len(),
            edges = segments.len(),
            labels = labels.len(),
            "graph drawn"
        );
        Ok(Plotted {
            value: GraphArtifacts {
                nodes,
                edges,
                labels,
                layout,
            },
            warnings: resolved.warnings,
        })
    }

    // ── violin / box ─────────────────────────────────────────────────────────

    pub fn violinplot(
        &mut self,
        data: &[Vec<f64>],
        args: StatArgs,
    ) -> Result<Plotted<Vec<E::Artifact>>> {
        self.stat_plot(OperationKind::Violin, data, args)
    }

    /// [`Axes::violinplot`] with horizontal bodies.
    pub fn violinploth(
        &mut self,
        data: &[Vec<f64>],
        args: StatArgs,
    ) -> Result<Plotted<Vec<E::Artifact>>> {
        self.stat_plot(OperationKind::Violin, data, horizontal(args))
    }

    pub fn boxplot(
        &mut self,
        data: &[Vec<f64>],
        args: StatArgs,
    ) -> Result<Plotted<Vec<E::Artifact>>> {
        self.stat_plot(OperationKind::Box, data, args)
    }

    /// [`Axes::boxplot`] with horizontal boxes.
    pub fn boxploth(
        &mut self,
        data: &[Vec<f64>],
        args: StatArgs,
    ) -> Result<Plotted<Vec<E::Artifact>>> {
        self.stat_plot(OperationKind::Box, data, horizontal(args))
    }

    fn stat_plot(
        &mut self,
        op: OperationKind,
        data: &[Vec<f64>],
        args: StatArgs,
    ) -> Result<Plotted<Vec<E::Artifact>>> {
        check_groups(op, data)?;
        let groups = data.len();
        let (labels, options) = args.into_option_map();
        let resolved = resolve_labels(labels.as_deref(), groups, self.config.strict_labels)?;
        let options = self.translate(op, options, groups)?;

        let mut bodies = match op {
            OperationKind::Box => self.engine.boxplot(data, &options)?,
            _ => self.engine.violinplot(data, &options)?,
        };
        if bodies.len() != groups {
            return Err(PlotError::Engine(format!(
                "{op} returned {} artists for {groups} datasets",
                bodies.len()
            )));
        }
        attach_labels(&mut bodies, &resolved.labels);
        Ok(Plotted {
            value: bodies,
            warnings: resolved.warnings,
        })
    }

    // ── inset ────────────────────────────────────────────────────────────────

    /// Mark the region `bounds` of these axes as shown in an inset.
    ///
    /// The engine's return shape is handed back unchanged: one composite
    /// indicator from 3.10 on, a `(rectangle, connectors)` pair before.
    pub fn inset_axes(&mut self, bounds: Bounds, options: OptionMap) -> Result<Inset<E::Artifact>> {
        bounds.validate()?;
        let options = self.translate(OperationKind::Inset, options, 1)?;
        if self.version >= EngineVersion::V3_10_0 {
            let indicator = self.engine.indicate_inset(bounds, &options)?;
            Ok(Inset::Composite(indicator))
        } else {
            let (rectangle, connectors) = self.engine.indicate_inset_legacy(bounds, &options)?;
            Ok(Inset::Pair(rectangle, connectors))
        }
    }

    fn translate(&self, op: OperationKind, options: OptionMap, artifacts: usize) -> Result<OptionMap> {
        self.translator.translate(op, options, self.version, artifacts)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn position(layout: &Layout, id: NodeId) -> Result<Point> {
    layout.get(id).ok_or(PlotError::MissingPosition(id))
}

/// Nodes that get a label, and their texts (`None` when nothing is labeled).
fn graph_label_texts(network: &Network, labels: &GraphLabels) -> (Vec<NodeId>, Option<Vec<String>>) {
    match labels {
        GraphLabels::None => (Vec::new(), None),
        GraphLabels::Ids => {
            let ids = network.nodes();
            let texts = ids.iter().map(|id| id.to_string()).collect();
            (ids, Some(texts))
        }
        GraphLabels::Map(map) => {
            let (ids, texts): (Vec<NodeId>, Vec<String>) = map
                .iter()
                .filter(|(id, _)| network.contains_node(**id))
                .map(|(id, text)| (*id, text.clone()))
                .unzip();
            (ids, Some(texts))
        }
    }
}

fn horizontal(mut args: StatArgs) -> StatArgs {
    args.vert = Some(false);
    args.options.remove(ORIENTATION);
    args.options.remove(VERT);
    args
}

fn check_groups(op: OperationKind, data: &[Vec<f64>]) -> Result<()> {
    if data.is_empty() {
        return Err(PlotError::EmptyData(format!("{op} needs at least one dataset")));
    }
    if let Some(i) = data.iter().position(Vec::is_empty) {
        return Err(PlotError::EmptyData(format!("{op} dataset {i} is empty")));
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────
