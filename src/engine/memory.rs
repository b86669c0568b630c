//! In-memory engine: records every native call and returns plain handles.
//!
//! It behaves like the engine release named by its version string: keywords
//! that release does not accept are refused the way the real engine would
//! refuse an unexpected keyword argument.

use tracing::debug;

use super::{Artifact, Bounds, Engine, InsetIndicator};
use crate::error::{PlotError, Result};
use crate::layout::types::Point;
use crate::options::{OptionMap, OptionValue};
use crate::translate::{HATCH, HATCHES, ORIENTATION, VERT, VersionRange};
use crate::version::EngineVersion;

/// Kind of element a [`Handle`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    NodeCollection,
    EdgeCollection,
    Text,
    ViolinBody,
    BoxBody,
    InsetRectangle,
    InsetConnector,
}

/// Artifact handle produced by [`MemoryEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub id: usize,
    pub kind: ArtifactKind,
    pub offsets: Vec<Point>,
    pub label: Option<String>,
    /// Drawn string, for [`ArtifactKind::Text`].
    pub text: Option<String>,
    pub hatch: Option<String>,
}

impl Handle {
    pub fn new(kind: ArtifactKind, offsets: Vec<Point>) -> Self {
        Self {
            id: 0,
            kind,
            offsets,
            label: None,
            text: None,
            hatch: None,
        }
    }
}

impl Artifact for Handle {
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_string());
    }

    fn offsets(&self) -> &[Point] {
        &self.offsets
    }
}

/// One primitive call as the engine received it.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeCall {
    pub operation: &'static str,
    pub options: OptionMap,
}

/// Keywords each release refuses, per primitive.
const REFUSED: &[(&str, &str, VersionRange)] = &[
    ("violinplot", VERT, VersionRange::AtLeast(EngineVersion::V3_10_0)),
    ("violinplot", ORIENTATION, VersionRange::Below(EngineVersion::V3_10_0)),
    ("violinplot", "side", VersionRange::Below(EngineVersion::V3_9_0)),
    ("violinplot", HATCH, VersionRange::Any),
    ("boxplot", VERT, VersionRange::AtLeast(EngineVersion::V3_10_0)),
    ("boxplot", ORIENTATION, VersionRange::Below(EngineVersion::V3_10_0)),
    ("boxplot", "tick_labels", VersionRange::Below(EngineVersion::V3_9_0)),
    ("boxplot", "labels", VersionRange::AtLeast(EngineVersion::V3_9_0)),
    ("boxplot", HATCH, VersionRange::Any),
];

/// Engine double that keeps everything in memory.
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    version: String,
    calls: Vec<NativeCall>,
    next_id: usize,
}

impl MemoryEngine {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            calls: Vec::new(),
            next_id: 1,
        }
    }

    /// Every native call so far, oldest first.
    pub fn calls(&self) -> &[NativeCall] {
        &self.calls
    }

    /// Calls to one primitive.
    pub fn calls_to<'a>(&'a self, operation: &'a str) -> impl Iterator<Item = &'a NativeCall> + 'a {
        self.calls.iter().filter(move |c| c.operation == operation)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn parsed_version(&self) -> Result<EngineVersion> {
        EngineVersion::parse(&self.version)
    }

    fn record(&mut self, operation: &'static str, options: &OptionMap) {
        debug!(operation, options = %options, "native call");
        self.calls.push(NativeCall {
            operation,
            options: options.clone(),
        });
    }

    fn handle(&mut self, kind: ArtifactKind, offsets: Vec<Point>) -> Handle {
        let mut handle = Handle::new(kind, offsets);
        handle.id = self.next_id;
        self.next_id += 1;
        handle
    }

    fn check_keywords(&self, operation: &str, options: &OptionMap) -> Result<()> {
        let version = self.parsed_version()?;
        for (op, key, range) in REFUSED {
            if *op == operation && options.contains_key(key) && range.contains(version) {
                return Err(PlotError::Engine(format!(
                    "{operation}() got an unexpected keyword argument '{key}' (engine {version})"
                )));
            }
        }
        Ok(())
    }

    fn bodies(
        &mut self,
        operation: &'static str,
        kind: ArtifactKind,
        data: &[Vec<f64>],
        options: &OptionMap,
    ) -> Result<Vec<Handle>> {
        self.check_keywords(operation, options)?;
        let hatches = match options.get(HATCHES) {
            None => None,
            Some(OptionValue::TextList(items)) if items.len() == data.len() => Some(items.clone()),
            Some(other) => {
                return Err(PlotError::Engine(format!(
                    "{operation}() needs one hatch per dataset, got {}",
                    other.entry_count()
                )));
            }
        };
        let vertical = is_vertical(options);
        self.record(operation, options);

        let mut out = Vec::with_capacity(data.len());
        for (i, group) in data.iter().enumerate() {
            let position = (i + 1) as f64;
            let offsets = group
                .iter()
                .map(|&v| {
                    if vertical {
                        Point::new(position, v)
                    } else {
                        Point::new(v, position)
                    }
                })
                .collect();
            let mut body = self.handle(kind, offsets);
            body.hatch = hatches.as_ref().map(|h| h[i].clone());
            out.push(body);
        }
        Ok(out)
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new(EngineVersion::V3_10_0.to_string())
    }
}

fn is_vertical(options: &OptionMap) -> bool {
    if let Some(word) = options.get(ORIENTATION).and_then(OptionValue::as_text) {
        return word != "horizontal";
    }
    options
        .get(VERT)
        .and_then(OptionValue::as_bool)
        .unwrap_or(true)
}

impl Engine for MemoryEngine {
    type Artifact = Handle;

    fn version_string(&self) -> String {
        self.version.clone()
    }

    fn scatter(&mut self, points: &[Point], options: &OptionMap) -> Result<Handle> {
        self.record("scatter", options);
        Ok(self.handle(ArtifactKind::NodeCollection, points.to_vec()))
    }

    fn line_collection(&mut self, segments: &[(Point, Point)], options: &OptionMap) -> Result<Handle> {
        self.record("line_collection", options);
        let midpoints = segments.iter().map(|&(a, b)| a.midpoint(b)).collect();
        Ok(self.handle(ArtifactKind::EdgeCollection, midpoints))
    }

    fn text(&mut self, at: Point, text: &str, options: &OptionMap) -> Result<Handle> {
        self.record("text", options);
        let mut handle = self.handle(ArtifactKind::Text, vec![at]);
        handle.text = Some(text.to_string());
        Ok(handle)
    }

    fn violinplot(&mut self, data: &[Vec<f64>], options: &OptionMap) -> Result<Vec<Handle>> {
        self.bodies("violinplot", ArtifactKind::ViolinBody, data, options)
    }

    fn boxplot(&mut self, data: &[Vec<f64>], options: &OptionMap) -> Result<Vec<Handle>> {
        self.bodies("boxplot", ArtifactKind::BoxBody, data, options)
    }

    fn indicate_inset(
        &mut self,
        bounds: Bounds,
        options: &OptionMap,
    ) -> Result<InsetIndicator<Handle>> {
        let version = self.parsed_version()?;
        if version < EngineVersion::V3_10_0 {
            return Err(PlotError::Engine(format!(
                "indicate_inset() returns a composite indicator only from 3.10.0, engine is {version}"
            )));
        }
        self.record("indicate_inset", options);
        let (rectangle, connectors) = self.inset_parts(bounds);
        Ok(InsetIndicator {
            rectangle,
            connectors,
        })
    }

    fn indicate_inset_legacy(
        &mut self,
        bounds: Bounds,
        options: &OptionMap,
    ) -> Result<(Handle, Vec<Handle>)> {
        let version = self.parsed_version()?;
        if version >= EngineVersion::V3_10_0 {
            return Err(PlotError::Engine(format!(
                "the (rectangle, connectors) inset return was removed in 3.10.0, engine is {version}"
            )));
        }
        self.record("indicate_inset_legacy", options);
        Ok(self.inset_parts(bounds))
    }
}

impl MemoryEngine {
    fn inset_parts(&mut self, bounds: Bounds) -> (Handle, Vec<Handle>) {
        let corners = bounds.corners();
        let rectangle = self.handle(ArtifactKind::InsetRectangle, corners.to_vec());
        let connectors = corners
            .iter()
            .map(|&corner| self.handle(ArtifactKind::InsetConnector, vec![corner]))
            .collect();
        (rectangle, connectors)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
