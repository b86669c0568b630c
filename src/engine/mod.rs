//! The narrow call surface of the underlying plotting engine.
//!
//! Everything above this module talks to the engine only through
//! [`Engine`]. Option maps reaching these methods are already translated
//! for the engine's release.

mod memory;

pub use memory::{ArtifactKind, Handle, MemoryEngine, NativeCall};

use crate::error::{PlotError, Result};
use crate::layout::types::Point;
use crate::options::OptionMap;

/// A rendered element handed back by the engine.
pub trait Artifact {
    fn label(&self) -> Option<&str>;
    fn set_label(&mut self, label: &str);
    /// Data-space positions the artifact was drawn at.
    fn offsets(&self) -> &[Point];
}

/// Inset rectangle in the parent's data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Finite origin and strictly positive extent.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(PlotError::InvalidBounds(format!(
                "{self:?} has a non-finite component"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(PlotError::InvalidBounds(format!(
                "width {} and height {} must be positive",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn corners(&self) -> [Point; 4] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }
}

/// Composite inset indicator returned by newer engine releases.
#[derive(Debug, Clone, PartialEq)]
pub struct InsetIndicator<A> {
    pub rectangle: A,
    pub connectors: Vec<A>,
}

/// What `inset_axes` hands back, exactly as the engine returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum Inset<A> {
    /// One indicator object (3.10 and later).
    Composite(InsetIndicator<A>),
    /// `(rectangle, connectors)` (before 3.10).
    Pair(A, Vec<A>),
}

impl<A> Inset<A> {
    pub fn rectangle(&self) -> &A {
        match self {
            Inset::Composite(indicator) => &indicator.rectangle,
            Inset::Pair(rectangle, _) => rectangle,
        }
    }

    pub fn connectors(&self) -> &[A] {
        match self {
            Inset::Composite(indicator) => &indicator.connectors,
            Inset::Pair(_, connectors) => connectors,
        }
    }
}

/// The engine primitives this crate drives.
pub trait Engine {
    type Artifact: Artifact;

    /// Raw version string as the engine reports it.
    fn version_string(&self) -> String;

    fn scatter(&mut self, points: &[Point], options: &OptionMap) -> Result<Self::Artifact>;

    fn line_collection(
        &mut self,
        segments: &[(Point, Point)],
        options: &OptionMap,
    ) -> Result<Self::Artifact>;

    fn text(&mut self, at: Point, text: &str, options: &OptionMap) -> Result<Self::Artifact>;

    /// One body per group.
    fn violinplot(&mut self, data: &[Vec<f64>], options: &OptionMap)
    -> Result<Vec<Self::Artifact>>;

    /// One box per group.
    fn boxplot(&mut self, data: &[Vec<f64>], options: &OptionMap) -> Result<Vec<Self::Artifact>>;

    fn indicate_inset(
        &mut self,
        _bounds: Bounds,
        _options: &OptionMap,
    ) -> Result<InsetIndicator<Self::Artifact>> {
        Err(PlotError::Engine(
            "indicate_inset is not provided by this engine".to_string(),
        ))
    }

    fn indicate_inset_legacy(
        &mut self,
        _bounds: Bounds,
        _options: &OptionMap,
    ) -> Result<(Self::Artifact, Vec<Self::Artifact>)> {
        Err(PlotError::Engine(
            "indicate_inset_legacy is not provided by this engine".to_string(),
        ))
    }
}
