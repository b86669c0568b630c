//! Layout types: NodeId, Point, Layout.

use std::collections::BTreeMap;

/// Graph node identifier. Adjacency-matrix rows and edge-list entries map
/// onto it directly; petgraph graphs use their node index.
pub type NodeId = usize;

// ─── Point ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// One coordinate per node, iterated in node-id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<NodeId, Point>,
}

/// Axis-aligned bounding box of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, at: impl Into<Point>) {
        self.positions.insert(node, at.into());
    }

    pub fn get(&self, node: NodeId) -> Option<Point> {
        self.positions.get(&node).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.positions.iter().map(|(&id, &p)| (id, p))
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions.keys().copied()
    }

    /// Keep only the nodes `keep` returns true for.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.positions.retain(|&id, _| keep(id));
    }

    /// `None` for an empty layout.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut points = self.positions.values();
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some(BoundingBox { min, max })
    }

    /// Map every coordinate into the closed unit square.
    ///
    /// One affine transform per axis: subtract the box minimum, divide by the
    /// box extent. An axis with zero extent maps to 0.5. Both terms are
    /// halved first so the extent of finite coordinates cannot overflow.
    pub fn rescaled(&self) -> Layout {
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        let half_x = bbox.max.x / 2.0 - bbox.min.x / 2.0;
        let half_y = bbox.max.y / 2.0 - bbox.min.y / 2.0;
        let scale = |v: f64, lo: f64, half: f64| {
            if half > 0.0 {
                ((v / 2.0 - lo / 2.0) / half).clamp(0.0, 1.0)
            } else {
                0.5
            }
        };
        let positions = self
            .positions
            .iter()
            .map(|(&id, p)| {
                (
                    id,
                    Point::new(
                        scale(p.x, bbox.min.x, half_x),
                        scale(p.y, bbox.min.y, half_y),
                    ),
                )
            })
            .collect();
        Layout { positions }
    }

    /// First node whose position is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<NodeId> {
        self.positions
            .iter()
            .find(|(_, p)| !(p.x.is_finite() && p.y.is_finite()))
            .map(|(&id, _)| id)
    }
}

impl<P: Into<Point>> FromIterator<(NodeId, P)> for Layout {
    fn from_iter<I: IntoIterator<Item = (NodeId, P)>>(iter: I) -> Self {
        let positions = iter.into_iter().map(|(id, p)| (id, p.into())).collect();
        Layout { positions }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
