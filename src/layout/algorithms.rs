//! Named layout algorithms.
//!
//! Every algorithm is deterministic: the same network always gets the same
//! coordinates. Output is centred on the origin and fits in `[-1, 1]²`
//! unless noted otherwise.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::graph::Network;
use super::types::{Layout, NodeId, Point};
use crate::error::{PlotError, Result};

/// Signature shared by every named algorithm.
pub type LayoutFn = fn(&Network) -> Layout;

/// Algorithm used when the caller asks for none.
pub const DEFAULT_ALGORITHM: &str = "spring";

const ALGORITHMS: &[(&str, LayoutFn)] = &[
    ("spring", spring),
    ("circular", circular),
    ("shell", shell),
    ("random", random),
    ("forceatlas2", forceatlas2),
];

const SPRING_ITERATIONS: usize = 50;
const FORCEATLAS_ITERATIONS: usize = 100;
const RANDOM_SEED: u64 = 51423;
const MIN_DISTANCE: f64 = 1e-6;

/// Look an algorithm up by name; a trailing `_layout` is accepted.
pub fn lookup(name: &str) -> Result<LayoutFn> {
    let key = name.strip_suffix("_layout").unwrap_or(name);
    ALGORITHMS
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, f)| *f)
        .ok_or_else(|| PlotError::UnknownLayout(name.to_string()))
}

/// Names accepted by [`lookup`] (without the `_layout` suffix).
pub fn names() -> impl Iterator<Item = &'static str> {
    ALGORITHMS.iter().map(|(n, _)| *n)
}

// ── circular ─────────────────────────────────────────────────────────────────

/// Nodes evenly spaced on the unit circle in id order.
pub fn circular(net: &Network) -> Layout {
    let nodes = net.nodes();
    ring(&nodes, 1.0)
}

fn ring(nodes: &[NodeId], radius: f64) -> Layout {
    if nodes.len() == 1 {
        return [(nodes[0], Point::new(0.0, 0.0))].into_iter().collect();
    }
    let n = nodes.len() as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let theta = TAU * i as f64 / n;
            (id, Point::new(radius * theta.cos(), radius * theta.sin()))
        })
        .collect()
}

// ── shell ────────────────────────────────────────────────────────────────────

/// Concentric rings, highest-degree nodes innermost.
pub fn shell(net: &Network) -> Layout {
    let mut by_degree: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
    for id in net.nodes() {
        by_degree.entry(net.degree(id)).or_default().push(id);
    }
    let shells: Vec<Vec<NodeId>> = by_degree.into_values().rev().collect();
    let count = shells.len() as f64;
    let mut layout = Layout::new();
    for (k, members) in shells.iter().enumerate() {
        let radius = if k == 0 && members.len() == 1 {
            0.0
        } else {
            (k + 1) as f64 / count
        };
        for (id, p) in ring(members, radius).iter() {
            layout.insert(id, p);
        }
    }
    layout
}

// ── random ───────────────────────────────────────────────────────────────────

/// Uniform positions in `[0, 1)²` from a fixed seed.
pub fn random(net: &Network) -> Layout {
    let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
    net.nodes()
        .into_iter()
        .map(|id| {
            let x = rng.gen_range(0.0..1.0);
            let y = rng.gen_range(0.0..1.0);
            (id, Point::new(x, y))
        })
        .collect()
}

// ── spring ───────────────────────────────────────────────────────────────────

/// Fruchterman–Reingold force-directed placement.
///
/// Starts from the circular layout and cools linearly over a fixed number of
/// iterations.
pub fn spring(net: &Network) -> Layout {
    let nodes = net.nodes();
    if nodes.len() < 2 {
        return circular(net);
    }
    let index: BTreeMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let edges: Vec<(usize, usize)> = net
        .edges()
        .into_iter()
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (index[&a], index[&b]))
        .collect();
    let start = circular(net);
    let mut pos: Vec<Point> = nodes.iter().map(|&id| start.get(id).unwrap_or_default()).collect();

    let k = (1.0 / nodes.len() as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (SPRING_ITERATIONS as f64 + 1.0);

    for _ in 0..SPRING_ITERATIONS {
        let mut disp = vec![Point::default(); pos.len()];
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                let (dx, dy, d) = separation(pos[i], pos[j], i, j);
                let force = k * k / d;
                disp[i].x += dx / d * force;
                disp[i].y += dy / d * force;
                disp[j].x -= dx / d * force;
                disp[j].y -= dy / d * force;
            }
        }
        for &(a, b) in &edges {
            let (dx, dy, d) = separation(pos[a], pos[b], a, b);
            let force = d * d / k;
            disp[a].x -= dx / d * force;
            disp[a].y -= dy / d * force;
            disp[b].x += dx / d * force;
            disp[b].y += dy / d * force;
        }
        for (p, d) in pos.iter_mut().zip(&disp) {
            let length = d.x.hypot(d.y).max(MIN_DISTANCE);
            let step = length.min(temperature);
            p.x += d.x / length * step;
            p.y += d.y / length * step;
        }
        temperature -= cooling;
    }
    normalize(nodes.into_iter().zip(pos).collect())
}

// ── forceatlas2 ──────────────────────────────────────────────────────────────

/// ForceAtlas2-style placement: degree-weighted repulsion, linear attraction
/// and a weak pull towards the origin.
pub fn forceatlas2(net: &Network) -> Layout {
    let nodes = net.nodes();
    if nodes.len() < 2 {
        return circular(net);
    }
    let index: BTreeMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let mass: Vec<f64> = nodes.iter().map(|&id| net.degree(id) as f64 + 1.0).collect();
    let edges: Vec<(usize, usize)> = net
        .edges()
        .into_iter()
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (index[&a], index[&b]))
        .collect();
    let start = circular(net);
    let mut pos: Vec<Point> = nodes.iter().map(|&id| start.get(id).unwrap_or_default()).collect();

    let repulsion = 0.01;
    let gravity = 0.05;
    let max_step = 0.05;

    for _ in 0..FORCEATLAS_ITERATIONS {
        let mut disp = vec![Point::default(); pos.len()];
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                let (dx, dy, d) = separation(pos[i], pos[j], i, j);
                let force = repulsion * mass[i] * mass[j] / d;
                disp[i].x += dx / d * force;
                disp[i].y += dy / d * force;
                disp[j].x -= dx / d * force;
                disp[j].y -= dy / d * force;
            }
        }
        for &(a, b) in &edges {
            let (dx, dy, _) = separation(pos[a], pos[b], a, b);
            disp[a].x -= dx;
            disp[a].y -= dy;
            disp[b].x += dx;
            disp[b].y += dy;
        }
        for (i, p) in pos.iter().enumerate() {
            disp[i].x -= gravity * mass[i] * p.x;
            disp[i].y -= gravity * mass[i] * p.y;
        }
        for (p, d) in pos.iter_mut().zip(&disp) {
            let length = d.x.hypot(d.y).max(MIN_DISTANCE);
            let step = length.min(max_step);
            p.x += d.x / length * step;
            p.y += d.y / length * step;
        }
    }
    normalize(nodes.into_iter().zip(pos).collect())
}

// ── helpers ──────────────────────────────────────────────────────────────────

/// Vector from `b` to `a` and its length, never zero. Coincident points are
/// pushed apart along a direction fixed by their indices.
fn separation(a: Point, b: Point, ia: usize, ib: usize) -> (f64, f64, f64) {
    let (dx, dy) = (a.x - b.x, a.y - b.y);
    let d = dx.hypot(dy);
    if d > MIN_DISTANCE {
        return (dx, dy, d);
    }
    let angle = (ia * 31 + ib * 17) as f64;
    (MIN_DISTANCE * angle.cos(), MIN_DISTANCE * angle.sin(), MIN_DISTANCE)
}

/// Centre on the origin and scale so the largest coordinate magnitude is 1.
fn normalize(layout: Layout) -> Layout {
    let n = layout.len() as f64;
    if n == 0.0 {
        return layout;
    }
    let (sx, sy) = layout.iter().fold((0.0, 0.0), |(sx, sy), (_, p)| (sx + p.x, sy + p.y));
    let (cx, cy) = (sx / n, sy / n);
    let extent = layout
        .iter()
        .map(|(_, p)| (p.x - cx).abs().max((p.y - cy).abs()))
        .fold(0.0, f64::max);
    let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
    layout
        .iter()
        .map(|(id, p)| (id, Point::new((p.x - cx) * scale, (p.y - cy) * scale)))
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────
