//! Keyword translation — rewrites an [`OptionMap`] into the spelling the
//! installed engine release accepts.
//!
//! Rules live in a declarative [`RuleTable`]. For every concept an operation
//! declares (orientation, hatching, …) exactly one rule may match a given
//! [`EngineVersion`]; the table refuses overlapping ranges, and translation
//! refuses to guess when no range matches.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{PlotError, Result};
use crate::options::{OptionMap, OptionValue};
use crate::version::EngineVersion;

// ── OperationKind ────────────────────────────────────────────────────────────

/// A native engine call whose keywords are translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Violin,
    Box,
    GraphNodes,
    GraphEdges,
    GraphLabels,
    Inset,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Violin,
        OperationKind::Box,
        OperationKind::GraphNodes,
        OperationKind::GraphEdges,
        OperationKind::GraphLabels,
        OperationKind::Inset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Violin => "violinplot",
            OperationKind::Box => "boxplot",
            OperationKind::GraphNodes => "graph-nodes",
            OperationKind::GraphEdges => "graph-edges",
            OperationKind::GraphLabels => "graph-labels",
            OperationKind::Inset => "inset",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "violin" | "violinplot" | "violinploth" => Ok(OperationKind::Violin),
            "box" | "boxplot" | "boxploth" => Ok(OperationKind::Box),
            "nodes" | "graph-nodes" => Ok(OperationKind::GraphNodes),
            "edges" | "graph-edges" => Ok(OperationKind::GraphEdges),
            "labels" | "graph-labels" => Ok(OperationKind::GraphLabels),
            "inset" | "inset_axes" => Ok(OperationKind::Inset),
            other => Err(PlotError::InvalidOption {
                key: other.to_string(),
                expected: "one of violin, box, nodes, edges, labels, inset",
            }),
        }
    }
}

// ── VersionRange ─────────────────────────────────────────────────────────────

/// Half-open range of engine versions a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionRange {
    Any,
    Below(EngineVersion),
    AtLeast(EngineVersion),
    /// `from <= v < until`
    Between {
        from: EngineVersion,
        until: EngineVersion,
    },
}

impl VersionRange {
    pub fn contains(&self, version: EngineVersion) -> bool {
        let (lo, hi) = self.bounds();
        version >= lo && hi.is_none_or(|hi| version < hi)
    }

    pub fn overlaps(&self, other: &VersionRange) -> bool {
        let (lo_a, hi_a) = self.bounds();
        let (lo_b, hi_b) = other.bounds();
        let lo = lo_a.max(lo_b);
        let hi = match (hi_a, hi_b) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        hi.is_none_or(|hi| lo < hi)
    }

    fn bounds(&self) -> (EngineVersion, Option<EngineVersion>) {
        let floor = EngineVersion::new(0, 0, 0);
        match *self {
            VersionRange::Any => (floor, None),
            VersionRange::Below(v) => (floor, Some(v)),
            VersionRange::AtLeast(v) => (v, None),
            VersionRange::Between { from, until } => (from, Some(until)),
        }
    }
}

// ── Rewrite ──────────────────────────────────────────────────────────────────

/// How the orientation concept is spelled for an engine release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationStyle {
    /// `orientation="vertical" | "horizontal"`
    Keyword,
    /// `vert=true | false`
    Flag,
}

pub const VERT: &str = "vert";
pub const ORIENTATION: &str = "orientation";
pub const HATCH: &str = "hatch";
pub const HATCHES: &str = "hatches";

/// What a matching rule does to the option map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// Leave the map alone.
    Keep,
    /// Emit exactly one of `vert` / `orientation`.
    Orientation(OrientationStyle),
    /// Rename `from` to `to`. When both are present the value under
    /// `prefer` is kept.
    Rename {
        from: &'static str,
        to: &'static str,
        prefer: &'static str,
    },
    /// Remove a key the engine release does not understand.
    Drop { key: &'static str },
    /// A value applied to every artist (`single`) or one per artist
    /// (`sequence`). The native call always receives `sequence`.
    Cardinality {
        single: &'static str,
        sequence: &'static str,
    },
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub operation: OperationKind,
    pub concept: &'static str,
    pub range: VersionRange,
    pub rewrite: Rewrite,
}

impl Rule {
    pub const fn new(
        operation: OperationKind,
        concept: &'static str,
        range: VersionRange,
        rewrite: Rewrite,
    ) -> Self {
        Self {
            operation,
            concept,
            range,
            rewrite,
        }
    }
}

// ── RuleTable ────────────────────────────────────────────────────────────────

/// Ordered rule list with mutually exclusive ranges per (operation, concept).
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table, rejecting overlapping ranges.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let table = Self { rules };
        table.validate()?;
        Ok(table)
    }

    /// The rules this crate ships with.
    pub fn builtin() -> Self {
        use OperationKind::{Box, Violin};
        use VersionRange::{Any, AtLeast, Below};

        let v3_10 = EngineVersion::V3_10_0;
        let v3_9 = EngineVersion::V3_9_0;
        let hatching = Rewrite::Cardinality {
            single: HATCH,
            sequence: HATCHES,
        };

        let mut rules = Vec::new();
        for op in [Violin, Box] {
            rules.push(Rule::new(
                op,
                "orientation",
                AtLeast(v3_10),
                Rewrite::Orientation(OrientationStyle::Keyword),
            ));
            rules.push(Rule::new(
                op,
                "orientation",
                Below(v3_10),
                Rewrite::Orientation(OrientationStyle::Flag),
            ));
            rules.push(Rule::new(op, "hatch", Any, hatching));
        }
        rules.push(Rule::new(Violin, "side", AtLeast(v3_9), Rewrite::Keep));
        rules.push(Rule::new(
            Violin,
            "side",
            Below(v3_9),
            Rewrite::Drop { key: "side" },
        ));
        rules.push(Rule::new(
            Box,
            "tick labels",
            AtLeast(v3_9),
            Rewrite::Rename {
                from: "labels",
                to: "tick_labels",
                prefer: "tick_labels",
            },
        ));
        rules.push(Rule::new(
            Box,
            "tick labels",
            Below(v3_9),
            Rewrite::Rename {
                from: "tick_labels",
                to: "labels",
                prefer: "tick_labels",
            },
        ));
        Self { rules }
    }

    /// Check that no two rules for the same (operation, concept) overlap.
    pub fn validate(&self) -> Result<()> {
        for (i, a) in self.rules.iter().enumerate() {
            for b in &self.rules[i + 1..] {
                if a.operation == b.operation
                    && a.concept == b.concept
                    && a.range.overlaps(&b.range)
                {
                    return Err(PlotError::OverlappingRules {
                        operation: a.operation,
                        concept: a.concept,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Concepts declared for `op`, in declaration order.
    pub fn concepts(&self, op: OperationKind) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for rule in self.rules.iter().filter(|r| r.operation == op) {
            if !seen.contains(&rule.concept) {
                seen.push(rule.concept);
            }
        }
        seen
    }

    /// The single rule for (`op`, `concept`) that applies at `version`.
    pub fn lookup(
        &self,
        op: OperationKind,
        concept: &'static str,
        version: EngineVersion,
    ) -> Result<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.operation == op && r.concept == concept)
            .find(|r| r.range.contains(version))
            .ok_or(PlotError::NoMatchingRule {
                operation: op,
                concept,
                version,
            })
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ── Translator ───────────────────────────────────────────────────────────────

/// Applies a [`RuleTable`] to option maps.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    table: RuleTable,
}

impl Translator {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Rewrite `options` for `op` on engine `version`.
    ///
    /// `artifacts` is the number of artists the call will produce; per-artist
    /// sequences must match it exactly.
    pub fn translate(
        &self,
        op: OperationKind,
        options: OptionMap,
        version: EngineVersion,
        artifacts: usize,
    ) -> Result<OptionMap> {
        let mut options = options;
        for concept in self.table.concepts(op) {
            let rule = self.table.lookup(op, concept, version)?;
            debug!(operation = %op, concept, %version, rewrite = ?rule.rewrite, "applying keyword rule");
            apply(rule.rewrite, &mut options, artifacts)?;
        }
        Ok(options)
    }
}

fn apply(rewrite: Rewrite, options: &mut OptionMap, artifacts: usize) -> Result<()> {
    match rewrite {
        Rewrite::Keep => Ok(()),
        Rewrite::Orientation(style) => apply_orientation(style, options),
        Rewrite::Rename { from, to, prefer } => {
            if options.contains_key(from) && options.contains_key(to) {
                debug!(from, to, prefer, "both spellings given");
            }
            let value = [prefer, from, to]
                .into_iter()
                .find_map(|key| options.get(key).cloned());
            if let Some(value) = value {
                options.collapse(&[from, to], to, value);
            }
            Ok(())
        }
        Rewrite::Drop { key } => {
            if options.remove(key).is_some() {
                debug!(key, "dropped keyword unsupported by this engine release");
            }
            Ok(())
        }
        Rewrite::Cardinality { single, sequence } => {
            apply_cardinality(single, sequence, options, artifacts)
        }
    }
}

fn apply_orientation(style: OrientationStyle, options: &mut OptionMap) -> Result<()> {
    let from_keyword = match options.get(ORIENTATION) {
        None => None,
        Some(value) => Some(match value.as_text() {
            Some("vertical") => true,
            Some("horizontal") => false,
            _ => {
                return Err(PlotError::InvalidOption {
                    key: ORIENTATION.to_string(),
                    expected: "\"vertical\" or \"horizontal\"",
                });
            }
        }),
    };
    let from_flag = match options.get(VERT) {
        None => None,
        Some(value) => Some(value.as_bool().ok_or_else(|| PlotError::InvalidOption {
            key: VERT.to_string(),
            expected: "a boolean",
        })?),
    };
    if from_keyword.is_some() && from_flag.is_some() {
        debug!("both vert and orientation given; orientation wins");
    }
    let Some(vertical) = from_keyword.or(from_flag) else {
        return Ok(());
    };
    match style {
        OrientationStyle::Keyword => {
            let word = if vertical { "vertical" } else { "horizontal" };
            options.collapse(&[VERT, ORIENTATION], ORIENTATION, word);
        }
        OrientationStyle::Flag => {
            options.collapse(&[VERT, ORIENTATION], VERT, vertical);
        }
    }
    Ok(())
}

fn apply_cardinality(
    single: &'static str,
    sequence: &'static str,
    options: &mut OptionMap,
    artifacts: usize,
) -> Result<()> {
    let (source, value) = match (options.get(sequence), options.get(single)) {
        (Some(seq), other) => {
            if other.is_some() {
                debug!(single, sequence, "both given; the per-artist sequence wins");
            }
            (sequence, seq.clone())
        }
        (None, Some(one)) => (single, one.clone()),
        (None, None) => return Ok(()),
    };
    let value = match value {
        OptionValue::Text(one) if source == sequence => OptionValue::TextList(vec![one]),
        text @ (OptionValue::Text(_) | OptionValue::TextList(_)) => text,
        _ => {
            return Err(PlotError::InvalidOption {
                key: source.to_string(),
                expected: "a pattern string or a list of patterns",
            });
        }
    };
    if value.is_sequence() && value.entry_count() != artifacts {
        return Err(PlotError::Cardinality {
            option: source.to_string(),
            expected: artifacts,
            actual: value.entry_count(),
        });
    }
    options.collapse(&[single, sequence], sequence, value.broadcast(artifacts));
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────
