//! Label resolution — lines a caller's labels up with the artists a call
//! produced.

use std::fmt;

use tracing::warn;

use crate::engine::Artifact;
use crate::error::{PlotError, Result};

/// A recoverable diagnostic. Never stops a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotWarning {
    /// Fewer labels than artists; the labels were repeated cyclically.
    LabelsPadded { given: usize, expected: usize },
    /// More labels than artists; the surplus was discarded.
    LabelsTruncated { given: usize, expected: usize },
    /// An empty label list was given for a non-empty plot.
    EmptyLabels { expected: usize },
}

impl fmt::Display for PlotWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotWarning::LabelsPadded { given, expected } => write!(
                f,
                "{given} labels for {expected} artists; repeating labels to fill the gap"
            ),
            PlotWarning::LabelsTruncated { given, expected } => write!(
                f,
                "{given} labels for {expected} artists; ignoring the extra labels"
            ),
            PlotWarning::EmptyLabels { expected } => {
                write!(f, "empty label list for {expected} artists; plotting unlabeled")
            }
        }
    }
}

/// Labels sized to the artist count, plus what it took to get there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLabels {
    pub labels: Vec<String>,
    pub warnings: Vec<PlotWarning>,
}

impl ResolvedLabels {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Size `labels` to `artifact_count`.
///
/// Short lists are cycled, long lists are cut; each adjustment yields one
/// warning. With `strict`, cutting labels or passing an empty list for a
/// non-empty plot is an error instead. Padding is always allowed.
pub fn resolve_labels(
    labels: Option<&[String]>,
    artifact_count: usize,
    strict: bool,
) -> Result<ResolvedLabels> {
    let Some(labels) = labels else {
        return Ok(ResolvedLabels::default());
    };
    let given = labels.len();

    if given == artifact_count {
        return Ok(ResolvedLabels {
            labels: labels.to_vec(),
            warnings: Vec::new(),
        });
    }

    if given == 0 {
        if strict {
            return Err(PlotError::LabelCount {
                given,
                expected: artifact_count,
            });
        }
        return Ok(emit(
            Vec::new(),
            PlotWarning::EmptyLabels {
                expected: artifact_count,
            },
        ));
    }

    if given < artifact_count {
        let padded = labels.iter().cycle().take(artifact_count).cloned().collect();
        return Ok(emit(
            padded,
            PlotWarning::LabelsPadded {
                given,
                expected: artifact_count,
            },
        ));
    }

    if strict {
        return Err(PlotError::LabelCount {
            given,
            expected: artifact_count,
        });
    }
    Ok(emit(
        labels[..artifact_count].to_vec(),
        PlotWarning::LabelsTruncated {
            given,
            expected: artifact_count,
        },
    ))
}

fn emit(labels: Vec<String>, warning: PlotWarning) -> ResolvedLabels {
    warn!("{warning}");
    ResolvedLabels {
        labels,
        warnings: vec![warning],
    }
}

/// Set each label on the artist at the same position.
///
/// Extra artists (possible only with an empty label set) keep their label.
pub fn attach_labels<A: Artifact>(artifacts: &mut [A], labels: &[String]) {
    for (artifact, label) in artifacts.iter_mut().zip(labels) {
        artifact.set_label(label);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
