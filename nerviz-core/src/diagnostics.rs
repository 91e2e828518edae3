//! # Structured Diagnostics
//!
//! Every data problem in the pipeline is local and non-fatal: a record with a
//! broken JSON blob, a mention that cannot be found in its sentence, a span
//! that does not land on token boundaries. Those items are dropped, never
//! repaired, and each drop is recorded here as a [`Diagnostic`] instead of an
//! ad-hoc console print. That makes the skip policy testable: a test can
//! assert exactly which inputs were dropped, at which stage, and why.
//!
//! Core code only collects; surfacing (log, console, UI counter) is the
//! caller's concern.

use serde::{Deserialize, Serialize};

/// Pipeline stage a dropped item was rejected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Model-output blob did not contain a parseable JSON object.
    Parse,
    /// Entity mention text was not found inside its sentence.
    Alignment,
    /// Character span did not line up with token boundaries.
    TokenBoundary,
    /// Baseline and fine-tuned files disagree at a shared row index.
    FileAlignment,
}

/// One dropped (or suspicious) item: where it failed, what it was, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    /// The offending input, verbatim (mention text, sentence, blob...).
    pub input: String,
    pub reason: String,
}

/// Append-only collector threaded through the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: Stage, input: impl Into<String>, reason: impl Into<String>) {
        self.items.push(Diagnostic {
            stage,
            input: input.into(),
            reason: reason.into(),
        });
    }

    /// Merges another collector into this one, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many items were dropped at a given stage.
    pub fn count_for(&self, stage: Stage) -> usize {
        self.items.iter().filter(|d| d.stage == stage).count()
    }
}
