//! Startup-time failures. Per-item data problems never land here (they go to
//! [`crate::diagnostics`]); this is only for conditions that make the whole
//! result set unusable.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// A result file could not be opened or read.
    #[error("failed to read result file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Strict cross-file validation found different sentences at the same row.
    #[error("result files diverge at row {index}: baseline {baseline:?} vs fine-tuned {finetuned:?}")]
    Misaligned {
        index: usize,
        baseline: String,
        finetuned: String,
    },

    /// Strict cross-file validation found different record counts.
    #[error("result files have different record counts: baseline {baseline} vs fine-tuned {finetuned}")]
    LengthMismatch { baseline: usize, finetuned: usize },
}
