//! Typed failures for the curation pipeline.
//!
//! Library functions return `anyhow::Result`; these variants travel inside
//! the `anyhow::Error` and can be recovered with `downcast_ref`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CurateError {
    #[error("Invalid word label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    #[error("Word label '{0}' is reserved for an output category")]
    ReservedLabel(String),

    #[error("Target word '{0}' not found as subdirectory in input directories")]
    UnknownTarget(String),

    #[error("No usable background noise files in {}", .0.display())]
    EmptyNoisePool(PathBuf),

    #[error("Output directory {} already exists and deletion was declined", .0.display())]
    StagingDeclined(PathBuf),

    #[error("Output directory {} could not be deleted", .0.display())]
    StagingFailed(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
