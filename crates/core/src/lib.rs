//! Keyword-spotting dataset curation.
//!
//! Scans word-labeled recordings, then writes fixed-length clips for every
//! target word, a catch-all `_unknown` class, and pure background `_noise`,
//! each mixed over random background-noise snippets.

pub mod audio;
pub mod corpus;
pub mod error;
pub mod mixing;
pub mod pipeline;
pub mod stage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::CurateError;
pub use pipeline::{CurateConfig, process, process_with_rng};
pub use types::{BitDepth, CurationSummary, MixParams};
