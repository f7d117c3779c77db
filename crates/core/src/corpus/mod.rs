//! Corpus scanning: word labels, source catalog, target/unknown partition.

pub mod label;
pub mod scan;

pub use label::{NOISE_CATEGORY, UNKNOWN_CATEGORY, WordLabel};
pub use scan::{Partition, SourceCatalog, list_wav_files, parse_targets};
