//! Discover word classes and their recordings under one or more input roots.
//!
//! Each root holds one subdirectory per word:
//!
//! ```text
//! speech_commands/
//!   go/    *.wav
//!   stop/  *.wav
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::label::WordLabel;
use crate::error::CurateError;

/// True if the path has a `.wav` extension, in any letter case.
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// WAV files directly inside `dir`, sorted by path.
pub fn list_wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?
            .path();
        if path.is_file() && is_wav(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Word label → recordings, accumulated across every input root.
///
/// Built once per run and read-only afterwards. Labels iterate in sorted
/// order; paths keep root order, sorted within each directory.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    words: BTreeMap<WordLabel, Vec<PathBuf>>,
}

impl SourceCatalog {
    /// Scan every root. Missing or unreadable roots and badly named
    /// subdirectories are logged and skipped.
    pub fn scan(roots: &[PathBuf]) -> Self {
        let mut catalog = Self::default();
        for root in roots {
            if let Err(e) = catalog.scan_root(root) {
                log::warn!("Ignoring input directory {}: {:#}", root.display(), e);
            }
        }
        log::info!(
            "Found {} word(s), {} file(s) in {} input director{}",
            catalog.words.len(),
            catalog.file_count(),
            roots.len(),
            if roots.len() == 1 { "y" } else { "ies" }
        );
        catalog
    }

    fn scan_root(&mut self, root: &Path) -> Result<()> {
        let root = root
            .canonicalize()
            .with_context(|| format!("No directory named {}", root.display()))?;

        let mut subdirs = Vec::new();
        for entry in std::fs::read_dir(&root)
            .with_context(|| format!("Failed to read directory: {}", root.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    log::warn!("Skipping non-UTF-8 directory name {:?} in {}", raw, root.display());
                    continue;
                }
            };
            match WordLabel::new(name) {
                Ok(label) => subdirs.push((label, path)),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        subdirs.sort();

        for (label, dir) in subdirs {
            let files = match list_wav_files(&dir) {
                Ok(files) => files,
                Err(e) => {
                    log::warn!("{:#}", e);
                    Vec::new()
                }
            };
            log::debug!("  {}: {} file(s) in {}", label, files.len(), dir.display());
            self.words.entry(label).or_default().extend(files);
        }
        Ok(())
    }

    pub fn labels(&self) -> impl Iterator<Item = &WordLabel> {
        self.words.keys()
    }

    pub fn contains(&self, label: &WordLabel) -> bool {
        self.words.contains_key(label)
    }

    /// Recordings for one label; empty if the label is unknown.
    pub fn paths(&self, label: &WordLabel) -> &[PathBuf] {
        self.words.get(label).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.words.values().map(|v| v.len()).sum()
    }

    /// Split the labels into the requested targets and everything else.
    ///
    /// Fails if any target is malformed, reserved, or not a discovered label.
    pub fn partition(&self, targets: &str) -> Result<Partition, CurateError> {
        let targets = parse_targets(targets)?;
        for target in &targets {
            if !self.contains(target) {
                return Err(CurateError::UnknownTarget(target.to_string()));
            }
        }
        let unknown = self
            .labels()
            .filter(|l| !targets.contains(l))
            .cloned()
            .collect();
        Ok(Partition { targets, unknown })
    }
}

/// Parse a comma-separated target list. Entries are trimmed; repeats are
/// dropped, keeping the first occurrence.
pub fn parse_targets(targets: &str) -> Result<Vec<WordLabel>, CurateError> {
    let mut parsed: Vec<WordLabel> = Vec::new();
    for raw in targets.split(',') {
        let label = WordLabel::new(raw.trim())?;
        if label.is_reserved() {
            return Err(CurateError::ReservedLabel(label.to_string()));
        }
        if !parsed.contains(&label) {
            parsed.push(label);
        }
    }
    Ok(parsed)
}

/// Target and unknown word labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub targets: Vec<WordLabel>,
    pub unknown: Vec<WordLabel>,
}

impl Partition {
    /// Every recording of every non-target label, in label order.
    pub fn unknown_paths(&self, catalog: &SourceCatalog) -> Vec<PathBuf> {
        self.unknown
            .iter()
            .flat_map(|label| catalog.paths(label).iter().cloned())
            .collect()
    }
}
