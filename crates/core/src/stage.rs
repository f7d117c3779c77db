//! Output root staging: delete a previous run (with permission) and create
//! a fresh, empty output directory.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::CurateError;

/// Make `out_dir` an empty directory.
///
/// If it already exists, `confirm` is asked first; declining, or a deletion
/// that leaves the directory behind, fails without touching anything else.
pub fn stage_output_root<F>(out_dir: &Path, confirm: F) -> Result<()>
where
    F: FnOnce(&Path) -> bool,
{
    if out_dir.exists() {
        if !confirm(out_dir) {
            return Err(CurateError::StagingDeclined(out_dir.to_path_buf()).into());
        }
        log::info!("Deleting and recreating output directory {}", out_dir.display());
        if out_dir.is_dir() {
            std::fs::remove_dir_all(out_dir)
                .with_context(|| format!("Failed to delete {}", out_dir.display()))?;
        } else {
            std::fs::remove_file(out_dir)
                .with_context(|| format!("Failed to delete {}", out_dir.display()))?;
        }
        if out_dir.exists() {
            return Err(CurateError::StagingFailed(out_dir.to_path_buf()).into());
        }
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    Ok(())
}
