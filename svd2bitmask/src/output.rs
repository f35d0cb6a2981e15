// Licensed under the Apache-2.0 license

//! Header and diff file writing.

use anyhow::{Context, Result};
use registers_generator_c::{render_header, Catalog, DuplicatePair, GeneratorConfig};
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output directory problems. Either aborts the run before any processing.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Output directory {0} does not exist, exiting")]
    MissingOutputDir(PathBuf),
    #[error("Output path {0} exists but is not a directory, exiting")]
    NotADirectory(PathBuf),
}

/// Checks `dir` is usable, creating it when `create` is set.
pub fn prepare_output_dir(dir: &Path, create: bool) -> Result<PathBuf> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(OutputError::NotADirectory(dir.to_path_buf()).into());
        }
    } else if create {
        println!("Creating output directory {}", dir.display());
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    } else {
        return Err(OutputError::MissingOutputDir(dir.to_path_buf()).into());
    }
    Ok(dir.to_path_buf())
}

/// Writes one header per catalog entry. Redundant instances are not rewritten.
pub fn write_headers(catalog: &Catalog, config: &GeneratorConfig) -> Result<()> {
    for entry in catalog.entries() {
        let Some(path) = entry.path() else {
            continue;
        };
        if !entry.emits_header() {
            log::debug!(
                "{} matches {}, not rewritten",
                entry.peripheral.realname,
                path.display()
            );
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = render_header(&entry.peripheral, &config.prefix);
        log::trace!("{text}");
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Unified diff from the original header text to the duplicate's.
pub fn unified_diff(pair: &DuplicatePair, original: &str, duplicate: &str) -> String {
    let diff = TextDiff::from_lines(original, duplicate);
    let text = diff
        .unified_diff()
        .context_radius(3)
        .header(
            &pair.original.display().to_string(),
            &pair.duplicate.display().to_string(),
        )
        .to_string();
    text
}

/// Writes `<duplicate>.diff` for every divergent duplicate.
pub fn write_diffs(duplicates: &[DuplicatePair]) -> Result<()> {
    for pair in duplicates {
        let original = fs::read_to_string(&pair.original)
            .with_context(|| format!("Failed to read {}", pair.original.display()))?;
        let duplicate = fs::read_to_string(&pair.duplicate)
            .with_context(|| format!("Failed to read {}", pair.duplicate.display()))?;
        let diff_path = pair.diff_path();
        fs::write(&diff_path, unified_diff(pair, &original, &duplicate))
            .with_context(|| format!("Failed to write {}", diff_path.display()))?;
        log::info!("  └>{}", diff_path.display());
    }
    Ok(())
}
