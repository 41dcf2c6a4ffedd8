//! Source acquisition: walk a directory and load supported files.
//!
//! This is where extension mapping, size limits and the file-count cap
//! live; the analysis core only ever sees the resulting `SourceFile`s.

use std::fs;
use std::path::Path;

use anyhow::Context;
use globset::GlobSet;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::analysis::{Language, SourceFile};
use crate::config::Config;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "vendor", "target", "__pycache__"];

/// Collect source files under `root` in a stable, sorted order.
///
/// A single file path is accepted too. Returned paths are relative to
/// `root` (or the file name for a single file) and slash-separated.
/// Only a failure on `root` itself is an error; unreadable entries below
/// it are logged and skipped.
pub fn collect_sources(root: &Path, config: &Config) -> anyhow::Result<Vec<SourceFile>> {
    let metadata =
        fs::metadata(root).with_context(|| format!("cannot access path {}", root.display()))?;
    config.validate()?;
    let excluded = config.exclusion_set()?;

    if metadata.is_file() {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(load(root, &name, config).into_iter().collect());
    }

    let mut sources = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.iter().any(|dir| name == *dir)
        });

    for entry in walker {
        let Some(source) = visit(root, entry, &excluded, config)? else {
            continue;
        };
        sources.push(source);
        if sources.len() >= config.max_files {
            info!(max_files = config.max_files, "file limit reached, stopping collection");
            break;
        }
    }

    Ok(sources)
}

/// Handle one walk result: skip failures below the root, directories,
/// excluded paths and unsupported files.
fn visit(
    root: &Path,
    entry: walkdir::Result<DirEntry>,
    excluded: &GlobSet,
    config: &Config,
) -> anyhow::Result<Option<SourceFile>> {
    let entry = match entry {
        Ok(entry) => entry,
        Err(err) if err.depth() == 0 => {
            return Err(err).with_context(|| format!("cannot read directory {}", root.display()));
        }
        Err(err) => {
            warn!(error = %err, "skipping unreadable entry");
            return Ok(None);
        }
    };
    if !entry.file_type().is_file() {
        return Ok(None);
    }

    let path = entry.path();
    let relative = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    if excluded.is_match(&relative) {
        debug!(path = %relative, "excluded by config");
        return Ok(None);
    }

    Ok(load(path, &relative, config))
}

/// Load one file if it has a supported extension and fits the size limit.
/// Unreadable files are logged and skipped.
fn load(path: &Path, relative: &str, config: &Config) -> Option<SourceFile> {
    let language = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)?;

    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(err) => {
            warn!(path = %relative, error = %err, "cannot stat file, skipping");
            return None;
        }
    };
    if size > config.max_file_size {
        info!(path = %relative, size, limit = config.max_file_size, "skipping large file");
        return None;
    }

    match fs::read(path) {
        Ok(bytes) => Some(SourceFile::from_bytes(relative, language, &bytes)),
        Err(err) => {
            warn!(path = %relative, error = %err, "cannot read file, skipping");
            None
        }
    }
}
