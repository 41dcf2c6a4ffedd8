//! Configuration for the command-line front end.
//!
//! The analysis core takes no configuration; these settings only steer
//! file acquisition and pick the external package list handed to the
//! dependency analyzer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::repository::PackageAllowList;

/// Config file names searched for in the analyzed directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["reposcope.yaml", ".reposcope.yaml"];

/// Commented default config written by `reposcope init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("templates/reposcope.yaml");

fn default_max_file_size() -> u64 {
    50_000
}

fn default_max_files() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Files larger than this many bytes are skipped.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Collection stops after this many files.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Glob patterns for relative paths to skip (e.g. "**/generated/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Replaces the built-in external package list when set.
    #[serde(default)]
    pub external_packages: Option<Vec<String>>,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
            excluded_paths: Vec::new(),
            external_packages: None,
            parallel: false,
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load an explicit config, or discover one in `dir`, or fall back to
    /// defaults. Returns the path that was loaded, if any.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(dir),
        };

        let config = match &path {
            Some(p) => Self::parse_file(p)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok((config, path))
    }

    /// Reject settings that would make every run empty or cannot compile.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_file_size == 0 {
            anyhow::bail!("max_file_size must be greater than zero");
        }
        if self.max_files == 0 {
            anyhow::bail!("max_files must be greater than zero");
        }
        self.exclusion_set()?;
        Ok(())
    }

    /// Compile `excluded_paths` into a single matcher.
    pub fn exclusion_set(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        builder.build().context("failed to build excluded_paths matcher")
    }

    /// The external package list to hand to the dependency analyzer.
    pub fn allow_list(&self) -> PackageAllowList {
        match &self.external_packages {
            Some(names) => PackageAllowList::new(names.iter().cloned()),
            None => PackageAllowList::default(),
        }
    }
}

/// Find a config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
