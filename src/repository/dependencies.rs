//! Import-based dependency heuristics.
//!
//! Raw import statements are normalized to a single identifier and then
//! classified. External classification is a substring match against a
//! curated allow-list; it is incomplete by construction and should be read
//! as a hint, not as a resolved dependency set.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::limits;
use crate::analysis::FileFacts;

/// Curated well-known third-party package names.
pub const DEFAULT_EXTERNAL_PACKAGES: &[&str] = &[
    "numpy",
    "pandas",
    "requests",
    "flask",
    "django",
    "react",
    "express",
    "lodash",
    "axios",
    "moment",
    "jquery",
    "bootstrap",
    "tensorflow",
    "pytorch",
    "opencv",
    "matplotlib",
    "spring",
    "hibernate",
];

/// Package names treated as external when found inside a normalized import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageAllowList(Vec<String>);

impl PackageAllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            names
                .into_iter()
                .map(|n| n.into().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        )
    }

    /// Whether a lowercased identifier contains any listed name.
    pub fn matches(&self, identifier: &str) -> bool {
        self.0.iter().any(|name| identifier.contains(name.as_str()))
    }
}

impl Default for PackageAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_EXTERNAL_PACKAGES.iter().copied())
    }
}

/// Imports of one file that name another file in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalDependency {
    pub file: String,
    pub dependencies: Vec<String>,
}

/// A normalized import and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportUsage {
    pub name: String,
    pub count: usize,
}

/// Per-file fan-out proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFanout {
    pub file: String,
    pub imports: usize,
    pub functions: usize,
    pub classes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub external: Vec<String>,
    pub internal: Vec<InternalDependency>,
    pub most_used: Vec<ImportUsage>,
    pub graph: Vec<FileFanout>,
}

/// Reduce a raw import statement to one identifier.
///
/// - `from X import ...` gives `X`
/// - `import X.Y` gives `X`
/// - `#include <X>` or `#include "X"` gives `X`
/// - anything else gives its first whitespace-separated token
pub fn normalize_import(raw: &str) -> String {
    let stmt = raw.trim();
    let mut tokens = stmt.split_whitespace();
    let first = tokens.next();
    let second = tokens.next();

    if stmt.starts_with("from") {
        if let Some(module) = second {
            return module.to_string();
        }
    } else if stmt.starts_with("import") {
        if let Some(module) = second {
            return module.split('.').next().unwrap_or(module).to_string();
        }
    } else if stmt.starts_with("#include") {
        return include_target(stmt).to_string();
    }

    first.unwrap_or(stmt).to_string()
}

fn include_target(stmt: &str) -> &str {
    if let Some((_, rest)) = stmt.split_once('<') {
        rest.split('>').next().unwrap_or(rest)
    } else if let Some((_, rest)) = stmt.split_once('"') {
        rest.split('"').next().unwrap_or(rest)
    } else {
        stmt
    }
}

/// Build the dependency report.
pub fn analyze(files: &[FileFacts], allow_list: &PackageAllowList) -> DependencyReport {
    DependencyReport {
        external: external(files, allow_list),
        internal: internal(files),
        most_used: most_used(files),
        graph: graph(files),
    }
}

fn normalized_imports(file: &FileFacts) -> impl Iterator<Item = String> + '_ {
    file.imports.iter().map(|imp| normalize_import(imp.raw()))
}

fn external(files: &[FileFacts], allow_list: &PackageAllowList) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut external = Vec::new();

    for name in files.iter().flat_map(normalized_imports) {
        let name = name.to_lowercase();
        if allow_list.matches(&name) && seen.insert(name.clone()) {
            external.push(name);
            if external.len() == limits::MAX_EXTERNAL_DEPS {
                break;
            }
        }
    }

    external
}

/// Extension-stripped file name: last path segment cut at its first dot.
fn base_name(path: &str) -> &str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name.split('.').next().unwrap_or(file_name)
}

fn internal(files: &[FileFacts]) -> Vec<InternalDependency> {
    let candidates: HashSet<&str> = files
        .iter()
        .map(|f| base_name(&f.path))
        .filter(|name| !name.is_empty())
        .collect();

    files
        .iter()
        .filter_map(|file| {
            let dependencies: Vec<String> = normalized_imports(file)
                .filter(|name| candidates.iter().any(|c| name.contains(c)))
                .take(limits::MAX_INTERNAL_DEPS_PER_FILE)
                .collect();
            (!dependencies.is_empty()).then(|| InternalDependency {
                file: file.path.clone(),
                dependencies,
            })
        })
        .take(limits::MAX_INTERNAL_DEP_FILES)
        .collect()
}

fn most_used(files: &[FileFacts]) -> Vec<ImportUsage> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for name in files.iter().flat_map(normalized_imports) {
        let count = counts.entry(name.clone()).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    let mut usage: Vec<ImportUsage> = order
        .into_iter()
        .map(|name| {
            let count = counts.get(&name).copied().unwrap_or(0);
            ImportUsage { name, count }
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage.truncate(limits::MAX_MOST_USED_IMPORTS);
    usage
}

fn graph(files: &[FileFacts]) -> Vec<FileFanout> {
    files
        .iter()
        .map(|file| FileFanout {
            file: file.path.clone(),
            imports: file.imports.len(),
            functions: file.functions.len(),
            classes: file.classes.len(),
        })
        .collect()
}
