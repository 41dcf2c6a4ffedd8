//! Path-based architecture heuristics.
//!
//! Every signal here is a case-insensitive substring test against file
//! paths (plus the per-file structure flags). The pattern flags are
//! independent and may all be true at once.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::analysis::FileFacts;

const MVC_INDICATORS: &[&str] = &["model", "view", "controller", "routes", "handlers"];
const LAYERED_INDICATORS: &[&str] = &["service", "repository", "dao", "controller", "business", "domain"];
const MICROSERVICE_INDICATORS: &[&str] = &["service", "api", "gateway", "config", "docker"];
const ENTRY_POINT_NAMES: &[&str] = &["main", "index", "app", "server"];
const TEST_PATH_MARKERS: &[&str] = &["test", "spec"];

const MVC_MIN_HITS: usize = 2;
const LAYERED_MIN_HITS: usize = 2;
const MICROSERVICE_MIN_HITS: usize = 3;
/// Repositories above this file count are monolith candidates.
const MONOLITH_MIN_FILES: usize = 20;

/// Coverage ratio thresholds (strictly greater than).
pub mod coverage {
    pub const HIGH_ABOVE: f64 = 0.5;
    pub const MEDIUM_ABOVE: f64 = 0.2;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFlags {
    pub mvc: bool,
    pub layered: bool,
    pub microservices: bool,
    pub monolithic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// First path segment to file count, for files inside a directory.
    pub directories: BTreeMap<String, usize>,
    /// Largest number of path segments.
    pub max_depth: usize,
    /// Distinct top-level directories per file.
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageLevel {
    High,
    Medium,
    Low,
}

impl CoverageLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > coverage::HIGH_ABOVE {
            CoverageLevel::High
        } else if ratio > coverage::MEDIUM_ABOVE {
            CoverageLevel::Medium
        } else {
            CoverageLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageLevel::High => "High",
            CoverageLevel::Medium => "Medium",
            CoverageLevel::Low => "Low",
        }
    }
}

/// Ratio of test-looking files to everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCoverageEstimate {
    pub test_files: usize,
    pub regular_files: usize,
    pub ratio: f64,
    pub level: CoverageLevel,
}

impl Default for TestCoverageEstimate {
    fn default() -> Self {
        Self {
            test_files: 0,
            regular_files: 0,
            ratio: 0.0,
            level: CoverageLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureReport {
    pub patterns: PatternFlags,
    pub organization: Organization,
    pub entry_points: BTreeSet<String>,
    pub test_coverage: TestCoverageEstimate,
}

impl ArchitectureReport {
    /// Number of files the report was built from.
    pub fn file_count(&self) -> usize {
        self.test_coverage.test_files + self.test_coverage.regular_files
    }
}

/// Build the architecture report for a set of files.
pub fn analyze(files: &[FileFacts]) -> ArchitectureReport {
    let paths: Vec<String> = files.iter().map(|f| f.path.to_lowercase()).collect();

    let microservices = indicator_hits(&paths, MICROSERVICE_INDICATORS) >= MICROSERVICE_MIN_HITS;
    let patterns = PatternFlags {
        mvc: indicator_hits(&paths, MVC_INDICATORS) >= MVC_MIN_HITS,
        layered: indicator_hits(&paths, LAYERED_INDICATORS) >= LAYERED_MIN_HITS,
        microservices,
        monolithic: files.len() > MONOLITH_MIN_FILES && !microservices,
    };

    ArchitectureReport {
        patterns,
        organization: organization(files),
        entry_points: entry_points(files),
        test_coverage: test_coverage(files),
    }
}

/// Count indicators that appear in at least one path.
fn indicator_hits(paths: &[String], indicators: &[&str]) -> usize {
    indicators
        .iter()
        .filter(|indicator| paths.iter().any(|path| path.contains(*indicator)))
        .count()
}

fn organization(files: &[FileFacts]) -> Organization {
    if files.is_empty() {
        return Organization::default();
    }

    let mut directories = BTreeMap::new();
    let mut max_depth = 0;
    for file in files {
        let segments: Vec<&str> = file.path.split('/').collect();
        max_depth = max_depth.max(segments.len());
        if segments.len() > 1 {
            *directories.entry(segments[0].to_string()).or_insert(0) += 1;
        }
    }

    let score = directories.len() as f64 / files.len() as f64;
    Organization {
        directories,
        max_depth,
        score,
    }
}

fn entry_points(files: &[FileFacts]) -> BTreeSet<String> {
    files
        .iter()
        .filter(|file| {
            let path = file.path.to_lowercase();
            file.structure.has_main || ENTRY_POINT_NAMES.iter().any(|name| path.contains(name))
        })
        .map(|file| file.path.clone())
        .collect()
}

fn test_coverage(files: &[FileFacts]) -> TestCoverageEstimate {
    let test_files = files
        .iter()
        .filter(|file| {
            let path = file.path.to_lowercase();
            file.structure.has_tests || TEST_PATH_MARKERS.iter().any(|m| path.contains(m))
        })
        .count();
    let regular_files = files.len() - test_files;
    let ratio = test_files as f64 / regular_files.max(1) as f64;

    TestCoverageEstimate {
        test_files,
        regular_files,
        ratio,
        level: CoverageLevel::from_ratio(ratio),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Language;

    fn facts(path: &str) -> FileFacts {
        FileFacts::empty(path, Language::Python)
    }

    fn facts_for(paths: &[&str]) -> Vec<FileFacts> {
        paths.iter().map(|p| facts(p)).collect()
    }

    #[test]
    fn test_mvc_detected_from_two_indicators() {
        let report = analyze(&facts_for(&["src/models/user.py", "src/controllers/user.py"]));
        assert!(report.patterns.mvc);
        assert!(!report.patterns.microservices);
        assert!(!report.patterns.monolithic);
    }

    #[test]
    fn test_flags_are_independent() {
        let report = analyze(&facts_for(&[
            "services/user_service.py",
            "api/routes.py",
            "gateway/config.py",
            "domain/model.py",
        ]));
        assert!(report.patterns.mvc);
        assert!(report.patterns.layered);
        assert!(report.patterns.microservices);
    }

    #[test]
    fn test_monolithic_requires_many_files_without_microservices() {
        let paths: Vec<String> = (0..21).map(|i| format!("src/mod{}.py", i)).collect();
        let files: Vec<FileFacts> = paths.iter().map(|p| facts(p)).collect();
        assert!(analyze(&files).patterns.monolithic);
        assert!(!analyze(&files[..20]).patterns.monolithic);

        let mut files = files;
        files.push(facts("service/api/gateway.py"));
        assert!(!analyze(&files).patterns.monolithic);
    }

    #[test]
    fn test_organization() {
        let report = analyze(&facts_for(&["src/a.py", "src/pkg/b.py", "setup.py", "docs/c.py"]));
        let org = &report.organization;
        assert_eq!(org.directories.get("src"), Some(&2));
        assert_eq!(org.directories.get("docs"), Some(&1));
        assert!(!org.directories.contains_key("setup.py"));
        assert_eq!(org.max_depth, 3);
        assert!((org.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_entry_points_union_and_dedupe() {
        let mut runner = facts("src/runner.py");
        runner.structure.has_main = true;
        let mut main = facts("src/main.py");
        main.structure.has_main = true;
        let files = vec![runner, main, facts("web/App.tsx"), facts("lib/util.py")];

        let analysis = analyze(&files);
        let entries: Vec<&str> = analysis.entry_points.iter().map(String::as_str).collect();
        assert_eq!(entries, vec!["src/main.py", "src/runner.py", "web/App.tsx"]);
    }

    #[test]
    fn test_coverage_levels() {
        let mut checked = facts("lib/checks.py");
        checked.structure.has_tests = true;
        let files = vec![facts("tests/test_a.py"), checked, facts("lib/a.py"), facts("lib/b.py")];
        let coverage = analyze(&files).test_coverage;
        assert_eq!(coverage.test_files, 2);
        assert_eq!(coverage.regular_files, 2);
        assert_eq!(coverage.level, CoverageLevel::High);

        assert_eq!(CoverageLevel::from_ratio(0.5), CoverageLevel::Medium);
        assert_eq!(CoverageLevel::from_ratio(0.2), CoverageLevel::Low);
        assert_eq!(CoverageLevel::from_ratio(0.21), CoverageLevel::Medium);
    }

    #[test]
    fn test_empty_input() {
        let report = analyze(&[]);
        assert_eq!(report, ArchitectureReport::default());
        assert_eq!(report.file_count(), 0);
        assert_eq!(report.test_coverage.level, CoverageLevel::Low);
    }
}
