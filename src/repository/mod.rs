//! Repository-level reductions over per-file facts.
//!
//! ```text
//! [SourceFile] ──parse──▶ [FileFacts] ──┬──▶ SummaryStats ──────┐
//!                                       ├──▶ ArchitectureReport ─┼──▶ Recommendations
//!                                       └──▶ DependencyReport    │
//! ```
//!
//! Per-file parsing may run in parallel. Every reduction runs sequentially
//! over the complete, input-ordered fact list.

pub mod architecture;
pub mod dependencies;
pub mod recommendations;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{Extractor, FileFacts, FileParser, Maintainability, SourceFile};

pub use architecture::{ArchitectureReport, CoverageLevel, Organization, PatternFlags, TestCoverageEstimate};
pub use dependencies::{
    normalize_import, DependencyReport, FileFanout, ImportUsage, InternalDependency,
    PackageAllowList, DEFAULT_EXTERNAL_PACKAGES,
};
pub use recommendations::{Recommendation, RecommendationKind};

/// File counts per maintainability class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityDistribution {
    #[serde(rename = "High")]
    pub high: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "Low")]
    pub low: usize,
}

impl ComplexityDistribution {
    pub fn record(&mut self, class: Maintainability) {
        match class {
            Maintainability::High => self.high += 1,
            Maintainability::Medium => self.medium += 1,
            Maintainability::Low => self.low += 1,
        }
    }

    pub fn get(&self, class: Maintainability) -> usize {
        match class {
            Maintainability::High => self.high,
            Maintainability::Medium => self.medium,
            Maintainability::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Totals over successfully parsed files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_imports: usize,
    /// Language tag to file count.
    pub languages: BTreeMap<String, usize>,
    pub complexity_distribution: ComplexityDistribution,
}

impl SummaryStats {
    /// Fold one file into the totals. Error-tagged files are ignored.
    pub fn record(&mut self, facts: &FileFacts) {
        if facts.is_error() {
            return;
        }
        self.total_functions += facts.functions.len();
        self.total_classes += facts.classes.len();
        self.total_imports += facts.imports.len();
        *self
            .languages
            .entry(facts.language.as_str().to_string())
            .or_insert(0) += 1;
        self.complexity_distribution
            .record(facts.complexity.maintainability);
    }

    pub fn from_facts(files: &[FileFacts]) -> Self {
        let mut stats = Self::default();
        for facts in files {
            stats.record(facts);
        }
        stats
    }
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    /// One entry per input file, in input order.
    pub files: Vec<FileFacts>,
    pub summary: SummaryStats,
    pub architecture: ArchitectureReport,
    pub dependencies: DependencyReport,
    pub recommendations: Vec<Recommendation>,
}

impl RepositoryAnalysis {
    /// Facts for a path, if it was part of the input.
    pub fn file(&self, path: &str) -> Option<&FileFacts> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Number of files whose extraction failed.
    pub fn error_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_error()).count()
    }

    /// Successfully parsed files.
    pub fn parsed_files(&self) -> impl Iterator<Item = &FileFacts> {
        self.files.iter().filter(|f| !f.is_error())
    }
}

/// Runs the per-file extractor and every repository-level reduction.
pub struct RepositoryAnalyzer<E: Extractor = FileParser> {
    extractor: E,
    allow_list: PackageAllowList,
    parallel: bool,
}

impl RepositoryAnalyzer<FileParser> {
    pub fn new() -> Self {
        Self {
            extractor: FileParser::new(),
            allow_list: PackageAllowList::default(),
            parallel: false,
        }
    }
}

impl Default for RepositoryAnalyzer<FileParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Extractor> RepositoryAnalyzer<E> {
    /// Swap the per-file extractor.
    pub fn with_extractor<F: Extractor>(self, extractor: F) -> RepositoryAnalyzer<F> {
        RepositoryAnalyzer {
            extractor,
            allow_list: self.allow_list,
            parallel: self.parallel,
        }
    }

    /// Set the external package allow-list.
    pub fn external_packages(mut self, allow_list: PackageAllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Set whether files are parsed in parallel.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Analyze a batch of files. Never fails; per-file failures are
    /// carried as error-tagged facts.
    pub fn analyze(&self, files: &[SourceFile]) -> RepositoryAnalysis {
        let facts: Vec<FileFacts> = if self.parallel {
            files.par_iter().map(|f| self.extractor.parse(f)).collect()
        } else {
            files.iter().map(|f| self.extractor.parse(f)).collect()
        };

        let summary = SummaryStats::from_facts(&facts);
        let architecture = architecture::analyze(&facts);
        let dependencies = dependencies::analyze(&facts, &self.allow_list);
        let recommendations = recommendations::recommend(&summary, &architecture);

        let analysis = RepositoryAnalysis {
            files: facts,
            summary,
            architecture,
            dependencies,
            recommendations,
        };

        info!(
            files = analysis.files.len(),
            errors = analysis.error_count(),
            functions = analysis.summary.total_functions,
            classes = analysis.summary.total_classes,
            "analysis complete"
        );

        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Language, ParseError};

    struct RejectGo;

    impl Extractor for RejectGo {
        fn extract(&self, file: &SourceFile) -> Result<FileFacts, ParseError> {
            if file.language == Language::Go {
                panic!("go is rejected");
            }
            FileParser.extract(file)
        }
    }

    fn py(path: &str, content: &str) -> SourceFile {
        SourceFile::new(path, Language::Python, content)
    }

    #[test]
    fn test_two_file_example() {
        let files = vec![
            py("a.py", "def foo(): pass\ndef _hidden(): pass"),
            py("b.py", "class Bar: pass"),
        ];
        let analysis = RepositoryAnalyzer::new().analyze(&files);

        let funcs: Vec<&str> = analysis.files[0].functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(funcs, vec!["foo"]);
        assert_eq!(analysis.files[1].classes[0].name, "Bar");
        assert_eq!(analysis.summary.total_functions, 1);
        assert_eq!(analysis.summary.total_classes, 1);
        assert_eq!(analysis.summary.languages.len(), 1);
        assert_eq!(analysis.summary.languages.get("python"), Some(&2));
    }

    #[test]
    fn test_empty_input() {
        let analysis = RepositoryAnalyzer::new().analyze(&[]);
        assert!(analysis.files.is_empty());
        assert_eq!(analysis.summary, SummaryStats::default());
        assert_eq!(analysis.summary.complexity_distribution.total(), 0);
        assert_eq!(analysis.architecture, ArchitectureReport::default());
        assert_eq!(analysis.dependencies, DependencyReport::default());
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_failures_excluded_from_summary() {
        let files = vec![
            py("ok.py", "def run(): pass"),
            SourceFile::new("main.go", Language::Go, "package main\nfunc main() {}"),
            py("also_ok.py", "import os"),
        ];
        let analysis = RepositoryAnalyzer::new().with_extractor(RejectGo).analyze(&files);

        assert_eq!(analysis.files.len(), 3);
        assert_eq!(analysis.error_count(), 1);
        assert!(analysis.file("main.go").unwrap().is_error());
        assert_eq!(analysis.parsed_files().count(), 2);
        assert_eq!(analysis.summary.languages.get("go"), None);
        assert_eq!(analysis.summary.total_functions, 1);
        assert_eq!(analysis.summary.total_imports, 1);
        assert_eq!(analysis.summary.complexity_distribution.total(), 2);
        // Path heuristics still see the failed file.
        assert!(analysis.architecture.entry_points.contains("main.go"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let files: Vec<SourceFile> = (0..40)
            .map(|i| py(&format!("pkg/m{}.py", i), &format!("import os\ndef f{}(x):\n    if x:\n        return x\n", i)))
            .collect();
        let sequential = RepositoryAnalyzer::new().analyze(&files);
        let parallel = RepositoryAnalyzer::new().parallel(true).analyze(&files);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.files[7].path, "pkg/m7.py");
    }

    #[test]
    fn test_custom_allow_list_reaches_dependency_report() {
        let files = vec![py("a.py", "import attrs\nimport numpy")];
        let analysis = RepositoryAnalyzer::new()
            .external_packages(PackageAllowList::new(["attrs"]))
            .analyze(&files);
        assert_eq!(analysis.dependencies.external, vec!["attrs"]);
    }

    #[test]
    fn test_distribution_serializes_with_class_names() {
        let mut dist = ComplexityDistribution::default();
        dist.record(Maintainability::Low);
        let json = serde_json::to_value(dist).unwrap();
        assert_eq!(json["Low"], 1);
        assert_eq!(json["High"], 0);
        assert_eq!(dist.get(Maintainability::Low), 1);
    }
}
