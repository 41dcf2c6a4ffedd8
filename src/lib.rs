//! Reposcope - heuristic static analysis for source repositories.
//!
//! Reposcope extracts structural facts (functions, classes, imports,
//! comments, variables, docstrings, simple metrics) from files in a dozen
//! languages using per-language regular expressions, then reduces them to
//! repository-level summaries, architecture signals, dependency hints and
//! recommendations. Everything is heuristic: patterns are token matchers,
//! not grammars.
//!
//! # Architecture
//!
//! - `analysis`: per-file extraction (`FileParser`, pattern library, metrics)
//! - `repository`: repository-level reductions (`RepositoryAnalyzer`)
//! - `config`: YAML settings for the command-line front end
//! - `acquire`: directory traversal into `SourceFile`s
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line interface
//!
//! # Example
//!
//! ```
//! use reposcope::{Language, RepositoryAnalyzer, SourceFile};
//!
//! let files = vec![SourceFile::new("app.py", Language::Python, "def run():\n    pass\n")];
//! let analysis = RepositoryAnalyzer::new().analyze(&files);
//! assert_eq!(analysis.summary.total_functions, 1);
//! ```

pub mod acquire;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod report;
pub mod repository;

pub use analysis::{
    ComplexityMetrics, Extractor, FileFacts, FileParser, Language, Maintainability, ParseError,
    SourceFile,
};
pub use config::Config;
pub use repository::{
    ArchitectureReport, DependencyReport, PackageAllowList, Recommendation, RepositoryAnalysis,
    RepositoryAnalyzer, SummaryStats,
};
