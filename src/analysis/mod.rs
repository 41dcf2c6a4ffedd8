//! Per-file structural analysis.
//!
//! This module turns one in-memory source file into a `FileFacts` record
//! using per-language regular expressions. Facts include:
//! - Function and class declarations (with body previews and method samples)
//! - Raw import statements
//! - Comments, variables and docstrings
//! - Line and control-structure metrics with a maintainability class
//! - Coarse structure flags
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ SourceFile      │────▶│ Extractor    │────▶│ FileFacts     │
//! └─────────────────┘     │ (FileParser) │     │ (Functions,   │
//!                         └──────────────┘     │  Imports, etc)│
//!                                │             └───────────────┘
//!                                ▼
//!                         ┌──────────────┐
//!                         │ PatternSet   │
//!                         │ per Language │
//!                         └──────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Add a variant to `Language` and map its extensions
//! 2. Add a `PatternSet` static in `patterns.rs`
//! 3. Route the variant in `patterns_for`

mod complexity;
mod error;
mod extract;
mod facts;
mod language;
mod parser;
pub mod patterns;
mod source;

pub use complexity::{classify, maintainability_score, thresholds, ComplexityMetrics, Maintainability};
pub use error::ParseError;
pub use facts::{
    ClassFact, CommentFact, CommentKind, DocstringFact, FileFacts, FunctionFact, ImportFact,
    IndentationStyle, StructureFlags,
};
pub use language::Language;
pub use parser::{Extractor, FileParser};
pub use patterns::{pattern, patterns_for, FactKind, PatternSet};
pub use source::SourceFile;

/// Caps applied during extraction and aggregation.
pub mod limits {
    /// Imports kept per file.
    pub const MAX_IMPORTS: usize = 20;
    /// Comments kept per file.
    pub const MAX_COMMENTS: usize = 10;
    /// Comments this short (in characters) are dropped.
    pub const MIN_COMMENT_CHARS: usize = 3;
    /// Distinct variable names kept per file.
    pub const MAX_VARIABLES: usize = 15;
    /// Docstrings kept per file.
    pub const MAX_DOCSTRINGS: usize = 5;
    /// Docstrings this short (in characters) are dropped.
    pub const MIN_DOCSTRING_CHARS: usize = 10;
    /// Method names sampled per class.
    pub const MAX_CLASS_METHODS: usize = 5;
    /// Characters after a class declaration searched for methods.
    pub const CLASS_WINDOW_CHARS: usize = 1000;
    /// Lines scanned for an indentation-delimited body.
    pub const MAX_BODY_LINES: usize = 10;
    /// Characters scanned for a brace-delimited body.
    pub const MAX_BODY_CHARS: usize = 500;
    /// Body preview length before truncation.
    pub const BODY_PREVIEW_CHARS: usize = 200;

    /// External dependency names reported.
    pub const MAX_EXTERNAL_DEPS: usize = 10;
    /// Files reported in the internal dependency map.
    pub const MAX_INTERNAL_DEP_FILES: usize = 10;
    /// Modules reported per file in the internal dependency map.
    pub const MAX_INTERNAL_DEPS_PER_FILE: usize = 5;
    /// Entries in the most-used imports list.
    pub const MAX_MOST_USED_IMPORTS: usize = 10;
}
