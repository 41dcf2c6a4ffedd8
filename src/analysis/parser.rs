//! File-level fact extraction and the per-file failure boundary.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::{extract, ComplexityMetrics, FileFacts, ParseError, SourceFile};

/// Turns one source file into its facts.
///
/// Implementations only provide [`Extractor::extract`]. Callers use
/// [`Extractor::parse`], which never fails: an error or a panic inside
/// extraction becomes an error-tagged `FileFacts` for that file alone.
pub trait Extractor: Send + Sync {
    /// Extract all facts from a file.
    fn extract(&self, file: &SourceFile) -> Result<FileFacts, ParseError>;

    /// Extract facts, isolating failures to this file.
    fn parse(&self, file: &SourceFile) -> FileFacts {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.extract(file)))
            .unwrap_or_else(|payload| Err(ParseError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(facts) => facts,
            Err(err) => {
                warn!(path = %file.path, language = %file.language, error = %err, "failed to parse file");
                FileFacts::failed(&file.path, file.language.clone(), err.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Regex-driven extractor backed by the per-language pattern library.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileParser;

impl FileParser {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for FileParser {
    fn extract(&self, file: &SourceFile) -> Result<FileFacts, ParseError> {
        let content = file.content.as_str();
        let language = &file.language;

        let facts = FileFacts {
            path: file.path.clone(),
            language: language.clone(),
            functions: extract::functions(content, language)?,
            classes: extract::classes(content, language)?,
            imports: extract::imports(content, language),
            comments: extract::comments(content, language)?,
            variables: extract::variables(content, language)?,
            complexity: ComplexityMetrics::measure(content),
            structure: extract::structure(content),
            docstrings: extract::docstrings(content, language)?,
            parse_error: None,
        };

        debug!(
            path = %file.path,
            language = %language,
            functions = facts.functions.len(),
            classes = facts.classes.len(),
            imports = facts.imports.len(),
            "parsed file"
        );

        Ok(facts)
    }
}
