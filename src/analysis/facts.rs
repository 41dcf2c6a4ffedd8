//! Fact structures extracted from a single file.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ComplexityMetrics, Language};

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,
    /// Declaration line (1-indexed).
    pub line: usize,
    /// Raw matched signature text.
    pub signature: String,
    /// Bounded body preview, `...`-terminated when truncated.
    pub body_preview: String,
    /// Estimated body line count.
    pub estimated_lines: usize,
}

/// A class (or struct, for languages without classes) declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassFact {
    pub name: String,
    pub line: usize,
    pub signature: String,
    /// Up to five method names found right after the declaration.
    pub methods: Vec<String>,
    pub method_count: usize,
}

/// A raw, unnormalized import or include statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportFact(pub String);

impl ImportFact {
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImportFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comment style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    SingleLine,
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentFact {
    pub text: String,
    pub line: usize,
    pub kind: CommentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocstringFact {
    pub text: String,
    pub line: usize,
    /// Length of the trimmed text in characters.
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentationStyle {
    Tabs,
    #[default]
    Spaces,
}

/// Coarse structural heuristics for a file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructureFlags {
    /// Content mentions "main" anywhere (case-insensitive).
    pub has_main: bool,
    /// Content mentions test, spec or assert (case-insensitive).
    pub has_tests: bool,
    /// Content holds a triple-quoted or `/** */` span.
    pub has_documentation: bool,
    pub indentation: IndentationStyle,
    pub avg_line_length: f64,
}

/// All facts extracted from a single file.
///
/// A file whose extraction failed keeps its path and language, carries the
/// diagnostic in `parse_error`, and has empty fact lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFacts {
    pub path: String,
    pub language: Language,
    pub functions: Vec<FunctionFact>,
    pub classes: Vec<ClassFact>,
    pub imports: Vec<ImportFact>,
    pub comments: Vec<CommentFact>,
    pub variables: Vec<String>,
    pub complexity: ComplexityMetrics,
    pub structure: StructureFlags,
    pub docstrings: Vec<DocstringFact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl FileFacts {
    /// Create empty facts for a file.
    pub fn empty(path: &str, language: Language) -> Self {
        Self {
            path: path.to_string(),
            language,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            comments: Vec::new(),
            variables: Vec::new(),
            complexity: ComplexityMetrics::default(),
            structure: StructureFlags::default(),
            docstrings: Vec::new(),
            parse_error: None,
        }
    }

    /// Create error-tagged facts carrying a diagnostic message.
    pub fn failed(path: &str, language: Language, message: impl Into<String>) -> Self {
        Self {
            parse_error: Some(message.into()),
            ..Self::empty(path, language)
        }
    }

    /// Whether extraction failed for this file.
    pub fn is_error(&self) -> bool {
        self.parse_error.is_some()
    }

    /// Find a function by name.
    pub fn find_function(&self, name: &str) -> Option<&FunctionFact> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Find a class by name.
    pub fn find_class(&self, name: &str) -> Option<&ClassFact> {
        self.classes.iter().find(|c| c.name == name)
    }
}
