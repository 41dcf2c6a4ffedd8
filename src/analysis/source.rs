//! In-memory source file handed over by the acquisition layer.

use serde::{Deserialize, Serialize};

use super::Language;

/// One source file, already read and decoded.
///
/// Paths are relative and slash-separated. The content is always valid
/// UTF-8; invalid bytes are replaced when constructing from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub language: Language,
    pub content: String,
    /// Size of the decoded content in bytes.
    pub size: usize,
    /// Number of `\n`-separated segments (an empty file has one line).
    pub line_count: usize,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, language: Language, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: normalize_path(&path.into()),
            language,
            size: content.len(),
            line_count: content.split('\n').count(),
            content,
        }
    }

    /// Build from raw bytes, replacing invalid UTF-8 sequences.
    pub fn from_bytes(path: impl Into<String>, language: Language, bytes: &[u8]) -> Self {
        Self::new(path, language, String::from_utf8_lossy(bytes).into_owned())
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
