//! Supported language tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language tag attached to a source file.
///
/// The supported set is closed; any other tag is carried verbatim in
/// `Other` and yields no facts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    Go,
    Rust,
    Php,
    Ruby,
    Swift,
    Kotlin,
    Other(String),
}

impl Language {
    /// Every supported language, in tag order.
    pub const SUPPORTED: [Language; 12] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Go,
        Language::Rust,
        Language::Php,
        Language::Ruby,
        Language::Swift,
        Language::Kotlin,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Other(tag) => tag,
        }
    }

    /// Parse a language tag. Unknown tags become `Other`.
    pub fn parse(tag: &str) -> Self {
        let lowered = tag.trim().to_lowercase();
        Self::SUPPORTED
            .into_iter()
            .find(|language| language.as_str() == lowered)
            .unwrap_or_else(|| Language::Other(tag.to_string()))
    }

    /// Map a file extension (without the dot) to a supported language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Language::Python),
            "js" | "jsx" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "cpp" => Some(Language::Cpp),
            "c" => Some(Language::C),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            "php" => Some(Language::Php),
            "rb" => Some(Language::Ruby),
            "swift" => Some(Language::Swift),
            "kt" => Some(Language::Kotlin),
            _ => None,
        }
    }

    /// Whether function bodies are delimited by indentation rather than braces.
    pub fn is_indentation_delimited(&self) -> bool {
        matches!(self, Language::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Language::parse(s))
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Language::parse(&tag)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}
