//! Per-language lexical pattern library.
//!
//! Each supported language carries one pattern per fact kind. Patterns are
//! heuristic token matchers, not grammars: they do not balance nested
//! delimiters and they do not skip matches inside strings or comments.
//! Unsupported languages resolve to an empty set, so every lookup simply
//! returns `None`.

use lazy_static::lazy_static;
use regex::Regex;

use super::Language;

/// Kind of structural fact a pattern extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    Function,
    Class,
    Import,
    Comment,
    Variable,
    Docstring,
    /// Method names inside a class window.
    Method,
}

impl FactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactKind::Function => "function",
            FactKind::Class => "class",
            FactKind::Import => "import",
            FactKind::Comment => "comment",
            FactKind::Variable => "variable",
            FactKind::Docstring => "docstring",
            FactKind::Method => "method",
        }
    }
}

/// Raw pattern sources for one language.
struct PatternSource {
    function: Option<&'static str>,
    class: Option<&'static str>,
    import: Option<&'static str>,
    comment: Option<&'static str>,
    variable: Option<&'static str>,
    docstring: Option<&'static str>,
    /// Dedicated method pattern; falls back to `function` when absent.
    method: Option<&'static str>,
}

/// Compiled patterns for one language.
#[derive(Debug)]
pub struct PatternSet {
    function: Option<Regex>,
    class: Option<Regex>,
    import: Option<Regex>,
    comment: Option<Regex>,
    variable: Option<Regex>,
    docstring: Option<Regex>,
    method: Option<Regex>,
}

impl PatternSet {
    const fn empty() -> Self {
        Self {
            function: None,
            class: None,
            import: None,
            comment: None,
            variable: None,
            docstring: None,
            method: None,
        }
    }

    fn compile(language: &str, source: PatternSource) -> Self {
        let build = |kind: FactKind, src: Option<&'static str>| {
            src.map(|s| {
                Regex::new(s).unwrap_or_else(|e| {
                    panic!("invalid {} pattern for {}: {}", kind.as_str(), language, e)
                })
            })
        };

        Self {
            function: build(FactKind::Function, source.function),
            class: build(FactKind::Class, source.class),
            import: build(FactKind::Import, source.import),
            comment: build(FactKind::Comment, source.comment),
            variable: build(FactKind::Variable, source.variable),
            docstring: build(FactKind::Docstring, source.docstring),
            method: build(FactKind::Method, source.method),
        }
    }

    /// Look up the pattern for a fact kind.
    pub fn get(&self, kind: FactKind) -> Option<&Regex> {
        match kind {
            FactKind::Function => self.function.as_ref(),
            FactKind::Class => self.class.as_ref(),
            FactKind::Import => self.import.as_ref(),
            FactKind::Comment => self.comment.as_ref(),
            FactKind::Variable => self.variable.as_ref(),
            FactKind::Docstring => self.docstring.as_ref(),
            FactKind::Method => self.method.as_ref().or(self.function.as_ref()),
        }
    }

    /// Whether this set has no patterns at all.
    pub fn is_empty(&self) -> bool {
        self.function.is_none()
            && self.class.is_none()
            && self.import.is_none()
            && self.comment.is_none()
            && self.variable.is_none()
            && self.docstring.is_none()
    }
}

const C_STYLE_COMMENT: &str = r"//.*|/\*[\s\S]*?\*/";
const HASH_COMMENT: &str = r"#.*";
const INCLUDE: &str = r#"#include\s*[<"][^>"]+[>"]"#;

lazy_static! {
    static ref PYTHON: PatternSet = PatternSet::compile(
        "python",
        PatternSource {
            function: Some(r"def\s+(\w+)\s*\([^)]*\):"),
            class: Some(r"class\s+(\w+)\s*(?:\([^)]*\))?:"),
            import: Some(r"(?:from[ \t]+[\w.]+[ \t]+)?import[ \t]+[\w.,*( \t]+"),
            comment: Some(HASH_COMMENT),
            // `name =def` / `name =class` is rejected after matching.
            variable: Some(r"(\w+)\s*="),
            docstring: Some(r#""""([\s\S]*?)"""|'''([\s\S]*?)'''"#),
            method: Some(r"def\s+(\w+)\s*\("),
        },
    );

    static ref JAVASCRIPT: PatternSet = PatternSet::compile(
        "javascript",
        PatternSource {
            function: Some(
                r"(?:function\s+(\w+)\s*\(|(?:const|let|var)\s+(\w+)\s*=\s*(?:function|\([^)]*\)\s*=>))",
            ),
            class: Some(r"class\s+(\w+)(?:\s+extends\s+\w+)?"),
            import: Some(
                r#"import\s+.*?from\s+['"][^'"]+['"]|require\(['"][^'"]+['"]\)"#,
            ),
            comment: Some(C_STYLE_COMMENT),
            variable: Some(r"(?:const|let|var)\s+(\w+)"),
            docstring: None,
            method: None,
        },
    );

    static ref TYPESCRIPT: PatternSet = PatternSet::compile(
        "typescript",
        PatternSource {
            function: Some(
                r"(?:function\s+(\w+)\s*\(|(?:const|let|var)\s+(\w+)\s*:\s*[^=]*=\s*(?:function|\([^)]*\)\s*=>))",
            ),
            class: Some(
                r"(?:export\s+)?class\s+(\w+)(?:\s+extends\s+\w+)?(?:\s+implements\s+[\w,\s]+)?",
            ),
            import: Some(r#"import\s+.*?from\s+['"][^'"]+['"]"#),
            comment: Some(C_STYLE_COMMENT),
            variable: Some(r"(?:const|let|var)\s+(\w+)"),
            docstring: None,
            method: None,
        },
    );

    static ref JAVA: PatternSet = PatternSet::compile(
        "java",
        PatternSource {
            function: Some(
                r"(?:public|private|protected)?\s*(?:static)?\s*(?:final)?\s*\w+\s+(\w+)\s*\([^)]*\)\s*(?:throws\s+\w+(?:,\s*\w+)*)?\s*\{",
            ),
            class: Some(
                r"(?:public|private|protected)?\s*(?:abstract|final)?\s*class\s+(\w+)(?:\s+extends\s+\w+)?(?:\s+implements\s+[\w,\s]+)?",
            ),
            import: Some(r"import\s+(?:static\s+)?[\w.]+(?:\.\*)?;"),
            comment: Some(C_STYLE_COMMENT),
            variable: Some(
                r"(?:public|private|protected)?\s*(?:static)?\s*(?:final)?\s*\w+\s+(\w+)\s*[=;]",
            ),
            docstring: None,
            method: None,
        },
    );

    static ref CPP: PatternSet = PatternSet::compile(
        "cpp",
        PatternSource {
            function: Some(r"(?:[\w:]+\s+)?(\w+)\s*\([^)]*\)\s*(?:const)?\s*\{"),
            class: Some(r"class\s+(\w+)(?:\s*:\s*(?:public|private|protected)\s+\w+)?"),
            import: Some(INCLUDE),
            comment: Some(C_STYLE_COMMENT),
            variable: Some(r"(?:int|float|double|char|string|bool|auto)\s+(\w+)"),
            docstring: None,
            method: None,
        },
    );

    static ref C_LANG: PatternSet = PatternSet::compile(
        "c",
        PatternSource {
            function: Some(r"(?:[\w\s*]+\s+)?(\w+)\s*\([^)]*\)\s*\{"),
            class: Some(r"(?:typedef\s+)?struct\s+(\w+)"),
            import: Some(INCLUDE),
            comment: Some(C_STYLE_COMMENT),
            variable: None,
            docstring: None,
            method: None,
        },
    );

    static ref GO: PatternSet = PatternSet::compile(
        "go",
        PatternSource {
            function: Some(r"func\s+(?:\(\w+\s+\*?\w+\)\s+)?(\w+)\s*\([^)]*\)"),
            class: Some(r"type\s+(\w+)\s+struct"),
            import: Some(r#"import\s+(?:\(\s*)?['"][^'"]+['"](?:\s*\))?"#),
            comment: Some(C_STYLE_COMMENT),
            variable: Some(r"(?:var\s+(\w+)|(\w+)\s*:=)"),
            docstring: None,
            method: None,
        },
    );

    static ref RUST: PatternSet = PatternSet::compile(
        "rust",
        PatternSource {
            function: Some(r"fn\s+(\w+)\s*\([^)]*\)"),
            class: Some(r"(?:pub\s+)?struct\s+(\w+)"),
            import: Some(r"use\s+[\w:]+(?:\s*as\s+\w+)?;"),
            comment: Some(C_STYLE_COMMENT),
            variable: Some(r"let\s+(?:mut\s+)?(\w+)"),
            docstring: None,
            method: None,
        },
    );

    static ref PHP: PatternSet = PatternSet::compile(
        "php",
        PatternSource {
            function: Some(r"(?:public|private|protected)?\s*(?:static)?\s*function\s+(\w+)\s*\("),
            class: Some(r"(?:abstract\s+)?class\s+(\w+)(?:\s+extends\s+\w+)?"),
            import: Some(
                r#"(?:require|include)(?:_once)?\s+['"][^'"]+['"];|use\s+[\w\\]+(?:\s+as\s+\w+)?;"#,
            ),
            comment: Some(r"//.*|/\*[\s\S]*?\*/|#.*"),
            variable: None,
            docstring: None,
            method: None,
        },
    );

    static ref RUBY: PatternSet = PatternSet::compile(
        "ruby",
        PatternSource {
            function: Some(r"def\s+(\w+)\s*(?:\([^)]*\))?"),
            class: Some(r"class\s+(\w+)(?:\s*<\s*\w+)?"),
            import: Some(r#"require\s+['"][^'"]+['"]"#),
            comment: Some(HASH_COMMENT),
            variable: None,
            docstring: None,
            method: None,
        },
    );

    static ref SWIFT: PatternSet = PatternSet::compile(
        "swift",
        PatternSource {
            function: Some(r"func\s+(\w+)\s*\([^)]*\)"),
            class: Some(r"(?:public|private|internal)?\s*(?:final\s+)?class\s+(\w+)(?:\s*:\s*[\w,\s]+)?"),
            import: Some(r"import\s+\w+"),
            comment: Some(C_STYLE_COMMENT),
            variable: None,
            docstring: None,
            method: None,
        },
    );

    static ref KOTLIN: PatternSet = PatternSet::compile(
        "kotlin",
        PatternSource {
            function: Some(r"(?:fun\s+(\w+)\s*\(|(?:public|private|protected)?\s*fun\s+(\w+)\s*\()"),
            class: Some(r"(?:open|final|abstract)?\s*class\s+(\w+)(?:\s*:\s*[\w,\s()]+)?"),
            import: Some(r"import\s+[\w.]+(?:\.\*)?"),
            comment: Some(C_STYLE_COMMENT),
            variable: None,
            docstring: None,
            method: None,
        },
    );
}

static EMPTY: PatternSet = PatternSet::empty();

/// Resolve the pattern set for a language.
pub fn patterns_for(language: &Language) -> &'static PatternSet {
    match language {
        Language::Python => &*PYTHON,
        Language::JavaScript => &*JAVASCRIPT,
        Language::TypeScript => &*TYPESCRIPT,
        Language::Java => &*JAVA,
        Language::Cpp => &*CPP,
        Language::C => &*C_LANG,
        Language::Go => &*GO,
        Language::Rust => &*RUST,
        Language::Php => &*PHP,
        Language::Ruby => &*RUBY,
        Language::Swift => &*SWIFT,
        Language::Kotlin => &*KOTLIN,
        Language::Other(_) => &EMPTY,
    }
}

/// Look up a single pattern.
pub fn pattern(language: &Language, kind: FactKind) -> Option<&'static Regex> {
    patterns_for(language).get(kind)
}
