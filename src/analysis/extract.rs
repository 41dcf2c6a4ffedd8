//! Fact extraction routines, one per fact kind.
//!
//! Every routine takes the raw content and the file's language and looks
//! up its pattern in the pattern library. A missing pattern means an empty
//! result. Offsets handed to slicing helpers come from regex matches, so
//! they are always char boundaries; the checked accessors still report a
//! `ParseError` instead of panicking if that ever stops holding.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::limits;
use super::patterns::{pattern, FactKind};
use super::{
    ClassFact, CommentFact, CommentKind, DocstringFact, FunctionFact, ImportFact,
    IndentationStyle, Language, ParseError, StructureFlags,
};

lazy_static! {
    static ref DOC_SPAN_RE: Regex =
        Regex::new(r#""""[\s\S]*?"""|'''[\s\S]*?'''|/\*\*[\s\S]*?\*/"#)
            .expect("documentation span pattern");
}

const TEST_MARKERS: &[&str] = &["test", "spec", "assert"];

fn slice_from(content: &str, offset: usize, kind: FactKind) -> Result<&str, ParseError> {
    content.get(offset..).ok_or(ParseError::Slice {
        kind: kind.as_str(),
        offset,
        len: content.len(),
    })
}

/// 1-based line of a byte offset.
fn line_at(content: &str, offset: usize, kind: FactKind) -> Result<usize, ParseError> {
    let before = content.get(..offset).ok_or(ParseError::Slice {
        kind: kind.as_str(),
        offset,
        len: content.len(),
    })?;
    Ok(before.bytes().filter(|&b| b == b'\n').count() + 1)
}

/// First non-empty capture group.
fn first_group<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| !s.is_empty())
}

/// Leading-underscore names are treated as private in every language.
fn is_private(name: &str) -> bool {
    name.starts_with('_')
}

/// Truncate a body to the preview length, marking truncation with `...`.
fn preview(body: &str) -> String {
    if body.chars().count() > limits::BODY_PREVIEW_CHARS {
        let mut cut: String = body.chars().take(limits::BODY_PREVIEW_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        body.to_string()
    }
}

/// Extract function declarations.
pub fn functions(content: &str, language: &Language) -> Result<Vec<FunctionFact>, ParseError> {
    let Some(re) = pattern(language, FactKind::Function) else {
        return Ok(Vec::new());
    };

    let mut functions = Vec::new();
    for caps in re.captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), first_group(&caps)) else {
            continue;
        };
        if is_private(name) {
            continue;
        }

        let line = line_at(content, whole.start(), FactKind::Function)?;
        let signature = whole.as_str().trim();
        let body = function_body(content, whole.end(), signature, language)?;
        let estimated_lines = if body.is_empty() {
            1
        } else {
            body.split('\n').count()
        };

        functions.push(FunctionFact {
            name: name.to_string(),
            line,
            signature: signature.to_string(),
            body_preview: preview(&body),
            estimated_lines,
        });
    }

    Ok(functions)
}

fn function_body(
    content: &str,
    start: usize,
    signature: &str,
    language: &Language,
) -> Result<String, ParseError> {
    let rest = slice_from(content, start, FactKind::Function)?;
    if language.is_indentation_delimited() {
        Ok(indented_body(rest))
    } else {
        Ok(braced_body(rest, signature.ends_with('{')))
    }
}

/// Collect lines until one is indented at or below the first non-blank
/// body line.
fn indented_body(rest: &str) -> String {
    let mut lines = Vec::new();
    let mut body_indent: Option<usize> = None;

    for line in rest.split('\n') {
        if lines.len() == limits::MAX_BODY_LINES {
            break;
        }
        let trimmed = line.trim_start();
        if !trimmed.is_empty() {
            let indent = line.chars().count() - trimmed.chars().count();
            match body_indent {
                None => body_indent = Some(indent),
                Some(level) if indent <= level => break,
                Some(_) => {}
            }
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Scan forward until braces balance or the character limit is reached.
fn braced_body(rest: &str, opened: bool) -> String {
    let mut depth: i64 = i64::from(opened);
    let mut body = String::new();

    for (count, ch) in rest.chars().enumerate() {
        if count == limits::MAX_BODY_CHARS {
            break;
        }
        body.push(ch);
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }

    body
}

/// Extract class declarations with a sample of their methods.
pub fn classes(content: &str, language: &Language) -> Result<Vec<ClassFact>, ParseError> {
    let Some(re) = pattern(language, FactKind::Class) else {
        return Ok(Vec::new());
    };

    let mut classes = Vec::new();
    for caps in re.captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let line = line_at(content, whole.start(), FactKind::Class)?;
        let methods = class_methods(content, whole.end(), language)?;

        classes.push(ClassFact {
            name: name.as_str().to_string(),
            line,
            signature: whole.as_str().trim().to_string(),
            method_count: methods.len(),
            methods,
        });
    }

    Ok(classes)
}

fn class_methods(
    content: &str,
    start: usize,
    language: &Language,
) -> Result<Vec<String>, ParseError> {
    let Some(re) = pattern(language, FactKind::Method) else {
        return Ok(Vec::new());
    };

    let rest = slice_from(content, start, FactKind::Method)?;
    let end = rest
        .char_indices()
        .nth(limits::CLASS_WINDOW_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let window = rest.get(..end).ok_or(ParseError::Slice {
        kind: FactKind::Method.as_str(),
        offset: start + end,
        len: content.len(),
    })?;

    Ok(re
        .captures_iter(window)
        .filter_map(|caps| first_group(&caps).map(str::to_string))
        .take(limits::MAX_CLASS_METHODS)
        .collect())
}

/// Extract raw import statements.
pub fn imports(content: &str, language: &Language) -> Vec<ImportFact> {
    let Some(re) = pattern(language, FactKind::Import) else {
        return Vec::new();
    };

    re.find_iter(content)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .take(limits::MAX_IMPORTS)
        .map(|s| ImportFact(s.to_string()))
        .collect()
}

/// Extract comments longer than the minimum length.
pub fn comments(content: &str, language: &Language) -> Result<Vec<CommentFact>, ParseError> {
    let Some(re) = pattern(language, FactKind::Comment) else {
        return Ok(Vec::new());
    };

    let mut comments = Vec::new();
    for m in re.find_iter(content) {
        if comments.len() == limits::MAX_COMMENTS {
            break;
        }
        let text = m.as_str().trim();
        if text.chars().count() <= limits::MIN_COMMENT_CHARS {
            continue;
        }

        let kind = if text.starts_with("/*") {
            CommentKind::Block
        } else {
            CommentKind::SingleLine
        };
        comments.push(CommentFact {
            text: text.to_string(),
            line: line_at(content, m.start(), FactKind::Comment)?,
            kind,
        });
    }

    Ok(comments)
}

/// Extract distinct variable names in first-seen order.
pub fn variables(content: &str, language: &Language) -> Result<Vec<String>, ParseError> {
    let Some(re) = pattern(language, FactKind::Variable) else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut variables = Vec::new();
    for caps in re.captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), first_group(&caps)) else {
            continue;
        };

        // Python assignments glued to a definition keyword (`f =def`) are not variables.
        if *language == Language::Python {
            let rest = slice_from(content, whole.end(), FactKind::Variable)?;
            if rest.starts_with("def") || rest.starts_with("class") {
                continue;
            }
        }
        if is_private(name) {
            continue;
        }

        if seen.insert(name) {
            variables.push(name.to_string());
            if variables.len() == limits::MAX_VARIABLES {
                break;
            }
        }
    }

    Ok(variables)
}

/// Extract triple-quoted docstrings.
pub fn docstrings(content: &str, language: &Language) -> Result<Vec<DocstringFact>, ParseError> {
    let Some(re) = pattern(language, FactKind::Docstring) else {
        return Ok(Vec::new());
    };

    let mut docstrings = Vec::new();
    for caps in re.captures_iter(content) {
        if docstrings.len() == limits::MAX_DOCSTRINGS {
            break;
        }
        let (Some(whole), Some(inner)) = (caps.get(0), first_group(&caps)) else {
            continue;
        };

        let text = inner.trim();
        let length = text.chars().count();
        if length <= limits::MIN_DOCSTRING_CHARS {
            continue;
        }

        docstrings.push(DocstringFact {
            text: text.to_string(),
            line: line_at(content, whole.start(), FactKind::Docstring)?,
            length,
        });
    }

    Ok(docstrings)
}

/// Structural heuristics over the whole content.
pub fn structure(content: &str) -> StructureFlags {
    let lower = content.to_lowercase();
    let (chars, lines) = content
        .split('\n')
        .fold((0usize, 0usize), |(chars, lines), line| {
            (chars + line.chars().count(), lines + 1)
        });

    StructureFlags {
        has_main: lower.contains("main"),
        has_tests: TEST_MARKERS.iter().any(|marker| lower.contains(marker)),
        has_documentation: DOC_SPAN_RE.is_match(content),
        indentation: if content.contains('\t') {
            IndentationStyle::Tabs
        } else {
            IndentationStyle::Spaces
        },
        avg_line_length: if lines == 0 {
            0.0
        } else {
            chars as f64 / lines as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(functions: &[FunctionFact]) -> Vec<&str> {
        functions.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_python_functions_skip_private_names() {
        let content = "def foo(): pass\ndef _hidden(): pass";
        let functions = functions(content, &Language::Python).unwrap();
        assert_eq!(names(&functions), vec!["foo"]);
        assert_eq!(functions[0].line, 1);
        assert_eq!(functions[0].signature, "def foo():");
    }

    #[test]
    fn test_python_function_lines_and_order() {
        let content = r#"
def test_function():
    pass

def another_function(param1, param2):
    return param1 + param2
"#;
        let functions = functions(content, &Language::Python).unwrap();
        assert_eq!(names(&functions), vec!["test_function", "another_function"]);
        assert_eq!(functions[0].line, 2);
        assert_eq!(functions[1].line, 5);
    }

    #[test]
    fn test_private_filter_applies_to_every_language() {
        let content = "function _internal() {}\nfunction visible() {}";
        let functions = functions(content, &Language::JavaScript).unwrap();
        assert_eq!(names(&functions), vec!["visible"]);

        let content = "fn _skip() {}\nfn keep() {}";
        let functions = super::functions(content, &Language::Rust).unwrap();
        assert_eq!(names(&functions), vec!["keep"]);
    }

    #[test]
    fn test_javascript_arrow_function_uses_second_group() {
        let content = "const handler = (req, res) => {\n  res.send(1);\n};";
        let functions = functions(content, &Language::JavaScript).unwrap();
        assert_eq!(names(&functions), vec!["handler"]);
    }

    #[test]
    fn test_indented_body_stops_at_first_body_indent() {
        let rest = "\n    x = 1\n    return x\ndef other():";
        assert_eq!(indented_body(rest), "\n    x = 1");

        let rest = "\n    if x:\n        y = 2\n        z = 3\n    return y";
        assert_eq!(indented_body(rest), "\n    if x:\n        y = 2\n        z = 3");
    }

    #[test]
    fn test_indented_body_capped_at_ten_lines() {
        let rest = format!("\n    start{}", "\n\n".repeat(20));
        let body = indented_body(&rest);
        assert_eq!(body.split('\n').count(), limits::MAX_BODY_LINES);
    }

    #[test]
    fn test_braced_body_balances() {
        let content = "func add(a int, b int) int {\n\tif a > 0 {\n\t\treturn a\n\t}\n\treturn b\n}\nfunc next() {}";
        let functions = functions(content, &Language::Go).unwrap();
        assert_eq!(names(&functions), vec!["add", "next"]);
        let body = &functions[0].body_preview;
        assert!(body.starts_with(" int {"));
        assert!(body.ends_with("return b\n}"));
        assert_eq!(functions[0].estimated_lines, 6);
    }

    #[test]
    fn test_braced_body_starts_open_when_signature_has_brace() {
        let body = braced_body("\n    return 1;\n}\nother();", true);
        assert_eq!(body, "\n    return 1;\n}");
    }

    #[test]
    fn test_braced_body_capped() {
        let rest = format!("{{{}", "x".repeat(2000));
        let body = braced_body(&rest, false);
        assert_eq!(body.chars().count(), limits::MAX_BODY_CHARS);
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "a".repeat(300);
        let p = preview(&long);
        assert_eq!(p.chars().count(), limits::BODY_PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_python_classes_with_methods() {
        let content = r#"
class TestClass:
    def method1(self):
        pass

class AnotherClass(BaseClass):
    def method2(self):
        pass
"#;
        let classes = classes(content, &Language::Python).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "TestClass");
        assert_eq!(classes[0].line, 2);
        assert_eq!(classes[1].name, "AnotherClass");
        assert_eq!(classes[1].signature, "class AnotherClass(BaseClass):");
        assert_eq!(classes[1].methods, vec!["method2"]);
        // The window runs past the class body into later declarations.
        assert_eq!(classes[0].methods, vec!["method1", "method2"]);
    }

    #[test]
    fn test_class_methods_capped_at_five() {
        let mut content = String::from("class Big:\n");
        for i in 0..8 {
            content.push_str(&format!("    def m{}(self):\n        pass\n", i));
        }
        let classes = classes(&content, &Language::Python).unwrap();
        assert_eq!(classes[0].method_count, limits::MAX_CLASS_METHODS);
        assert_eq!(classes[0].methods[4], "m4");
    }

    #[test]
    fn test_class_window_is_bounded() {
        let content = format!("class Far:\n{}\n    def late(self):\n        pass", "#".repeat(1200));
        let classes = classes(&content, &Language::Python).unwrap();
        assert!(classes[0].methods.is_empty());
    }

    #[test]
    fn test_javascript_class_methods_use_first_nonempty_group() {
        let content = "class Widget extends Base {\n  render() {}\n}\nfunction helper() {}";
        let classes = classes(content, &Language::JavaScript).unwrap();
        assert_eq!(classes[0].name, "Widget");
        assert_eq!(classes[0].methods, vec!["helper"]);
    }

    #[test]
    fn test_imports_python_are_line_bounded() {
        let content = "import os\nimport sys\nfrom pathlib import Path\nfrom typing import Dict, List\n";
        let imports = imports(content, &Language::Python);
        let raw: Vec<&str> = imports.iter().map(|i| i.raw()).collect();
        assert_eq!(
            raw,
            vec![
                "import os",
                "import sys",
                "from pathlib import Path",
                "from typing import Dict, List"
            ]
        );
    }

    #[test]
    fn test_imports_capped_at_twenty() {
        let content: String = (0..30).map(|i| format!("#include <h{}.h>\n", i)).collect();
        let imports = imports(&content, &Language::C);
        assert_eq!(imports.len(), limits::MAX_IMPORTS);
        assert_eq!(imports[0].raw(), "#include <h0.h>");
    }

    #[test]
    fn test_imports_for_several_languages() {
        let js = "import React from 'react';\nconst _ = require('lodash');";
        let raw: Vec<String> = imports(js, &Language::JavaScript)
            .into_iter()
            .map(|i| i.0)
            .collect();
        assert_eq!(raw, vec!["import React from 'react'", "require('lodash')"]);

        let java = "import java.util.List;\nimport static org.junit.Assert.*;";
        assert_eq!(imports(java, &Language::Java).len(), 2);

        let rust = "use std::collections::HashMap;\nuse serde::Serialize;";
        assert_eq!(imports(rust, &Language::Rust).len(), 2);
    }

    #[test]
    fn test_comments_filter_short_and_classify() {
        let content = "// ok\n//\n/* block\n comment */\nint x; // trailing note";
        let comments = comments(content, &Language::C).unwrap();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].text, "// ok");
        assert_eq!(comments[0].kind, CommentKind::SingleLine);
        assert_eq!(comments[1].kind, CommentKind::Block);
        assert_eq!(comments[1].line, 3);
        assert_eq!(comments[2].text, "// trailing note");
        assert_eq!(comments[2].line, 5);
    }

    #[test]
    fn test_comments_capped_at_ten() {
        let content: String = (0..15).map(|i| format!("# comment {}\n", i)).collect();
        let comments = comments(&content, &Language::Python).unwrap();
        assert_eq!(comments.len(), limits::MAX_COMMENTS);
    }

    #[test]
    fn test_variables_dedupe_and_filter() {
        let content = "x = 1\ny = 2\nx = 3\n_private = 4\nhandler =def\n";
        let vars = variables(content, &Language::Python).unwrap();
        assert_eq!(vars, vec!["x", "y"]);

        let content = "let mut count = 0;\nlet name = \"a\";\nlet count = 1;";
        let vars = variables(content, &Language::Rust).unwrap();
        assert_eq!(vars, vec!["count", "name"]);

        let content = "var total int\nresult := compute()";
        let vars = variables(content, &Language::Go).unwrap();
        assert_eq!(vars, vec!["total", "result"]);
    }

    #[test]
    fn test_variables_capped() {
        let content: String = (0..30).map(|i| format!("v{} = {}\n", i, i)).collect();
        let vars = variables(&content, &Language::Python).unwrap();
        assert_eq!(vars.len(), limits::MAX_VARIABLES);
    }

    #[test]
    fn test_variables_absent_for_languages_without_pattern() {
        assert!(variables("$x = 1;", &Language::Php).unwrap().is_empty());
    }

    #[test]
    fn test_docstrings_python_only() {
        let content = "\"\"\"Module level documentation.\"\"\"\ndef f():\n    '''short'''\n";
        let docs = docstrings(content, &Language::Python).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "Module level documentation.");
        assert_eq!(docs[0].line, 1);
        assert_eq!(docs[0].length, 27);

        assert!(docstrings(content, &Language::Ruby).unwrap().is_empty());
    }

    #[test]
    fn test_docstrings_capped_at_five() {
        let content: String = (0..8)
            .map(|i| format!("def f{}():\n    \"\"\"Docstring number {}.\"\"\"\n", i, i))
            .collect();
        let docs = docstrings(&content, &Language::Python).unwrap();
        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Docstring number 0.",
                "Docstring number 1.",
                "Docstring number 2.",
                "Docstring number 3.",
                "Docstring number 4.",
            ]
        );
        assert_eq!(docs[4].line, 10);
    }

    #[test]
    fn test_structure_flags() {
        let flags = structure("int main() {\n\treturn 0;\n}");
        assert!(flags.has_main);
        assert!(!flags.has_tests);
        assert!(!flags.has_documentation);
        assert_eq!(flags.indentation, IndentationStyle::Tabs);
        assert!((flags.avg_line_length - 23.0 / 3.0).abs() < 1e-9);

        let flags = structure("/** Docs */\nfn check() { assert!(true); }");
        assert!(flags.has_tests);
        assert!(flags.has_documentation);
        assert_eq!(flags.indentation, IndentationStyle::Spaces);
    }

    #[test]
    fn test_unsupported_language_yields_nothing() {
        let other = Language::Other("cobol".to_string());
        let content = "def foo(): pass\nclass Bar: pass\nimport os";
        assert!(functions(content, &other).unwrap().is_empty());
        assert!(classes(content, &other).unwrap().is_empty());
        assert!(imports(content, &other).is_empty());
        assert!(comments(content, &other).unwrap().is_empty());
        assert!(variables(content, &other).unwrap().is_empty());
        assert!(docstrings(content, &other).unwrap().is_empty());
    }
}
