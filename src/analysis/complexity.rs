//! Line counts, control-structure counts and the maintainability class.
//!
//! The maintainability score is a linear heuristic:
//!
//! ```text
//! score = max(0, 100 - non_blank_lines / 10 - control_count * 3)
//! ```
//!
//! High at 80 and above, Medium at 60 and above, Low otherwise.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Score thresholds for the maintainability classes.
pub mod thresholds {
    pub const HIGH_MIN: i64 = 80;
    pub const MEDIUM_MIN: i64 = 60;
}

lazy_static! {
    static ref CONTROL_RE: Regex =
        Regex::new(r"\b(?:if|for|while|switch|case|try|catch|except|elif|else)\b")
            .expect("control keyword pattern");
}

/// Coarse maintainability label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Maintainability {
    High,
    Medium,
    Low,
}

impl Maintainability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Maintainability::High => "High",
            Maintainability::Medium => "Medium",
            Maintainability::Low => "Low",
        }
    }

    /// Classify a maintainability score.
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s >= thresholds::HIGH_MIN => Maintainability::High,
            s if s >= thresholds::MEDIUM_MIN => Maintainability::Medium,
            _ => Maintainability::Low,
        }
    }
}

impl fmt::Display for Maintainability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maintainability score, clamped at zero.
pub fn maintainability_score(non_blank_lines: usize, control_count: usize) -> i64 {
    let score = 100 - (non_blank_lines / 10) as i64 - (control_count as i64) * 3;
    score.max(0)
}

/// Maintainability class as a pure function of the two counts.
pub fn classify(non_blank_lines: usize, control_count: usize) -> Maintainability {
    Maintainability::from_score(maintainability_score(non_blank_lines, control_count))
}

/// Size and branching metrics for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub total_lines: usize,
    pub non_blank_lines: usize,
    pub blank_lines: usize,
    /// Whole-word occurrences of control keywords.
    pub control_count: usize,
    pub maintainability: Maintainability,
}

impl Default for ComplexityMetrics {
    fn default() -> Self {
        Self {
            total_lines: 0,
            non_blank_lines: 0,
            blank_lines: 0,
            control_count: 0,
            maintainability: classify(0, 0),
        }
    }
}

impl ComplexityMetrics {
    /// Measure a file's content.
    pub fn measure(content: &str) -> Self {
        let total_lines = content.split('\n').count();
        let non_blank_lines = content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .count();
        let control_count = CONTROL_RE.find_iter(content).count();

        Self {
            total_lines,
            non_blank_lines,
            blank_lines: total_lines - non_blank_lines,
            control_count,
            maintainability: classify(non_blank_lines, control_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintainability_examples() {
        assert_eq!(maintainability_score(50, 0), 95);
        assert_eq!(classify(50, 0), Maintainability::High);

        assert_eq!(maintainability_score(50, 10), 65);
        assert_eq!(classify(50, 10), Maintainability::Medium);

        assert_eq!(maintainability_score(200, 20), 20);
        assert_eq!(classify(200, 20), Maintainability::Low);

        assert_eq!(maintainability_score(1000, 40), 0);
        assert_eq!(classify(1000, 40), Maintainability::Low);
    }

    #[test]
    fn test_class_boundaries() {
        assert_eq!(Maintainability::from_score(80), Maintainability::High);
        assert_eq!(Maintainability::from_score(79), Maintainability::Medium);
        assert_eq!(Maintainability::from_score(60), Maintainability::Medium);
        assert_eq!(Maintainability::from_score(59), Maintainability::Low);
        assert_eq!(Maintainability::from_score(0), Maintainability::Low);
    }

    #[test]
    fn test_measure_counts_lines_and_keywords() {
        let content = "def f(x):\n    if x:\n        return 1\n\n    else:\n        return 2\n";
        let metrics = ComplexityMetrics::measure(content);
        assert_eq!(metrics.total_lines, 7);
        assert_eq!(metrics.non_blank_lines, 5);
        assert_eq!(metrics.blank_lines, 2);
        assert_eq!(metrics.control_count, 2);
        assert_eq!(metrics.maintainability, Maintainability::High);
        assert_eq!(maintainability_score(metrics.non_blank_lines, metrics.control_count), 94);
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        let metrics = ComplexityMetrics::measure("iffy = format(elsewhere)\nfor_each()");
        assert_eq!(metrics.control_count, 0);

        let metrics = ComplexityMetrics::measure("try:\n    pass\nexcept Error:\n    pass");
        assert_eq!(metrics.control_count, 2);
    }

    #[test]
    fn test_empty_content() {
        let metrics = ComplexityMetrics::measure("");
        assert_eq!(metrics.total_lines, 1);
        assert_eq!(metrics.non_blank_lines, 0);
        assert_eq!(metrics.blank_lines, 1);
        assert_eq!(metrics.maintainability, Maintainability::High);
    }
}
