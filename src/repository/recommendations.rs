//! Rule-based recommendations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::architecture::{ArchitectureReport, CoverageLevel};
use super::SummaryStats;

/// More distinct languages than this triggers a consistency hint.
const MAX_LANGUAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Modularity,
    Refactor,
    AddTests,
    AddEntryPoint,
    LanguageConsistency,
}

impl RecommendationKind {
    pub fn message(&self) -> &'static str {
        match self {
            RecommendationKind::Modularity => {
                "Consider breaking down large code blocks into functions for better modularity"
            }
            RecommendationKind::Refactor => {
                "Many files have low maintainability - consider refactoring complex functions"
            }
            RecommendationKind::AddTests => "Add more test coverage to improve code reliability",
            RecommendationKind::AddEntryPoint => {
                "Consider adding clear entry points (main functions) to your application"
            }
            RecommendationKind::LanguageConsistency => {
                "Multiple languages detected - ensure consistency in coding standards"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl From<RecommendationKind> for Recommendation {
    fn from(kind: RecommendationKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Evaluate every rule; all matching rules are reported in rule order.
///
/// A report built from zero files yields no recommendations.
pub fn recommend(summary: &SummaryStats, architecture: &ArchitectureReport) -> Vec<Recommendation> {
    if architecture.file_count() == 0 {
        return Vec::new();
    }

    let dist = &summary.complexity_distribution;
    let rules = [
        (summary.total_functions == 0, RecommendationKind::Modularity),
        (dist.low > dist.high + dist.medium, RecommendationKind::Refactor),
        (
            architecture.test_coverage.level == CoverageLevel::Low,
            RecommendationKind::AddTests,
        ),
        (architecture.entry_points.is_empty(), RecommendationKind::AddEntryPoint),
        (
            summary.languages.len() > MAX_LANGUAGES,
            RecommendationKind::LanguageConsistency,
        ),
    ];

    rules
        .into_iter()
        .filter(|(fires, _)| *fires)
        .map(|(_, kind)| Recommendation::from(kind))
        .collect()
}
