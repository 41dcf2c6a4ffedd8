//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal summary for human readability
//! - JSON: the full structured analysis for programmatic consumption

use std::io::{self, Write};

use colored::*;
use serde::Serialize;

use crate::analysis::Maintainability;
use crate::repository::{CoverageLevel, RepositoryAnalysis};

/// Directory histogram rows shown in pretty output.
const MAX_DIRECTORY_ROWS: usize = 10;

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON document.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a str>,
    pub files_scanned: usize,
    pub parse_errors: usize,
    pub analysis: &'a RepositoryAnalysis,
}

impl<'a> JsonReport<'a> {
    pub fn new(path: &'a str, config: Option<&'a str>, analysis: &'a RepositoryAnalysis) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            path,
            config,
            files_scanned: analysis.files.len(),
            parse_errors: analysis.error_count(),
            analysis,
        }
    }
}

/// Write the analysis as pretty-printed JSON.
pub fn write_json<W: Write>(
    out: &mut W,
    path: &str,
    config: Option<&str>,
    analysis: &RepositoryAnalysis,
) -> anyhow::Result<()> {
    let report = JsonReport::new(path, config, analysis);
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a colored human-readable summary.
pub fn write_pretty<W: Write>(
    out: &mut W,
    path: &str,
    config: Option<&str>,
    analysis: &RepositoryAnalysis,
) -> io::Result<()> {
    // Header
    writeln!(out)?;
    writeln!(out, "  {} v{}", "reposcope".cyan().bold(), env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Scanning: ".dimmed(), path)?;
    if let Some(config) = config {
        writeln!(out, "  {}{}", "Config:   ".dimmed(), config)?;
    }
    writeln!(out)?;

    write_summary(out, analysis)?;
    write_architecture(out, analysis)?;
    write_dependencies(out, analysis)?;
    write_recommendations(out, analysis)?;
    writeln!(out)?;
    Ok(())
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "  {}", title.bold().underline())
}

fn write_summary<W: Write>(out: &mut W, analysis: &RepositoryAnalysis) -> io::Result<()> {
    let summary = &analysis.summary;
    section(out, "Summary")?;
    writeln!(
        out,
        "    Files: {}  Functions: {}  Classes: {}  Imports: {}",
        analysis.files.len(),
        summary.total_functions,
        summary.total_classes,
        summary.total_imports
    )?;

    let errors = analysis.error_count();
    if errors > 0 {
        writeln!(out, "    {}", format!("{} file(s) could not be parsed", errors).red())?;
        for failed in analysis.files.iter().filter(|f| f.is_error()) {
            writeln!(
                out,
                "      {}  {}",
                failed.path,
                failed.parse_error.as_deref().unwrap_or_default().dimmed()
            )?;
        }
    }

    if !summary.languages.is_empty() {
        let languages: Vec<String> = summary
            .languages
            .iter()
            .map(|(lang, count)| format!("{} ({})", lang, count))
            .collect();
        writeln!(out, "    Languages: {}", languages.join(", "))?;
    }

    write!(out, "    Maintainability:")?;
    for class in [Maintainability::High, Maintainability::Medium, Maintainability::Low] {
        let count = summary.complexity_distribution.get(class);
        write!(out, " {}", colored_class(class, count))?;
    }
    writeln!(out)?;
    writeln!(out)
}

fn colored_class(class: Maintainability, count: usize) -> ColoredString {
    let label = format!("{}={}", class, count);
    match class {
        Maintainability::High => label.green(),
        Maintainability::Medium => label.yellow(),
        Maintainability::Low => label.red(),
    }
}

fn flag(name: &str, on: bool) -> ColoredString {
    if on {
        format!("✓ {}", name).green()
    } else {
        format!("✗ {}", name).dimmed()
    }
}

fn write_architecture<W: Write>(out: &mut W, analysis: &RepositoryAnalysis) -> io::Result<()> {
    let arch = &analysis.architecture;
    section(out, "Architecture")?;
    writeln!(
        out,
        "    {}  {}  {}  {}",
        flag("mvc", arch.patterns.mvc),
        flag("layered", arch.patterns.layered),
        flag("microservices", arch.patterns.microservices),
        flag("monolithic", arch.patterns.monolithic)
    )?;

    let org = &arch.organization;
    writeln!(
        out,
        "    Max depth: {}  Organization score: {:.2}",
        org.max_depth, org.score
    )?;
    let mut dirs: Vec<(&String, &usize)> = org.directories.iter().collect();
    dirs.sort_by(|a, b| b.1.cmp(a.1));
    for (dir, count) in dirs.into_iter().take(MAX_DIRECTORY_ROWS) {
        writeln!(out, "      {:<24} {}", format!("{}/", dir), count)?;
    }

    if arch.entry_points.is_empty() {
        writeln!(out, "    Entry points: {}", "none".dimmed())?;
    } else {
        writeln!(out, "    Entry points:")?;
        for entry in &arch.entry_points {
            writeln!(out, "      {}", entry.cyan())?;
        }
    }

    let cov = &arch.test_coverage;
    let level = match cov.level {
        CoverageLevel::High => cov.level.as_str().green(),
        CoverageLevel::Medium => cov.level.as_str().yellow(),
        CoverageLevel::Low => cov.level.as_str().red(),
    };
    writeln!(
        out,
        "    Test coverage: {} ({} test / {} regular, ratio {:.2})",
        level, cov.test_files, cov.regular_files, cov.ratio
    )?;
    writeln!(out)
}

fn write_dependencies<W: Write>(out: &mut W, analysis: &RepositoryAnalysis) -> io::Result<()> {
    let deps = &analysis.dependencies;
    section(out, "Dependencies")?;

    if deps.external.is_empty() {
        writeln!(out, "    External: {}", "none detected".dimmed())?;
    } else {
        writeln!(out, "    External: {}", deps.external.join(", "))?;
    }

    if !deps.most_used.is_empty() {
        writeln!(out, "    Most used:")?;
        for usage in &deps.most_used {
            writeln!(out, "      {:<32} {}", usage.name, usage.count)?;
        }
    }

    if !deps.internal.is_empty() {
        writeln!(out, "    Internal:")?;
        for internal in &deps.internal {
            writeln!(
                out,
                "      {} {} {}",
                internal.file,
                "→".dimmed(),
                internal.dependencies.join(", ")
            )?;
        }
    }
    writeln!(out)
}

fn write_recommendations<W: Write>(out: &mut W, analysis: &RepositoryAnalysis) -> io::Result<()> {
    section(out, "Recommendations")?;
    if analysis.recommendations.is_empty() {
        writeln!(out, "    {}", "none".green())?;
    }
    for rec in &analysis.recommendations {
        writeln!(out, "    {} {}", "•".yellow(), rec)?;
    }
    Ok(())
}
