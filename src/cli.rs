//! Command-line interface for reposcope.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use crate::acquire;
use crate::config::{Config, DEFAULT_CONFIG_NAMES, DEFAULT_CONFIG_TEMPLATE};
use crate::report;
use crate::repository::RepositoryAnalyzer;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Heuristic structure, architecture and dependency analysis for source
/// repositories.
///
/// Reposcope reads the supported source files under a directory, extracts
/// functions, classes, imports and simple metrics with per-language
/// patterns, and summarizes the repository's layout, dependencies and
/// likely entry points.
#[derive(Parser)]
#[command(name = "reposcope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a repository directory (or a single file)
    #[command(visible_alias = "scan")]
    Analyze(AnalyzeArgs),
    /// Write a default reposcope.yaml
    Init(InitArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (directory or file)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover in the analyzed directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Parse files in parallel (overrides the config file)
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "reposcope.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Log filter directive for a `-v` count.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Directory searched for an implicit config file.
fn config_dir(path: &Path) -> &Path {
    if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    }
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let (mut config, config_path) = Config::load(args.config.as_deref(), config_dir(&args.path))?;
    if args.parallel {
        config.parallel = true;
    }
    if let Some(p) = &config_path {
        debug!(config = %p.display(), "loaded config");
    }

    let sources = acquire::collect_sources(&args.path, &config)?;
    info!(files = sources.len(), "collected source files");
    if sources.is_empty() {
        eprintln!("Warning: no supported source files found");
    }

    let analysis = RepositoryAnalyzer::new()
        .external_packages(config.allow_list())
        .parallel(config.parallel)
        .analyze(&sources);

    let path_str = args.path.to_string_lossy().to_string();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => report::write_json(&mut out, &path_str, config_str.as_deref(), &analysis)?,
        OutputFormat::Pretty => {
            report::write_pretty(&mut out, &path_str, config_str.as_deref(), &analysis)?
        }
    }
    out.flush()?;

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it, pass --force, or use --output to choose another path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&args.output, DEFAULT_CONFIG_TEMPLATE)?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize limits and exclusions", args.output.display());
    if !DEFAULT_CONFIG_NAMES.iter().any(|n| args.output.ends_with(n)) {
        println!("  2. Run: reposcope analyze . --config {}", args.output.display());
    } else {
        println!("  2. Run: reposcope analyze .");
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from(["reposcope", "-vv", "analyze", "src", "--format", "json", "--parallel"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.path, PathBuf::from("src"));
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.parallel);
                assert!(args.config.is_none());
            }
            Commands::Init(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["reposcope", "analyze", ".", "--format", "sarif"]).is_err());
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0), "warn");
        assert_eq!(log_filter(1), "debug");
        assert_eq!(log_filter(5), "trace");
    }

    #[test]
    fn test_init_writes_template_once() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("conf/reposcope.yaml");
        let args = InitArgs {
            output: output.clone(),
            force: false,
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, DEFAULT_CONFIG_TEMPLATE);

        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);

        let forced = InitArgs {
            output,
            force: true,
        };
        assert_eq!(run_init(&forced).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn test_analyze_bad_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("reposcope.yaml"), "max_files: 0\n").unwrap();
        let args = AnalyzeArgs {
            path: temp.path().to_path_buf(),
            config: None,
            format: OutputFormat::Json,
            parallel: false,
        };
        let err = run_analyze(&args).unwrap_err();
        assert!(err.to_string().contains("max_files"));
    }
}
