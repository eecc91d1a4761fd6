//! Command-line interface for afevt.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{self, Config};
use crate::facts;
use crate::report::{self, Format};
use crate::rule::AFEVT;
use crate::runner::Runner;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Flag parameterless construction of structs that declare other constructors.
///
/// afevt reads the facts files an external frontend writes for each compiled
/// source unit (construction sites plus the types they resolve to) and
/// reports every `new T()`, `new T { .. }` or `default(T)` of a struct that
/// declares its own constructors.
#[derive(Parser)]
#[command(name = "afevt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate facts files and report diagnostics
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// Write a starter afevt.yaml
    Init(InitArgs),
    /// Describe the rule
    Rules,
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Facts file or directory to scan
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Show suppressed diagnostics in output
    #[arg(long)]
    pub show_suppressed: bool,

    /// Ignore inline suppression comments
    #[arg(long)]
    pub no_suppressions: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "afevt.yaml")]
    pub output: PathBuf,
}

/// Collect facts files under `root` selected by the config.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let include = config.facts_matcher()?;
    let exclude = config.excluded_matcher()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden directories
            let name = e.file_name().to_string_lossy();
            !(e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.'))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(path);
        if !include.is_match(rel) {
            continue;
        }
        if exclude.is_match(rel) {
            debug_log!("excluded {}", rel.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (config, config_path) = match config::load(args.config.as_deref(), Path::new(".")) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if abs_path.is_dir() {
        collect_files(&abs_path, &config)?
    } else {
        if !facts::is_facts_file(&abs_path) {
            eprintln!(
                "Warning: {} does not look like a facts file, reading it anyway",
                abs_path.display()
            );
        }
        vec![abs_path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no facts files to scan");
        return Ok(EXIT_SUCCESS);
    }
    debug_log!("scanning {} facts files", files.len());

    let runner = Runner::new().use_suppressions(config.use_suppressions() && !args.no_suppressions);
    let result = runner.run(&files);

    let path_str = args.path.to_string_lossy().to_string();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());

    match format {
        Format::Json => report::write_json(&path_str, config_str.as_deref(), &result)?,
        Format::Sarif => {
            let base = if abs_path.is_dir() {
                abs_path.as_path()
            } else {
                abs_path.parent().unwrap_or(Path::new(""))
            };
            report::write_sarif(base, &result)?
        }
        Format::Pretty => report::write_pretty(
            &path_str,
            config_str.as_deref(),
            &result,
            args.show_suppressed,
        ),
    }

    if result.passed() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Point your frontend at the sources and write *.facts.json files");
    println!("  2. Run: afevt lint <dir> --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

/// Run the rules command.
pub fn run_rules() -> anyhow::Result<i32> {
    println!("{}  {}", AFEVT.id, AFEVT.title);
    println!("  category: {}", AFEVT.category);
    println!("  severity: {}", AFEVT.severity);
    println!("  enabled:  {}", AFEVT.enabled_by_default);
    println!("  message:  {}", AFEVT.message_format);
    println!();
    println!("  {}", AFEVT.description);
    Ok(EXIT_SUCCESS)
}
