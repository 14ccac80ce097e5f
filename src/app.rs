//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment configuration
//! - initializes logging
//! - runs the explore pipeline
//! - prints reports
//! - writes optional exports

use std::path::Path;

use chrono::Datelike;
use clap::Parser;

use crate::analytics::cutoff_year;
use crate::cli::{Command, ExploreArgs};
use crate::domain::ExplorerConfig;
use crate::error::AppError;

pub mod pipeline;

/// Environment variable pinning the "current year" used for `--years` windows.
const REFERENCE_YEAR_ENV: &str = "SX_REFERENCE_YEAR";

/// Entry point for the `sx` binary.
pub fn run() -> Result<(), AppError> {
    // `sx a.json b.json` behaves like `sx table a.json b.json`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_environment(None, cli.verbose);

    match cli.command {
        Command::Table(args) => handle_table(&args),
        Command::Summary(args) => handle_summary(&args),
        Command::Movers(args) => handle_movers(&args),
    }
}

/// Load `.env` (or `env_file`), then install logging.
///
/// `.env` goes first so a RUST_LOG set there reaches the filter.
fn init_environment(env_file: Option<&Path>, verbose: bool) {
    let loaded = match env_file {
        Some(path) => dotenvy::from_path(path).is_ok(),
        None => dotenvy::dotenv().is_ok(),
    };
    crate::logging::init_logging(verbose);
    tracing::debug!(loaded, "environment file");
}

fn handle_table(args: &ExploreArgs) -> Result<(), AppError> {
    let config = explorer_config_from_args(args)?;
    let run = pipeline::run_explorer(&config)?;

    println!("{}", crate::report::format_latest(&run.series));
    print!("{}", crate::report::format_aligned_table(&run.rows, &run.series));

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_rows_csv(path, &run.rows, &run.series)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_rows_json(path, &run.rows)?;
    }

    Ok(())
}

fn handle_summary(args: &ExploreArgs) -> Result<(), AppError> {
    let config = explorer_config_from_args(args)?;
    let run = pipeline::run_explorer(&config)?;

    for (series, summary) in pipeline::selected_summaries(&run, &config)? {
        println!("{}", crate::report::format_summary(series, summary));
    }
    Ok(())
}

fn handle_movers(args: &ExploreArgs) -> Result<(), AppError> {
    let config = explorer_config_from_args(args)?;
    let run = pipeline::run_explorer(&config)?;

    print!(
        "{}",
        crate::report::format_movers(&run.movers, &run.series, config.basis)
    );
    Ok(())
}

/// Build the run configuration from CLI flags plus environment defaults.
pub fn explorer_config_from_args(args: &ExploreArgs) -> Result<ExplorerConfig, AppError> {
    let env_year = std::env::var(REFERENCE_YEAR_ENV).ok();
    let reference_year = parse_reference_year(env_year.as_deref())?
        .unwrap_or_else(|| chrono::Local::now().year());

    Ok(ExplorerConfig {
        inputs: args.files.clone(),
        reference_year,
        cutoff_year: cutoff_year(reference_year, args.years),
        order: args.order,
        top_n: args.top,
        basis: args.basis,
        series_filter: args.series.clone(),
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

fn parse_reference_year(raw: Option<&str>) -> Result<Option<i32>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i32>().map(Some).map_err(|_| {
        AppError::input(format!(
            "Invalid {REFERENCE_YEAR_ENV} '{raw}': expected a year like 2024."
        ))
    })
}

/// Rewrite argv so `sx` defaults to `sx table`.
///
/// Rules:
/// - `sx a.json ...`           -> `sx table a.json ...`
/// - `sx -y 5 a.json ...`      -> `sx table -y 5 a.json ...`
/// - `sx`, `sx --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "table" | "summary" | "movers");
    if is_subcommand {
        return argv;
    }

    // A global flag can precede the subcommand.
    if matches!(arg1.as_str(), "-v" | "--verbose") {
        let mut rest = argv.split_off(1);
        let flag = rest.remove(0);
        let mut tail = rewrite_args(std::iter::once(argv[0].clone()).chain(rest).collect());
        tail.insert(1, flag);
        return tail;
    }

    argv.insert(1, "table".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::domain::{ChangeBasis, SortOrder};

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_table() {
        assert_eq!(rewrite_args(argv(&["sx", "a.json"])), argv(&["sx", "table", "a.json"]));
        assert_eq!(
            rewrite_args(argv(&["sx", "-y", "5", "a.json"])),
            argv(&["sx", "table", "-y", "5", "a.json"])
        );
        assert_eq!(
            rewrite_args(argv(&["sx", "-v", "a.json"])),
            argv(&["sx", "-v", "table", "a.json"])
        );
        assert_eq!(rewrite_args(argv(&["sx", "movers", "a.json"])), argv(&["sx", "movers", "a.json"]));
        assert_eq!(rewrite_args(argv(&["sx", "--help"])), argv(&["sx", "--help"]));
        assert_eq!(rewrite_args(argv(&["sx"])), argv(&["sx"]));
    }

    #[test]
    fn parses_args_into_config() {
        let cli = Cli::parse_from(rewrite_args(argv(&[
            "sx", "-y", "3", "--order", "asc", "--basis", "year", "--top", "2", "a.json", "b.json",
        ])));
        let Command::Table(args) = cli.command else {
            panic!("expected table command");
        };
        assert_eq!(args.files.len(), 2);

        let mut config = explorer_config_from_args(&args).unwrap();
        assert_eq!(config.order, SortOrder::Asc);
        assert_eq!(config.basis, ChangeBasis::Year);
        assert_eq!(config.top_n, 2);

        // Cutoff is derived from whatever reference year was resolved.
        assert_eq!(config.cutoff_year, Some(config.reference_year - 3));

        config.cutoff_year = cutoff_year(2026, 0);
        assert_eq!(config.cutoff_year, None);
    }

    #[test]
    fn env_file_is_loaded_before_logging() {
        let path = std::env::temp_dir().join(format!("sx-env-{}.env", std::process::id()));
        std::fs::write(&path, "SX_ENV_FILE_CHECK=loaded\n").unwrap();

        init_environment(Some(&path), false);
        assert_eq!(std::env::var("SX_ENV_FILE_CHECK").as_deref(), Ok("loaded"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn reference_year_parsing() {
        assert_eq!(parse_reference_year(None).unwrap(), None);
        assert_eq!(parse_reference_year(Some("  ")).unwrap(), None);
        assert_eq!(parse_reference_year(Some("2024")).unwrap(), Some(2024));
        assert_eq!(parse_reference_year(Some("soon")).unwrap_err().exit_code(), 2);
    }
}
