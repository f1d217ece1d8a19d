//! RotationLab CLI — sector rotation analysis on Angel One SmartAPI data.
//!
//! Commands:
//! - `analyze` (default) — fetch, classify and chart every configured sector
//! - `universe` — print the sector universe as TOML
//! - `lookup` — resolve symbols to instrument tokens

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use rotationlab_core::data::{SmartApiClient, SymbolTable, ThreadSleeper, Universe};
use rotationlab_runner::{
    analyze_report, attach_rotation, credentials_from_env, save_report, CandleFetcher, RunConfig,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "rotationlab",
    about = "RotationLab — sector rotation analysis for NSE equities",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    analyze: AnalyzeArgs,

    /// Log request details (debug level).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, classify and chart every configured sector.
    Analyze(AnalyzeArgs),
    /// Print the sector universe as TOML.
    Universe {
        /// Config file whose `[[sectors]]` replace the built-in universe.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Resolve symbols to instrument tokens from the instrument master.
    Lookup {
        /// Symbols to resolve (e.g., SBIN RELIANCE).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Config file (for exchange and master URL).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Path to a TOML config file. Defaults to <config_dir>/rotationlab/config.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only analyze these sectors (repeatable).
    #[arg(long = "sector")]
    sectors: Vec<String>,

    /// Print the table only; skip the chart screen.
    #[arg(long, default_value_t = false)]
    no_chart: bool,

    /// Write report.json and sectors.csv to this directory.
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    finish(run(cli))
}

/// Errors are logged, never turned into a failing exit status.
fn finish(result: Result<()>) -> ExitCode {
    if let Err(e) = result {
        log::error!("fatal: {e:#}");
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze(args)) => run_analyze(args),
        None => run_analyze(cli.analyze),
        Some(Commands::Universe { config }) => run_universe(config.as_deref()),
        Some(Commands::Lookup { symbols, config }) => run_lookup(&symbols, config.as_deref()),
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rotationlab").join("config.toml"))
}

/// Explicit path must exist; the default path is used only when present.
fn load_config(explicit: Option<&Path>) -> Result<RunConfig> {
    if let Some(path) = explicit {
        return RunConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            log::info!("using config {}", path.display());
            RunConfig::from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        _ => Ok(RunConfig::default()),
    }
}

fn load_symbols(config: &RunConfig) -> Result<SymbolTable> {
    let table = SymbolTable::download(&config.instrument_master_url, config.exchange)
        .context("failed to load instrument master")?;
    non_empty(table)
}

fn non_empty(table: SymbolTable) -> Result<SymbolTable> {
    if table.is_empty() {
        bail!("instrument master has no {} instruments", table.exchange());
    }
    log::info!("{} {} instruments loaded", table.len(), table.exchange());
    Ok(table)
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let universe = config.universe().select(&args.sectors)?;
    if universe.sectors.is_empty() {
        bail!("no sectors to analyze");
    }

    let credentials = credentials_from_env()?;
    let client = SmartApiClient::connect(&credentials, &config.base_url)
        .context("SmartAPI login failed")?;
    if client.feed_token().is_some() {
        log::debug!("feed token issued");
    }
    let symbols = load_symbols(&config)?;

    let sleeper = ThreadSleeper;
    let fetcher = CandleFetcher::new(
        &client,
        &symbols,
        &sleeper,
        chrono::Local::now().naive_local(),
    )
    .with_retry(config.retry_policy())
    .with_request_delay(config.request_delay());

    let mut report = analyze_report(&fetcher, &config, &universe);

    println!("{}", report.render_table());
    println!("{}", report.summary());
    if !report.skipped.is_empty() {
        println!("{} stock(s) skipped", report.skipped.len());
    }
    if !report.empty_sectors.is_empty() {
        println!("no data: {}", report.empty_sectors.join(", "));
    }

    if !args.no_chart || args.export.is_some() {
        report = attach_rotation(&fetcher, &config, &universe, report);
    }

    if let Some(dir) = &args.export {
        let written = save_report(&report, dir)?;
        for path in written {
            println!("wrote {}", path.display());
        }
    }

    if !args.no_chart {
        let level = log::max_level();
        log::set_max_level(LevelFilter::Off);
        let shown = rotationlab_tui::show(&report);
        log::set_max_level(level);
        shown?;
    }

    Ok(())
}

fn run_universe(config: Option<&Path>) -> Result<()> {
    let universe = match config {
        Some(path) => load_config(Some(path))?.universe(),
        None => Universe::default_nse(),
    };
    print!("{}", universe.to_toml()?);
    Ok(())
}

fn run_lookup(symbols: &[String], config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let table = load_symbols(&config)?;

    println!("{:<16} {:>10}", "Symbol", "Token");
    println!("{}", "-".repeat(27));
    for symbol in symbols {
        match table.lookup(symbol) {
            Some(token) => println!("{:<16} {:>10}", symbol, token.as_str()),
            None => println!("{:<16} {:>10}", symbol, "not found"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_runs_analyze_with_top_level_flags() {
        let cli = Cli::try_parse_from([
            "rotationlab",
            "--sector",
            "Banking",
            "--sector",
            "IT",
            "--no-chart",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.analyze.sectors, vec!["Banking", "IT"]);
        assert!(cli.analyze.no_chart);
        assert!(!cli.verbose);
    }

    #[test]
    fn analyze_subcommand_accepts_export_and_verbose() {
        let cli = Cli::try_parse_from([
            "rotationlab",
            "analyze",
            "--export",
            "out",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Analyze(args)) => {
                assert_eq!(args.export, Some(PathBuf::from("out")));
                assert!(!args.no_chart);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn lookup_requires_symbols() {
        assert!(Cli::try_parse_from(["rotationlab", "lookup"]).is_err());
        let cli = Cli::try_parse_from(["rotationlab", "lookup", "SBIN", "INFY"]).unwrap();
        match cli.command {
            Some(Commands::Lookup { symbols, .. }) => assert_eq!(symbols, vec!["SBIN", "INFY"]),
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn failed_run_still_exits_successfully() {
        let missing = rotationlab_runner::credentials_from(|_| None)
            .map(|_| ())
            .context("SmartAPI login failed");
        assert!(missing.is_err());
        assert_eq!(finish(missing), ExitCode::SUCCESS);
        assert_eq!(finish(Ok(())), ExitCode::SUCCESS);
    }

    #[test]
    fn empty_instrument_master_is_an_error() {
        let empty = SymbolTable::from_records(Vec::new(), rotationlab_core::domain::Exchange::Nse);
        assert!(non_empty(empty).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = std::env::temp_dir().join("rotationlab-cli-missing-config");
        assert!(load_config(Some(&dir.join("absent.toml"))).is_err());
    }
}
