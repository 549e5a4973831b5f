use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use tax_core::SourceConfig;
use tax_ui::app::{self, TaxApp};
use tax_ui::config::TaxUiConfig;
use tax_ui::format::{format_currency, format_percent};
use tax_ui::views::{render_form_errors, render_result};
use tax_ui::{TaxForm, csv_loader, logging, session};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax calculator.
///
/// Fetches the bracket set for a tax year from the bracket service (or a
/// local CSV file) and shows the tax owed in each band.
#[derive(Debug, Parser)]
#[command(name = "tax-calculator", version)]
struct Cli {
    /// TOML config file. Defaults to `tax-calculator.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the bracket service.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Read brackets from this CSV file instead of the service.
    #[arg(long, global = true, conflicts_with = "api_url")]
    brackets_file: Option<PathBuf>,

    /// Log level or `EnvFilter` directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate tax for a single income.
    Calculate {
        /// Annual taxable income, e.g. `75000` or `75,000.00`.
        #[arg(long)]
        income: String,

        /// Four-digit tax year.
        #[arg(long)]
        year: String,
    },

    /// Calculate every row of an `income,tax_year` CSV file and write CSV results.
    Batch {
        #[arg(long)]
        file: PathBuf,
    },

    /// Read `<income> <year>` lines from stdin (the default).
    Interactive,
}

#[derive(Debug, Serialize)]
struct BatchRow {
    income: String,
    tax_year: i32,
    total_tax: String,
    effective_rate: String,
    error: String,
}

// ─── setup ───────────────────────────────────────────────────────────────────

fn resolve_config(cli: &Cli) -> anyhow::Result<TaxUiConfig> {
    let mut config =
        TaxUiConfig::discover(cli.config.as_deref()).context("failed to load configuration")?;
    config.apply_env_overrides(|key| std::env::var(key).ok());

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.log.file = Some(file.clone());
    }
    Ok(config)
}

fn source_config(
    cli: &Cli,
    config: &TaxUiConfig,
) -> SourceConfig {
    match &cli.brackets_file {
        Some(path) => SourceConfig::csv(path),
        None => config.http_source(),
    }
}

// ─── subcommands ─────────────────────────────────────────────────────────────

async fn calculate_once(
    app: &mut TaxApp,
    income: String,
    year: String,
) -> ExitCode {
    match app.submit(&TaxForm::new(income, year)).await {
        Ok(result) => {
            println!("{}", render_result(&result));
            ExitCode::SUCCESS
        }
        Err(app::AppError::Form(errors)) => {
            eprintln!("{}", render_form_errors(&errors));
            ExitCode::from(2)
        }
        Err(_) => {
            if let Some(message) = &app.state().error {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run_batch(
    app: &TaxApp,
    file: &Path,
) -> anyhow::Result<ExitCode> {
    let inputs = csv_loader::load_from_file(file, app.supported_years())
        .with_context(|| format!("failed to load batch file '{}'", file.display()))?;
    info!(rows = inputs.len(), "running batch");

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    let mut failures = 0usize;
    for input in inputs {
        let row = match app.calculate(input).await {
            Ok(result) => BatchRow {
                income: format_currency(input.income),
                tax_year: input.tax_year,
                total_tax: format_currency(result.total_tax),
                effective_rate: format_percent(result.effective_rate),
                error: String::new(),
            },
            Err(error) => {
                failures += 1;
                BatchRow {
                    income: format_currency(input.income),
                    tax_year: input.tax_year,
                    total_tax: String::new(),
                    effective_rate: String::new(),
                    error: error.to_string(),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(failures, "batch finished");
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.log.level);
    if let Some(path) = &config.log.file {
        logging::enable_file_logging(path)?;
    }

    let source_config = source_config(&cli, &config);
    let source = app::build_source(&source_config)
        .await
        .context("failed to create bracket source")?;
    let mut app = TaxApp::new(source, config.form.years.clone());

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Calculate { income, year } => Ok(calculate_once(&mut app, income, year).await),
        Command::Batch { file } => run_batch(&app, &file).await,
        Command::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let completed = session::run(&mut app, stdin, &mut stdout).await?;
            stdout.flush()?;
            info!(completed, "goodbye");
            Ok(ExitCode::SUCCESS)
        }
    }
}
