use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;

use crate::application::{
    execute, parse_script, AccountSummary, BankReport, BankService, RunOptions, ScriptRun,
    Statement, StepOutcome, StepResult, DEMO_LIQUIDITY, DEMO_SCRIPT,
};
use crate::domain::{format_cents, parse_cents, Cents, OperationKind, Receipt, DEFAULT_LIQUIDITY};
use crate::io::Exporter;
use crate::telemetry;

/// Argentarius - In-memory bank ledger
#[derive(Parser)]
#[command(name = "argentarius")]
#[command(about = "An in-memory bank ledger: accounts, deposits, withdrawals and loans")]
#[command(version)]
pub struct Cli {
    /// Starting bank liquidity (e.g., "1000.00"); defaults to 10.00, or 1000.00 for `demo`
    #[arg(short, long, global = true)]
    pub liquidity: Option<String>,

    /// Output format for `demo` and `run`: table, json, csv (default: table).
    /// Not accepted by `export`, whose type fixes the format
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the built-in walkthrough and print every outcome
    Demo,

    /// Run a command script
    Run {
        /// Script file (stdin if omitted)
        script: Option<String>,

        /// Stop at the first refused operation and exit with an error
        #[arg(long)]
        stop_on_error: bool,
    },

    /// Export bank state to CSV or JSON
    Export {
        /// What to export: accounts, journal, report
        export_type: String,

        /// Script to run before exporting (empty bank if omitted)
        #[arg(short, long)]
        script: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json, csv", s),
        }
    }
}

fn parse_format(input: Option<&str>) -> Result<OutputFormat> {
    input.map_or(Ok(OutputFormat::Table), str::parse)
}

impl Cli {
    pub fn run(self) -> Result<()> {
        telemetry::init(self.verbose);

        match self.command {
            Commands::Demo => {
                let format = parse_format(self.format.as_deref())?;
                let liquidity = parse_liquidity(self.liquidity.as_deref(), DEMO_LIQUIDITY)?;
                let statements = parse_script(DEMO_SCRIPT)?;
                let mut service = BankService::with_liquidity(liquidity);
                let run = execute(&mut service, &statements, RunOptions::default());
                print_run(&service, &run, format)?;
            }

            Commands::Run {
                script,
                stop_on_error,
            } => {
                let format = parse_format(self.format.as_deref())?;
                let liquidity = parse_liquidity(self.liquidity.as_deref(), DEFAULT_LIQUIDITY)?;
                let statements = load_script(script.as_deref())?;
                let mut service = BankService::with_liquidity(liquidity);
                let run = execute(&mut service, &statements, RunOptions { stop_on_error });
                print_run(&service, &run, format)?;

                if stop_on_error {
                    if let Some(failed) = run.failures().next() {
                        anyhow::bail!(
                            "Stopped at line {}: {}",
                            failed.statement.line,
                            describe_failure(failed)
                        );
                    }
                }
            }

            Commands::Export {
                export_type,
                script,
                output,
            } => {
                if let Some(format) = self.format.as_deref() {
                    anyhow::bail!(
                        "--format '{}' does not apply to export; the export type fixes the format",
                        format
                    );
                }
                let liquidity = parse_liquidity(self.liquidity.as_deref(), DEFAULT_LIQUIDITY)?;
                let mut service = BankService::with_liquidity(liquidity);
                if let Some(path) = script.as_deref() {
                    let statements = load_script(Some(path))?;
                    let run = execute(&mut service, &statements, RunOptions::default());
                    let refused = run.failures().count();
                    if refused > 0 {
                        eprintln!("{} script step(s) refused before export", refused);
                    }
                }
                run_export_command(&service, &export_type, output.as_deref())?;
            }
        }

        Ok(())
    }
}

fn parse_liquidity(input: Option<&str>, default: Cents) -> Result<Cents> {
    match input {
        Some(s) => parse_cents(s)
            .with_context(|| format!("Invalid liquidity '{}'. Use '1000.00' or '1000'", s)),
        None => Ok(default),
    }
}

/// Read and parse a script from a file, or stdin when no path is given.
fn load_script(path: Option<&str>) -> Result<Vec<Statement>> {
    let source = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read script from stdin")?;
            buffer
        }
    };

    let statements = parse_script(&source)
        .with_context(|| format!("Invalid script: {}", path.unwrap_or("<stdin>")))?;
    Ok(statements)
}

fn print_run(service: &BankService, run: &ScriptRun, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for step in &run.steps {
                print_step(step);
            }
            if run.stopped_early {
                println!("(stopped after first refused operation)");
            }
        }
        OutputFormat::Json => {
            let document = RunDocument {
                steps: run.steps.iter().map(StepRecord::from).collect(),
                stopped_early: run.stopped_early,
                bank: service.report(),
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Csv => {
            Exporter::new(service.ledger()).journal_csv(std::io::stdout())?;
        }
    }
    Ok(())
}

fn print_step(step: &StepOutcome) {
    match &step.result {
        StepResult::Applied(receipt) => println!("{}", describe_receipt(receipt)),
        StepResult::Account(summary) => println!("Account: {}", summary),
        StepResult::Status(report) => print!("{}", report),
        StepResult::Failed(_) => println!(
            "Refused (line {}): {}",
            step.statement.line,
            describe_failure(step)
        ),
    }
}

fn describe_receipt(receipt: &Receipt) -> String {
    let id = receipt.account_id;
    let balances = format!(
        "{} -> {}",
        format_cents(receipt.balance.before),
        format_cents(receipt.balance.after)
    );
    match receipt.kind {
        OperationKind::Open => format!(
            "Account {} created with {} (fee {})",
            id,
            format_cents(receipt.balance.after),
            format_cents(receipt.fee)
        ),
        OperationKind::Close => format!(
            "Account {} removed (closing balance {})",
            id,
            format_cents(receipt.balance.before)
        ),
        OperationKind::Deposit => format!(
            "Deposit of {} to account {}: {} (fee {})",
            format_cents(receipt.amount),
            id,
            balances,
            format_cents(receipt.fee)
        ),
        OperationKind::Withdrawal => format!(
            "Withdrawal of {} from account {}: {}",
            format_cents(receipt.amount),
            id,
            balances
        ),
        OperationKind::Loan => format!(
            "Loan of {} to account {}: {} (liquidity {})",
            format_cents(receipt.amount),
            id,
            balances,
            format_cents(receipt.liquidity.after)
        ),
    }
}

fn describe_failure(step: &StepOutcome) -> String {
    match &step.result {
        StepResult::Failed(err) => format!("{}: {}", step.statement.command, err),
        _ => step.statement.command.to_string(),
    }
}

#[derive(Serialize)]
struct RunDocument<'a> {
    steps: Vec<StepRecord<'a>>,
    stopped_early: bool,
    bank: BankReport,
}

#[derive(Serialize)]
struct StepRecord<'a> {
    line: usize,
    command: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<&'a Receipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<AccountSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a BankReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
}

impl<'a> From<&'a StepOutcome> for StepRecord<'a> {
    fn from(step: &'a StepOutcome) -> Self {
        let mut record = StepRecord {
            line: step.statement.line,
            command: step.statement.command.to_string(),
            status: "ok",
            receipt: None,
            account: None,
            report: None,
            error: None,
            error_kind: None,
        };
        match &step.result {
            StepResult::Applied(receipt) => record.receipt = Some(receipt),
            StepResult::Account(summary) => record.account = Some(*summary),
            StepResult::Status(report) => record.report = Some(report),
            StepResult::Failed(err) => {
                record.status = "refused";
                record.error = Some(err.to_string());
                record.error_kind = Some(err.kind());
            }
        }
        record
    }
}

fn run_export_command(
    service: &BankService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service.ledger());

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "accounts" => {
            let count = exporter.accounts_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} accounts", count);
            }
        }
        "journal" => {
            let count = exporter.journal_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} journal entries", count);
            }
        }
        "report" => {
            let snapshot = exporter.report_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported bank report: {} accounts, {} journal entries",
                    snapshot.report.accounts.len(),
                    snapshot.journal.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: accounts, journal, report",
                export_type
            );
        }
    }

    Ok(())
}
