// saldo CLI - invoice vs bank-statement reconciliation, batch mode

mod config;
mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use config::RunConfig;
use exit_codes::{
    EXIT_CONFIG_INVALID, EXIT_INPUT_MISSING, EXIT_INPUT_PARSE, EXIT_REPORT_WRITE, EXIT_USAGE,
};
use saldo_io::invoices::InvoiceImportOptions;
use saldo_io::statement::StatementImportOptions;
use saldo_io::LoadReport;
use saldo_recon::{AllocationSummary, CompanyStatement};

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError { code, message: message.into(), hint: None }
}

#[derive(Parser)]
#[command(name = "saldo")]
#[command(about = "Reconcile customer invoices against incoming bank payments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run reconciliation and write both reports
    #[command(after_help = "\
Examples:
  saldo run --invoices Invoices.xlsx --statement 'Bank History.xls'
  saldo run --config run.toml
  saldo run --config run.toml --json > result.json
  saldo run --invoices Invoices.xlsx --statement Bank.xls --recon-out out/recon.xlsx")]
    Run {
        /// Path to a TOML run config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Invoice workbook (xlsx/xls)
        #[arg(long)]
        invoices: Option<PathBuf>,

        /// Bank statement export (HTML table)
        #[arg(long)]
        statement: Option<PathBuf>,

        /// Reconciliation report destination
        #[arg(long)]
        recon_out: Option<PathBuf>,

        /// Company statements destination
        #[arg(long)]
        statements_out: Option<PathBuf>,

        /// Print the run result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Suppress stderr notes
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a run config without reconciling
    #[command(after_help = "\
Examples:
  saldo validate run.toml")]
    Validate {
        /// Path to the TOML run config
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, invoices, statement, recon_out, statements_out, json, quiet } => {
            cmd_run(config, invoices, statement, recon_out, statements_out, json, quiet)
        }
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

/// Merge config file and flag overrides into one effective config.
fn effective_config(
    config_path: Option<PathBuf>,
    invoices: Option<PathBuf>,
    statement: Option<PathBuf>,
    recon_out: Option<PathBuf>,
    statements_out: Option<PathBuf>,
) -> Result<RunConfig, CliError> {
    let mut config = match config_path {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| cli_err(EXIT_CONFIG_INVALID, format!("cannot read config: {e}")))?;
            let mut config = RunConfig::from_toml(&text)
                .map_err(|e| cli_err(EXIT_CONFIG_INVALID, e))?;
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.resolve_relative_to(base);
            config
        }
        None => match (invoices.clone(), statement.clone()) {
            (Some(invoices), Some(statement)) => RunConfig {
                invoices,
                statement,
                reconciliation_out: PathBuf::from("reconciliation_report.xlsx"),
                statements_out: PathBuf::from("company_statements.xlsx"),
                invoice_sheet: None,
                invoice_skip_rows: None,
                statement_skip_rows: None,
            },
            _ => {
                let mut err = cli_err(
                    EXIT_USAGE,
                    "both --invoices and --statement are required without --config",
                );
                err.hint = Some("see `saldo run --help`".into());
                return Err(err);
            }
        },
    };

    if let Some(path) = invoices {
        config.invoices = path;
    }
    if let Some(path) = statement {
        config.statement = path;
    }
    if let Some(path) = recon_out {
        config.reconciliation_out = path;
    }
    if let Some(path) = statements_out {
        config.statements_out = path;
    }

    Ok(config)
}

#[derive(serde::Serialize)]
struct RunMeta {
    tool: &'static str,
    version: &'static str,
    run_at: String,
}

#[derive(serde::Serialize)]
struct CompanyBalance<'a> {
    name: &'a str,
    tax_ids: &'a [String],
    balance_cents: i64,
}

#[derive(serde::Serialize)]
struct RunOutput<'a> {
    meta: RunMeta,
    invoices: &'a LoadReport,
    payments: &'a LoadReport,
    allocation: &'a AllocationSummary,
    companies: Vec<CompanyBalance<'a>>,
}

fn cmd_run(
    config_path: Option<PathBuf>,
    invoices_flag: Option<PathBuf>,
    statement_flag: Option<PathBuf>,
    recon_out: Option<PathBuf>,
    statements_out: Option<PathBuf>,
    json_output: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = effective_config(
        config_path,
        invoices_flag,
        statement_flag,
        recon_out,
        statements_out,
    )?;

    // Both sources are required and checked before any parsing.
    let missing: Vec<String> = [&config.invoices, &config.statement]
        .iter()
        .filter(|p| !p.exists())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(cli_err(
            EXIT_INPUT_MISSING,
            format!("missing source file(s): {}", missing.join(", ")),
        ));
    }

    let invoice_options = InvoiceImportOptions {
        skip_rows: config.invoice_skip_rows.unwrap_or(11),
        sheet: config.invoice_sheet.clone(),
    };
    let (invoices, invoice_report) =
        saldo_io::invoices::import_with_options(&config.invoices, &invoice_options)
            .map_err(|e| cli_err(EXIT_INPUT_PARSE, e))?;

    let statement_options = StatementImportOptions {
        skip_rows: config.statement_skip_rows.unwrap_or(17),
    };
    let (payments, statement_report) =
        saldo_io::statement::import_with_options(&config.statement, &statement_options)
            .map_err(|e| cli_err(EXIT_INPUT_PARSE, e))?;

    if !quiet {
        eprintln!("invoices: {}", invoice_report.summary());
        eprintln!("payments: {}", statement_report.summary());
    }

    let run = saldo_recon::allocate(&invoices, &payments);
    let statements = saldo_recon::build_statements(&invoices, &payments);

    if !quiet {
        let s = &run.summary;
        eprintln!(
            "allocation: {} matched events, {} unmatched payments, {} with leftover; applied {}, leftover {}, {} invoices open ({})",
            s.matched_events,
            s.unmatched_payments,
            s.leftover_payments,
            fmt_cents(s.applied_cents),
            fmt_cents(s.leftover_cents),
            s.open_invoices,
            fmt_cents(s.open_cents),
        );
    }

    // A failed report is fatal for that report only; try both before
    // deciding the exit.
    let mut write_errors: Vec<String> = Vec::new();
    match saldo_io::report::write_reconciliation(
        &config.reconciliation_out,
        &invoices,
        &payments,
        &run,
    ) {
        Ok(()) => {
            if !quiet {
                eprintln!("wrote {}", config.reconciliation_out.display());
            }
        }
        Err(e) => write_errors.push(e),
    }
    match saldo_io::report::write_company_statements(&config.statements_out, &statements) {
        Ok(()) => {
            if !quiet {
                eprintln!("wrote {}", config.statements_out.display());
            }
        }
        Err(e) => write_errors.push(e),
    }

    if json_output {
        let output = RunOutput {
            meta: RunMeta {
                tool: "saldo",
                version: env!("CARGO_PKG_VERSION"),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            invoices: &invoice_report,
            payments: &statement_report,
            allocation: &run.summary,
            companies: statements
                .iter()
                .map(|s: &CompanyStatement| CompanyBalance {
                    name: &s.name,
                    tax_ids: &s.tax_ids,
                    balance_cents: s.balance_cents,
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| cli_err(EXIT_REPORT_WRITE, format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    if !write_errors.is_empty() {
        return Err(cli_err(EXIT_REPORT_WRITE, write_errors.join("; ")));
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_CONFIG_INVALID, format!("cannot read config: {e}")))?;

    match RunConfig::from_toml(&text) {
        Ok(config) => {
            eprintln!(
                "valid: invoices '{}', statement '{}', outputs '{}' + '{}'",
                config.invoices.display(),
                config.statement.display(),
                config.reconciliation_out.display(),
                config.statements_out.display(),
            );
            Ok(())
        }
        Err(e) => Err(cli_err(EXIT_CONFIG_INVALID, e)),
    }
}

fn fmt_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}
