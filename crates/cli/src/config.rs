//! TOML run configuration.
//!
//! The entry point receives one explicit config value; there is no
//! process-wide path state. Flags override file values, file values
//! override defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Invoice workbook (xlsx/xls).
    pub invoices: PathBuf,
    /// Bank statement export (HTML table with an .xls extension).
    pub statement: PathBuf,

    #[serde(default = "default_reconciliation_out")]
    pub reconciliation_out: PathBuf,
    #[serde(default = "default_statements_out")]
    pub statements_out: PathBuf,

    /// Sheet to read invoices from; first sheet when not set.
    #[serde(default)]
    pub invoice_sheet: Option<String>,
    /// Title-block rows above the invoice header row.
    #[serde(default)]
    pub invoice_skip_rows: Option<usize>,
    /// Title/header rows above the first statement data row.
    #[serde(default)]
    pub statement_skip_rows: Option<usize>,
}

fn default_reconciliation_out() -> PathBuf {
    PathBuf::from("reconciliation_report.xlsx")
}

fn default_statements_out() -> PathBuf {
    PathBuf::from("company_statements.xlsx")
}

impl RunConfig {
    pub fn from_toml(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| format!("config parse error: {e}"))
    }

    /// Resolve all paths relative to the config file's directory.
    /// Absolute paths pass through unchanged.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.invoices,
            &mut self.statement,
            &mut self.reconciliation_out,
            &mut self.statements_out,
        ] {
            *path = base.join(&*path);
        }
    }
}
