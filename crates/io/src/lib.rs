//! `saldo-io` — source normalizers and report renderers.
//!
//! Reads the invoice workbook and the bank's HTML statement export into the
//! engine's record types, and writes the two output workbooks. Malformed
//! source rows are dropped and counted, never surfaced as errors; the
//! engine always receives a clean record set.

pub mod invoices;
pub mod normalize;
pub mod report;
pub mod statement;

use serde::Serialize;

/// Row counters from one loader pass. `skipped` rows failed to parse;
/// `filtered` rows were excluded by transaction type (non-credit bank rows).
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    pub filtered: usize,
}

impl LoadReport {
    pub fn has_warnings(&self) -> bool {
        self.skipped > 0
    }

    pub fn summary(&self) -> String {
        let mut s = format!("{} rows loaded", self.loaded);
        if self.skipped > 0 {
            s.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.filtered > 0 {
            s.push_str(&format!(", {} filtered out", self.filtered));
        }
        s
    }
}
