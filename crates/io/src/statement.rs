// Bank statement loader.
//
// The bank exports its history as an HTML table with an `.xls` extension.
// The first rows are a title/header block; data rows have no header and
// are positional. Only incoming credits reach the engine.

use std::path::Path;

use chrono::NaiveDate;
use saldo_recon::Payment;

use crate::normalize::{extract_tax_id, parse_amount_cents, read_file_as_utf8};
use crate::LoadReport;

const COL_TAX_ID: usize = 0;
const COL_DATE: usize = 1;
const COL_TYPE: usize = 2;
const COL_AMOUNT: usize = 3;
const COL_MEMO: usize = 5;

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Marker the bank puts on incoming credit rows.
const CREDIT_MARKER: &str = "(+) CR";

#[derive(Debug, Clone)]
pub struct StatementImportOptions {
    /// Title/header rows above the first data row.
    pub skip_rows: usize,
}

impl Default for StatementImportOptions {
    fn default() -> Self {
        Self { skip_rows: 17 }
    }
}

pub fn import(path: &Path) -> Result<(Vec<Payment>, LoadReport), String> {
    import_with_options(path, &StatementImportOptions::default())
}

pub fn import_with_options(
    path: &Path,
    options: &StatementImportOptions,
) -> Result<(Vec<Payment>, LoadReport), String> {
    let html = read_file_as_utf8(path)
        .map_err(|e| format!("failed to read bank statement: {e}"))?;
    Ok(parse_statement(&html, options))
}

/// Parse decoded statement HTML into chronologically sorted payments.
pub fn parse_statement(html: &str, options: &StatementImportOptions) -> (Vec<Payment>, LoadReport) {
    let mut payments = Vec::new();
    let mut report = LoadReport::default();

    for row in table_rows(html).into_iter().skip(options.skip_rows) {
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }

        let kind = row.get(COL_TYPE).map(String::as_str).unwrap_or("");
        if !kind.contains(CREDIT_MARKER) {
            report.filtered += 1;
            continue;
        }

        let date = row
            .get(COL_DATE)
            .and_then(|c| NaiveDate::parse_from_str(c, DATE_FORMAT).ok());
        let amount = row.get(COL_AMOUNT).and_then(|c| parse_amount_cents(c));

        match (date, amount) {
            (Some(date), Some(amount_cents)) if amount_cents > 0 => {
                payments.push(Payment {
                    tax_id: extract_tax_id(row.get(COL_TAX_ID).map(String::as_str).unwrap_or("")),
                    date,
                    amount_cents,
                    description: row.get(COL_MEMO).cloned().unwrap_or_default(),
                });
                report.loaded += 1;
            }
            _ => report.skipped += 1,
        }
    }

    // Chronological, stable: same-day payments keep statement order.
    payments.sort_by_key(|p| p.date);

    (payments, report)
}

/// Collect `<tr>`/`<td>` cell text from loose bank HTML. Tag case varies
/// between exports and end tags are not always balanced.
fn table_rows(html: &str) -> Vec<Vec<String>> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_row = false;
    let mut in_cell = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref().to_ascii_lowercase().as_slice() {
                b"tr" => {
                    if in_row && !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                    in_row = true;
                    in_cell = false;
                }
                b"td" | b"th" => {
                    in_cell = true;
                    cell.clear();
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref().to_ascii_lowercase().as_slice() {
                b"tr" => {
                    if in_row {
                        rows.push(std::mem::take(&mut row));
                        in_row = false;
                    }
                }
                b"td" | b"th" => {
                    if in_cell {
                        row.push(cell.trim().to_string());
                        in_cell = false;
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref().to_ascii_lowercase().as_slice() {
                b"td" | b"th" => row.push(String::new()),
                b"br" if in_cell => cell.push(' '),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_cell => {
                cell.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(_)) if in_cell => {
                // Entities in bank cells are spacing (&nbsp;).
                cell.push(' ');
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    rows
}
