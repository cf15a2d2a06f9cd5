// Invoice workbook loader.
//
// The export carries a multi-row title block, then a header row, then data.
// Columns are positional; the header row's labels are not trusted.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use saldo_recon::Invoice;

use crate::normalize::{excel_serial_to_date, extract_tax_id, parse_amount_cents};
use crate::LoadReport;

const COL_NUMBER: usize = 0;
const COL_TAX_ID: usize = 1;
const COL_COMPANY: usize = 2;
const COL_DATE: usize = 5;
const COL_TOTAL: usize = 19;

const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone)]
pub struct InvoiceImportOptions {
    /// Title-block rows above the header row.
    pub skip_rows: usize,
    /// Sheet to read; first sheet when not set.
    pub sheet: Option<String>,
}

impl Default for InvoiceImportOptions {
    fn default() -> Self {
        Self { skip_rows: 11, sheet: None }
    }
}

pub fn import(path: &Path) -> Result<(Vec<Invoice>, LoadReport), String> {
    import_with_options(path, &InvoiceImportOptions::default())
}

pub fn import_with_options(
    path: &Path,
    options: &InvoiceImportOptions,
) -> Result<(Vec<Invoice>, LoadReport), String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("failed to open invoice workbook: {e}"))?;

    let sheet_name = match &options.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| "invoice workbook contains no sheets".to_string())?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("failed to read sheet '{sheet_name}': {e}"))?;

    // skip_rows counts absolute worksheet rows, but the range starts at the
    // first used cell; also skip the header row itself.
    let range_start = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let skip = (options.skip_rows + 1).saturating_sub(range_start);

    let mut invoices = Vec::new();
    let mut report = LoadReport::default();

    for row in range.rows().skip(skip) {
        if row_is_empty(row) {
            continue;
        }

        let total = cell_amount_cents(row, COL_TOTAL);
        let date = cell_date(row, COL_DATE);
        match (total, date) {
            (Some(total_cents), Some(date)) => {
                invoices.push(Invoice {
                    number: cell_text(row, COL_NUMBER),
                    tax_id: extract_tax_id(&cell_text(row, COL_TAX_ID)),
                    company: cell_text(row, COL_COMPANY),
                    date,
                    total_cents,
                });
                report.loaded += 1;
            }
            _ => report.skipped += 1,
        }
    }

    Ok((invoices, report))
}

fn row_is_empty(row: &[Data]) -> bool {
    [COL_NUMBER, COL_TAX_ID, COL_COMPANY, COL_DATE, COL_TOTAL]
        .iter()
        .all(|&i| matches!(row.get(i), None | Some(Data::Empty)))
}

fn cell_text(row: &[Data], idx: usize) -> String {
    match row.get(idx) {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) if f.fract() == 0.0 => format!("{}", *f as i64),
        Some(Data::Float(f)) => format!("{f}"),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::DateTime(dt)) => format!("{}", dt.as_f64()),
        _ => String::new(),
    }
}

fn cell_amount_cents(row: &[Data], idx: usize) -> Option<i64> {
    match row.get(idx) {
        Some(Data::Float(f)) => Some((f * 100.0).round() as i64),
        Some(Data::Int(i)) => i.checked_mul(100),
        Some(Data::String(s)) => parse_amount_cents(s),
        _ => None,
    }
}

fn cell_date(row: &[Data], idx: usize) -> Option<NaiveDate> {
    match row.get(idx) {
        Some(Data::String(s)) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
        Some(Data::DateTime(dt)) => excel_serial_to_date(dt.as_f64()),
        Some(Data::Float(f)) => excel_serial_to_date(*f),
        Some(Data::Int(i)) => excel_serial_to_date(*i as f64),
        _ => None,
    }
}
