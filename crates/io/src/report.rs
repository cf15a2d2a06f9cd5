// Output workbook rendering.
//
// Purely presentational: every number here comes straight from the engine.
// Amounts are written as units (cents / 100) with a two-decimal format,
// dates as `dd.mm.yyyy` strings.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use saldo_recon::{
    AllocationOutcome, AllocationRun, CompanyStatement, Invoice, InvoiceStatus, Payment,
};

const HEADER_FILL: u32 = 0xD9E1F2;
const MATCHED_FILL: u32 = 0xE2EFDA;
const LEFTOVER_FILL: u32 = 0xFFF2CC;
const NO_MATCH_FILL: u32 = 0xFCE4D6;
const OPEN_FILL: u32 = 0xF2F2F2;

const RECON_HEADERS: [&str; 12] = [
    "Payment Date",
    "Payer VOEN",
    "Payment Amount",
    "Payment Description",
    "Outcome",
    "Applied",
    "Leftover",
    "Invoice No",
    "Invoice Date",
    "Company",
    "Invoice Total",
    "Invoice Remaining",
];

const RECON_WIDTHS: [f64; 12] = [
    13.0, 14.0, 15.0, 36.0, 12.0, 12.0, 12.0, 12.0, 13.0, 30.0, 13.0, 16.0,
];

fn cents(c: i64) -> f64 {
    c as f64 / 100.0
}

fn date_text(date: chrono::NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

fn outcome_label(outcome: AllocationOutcome) -> &'static str {
    match outcome {
        AllocationOutcome::MatchedToInvoice => "matched",
        AllocationOutcome::NoMatchFound => "no match",
        AllocationOutcome::PartialLeftover => "leftover",
    }
}

fn status_label(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Unpaid => "Unpaid",
        InvoiceStatus::PartiallyPaid => "Partially paid",
        InvoiceStatus::FullyPaid => "Fully paid",
    }
}

/// Write the transaction-level reconciliation ledger: one row per
/// allocation event, then one row per invoice still open, then totals.
pub fn write_reconciliation(
    path: &Path,
    invoices: &[Invoice],
    payments: &[Payment],
    run: &AllocationRun,
) -> Result<(), String> {
    build_reconciliation(path, invoices, payments, run)
        .map_err(|e| format!("failed to write reconciliation report: {e}"))
}

fn build_reconciliation(
    path: &Path,
    invoices: &[Invoice],
    payments: &[Payment],
    run: &AllocationRun,
) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Reconciliation")?;

    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));
    let money = Format::new().set_num_format("#,##0.00");
    let matched = Format::new().set_background_color(Color::RGB(MATCHED_FILL));
    let leftover = Format::new().set_background_color(Color::RGB(LEFTOVER_FILL));
    let no_match = Format::new().set_background_color(Color::RGB(NO_MATCH_FILL));
    let open = Format::new().set_background_color(Color::RGB(OPEN_FILL));
    let totals = Format::new().set_bold().set_num_format("#,##0.00");

    for (col, label) in RECON_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *label, &header)?;
    }
    for (col, width) in RECON_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    let mut row = 1u32;

    for event in &run.events {
        let payment = &payments[event.payment_idx];
        sheet.write_string(row, 0, date_text(payment.date))?;
        sheet.write_string(row, 1, &payment.tax_id)?;
        sheet.write_number_with_format(row, 2, cents(payment.amount_cents), &money)?;
        sheet.write_string(row, 3, &payment.description)?;

        let fill = match event.outcome {
            AllocationOutcome::MatchedToInvoice => &matched,
            AllocationOutcome::NoMatchFound => &no_match,
            AllocationOutcome::PartialLeftover => &leftover,
        };
        sheet.write_string_with_format(row, 4, outcome_label(event.outcome), fill)?;
        sheet.write_number_with_format(row, 5, cents(event.applied_cents), &money)?;
        if event.leftover_cents > 0 {
            sheet.write_number_with_format(row, 6, cents(event.leftover_cents), &money)?;
        }

        if let Some(idx) = event.invoice_idx {
            let invoice = &invoices[idx];
            sheet.write_string(row, 7, &invoice.number)?;
            sheet.write_string(row, 8, date_text(invoice.date))?;
            sheet.write_string(row, 9, &invoice.company)?;
            sheet.write_number_with_format(row, 10, cents(invoice.total_cents), &money)?;
            if let Some(remaining) = event.remaining_after_cents {
                sheet.write_number_with_format(row, 11, cents(remaining), &money)?;
            }
        }

        row += 1;
    }

    // Invoices the bank never (fully) settled, bank side left empty.
    for (idx, state) in run.states.iter().enumerate() {
        if state.remaining_cents <= 0 {
            continue;
        }
        let invoice = &invoices[idx];
        sheet.write_string_with_format(row, 4, status_label(state.status), &open)?;
        sheet.write_string(row, 7, &invoice.number)?;
        sheet.write_string(row, 8, date_text(invoice.date))?;
        sheet.write_string(row, 9, &invoice.company)?;
        sheet.write_number_with_format(row, 10, cents(invoice.total_cents), &money)?;
        sheet.write_number_with_format(row, 11, cents(state.remaining_cents), &money)?;
        row += 1;
    }

    row += 1;
    let s = &run.summary;
    sheet.write_string_with_format(row, 4, "Totals", &header)?;
    sheet.write_number_with_format(row, 5, cents(s.applied_cents), &totals)?;
    sheet.write_number_with_format(row, 6, cents(s.leftover_cents), &totals)?;
    sheet.write_number_with_format(row, 11, cents(s.open_cents), &totals)?;

    workbook.save(path)?;
    Ok(())
}

/// Write the per-company statement workbook: stacked sections of
/// chronological entries with a running balance and a totals row.
pub fn write_company_statements(
    path: &Path,
    statements: &[CompanyStatement],
) -> Result<(), String> {
    build_company_statements(path, statements)
        .map_err(|e| format!("failed to write company statements: {e}"))
}

fn build_company_statements(
    path: &Path,
    statements: &[CompanyStatement],
) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Statements")?;

    let company_header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));
    let column_header = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");
    let totals = Format::new().set_bold().set_num_format("#,##0.00");

    for (col, width) in [(0u16, 13.0), (1, 42.0), (2, 14.0), (3, 14.0)] {
        sheet.set_column_width(col, width)?;
    }

    let mut row = 0u32;

    for statement in statements {
        let title = if statement.tax_ids.iter().any(|t| !t.is_empty()) {
            format!("{} (VOEN: {})", statement.name, statement.tax_ids.join(", "))
        } else {
            statement.name.clone()
        };
        for col in 0..4u16 {
            sheet.write_string_with_format(row, col, "", &company_header)?;
        }
        sheet.write_string_with_format(row, 0, &title, &company_header)?;
        row += 1;

        for (col, label) in ["Date", "Description", "Amount", "Balance"].iter().enumerate() {
            sheet.write_string_with_format(row, col as u16, *label, &column_header)?;
        }
        row += 1;

        for entry in &statement.entries {
            sheet.write_string(row, 0, date_text(entry.date))?;
            sheet.write_string(row, 1, &entry.description)?;
            sheet.write_number_with_format(row, 2, cents(entry.signed_cents), &money)?;
            sheet.write_number_with_format(row, 3, cents(entry.running_cents), &money)?;
            row += 1;
        }

        sheet.write_string_with_format(row, 1, "Total", &column_header)?;
        sheet.write_number_with_format(row, 3, cents(statement.balance_cents), &totals)?;
        row += 2;
    }

    workbook.save(path)?;
    Ok(())
}
