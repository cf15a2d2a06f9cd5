use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A normalized invoice row. `tax_id` is the 10-digit identifier in its
/// canonical form, or an empty string when the source had none.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub number: String,
    pub tax_id: String,
    pub company: String,
    pub date: NaiveDate,
    pub total_cents: i64,
}

/// A normalized incoming credit from the bank statement.
/// `amount_cents > 0`; outgoing debits never reach the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub tax_id: String,
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Working state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    PartiallyPaid,
    FullyPaid,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpaid => write!(f, "unpaid"),
            Self::PartiallyPaid => write!(f, "partially_paid"),
            Self::FullyPaid => write!(f, "fully_paid"),
        }
    }
}

/// Mutable balance record for one invoice, indexed parallel to the input
/// slice. The engine owns these; the input `Invoice` values stay untouched.
/// Invariant: `0 <= remaining_cents <= total_cents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceState {
    pub remaining_cents: i64,
    pub status: InvoiceStatus,
}

// ---------------------------------------------------------------------------
// Allocation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationOutcome {
    MatchedToInvoice,
    NoMatchFound,
    PartialLeftover,
}

impl std::fmt::Display for AllocationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatchedToInvoice => write!(f, "matched_to_invoice"),
            Self::NoMatchFound => write!(f, "no_match_found"),
            Self::PartialLeftover => write!(f, "partial_leftover"),
        }
    }
}

/// One allocation step. Indices refer into the engine's input slices.
///
/// `leftover_cents` is the full payment amount for `NoMatchFound`, the
/// unapplied remainder for `PartialLeftover`, and zero for matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationEvent {
    pub payment_idx: usize,
    pub invoice_idx: Option<usize>,
    pub applied_cents: i64,
    pub remaining_after_cents: Option<i64>,
    pub leftover_cents: i64,
    pub outcome: AllocationOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationSummary {
    pub invoices: usize,
    pub payments: usize,
    pub matched_events: usize,
    pub unmatched_payments: usize,
    pub leftover_payments: usize,
    pub applied_cents: i64,
    pub leftover_cents: i64,
    pub open_invoices: usize,
    pub open_cents: i64,
}

/// Result of one allocation pass: the event sequence, the final invoice
/// states (same order as the input invoices), and summary totals.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRun {
    pub events: Vec<AllocationEvent>,
    pub states: Vec<InvoiceState>,
    pub summary: AllocationSummary,
}

// ---------------------------------------------------------------------------
// Company ledgers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Invoice,
    Payment,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoice => write!(f, "invoice"),
            Self::Payment => write!(f, "payment"),
        }
    }
}

/// One chronological ledger row. `signed_cents` is positive for invoice
/// accrual and negative for payments; `running_cents` is the prefix sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub signed_cents: i64,
    pub running_cents: i64,
    pub description: String,
}

/// All ledger rows for one company, sorted by date, plus the tax ids seen
/// on that company's invoices. A positive balance means the company owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyStatement {
    pub name: String,
    pub tax_ids: Vec<String>,
    pub entries: Vec<LedgerEntry>,
    pub balance_cents: i64,
}
