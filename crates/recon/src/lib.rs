//! `saldo-recon` — invoice/payment allocation engine and per-company ledgers.
//!
//! Pure engine crate: receives normalized records, returns allocation events
//! and company statements. No CLI or IO dependencies.

pub mod allocate;
pub mod company;
pub mod model;
pub mod summary;

pub use allocate::allocate;
pub use company::build_statements;
pub use model::{
    AllocationEvent, AllocationOutcome, AllocationRun, AllocationSummary, CompanyStatement,
    EntryKind, Invoice, InvoiceState, InvoiceStatus, LedgerEntry, Payment,
};
pub use summary::compute_summary;
