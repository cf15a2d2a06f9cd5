use crate::model::{
    AllocationEvent, AllocationOutcome, AllocationSummary, Invoice, InvoiceState, Payment,
};

/// Fold the event sequence and final invoice states into summary totals.
pub fn compute_summary(
    invoices: &[Invoice],
    payments: &[Payment],
    events: &[AllocationEvent],
    states: &[InvoiceState],
) -> AllocationSummary {
    let mut matched_events = 0;
    let mut unmatched_payments = 0;
    let mut leftover_payments = 0;
    let mut applied_cents = 0i64;
    let mut leftover_cents = 0i64;

    for e in events {
        match e.outcome {
            AllocationOutcome::MatchedToInvoice => {
                matched_events += 1;
                applied_cents += e.applied_cents;
            }
            AllocationOutcome::NoMatchFound => {
                unmatched_payments += 1;
                leftover_cents += e.leftover_cents;
            }
            AllocationOutcome::PartialLeftover => {
                leftover_payments += 1;
                leftover_cents += e.leftover_cents;
            }
        }
    }

    let open_invoices = states.iter().filter(|s| s.remaining_cents > 0).count();
    let open_cents = states.iter().map(|s| s.remaining_cents).sum();

    AllocationSummary {
        invoices: invoices.len(),
        payments: payments.len(),
        matched_events,
        unmatched_payments,
        leftover_payments,
        applied_cents,
        leftover_cents,
        open_invoices,
        open_cents,
    }
}
