use crate::model::{
    AllocationEvent, AllocationOutcome, AllocationRun, Invoice, InvoiceState, InvoiceStatus,
    Payment,
};
use crate::summary::compute_summary;

/// Run the allocation pass: every payment, in input order, pays down the
/// oldest outstanding invoices sharing its tax id.
///
/// Candidate invoices are matched by exact string equality on the
/// normalized tax id, so an empty id can match an empty id. A payment that
/// outlives its candidates leaves a `PartialLeftover` row; a payment with
/// no candidates at all leaves a `NoMatchFound` row. Payments are never
/// re-ordered and leftovers never carry over to another tax id.
pub fn allocate(invoices: &[Invoice], payments: &[Payment]) -> AllocationRun {
    let mut states: Vec<InvoiceState> = invoices
        .iter()
        .map(|inv| InvoiceState {
            remaining_cents: inv.total_cents,
            status: InvoiceStatus::Unpaid,
        })
        .collect();

    let mut events: Vec<AllocationEvent> = Vec::new();

    for (payment_idx, payment) in payments.iter().enumerate() {
        let mut remaining = payment.amount_cents;

        // Candidates: same tax id, still open. Oldest invoice first; the
        // sort is stable so date ties keep input order.
        let mut candidates: Vec<usize> = (0..invoices.len())
            .filter(|&i| invoices[i].tax_id == payment.tax_id && states[i].remaining_cents > 0)
            .collect();
        candidates.sort_by_key(|&i| invoices[i].date);

        let mut applied_total = 0i64;
        let mut matched_any = false;

        for i in candidates {
            if remaining <= 0 {
                break;
            }
            let applied = remaining.min(states[i].remaining_cents);
            states[i].remaining_cents -= applied;
            remaining -= applied;
            applied_total += applied;
            matched_any = true;

            states[i].status = if states[i].remaining_cents <= 0 {
                InvoiceStatus::FullyPaid
            } else if states[i].remaining_cents < invoices[i].total_cents {
                InvoiceStatus::PartiallyPaid
            } else {
                states[i].status
            };

            events.push(AllocationEvent {
                payment_idx,
                invoice_idx: Some(i),
                applied_cents: applied,
                remaining_after_cents: Some(states[i].remaining_cents),
                leftover_cents: 0,
                outcome: AllocationOutcome::MatchedToInvoice,
            });
        }

        if !matched_any && remaining > 0 {
            events.push(AllocationEvent {
                payment_idx,
                invoice_idx: None,
                applied_cents: 0,
                remaining_after_cents: None,
                leftover_cents: remaining,
                outcome: AllocationOutcome::NoMatchFound,
            });
        } else if matched_any && remaining > 0 {
            events.push(AllocationEvent {
                payment_idx,
                invoice_idx: None,
                applied_cents: applied_total,
                remaining_after_cents: None,
                leftover_cents: remaining,
                outcome: AllocationOutcome::PartialLeftover,
            });
        }
    }

    let summary = compute_summary(invoices, payments, &events, &states);

    AllocationRun {
        events,
        states,
        summary,
    }
}
