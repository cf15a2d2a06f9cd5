// Conservation properties of the allocation pass over generated inputs.

use chrono::NaiveDate;
use proptest::prelude::*;
use saldo_recon::{allocate, AllocationOutcome, Invoice, Payment};

const TAX_IDS: [&str; 4] = ["1111111111", "2222222222", "3333333333", ""];

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(chrono::Days::new(offset as u64))
        .unwrap()
}

fn invoices_strategy() -> impl Strategy<Value = Vec<Invoice>> {
    prop::collection::vec((0..TAX_IDS.len(), 0u32..90, 1i64..200_000), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(n, (tax, offset, total))| Invoice {
                number: format!("{}", 100 + n),
                tax_id: TAX_IDS[tax].to_string(),
                company: format!("Company {tax}"),
                date: day(offset),
                total_cents: total,
            })
            .collect()
    })
}

fn payments_strategy() -> impl Strategy<Value = Vec<Payment>> {
    prop::collection::vec((0..TAX_IDS.len(), 0u32..90, 1i64..300_000), 0..12).prop_map(|rows| {
        rows.into_iter()
            .map(|(tax, offset, amount)| Payment {
                tax_id: TAX_IDS[tax].to_string(),
                date: day(offset),
                amount_cents: amount,
                description: "generated".into(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn invoice_conservation_and_bounds(
        invoices in invoices_strategy(),
        payments in payments_strategy(),
    ) {
        let run = allocate(&invoices, &payments);

        for (i, inv) in invoices.iter().enumerate() {
            let applied: i64 = run
                .events
                .iter()
                .filter(|e| e.invoice_idx == Some(i))
                .map(|e| e.applied_cents)
                .sum();
            prop_assert_eq!(inv.total_cents - run.states[i].remaining_cents, applied);
            prop_assert!(run.states[i].remaining_cents >= 0);
            prop_assert!(run.states[i].remaining_cents <= inv.total_cents);
        }
    }

    #[test]
    fn payment_conservation(
        invoices in invoices_strategy(),
        payments in payments_strategy(),
    ) {
        let run = allocate(&invoices, &payments);

        for (p, pay) in payments.iter().enumerate() {
            let applied: i64 = run
                .events
                .iter()
                .filter(|e| {
                    e.payment_idx == p && e.outcome == AllocationOutcome::MatchedToInvoice
                })
                .map(|e| e.applied_cents)
                .sum();
            let leftover: i64 = run
                .events
                .iter()
                .filter(|e| {
                    e.payment_idx == p && e.outcome != AllocationOutcome::MatchedToInvoice
                })
                .map(|e| e.leftover_cents)
                .sum();
            prop_assert_eq!(pay.amount_cents, applied + leftover);
        }
    }

    #[test]
    fn rerun_is_deterministic(
        invoices in invoices_strategy(),
        payments in payments_strategy(),
    ) {
        let first = allocate(&invoices, &payments);
        let second = allocate(&invoices, &payments);
        prop_assert_eq!(first.events, second.events);
        prop_assert_eq!(first.states, second.states);
    }
}
