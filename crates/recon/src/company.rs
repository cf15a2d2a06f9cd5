use std::collections::HashMap;

use crate::model::{CompanyStatement, EntryKind, Invoice, LedgerEntry, Payment};

/// Group invoices and payments into per-company chronological ledgers.
///
/// Companies are keyed by display name, in first-encounter order over the
/// invoice sequence; invoices are the sole source of the name/tax-id
/// mapping. A payment lands on the first registered company whose tax-id
/// set contains it (so a tax id erroneously shared by two names always
/// resolves to the earlier one). Payments matching no company are dropped
/// here; the allocation report still shows them as unmatched.
pub fn build_statements(invoices: &[Invoice], payments: &[Payment]) -> Vec<CompanyStatement> {
    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tax_ids: Vec<Vec<String>> = Vec::new();
    let mut entries: Vec<Vec<LedgerEntry>> = Vec::new();

    for inv in invoices {
        let idx = match index.get(&inv.company) {
            Some(&i) => i,
            None => {
                let i = names.len();
                index.insert(inv.company.clone(), i);
                names.push(inv.company.clone());
                tax_ids.push(Vec::new());
                entries.push(Vec::new());
                i
            }
        };
        if !tax_ids[idx].contains(&inv.tax_id) {
            tax_ids[idx].push(inv.tax_id.clone());
        }
        entries[idx].push(LedgerEntry {
            date: inv.date,
            kind: EntryKind::Invoice,
            signed_cents: inv.total_cents,
            running_cents: 0,
            description: format!("Invoice {}", inv.number),
        });
    }

    for p in payments {
        let company = (0..names.len()).find(|&i| tax_ids[i].iter().any(|t| *t == p.tax_id));
        if let Some(idx) = company {
            entries[idx].push(LedgerEntry {
                date: p.date,
                kind: EntryKind::Payment,
                signed_cents: -p.amount_cents,
                running_cents: 0,
                description: p.description.clone(),
            });
        }
    }

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let mut rows = std::mem::take(&mut entries[i]);
            // Stable: same-date rows keep encounter order (invoices first).
            rows.sort_by_key(|e| e.date);
            let mut running = 0i64;
            for e in &mut rows {
                running += e.signed_cents;
                e.running_cents = running;
            }
            CompanyStatement {
                name,
                tax_ids: std::mem::take(&mut tax_ids[i]),
                entries: rows,
                balance_cents: running,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn invoice(number: &str, tax_id: &str, company: &str, date: &str, total: i64) -> Invoice {
        Invoice {
            number: number.into(),
            tax_id: tax_id.into(),
            company: company.into(),
            date: d(date),
            total_cents: total,
        }
    }

    fn payment(tax_id: &str, date: &str, amount: i64, memo: &str) -> Payment {
        Payment {
            tax_id: tax_id.into(),
            date: d(date),
            amount_cents: amount,
            description: memo.into(),
        }
    }

    #[test]
    fn running_balance_is_prefix_sum_in_date_order() {
        let invoices = vec![
            invoice("1", "1111111111", "Alfa MMC", "2024-01-05", 100_000),
            invoice("2", "1111111111", "Alfa MMC", "2024-03-01", 50_000),
        ];
        let payments = vec![payment("1111111111", "2024-02-01", 60_000, "wire")];

        let statements = build_statements(&invoices, &payments);
        assert_eq!(statements.len(), 1);
        let s = &statements[0];
        assert_eq!(s.tax_ids, vec!["1111111111".to_string()]);

        let running: Vec<i64> = s.entries.iter().map(|e| e.running_cents).collect();
        assert_eq!(running, vec![100_000, 40_000, 90_000]);
        assert_eq!(s.balance_cents, 90_000);
    }

    #[test]
    fn payment_amounts_are_negative_entries() {
        let invoices = vec![invoice("1", "1111111111", "Alfa MMC", "2024-01-05", 10_000)];
        let payments = vec![payment("1111111111", "2024-01-10", 10_000, "wire")];

        let statements = build_statements(&invoices, &payments);
        let s = &statements[0];
        assert_eq!(s.entries[1].kind, EntryKind::Payment);
        assert_eq!(s.entries[1].signed_cents, -10_000);
        assert_eq!(s.balance_cents, 0);
    }

    #[test]
    fn invoice_entries_use_original_totals_not_allocation_state() {
        // The statement shows what was invoiced, independent of how much of
        // it was later paid down.
        let invoices = vec![invoice("7", "2222222222", "Bravo MMC", "2024-01-05", 80_000)];
        let statements = build_statements(&invoices, &[]);
        assert_eq!(statements[0].entries[0].signed_cents, 80_000);
        assert_eq!(statements[0].entries[0].description, "Invoice 7");
    }

    #[test]
    fn shared_tax_id_resolves_to_first_registered_company() {
        let invoices = vec![
            invoice("1", "3333333333", "First MMC", "2024-01-01", 10_000),
            invoice("2", "3333333333", "Second MMC", "2024-01-02", 20_000),
        ];
        let payments = vec![payment("3333333333", "2024-02-01", 5_000, "wire")];

        let statements = build_statements(&invoices, &payments);
        assert_eq!(statements[0].name, "First MMC");
        assert_eq!(statements[0].entries.len(), 2);
        assert_eq!(statements[1].name, "Second MMC");
        assert_eq!(statements[1].entries.len(), 1);
    }

    #[test]
    fn unknown_payment_is_dropped_from_statements() {
        let invoices = vec![invoice("1", "1111111111", "Alfa MMC", "2024-01-05", 10_000)];
        let payments = vec![payment("9999999999", "2024-02-01", 5_000, "stray")];

        let statements = build_statements(&invoices, &payments);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].entries.len(), 1);
    }

    #[test]
    fn company_without_payments_accrues_monotonically() {
        let invoices = vec![
            invoice("1", "4444444444", "Delta MMC", "2024-01-01", 10_000),
            invoice("2", "4444444444", "Delta MMC", "2024-02-01", 15_000),
        ];
        let statements = build_statements(&invoices, &[]);
        let running: Vec<i64> = statements[0].entries.iter().map(|e| e.running_cents).collect();
        assert_eq!(running, vec![10_000, 25_000]);
        assert_eq!(statements[0].balance_cents, 25_000);
    }

    #[test]
    fn company_collects_multiple_tax_ids_in_first_seen_order() {
        let invoices = vec![
            invoice("1", "1111111111", "Alfa MMC", "2024-01-01", 10_000),
            invoice("2", "5555555555", "Alfa MMC", "2024-01-02", 10_000),
            invoice("3", "1111111111", "Alfa MMC", "2024-01-03", 10_000),
        ];
        let payments = vec![payment("5555555555", "2024-02-01", 10_000, "wire")];

        let statements = build_statements(&invoices, &payments);
        assert_eq!(
            statements[0].tax_ids,
            vec!["1111111111".to_string(), "5555555555".to_string()]
        );
        assert_eq!(statements[0].balance_cents, 20_000);
    }
}
