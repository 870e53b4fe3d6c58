// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Terminal rendering of the store's collections.

use chrono::NaiveDate;
use comfy_table::Table;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    Account, Category, ClientSupplier, FlowType, InstallmentKind, PartyType, PayableAccount,
    ReceivableAccount, Transaction,
};
use crate::status::DueStatus;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, pretty_table};

pub const SUPPLIER_NOT_FOUND: &str = "Supplier not found";
pub const CLIENT_NOT_FOUND: &str = "Client not found";
pub const PARTY_NOT_FOUND: &str = "Party not found";
pub const CATEGORY_NOT_FOUND: &str = "Category not found";

/// Id-to-name lookups over the store's reference tables.
pub struct Directory<'a> {
    parties: &'a [ClientSupplier],
    categories: &'a [Category],
}

impl<'a> Directory<'a> {
    pub fn new(store: &'a FinanceStore) -> Self {
        Self {
            parties: store.clients_suppliers(),
            categories: store.categories(),
        }
    }

    fn party(&self, id: &str, kind: Option<PartyType>) -> Option<&'a str> {
        self.parties
            .iter()
            .find(|p| p.id == id && kind.is_none_or(|k| p.party_type == k))
            .map(|p| p.name.as_str())
    }

    pub fn supplier_name(&self, id: &str) -> &'a str {
        self.party(id, Some(PartyType::Supplier))
            .unwrap_or(SUPPLIER_NOT_FOUND)
    }

    pub fn client_name(&self, id: &str) -> &'a str {
        self.party(id, Some(PartyType::Client))
            .unwrap_or(CLIENT_NOT_FOUND)
    }

    pub fn party_name(&self, id: &str) -> &'a str {
        self.party(id, None).unwrap_or(PARTY_NOT_FOUND)
    }

    /// Name of a category of the given type.
    pub fn category_name(&self, id: &str, kind: FlowType) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.id == id && c.category_type == kind)
            .map(|c| c.name.as_str())
            .unwrap_or(CATEGORY_NOT_FOUND)
    }
}

fn opt(s: &Option<String>) -> String {
    s.clone().unwrap_or_default()
}

pub fn accounts_table(accounts: &[Account]) -> Table {
    let rows = accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.account_type.to_string(),
                fmt_money(&a.initial_balance),
                fmt_money(&a.current_balance),
                a.created_at.format("%Y-%m-%d").to_string(),
                a.id.clone(),
            ]
        })
        .collect();
    pretty_table(
        &["Name", "Type", "Initial", "Current", "Created", "Id"],
        rows,
    )
}

pub fn categories_table(categories: &[Category]) -> Table {
    let rows = categories
        .iter()
        .map(|c| vec![c.name.clone(), c.category_type.to_string(), c.id.clone()])
        .collect();
    pretty_table(&["Category", "Type", "Id"], rows)
}

pub fn parties_table(parties: &[ClientSupplier]) -> Table {
    let rows = parties
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.party_type.to_string(),
                opt(&p.observations),
                p.id.clone(),
            ]
        })
        .collect();
    pretty_table(&["Name", "Type", "Observations", "Id"], rows)
}

fn schedule_label(kind: InstallmentKind, parent: &Option<String>) -> String {
    match parent {
        Some(_) => format!("{kind} (follow-up)"),
        None => kind.to_string(),
    }
}

pub fn payables_table(store: &FinanceStore, payables: &[PayableAccount], today: NaiveDate) -> Table {
    let dir = Directory::new(store);
    let rows = payables
        .iter()
        .map(|p| {
            vec![
                dir.supplier_name(&p.supplier_id).to_string(),
                dir.category_name(&p.category_id, FlowType::Expense).to_string(),
                fmt_money(&p.value),
                p.due_date.to_string(),
                p.status(today).to_string(),
                schedule_label(p.installment_type, &p.parent_id),
                p.id.clone(),
            ]
        })
        .collect();
    pretty_table(
        &["Supplier", "Category", "Value", "Due", "Status", "Kind", "Id"],
        rows,
    )
}

pub fn receivables_table(
    store: &FinanceStore,
    receivables: &[ReceivableAccount],
    today: NaiveDate,
) -> Table {
    let dir = Directory::new(store);
    let rows = receivables
        .iter()
        .map(|r| {
            vec![
                dir.client_name(&r.client_id).to_string(),
                dir.category_name(&r.category_id, FlowType::Income).to_string(),
                fmt_money(&r.value),
                r.due_date.to_string(),
                r.status(today).to_string(),
                schedule_label(r.installment_type, &r.parent_id),
                r.id.clone(),
            ]
        })
        .collect();
    pretty_table(
        &["Client", "Category", "Value", "Due", "Status", "Kind", "Id"],
        rows,
    )
}

pub fn transactions_table(store: &FinanceStore, transactions: &[Transaction]) -> Table {
    let dir = Directory::new(store);
    let rows = transactions
        .iter()
        .map(|t| {
            vec![
                t.payment_date.to_string(),
                t.transaction_type.to_string(),
                dir.party_name(&t.client_supplier_id).to_string(),
                dir.category_name(&t.category_id, t.transaction_type)
                    .to_string(),
                fmt_money(&t.value),
                t.source.to_string(),
                opt(&t.observations),
                t.id.clone(),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Date",
            "Type",
            "Party",
            "Category",
            "Value",
            "Source",
            "Observations",
            "Id",
        ],
        rows,
    )
}

/// Open and settled totals across payables, receivables and transactions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub payable_open: Decimal,
    pub payable_overdue: Decimal,
    pub payable_due_soon: Decimal,
    pub receivable_open: Decimal,
    pub receivable_overdue: Decimal,
    pub receivable_due_soon: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
}

impl Summary {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

pub fn summarize(store: &FinanceStore, today: NaiveDate) -> Summary {
    let mut s = Summary::default();
    for p in store.payables() {
        let status = p.status(today);
        if status.is_open() {
            s.payable_open += p.value;
        }
        match status {
            DueStatus::Overdue => s.payable_overdue += p.value,
            DueStatus::DueSoon => s.payable_due_soon += p.value,
            _ => {}
        }
    }
    for r in store.receivables() {
        let status = r.status(today);
        if status.is_open() {
            s.receivable_open += r.value;
        }
        match status {
            DueStatus::Overdue => s.receivable_overdue += r.value,
            DueStatus::DueSoon => s.receivable_due_soon += r.value,
            _ => {}
        }
    }
    for t in store.transactions() {
        match t.transaction_type {
            FlowType::Income => s.income += t.value,
            FlowType::Expense => s.expense += t.value,
        }
    }
    s
}

pub fn summary_table(s: &Summary) -> Table {
    let rows = vec![
        vec![
            "Payables".to_string(),
            fmt_money(&s.payable_open),
            fmt_money(&s.payable_overdue),
            fmt_money(&s.payable_due_soon),
        ],
        vec![
            "Receivables".to_string(),
            fmt_money(&s.receivable_open),
            fmt_money(&s.receivable_overdue),
            fmt_money(&s.receivable_due_soon),
        ],
    ];
    let mut t = pretty_table(&["", "Open", "Overdue", "Due soon"], rows);
    t.add_row(vec![
        "Cash flow".to_string(),
        format!("in {}", fmt_money(&s.income)),
        format!("out {}", fmt_money(&s.expense)),
        format!("net {}", fmt_money(&s.net())),
    ]);
    t
}
