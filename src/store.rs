// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory mirror of the six finance tables.
//!
//! Every mutation goes to the table client first; the local collection only
//! changes after the remote call succeeded. Each public operation emits one
//! notification and returns the typed error on failure.

use std::cmp::Ordering;
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};

use chrono::NaiveDate;
use tracing::{error, info};

use crate::backend::{Table, TableClient, compare_names};
use crate::error::StoreError;
use crate::models::{
    Account, Category, ClientSupplier, FlowType, NewPayable, NewReceivable, NewTransaction,
    PayableAccount, PayablePatch, ReceivableAccount, ReceivablePatch, Record, Transaction,
    TransactionSource,
};
use crate::notify::{Notification, Notifier};
use crate::schedule::follow_up_dates;
use crate::wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

/// Outcome of [`FinanceStore::fetch_all`]; tables not listed loaded fine.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub failed: Vec<(Table, StoreError)>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A record the store keeps a collection of.
pub trait Stored: Record {
    fn collection(store: &FinanceStore) -> &Vec<Self>;
    fn collection_mut(store: &mut FinanceStore) -> &mut Vec<Self>;

    /// Sort key for name-ordered tables; `None` keeps newest first.
    fn sort_name(&self) -> Option<&str> {
        None
    }
}

pub struct FinanceStore {
    client: Arc<dyn TableClient>,
    notifier: Arc<dyn Notifier>,
    accounts: Vec<Account>,
    categories: Vec<Category>,
    clients_suppliers: Vec<ClientSupplier>,
    payables: Vec<PayableAccount>,
    receivables: Vec<ReceivableAccount>,
    transactions: Vec<Transaction>,
    load: [LoadState; 6],
}

fn fetch_rows<E: Record>(client: &dyn TableClient) -> Result<Vec<E>, StoreError> {
    let rows = client.select(E::TABLE)?;
    wire::decode_rows(E::TABLE.name(), rows)
}

fn joined<T>(h: ScopedJoinHandle<'_, Result<Vec<T>, StoreError>>) -> Result<Vec<T>, StoreError> {
    h.join()
        .unwrap_or_else(|_| Err(StoreError::Unknown("fetch worker panicked".into())))
}

fn by_name<E: Stored>(a: &E, b: &E) -> Ordering {
    compare_names(a.sort_name().unwrap_or(""), b.sort_name().unwrap_or(""))
}

fn place<E: Stored>(items: &mut Vec<E>, item: E) {
    match item.sort_name() {
        Some(name) => {
            let pos = items.partition_point(|x| {
                compare_names(x.sort_name().unwrap_or(""), name) != Ordering::Greater
            });
            items.insert(pos, item);
        }
        None => items.insert(0, item),
    }
}

impl FinanceStore {
    pub fn new(client: Arc<dyn TableClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            accounts: Vec::new(),
            categories: Vec::new(),
            clients_suppliers: Vec::new(),
            payables: Vec::new(),
            receivables: Vec::new(),
            transactions: Vec::new(),
            load: [LoadState::Loading; 6],
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn clients_suppliers(&self) -> &[ClientSupplier] {
        &self.clients_suppliers
    }

    pub fn payables(&self) -> &[PayableAccount] {
        &self.payables
    }

    pub fn receivables(&self) -> &[ReceivableAccount] {
        &self.receivables
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn all<E: Stored>(&self) -> &[E] {
        E::collection(self)
    }

    pub fn get<E: Stored>(&self, id: &str) -> Option<&E> {
        E::collection(self).iter().find(|e| e.id() == id)
    }

    pub fn load_state(&self, table: Table) -> LoadState {
        self.load[table.index()]
    }

    /// True while any table has not settled yet.
    pub fn is_loading(&self) -> bool {
        self.load.iter().any(|s| *s == LoadState::Loading)
    }

    /// Loads all six tables concurrently. A failing table is reported and
    /// keeps its previous contents; the others still load.
    pub fn fetch_all(&mut self) -> FetchReport {
        self.load = [LoadState::Loading; 6];
        let client = self.client.as_ref();
        let (accounts, categories, parties, payables, receivables, transactions) =
            thread::scope(|s| {
                let accounts = s.spawn(move || fetch_rows::<Account>(client));
                let categories = s.spawn(move || fetch_rows::<Category>(client));
                let parties = s.spawn(move || fetch_rows::<ClientSupplier>(client));
                let payables = s.spawn(move || fetch_rows::<PayableAccount>(client));
                let receivables = s.spawn(move || fetch_rows::<ReceivableAccount>(client));
                let transactions = s.spawn(move || fetch_rows::<Transaction>(client));
                (
                    joined(accounts),
                    joined(categories),
                    joined(parties),
                    joined(payables),
                    joined(receivables),
                    joined(transactions),
                )
            });

        let mut report = FetchReport::default();
        self.settle(accounts, &mut report);
        self.settle(categories, &mut report);
        self.settle(parties, &mut report);
        self.settle(payables, &mut report);
        self.settle(receivables, &mut report);
        self.settle(transactions, &mut report);
        info!(failed = report.failed.len(), "fetch complete");
        report
    }

    /// Reloads a single table.
    pub fn fetch<E: Stored>(&mut self) -> Result<(), StoreError> {
        self.load[E::TABLE.index()] = LoadState::Loading;
        let res = fetch_rows::<E>(self.client.as_ref());
        let mut report = FetchReport::default();
        self.settle(res, &mut report);
        match report.failed.pop() {
            Some((_, e)) => Err(e),
            None => Ok(()),
        }
    }

    fn settle<E: Stored>(&mut self, res: Result<Vec<E>, StoreError>, report: &mut FetchReport) {
        let table = E::TABLE;
        match res {
            Ok(mut items) => {
                if items.first().and_then(|e| e.sort_name()).is_some() {
                    items.sort_by(by_name);
                }
                *E::collection_mut(self) = items;
                self.load[table.index()] = LoadState::Ready;
            }
            Err(e) => {
                error!(%table, error = %e, "fetch failed");
                self.notifier
                    .notify(Notification::error(format!("Could not load {table}: {e}")));
                self.load[table.index()] = LoadState::Failed;
                report.failed.push((table, e));
            }
        }
    }

    fn failed(&self, action: &str, noun: &str, e: StoreError) -> StoreError {
        error!(action, record = noun, kind = ?e.kind(), error = %e, "store operation failed");
        self.notifier.notify(Notification::error(format!(
            "Could not {action} {}: {e}",
            noun.to_lowercase()
        )));
        e
    }

    fn insert_record<E: Stored>(&mut self, input: &E::New) -> Result<E, StoreError> {
        let row = wire::encode(E::NOUN, input)?;
        let stored = self.client.insert(E::TABLE, row)?;
        let item: E = wire::decode_row(E::TABLE.name(), stored)?;
        place(E::collection_mut(self), item.clone());
        Ok(item)
    }

    fn patch_record<E: Stored>(&mut self, id: &str, patch: &E::Patch) -> Result<E, StoreError> {
        let body = wire::encode(E::NOUN, patch)?;
        let stored = self.client.update(E::TABLE, id, body)?;
        let item: E = wire::decode_row(E::TABLE.name(), stored)?;
        let items = E::collection_mut(self);
        match items.iter_mut().find(|e| e.id() == id) {
            Some(slot) => *slot = item.clone(),
            None => place(items, item.clone()),
        }
        if item.sort_name().is_some() {
            items.sort_by(by_name);
        }
        Ok(item)
    }

    fn remove_record<E: Stored>(&mut self, id: &str) -> Result<(), StoreError> {
        self.client.delete(E::TABLE, id)?;
        E::collection_mut(self).retain(|e| e.id() != id);
        Ok(())
    }

    pub fn create<E: Stored>(&mut self, input: &E::New) -> Result<E, StoreError> {
        match self.insert_record::<E>(input) {
            Ok(item) => {
                self.notifier
                    .notify(Notification::success(format!("{} created.", E::NOUN)));
                Ok(item)
            }
            Err(e) => Err(self.failed("create", E::NOUN, e)),
        }
    }

    /// Sends only the fields set in `patch`. The local copy is replaced by
    /// the row the backend returns.
    pub fn update<E: Stored>(&mut self, id: &str, patch: &E::Patch) -> Result<E, StoreError> {
        match self.patch_record::<E>(id, patch) {
            Ok(item) => {
                self.notifier
                    .notify(Notification::success(format!("{} updated.", E::NOUN)));
                Ok(item)
            }
            Err(e) => Err(self.failed("update", E::NOUN, e)),
        }
    }

    pub fn delete<E: Stored>(&mut self, id: &str) -> Result<(), StoreError> {
        match self.remove_record::<E>(id) {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success(format!("{} deleted.", E::NOUN)));
                Ok(())
            }
            Err(e) => Err(self.failed("delete", E::NOUN, e)),
        }
    }

    /// Creates `input` and, for installment or recurring kinds, its
    /// follow-ups linked to it through `parent_id`.
    ///
    /// Entries are inserted one at a time. If a follow-up fails, the ones
    /// already saved stay in the backend and in the collection, and the
    /// error notification says how many there are.
    pub fn create_payable_series(
        &mut self,
        input: &NewPayable,
    ) -> Result<Vec<PayableAccount>, StoreError> {
        let mut created = Vec::new();
        match self.insert_payable_series(input, &mut created) {
            Ok(()) => {
                self.notifier.notify(Notification::success(series_message(
                    PayableAccount::NOUN,
                    created.len(),
                )));
                Ok(created)
            }
            Err(e) => Err(self.series_failed(PayableAccount::NOUN, created.len(), e)),
        }
    }

    fn insert_payable_series(
        &mut self,
        input: &NewPayable,
        created: &mut Vec<PayableAccount>,
    ) -> Result<(), StoreError> {
        let origin = self.insert_record::<PayableAccount>(input)?;
        let origin_id = origin.id.clone();
        created.push(origin);
        let dates = follow_up_dates(
            input.due_date,
            input.installment_type,
            input.installments,
            input.recurrence_type,
            input.recurrence_count,
        );
        for due in dates {
            let child = NewPayable {
                due_date: due,
                is_paid: false,
                paid_date: None,
                parent_id: Some(origin_id.clone()),
                ..input.clone()
            };
            created.push(self.insert_record::<PayableAccount>(&child)?);
        }
        Ok(())
    }

    pub fn create_receivable_series(
        &mut self,
        input: &NewReceivable,
    ) -> Result<Vec<ReceivableAccount>, StoreError> {
        let mut created = Vec::new();
        match self.insert_receivable_series(input, &mut created) {
            Ok(()) => {
                self.notifier.notify(Notification::success(series_message(
                    ReceivableAccount::NOUN,
                    created.len(),
                )));
                Ok(created)
            }
            Err(e) => Err(self.series_failed(ReceivableAccount::NOUN, created.len(), e)),
        }
    }

    fn insert_receivable_series(
        &mut self,
        input: &NewReceivable,
        created: &mut Vec<ReceivableAccount>,
    ) -> Result<(), StoreError> {
        let origin = self.insert_record::<ReceivableAccount>(input)?;
        let origin_id = origin.id.clone();
        created.push(origin);
        let dates = follow_up_dates(
            input.due_date,
            input.installment_type,
            input.installments,
            input.recurrence_type,
            input.recurrence_count,
        );
        for due in dates {
            let child = NewReceivable {
                due_date: due,
                is_received: false,
                received_date: None,
                parent_id: Some(origin_id.clone()),
                ..input.clone()
            };
            created.push(self.insert_record::<ReceivableAccount>(&child)?);
        }
        Ok(())
    }

    fn series_failed(&self, noun: &str, saved: usize, e: StoreError) -> StoreError {
        if saved == 0 {
            return self.failed("create", noun, e);
        }
        error!(record = noun, saved, kind = ?e.kind(), error = %e, "series stopped partway");
        self.notifier.notify(Notification::error(format!(
            "Could not create {}: {e} ({saved} entries saved)",
            noun.to_lowercase()
        )));
        e
    }

    /// Marks a payable as paid on `date` and records the matching expense.
    /// An entry that is already paid is rejected with a validation error.
    pub fn settle_payable(
        &mut self,
        id: &str,
        date: NaiveDate,
    ) -> Result<(PayableAccount, Transaction), StoreError> {
        match self.mark_payable_paid(id, date) {
            Ok(done) => {
                self.notifier
                    .notify(Notification::success("Payable marked as paid."));
                Ok(done)
            }
            Err(e) => Err(self.failed("settle", PayableAccount::NOUN, e)),
        }
    }

    fn mark_payable_paid(
        &mut self,
        id: &str,
        date: NaiveDate,
    ) -> Result<(PayableAccount, Transaction), StoreError> {
        self.refresh_transactions()?;
        let paid = self.get::<PayableAccount>(id).is_some_and(|p| p.is_paid);
        if paid || self.has_settlement(TransactionSource::Payable, id) {
            return Err(StoreError::Validation(format!("payable {id} is already paid")));
        }
        let patch = PayablePatch {
            is_paid: Some(true),
            paid_date: Some(Some(date)),
            ..Default::default()
        };
        let payable = self.patch_record::<PayableAccount>(id, &patch)?;
        let tx = self.insert_record::<Transaction>(&NewTransaction {
            transaction_type: FlowType::Expense,
            client_supplier_id: payable.supplier_id.clone(),
            category_id: payable.category_id.clone(),
            value: payable.value,
            payment_date: date,
            observations: payable.observations.clone(),
            source: TransactionSource::Payable,
            source_id: Some(payable.id.clone()),
        })?;
        Ok((payable, tx))
    }

    /// Clears the paid flag and removes transactions recorded from it.
    /// Transactions are reloaded first; if that fails nothing is changed.
    pub fn reopen_payable(&mut self, id: &str) -> Result<PayableAccount, StoreError> {
        match self.mark_payable_open(id) {
            Ok(p) => {
                self.notifier
                    .notify(Notification::success("Payable marked as unpaid."));
                Ok(p)
            }
            Err(e) => Err(self.failed("reopen", PayableAccount::NOUN, e)),
        }
    }

    fn mark_payable_open(&mut self, id: &str) -> Result<PayableAccount, StoreError> {
        self.refresh_transactions()?;
        let patch = PayablePatch {
            is_paid: Some(false),
            paid_date: Some(None),
            ..Default::default()
        };
        let payable = self.patch_record::<PayableAccount>(id, &patch)?;
        self.drop_settlements(TransactionSource::Payable, id)?;
        Ok(payable)
    }

    /// Marks a receivable as received on `date` and records the income.
    pub fn settle_receivable(
        &mut self,
        id: &str,
        date: NaiveDate,
    ) -> Result<(ReceivableAccount, Transaction), StoreError> {
        match self.mark_receivable_received(id, date) {
            Ok(done) => {
                self.notifier
                    .notify(Notification::success("Receivable marked as received."));
                Ok(done)
            }
            Err(e) => Err(self.failed("settle", ReceivableAccount::NOUN, e)),
        }
    }

    fn mark_receivable_received(
        &mut self,
        id: &str,
        date: NaiveDate,
    ) -> Result<(ReceivableAccount, Transaction), StoreError> {
        self.refresh_transactions()?;
        let received = self
            .get::<ReceivableAccount>(id)
            .is_some_and(|r| r.is_received);
        if received || self.has_settlement(TransactionSource::Receivable, id) {
            return Err(StoreError::Validation(format!(
                "receivable {id} is already received"
            )));
        }
        let patch = ReceivablePatch {
            is_received: Some(true),
            received_date: Some(Some(date)),
            ..Default::default()
        };
        let receivable = self.patch_record::<ReceivableAccount>(id, &patch)?;
        let tx = self.insert_record::<Transaction>(&NewTransaction {
            transaction_type: FlowType::Income,
            client_supplier_id: receivable.client_id.clone(),
            category_id: receivable.category_id.clone(),
            value: receivable.value,
            payment_date: date,
            observations: receivable.observations.clone(),
            source: TransactionSource::Receivable,
            source_id: Some(receivable.id.clone()),
        })?;
        Ok((receivable, tx))
    }

    pub fn reopen_receivable(&mut self, id: &str) -> Result<ReceivableAccount, StoreError> {
        match self.mark_receivable_open(id) {
            Ok(r) => {
                self.notifier
                    .notify(Notification::success("Receivable marked as not received."));
                Ok(r)
            }
            Err(e) => Err(self.failed("reopen", ReceivableAccount::NOUN, e)),
        }
    }

    fn mark_receivable_open(&mut self, id: &str) -> Result<ReceivableAccount, StoreError> {
        self.refresh_transactions()?;
        let patch = ReceivablePatch {
            is_received: Some(false),
            received_date: Some(None),
            ..Default::default()
        };
        let receivable = self.patch_record::<ReceivableAccount>(id, &patch)?;
        self.drop_settlements(TransactionSource::Receivable, id)?;
        Ok(receivable)
    }

    /// Reloads transactions from the backend without notifying.
    fn refresh_transactions(&mut self) -> Result<(), StoreError> {
        self.transactions = fetch_rows::<Transaction>(self.client.as_ref())?;
        self.load[Table::Transactions.index()] = LoadState::Ready;
        Ok(())
    }

    fn has_settlement(&self, source: TransactionSource, id: &str) -> bool {
        self.transactions
            .iter()
            .any(|t| t.source == source && t.source_id.as_deref() == Some(id))
    }

    fn drop_settlements(&mut self, source: TransactionSource, id: &str) -> Result<(), StoreError> {
        let linked: Vec<String> = self
            .transactions
            .iter()
            .filter(|t| t.source == source && t.source_id.as_deref() == Some(id))
            .map(|t| t.id.clone())
            .collect();
        for tx_id in linked {
            self.remove_record::<Transaction>(&tx_id)?;
        }
        Ok(())
    }
}

fn series_message(noun: &str, count: usize) -> String {
    if count > 1 {
        format!("{noun} created ({count} entries).")
    } else {
        format!("{noun} created.")
    }
}

impl Stored for Account {
    fn collection(store: &FinanceStore) -> &Vec<Self> {
        &store.accounts
    }

    fn collection_mut(store: &mut FinanceStore) -> &mut Vec<Self> {
        &mut store.accounts
    }
}

impl Stored for Category {
    fn collection(store: &FinanceStore) -> &Vec<Self> {
        &store.categories
    }

    fn collection_mut(store: &mut FinanceStore) -> &mut Vec<Self> {
        &mut store.categories
    }

    fn sort_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Stored for ClientSupplier {
    fn collection(store: &FinanceStore) -> &Vec<Self> {
        &store.clients_suppliers
    }

    fn collection_mut(store: &mut FinanceStore) -> &mut Vec<Self> {
        &mut store.clients_suppliers
    }

    fn sort_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Stored for PayableAccount {
    fn collection(store: &FinanceStore) -> &Vec<Self> {
        &store.payables
    }

    fn collection_mut(store: &mut FinanceStore) -> &mut Vec<Self> {
        &mut store.payables
    }
}

impl Stored for ReceivableAccount {
    fn collection(store: &FinanceStore) -> &Vec<Self> {
        &store.receivables
    }

    fn collection_mut(store: &mut FinanceStore) -> &mut Vec<Self> {
        &mut store.receivables
    }
}

impl Stored for Transaction {
    fn collection(store: &FinanceStore) -> &Vec<Self> {
        &store.transactions
    }

    fn collection_mut(store: &mut FinanceStore) -> &mut Vec<Self> {
        &mut store.transactions
    }
}
