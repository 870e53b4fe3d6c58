// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use vibefin::backend::{Table, TableClient};
use vibefin::db::LocalStore;
use vibefin::error::{ErrorKind, StoreError};
use vibefin::local::LocalBackend;
use vibefin::models::{
    Account, AccountPatch, AccountType, Category, CategoryPatch, ClientSupplier, FlowType,
    InstallmentKind, NewAccount, NewCategory, NewClientSupplier, NewPayable, NewReceivable,
    PartyType, PayableAccount, ReceivableAccount, RecurrenceKind, TransactionSource,
};
use vibefin::notify::{RecordingNotifier, Severity};
use vibefin::status::DueStatus;
use vibefin::store::{FinanceStore, LoadState};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup_with(client: Arc<dyn TableClient>) -> (FinanceStore, RecordingNotifier) {
    let notes = RecordingNotifier::new();
    let mut store = FinanceStore::new(client, Arc::new(notes.clone()));
    store.fetch_all();
    (store, notes)
}

fn setup() -> (FinanceStore, RecordingNotifier) {
    let backend = LocalBackend::new(LocalStore::open_in_memory().unwrap());
    setup_with(Arc::new(backend))
}

fn category(store: &mut FinanceStore, name: &str, kind: FlowType) -> Category {
    store
        .create::<Category>(&NewCategory {
            name: name.into(),
            category_type: kind,
        })
        .unwrap()
}

fn party(store: &mut FinanceStore, name: &str, kind: PartyType) -> ClientSupplier {
    store
        .create::<ClientSupplier>(&NewClientSupplier {
            name: name.into(),
            party_type: kind,
            observations: None,
        })
        .unwrap()
}

fn payable_input(supplier: &str, category: &str, due: NaiveDate) -> NewPayable {
    NewPayable {
        supplier_id: supplier.into(),
        category_id: category.into(),
        value: Decimal::from(1200),
        due_date: due,
        observations: Some("Aluguel da loja".into()),
        installment_type: InstallmentKind::Single,
        installments: None,
        recurrence_type: None,
        recurrence_count: None,
        is_paid: false,
        paid_date: None,
        parent_id: None,
    }
}

/// Fails `select` for one table and delegates everything else.
struct FailingSelect {
    inner: Arc<LocalBackend>,
    table: Table,
}

impl TableClient for FailingSelect {
    fn select(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        if table == self.table {
            return Err(StoreError::Network("connection reset".into()));
        }
        self.inner.select(table)
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        self.inner.insert(table, row)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value, StoreError> {
        self.inner.update(table, id, patch)
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.inner.delete(table, id)
    }
}

/// Rejects every insert and update the way a 422 from the backend would.
struct RejectingWrites {
    inner: Arc<LocalBackend>,
}

impl TableClient for RejectingWrites {
    fn select(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        self.inner.select(table)
    }

    fn insert(&self, _table: Table, _row: Value) -> Result<Value, StoreError> {
        Err(StoreError::Validation("violates check constraint".into()))
    }

    fn update(&self, _table: Table, _id: &str, _patch: Value) -> Result<Value, StoreError> {
        Err(StoreError::Validation("violates check constraint".into()))
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.inner.delete(table, id)
    }
}

/// Accepts `allowed` payable inserts, then drops the connection.
struct FlakyPayableInserts {
    inner: LocalBackend,
    allowed: usize,
    seen: AtomicUsize,
}

impl TableClient for FlakyPayableInserts {
    fn select(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        self.inner.select(table)
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        if table == Table::PayableAccounts && self.seen.fetch_add(1, Ordering::SeqCst) >= self.allowed
        {
            return Err(StoreError::Network("connection reset".into()));
        }
        self.inner.insert(table, row)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value, StoreError> {
        self.inner.update(table, id, patch)
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.inner.delete(table, id)
    }
}

/// Recomputes `current_balance` server side on every account update.
struct RecomputingBackend {
    inner: LocalBackend,
}

impl TableClient for RecomputingBackend {
    fn select(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        self.inner.select(table)
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        self.inner.insert(table, row)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value, StoreError> {
        let mut row = self.inner.update(table, id, patch)?;
        if table == Table::Accounts {
            row["current_balance"] = json!(999);
        }
        Ok(row)
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        self.inner.delete(table, id)
    }
}

#[test]
fn new_store_is_loading_until_fetched() {
    let backend = LocalBackend::new(LocalStore::open_in_memory().unwrap());
    let mut store = FinanceStore::new(Arc::new(backend), Arc::new(RecordingNotifier::new()));
    assert!(store.is_loading());
    assert_eq!(store.load_state(Table::Accounts), LoadState::Loading);
    let report = store.fetch_all();
    assert!(report.is_complete());
    assert!(!store.is_loading());
    for table in Table::ALL {
        assert_eq!(store.load_state(table), LoadState::Ready);
    }
}

#[test]
fn created_record_is_present_once_after_refetch() {
    let (mut store, notes) = setup();
    let c = category(&mut store, "Aluguel", FlowType::Expense);
    store.fetch_all();
    let matching: Vec<_> = store.categories().iter().filter(|x| x.id == c.id).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].name, "Aluguel");
    assert_eq!(matching[0].category_type, FlowType::Expense);

    let all = notes.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].severity, Severity::Success);
    assert_eq!(all[0].description, "Category created.");
}

#[test]
fn new_category_lands_in_name_order() {
    let (mut store, _) = setup();
    category(&mut store, "Marketing", FlowType::Expense);
    category(&mut store, "Zeladoria", FlowType::Expense);
    category(&mut store, "energia", FlowType::Expense);
    category(&mut store, "Aluguel", FlowType::Expense);
    let names: Vec<&str> = store.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Aluguel", "energia", "Marketing", "Zeladoria"]);
}

#[test]
fn update_changes_only_given_fields() {
    let (mut store, notes) = setup();
    let a = store
        .create::<Account>(&NewAccount {
            name: "Caixa loja".into(),
            account_type: AccountType::Till,
            initial_balance: Decimal::from(100),
            current_balance: Decimal::from(100),
        })
        .unwrap();
    notes.clear();

    let updated = store
        .update::<Account>(
            &a.id,
            &AccountPatch {
                current_balance: Some(Decimal::from(80)),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Caixa loja");
    assert_eq!(updated.account_type, AccountType::Till);
    assert_eq!(updated.initial_balance, Decimal::from(100));
    assert_eq!(updated.current_balance, Decimal::from(80));
    assert_eq!(updated.created_at, a.created_at);

    let local = store.get::<Account>(&a.id).unwrap();
    assert_eq!(local, &updated);
    assert_eq!(notes.all().len(), 1);
    assert_eq!(notes.all()[0].description, "Account updated.");
}

#[test]
fn update_keeps_the_row_the_backend_returns() {
    let inner = LocalBackend::new(LocalStore::open_in_memory().unwrap());
    let (mut store, _) = setup_with(Arc::new(RecomputingBackend { inner }));
    let a = store
        .create::<Account>(&NewAccount {
            name: "Banco".into(),
            account_type: AccountType::Bank,
            initial_balance: Decimal::from(10),
            current_balance: Decimal::from(10),
        })
        .unwrap();
    store
        .update::<Account>(
            &a.id,
            &AccountPatch {
                current_balance: Some(Decimal::from(80)),
                ..Default::default()
            },
        )
        .unwrap();
    let local = store.get::<Account>(&a.id).unwrap();
    assert_eq!(local.current_balance, Decimal::from(999));
}

#[test]
fn delete_removes_record() {
    let (mut store, notes) = setup();
    let c = category(&mut store, "Vendas", FlowType::Income);
    store.delete::<Category>(&c.id).unwrap();
    assert!(store.categories().iter().all(|x| x.id != c.id));
    store.fetch_all();
    assert!(store.categories().is_empty());
    assert_eq!(notes.all().last().unwrap().description, "Category deleted.");
}

#[test]
fn delete_unknown_id_keeps_collection_and_notifies_once() {
    let (mut store, notes) = setup();
    category(&mut store, "Vendas", FlowType::Income);
    let before = store.categories().to_vec();
    notes.clear();

    let err = store.delete::<Category>("does-not-exist").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.categories(), before.as_slice());
    let all = notes.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].severity, Severity::Error);
    assert_eq!(all[0].title, "Error");
}

#[test]
fn failing_table_does_not_block_the_others() {
    let inner = Arc::new(LocalBackend::new(LocalStore::open_in_memory().unwrap()));
    let client = Arc::new(FailingSelect {
        inner,
        table: Table::Transactions,
    });
    let (mut store, notes) = setup_with(client);
    category(&mut store, "Aluguel", FlowType::Expense);
    party(&mut store, "Acme", PartyType::Supplier);
    notes.clear();

    let report = store.fetch_all();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, Table::Transactions);
    assert_eq!(report.failed[0].1.kind(), ErrorKind::Network);
    assert!(!store.is_loading());
    assert_eq!(store.load_state(Table::Transactions), LoadState::Failed);
    assert_eq!(store.load_state(Table::Categories), LoadState::Ready);
    assert_eq!(store.categories().len(), 1);
    assert_eq!(store.clients_suppliers().len(), 1);
    assert_eq!(notes.errors().len(), 1);
}

#[test]
fn installments_create_linked_follow_ups() {
    let (mut store, notes) = setup();
    let s = party(&mut store, "Imobiliaria Central", PartyType::Supplier);
    let c = category(&mut store, "Aluguel", FlowType::Expense);
    notes.clear();

    let mut input = payable_input(&s.id, &c.id, date(2026, 1, 31));
    input.installment_type = InstallmentKind::Installments;
    input.installments = Some(3);
    let created = store.create_payable_series(&input).unwrap();

    assert_eq!(created.len(), 3);
    let origin = &created[0];
    assert_eq!(origin.parent_id, None);
    assert_eq!(created[1].parent_id.as_deref(), Some(origin.id.as_str()));
    assert_eq!(created[2].parent_id.as_deref(), Some(origin.id.as_str()));
    assert_eq!(created[1].due_date, date(2026, 2, 28));
    assert_eq!(created[2].due_date, date(2026, 3, 31));
    assert_eq!(store.payables().len(), 3);

    let all = notes.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "Payable created (3 entries).");
}

#[test]
fn recurring_receivable_follows_its_recurrence() {
    let (mut store, _) = setup();
    let cl = party(&mut store, "Cliente A", PartyType::Client);
    let c = category(&mut store, "Mensalidade", FlowType::Income);
    let created = store
        .create_receivable_series(&NewReceivable {
            client_id: cl.id.clone(),
            category_id: c.id.clone(),
            value: Decimal::from(300),
            due_date: date(2026, 10, 17),
            observations: None,
            installment_type: InstallmentKind::Recurring,
            installments: None,
            recurrence_type: Some(RecurrenceKind::Weekly),
            recurrence_count: Some(3),
            is_received: false,
            received_date: None,
            parent_id: None,
        })
        .unwrap();
    let dues: Vec<NaiveDate> = created.iter().map(|r| r.due_date).collect();
    assert_eq!(dues, [date(2026, 10, 17), date(2026, 10, 24), date(2026, 10, 31)]);
}

#[test]
fn settling_and_reopening_a_payable() {
    let (mut store, notes) = setup();
    let s = party(&mut store, "Acme", PartyType::Supplier);
    let c = category(&mut store, "Aluguel", FlowType::Expense);
    let created = store
        .create_payable_series(&payable_input(&s.id, &c.id, date(2026, 11, 5)))
        .unwrap();
    let id = created[0].id.clone();
    notes.clear();

    let (paid, tx) = store.settle_payable(&id, date(2026, 11, 4)).unwrap();
    assert!(paid.is_paid);
    assert_eq!(paid.paid_date, Some(date(2026, 11, 4)));
    assert_eq!(paid.status(date(2026, 12, 1)), DueStatus::Paid);
    assert_eq!(tx.transaction_type, FlowType::Expense);
    assert_eq!(tx.source, TransactionSource::Payable);
    assert_eq!(tx.source_id.as_deref(), Some(id.as_str()));
    assert_eq!(tx.value, Decimal::from(1200));
    assert_eq!(tx.client_supplier_id, s.id);
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(notes.all().len(), 1);

    let reopened = store.reopen_payable(&id).unwrap();
    assert!(!reopened.is_paid);
    assert_eq!(reopened.paid_date, None);
    assert!(store.transactions().is_empty());
    store.fetch_all();
    assert!(store.transactions().is_empty());
    assert!(!store.get::<PayableAccount>(&id).unwrap().is_paid);
}

#[test]
fn settling_a_receivable_records_income() {
    let (mut store, _) = setup();
    let cl = party(&mut store, "Cliente A", PartyType::Client);
    let c = category(&mut store, "Vendas", FlowType::Income);
    let created = store
        .create_receivable_series(&NewReceivable {
            client_id: cl.id.clone(),
            category_id: c.id.clone(),
            value: Decimal::from(450),
            due_date: date(2026, 10, 20),
            observations: None,
            installment_type: InstallmentKind::Single,
            installments: None,
            recurrence_type: None,
            recurrence_count: None,
            is_received: false,
            received_date: None,
            parent_id: None,
        })
        .unwrap();
    let id = created[0].id.clone();

    let (received, tx) = store.settle_receivable(&id, date(2026, 10, 18)).unwrap();
    assert_eq!(received.status(date(2026, 10, 18)), DueStatus::Received);
    assert_eq!(tx.transaction_type, FlowType::Income);
    assert_eq!(tx.source, TransactionSource::Receivable);

    store.reopen_receivable(&id).unwrap();
    assert!(store.transactions().is_empty());
    let r = store.get::<ReceivableAccount>(&id).unwrap();
    assert!(!r.is_received);
    assert_eq!(r.received_date, None);
}

#[test]
fn settling_unknown_payable_fails_without_transaction() {
    let (mut store, notes) = setup();
    let err = store
        .settle_payable("missing", date(2026, 10, 17))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(store.transactions().is_empty());
    assert_eq!(notes.errors().len(), 1);
}

#[test]
fn single_table_reload_picks_up_external_rows() {
    let backend = Arc::new(LocalBackend::new(LocalStore::open_in_memory().unwrap()));
    let (mut store, _) = setup_with(backend.clone());
    backend
        .insert(Table::Categories, json!({"name": "Impostos", "type": "despesa"}))
        .unwrap();
    assert!(store.categories().is_empty());
    store.fetch::<Category>().unwrap();
    assert_eq!(store.all::<Category>().len(), 1);
    assert_eq!(store.load_state(Table::Categories), LoadState::Ready);
}

#[test]
fn large_balances_survive_a_round_trip() {
    let (mut store, _) = setup();
    let big = Decimal::from_str("12345678901234567.89").unwrap();
    let a = store
        .create::<Account>(&NewAccount {
            name: "Reserva".into(),
            account_type: AccountType::Bank,
            initial_balance: big,
            current_balance: Decimal::from_str("0.10").unwrap(),
        })
        .unwrap();
    assert_eq!(a.initial_balance, big);
    store.fetch_all();
    let local = store.get::<Account>(&a.id).unwrap();
    assert_eq!(local.initial_balance, big);
    assert_eq!(local.current_balance, Decimal::from_str("0.10").unwrap());
}

#[test]
fn rejected_create_and_update_leave_collection_untouched() {
    let backend = Arc::new(LocalBackend::new(LocalStore::open_in_memory().unwrap()));
    backend
        .insert(Table::Categories, json!({"name": "Aluguel", "type": "despesa"}))
        .unwrap();
    let (mut store, notes) = setup_with(Arc::new(RejectingWrites {
        inner: backend.clone(),
    }));
    let before = store.categories().to_vec();
    assert_eq!(before.len(), 1);
    notes.clear();

    let err = store
        .create::<Category>(&NewCategory {
            name: "Vendas".into(),
            category_type: FlowType::Income,
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.categories(), before.as_slice());
    let all = notes.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].severity, Severity::Error);
    notes.clear();

    let err = store
        .update::<Category>(
            &before[0].id,
            &CategoryPatch {
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.categories(), before.as_slice());
    let all = notes.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].severity, Severity::Error);
}

#[test]
fn reopen_removes_settlements_recorded_by_another_session() {
    let backend = Arc::new(LocalBackend::new(LocalStore::open_in_memory().unwrap()));
    let (mut first, _) = setup_with(backend.clone());
    let s = party(&mut first, "Acme", PartyType::Supplier);
    let c = category(&mut first, "Aluguel", FlowType::Expense);
    let id = first
        .create_payable_series(&payable_input(&s.id, &c.id, date(2026, 11, 5)))
        .unwrap()[0]
        .id
        .clone();

    let notes = RecordingNotifier::new();
    let mut second = FinanceStore::new(backend.clone(), Arc::new(notes.clone()));
    first.settle_payable(&id, date(2026, 11, 4)).unwrap();
    second.fetch::<PayableAccount>().unwrap();
    assert!(second.transactions().is_empty());

    second.reopen_payable(&id).unwrap();
    assert!(second.transactions().is_empty());
    assert!(backend.select(Table::Transactions).unwrap().is_empty());
    assert_eq!(notes.all().len(), 1);
    assert_eq!(notes.all()[0].severity, Severity::Success);
}

#[test]
fn reopen_fails_cleanly_when_transactions_cannot_load() {
    let backend = Arc::new(LocalBackend::new(LocalStore::open_in_memory().unwrap()));
    let (mut first, _) = setup_with(backend.clone());
    let s = party(&mut first, "Acme", PartyType::Supplier);
    let c = category(&mut first, "Aluguel", FlowType::Expense);
    let id = first
        .create_payable_series(&payable_input(&s.id, &c.id, date(2026, 11, 5)))
        .unwrap()[0]
        .id
        .clone();
    first.settle_payable(&id, date(2026, 11, 4)).unwrap();

    let (mut second, notes) = setup_with(Arc::new(FailingSelect {
        inner: backend.clone(),
        table: Table::Transactions,
    }));
    notes.clear();

    let err = second.reopen_payable(&id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(notes.all().len(), 1);
    assert_eq!(notes.errors().len(), 1);
    assert!(second.get::<PayableAccount>(&id).unwrap().is_paid);

    first.fetch_all();
    assert!(first.get::<PayableAccount>(&id).unwrap().is_paid);
    assert_eq!(first.transactions().len(), 1);
}

#[test]
fn settling_twice_is_rejected() {
    let (mut store, notes) = setup();
    let s = party(&mut store, "Acme", PartyType::Supplier);
    let c = category(&mut store, "Aluguel", FlowType::Expense);
    let id = store
        .create_payable_series(&payable_input(&s.id, &c.id, date(2026, 11, 5)))
        .unwrap()[0]
        .id
        .clone();
    store.settle_payable(&id, date(2026, 11, 4)).unwrap();
    notes.clear();

    let err = store.settle_payable(&id, date(2026, 11, 6)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(
        store.get::<PayableAccount>(&id).unwrap().paid_date,
        Some(date(2026, 11, 4))
    );
    assert_eq!(notes.all().len(), 1);
    assert_eq!(notes.errors().len(), 1);
}

#[test]
fn receiving_twice_is_rejected() {
    let (mut store, _) = setup();
    let cl = party(&mut store, "Cliente A", PartyType::Client);
    let c = category(&mut store, "Vendas", FlowType::Income);
    let id = store
        .create_receivable_series(&NewReceivable {
            client_id: cl.id.clone(),
            category_id: c.id.clone(),
            value: Decimal::from(450),
            due_date: date(2026, 10, 20),
            observations: None,
            installment_type: InstallmentKind::Single,
            installments: None,
            recurrence_type: None,
            recurrence_count: None,
            is_received: false,
            received_date: None,
            parent_id: None,
        })
        .unwrap()[0]
        .id
        .clone();
    store.settle_receivable(&id, date(2026, 10, 18)).unwrap();
    let err = store.settle_receivable(&id, date(2026, 10, 19)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.transactions().len(), 1);
}

#[test]
fn interrupted_series_reports_what_was_saved() {
    let (mut store, notes) = setup_with(Arc::new(FlakyPayableInserts {
        inner: LocalBackend::new(LocalStore::open_in_memory().unwrap()),
        allowed: 2,
        seen: AtomicUsize::new(0),
    }));
    let s = party(&mut store, "Acme", PartyType::Supplier);
    let c = category(&mut store, "Aluguel", FlowType::Expense);
    notes.clear();

    let mut input = payable_input(&s.id, &c.id, date(2026, 1, 31));
    input.installment_type = InstallmentKind::Installments;
    input.installments = Some(4);
    let err = store.create_payable_series(&input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(store.payables().len(), 2);

    let all = notes.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].severity, Severity::Error);
    assert!(all[0].description.contains("2 entries saved"));

    store.fetch_all();
    assert_eq!(store.payables().len(), 2);
}
