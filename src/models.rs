// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! View models and the inputs used to create or patch them.
//!
//! Entities deserialize from the backend's snake_case rows and serialize as
//! camelCase view models. `New*` and `*Patch` types serialize straight to the
//! outbound wire shape, leaving out every field that was not provided.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::Table;
use crate::wire;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal, $label:literal, [$($alias:literal),*];)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Value stored by the backend.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_lowercase();
                match needle.as_str() {
                    $($wire $(| $alias)* => Ok($name::$variant),)+
                    _ => Err(anyhow::anyhow!(
                        "Invalid {} '{}', expected one of: {}",
                        stringify!($name),
                        s,
                        [$($wire),+].join(", ")
                    )),
                }
            }
        }
    };
}

wire_enum! {
    AccountType {
        Bank => "banco", "Bank", ["bank"];
        Cash => "dinheiro", "Cash", ["cash"];
        Till => "caixa", "Till", ["till"];
        Card => "cartao", "Card", ["card"];
    }
}

wire_enum! {
    /// Direction of money: categories and transactions are one or the other.
    FlowType {
        Income => "receita", "Income", ["income"];
        Expense => "despesa", "Expense", ["expense"];
    }
}

wire_enum! {
    PartyType {
        Client => "cliente", "Client", ["client"];
        Supplier => "fornecedor", "Supplier", ["supplier"];
    }
}

wire_enum! {
    InstallmentKind {
        Single => "unico", "Single", ["single"];
        Installments => "parcelado", "Installments", ["installments"];
        Recurring => "recorrente", "Recurring", ["recurring"];
    }
}

wire_enum! {
    RecurrenceKind {
        Weekly => "semanal", "Weekly", ["weekly"];
        Monthly => "mensal", "Monthly", ["monthly"];
        Yearly => "anual", "Yearly", ["yearly"];
    }
}

wire_enum! {
    TransactionSource {
        Manual => "manual", "Manual", [];
        Payable => "conta_pagar", "From payable", ["payable"];
        Receivable => "conta_receber", "From receivable", ["receivable"];
    }
}

/// A row type owned by one backend table.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + 'static {
    const TABLE: Table;
    /// Human noun used in notifications ("Account", "Category", ...).
    const NOUN: &'static str;
    type New: Serialize;
    type Patch: Serialize;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Account {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(deserialize_with = "wire::money")]
    pub initial_balance: Decimal,
    #[serde(deserialize_with = "wire::money")]
    pub current_balance: Decimal,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Category {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: FlowType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct ClientSupplier {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub party_type: PartyType,
    #[serde(default, deserialize_with = "wire::text_opt", skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct PayableAccount {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(deserialize_with = "wire::id")]
    pub supplier_id: String,
    #[serde(deserialize_with = "wire::id")]
    pub category_id: String,
    #[serde(deserialize_with = "wire::money")]
    pub value: Decimal,
    #[serde(deserialize_with = "wire::date")]
    pub due_date: NaiveDate,
    #[serde(default, deserialize_with = "wire::text_opt", skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub installment_type: InstallmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_count: Option<u32>,
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_paid: bool,
    #[serde(default, deserialize_with = "wire::date_opt", skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::id_opt", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct ReceivableAccount {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(deserialize_with = "wire::id")]
    pub client_id: String,
    #[serde(deserialize_with = "wire::id")]
    pub category_id: String,
    #[serde(deserialize_with = "wire::money")]
    pub value: Decimal,
    #[serde(deserialize_with = "wire::date")]
    pub due_date: NaiveDate,
    #[serde(default, deserialize_with = "wire::text_opt", skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub installment_type: InstallmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_count: Option<u32>,
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_received: bool,
    #[serde(default, deserialize_with = "wire::date_opt", skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::id_opt", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Transaction {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: FlowType,
    #[serde(deserialize_with = "wire::id")]
    pub client_supplier_id: String,
    #[serde(deserialize_with = "wire::id")]
    pub category_id: String,
    #[serde(deserialize_with = "wire::money")]
    pub value: Decimal,
    #[serde(deserialize_with = "wire::date")]
    pub payment_date: NaiveDate,
    #[serde(default, deserialize_with = "wire::text_opt", skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub source: TransactionSource,
    #[serde(default, deserialize_with = "wire::id_opt", skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

// Outbound payloads. `None` means "not sent"; for clearable fields
// `Some(None)` is sent as an explicit null.

#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(serialize_with = "wire::ser_money")]
    pub initial_balance: Decimal,
    #[serde(serialize_with = "wire::ser_money")]
    pub current_balance: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(serialize_with = "wire::ser_money_opt", skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<Decimal>,
    #[serde(serialize_with = "wire::ser_money_opt", skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: FlowType,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category_type: Option<FlowType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewClientSupplier {
    pub name: String,
    #[serde(rename = "type")]
    pub party_type: PartyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientSupplierPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub party_type: Option<PartyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPayable {
    pub supplier_id: String,
    pub category_id: String,
    #[serde(serialize_with = "wire::ser_money")]
    pub value: Decimal,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub installment_type: InstallmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_count: Option<u32>,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl From<&PayableAccount> for NewPayable {
    fn from(p: &PayableAccount) -> Self {
        NewPayable {
            supplier_id: p.supplier_id.clone(),
            category_id: p.category_id.clone(),
            value: p.value,
            due_date: p.due_date,
            observations: p.observations.clone(),
            installment_type: p.installment_type,
            installments: p.installments,
            recurrence_type: p.recurrence_type,
            recurrence_count: p.recurrence_count,
            is_paid: p.is_paid,
            paid_date: p.paid_date,
            parent_id: p.parent_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PayablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(serialize_with = "wire::ser_money_opt", skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReceivable {
    pub client_id: String,
    pub category_id: String,
    #[serde(serialize_with = "wire::ser_money")]
    pub value: Decimal,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub installment_type: InstallmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_count: Option<u32>,
    pub is_received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl From<&ReceivableAccount> for NewReceivable {
    fn from(r: &ReceivableAccount) -> Self {
        NewReceivable {
            client_id: r.client_id.clone(),
            category_id: r.category_id.clone(),
            value: r.value,
            due_date: r.due_date,
            observations: r.observations.clone(),
            installment_type: r.installment_type,
            installments: r.installments,
            recurrence_type: r.recurrence_type,
            recurrence_count: r.recurrence_count,
            is_received: r.is_received,
            received_date: r.received_date,
            parent_id: r.parent_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReceivablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(serialize_with = "wire::ser_money_opt", skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_received: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: FlowType,
    pub client_supplier_id: String,
    pub category_id: String,
    #[serde(serialize_with = "wire::ser_money")]
    pub value: Decimal,
    pub payment_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub source: TransactionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<FlowType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_supplier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(serialize_with = "wire::ser_money_opt", skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<Option<String>>,
}

impl Record for Account {
    const TABLE: Table = Table::Accounts;
    const NOUN: &'static str = "Account";
    type New = NewAccount;
    type Patch = AccountPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Category {
    const TABLE: Table = Table::Categories;
    const NOUN: &'static str = "Category";
    type New = NewCategory;
    type Patch = CategoryPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ClientSupplier {
    const TABLE: Table = Table::ClientsSuppliers;
    const NOUN: &'static str = "Client/supplier";
    type New = NewClientSupplier;
    type Patch = ClientSupplierPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for PayableAccount {
    const TABLE: Table = Table::PayableAccounts;
    const NOUN: &'static str = "Payable";
    type New = NewPayable;
    type Patch = PayablePatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ReceivableAccount {
    const TABLE: Table = Table::ReceivableAccounts;
    const NOUN: &'static str = "Receivable";
    type New = NewReceivable;
    type Patch = ReceivablePatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Transaction {
    const TABLE: Table = Table::Transactions;
    const NOUN: &'static str = "Transaction";
    type New = NewTransaction;
    type Patch = TransactionPatch;

    fn id(&self) -> &str {
        &self.id
    }
}
