// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Accounts,
    Categories,
    ClientsSuppliers,
    PayableAccounts,
    ReceivableAccounts,
    Transactions,
}

/// Sort rule a table is fetched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub ascending: bool,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Accounts,
        Table::Categories,
        Table::ClientsSuppliers,
        Table::PayableAccounts,
        Table::ReceivableAccounts,
        Table::Transactions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Accounts => "accounts",
            Table::Categories => "categories",
            Table::ClientsSuppliers => "clients_suppliers",
            Table::PayableAccounts => "payable_accounts",
            Table::ReceivableAccounts => "receivable_accounts",
            Table::Transactions => "transactions",
        }
    }

    /// Key the offline store keeps this table's rows under.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Table::Accounts => "vibe-accounts",
            Table::Categories => "vibe-categories",
            Table::ClientsSuppliers => "vibe-clients-suppliers",
            Table::PayableAccounts => "vibe-payables",
            Table::ReceivableAccounts => "vibe-receivables",
            Table::Transactions => "vibe-transactions",
        }
    }

    pub fn order(&self) -> SortOrder {
        match self {
            Table::Categories | Table::ClientsSuppliers => SortOrder {
                column: "name",
                ascending: true,
            },
            _ => SortOrder {
                column: "created_at",
                ascending: false,
            },
        }
    }

    /// Whether the backend stamps `created_at` on insert.
    pub fn has_created_at(&self) -> bool {
        self.order().column == "created_at"
    }

    pub fn index(&self) -> usize {
        match self {
            Table::Accounts => 0,
            Table::Categories => 1,
            Table::ClientsSuppliers => 2,
            Table::PayableAccounts => 3,
            Table::ReceivableAccounts => 4,
            Table::Transactions => 5,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request/response contract of the hosted table service.
///
/// Rows travel as JSON objects in the backend's own (snake_case) shape.
/// `update` and `delete` must report `StoreError::NotFound` when no row
/// carries the id.
pub trait TableClient: Send + Sync {
    /// All rows of `table`, ordered by [`Table::order`].
    fn select(&self, table: Table) -> Result<Vec<Value>, StoreError>;
    /// Inserts one row and returns it as stored (id and timestamps filled in).
    fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError>;
    /// Applies the keys present in `patch` to the row with `id`.
    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value, StoreError>;
    fn delete(&self, table: Table, id: &str) -> Result<(), StoreError>;
}

/// Name ordering used for reference tables: case-insensitive, then exact.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compares two rows on one column following the table's sort rule.
pub fn compare_rows(order: SortOrder, a: &Value, b: &Value) -> Ordering {
    let ord = match (a.get(order.column), b.get(order.column)) {
        (Some(Value::String(x)), Some(Value::String(y))) => compare_names(x, y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Less,
        (_, Some(Value::Null) | None) => Ordering::Greater,
        _ => Ordering::Equal,
    };
    if order.ascending { ord } else { ord.reverse() }
}
