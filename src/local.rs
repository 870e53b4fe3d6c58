// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Offline table client: keeps each table as a JSON array in [`LocalStore`].

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::backend::{Table, TableClient, compare_rows};
use crate::db::LocalStore;
use crate::error::StoreError;

pub struct LocalBackend {
    store: LocalStore,
}

impl LocalBackend {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    fn rows(&self, table: Table) -> Vec<Value> {
        self.store.get(table.storage_key(), Vec::new())
    }

    fn save(&self, table: Table, mut rows: Vec<Value>) -> Result<(), StoreError> {
        let order = table.order();
        rows.sort_by(|a, b| compare_rows(order, a, b));
        self.store.try_set(table.storage_key(), &rows)
    }
}

fn row_id(row: &Value) -> Option<String> {
    match row.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn as_object(table: Table, v: Value) -> Result<Map<String, Value>, StoreError> {
    match v {
        Value::Object(m) => Ok(m),
        other => Err(StoreError::Validation(format!(
            "{table}: expected a JSON object, got {other}"
        ))),
    }
}

impl TableClient for LocalBackend {
    fn select(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        let mut rows = self.rows(table);
        let order = table.order();
        rows.sort_by(|a, b| compare_rows(order, a, b));
        Ok(rows)
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        let mut obj = as_object(table, row)?;
        obj.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        if table.has_created_at() {
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
            obj.insert("created_at".into(), Value::String(now));
        }
        let row = Value::Object(obj);
        let mut rows = self.rows(table);
        rows.push(row.clone());
        self.save(table, rows)?;
        debug!(%table, "local row inserted");
        Ok(row)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value, StoreError> {
        let patch = as_object(table, patch)?;
        let mut rows = self.rows(table);
        let Some(row) = rows.iter_mut().find(|r| row_id(r).as_deref() == Some(id)) else {
            return Err(StoreError::NotFound {
                table: table.name(),
                id: id.to_string(),
            });
        };
        if let Value::Object(obj) = row {
            for (k, v) in patch {
                if k != "id" {
                    obj.insert(k, v);
                }
            }
        }
        let updated = row.clone();
        self.save(table, rows)?;
        Ok(updated)
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        let mut rows = self.rows(table);
        let before = rows.len();
        rows.retain(|r| row_id(r).as_deref() != Some(id));
        if rows.len() == before {
            return Err(StoreError::NotFound {
                table: table.name(),
                id: id.to_string(),
            });
        }
        self.save(table, rows)
    }
}
