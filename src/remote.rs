// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Table client for a hosted PostgREST endpoint (`/rest/v1/<table>`).

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::backend::{Table, TableClient};
use crate::error::StoreError;
use crate::utils::http_client;

pub struct RestClient {
    base: String,
    key: String,
    http: Client,
}

#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Maps a non-success response onto the store's error kinds.
pub fn classify_status(status: StatusCode, body: &str) -> StoreError {
    let parsed: PostgrestError = serde_json::from_str(body).unwrap_or_default();
    let mut message = parsed
        .message
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    if let Some(d) = parsed.details.filter(|d| !d.is_empty()) {
        message.push_str(&format!(" ({d})"));
    }
    if let Some(h) = parsed.hint.filter(|h| !h.is_empty()) {
        message.push_str(&format!(" hint: {h}"));
    }
    match status {
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Validation(message)
        }
        StatusCode::NOT_FOUND => StoreError::NotFound {
            table: "remote",
            id: message,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
            StoreError::Network(message)
        }
        _ => StoreError::Unknown(message),
    }
}

/// Rows in a PostgREST body: an array, a single object, or nothing.
pub fn rows_from_body(body: &str) -> Result<Vec<Value>, StoreError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(body).map_err(|e| StoreError::decode("response body", e))? {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        obj @ Value::Object(_) => Ok(vec![obj]),
        other => Err(StoreError::decode(
            "response body",
            format!("unexpected JSON {other}"),
        )),
    }
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            key: api_key.to_string(),
            http: http_client(timeout)?,
        })
    }

    fn url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base, table.name())
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Accept", "application/json")
    }

    fn send(&self, req: RequestBuilder) -> Result<Vec<Value>, StoreError> {
        let resp = self.authed(req).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(classify_status(status, &body));
        }
        rows_from_body(&body)
    }

    fn not_found(table: Table, id: &str) -> StoreError {
        StoreError::NotFound {
            table: table.name(),
            id: id.to_string(),
        }
    }
}

impl TableClient for RestClient {
    fn select(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        let order = table.order();
        let dir = if order.ascending { "asc" } else { "desc" };
        let req = self.http.get(self.url(table)).query(&[
            ("select", "*".to_string()),
            ("order", format!("{}.{}", order.column, dir)),
        ]);
        let rows = self.send(req)?;
        debug!(%table, rows = rows.len(), "fetched");
        Ok(rows)
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        let req = self
            .http
            .post(self.url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let mut rows = self.send(req)?;
        if rows.len() != 1 {
            return Err(StoreError::decode(
                format!("{table} insert"),
                format!("expected exactly one row, got {}", rows.len()),
            ));
        }
        Ok(rows.remove(0))
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value, StoreError> {
        let req = self
            .http
            .patch(self.url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch);
        let mut rows = self.send(req)?;
        if rows.is_empty() {
            return Err(Self::not_found(table, id));
        }
        Ok(rows.remove(0))
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        let req = self
            .http
            .delete(self.url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let rows = self.send(req)?;
        if rows.is_empty() {
            return Err(Self::not_found(table, id));
        }
        Ok(())
    }
}
