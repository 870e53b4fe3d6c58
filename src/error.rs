// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a failed store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Validation,
    NotFound,
    Unknown,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("rejected by backend: {0}")]
    Validation(String),
    #[error("no row with id '{id}' in {table}")]
    NotFound { table: &'static str, id: String },
    #[error("could not decode {what}: {message}")]
    Decode { what: String, message: String },
    #[error("{0}")]
    Unknown(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Network(_) => ErrorKind::Network,
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Decode { .. } | StoreError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        StoreError::Decode {
            what: what.into(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            StoreError::Network(err.to_string())
        } else if err.is_decode() {
            StoreError::decode("response body", err)
        } else {
            StoreError::Unknown(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unknown(format!("local storage: {err}"))
    }
}
