// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".into(),
            description: description.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

/// User-facing side channel. Fire and forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, n: Notification);
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Success => println!("✔ {}", n.description),
            Severity::Error => eprintln!("✘ {}: {}", n.title, n.description),
        }
    }
}

/// Drops everything; for scripted output such as `--json`.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _n: Notification) {}
}

/// Keeps every notification; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.severity == Severity::Error)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut l) = self.log.lock() {
            l.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, n: Notification) {
        if let Ok(mut l) = self.log.lock() {
            l.push(n);
        }
    }
}
