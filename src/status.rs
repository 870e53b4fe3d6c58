// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{PayableAccount, ReceivableAccount};

/// Days ahead of today that still count as "due soon".
pub const DUE_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Paid,
    Received,
    Overdue,
    DueSoon,
    Pending,
}

impl DueStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Paid => "Paid",
            DueStatus::Received => "Received",
            DueStatus::Overdue => "Overdue",
            DueStatus::DueSoon => "Due soon",
            DueStatus::Pending => "Pending",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, DueStatus::Paid | DueStatus::Received)
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn open_status(due: NaiveDate, today: NaiveDate) -> DueStatus {
    if due < today {
        DueStatus::Overdue
    } else if due <= today + Duration::days(DUE_SOON_DAYS) {
        DueStatus::DueSoon
    } else {
        DueStatus::Pending
    }
}

pub fn payable_status(is_paid: bool, due: NaiveDate, today: NaiveDate) -> DueStatus {
    if is_paid {
        DueStatus::Paid
    } else {
        open_status(due, today)
    }
}

pub fn receivable_status(is_received: bool, due: NaiveDate, today: NaiveDate) -> DueStatus {
    if is_received {
        DueStatus::Received
    } else {
        open_status(due, today)
    }
}

impl PayableAccount {
    pub fn status(&self, today: NaiveDate) -> DueStatus {
        payable_status(self.is_paid, self.due_date, today)
    }
}

impl ReceivableAccount {
    pub fn status(&self, today: NaiveDate) -> DueStatus {
        receivable_status(self.is_received, self.due_date, today)
    }
}
