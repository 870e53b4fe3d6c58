// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, Months, NaiveDate};

use crate::models::{InstallmentKind, RecurrenceKind};

/// Due dates of the entries that follow `first_due` in a series.
///
/// The first entry is not included. Installments repeat monthly; recurring
/// entries step by their recurrence kind. Month steps land on the last day
/// of shorter months.
pub fn follow_up_dates(
    first_due: NaiveDate,
    kind: InstallmentKind,
    installments: Option<u32>,
    recurrence: Option<RecurrenceKind>,
    recurrence_count: Option<u32>,
) -> Vec<NaiveDate> {
    let (step, count) = match kind {
        InstallmentKind::Single => return Vec::new(),
        InstallmentKind::Installments => (RecurrenceKind::Monthly, installments.unwrap_or(1)),
        InstallmentKind::Recurring => (
            recurrence.unwrap_or(RecurrenceKind::Monthly),
            recurrence_count.unwrap_or(1),
        ),
    };
    (1..count).filter_map(|n| nth_date(first_due, step, n)).collect()
}

fn nth_date(start: NaiveDate, step: RecurrenceKind, n: u32) -> Option<NaiveDate> {
    match step {
        RecurrenceKind::Weekly => start.checked_add_signed(Duration::weeks(i64::from(n))),
        RecurrenceKind::Monthly => start.checked_add_months(Months::new(n)),
        RecurrenceKind::Yearly => start.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}
