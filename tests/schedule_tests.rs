// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use vibefin::models::{InstallmentKind, RecurrenceKind};
use vibefin::schedule::follow_up_dates;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn single_has_no_follow_ups() {
    let dates = follow_up_dates(d(2026, 1, 10), InstallmentKind::Single, Some(5), None, None);
    assert!(dates.is_empty());
}

#[test]
fn installments_are_monthly_and_clamp_to_month_end() {
    let dates = follow_up_dates(
        d(2026, 1, 31),
        InstallmentKind::Installments,
        Some(4),
        None,
        None,
    );
    assert_eq!(dates, [d(2026, 2, 28), d(2026, 3, 31), d(2026, 4, 30)]);
}

#[test]
fn recurring_steps_by_kind() {
    let weekly = follow_up_dates(
        d(2026, 10, 17),
        InstallmentKind::Recurring,
        None,
        Some(RecurrenceKind::Weekly),
        Some(3),
    );
    assert_eq!(weekly, [d(2026, 10, 24), d(2026, 10, 31)]);

    let yearly = follow_up_dates(
        d(2024, 2, 29),
        InstallmentKind::Recurring,
        None,
        Some(RecurrenceKind::Yearly),
        Some(2),
    );
    assert_eq!(yearly, [d(2025, 2, 28)]);

    let monthly_default = follow_up_dates(
        d(2026, 5, 15),
        InstallmentKind::Recurring,
        None,
        None,
        Some(2),
    );
    assert_eq!(monthly_default, [d(2026, 6, 15)]);
}

#[test]
fn recurring_without_count_is_just_the_first() {
    let dates = follow_up_dates(
        d(2026, 5, 15),
        InstallmentKind::Recurring,
        None,
        Some(RecurrenceKind::Monthly),
        None,
    );
    assert!(dates.is_empty());
}
