// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;

use super::{
    observations, observations_patch, optional, optional_amount, optional_date, optional_parse,
    required, resolve_category, resolve_party,
};
use crate::models::{
    FlowType, InstallmentKind, NewPayable, PartyType, PayableAccount, PayablePatch,
    RecurrenceKind,
};
use crate::status::DueStatus;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, today};
use crate::views::{Directory, payables_table};

/// Payable as listed: the record plus resolved labels and status.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableView<'a> {
    #[serde(flatten)]
    pub payable: &'a PayableAccount,
    pub supplier: &'a str,
    pub category: &'a str,
    pub status: DueStatus,
}

/// Installment fields shared by payables and receivables.
pub(crate) fn schedule_args(
    sub: &clap::ArgMatches,
) -> Result<(InstallmentKind, Option<u32>, Option<RecurrenceKind>, Option<u32>)> {
    let installments = sub.get_one::<u32>("installments").copied();
    let recurrence: Option<RecurrenceKind> = optional_parse(sub, "recurrence")?;
    let count = sub.get_one::<u32>("count").copied();
    Ok(match (installments, recurrence) {
        (Some(n), _) => (InstallmentKind::Installments, Some(n), None, None),
        (None, Some(r)) => (InstallmentKind::Recurring, None, Some(r), Some(count.unwrap_or(1))),
        (None, None) => (InstallmentKind::Single, None, None, None),
    })
}

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub, today())?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("pay", sub)) => {
            let id = required(sub, "id")?;
            let date = optional_date(sub, "date")?.unwrap_or_else(today);
            let (p, tx) = store.settle_payable(id, date)?;
            println!(
                "Paid {} on {} (transaction {})",
                fmt_money(&p.value),
                date,
                tx.id
            );
        }
        Some(("unpay", sub)) => {
            let id = required(sub, "id")?;
            store.reopen_payable(id)?;
            println!("Payable {} is open again", id);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete::<PayableAccount>(id)?;
            println!("Removed payable {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let supplier_id = resolve_party(store, required(sub, "supplier")?, Some(PartyType::Supplier))?;
    let category_id = resolve_category(store, required(sub, "category")?, FlowType::Expense)?;
    let value = parse_amount(required(sub, "value")?)?;
    let due_date = parse_date(required(sub, "due")?)?;
    let (installment_type, installments, recurrence_type, recurrence_count) =
        schedule_args(sub)?;
    let created = store.create_payable_series(&NewPayable {
        supplier_id,
        category_id,
        value,
        due_date,
        observations: observations(sub),
        installment_type,
        installments,
        recurrence_type,
        recurrence_count,
        is_paid: false,
        paid_date: None,
        parent_id: None,
    })?;
    println!("{}", payables_table(store, &created, today()));
    Ok(())
}

pub fn list(store: &FinanceStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let only_open = sub.get_flag("open");
    let data: Vec<PayableAccount> = store
        .payables()
        .iter()
        .filter(|p| !only_open || p.status(today).is_open())
        .cloned()
        .collect();
    let dir = Directory::new(store);
    let views: Vec<PayableView> = data
        .iter()
        .map(|p| PayableView {
            payable: p,
            supplier: dir.supplier_name(&p.supplier_id),
            category: dir.category_name(&p.category_id, FlowType::Expense),
            status: p.status(today),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        println!("{}", payables_table(store, &data, today));
    }
    Ok(())
}

fn edit(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let supplier_id = optional(sub, "supplier")
        .map(|s| resolve_party(store, s, Some(PartyType::Supplier)))
        .transpose()?;
    let category_id = optional(sub, "category")
        .map(|c| resolve_category(store, c, FlowType::Expense))
        .transpose()?;
    let patch = PayablePatch {
        supplier_id,
        category_id,
        value: optional_amount(sub, "value")?,
        due_date: optional_date(sub, "due")?,
        observations: observations_patch(sub),
        ..Default::default()
    };
    if patch.supplier_id.is_none()
        && patch.category_id.is_none()
        && patch.value.is_none()
        && patch.due_date.is_none()
        && patch.observations.is_none()
    {
        bail!("Nothing to change; pass at least one field");
    }
    let p = store.update::<PayableAccount>(id, &patch)?;
    println!("Updated payable {} due {}", p.id, p.due_date);
    Ok(())
}
