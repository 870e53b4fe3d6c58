// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;

use super::payables::schedule_args;
use super::{
    observations, observations_patch, optional, optional_amount, optional_date, required,
    resolve_category, resolve_party,
};
use crate::models::{FlowType, NewReceivable, PartyType, ReceivableAccount, ReceivablePatch};
use crate::status::DueStatus;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, today};
use crate::views::{Directory, receivables_table};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableView<'a> {
    #[serde(flatten)]
    pub receivable: &'a ReceivableAccount,
    pub client: &'a str,
    pub category: &'a str,
    pub status: DueStatus,
}

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub, today())?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("receive", sub)) => {
            let id = required(sub, "id")?;
            let date = optional_date(sub, "date")?.unwrap_or_else(today);
            let (r, tx) = store.settle_receivable(id, date)?;
            println!(
                "Received {} on {} (transaction {})",
                fmt_money(&r.value),
                date,
                tx.id
            );
        }
        Some(("unreceive", sub)) => {
            let id = required(sub, "id")?;
            store.reopen_receivable(id)?;
            println!("Receivable {} is open again", id);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete::<ReceivableAccount>(id)?;
            println!("Removed receivable {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let client_id = resolve_party(store, required(sub, "client")?, Some(PartyType::Client))?;
    let category_id = resolve_category(store, required(sub, "category")?, FlowType::Income)?;
    let value = parse_amount(required(sub, "value")?)?;
    let due_date = parse_date(required(sub, "due")?)?;
    let (installment_type, installments, recurrence_type, recurrence_count) =
        schedule_args(sub)?;
    let created = store.create_receivable_series(&NewReceivable {
        client_id,
        category_id,
        value,
        due_date,
        observations: observations(sub),
        installment_type,
        installments,
        recurrence_type,
        recurrence_count,
        is_received: false,
        received_date: None,
        parent_id: None,
    })?;
    println!("{}", receivables_table(store, &created, today()));
    Ok(())
}

pub fn list(store: &FinanceStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let only_open = sub.get_flag("open");
    let data: Vec<ReceivableAccount> = store
        .receivables()
        .iter()
        .filter(|r| !only_open || r.status(today).is_open())
        .cloned()
        .collect();
    let dir = Directory::new(store);
    let views: Vec<ReceivableView> = data
        .iter()
        .map(|r| ReceivableView {
            receivable: r,
            client: dir.client_name(&r.client_id),
            category: dir.category_name(&r.category_id, FlowType::Income),
            status: r.status(today),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        println!("{}", receivables_table(store, &data, today));
    }
    Ok(())
}

fn edit(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let client_id = optional(sub, "client")
        .map(|c| resolve_party(store, c, Some(PartyType::Client)))
        .transpose()?;
    let category_id = optional(sub, "category")
        .map(|c| resolve_category(store, c, FlowType::Income))
        .transpose()?;
    let patch = ReceivablePatch {
        client_id,
        category_id,
        value: optional_amount(sub, "value")?,
        due_date: optional_date(sub, "due")?,
        observations: observations_patch(sub),
        ..Default::default()
    };
    if patch.client_id.is_none()
        && patch.category_id.is_none()
        && patch.value.is_none()
        && patch.due_date.is_none()
        && patch.observations.is_none()
    {
        bail!("Nothing to change; pass at least one field");
    }
    let r = store.update::<ReceivableAccount>(id, &patch)?;
    println!("Updated receivable {} due {}", r.id, r.due_date);
    Ok(())
}
