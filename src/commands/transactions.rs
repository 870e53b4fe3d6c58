// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::{
    observations, observations_patch, optional, optional_amount, optional_date, optional_parse,
    required, resolve_category, resolve_party,
};
use crate::models::{FlowType, NewTransaction, Transaction, TransactionPatch, TransactionSource};
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, parse_amount, today};
use crate::views::transactions_table;

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete::<Transaction>(id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let transaction_type: FlowType = required(sub, "type")?.parse()?;
    let client_supplier_id = resolve_party(store, required(sub, "party")?, None)?;
    let category_id = resolve_category(store, required(sub, "category")?, transaction_type)?;
    let value = parse_amount(required(sub, "value")?)?;
    let payment_date = optional_date(sub, "date")?.unwrap_or_else(today);
    let t = store.create::<Transaction>(&NewTransaction {
        transaction_type,
        client_supplier_id,
        category_id,
        value,
        payment_date,
        observations: observations(sub),
        source: TransactionSource::Manual,
        source_id: None,
    })?;
    println!(
        "Recorded {} of {} on {} id={}",
        t.transaction_type, t.value, t.payment_date, t.id
    );
    Ok(())
}

/// Transactions filtered by `--type` and capped by `--limit`, newest first.
pub fn query_rows(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let kind: Option<FlowType> = optional_parse(sub, "type")?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    Ok(store
        .transactions()
        .iter()
        .filter(|t| kind.is_none_or(|k| t.transaction_type == k))
        .take(limit)
        .cloned()
        .collect())
}

fn list(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", transactions_table(store, &data));
    }
    Ok(())
}

fn edit(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let current = store
        .get::<Transaction>(id)
        .map(|t| t.transaction_type);
    let transaction_type: Option<FlowType> = optional_parse(sub, "type")?;
    let client_supplier_id = optional(sub, "party")
        .map(|p| resolve_party(store, p, None))
        .transpose()?;
    let category_kind = transaction_type.or(current).unwrap_or(FlowType::Expense);
    let category_id = optional(sub, "category")
        .map(|c| resolve_category(store, c, category_kind))
        .transpose()?;
    let patch = TransactionPatch {
        transaction_type,
        client_supplier_id,
        category_id,
        value: optional_amount(sub, "value")?,
        payment_date: optional_date(sub, "date")?,
        observations: observations_patch(sub),
    };
    if patch.transaction_type.is_none()
        && patch.client_supplier_id.is_none()
        && patch.category_id.is_none()
        && patch.value.is_none()
        && patch.payment_date.is_none()
        && patch.observations.is_none()
    {
        bail!("Nothing to change; pass at least one field");
    }
    let t = store.update::<Transaction>(id, &patch)?;
    println!("Updated transaction {}", t.id);
    Ok(())
}
