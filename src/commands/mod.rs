// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod contacts;
pub mod payables;
pub mod receivables;
pub mod summary;
pub mod transactions;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{FlowType, PartyType};
use crate::store::FinanceStore;
use crate::utils::{parse_amount, parse_date};

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.as_str())
        .with_context(|| format!("--{} is required", name))
}

pub(crate) fn optional<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(|s| s.as_str())
}

pub(crate) fn optional_amount(m: &clap::ArgMatches, name: &str) -> Result<Option<Decimal>> {
    optional(m, name).map(parse_amount).transpose()
}

pub(crate) fn optional_date(m: &clap::ArgMatches, name: &str) -> Result<Option<NaiveDate>> {
    optional(m, name).map(parse_date).transpose()
}

pub(crate) fn optional_parse<T>(m: &clap::ArgMatches, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    optional(m, name).map(str::parse::<T>).transpose()
}

/// Observations on add: blank means none.
pub(crate) fn observations(m: &clap::ArgMatches) -> Option<String> {
    optional(m, "observations")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Observations on edit: absent leaves them alone, blank clears them.
pub(crate) fn observations_patch(m: &clap::ArgMatches) -> Option<Option<String>> {
    optional(m, "observations").map(|s| {
        let s = s.trim();
        if s.is_empty() { None } else { Some(s.to_string()) }
    })
}

/// Resolves a client/supplier given by id or by name.
pub fn resolve_party(store: &FinanceStore, raw: &str, kind: Option<PartyType>) -> Result<String> {
    let raw = raw.trim();
    let candidates: Vec<_> = store
        .clients_suppliers()
        .iter()
        .filter(|p| kind.is_none_or(|k| p.party_type == k))
        .collect();
    if let Some(p) = candidates.iter().find(|p| p.id == raw) {
        return Ok(p.id.clone());
    }
    let named: Vec<_> = candidates
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(raw))
        .collect();
    let what = kind.map(|k| k.label()).unwrap_or("Client/supplier");
    match named.as_slice() {
        [one] => Ok(one.id.clone()),
        [] => Err(anyhow!("{} '{}' not found", what, raw)),
        _ => bail!("{} name '{}' is ambiguous; use the id", what, raw),
    }
}

/// Resolves a category of the given type by id or by name.
pub fn resolve_category(store: &FinanceStore, raw: &str, kind: FlowType) -> Result<String> {
    let raw = raw.trim();
    let candidates: Vec<_> = store
        .categories()
        .iter()
        .filter(|c| c.category_type == kind)
        .collect();
    if let Some(c) = candidates.iter().find(|c| c.id == raw) {
        return Ok(c.id.clone());
    }
    candidates
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(raw))
        .map(|c| c.id.clone())
        .with_context(|| format!("{} category '{}' not found", kind, raw))
}
