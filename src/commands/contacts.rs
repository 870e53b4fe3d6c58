// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::{observations, observations_patch, optional, optional_parse, required};
use crate::models::{ClientSupplier, ClientSupplierPatch, NewClientSupplier, PartyType};
use crate::store::FinanceStore;
use crate::utils::maybe_print_json;
use crate::views::parties_table;

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim().to_string();
            if name.is_empty() {
                bail!("Name must not be empty");
            }
            let party_type: PartyType = required(sub, "type")?.parse()?;
            let p = store.create::<ClientSupplier>(&NewClientSupplier {
                name,
                party_type,
                observations: observations(sub),
            })?;
            println!("Added {} '{}' id={}", p.party_type, p.name, p.id);
        }
        Some(("list", sub)) => {
            let kind: Option<PartyType> = optional_parse(sub, "type")?;
            let data: Vec<ClientSupplier> = store
                .clients_suppliers()
                .iter()
                .filter(|p| kind.is_none_or(|k| p.party_type == k))
                .cloned()
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", parties_table(&data));
            }
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let patch = ClientSupplierPatch {
                name: optional(sub, "name").map(|s| s.trim().to_string()),
                party_type: optional_parse(sub, "type")?,
                observations: observations_patch(sub),
            };
            if patch.name.is_none() && patch.party_type.is_none() && patch.observations.is_none()
            {
                bail!("Nothing to change; pass at least one field");
            }
            let p = store.update::<ClientSupplier>(id, &patch)?;
            println!("Updated {} '{}'", p.party_type, p.name);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete::<ClientSupplier>(id)?;
            println!("Removed contact {}", id);
        }
        _ => {}
    }
    Ok(())
}
