// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::{optional, optional_parse, required};
use crate::models::{Category, CategoryPatch, FlowType, NewCategory};
use crate::store::FinanceStore;
use crate::utils::maybe_print_json;
use crate::views::categories_table;

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim().to_string();
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            let category_type: FlowType = required(sub, "type")?.parse()?;
            let c = store.create::<Category>(&NewCategory {
                name,
                category_type,
            })?;
            println!("Added category '{}' ({}) id={}", c.name, c.category_type, c.id);
        }
        Some(("list", sub)) => {
            let kind: Option<FlowType> = optional_parse(sub, "type")?;
            let data: Vec<Category> = store
                .categories()
                .iter()
                .filter(|c| kind.is_none_or(|k| c.category_type == k))
                .cloned()
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", categories_table(&data));
            }
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let patch = CategoryPatch {
                name: optional(sub, "name").map(|s| s.trim().to_string()),
                category_type: optional_parse(sub, "type")?,
            };
            if patch.name.is_none() && patch.category_type.is_none() {
                bail!("Nothing to change; pass --name or --type");
            }
            let c = store.update::<Category>(id, &patch)?;
            println!("Updated category '{}'", c.name);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete::<Category>(id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
