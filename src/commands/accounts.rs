// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::{optional, optional_amount, optional_parse, required};
use crate::models::{Account, AccountPatch, AccountType, NewAccount};
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, parse_amount};
use crate::views::accounts_table;

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim().to_string();
            let account_type: AccountType = required(sub, "type")?.parse()?;
            let initial = parse_amount(required(sub, "initial-balance")?)?;
            let current = optional_amount(sub, "current-balance")?.unwrap_or(initial);
            let a = store.create::<Account>(&NewAccount {
                name,
                account_type,
                initial_balance: initial,
                current_balance: current,
            })?;
            println!("Added account '{}' ({}) id={}", a.name, a.account_type, a.id);
        }
        Some(("list", sub)) => {
            let data = store.accounts();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", accounts_table(data));
            }
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let patch = AccountPatch {
                name: optional(sub, "name").map(|s| s.trim().to_string()),
                account_type: optional_parse(sub, "type")?,
                initial_balance: optional_amount(sub, "initial-balance")?,
                current_balance: optional_amount(sub, "current-balance")?,
            };
            if patch.name.is_none()
                && patch.account_type.is_none()
                && patch.initial_balance.is_none()
                && patch.current_balance.is_none()
            {
                bail!("Nothing to change; pass at least one field");
            }
            let a = store.update::<Account>(id, &patch)?;
            println!("Updated account '{}'", a.name);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete::<Account>(id)?;
            println!("Removed account {}", id);
        }
        _ => {}
    }
    Ok(())
}
