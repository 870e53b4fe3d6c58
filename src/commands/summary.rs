// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, today};
use crate::views::{summarize, summary_table};

pub fn handle(store: &FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    let summary = summarize(store, today());
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        println!("{}", summary_table(&summary));
    }
    Ok(())
}
