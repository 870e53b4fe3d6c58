// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vibefin::backend::TableClient;
use vibefin::config::{self, Mode, Settings};
use vibefin::db::{self, LocalStore};
use vibefin::local::LocalBackend;
use vibefin::notify::{ConsoleNotifier, Notifier, SilentNotifier};
use vibefin::remote::RestClient;
use vibefin::store::FinanceStore;
use vibefin::{cli, commands};

fn init_logging() {
    let filter = EnvFilter::try_from_env("VIBEFIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// True when the innermost subcommand asked for JSON output.
fn wants_json(m: &clap::ArgMatches) -> bool {
    match m.subcommand() {
        Some((_, sub)) => wants_json(sub),
        None => ["json", "jsonl"].iter().any(|flag| {
            m.try_get_one::<bool>(flag)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false)
        }),
    }
}

fn open_client(settings: &Settings, offline: bool) -> Result<Arc<dyn TableClient>> {
    match settings.mode(offline) {
        Mode::Remote { url, key } => {
            info!(%url, "using remote backend");
            Ok(Arc::new(RestClient::new(&url, &key, settings.timeout())?))
        }
        Mode::Offline => {
            let path = db::db_path(settings.data_dir.as_deref())?;
            info!(path = %path.display(), "using local store");
            Ok(Arc::new(LocalBackend::new(LocalStore::open(&path)?)))
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let matches = cli::build_cli().get_matches();
    let config_arg = matches.get_one::<String>("config").map(Path::new);
    let settings = config::load_settings(config_arg);
    let offline = matches.get_flag("offline");

    if let Some(("init", _)) = matches.subcommand() {
        let config_file = config_arg
            .map(Path::to_path_buf)
            .or_else(config::config_path);
        match config_file {
            Some(p) => println!("Config file: {}", p.display()),
            None => println!("Config file: (no platform config dir)"),
        }
        match settings.mode(offline) {
            Mode::Remote { url, .. } => println!("Backend: {}", url),
            Mode::Offline => println!(
                "Local store: {}",
                db::db_path(settings.data_dir.as_deref())?.display()
            ),
        }
        return Ok(());
    }

    let Some((name, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };

    let notifier: Arc<dyn Notifier> = if wants_json(sub) {
        Arc::new(SilentNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };
    let mut store = FinanceStore::new(open_client(&settings, offline)?, notifier);
    let report = store.fetch_all();
    if !report.is_complete() {
        warn!(failed = report.failed.len(), "continuing with partially loaded data");
    }

    match name {
        "account" => commands::accounts::handle(&mut store, sub)?,
        "category" => commands::categories::handle(&mut store, sub)?,
        "contact" => commands::contacts::handle(&mut store, sub)?,
        "payable" => commands::payables::handle(&mut store, sub)?,
        "receivable" => commands::receivables::handle(&mut store, sub)?,
        "tx" => commands::transactions::handle(&mut store, sub)?,
        "summary" => commands::summary::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
