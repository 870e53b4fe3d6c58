// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::db::project_dirs;

pub const CONFIG_FILE: &str = "vibefin.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: Option<String>,
    pub anon_key: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: None,
            anon_key: None,
            data_dir: None,
            timeout_secs: 15,
        }
    }
}

/// Where the store's rows live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Remote { url: String, key: String },
    Offline,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Remote when both URL and key are set, offline otherwise.
    pub fn mode(&self, force_offline: bool) -> Mode {
        match (&self.backend_url, &self.anon_key) {
            (Some(url), Some(key)) if !force_offline => Mode::Remote {
                url: url.clone(),
                key: key.clone(),
            },
            _ => Mode::Offline,
        }
    }

    /// Applies `key = "value"` pairs from a TOML document.
    pub fn merge_toml(&mut self, raw: &str) {
        let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "ignoring malformed {}", CONFIG_FILE);
                return;
            }
        };
        if let Some(v) = file_cfg.get("backend_url").and_then(|v| v.as_str()) {
            self.backend_url = non_empty(v);
        }
        if let Some(v) = file_cfg.get("anon_key").and_then(|v| v.as_str()) {
            self.anon_key = non_empty(v);
        }
        if let Some(v) = file_cfg.get("data_dir").and_then(|v| v.as_str()) {
            self.data_dir = non_empty(v).map(PathBuf::from);
        }
        if let Some(v) = file_cfg.get("timeout_secs").and_then(|v| v.as_integer()) {
            if v > 0 {
                self.timeout_secs = v as u64;
            }
        }
    }

    /// Applies overrides from an environment lookup.
    pub fn merge_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("VIBEFIN_URL") {
            self.backend_url = non_empty(&v);
        }
        if let Some(v) = get("VIBEFIN_ANON_KEY") {
            self.anon_key = non_empty(&v);
        }
        if let Some(v) = get("VIBEFIN_DATA_DIR") {
            self.data_dir = non_empty(&v).map(PathBuf::from);
        }
        if let Some(v) = get("VIBEFIN_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => warn!(value = %v, "ignoring invalid VIBEFIN_TIMEOUT_SECS"),
            }
        }
    }
}

fn non_empty(v: &str) -> Option<String> {
    let v = v.trim();
    if v.is_empty() { None } else { Some(v.to_string()) }
}

pub fn config_path() -> Option<PathBuf> {
    project_dirs()
        .ok()
        .map(|p| p.config_dir().join(CONFIG_FILE))
}

/// Defaults, then the config file, then `VIBEFIN_*` environment variables.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();
    let path = path.map(Path::to_path_buf).or_else(config_path);
    if let Some(path) = path {
        if let Ok(raw) = fs::read_to_string(&path) {
            settings.merge_toml(&raw);
        }
    }
    settings.merge_env(|k| std::env::var(k).ok());
    settings
}
