// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use vibefin::config::{Mode, Settings};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn defaults_are_offline() {
    let s = Settings::default();
    assert_eq!(s.mode(false), Mode::Offline);
    assert_eq!(s.timeout(), Duration::from_secs(15));
}

#[test]
fn toml_then_env() {
    let mut s = Settings::default();
    s.merge_toml(
        r#"
        backend_url = "https://demo.example.co"
        anon_key = "public-anon"
        data_dir = "/tmp/vibefin"
        timeout_secs = 30
        "#,
    );
    assert_eq!(
        s.mode(false),
        Mode::Remote {
            url: "https://demo.example.co".into(),
            key: "public-anon".into(),
        }
    );
    assert_eq!(s.mode(true), Mode::Offline);
    assert_eq!(s.data_dir, Some(PathBuf::from("/tmp/vibefin")));
    assert_eq!(s.timeout_secs, 30);

    s.merge_env(env(&[("VIBEFIN_URL", "https://other.example.co"), ("VIBEFIN_TIMEOUT_SECS", "5")]));
    assert_eq!(s.backend_url.as_deref(), Some("https://other.example.co"));
    assert_eq!(s.timeout_secs, 5);

    s.merge_env(env(&[("VIBEFIN_ANON_KEY", "  ")]));
    assert_eq!(s.anon_key, None);
    assert_eq!(s.mode(false), Mode::Offline);
}

#[test]
fn bad_input_is_ignored() {
    let mut s = Settings::default();
    s.merge_toml("backend_url = ");
    assert_eq!(s, Settings::default());
    s.merge_env(env(&[("VIBEFIN_TIMEOUT_SECS", "soon")]));
    assert_eq!(s.timeout_secs, 15);
    s.merge_toml("timeout_secs = 0");
    assert_eq!(s.timeout_secs, 15);
}

#[test]
fn load_settings_reads_given_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vibefin.toml");
    std::fs::write(&path, "timeout_secs = 42\n").unwrap();
    let s = vibefin::config::load_settings(Some(path.as_path()));
    if std::env::var("VIBEFIN_TIMEOUT_SECS").is_err() {
        assert_eq!(s.timeout_secs, 42);
    }
}
