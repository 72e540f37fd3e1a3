use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert!(parse_bool("X", "true").unwrap());
    assert!(parse_bool("X", "YES").unwrap());
    assert!(parse_bool("X", " 1 ").unwrap());
    assert!(!parse_bool("X", "false").unwrap());
    assert!(!parse_bool("X", "no").unwrap());
    assert!(!parse_bool("X", "0").unwrap());
}

#[test]
fn parse_bool_rejects_garbage() {
    let err = parse_bool("TILESCRAPE_HEADLESS", "maybe").unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "TILESCRAPE_HEADLESS")
    );
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.chromium_path.is_none());
    assert!(!cfg.headless);
    assert!(cfg.user_data_dir.is_none());
    assert_eq!(cfg.output_path, Path::new("products.json"));
    assert_eq!(cfg.nav_settle_ms, 1500);
    assert_eq!(cfg.nav_poll_interval_ms, 500);
    assert_eq!(cfg.nav_poll_retries, 20);
    assert_eq!(cfg.nav_fallback_delay_ms, 2000);
    assert_eq!(cfg.content_timeout_secs, 40);
    assert_eq!(cfg.content_poll_interval_ms, 500);
    assert_eq!(cfg.warmup_passes, 3);
    assert_eq!(cfg.warmup_delay_ms, 400);
    assert_eq!(cfg.scroll_step_px, 1000);
}

#[test]
fn chromium_path_override() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_CHROMIUM_PATH", "/opt/chrome/chrome");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.chromium_path.as_deref(), Some(Path::new("/opt/chrome/chrome")));
}

#[test]
fn blank_optional_paths_are_ignored() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_CHROMIUM_PATH", "  ");
    map.insert("TILESCRAPE_USER_DATA_DIR", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.chromium_path.is_none());
    assert!(cfg.user_data_dir.is_none());
}

#[test]
fn headless_override() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_HEADLESS", "true");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.headless);
}

#[test]
fn headless_invalid() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_HEADLESS", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TILESCRAPE_HEADLESS"),
        "expected InvalidEnvVar(TILESCRAPE_HEADLESS), got: {result:?}"
    );
}

#[test]
fn output_path_override() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_OUTPUT_PATH", "/tmp/out.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.output_path, Path::new("/tmp/out.json"));
}

#[test]
fn content_timeout_override() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_CONTENT_TIMEOUT_SECS", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.content_timeout_secs, 90);
}

#[test]
fn content_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_CONTENT_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TILESCRAPE_CONTENT_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TILESCRAPE_CONTENT_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn nav_poll_retries_override() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_NAV_POLL_RETRIES", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.nav_poll_retries, 5);
}

#[test]
fn nav_poll_retries_negative_is_invalid() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_NAV_POLL_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TILESCRAPE_NAV_POLL_RETRIES"),
        "expected InvalidEnvVar(TILESCRAPE_NAV_POLL_RETRIES), got: {result:?}"
    );
}

#[test]
fn zero_content_poll_interval_is_invalid() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_CONTENT_POLL_INTERVAL_MS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TILESCRAPE_CONTENT_POLL_INTERVAL_MS"),
        "expected InvalidEnvVar(TILESCRAPE_CONTENT_POLL_INTERVAL_MS), got: {result:?}"
    );
}

#[test]
fn zero_nav_poll_interval_is_invalid() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_NAV_POLL_INTERVAL_MS", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn scroll_tuning_overrides() {
    let mut map = HashMap::new();
    map.insert("TILESCRAPE_WARMUP_PASSES", "0");
    map.insert("TILESCRAPE_WARMUP_DELAY_MS", "50");
    map.insert("TILESCRAPE_SCROLL_STEP_PX", "600");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.warmup_passes, 0);
    assert_eq!(cfg.warmup_delay_ms, 50);
    assert_eq!(cfg.scroll_step_px, 600);
}
