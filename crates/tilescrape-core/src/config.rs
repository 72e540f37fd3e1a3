use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("TILESCRAPE_LOG_LEVEL", "info");
    let chromium_path = optional_path("TILESCRAPE_CHROMIUM_PATH");
    let headless = parse_bool("TILESCRAPE_HEADLESS", &or_default("TILESCRAPE_HEADLESS", "false"))?;
    let user_data_dir = optional_path("TILESCRAPE_USER_DATA_DIR");
    let output_path = PathBuf::from(or_default("TILESCRAPE_OUTPUT_PATH", "products.json"));

    let nav_settle_ms = parse_u64("TILESCRAPE_NAV_SETTLE_MS", "1500")?;
    let nav_poll_interval_ms = parse_u64("TILESCRAPE_NAV_POLL_INTERVAL_MS", "500")?;
    let nav_poll_retries = parse_u32("TILESCRAPE_NAV_POLL_RETRIES", "20")?;
    let nav_fallback_delay_ms = parse_u64("TILESCRAPE_NAV_FALLBACK_DELAY_MS", "2000")?;
    let content_timeout_secs = parse_u64("TILESCRAPE_CONTENT_TIMEOUT_SECS", "40")?;
    let content_poll_interval_ms = parse_u64("TILESCRAPE_CONTENT_POLL_INTERVAL_MS", "500")?;
    let warmup_passes = parse_u32("TILESCRAPE_WARMUP_PASSES", "3")?;
    let warmup_delay_ms = parse_u64("TILESCRAPE_WARMUP_DELAY_MS", "400")?;
    let scroll_step_px = parse_u32("TILESCRAPE_SCROLL_STEP_PX", "1000")?;

    if content_poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TILESCRAPE_CONTENT_POLL_INTERVAL_MS".to_string(),
            reason: "poll interval must be greater than zero".to_string(),
        });
    }
    if nav_poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TILESCRAPE_NAV_POLL_INTERVAL_MS".to_string(),
            reason: "poll interval must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        chromium_path,
        headless,
        user_data_dir,
        output_path,
        nav_settle_ms,
        nav_poll_interval_ms,
        nav_poll_retries,
        nav_fallback_delay_ms,
        content_timeout_secs,
        content_poll_interval_ms,
        warmup_passes,
        warmup_delay_ms,
        scroll_step_px,
    })
}

/// Parse a boolean flag. Accepts `true`/`false`, `1`/`0`, and `yes`/`no`.
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
