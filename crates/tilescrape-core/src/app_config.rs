use std::path::PathBuf;

/// Process-level settings read from the environment.
///
/// Per-run input lives in [`crate::RunConfiguration`]; this struct carries
/// browser launch options, the export path, and the timing knobs the
/// readiness waiter and scroll driver use.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub chromium_path: Option<PathBuf>,
    pub headless: bool,
    pub user_data_dir: Option<PathBuf>,
    pub output_path: PathBuf,
    pub nav_settle_ms: u64,
    pub nav_poll_interval_ms: u64,
    pub nav_poll_retries: u32,
    pub nav_fallback_delay_ms: u64,
    pub content_timeout_secs: u64,
    pub content_poll_interval_ms: u64,
    pub warmup_passes: u32,
    pub warmup_delay_ms: u64,
    pub scroll_step_px: u32,
}
