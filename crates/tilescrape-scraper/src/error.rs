use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser executable not found; set TILESCRAPE_CHROMIUM_PATH or install Chrome/Chromium")]
    BrowserNotFound,

    #[error("failed to launch browser: {reason}")]
    Launch { reason: String },

    #[error("failed to open tab at {url}: {reason}")]
    OpenTab { url: String, reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("page script failed ({context}): {reason}")]
    Script {
        context: &'static str,
        reason: String,
    },

    #[error("failed to close tab: {reason}")]
    CloseTab { reason: String },

    #[error("cannot build page URL from \"{base_url}\": {reason}")]
    InvalidPageUrl { base_url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
