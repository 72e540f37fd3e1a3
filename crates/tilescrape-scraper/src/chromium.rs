//! Chromium implementation of [`Browser`] via chromiumoxide.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;

use crate::error::ScraperError;
use crate::tab::{Browser, ListingTab};

/// Browser launch settings.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Explicit browser binary; looked up on `PATH` when `None`.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    /// Profile directory, so an existing signed-in session can be reused.
    pub user_data_dir: Option<PathBuf>,
}

/// Find a Chrome/Chromium binary, preferring `explicit` when it exists.
#[must_use]
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!(path = %path.display(), "configured browser path does not exist; searching PATH");
    }

    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A launched Chromium instance with its CDP event loop.
pub struct ChromiumBrowser {
    browser: CdpBrowser,
    handler: tokio::task::JoinHandle<()>,
}

impl ChromiumBrowser {
    /// Launch Chromium and spawn the CDP handler task.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::BrowserNotFound`] if no binary can be located,
    /// or [`ScraperError::Launch`] if the process fails to start.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, ScraperError> {
        let executable =
            find_chromium(options.executable.as_deref()).ok_or(ScraperError::BrowserNotFound)?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .window_size(1440, 1000);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(dir) = &options.user_data_dir {
            builder = builder.user_data_dir(dir);
        }
        let config = builder
            .build()
            .map_err(|reason| ScraperError::Launch { reason })?;

        let (browser, mut handler) =
            CdpBrowser::launch(config)
                .await
                .map_err(|e| ScraperError::Launch {
                    reason: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser handler event error");
                }
            }
        });

        tracing::info!(headless = options.headless, "browser launched");
        Ok(Self { browser, handler })
    }

    /// Close the browser process. Errors are logged and otherwise ignored.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "browser close failed; ignoring");
        }
        self.handler.abort();
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    type Tab = ChromiumTab;

    async fn open_tab(&self, url: &str) -> Result<ChromiumTab, ScraperError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| ScraperError::OpenTab {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(ChromiumTab { page })
    }
}

/// A single Chromium page.
pub struct ChromiumTab {
    page: Page,
}

impl ChromiumTab {
    async fn run_script(&self, context: &'static str, script: &str) -> Result<(), ScraperError> {
        self.page
            .evaluate(script)
            .await
            .map(|_| ())
            .map_err(|e| ScraperError::Script {
                context,
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ListingTab for ChromiumTab {
    async fn goto(&mut self, url: &str) -> Result<(), ScraperError> {
        self.page
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| ScraperError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn content(&self) -> Result<String, ScraperError> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| ScraperError::Script {
                context: "read DOM",
                reason: e.to_string(),
            })?;

        result.into_value::<String>().map_err(|e| ScraperError::Script {
            context: "read DOM",
            reason: e.to_string(),
        })
    }

    async fn scroll_by(&self, pixels: u32) -> Result<(), ScraperError> {
        self.run_script("scroll", &format!("window.scrollBy(0, {pixels})"))
            .await
    }

    async fn scroll_to_top(&self) -> Result<(), ScraperError> {
        self.run_script("scroll to top", "window.scrollTo(0, 0)").await
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| ScraperError::CloseTab {
                reason: e.to_string(),
            })
    }
}
