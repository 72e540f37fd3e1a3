//! Browser and tab abstraction the scroll driver runs against.
//!
//! The driver only needs to navigate, snapshot the rendered DOM, and scroll;
//! [`crate::chromium`] implements these over the Chrome DevTools Protocol and
//! tests substitute an in-memory tab.

use async_trait::async_trait;

use crate::error::ScraperError;

/// A browser that can open listing tabs.
#[async_trait]
pub trait Browser: Send + Sync {
    type Tab: ListingTab;

    /// Open a new tab and load `url` in it.
    async fn open_tab(&self, url: &str) -> Result<Self::Tab, ScraperError>;
}

/// One tab, exclusively owned by a run.
#[async_trait]
pub trait ListingTab: Send + Sync {
    /// Navigate the tab to `url`.
    async fn goto(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Serialized HTML of the current DOM.
    async fn content(&self) -> Result<String, ScraperError>;

    /// Scroll the viewport down by `pixels`.
    async fn scroll_by(&self, pixels: u32) -> Result<(), ScraperError>;

    async fn scroll_to_top(&self) -> Result<(), ScraperError>;

    /// Close the tab. Callers treat failure as best-effort.
    async fn close(&mut self) -> Result<(), ScraperError>;
}
