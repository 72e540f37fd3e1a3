//! Pagination and scroll driver.
//!
//! Owns one tab for the whole run. Paged mode visits each page by URL and
//! extracts once per page; infinite-scroll mode scrolls a single page per
//! its [`ScrollPolicy`] and extracts once. Nothing inside a page is fatal:
//! readiness timeouts, navigation failures, and DOM read errors are logged,
//! recorded on that page's [`PageOutcome`], and the run moves on.

use std::time::Duration;

use tilescrape_core::{
    AppConfig, ListingMode, MergedRecord, RawTileRecord, RunConfiguration, ScrollPolicy,
    TypeAllowList,
};

use crate::error::ScraperError;
use crate::extract::extract_tiles;
use crate::merge::merge_records;
use crate::pagination::{page_url, CacheBuster};
use crate::readiness::{tile_count, wait_for_page, wait_for_tiles, PollPolicy, ReadinessTiming};
use crate::tab::{Browser, ListingTab};

/// Timing knobs for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTiming {
    pub readiness: ReadinessTiming,
    /// Short scroll passes before each paged-mode extraction to trigger
    /// lazy-loaded tiles.
    pub warmup_passes: u32,
    pub warmup_delay: Duration,
    pub scroll_step_px: u32,
}

impl Default for DriverTiming {
    fn default() -> Self {
        Self {
            readiness: ReadinessTiming::default(),
            warmup_passes: 3,
            warmup_delay: Duration::from_millis(400),
            scroll_step_px: 1000,
        }
    }
}

impl DriverTiming {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            readiness: ReadinessTiming {
                nav_settle: Duration::from_millis(config.nav_settle_ms),
                nav_poll: PollPolicy::with_retries(
                    Duration::from_millis(config.nav_poll_interval_ms),
                    config.nav_poll_retries,
                ),
                nav_fallback: Duration::from_millis(config.nav_fallback_delay_ms),
                content_poll: PollPolicy::new(
                    Duration::from_millis(config.content_poll_interval_ms),
                    Duration::from_secs(config.content_timeout_secs),
                ),
            },
            warmup_passes: config.warmup_passes,
            warmup_delay: Duration::from_millis(config.warmup_delay_ms),
            scroll_step_px: config.scroll_step_px,
        }
    }
}

/// What happened on one page (paged mode) or the single scroll pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutcome {
    /// Page number; `None` for infinite-scroll mode.
    pub page: Option<u32>,
    /// Whether the pagination marker showed the target page. `None` when no
    /// marker wait applies.
    pub navigation_ready: Option<bool>,
    pub content_ready: bool,
    pub tiles_seen: usize,
    pub records_kept: usize,
    pub error: Option<String>,
}

impl PageOutcome {
    /// Human-readable label used in logs and summaries.
    #[must_use]
    pub fn label(&self) -> String {
        match self.page {
            Some(page) => format!("page {page}"),
            None => "scroll".to_string(),
        }
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Merged records in first-seen order.
    pub records: Vec<MergedRecord>,
    pub pages: Vec<PageOutcome>,
    /// Records extracted across all pages before merging.
    pub raw_count: usize,
}

impl ScrapeReport {
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.records.len()
    }

    /// Pages that recorded an error.
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages.iter().filter(|p| p.error.is_some())
    }
}

/// Runs one scrape against `browser` and merges the results.
///
/// The tab is closed before returning, whether or not the run succeeded.
///
/// # Errors
///
/// Returns [`ScraperError`] only when the run cannot start: the page URL
/// cannot be built or the tab cannot be opened. Per-page failures are
/// reported in [`ScrapeReport::pages`].
pub async fn run_scrape<B>(
    browser: &B,
    config: &RunConfiguration,
    timing: &DriverTiming,
) -> Result<ScrapeReport, ScraperError>
where
    B: Browser,
{
    let mut buster = CacheBuster::new();
    let first_url = match config.mode {
        ListingMode::Paged { start_page, .. } => {
            page_url(&config.base_url, start_page, buster.next_stamp())?
        }
        ListingMode::InfiniteScroll { .. } => config.base_url.clone(),
    };

    tracing::info!(
        url = %first_url,
        extractions = config.planned_extractions(),
        allow_list = %config.allow_list,
        "starting scrape"
    );
    let mut tab = browser.open_tab(&first_url).await?;

    let result = drive(&mut tab, config, timing, &mut buster).await;

    if let Err(e) = tab.close().await {
        tracing::debug!(error = %e, "tab close failed; ignoring");
    }

    let (raw, pages) = result?;
    let raw_count = raw.len();
    let records = merge_records(raw);
    tracing::info!(
        pages = pages.len(),
        raw = raw_count,
        merged = records.len(),
        "scrape complete"
    );

    Ok(ScrapeReport {
        records,
        pages,
        raw_count,
    })
}

async fn drive<T>(
    tab: &mut T,
    config: &RunConfiguration,
    timing: &DriverTiming,
    buster: &mut CacheBuster,
) -> Result<(Vec<RawTileRecord>, Vec<PageOutcome>), ScraperError>
where
    T: ListingTab,
{
    let mut raw = Vec::new();
    let mut pages = Vec::new();

    match config.mode {
        ListingMode::Paged {
            start_page,
            end_page,
        } => {
            for page in start_page..=end_page {
                // The tab was opened on the first page already.
                let url = if page == start_page {
                    None
                } else {
                    Some(page_url(&config.base_url, page, buster.next_stamp())?)
                };
                let outcome =
                    scrape_page(tab, page, url.as_deref(), &config.allow_list, timing, &mut raw)
                        .await;
                pages.push(outcome);
            }
        }
        ListingMode::InfiniteScroll { policy } => {
            let outcome =
                scrape_scrolled(&*tab, policy, &config.allow_list, timing, &mut raw).await;
            pages.push(outcome);
        }
    }

    Ok((raw, pages))
}

async fn scrape_page<T>(
    tab: &mut T,
    page: u32,
    url: Option<&str>,
    allow_list: &TypeAllowList,
    timing: &DriverTiming,
    raw: &mut Vec<RawTileRecord>,
) -> PageOutcome
where
    T: ListingTab,
{
    let mut outcome = PageOutcome {
        page: Some(page),
        ..PageOutcome::default()
    };

    if let Some(url) = url {
        tracing::debug!(page, url, "navigating");
        if let Err(e) = tab.goto(url).await {
            tracing::warn!(page, error = %e, "navigation failed; skipping page");
            outcome.error = Some(e.to_string());
            return outcome;
        }
    }

    let tab = &*tab;
    outcome.navigation_ready = Some(wait_for_page(tab, page, &timing.readiness).await.is_ready());
    outcome.content_ready = wait_for_tiles(tab, timing.readiness.content_poll)
        .await
        .is_ready();

    for _ in 0..timing.warmup_passes {
        if !scroll_pass(tab, timing.scroll_step_px, timing.warmup_delay).await {
            break;
        }
    }
    if let Err(e) = tab.scroll_to_top().await {
        tracing::debug!(page, error = %e, "scroll reset failed");
    }

    extract_into(tab, allow_list, &mut outcome, raw).await;
    outcome
}

async fn scrape_scrolled<T>(
    tab: &T,
    policy: ScrollPolicy,
    allow_list: &TypeAllowList,
    timing: &DriverTiming,
    raw: &mut Vec<RawTileRecord>,
) -> PageOutcome
where
    T: ListingTab,
{
    let mut outcome = PageOutcome::default();

    tokio::time::sleep(timing.readiness.nav_settle).await;

    match policy {
        ScrollPolicy::FixedPasses { passes, delay_ms } => {
            let delay = Duration::from_millis(delay_ms);
            for pass in 1..=passes {
                tracing::debug!(pass, passes, "scroll pass");
                if !scroll_pass(tab, timing.scroll_step_px, delay).await {
                    break;
                }
            }
        }
        ScrollPolicy::UntilStable {
            max_passes,
            delay_ms,
            stable_passes,
        } => {
            scroll_until_stable(tab, timing.scroll_step_px, max_passes, delay_ms, stable_passes)
                .await;
        }
    }

    if let Err(e) = tab.scroll_to_top().await {
        tracing::debug!(error = %e, "scroll reset failed");
    }

    outcome.content_ready = wait_for_tiles(tab, timing.readiness.content_poll)
        .await
        .is_ready();
    extract_into(tab, allow_list, &mut outcome, raw).await;
    outcome
}

async fn scroll_until_stable<T>(
    tab: &T,
    step_px: u32,
    max_passes: u32,
    delay_ms: u64,
    stable_passes: u32,
) where
    T: ListingTab,
{
    let delay = Duration::from_millis(delay_ms);
    let mut last = tile_count(tab).await.unwrap_or(0);
    let mut unchanged = 0u32;

    for pass in 1..=max_passes {
        if !scroll_pass(tab, step_px, delay).await {
            return;
        }
        let count = tile_count(tab).await.unwrap_or(last);
        if count > last {
            tracing::debug!(pass, tiles = count, "tile count grew");
            last = count;
            unchanged = 0;
        } else {
            unchanged += 1;
            if unchanged >= stable_passes {
                tracing::debug!(pass, tiles = count, "tile count stable; stopping scroll");
                return;
            }
        }
    }
    tracing::debug!(max_passes, tiles = last, "scroll pass limit reached");
}

/// One scroll step followed by `delay`. Returns `false` if the scroll failed.
async fn scroll_pass<T>(tab: &T, step_px: u32, delay: Duration) -> bool
where
    T: ListingTab,
{
    if let Err(e) = tab.scroll_by(step_px).await {
        tracing::warn!(error = %e, "scroll failed; ending scroll sequence");
        return false;
    }
    tokio::time::sleep(delay).await;
    true
}

async fn extract_into<T>(
    tab: &T,
    allow_list: &TypeAllowList,
    outcome: &mut PageOutcome,
    raw: &mut Vec<RawTileRecord>,
) where
    T: ListingTab,
{
    let html = match tab.content().await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(page = %outcome.label(), error = %e, "could not read page; no records");
            outcome.error = Some(e.to_string());
            return;
        }
    };

    let extraction = extract_tiles(&html, allow_list);
    outcome.tiles_seen = extraction.tiles_seen;
    outcome.records_kept = extraction.records.len();
    tracing::info!(
        page = %outcome.label(),
        tiles = extraction.tiles_seen,
        kept = extraction.records.len(),
        skipped = extraction.skipped,
        filtered = extraction.filtered,
        "extracted"
    );
    raw.extend(extraction.records);
}
