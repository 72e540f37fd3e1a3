//! Page readiness polling.
//!
//! The listing is client-rendered, so completion of a navigation or scroll is
//! not observable directly. Readiness is approximated by polling DOM side
//! effects with [`poll_until`]. A timeout is never an error: callers log it
//! and proceed with whatever the DOM holds.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::extract::{count_tiles, selected_page_marker};
use crate::tab::ListingTab;

/// Fixed-interval polling bounded by a total timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    #[must_use]
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Policy that allows `retries` waits of `interval` after the first probe.
    #[must_use]
    pub fn with_retries(interval: Duration, retries: u32) -> Self {
        Self {
            interval,
            timeout: interval.saturating_mul(retries),
        }
    }
}

/// How a [`poll_until`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready { attempts: u32, elapsed: Duration },
    TimedOut { attempts: u32, elapsed: Duration },
}

impl PollOutcome {
    #[must_use]
    pub fn is_ready(self) -> bool {
        matches!(self, PollOutcome::Ready { .. })
    }

    #[must_use]
    pub fn attempts(self) -> u32 {
        match self {
            PollOutcome::Ready { attempts, .. } | PollOutcome::TimedOut { attempts, .. } => {
                attempts
            }
        }
    }
}

/// Probes `predicate` immediately and then every `policy.interval` until it
/// returns `true` or `policy.timeout` has elapsed. A final probe always runs
/// at the deadline.
pub async fn poll_until<F, Fut>(policy: PollPolicy, mut predicate: F) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if predicate().await {
            return PollOutcome::Ready {
                attempts,
                elapsed: started.elapsed(),
            };
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.timeout {
            return PollOutcome::TimedOut { attempts, elapsed };
        }

        tracing::debug!(attempts, elapsed_ms = elapsed.as_millis(), "readiness probe not satisfied");
        let remaining = policy.timeout - elapsed;
        tokio::time::sleep(policy.interval.min(remaining)).await;
    }
}

/// Timing for navigation and content readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessTiming {
    /// Pause after requesting navigation before the first marker probe.
    pub nav_settle: Duration,
    pub nav_poll: PollPolicy,
    /// Extra pause when the pagination marker never shows the target page.
    pub nav_fallback: Duration,
    pub content_poll: PollPolicy,
}

impl Default for ReadinessTiming {
    fn default() -> Self {
        Self {
            nav_settle: Duration::from_millis(1500),
            nav_poll: PollPolicy::with_retries(Duration::from_millis(500), 20),
            nav_fallback: Duration::from_millis(2000),
            content_poll: PollPolicy::new(Duration::from_millis(500), Duration::from_secs(40)),
        }
    }
}

/// Waits for the pagination strip to highlight `page`.
///
/// On timeout, waits `nav_fallback` more and returns the timed-out outcome;
/// the caller extracts from whatever has rendered.
pub async fn wait_for_page<T>(tab: &T, page: u32, timing: &ReadinessTiming) -> PollOutcome
where
    T: ListingTab + ?Sized,
{
    tokio::time::sleep(timing.nav_settle).await;

    let target = page.to_string();
    let target = target.as_str();
    let outcome = poll_until(timing.nav_poll, || async move {
        page_marker_is(tab, target).await
    })
    .await;

    match outcome {
        PollOutcome::Ready { attempts, elapsed } => {
            tracing::debug!(page, attempts, elapsed_ms = elapsed.as_millis(), "pagination marker ready");
        }
        PollOutcome::TimedOut { attempts, elapsed } => {
            tracing::warn!(
                page,
                attempts,
                elapsed_ms = elapsed.as_millis(),
                "pagination marker never showed target page; continuing after fallback delay"
            );
            tokio::time::sleep(timing.nav_fallback).await;
        }
    }
    outcome
}

/// Waits until at least one product tile is in the DOM.
pub async fn wait_for_tiles<T>(tab: &T, policy: PollPolicy) -> PollOutcome
where
    T: ListingTab + ?Sized,
{
    let outcome = poll_until(policy, || async move {
        tile_count(tab).await.is_some_and(|n| n > 0)
    })
    .await;

    if let PollOutcome::TimedOut { attempts, elapsed } = outcome {
        tracing::warn!(
            attempts,
            elapsed_ms = elapsed.as_millis(),
            "no product tiles appeared before timeout; extracting anyway"
        );
    }
    outcome
}

/// Current tile count, or `None` if the DOM could not be read.
pub async fn tile_count<T>(tab: &T) -> Option<usize>
where
    T: ListingTab + ?Sized,
{
    match tab.content().await {
        Ok(html) => Some(count_tiles(&html)),
        Err(e) => {
            tracing::debug!(error = %e, "DOM read failed during readiness probe");
            None
        }
    }
}

async fn page_marker_is<T>(tab: &T, target: &str) -> bool
where
    T: ListingTab + ?Sized,
{
    match tab.content().await {
        Ok(html) => selected_page_marker(&html).as_deref() == Some(target),
        Err(e) => {
            tracing::debug!(error = %e, "DOM read failed during readiness probe");
            false
        }
    }
}
