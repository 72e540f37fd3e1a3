//! Page URL construction for paged listings.
//!
//! Each page is addressed by setting `page=<n>` on the base listing URL. A
//! cache-busting `_ts=<millis>` parameter is added so the client-rendered
//! listing does not serve a stale page from cache; stamps are strictly
//! increasing within a run.

use url::Url;

use crate::error::ScraperError;

pub const PAGE_PARAM: &str = "page";
pub const CACHE_BUST_PARAM: &str = "_ts";

/// Builds the absolute URL of `page`, replacing any existing `page` or `_ts`
/// parameter and preserving all other query pairs in order.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidPageUrl`] if `base_url` is not an absolute URL.
pub fn page_url(base_url: &str, page: u32, stamp: i64) -> Result<String, ScraperError> {
    let mut url = Url::parse(base_url.trim()).map_err(|e| ScraperError::InvalidPageUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != PAGE_PARAM && k != CACHE_BUST_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(PAGE_PARAM, &page.to_string());
        pairs.append_pair(CACHE_BUST_PARAM, &stamp.to_string());
    }

    Ok(url.to_string())
}

/// Reads the `page` parameter back out of a page URL.
#[must_use]
pub fn page_number(url: &str) -> Option<u32> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == PAGE_PARAM)
        .and_then(|(_, v)| v.parse().ok())
}

/// Source of strictly increasing cache-busting stamps.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: i64,
}

impl CacheBuster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current wall-clock millis, bumped past the previous stamp if the
    /// clock has not advanced.
    pub fn next_stamp(&mut self) -> i64 {
        self.next_after(chrono::Utc::now().timestamp_millis())
    }

    fn next_after(&mut self, now_ms: i64) -> i64 {
        let stamp = now_ms.max(self.last.saturating_add(1));
        self.last = stamp;
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_page_and_stamp_to_existing_query() {
        let url = page_url("https://www.amazon.com/s?k=cat+shirt&rh=n%3A7141123011", 3, 1_700_000_000_000)
            .unwrap();
        assert_eq!(
            url,
            "https://www.amazon.com/s?k=cat+shirt&rh=n%3A7141123011&page=3&_ts=1700000000000"
        );
    }

    #[test]
    fn replaces_existing_page_and_stamp() {
        let url = page_url("https://www.amazon.com/s?page=9&k=dog&_ts=5", 2, 42).unwrap();
        assert_eq!(url, "https://www.amazon.com/s?k=dog&page=2&_ts=42");
    }

    #[test]
    fn works_without_existing_query() {
        let url = page_url("https://example.com/listing", 1, 7).unwrap();
        assert_eq!(url, "https://example.com/listing?page=1&_ts=7");
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = page_url("/s?k=cat", 1, 1).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidPageUrl { .. }));
    }

    #[test]
    fn page_number_reads_back_page_param() {
        let url = page_url("https://example.com/s?k=x", 12, 1).unwrap();
        assert_eq!(page_number(&url), Some(12));
        assert_eq!(page_number("https://example.com/s?k=x"), None);
        assert_eq!(page_number("not a url"), None);
    }

    #[test]
    fn cache_buster_is_strictly_increasing_when_clock_stalls() {
        let mut buster = CacheBuster::new();
        assert_eq!(buster.next_after(1000), 1000);
        assert_eq!(buster.next_after(1000), 1001);
        assert_eq!(buster.next_after(999), 1002);
        assert_eq!(buster.next_after(5000), 5000);
    }

    #[test]
    fn cache_buster_tracks_wall_clock() {
        let mut buster = CacheBuster::new();
        let a = buster.next_stamp();
        let b = buster.next_stamp();
        assert!(b > a);
        assert!(a > 1_600_000_000_000);
    }
}
