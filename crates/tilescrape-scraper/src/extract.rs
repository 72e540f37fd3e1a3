//! Tile extraction from a rendered listing page.
//!
//! Works on an HTML snapshot of the live DOM so the same code serves the
//! browser driver and offline extraction of saved pages. Nothing here mutates
//! the page.

use scraper::{ElementRef, Html};
use tilescrape_core::{RawTileRecord, TypeAllowList};

use crate::classify::classify_title;
use crate::image_url::normalize_image_url;
use crate::selectors::{ASIN_ATTR, IMAGE, PAGINATION_SELECTED, TILE, TITLE_LINK};

/// Result of one extraction pass over a page snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileExtraction {
    /// Records that passed every filter, in DOM order.
    pub records: Vec<RawTileRecord>,
    /// Tile nodes found on the page.
    pub tiles_seen: usize,
    /// Tiles missing a title link or image, or with a blank title or image.
    pub skipped: usize,
    /// Well-formed tiles whose type is not on the allow-list.
    pub filtered: usize,
}

/// Extracts product records from every tile in `html`.
///
/// Tiles without both a title link and an image are skipped silently, as
/// are tiles whose trimmed title or normalized image URL is empty. Records
/// whose classified type is not permitted by `allow_list` are dropped.
#[must_use]
pub fn extract_tiles(html: &str, allow_list: &TypeAllowList) -> TileExtraction {
    let document = Html::parse_document(html);
    let mut extraction = TileExtraction::default();

    for tile in document.select(&TILE) {
        extraction.tiles_seen += 1;

        let Some(record) = read_tile(tile) else {
            extraction.skipped += 1;
            continue;
        };

        if !allow_list.permits(record.product_type) {
            extraction.filtered += 1;
            continue;
        }
        extraction.records.push(record);
    }

    tracing::debug!(
        tiles = extraction.tiles_seen,
        kept = extraction.records.len(),
        skipped = extraction.skipped,
        filtered = extraction.filtered,
        "extracted tiles"
    );
    extraction
}

fn read_tile(tile: ElementRef<'_>) -> Option<RawTileRecord> {
    let asin = tile
        .value()
        .attr(ASIN_ATTR)
        .unwrap_or_default()
        .trim()
        .to_string();

    let (Some(link), Some(image)) = (tile.select(&TITLE_LINK).next(), tile.select(&IMAGE).next())
    else {
        tracing::debug!(asin = %asin, "skipping tile without title link or image");
        return None;
    };

    let title = collapse_whitespace(&link.text().collect::<String>());
    let raw_src = image.value().attr("src").unwrap_or_default().trim();
    let image_url = normalize_image_url(raw_src).trim().to_string();
    if title.is_empty() || image_url.is_empty() {
        tracing::debug!(asin = %asin, "skipping tile with blank title or image");
        return None;
    }

    let product_type = classify_title(&title);

    Some(RawTileRecord {
        title,
        image_url,
        asin,
        product_type,
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of product tiles currently in the DOM.
#[must_use]
pub fn count_tiles(html: &str) -> usize {
    Html::parse_document(html).select(&TILE).count()
}

/// Text of the highlighted pagination item, if the strip is rendered.
#[must_use]
pub fn selected_page_marker(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&PAGINATION_SELECTED)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
