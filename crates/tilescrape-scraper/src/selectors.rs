//! CSS selectors for the listing DOM.
//!
//! The listing is a search-results grid; update these when the site changes
//! its markup and add a fixture to the extractor tests.

use std::sync::LazyLock;

use scraper::Selector;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// One product tile in the results grid.
pub static TILE: LazyLock<Selector> =
    LazyLock::new(|| selector("div[data-component-type='s-search-result']"));

/// Identifier attribute on the tile element.
pub const ASIN_ATTR: &str = "data-asin";

/// Title link. Older markup nests the link in the heading, newer markup
/// nests the heading in the link.
pub static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("h2 a, a h2"));

/// Tile thumbnail.
pub static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector("img.s-image, .s-product-image-container img"));

/// The highlighted page number in the pagination strip.
pub static PAGINATION_SELECTED: LazyLock<Selector> =
    LazyLock::new(|| selector(".s-pagination-selected"));
