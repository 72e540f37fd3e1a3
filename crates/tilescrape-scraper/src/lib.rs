pub mod chromium;
pub mod classify;
pub mod driver;
pub mod error;
pub mod export;
pub mod extract;
pub mod image_url;
pub mod merge;
pub mod pagination;
pub mod readiness;
pub mod selectors;
pub mod tab;

pub use chromium::{find_chromium, ChromiumBrowser, ChromiumTab, LaunchOptions};
pub use classify::{classify_optional_title, classify_title};
pub use driver::{run_scrape, DriverTiming, PageOutcome, ScrapeReport};
pub use error::{ExportError, ScraperError};
pub use export::{export_json, to_export_json};
pub use extract::{extract_tiles, TileExtraction};
pub use image_url::normalize_image_url;
pub use merge::merge_records;
pub use readiness::{PollOutcome, PollPolicy, ReadinessTiming};
pub use tab::{Browser, ListingTab};
