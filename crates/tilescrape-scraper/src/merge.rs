//! Cross-page result merging.
//!
//! Two passes over the accumulated records, in this order: identity dedup
//! (first occurrence per key wins, later ones are discarded whole), then
//! title disambiguation (repeat titles get an occurrence suffix).

use std::collections::{HashMap, HashSet};

use tilescrape_core::{MergedRecord, RawTileRecord};

/// Title given to records whose title is empty at merge time.
pub const UNTITLED: &str = "Untitled";

/// Identity key for a raw record.
///
/// Prefers the product identifier, then the final path segment of the image
/// URL, then the lowercased title paired with the full image URL. Keys carry
/// a kind prefix so an identifier never collides with a filename.
#[must_use]
pub fn identity_key(record: &RawTileRecord) -> String {
    let asin = record.asin.trim();
    if !asin.is_empty() {
        return format!("asin:{asin}");
    }

    let segment = record
        .image_url
        .rsplit('/')
        .next()
        .map(str::trim)
        .unwrap_or_default();
    if !segment.is_empty() {
        return format!("img:{segment}");
    }

    format!(
        "pair:{}|{}",
        record.title.to_lowercase(),
        record.image_url
    )
}

/// Keeps the first record for each identity key, preserving order.
#[must_use]
pub fn dedup_by_identity(records: Vec<RawTileRecord>) -> Vec<RawTileRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(identity_key(record)))
        .collect()
}

/// Suffixes repeat titles with ` (n)` and drops the identifier.
#[must_use]
pub fn disambiguate_titles(records: Vec<RawTileRecord>) -> Vec<MergedRecord> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    records
        .into_iter()
        .map(|record| {
            let base = if record.title.is_empty() {
                UNTITLED.to_string()
            } else {
                record.title
            };
            let count = counts.entry(base.clone()).or_insert(0);
            *count += 1;
            let title = if *count == 1 {
                base
            } else {
                format!("{base} ({count})")
            };
            MergedRecord {
                title,
                image_url: record.image_url,
                product_type: record.product_type,
            }
        })
        .collect()
}

/// Runs identity dedup followed by title disambiguation.
#[must_use]
pub fn merge_records(records: Vec<RawTileRecord>) -> Vec<MergedRecord> {
    let raw = records.len();
    let unique = dedup_by_identity(records);
    tracing::debug!(raw, unique = unique.len(), "identity dedup complete");
    disambiguate_titles(unique)
}
