use serde::{Deserialize, Serialize};

use crate::ProductType;

/// One product tile observed in the rendered listing DOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTileRecord {
    /// Trimmed display title; never empty once extracted.
    pub title: String,
    /// Image URL after normalization.
    pub image_url: String,
    /// Site product identifier (ASIN). Empty when the tile carries none.
    pub asin: String,
    pub product_type: ProductType,
}

/// A record that survived identity dedup and title disambiguation.
///
/// Serializes to the export shape `{ "title", "image", "type" }`; the
/// identifier is not carried past the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// Display title, suffixed with ` (n)` for the n-th repeat of a title.
    pub title: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
}
