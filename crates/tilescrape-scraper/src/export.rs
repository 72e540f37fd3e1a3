//! JSON export of merged records.

use std::path::Path;

use tilescrape_core::MergedRecord;

use crate::error::ExportError;

/// Pretty-printed JSON array of `{ "title", "image", "type" }` objects.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if serialization fails.
pub fn to_export_json(records: &[MergedRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes `records` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the write fails. Nothing is
/// retried.
pub fn export_json(path: &Path, records: &[MergedRecord]) -> Result<(), ExportError> {
    let mut json = to_export_json(records)?;
    json.push('\n');
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "export written");
    Ok(())
}
