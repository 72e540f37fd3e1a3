//! Commands that work without a browser.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tilescrape_core::{ProductType, TypeAllowList};
use tilescrape_scraper::{classify_title, export_json, extract_tiles, merge_records};

/// Extract, merge, and export products from saved listing pages.
///
/// Each file is treated as one page. Unreadable files are logged and
/// skipped.
///
/// # Errors
///
/// Returns an error if every file fails to read or the export cannot be
/// written.
pub(crate) fn run_extract(
    files: &[PathBuf],
    types: Vec<ProductType>,
    output: &Path,
) -> anyhow::Result<()> {
    let allow_list: TypeAllowList = types.into_iter().collect();
    let mut raw = Vec::new();
    let mut failed = 0usize;

    for file in files {
        let html = match std::fs::read_to_string(file) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "skipping unreadable file");
                failed += 1;
                continue;
            }
        };
        let extraction = extract_tiles(&html, &allow_list);
        println!(
            "{}: {} tiles, {} kept",
            file.display(),
            extraction.tiles_seen,
            extraction.records.len()
        );
        raw.extend(extraction.records);
    }

    if failed == files.len() {
        anyhow::bail!("none of the {failed} input files could be read");
    }

    let raw_count = raw.len();
    let records = merge_records(raw);
    export_json(output, &records).context("export failed")?;
    println!(
        "wrote {} products ({raw_count} before dedup) to {}",
        records.len(),
        output.display()
    );
    Ok(())
}

/// Print `<type>\t<title>` for each title.
pub(crate) fn run_classify(titles: &[String]) {
    for title in titles {
        println!("{}\t{title}", classify_title(title));
    }
}
