//! Canonicalization of listing image URLs.
//!
//! Listing thumbnails on the media host often carry a composite filename of
//! the form `<background>|<design>.png`, percent-encoded as `%7C`, plus
//! rendering suffixes. The canonical image is the design file after the last
//! pipe; without a pipe it is the last underscore-delimited segment.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

const MEDIA_HOST: &str = "m.media-amazon.com";
const IMAGE_FOLDER: &str = "/images/I/";
const IMAGE_EXTENSION: &str = ".png";

/// Characters re-encoded when the canonical filename is written back into a path.
const FILENAME_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Returns the canonical form of `raw`, or `raw` unchanged when it is not a
/// media-host image URL of the expected shape. Never fails.
#[must_use]
pub fn normalize_image_url(raw: &str) -> String {
    match canonical_image_url(raw) {
        Some(canonical) => canonical,
        None => raw.to_string(),
    }
}

/// `None` means "leave the URL alone".
fn canonical_image_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?;
    if !host.eq_ignore_ascii_case(MEDIA_HOST) {
        return None;
    }

    let path = parsed.path();
    let folder_at = path.find(IMAGE_FOLDER)?;
    let file_part = &path[folder_at + IMAGE_FOLDER.len()..];
    let last_component = file_part.rsplit('/').next()?;
    if !has_image_extension(last_component) {
        return None;
    }

    let decoded = percent_decode_str(last_component).decode_utf8().ok()?;
    let canonical = match decoded.rsplit_once('|') {
        Some((_, design)) => design,
        None => decoded.rsplit('_').next()?,
    };
    if !is_plausible_filename(canonical) {
        tracing::debug!(url = raw, candidate = canonical, "image filename not recognised; keeping original");
        return None;
    }

    Some(format!(
        "{}://{}{}{}",
        parsed.scheme(),
        host,
        IMAGE_FOLDER,
        utf8_percent_encode(canonical, FILENAME_ENCODE_SET)
    ))
}

fn has_image_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(IMAGE_EXTENSION)
}

/// A filename with a non-empty stem and the expected extension.
fn is_plausible_filename(name: &str) -> bool {
    has_image_extension(name) && name.len() > IMAGE_EXTENSION.len() && !name.contains('/')
}
