//! Stored-name generation.
//!
//! Format: `{base}_{yyyyMMddHHmmss}{ext}`, or `{base}_{yyyyMMddHHmmss}_{token}{ext}`
//! when a collision forces a token. `base` is the original file name without
//! directories or extension, with characters that are illegal in blob names
//! replaced by `-` and cut to [`MAX_BASE_NAME_CHARS`] characters.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Longest base name kept, in characters.
pub const MAX_BASE_NAME_CHARS: usize = 100;

/// UTC timestamp layout appended to every stored name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Characters left as-is in blob URLs
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const ILLEGAL_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Last path component of a client-supplied name. Both separators count,
/// since browsers on Windows may send `C:\Users\me\photo.png`.
pub fn file_name_only(original: &str) -> &str {
    original.rsplit(['/', '\\']).next().unwrap_or(original)
}

/// Split a file name into base and extension (with its dot). The last dot
/// starts the extension, so `.png` is an empty base with extension `.png`.
/// A trailing dot is dropped and yields no extension.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx + 1 == file_name.len() => (&file_name[..idx], ""),
        Some(idx) => file_name.split_at(idx),
        None => (file_name, ""),
    }
}

fn is_illegal(c: char) -> bool {
    c.is_ascii_control() || ILLEGAL_CHARS.contains(&c)
}

/// Replace illegal characters with hyphens and cap the length.
pub fn sanitize_base_name(base: &str) -> String {
    base.chars()
        .map(|c| if is_illegal(c) { '-' } else { c })
        .take(MAX_BASE_NAME_CHARS)
        .collect()
}

/// Build the stored name for `original` at time `at`.
///
/// Deterministic for a given `(original, at, token)`; pass a token only after
/// the token-less name was found to exist.
pub fn generate_stored_name(original: &str, at: DateTime<Utc>, token: Option<&str>) -> String {
    let (base, extension) = split_extension(file_name_only(original));
    let base = sanitize_base_name(base);
    let timestamp = at.format(TIMESTAMP_FORMAT);

    match token {
        Some(token) => format!("{}_{}_{}{}", base, timestamp, token, extension),
        None => format!("{}_{}{}", base, timestamp, extension),
    }
}

/// Percent-encode a stored name for use as the last segment of a blob URL.
pub fn encode_blob_name(name: &str) -> String {
    utf8_percent_encode(name, URL_SAFE).to_string()
}
