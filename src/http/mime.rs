//! Content-type detection for served files.

use std::path::Path;

use crate::http::response::{OCTET_STREAM, TEXT_PLAIN};

/// Returns the content type for a file: `text/plain` for `.txt`, otherwise
/// `application/octet-stream`.
///
/// The extension match is case-sensitive.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => TEXT_PLAIN,
        _ => OCTET_STREAM,
    }
}
