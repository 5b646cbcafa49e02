//! MIME utilities for file uploads

use std::path::Path;

/// Best-effort MIME type for an upload, based on its file name.
#[must_use]
pub fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(Path::new(file_name))
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
