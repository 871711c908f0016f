//! Local image files turned into `data:` URLs.
//!
//! The store treats images as opaque strings. A picked file is read once,
//! base64-encoded and embedded in the moment as a data URL.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encode raw bytes as `data:{mime};base64,...`.
#[must_use]
pub fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Guess a MIME type from the file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Read `path` and return it as a data URL.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn read_image_file(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "image file read");
    Ok(image_data_url(mime_for_path(path), &bytes))
}

#[cfg(test)]
#[path = "image_test.rs"]
mod tests;
