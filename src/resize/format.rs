//! Format detection
//!
//! Output format is selected from the uploaded filename's extension; the
//! decode format is never taken from the extension but resolved by
//! magic-byte inspection of the actual bytes. Content-type sniffing for the
//! response also runs over real bytes (the leading bytes of the encoded
//! artifact), never over the filename.

use std::path::Path;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    /// Resolve an output format from a file extension.
    ///
    /// A leading dot is accepted and matching is case-insensitive, so
    /// `"jpg"`, `".jpg"` and `".JPG"` all resolve to JPEG. Returns `None`
    /// for anything outside the supported encoder set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(Self::Jpeg)
        } else if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else if ext.eq_ignore_ascii_case("gif") {
            Some(Self::Gif)
        } else {
            None
        }
    }
}

/// Extract the extension from a filename, case preserved as provided.
pub fn file_extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|e| e.to_str())
}

/// Whether the filename routes the upload to the animated decode path.
pub fn is_animated_extension(filename: &str) -> bool {
    file_extension(filename)
        .map(|e| e.eq_ignore_ascii_case("gif"))
        .unwrap_or(false)
}

/// Sniff a MIME type from a byte stream's leading bytes.
///
/// Covers the formats this service can produce; anything else falls back to
/// `application/octet-stream`.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else {
        "application/octet-stream"
    }
}
