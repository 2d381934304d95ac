//! Resize pipeline error types
//!
//! Provides structured error handling with HTTP status mapping. All
//! per-request failures surface through this enum; nothing in the pipeline
//! panics or terminates the process on bad input.

use std::fmt;

/// Errors that can occur while decoding, resizing, or encoding an image
#[derive(Debug)]
pub enum ImageError {
    // === Decoding errors ===
    /// Input bytes are malformed or not a recognizable image
    DecodeFailure { message: String },
    /// Input format was recognized but is not in the supported decode set
    UnsupportedInputFormat { format: String },

    // === Dispatch errors ===
    /// Output extension has no registered encoder
    UnsupportedOutputFormat { extension: String },

    // === Geometry errors ===
    /// Source or target dimensions are degenerate
    InvalidGeometry {
        width: u32,
        height: u32,
        reason: String,
    },

    // === Encoding errors ===
    /// Encoder-internal failure writing the artifact
    EncodeFailure { format: String, message: String },
    /// Cannot create/write/read the transient output artifact
    TransientStorage(std::io::Error),

    /// Broken internal invariant (buffer size mismatch and the like)
    Internal { message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::DecodeFailure { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::UnsupportedInputFormat { format } => {
                write!(f, "Unsupported input format: {}", format)
            }
            ImageError::UnsupportedOutputFormat { extension } => {
                write!(f, "Unsupported output format: {:?}", extension)
            }
            ImageError::InvalidGeometry {
                width,
                height,
                reason,
            } => {
                write!(f, "Invalid geometry {}x{}: {}", width, height, reason)
            }
            ImageError::EncodeFailure { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
            ImageError::TransientStorage(err) => {
                write!(f, "Transient storage failure: {}", err)
            }
            ImageError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::TransientStorage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::TransientStorage(err)
    }
}

impl ImageError {
    /// Maps pipeline errors to HTTP status codes
    ///
    /// Status mapping:
    /// - DecodeFailure, InvalidGeometry → 400 (Bad Request)
    /// - UnsupportedInputFormat, UnsupportedOutputFormat → 415 (Unsupported Media Type)
    /// - EncodeFailure, TransientStorage, Internal → 500 (Internal Server Error)
    pub fn to_http_status(&self) -> u16 {
        match self {
            ImageError::DecodeFailure { .. } | ImageError::InvalidGeometry { .. } => 400,

            ImageError::UnsupportedInputFormat { .. }
            | ImageError::UnsupportedOutputFormat { .. } => 415,

            ImageError::EncodeFailure { .. }
            | ImageError::TransientStorage(_)
            | ImageError::Internal { .. } => 500,
        }
    }

    /// Helper constructors for common error patterns
    pub fn decode_failure(message: impl Into<String>) -> Self {
        ImageError::DecodeFailure {
            message: message.into(),
        }
    }

    pub fn unsupported_input(format: impl Into<String>) -> Self {
        ImageError::UnsupportedInputFormat {
            format: format.into(),
        }
    }

    pub fn unsupported_output(extension: impl Into<String>) -> Self {
        ImageError::UnsupportedOutputFormat {
            extension: extension.into(),
        }
    }

    pub fn invalid_geometry(width: u32, height: u32, reason: impl Into<String>) -> Self {
        ImageError::InvalidGeometry {
            width,
            height,
            reason: reason.into(),
        }
    }

    pub fn encode_failure(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailure {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ImageError::Internal {
            message: message.into(),
        }
    }
}
