// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default maximum upload size (10 MB)
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

// =============================================================================
// Resize defaults
// =============================================================================

/// Default target width for the fixed-width sizing policy
pub const DEFAULT_TARGET_WIDTH: u32 = 1000;

/// Default divisor for the fractional sizing policy (half scale)
pub const DEFAULT_SCALE_DIVISOR: u32 = 2;

/// Default JPEG encoding quality
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

// =============================================================================
// GIF palette limits
// =============================================================================

/// Maximum number of colors a GIF frame palette may hold
pub const MAX_PALETTE_COLORS: usize = 256;

/// Alpha values below this threshold map to the transparent palette entry
pub const ALPHA_OPAQUE_THRESHOLD: u8 = 128;

// =============================================================================
// Output artifact
// =============================================================================

/// Encoded output stays in memory up to this size, then spills to a temp file
pub const ARTIFACT_SPOOL_THRESHOLD: usize = 4 * 1024 * 1024;

/// Number of leading bytes inspected when sniffing the output content type
pub const CONTENT_SNIFF_LEN: usize = 512;
