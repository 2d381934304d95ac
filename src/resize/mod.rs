//! Image resize pipeline
//!
//! The core of the service: decode an uploaded raster image (format
//! resolved from magic bytes), resize it under a configurable sizing
//! policy and kernel, and re-encode it through a registry of encoders
//! selected by the upload's file extension. Animated GIFs are resized
//! frame by frame with their palettes rebuilt from the resized pixels.

pub mod animated;
pub mod artifact;
pub mod encoder;
pub mod error;
pub mod format;
pub mod palette;
pub mod policy;
pub mod processor;
pub mod still;

// Re-export commonly used types
pub use artifact::EncodedOutput;
pub use encoder::{EncoderRegistry, ImageEncoder, ResizedImage};
pub use error::ImageError;
pub use format::OutputFormat;
pub use palette::{AnimatedImage, Frame, Palette};
pub use policy::{ResizeKernel, SizePolicy};
pub use processor::ResizeService;
