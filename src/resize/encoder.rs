//! Encoder dispatch
//!
//! A trait-based encoder registry keyed by output format. The upload
//! handler looks encoders up by file extension; adding a format means
//! registering a new implementation, not editing a branch.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;

use image::RgbaImage;

use super::error::ImageError;
use super::format::OutputFormat;
use super::palette::AnimatedImage;

/// A resized image ready for encoding
pub enum ResizedImage {
    Still(RgbaImage),
    Animated(AnimatedImage),
}

impl ResizedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResizedImage::Still(img) => img.dimensions(),
            ResizedImage::Animated(anim) => (anim.width, anim.height),
        }
    }
}

/// Trait for image encoders
///
/// Implementations serialize a resized image into a byte sink. The trait is
/// object-safe so the registry can hold them behind dynamic dispatch.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Serialize the image into the sink
    fn encode(&self, image: &ResizedImage, out: &mut dyn Write) -> Result<(), ImageError>;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, image: &ResizedImage, out: &mut dyn Write) -> Result<(), ImageError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;

        let img = match image {
            ResizedImage::Still(img) => img,
            ResizedImage::Animated(_) => {
                return Err(ImageError::encode_failure(
                    "jpeg",
                    "animated input cannot be encoded as JPEG",
                ))
            }
        };

        // JPEG has no alpha channel
        let rgb = rgba_to_rgb(img.as_raw());

        let encoder = ImageJpegEncoder::new_with_quality(out, self.quality);
        encoder
            .write_image(&rgb, img.width(), img.height(), image::ColorType::Rgb8)
            .map_err(|e| ImageError::encode_failure("jpeg", e.to_string()))
    }
}

/// PNG encoder using the image crate (lossless)
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, image: &ResizedImage, out: &mut dyn Write) -> Result<(), ImageError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;

        let img = match image {
            ResizedImage::Still(img) => img,
            ResizedImage::Animated(_) => {
                return Err(ImageError::encode_failure(
                    "png",
                    "animated input cannot be encoded as PNG",
                ))
            }
        };

        let encoder = ImagePngEncoder::new(out);
        encoder
            .write_image(img.as_raw(), img.width(), img.height(), image::ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failure("png", e.to_string()))
    }
}

/// GIF encoder writing paletted frames directly
pub struct GifEncoder;

impl ImageEncoder for GifEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Gif
    }

    fn encode(&self, image: &ResizedImage, out: &mut dyn Write) -> Result<(), ImageError> {
        let anim = match image {
            ResizedImage::Animated(anim) => anim,
            ResizedImage::Still(_) => {
                return Err(ImageError::encode_failure(
                    "gif",
                    "still input reaches the GIF encoder only via the animated path",
                ))
            }
        };

        if anim.width > u32::from(u16::MAX) || anim.height > u32::from(u16::MAX) {
            return Err(ImageError::encode_failure(
                "gif",
                format!(
                    "dimensions {}x{} exceed the GIF maximum of 65535",
                    anim.width, anim.height
                ),
            ));
        }

        let mut encoder = gif::Encoder::new(out, anim.width as u16, anim.height as u16, &[])
            .map_err(|e| ImageError::encode_failure("gif", e.to_string()))?;
        encoder
            .set_repeat(anim.repeat)
            .map_err(|e| ImageError::encode_failure("gif", e.to_string()))?;

        for frame in &anim.frames {
            let gif_frame = gif::Frame {
                left: frame.left as u16,
                top: frame.top as u16,
                width: frame.width as u16,
                height: frame.height as u16,
                delay: frame.delay,
                dispose: frame.dispose,
                transparent: frame.palette.transparent_index(),
                palette: Some(frame.palette.to_rgb()),
                buffer: Cow::Borrowed(&frame.indices),
                ..gif::Frame::default()
            };
            encoder
                .write_frame(&gif_frame)
                .map_err(|e| ImageError::encode_failure("gif", e.to_string()))?;
        }

        Ok(())
    }
}

/// Registry mapping output formats to encoder implementations
pub struct EncoderRegistry {
    encoders: HashMap<OutputFormat, Box<dyn ImageEncoder>>,
}

impl EncoderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            encoders: HashMap::new(),
        }
    }

    /// Registry with the standard encoder set (JPEG, PNG, GIF)
    pub fn with_defaults(jpeg_quality: u8) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JpegEncoder::new(jpeg_quality)));
        registry.register(Box::new(PngEncoder));
        registry.register(Box::new(GifEncoder));
        registry
    }

    /// Register an encoder under the format it reports
    pub fn register(&mut self, encoder: Box<dyn ImageEncoder>) {
        self.encoders.insert(encoder.format(), encoder);
    }

    pub fn get(&self, format: OutputFormat) -> Option<&dyn ImageEncoder> {
        self.encoders.get(&format).map(|e| e.as_ref())
    }

    /// Look an encoder up by file extension (case-insensitive)
    pub fn for_extension(&self, ext: &str) -> Option<&dyn ImageEncoder> {
        OutputFormat::from_extension(ext).and_then(|f| self.get(f))
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::with_defaults(crate::constants::DEFAULT_JPEG_QUALITY)
    }
}

/// Convert RGBA to RGB by discarding the alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let pixel_count = rgba.len() / 4;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}
