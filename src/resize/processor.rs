//! Pipeline orchestration
//!
//! `ResizeService` ties the stages together: decode → resize → encode →
//! finalize. It is constructed with its dependencies (sizing policy,
//! kernel, encoder registry) injected and holds no mutable state, so one
//! instance serves any number of concurrent requests.

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use super::animated::resize_animated;
use super::artifact::{EncodedOutput, OutputArtifact};
use super::encoder::{EncoderRegistry, ResizedImage};
use super::error::ImageError;
use super::format;
use super::policy::{ResizeKernel, SizePolicy};
use super::still::resize_still;

/// Stateless per-request resize pipeline
pub struct ResizeService {
    policy: SizePolicy,
    kernel: ResizeKernel,
    registry: EncoderRegistry,
}

impl ResizeService {
    pub fn new(policy: SizePolicy, kernel: ResizeKernel, registry: EncoderRegistry) -> Self {
        Self {
            policy,
            kernel,
            registry,
        }
    }

    /// Run the full pipeline for one upload.
    ///
    /// The filename picks the output encoder (and routes `.gif` uploads
    /// through the animated path); the decode format comes from the bytes
    /// themselves.
    pub fn process(&self, data: &[u8], filename: &str) -> Result<EncodedOutput, ImageError> {
        let ext = format::file_extension(filename).unwrap_or_default();
        let encoder = self
            .registry
            .for_extension(ext)
            .ok_or_else(|| ImageError::unsupported_output(ext))?;

        let resized = if format::is_animated_extension(filename) {
            ResizedImage::Animated(resize_animated(data, self.policy, self.kernel)?)
        } else {
            let img = decode_still(data)?;
            ResizedImage::Still(resize_still(&img, self.policy, self.kernel)?)
        };

        let (width, height) = resized.dimensions();

        let mut artifact = OutputArtifact::new();
        encoder.encode(&resized, &mut artifact)?;
        let output = artifact.finalize()?;

        debug!(
            filename,
            width,
            height,
            bytes = output.len(),
            content_type = output.content_type(),
            "encoded resized image"
        );

        Ok(output)
    }
}

/// Decode a still image, resolving the format from magic bytes.
fn decode_still(data: &[u8]) -> Result<DynamicImage, ImageError> {
    let detected =
        image::guess_format(data).map_err(|e| ImageError::decode_failure(e.to_string()))?;

    match detected {
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif => {}
        other => return Err(ImageError::unsupported_input(format!("{:?}", other))),
    }

    image::load_from_memory_with_format(data, detected)
        .map_err(|e| ImageError::decode_failure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn service(policy: SizePolicy, kernel: ResizeKernel) -> ResizeService {
        ResizeService::new(policy, kernel, EncoderRegistry::with_defaults(100))
    }

    fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(w, h, |x, _| {
            if x % 2 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_jpeg_pipeline_end_to_end() {
        let svc = service(SizePolicy::FixedWidth { width: 100 }, ResizeKernel::Lanczos3);
        let output = svc.process(&jpeg_bytes(200, 100), "photo.jpg").unwrap();
        assert_eq!(output.content_type(), "image/jpeg");

        let bytes = output.into_bytes().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 50));
    }

    #[test]
    fn test_unsupported_output_extension() {
        let svc = service(SizePolicy::FixedWidth { width: 100 }, ResizeKernel::Lanczos3);
        let err = svc.process(&jpeg_bytes(10, 10), "photo.bmp").unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedOutputFormat { .. }));
    }

    #[test]
    fn test_missing_extension() {
        let svc = service(SizePolicy::FixedWidth { width: 100 }, ResizeKernel::Lanczos3);
        let err = svc.process(&jpeg_bytes(10, 10), "photo").unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedOutputFormat { .. }));
    }

    #[test]
    fn test_zero_byte_upload_is_decode_failure() {
        let svc = service(SizePolicy::FixedWidth { width: 100 }, ResizeKernel::Lanczos3);
        let err = svc.process(&[], "photo.jpg").unwrap_err();
        assert!(matches!(err, ImageError::DecodeFailure { .. }));
    }

    #[test]
    fn test_garbage_upload_is_decode_failure() {
        let svc = service(SizePolicy::FixedWidth { width: 100 }, ResizeKernel::Lanczos3);
        let err = svc.process(b"definitely not an image", "photo.png").unwrap_err();
        assert!(matches!(err, ImageError::DecodeFailure { .. }));
    }

    #[test]
    fn test_decode_format_comes_from_bytes_not_extension() {
        // JPEG bytes uploaded as .png still decode; the extension only
        // selects the *output* encoder.
        let svc = service(SizePolicy::Fraction { divisor: 2 }, ResizeKernel::Nearest);
        let output = svc.process(&jpeg_bytes(20, 20), "photo.png").unwrap();
        assert_eq!(output.content_type(), "image/png");

        let bytes = output.into_bytes().unwrap();
        assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_declared_length_matches_bytes() {
        let svc = service(SizePolicy::Fraction { divisor: 2 }, ResizeKernel::Nearest);
        let output = svc.process(&jpeg_bytes(40, 40), "photo.jpg").unwrap();
        let declared = output.len();
        let bytes = output.into_bytes().unwrap();
        assert_eq!(declared as usize, bytes.len());
    }
}
