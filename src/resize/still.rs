//! Still-image resizer
//!
//! Scales a decoded raster image to the policy target with the configured
//! kernel. Pure: produces a new RGBA buffer, no side effects.

use fast_image_resize::{Image, PixelType, Resizer};
use image::RgbaImage;
use std::num::NonZeroU32;

use super::error::ImageError;
use super::policy::{ResizeKernel, SizePolicy};

/// Resize a decoded still image according to the sizing policy.
pub fn resize_still(
    img: &image::DynamicImage,
    policy: SizePolicy,
    kernel: ResizeKernel,
) -> Result<RgbaImage, ImageError> {
    let (src_w, src_h) = (img.width(), img.height());
    let (dst_w, dst_h) = policy.target_for(src_w, src_h)?;
    resize_rgba(img.to_rgba8().into_raw(), src_w, src_h, dst_w, dst_h, kernel)
}

/// Resize a raw RGBA buffer. Shared by the still and animated paths.
///
/// When target dimensions equal the source, the pixel data passes through
/// untouched so a same-size "resize" is byte-exact.
pub(crate) fn resize_rgba(
    pixels: Vec<u8>,
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
    kernel: ResizeKernel,
) -> Result<RgbaImage, ImageError> {
    if (src_w, src_h) == (dst_w, dst_h) {
        return RgbaImage::from_raw(src_w, src_h, pixels)
            .ok_or_else(|| ImageError::internal("RGBA buffer does not match its dimensions"));
    }

    let src_width = NonZeroU32::new(src_w)
        .ok_or_else(|| ImageError::invalid_geometry(src_w, src_h, "source width is 0"))?;
    let src_height = NonZeroU32::new(src_h)
        .ok_or_else(|| ImageError::invalid_geometry(src_w, src_h, "source height is 0"))?;
    let dst_width = NonZeroU32::new(dst_w)
        .ok_or_else(|| ImageError::invalid_geometry(dst_w, dst_h, "target width is 0"))?;
    let dst_height = NonZeroU32::new(dst_h)
        .ok_or_else(|| ImageError::invalid_geometry(dst_w, dst_h, "target height is 0"))?;

    let src_image = Image::from_vec_u8(src_width, src_height, pixels, PixelType::U8x4)
        .map_err(|e| ImageError::internal(format!("failed to wrap source buffer: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(kernel.to_alg());
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::internal(format!("resize operation failed: {:?}", e)))?;

    RgbaImage::from_raw(dst_w, dst_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::internal("failed to create output image buffer"))
}
