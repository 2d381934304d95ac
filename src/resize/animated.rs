//! Animated-image resizer
//!
//! Resizes every frame of a palette-based animation while keeping palette
//! validity: each frame's palette is rebuilt from its *resized* pixel data,
//! so resampling can never produce an out-of-palette color. If a smoothing
//! kernel blends more than 256 distinct colors into one frame, that frame
//! is redone with nearest-neighbor, which by construction introduces no new
//! colors and therefore always fits the format limit.

use std::io::Cursor;

use gif::{ColorOutput, DecodeOptions};
use tracing::{debug, warn};

use super::error::ImageError;
use super::palette::{normalize_alpha, AnimatedImage, Frame, Palette};
use super::policy::{ResizeKernel, SizePolicy};
use super::still::resize_rgba;

/// Resize an animated GIF byte stream according to the sizing policy.
///
/// Frame count, order, delays, disposal and the loop count are preserved.
/// Frame bounds and offsets scale by the same ratios as the global canvas,
/// and the global dimensions are set to the policy target.
pub fn resize_animated(
    data: &[u8],
    policy: SizePolicy,
    kernel: ResizeKernel,
) -> Result<AnimatedImage, ImageError> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);
    let mut decoder = options
        .read_info(Cursor::new(data))
        .map_err(|e| ImageError::decode_failure(e.to_string()))?;

    let src_w = u32::from(decoder.width());
    let src_h = u32::from(decoder.height());
    let (dst_w, dst_h) = policy.target_for(src_w, src_h)?;

    // Ratios used to scale each frame's bounds rectangle
    let sx = f64::from(dst_w) / f64::from(src_w);
    let sy = f64::from(dst_h) / f64::from(src_h);

    let mut frames = Vec::new();
    while let Some(decoded) = decoder
        .read_next_frame()
        .map_err(|e| ImageError::decode_failure(e.to_string()))?
    {
        let frame = resize_frame(decoded, sx, sy, dst_w, dst_h, kernel, frames.len())?;
        frames.push(frame);
    }

    if frames.is_empty() {
        return Err(ImageError::decode_failure("animation contains no frames"));
    }

    debug!(
        frames = frames.len(),
        width = dst_w,
        height = dst_h,
        "resized animation"
    );

    Ok(AnimatedImage {
        width: dst_w,
        height: dst_h,
        repeat: decoder.repeat(),
        frames,
    })
}

fn resize_frame(
    decoded: &gif::Frame<'_>,
    sx: f64,
    sy: f64,
    dst_w: u32,
    dst_h: u32,
    kernel: ResizeKernel,
    frame_no: usize,
) -> Result<Frame, ImageError> {
    let fw = u32::from(decoded.width);
    let fh = u32::from(decoded.height);
    if fw == 0 || fh == 0 {
        return Err(ImageError::invalid_geometry(fw, fh, "frame has zero area"));
    }

    // Scale the bounds rectangle, clamped so the frame stays on the canvas
    let left = ((f64::from(decoded.left) * sx).round() as u32).min(dst_w.saturating_sub(1));
    let top = ((f64::from(decoded.top) * sy).round() as u32).min(dst_h.saturating_sub(1));
    let width = ((f64::from(fw) * sx).round() as u32)
        .max(1)
        .min(dst_w - left);
    let height = ((f64::from(fh) * sy).round() as u32)
        .max(1)
        .min(dst_h - top);

    let resized = resize_rgba(decoded.buffer.to_vec(), fw, fh, width, height, kernel)?;
    let (palette, indices) = match index_pixels(resized.as_raw()) {
        Some(indexed) => indexed,
        None => {
            // Smoothing kernel blended past the 256-color limit. A nearest
            // resize only samples existing pixels, so its color set is a
            // subset of the original frame's palette and always fits.
            warn!(
                frame = frame_no,
                "resized frame exceeds the palette limit, retrying with nearest kernel"
            );
            let redone = resize_rgba(
                decoded.buffer.to_vec(),
                fw,
                fh,
                width,
                height,
                ResizeKernel::Nearest,
            )?;
            index_pixels(redone.as_raw())
                .ok_or_else(|| ImageError::internal("nearest resize exceeded the palette limit"))?
        }
    };

    Ok(Frame {
        left,
        top,
        width,
        height,
        palette,
        indices,
        delay: decoded.delay,
        dispose: decoded.dispose,
    })
}

/// Quantize RGBA pixels into an exact first-seen-order palette.
///
/// Returns `None` when the pixel data holds more than 256 distinct colors
/// after alpha binarization.
fn index_pixels(rgba: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut palette = Palette::new();
    let mut indices = Vec::with_capacity(rgba.len() / 4);
    for px in rgba.chunks_exact(4) {
        let color = normalize_alpha([px[0], px[1], px[2], px[3]]);
        indices.push(palette.insert(color)?);
    }
    Some((palette, indices))
}
