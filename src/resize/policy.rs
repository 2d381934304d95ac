//! Sizing policy and resampling kernel
//!
//! The two resize variants observed in the wild (Lanczos to a fixed 1000px
//! width, nearest-neighbor to half scale) are unified here into one
//! parameterized policy: the target-size rule and the interpolation kernel
//! are independent, injectable choices.

use fast_image_resize::{FilterType, ResizeAlg};
use serde::{Deserialize, Serialize};

use super::error::ImageError;

/// Interpolation kernel used when resampling pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeKernel {
    /// Cheap and blocky; never introduces colors absent from the source
    Nearest,
    Bilinear,
    CatmullRom,
    Mitchell,
    /// High quality, minimal aliasing, higher CPU cost
    #[default]
    Lanczos3,
}

impl ResizeKernel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::CatmullRom => "catmull_rom",
            Self::Mitchell => "mitchell",
            Self::Lanczos3 => "lanczos3",
        }
    }

    pub(crate) fn to_alg(self) -> ResizeAlg {
        match self {
            Self::Nearest => ResizeAlg::Nearest,
            Self::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
            Self::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
            Self::Mitchell => ResizeAlg::Convolution(FilterType::Mitchell),
            Self::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }
}

/// Target-size rule applied to a source geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Fixed output width, height derived from the aspect ratio
    FixedWidth { width: u32 },
    /// Integer division of both dimensions (divisor 2 = half scale)
    Fraction { divisor: u32 },
}

impl SizePolicy {
    /// Compute the output dimensions for a source geometry.
    ///
    /// Zero-area sources fail with `InvalidGeometry`. Computed targets are
    /// clamped to at least 1 pixel per axis, so a 1x1 input always resizes.
    pub fn target_for(&self, width: u32, height: u32) -> Result<(u32, u32), ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::invalid_geometry(
                width,
                height,
                "source has zero area",
            ));
        }

        Ok(match *self {
            SizePolicy::FixedWidth { width: target } => {
                let target = target.max(1);
                // round(height * target / width), in u64 to dodge overflow
                let derived = (u64::from(height) * u64::from(target) + u64::from(width) / 2)
                    / u64::from(width);
                (target, (derived as u32).max(1))
            }
            SizePolicy::Fraction { divisor } => {
                let divisor = divisor.max(1);
                ((width / divisor).max(1), (height / divisor).max(1))
            }
        })
    }
}
