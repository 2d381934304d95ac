//! Indexed-color model for animated images
//!
//! A frame's palette is an ordered list of distinct colors; every pixel
//! stores an index into it. Deduplication is hash-backed but preserves
//! first-seen order, so palettes are deterministic for a given pixel scan.

use std::collections::HashMap;

use crate::constants::{ALPHA_OPAQUE_THRESHOLD, MAX_PALETTE_COLORS};

/// One RGBA color entry
pub type Rgba = [u8; 4];

/// The single fully-transparent palette entry
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Binarize alpha for palette storage.
///
/// GIF transparency is 1-bit: anything below the threshold collapses into
/// the one transparent entry, everything else becomes fully opaque.
pub fn normalize_alpha(px: Rgba) -> Rgba {
    if px[3] < ALPHA_OPAQUE_THRESHOLD {
        TRANSPARENT
    } else {
        [px[0], px[1], px[2], 0xFF]
    }
}

/// Ordered, bounded set of distinct colors
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<Rgba>,
    index: HashMap<Rgba, u8>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a color if unseen and return its index.
    ///
    /// Returns `None` only when the color is new and the palette is already
    /// at the 256-entry format limit.
    pub fn insert(&mut self, color: Rgba) -> Option<u8> {
        if let Some(&i) = self.index.get(&color) {
            return Some(i);
        }
        if self.colors.len() >= MAX_PALETTE_COLORS {
            return None;
        }
        let i = self.colors.len() as u8;
        self.colors.push(color);
        self.index.insert(color, i);
        Some(i)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Flat RGB triples for the GIF writer (alpha dropped).
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.colors.len() * 3);
        for c in &self.colors {
            rgb.extend_from_slice(&c[..3]);
        }
        rgb
    }

    /// Index of the transparent entry, if this palette has one.
    pub fn transparent_index(&self) -> Option<u8> {
        self.colors.iter().position(|c| c[3] == 0).map(|i| i as u8)
    }
}

/// One frame of an animated image, in indexed color
#[derive(Debug, Clone)]
pub struct Frame {
    /// Bounds rectangle within the global canvas
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// Colors this frame's indices resolve into
    pub palette: Palette,
    /// width * height palette indices, row-major
    pub indices: Vec<u8>,
    /// Frame delay in centiseconds
    pub delay: u16,
    /// How the frame is disposed before the next one draws
    pub dispose: gif::DisposalMethod,
}

/// An ordered frame sequence plus global canvas metadata
#[derive(Debug, Clone)]
pub struct AnimatedImage {
    pub width: u32,
    pub height: u32,
    /// Loop count carried over from the source animation
    pub repeat: gif::Repeat,
    pub frames: Vec<Frame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_first_seen_order() {
        let mut p = Palette::new();
        assert_eq!(p.insert([1, 2, 3, 255]), Some(0));
        assert_eq!(p.insert([4, 5, 6, 255]), Some(1));
        assert_eq!(p.insert([1, 2, 3, 255]), Some(0)); // duplicate keeps index
        assert_eq!(p.insert([7, 8, 9, 255]), Some(2));
        assert_eq!(
            p.colors(),
            &[[1, 2, 3, 255], [4, 5, 6, 255], [7, 8, 9, 255]]
        );
    }

    #[test]
    fn test_insert_rejects_overflow() {
        let mut p = Palette::new();
        for i in 0..=255u8 {
            assert!(p.insert([i, 0, 0, 255]).is_some());
        }
        assert_eq!(p.len(), 256);
        // existing color still resolves, a new one does not fit
        assert_eq!(p.insert([10, 0, 0, 255]), Some(10));
        assert_eq!(p.insert([0, 1, 0, 255]), None);
        assert_eq!(p.len(), 256);
    }

    #[test]
    fn test_to_rgb_drops_alpha() {
        let mut p = Palette::new();
        p.insert([10, 20, 30, 255]);
        p.insert([0, 0, 0, 0]);
        assert_eq!(p.to_rgb(), vec![10, 20, 30, 0, 0, 0]);
    }

    #[test]
    fn test_transparent_index() {
        let mut p = Palette::new();
        p.insert([9, 9, 9, 255]);
        assert_eq!(p.transparent_index(), None);
        p.insert(TRANSPARENT);
        assert_eq!(p.transparent_index(), Some(1));
    }

    #[test]
    fn test_normalize_alpha() {
        assert_eq!(normalize_alpha([5, 6, 7, 200]), [5, 6, 7, 255]);
        assert_eq!(normalize_alpha([5, 6, 7, 20]), TRANSPARENT);
        assert_eq!(normalize_alpha([5, 6, 7, 255]), [5, 6, 7, 255]);
    }
}
