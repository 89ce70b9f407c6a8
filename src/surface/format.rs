// Pixel formats - How pixel values are laid out in memory
//
// Direct-color formats describe each channel with a bit mask; channels
// narrower than 8 bits lose their low bits when packed. Indexed formats have
// no masks and store palette indices.

use super::palette::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of a single pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelFormat {
    /// Significant bits per pixel
    pub bits_per_pixel: u8,
    /// Storage bytes per pixel
    pub bytes_per_pixel: u8,
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
    pub a_mask: u32,
}

impl PixelFormat {
    /// 8-bit palette indices
    pub const INDEXED8: PixelFormat = PixelFormat::from_masks(8, 1, 0, 0, 0, 0);
    /// 16-bit 5-6-5 RGB
    pub const RGB565: PixelFormat = PixelFormat::from_masks(16, 2, 0xF800, 0x07E0, 0x001F, 0);
    /// 24-bit packed RGB
    pub const RGB888: PixelFormat = PixelFormat::from_masks(24, 3, 0xFF0000, 0x00FF00, 0x0000FF, 0);
    /// 32-bit RGB with an unused top byte
    pub const XRGB8888: PixelFormat =
        PixelFormat::from_masks(32, 4, 0x00FF0000, 0x0000FF00, 0x000000FF, 0);
    /// 32-bit RGB with alpha in the top byte
    pub const ARGB8888: PixelFormat =
        PixelFormat::from_masks(32, 4, 0x00FF0000, 0x0000FF00, 0x000000FF, 0xFF000000);

    const fn from_masks(
        bits_per_pixel: u8,
        bytes_per_pixel: u8,
        r_mask: u32,
        g_mask: u32,
        b_mask: u32,
        a_mask: u32,
    ) -> Self {
        Self {
            bits_per_pixel,
            bytes_per_pixel,
            r_mask,
            g_mask,
            b_mask,
            a_mask,
        }
    }

    /// The format a display picks for a requested bit depth
    ///
    /// # Returns
    /// `None` for depths no surface in this crate can hold
    pub fn for_depth(depth: u8) -> Option<Self> {
        match depth {
            8 => Some(Self::INDEXED8),
            16 => Some(Self::RGB565),
            24 => Some(Self::RGB888),
            32 => Some(Self::XRGB8888),
            _ => None,
        }
    }

    /// True for palette-indexed formats
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.bits_per_pixel == 8 && (self.r_mask | self.g_mask | self.b_mask) == 0
    }

    /// True for 32-bit direct-color formats
    #[inline]
    pub fn is_direct32(&self) -> bool {
        self.bytes_per_pixel == 4 && !self.is_indexed()
    }

    /// True if pixels of `other` can be copied byte-for-byte into this format
    ///
    /// Two indexed formats always match (the palette travels separately);
    /// direct formats must agree on depth and every channel mask.
    pub fn matches(&self, other: &PixelFormat) -> bool {
        (self.is_indexed() && other.is_indexed())
            || (self.bits_per_pixel == other.bits_per_pixel
                && self.bytes_per_pixel == other.bytes_per_pixel
                && self.r_mask == other.r_mask
                && self.g_mask == other.g_mask
                && self.b_mask == other.b_mask
                && self.a_mask == other.a_mask)
    }

    /// Pack a color into a pixel value (alpha, if present, is opaque)
    #[inline]
    pub fn pack(&self, color: Color) -> u32 {
        pack_channel(color.r, self.r_mask)
            | pack_channel(color.g, self.g_mask)
            | pack_channel(color.b, self.b_mask)
            | self.a_mask
    }

    /// Unpack a pixel value into a color
    #[inline]
    pub fn unpack(&self, value: u32) -> Color {
        Color::new(
            unpack_channel(value, self.r_mask),
            unpack_channel(value, self.g_mask),
            unpack_channel(value, self.b_mask),
        )
    }
}

#[inline]
fn pack_channel(value: u8, mask: u32) -> u32 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let bits = (mask >> shift).count_ones().min(8);
    ((value as u32) >> (8 - bits)) << shift
}

#[inline]
fn unpack_channel(value: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let bits = (mask >> shift).count_ones().min(8);
    (((value & mask) >> shift) << (8 - bits)) as u8
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_indexed() {
            write!(f, "8-bit indexed")
        } else {
            write!(
                f,
                "{}-bit R{:08X} G{:08X} B{:08X} A{:08X}",
                self.bits_per_pixel, self.r_mask, self.g_mask, self.b_mask, self.a_mask
            )
        }
    }
}
