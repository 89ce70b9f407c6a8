// Palette - Colors for 8-bit indexed surfaces
//
// An indexed surface stores one byte per pixel, each an index into a table
// of up to 256 RGB colors. Colors are written as 0xRRGGBB when given as a
// single integer.

use super::format::PixelFormat;
use serde::{Deserialize, Serialize};

/// Maximum number of entries in a palette
pub const PALETTE_SIZE: usize = 256;

/// An 8-bit-per-channel RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a 0xRRGGBB value
    #[inline]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Pack into a 0xRRGGBB value
    #[inline]
    pub const fn to_rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Convert to the [R, G, B, A] byte order expected by the pixels crate
    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xFF]
    }
}

/// Color table of an indexed surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Create a palette of `len` black entries (clamped to 256)
    pub fn new(len: usize) -> Self {
        Self {
            colors: vec![Color::BLACK; len.min(PALETTE_SIZE)],
        }
    }

    /// A 256-entry ramp from black to white
    pub fn grayscale() -> Self {
        Self {
            colors: (0..PALETTE_SIZE)
                .map(|i| Color::new(i as u8, i as u8, i as u8))
                .collect(),
        }
    }

    /// Build a palette from 0xRRGGBB values (entries past 256 are ignored)
    pub fn from_rgb(table: &[u32]) -> Self {
        Self {
            colors: table
                .iter()
                .take(PALETTE_SIZE)
                .map(|&rgb| Color::from_rgb(rgb))
                .collect(),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All entries in index order
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Look up an entry; indices past the end read as black
    #[inline]
    pub fn get(&self, index: u8) -> Color {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or(Color::BLACK)
    }

    /// Replace an entry, growing the palette if needed
    pub fn set(&mut self, index: u8, color: Color) {
        let index = index as usize;
        if index >= self.colors.len() {
            self.colors.resize(index + 1, Color::BLACK);
        }
        self.colors[index] = color;
    }

    /// Translate every index into a pixel value of a direct-color format
    ///
    /// # Returns
    /// A full 256-entry table; indices past the end of the palette map to
    /// black.
    pub fn translate(&self, format: &PixelFormat) -> [u32; PALETTE_SIZE] {
        let mut table = [format.pack(Color::BLACK); PALETTE_SIZE];
        for (slot, color) in table.iter_mut().zip(&self.colors) {
            *slot = format.pack(*color);
        }
        table
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgb_roundtrip() {
        let color = Color::from_rgb(0x123456);
        assert_eq!(color, Color::new(0x12, 0x34, 0x56));
        assert_eq!(color.to_rgb(), 0x123456);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(Color::from_rgb(0x123456).to_rgba(), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn test_grayscale_palette() {
        let palette = Palette::grayscale();
        assert_eq!(palette.len(), PALETTE_SIZE);
        assert_eq!(palette.get(0), Color::BLACK);
        assert_eq!(palette.get(255), Color::WHITE);
    }

    #[test]
    fn test_palette_from_rgb_truncates() {
        let table = vec![0xFF0000u32; 300];
        let palette = Palette::from_rgb(&table);
        assert_eq!(palette.len(), PALETTE_SIZE);
    }

    #[test]
    fn test_short_palette_reads_black_past_end() {
        let palette = Palette::from_rgb(&[0xFFFFFF, 0x00FF00]);
        assert_eq!(palette.get(1), Color::new(0, 0xFF, 0));
        assert_eq!(palette.get(2), Color::BLACK);
    }

    #[test]
    fn test_palette_set_grows() {
        let mut palette = Palette::new(4);
        palette.set(10, Color::WHITE);
        assert_eq!(palette.len(), 11);
        assert_eq!(palette.get(10), Color::WHITE);
    }

    #[test]
    fn test_translate_to_xrgb() {
        let palette = Palette::from_rgb(&[0x000000, 0xFF8000]);
        let table = palette.translate(&PixelFormat::XRGB8888);
        assert_eq!(table[0], 0x000000);
        assert_eq!(table[1], 0xFF8000);
        assert_eq!(table[200], 0x000000);
    }
}
