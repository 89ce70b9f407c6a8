// Surface - Owned pixel storage with a row stride and a pixel format
//
// Every pixel-copy loop in the crate goes through the row and span accessors
// here, which check their bounds once per call instead of trusting raw
// offsets. Borrowing a surface mutably is the equivalent of locking it: no
// one else can read or present it while a blit holds the borrow.

pub mod format;
pub mod palette;

pub use format::PixelFormat;
pub use palette::{Color, Palette, PALETTE_SIZE};

use crate::geometry::{clip_rect, Rect, Resolution};

/// Row strides are rounded up to this many bytes
const PITCH_ALIGN: usize = 4;

/// A 2D pixel buffer
#[derive(Debug, Clone)]
pub struct Surface {
    resolution: Resolution,
    pitch: usize,
    format: PixelFormat,
    palette: Option<Palette>,
    palette_version: u64,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a surface cleared to zero
    ///
    /// Indexed surfaces start with a grayscale palette.
    ///
    /// # Arguments
    /// * `width`, `height` - Size in pixels
    /// * `format` - Pixel layout
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let row_bytes = width as usize * format.bytes_per_pixel as usize;
        let pitch = row_bytes.div_ceil(PITCH_ALIGN) * PITCH_ALIGN;
        Self::with_pitch(width, height, format, pitch)
    }

    /// Create a surface with an explicit row stride
    ///
    /// # Panics
    /// Panics if `pitch` is smaller than one row of pixels
    pub fn with_pitch(width: u32, height: u32, format: PixelFormat, pitch: usize) -> Self {
        let row_bytes = width as usize * format.bytes_per_pixel as usize;
        assert!(
            pitch >= row_bytes,
            "pitch {} too small for {} pixels of {} bytes",
            pitch,
            width,
            format.bytes_per_pixel
        );

        let palette = format.is_indexed().then(Palette::grayscale);
        Self {
            resolution: Resolution::new(width, height),
            pitch,
            format,
            palette,
            palette_version: 0,
            pixels: vec![0; pitch * height as usize],
        }
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.resolution.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.resolution.height
    }

    /// Bytes between the starts of consecutive rows
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    #[inline]
    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel as usize
    }

    /// The palette of an indexed surface
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Counter bumped on every palette change
    ///
    /// Consumers that cache palette-derived data compare this against the
    /// value they last saw.
    #[inline]
    pub fn palette_version(&self) -> u64 {
        self.palette_version
    }

    /// Replace the palette of an indexed surface
    ///
    /// # Returns
    /// `false` (and does nothing) if the surface is not indexed
    pub fn set_palette(&mut self, palette: &Palette) -> bool {
        match &mut self.palette {
            Some(current) => {
                current.clone_from(palette);
                self.palette_version += 1;
                true
            }
            None => false,
        }
    }

    /// Change a single palette entry of an indexed surface
    ///
    /// # Returns
    /// `false` (and does nothing) if the surface is not indexed
    pub fn set_palette_color(&mut self, index: u8, color: Color) -> bool {
        match &mut self.palette {
            Some(current) => {
                current.set(index, color);
                self.palette_version += 1;
                true
            }
            None => false,
        }
    }

    /// Raw storage including row padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw storage including row padding
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Pixel bytes of row `y` (padding excluded)
    ///
    /// # Panics
    /// Panics if `y` is out of bounds
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        self.span(0, y, self.resolution.width)
    }

    /// Mutable pixel bytes of row `y` (padding excluded)
    ///
    /// # Panics
    /// Panics if `y` is out of bounds
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let width = self.resolution.width;
        self.span_mut(0, y, width)
    }

    /// Bytes of `len` pixels starting at (x, y)
    ///
    /// # Panics
    /// Panics if the span leaves the row
    #[inline]
    pub fn span(&self, x: u32, y: u32, len: u32) -> &[u8] {
        let range = self.span_range(x, y, len);
        &self.pixels[range]
    }

    /// Mutable bytes of `len` pixels starting at (x, y)
    ///
    /// # Panics
    /// Panics if the span leaves the row
    #[inline]
    pub fn span_mut(&mut self, x: u32, y: u32, len: u32) -> &mut [u8] {
        let range = self.span_range(x, y, len);
        &mut self.pixels[range]
    }

    #[inline]
    fn span_range(&self, x: u32, y: u32, len: u32) -> std::ops::Range<usize> {
        assert!(y < self.resolution.height, "Y coordinate {} out of bounds", y);
        assert!(
            x as u64 + len as u64 <= self.resolution.width as u64,
            "span {}+{} out of bounds for width {}",
            x,
            len,
            self.resolution.width
        );
        let bpp = self.bytes_per_pixel();
        let start = y as usize * self.pitch + x as usize * bpp;
        start..start + len as usize * bpp
    }

    /// Read one pixel value (little-endian for multi-byte formats)
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> u32 {
        decode_pixel(self.span(x, y, 1))
    }

    /// Write one pixel value (little-endian for multi-byte formats)
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        encode_pixel(self.span_mut(x, y, 1), value);
    }

    /// Fill every pixel with one value
    pub fn fill(&mut self, value: u32) {
        self.fill_rect(self.resolution.bounds(), value);
    }

    /// Fill a rectangle with one value (clipped to the surface)
    pub fn fill_rect(&mut self, rect: Rect, value: u32) {
        let rect = clip_rect(rect, self.resolution);
        if rect.is_empty() {
            return;
        }
        let bpp = self.bytes_per_pixel();
        let mut pixel = [0u8; 4];
        encode_pixel(&mut pixel[..bpp], value);

        for y in rect.y..rect.bottom() {
            let span = self.span_mut(rect.x as u32, y as u32, rect.w as u32);
            for dst in span.chunks_exact_mut(bpp) {
                dst.copy_from_slice(&pixel[..bpp]);
            }
        }
    }

    /// Copy pixels and palette from a surface of the same size and format
    ///
    /// # Panics
    /// Panics if the sizes or formats differ
    pub fn copy_from(&mut self, other: &Surface) {
        assert_eq!(self.resolution, other.resolution, "surface size mismatch");
        assert!(
            self.format.matches(&other.format),
            "surface format mismatch: {} vs {}",
            self.format,
            other.format
        );

        for y in 0..self.resolution.height {
            self.row_mut(y).copy_from_slice(other.row(y));
        }
        if let Some(palette) = &other.palette {
            self.set_palette(palette);
        }
    }

    /// Resolve a pixel to a color, through the palette for indexed surfaces
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        let value = self.get_pixel(x, y);
        match &self.palette {
            Some(palette) => palette.get(value as u8),
            None => self.format.unpack(value),
        }
    }

    /// Convert a rectangle of the surface into RGBA bytes
    ///
    /// # Arguments
    /// * `rect` - Area to convert (clipped to the surface)
    /// * `output` - RGBA buffer laid out with the same width as the surface
    ///
    /// # Panics
    /// Panics if the output buffer is too small
    pub fn to_rgba(&self, rect: Rect, output: &mut [u8]) {
        assert!(
            output.len() >= self.resolution.area() * 4,
            "Output buffer too small for RGBA conversion"
        );

        let rect = clip_rect(rect, self.resolution);
        if rect.is_empty() {
            return;
        }
        let width = self.resolution.width as usize;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let offset = (y as usize * width + x as usize) * 4;
                output[offset..offset + 4]
                    .copy_from_slice(&self.color_at(x as u32, y as u32).to_rgba());
            }
        }
    }
}

/// Read a little-endian pixel value of 1 to 4 bytes
#[inline]
pub fn decode_pixel(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .rev()
        .fold(0u32, |value, &byte| (value << 8) | byte as u32)
}

/// Write a little-endian pixel value of 1 to 4 bytes
#[inline]
pub fn encode_pixel(bytes: &mut [u8], value: u32) {
    let le = value.to_le_bytes();
    let len = bytes.len();
    bytes.copy_from_slice(&le[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_creation() {
        let surface = Surface::new(320, 240, PixelFormat::INDEXED8);
        assert_eq!(surface.resolution(), Resolution::new(320, 240));
        assert_eq!(surface.pitch(), 320);
        assert_eq!(surface.as_bytes().len(), 320 * 240);
        assert!(surface.palette().is_some());
    }

    #[test]
    fn test_pitch_is_aligned() {
        let surface = Surface::new(3, 2, PixelFormat::RGB888);
        assert_eq!(surface.pitch(), 12);
        let surface = Surface::new(5, 2, PixelFormat::INDEXED8);
        assert_eq!(surface.pitch(), 8);
    }

    #[test]
    fn test_direct_surface_has_no_palette() {
        let mut surface = Surface::new(4, 4, PixelFormat::XRGB8888);
        assert!(surface.palette().is_none());
        assert!(!surface.set_palette(&Palette::grayscale()));
        assert_eq!(surface.palette_version(), 0);
    }

    #[test]
    fn test_set_get_pixel() {
        let mut surface = Surface::new(10, 10, PixelFormat::XRGB8888);
        surface.set_pixel(3, 7, 0x00ABCDEF);
        assert_eq!(surface.get_pixel(3, 7), 0x00ABCDEF);
        assert_eq!(surface.span(3, 7, 1), &[0xEF, 0xCD, 0xAB, 0x00]);
    }

    #[test]
    fn test_set_get_pixel_24bit() {
        let mut surface = Surface::new(4, 4, PixelFormat::RGB888);
        surface.set_pixel(1, 1, 0x123456);
        assert_eq!(surface.get_pixel(1, 1), 0x123456);
        assert_eq!(surface.get_pixel(0, 1), 0);
        assert_eq!(surface.get_pixel(2, 1), 0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = Surface::new(8, 8, PixelFormat::INDEXED8);
        surface.fill_rect(Rect::new(6, 6, 10, 10), 9);
        assert_eq!(surface.get_pixel(7, 7), 9);
        assert_eq!(surface.get_pixel(6, 6), 9);
        assert_eq!(surface.get_pixel(5, 6), 0);
    }

    #[test]
    fn test_palette_version_bumps() {
        let mut surface = Surface::new(2, 2, PixelFormat::INDEXED8);
        assert!(surface.set_palette_color(3, Color::WHITE));
        assert!(surface.set_palette(&Palette::grayscale()));
        assert_eq!(surface.palette_version(), 2);
    }

    #[test]
    fn test_copy_from() {
        let mut src = Surface::new(4, 3, PixelFormat::INDEXED8);
        src.fill(7);
        src.set_palette_color(7, Color::new(1, 2, 3));
        let mut dst = Surface::new(4, 3, PixelFormat::INDEXED8);
        dst.copy_from(&src);
        assert_eq!(dst.get_pixel(3, 2), 7);
        assert_eq!(dst.color_at(3, 2), Color::new(1, 2, 3));
    }

    #[test]
    fn test_to_rgba_through_palette() {
        let mut surface = Surface::new(2, 1, PixelFormat::INDEXED8);
        surface.set_palette_color(1, Color::from_rgb(0x102030));
        surface.set_pixel(1, 0, 1);
        let mut rgba = vec![0u8; 2 * 4];
        surface.to_rgba(surface.resolution().bounds(), &mut rgba);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0xFF]);
        assert_eq!(&rgba[4..8], &[0x10, 0x20, 0x30, 0xFF]);
    }

    #[test]
    #[should_panic]
    fn test_get_pixel_out_of_bounds_x() {
        let surface = Surface::new(4, 4, PixelFormat::INDEXED8);
        surface.get_pixel(4, 0);
    }

    #[test]
    #[should_panic]
    fn test_span_past_row_end() {
        let surface = Surface::new(4, 4, PixelFormat::XRGB8888);
        surface.span(2, 0, 3);
    }

    #[test]
    #[should_panic]
    fn test_with_pitch_too_small() {
        Surface::with_pitch(10, 10, PixelFormat::XRGB8888, 39);
    }
}
