// Demo scene - Test pattern and animation for exercising the scalers
//
// Draws into any surface format: indexed surfaces get a 3-3-2 palette and
// palette cycling, direct color surfaces get the same colors packed.

use crate::geometry::{clip_rect, union_rect, Rect};
use crate::surface::{Color, Palette, Surface};

/// Size of the checker cells in the test pattern
pub const CELL_SIZE: u32 = 16;

/// Size of the bouncing sprite
pub const SPRITE_SIZE: i32 = 16;

/// Palette index of the sprite and cursor marks
const MARK_INDEX: u8 = 0xFF;

/// 3-3-2 RGB palette: every index is a distinct color
pub fn rgb332_palette() -> Palette {
    let table: Vec<u32> = (0..=255u32)
        .map(|i| {
            let r = (i & 0x07) * 255 / 7;
            let g = ((i >> 3) & 0x07) * 255 / 7;
            let b = (i >> 6) * 255 / 3;
            (r << 16) | (g << 8) | b
        })
        .collect();
    Palette::from_rgb(&table)
}

/// Palette index of the test pattern at (x, y)
#[inline]
fn pattern_index(x: u32, y: u32) -> u8 {
    ((x / CELL_SIZE) + (y / CELL_SIZE) * 16) as u8
}

/// Animated demo scene
#[derive(Debug, Clone)]
pub struct Demo {
    palette: Palette,
    frame: u64,
    sprite: Option<Rect>,
}

impl Demo {
    /// Create a demo scene
    pub fn new() -> Self {
        Self {
            palette: rgb332_palette(),
            frame: 0,
            sprite: None,
        }
    }

    /// Number of frames stepped so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Pixel value for a palette index in this surface's format
    fn value(&self, surface: &Surface, index: u8) -> u32 {
        if surface.format().is_indexed() {
            index as u32
        } else {
            surface.format().pack(self.palette.get(index))
        }
    }

    /// Fill a rectangle with the checker pattern
    fn draw_background(&self, surface: &mut Surface, rect: Rect) {
        let rect = clip_rect(rect, surface.resolution());
        for y in rect.y as u32..rect.bottom() as u32 {
            for x in rect.x as u32..rect.right() as u32 {
                let value = self.value(surface, pattern_index(x, y));
                surface.set_pixel(x, y, value);
            }
        }
    }

    /// Draw the full test pattern and install the palette
    ///
    /// # Returns
    /// The rectangle that changed (the whole surface)
    pub fn test_pattern(&mut self, surface: &mut Surface) -> Rect {
        surface.set_palette(&self.palette);
        let bounds = surface.resolution().bounds();
        self.draw_background(surface, bounds);
        self.sprite = None;
        bounds
    }

    /// Advance one frame: move the sprite, and cycle the palette on indexed
    /// surfaces
    ///
    /// # Returns
    /// The rectangle that changed
    pub fn step(&mut self, surface: &mut Surface) -> Rect {
        self.frame += 1;
        let bounds = surface.resolution();

        let mut changed = Rect::default();
        if let Some(old) = self.sprite.take() {
            self.draw_background(surface, old);
            changed = old;
        }

        let span_x = (bounds.width as i32 - SPRITE_SIZE).max(1);
        let span_y = (bounds.height as i32 - SPRITE_SIZE).max(1);
        let sprite = Rect::new(
            bounce(self.frame, span_x),
            bounce(self.frame * 2 / 3, span_y),
            SPRITE_SIZE,
            SPRITE_SIZE,
        );
        let value = self.value(surface, MARK_INDEX);
        surface.fill_rect(sprite, value);
        self.sprite = Some(sprite);
        changed = union_rect(changed, clip_rect(sprite, bounds));

        if surface.format().is_indexed() && self.frame % 4 == 0 {
            // Cycle everything but the mark color; the whole image changes
            let mut cycled = self.palette.clone();
            let shift = (self.frame / 4) as usize;
            for i in 0..MARK_INDEX as usize {
                let from = (i + shift) % MARK_INDEX as usize;
                cycled.set(i as u8, self.palette.get(from as u8));
            }
            surface.set_palette(&cycled);
            changed = bounds.bounds();
        }
        changed
    }

    /// Stamp a small mark at a virtual point
    ///
    /// # Returns
    /// The rectangle that changed
    pub fn mark(&self, surface: &mut Surface, x: i32, y: i32) -> Rect {
        let rect = clip_rect(Rect::new(x - 1, y - 1, 3, 3), surface.resolution());
        let value = self.value(surface, MARK_INDEX);
        surface.fill_rect(rect, value);
        rect
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}

/// Triangle wave over [0, span]
fn bounce(t: u64, span: i32) -> i32 {
    let period = 2 * span as u64;
    let phase = (t % period) as i32;
    if phase <= span {
        phase
    } else {
        2 * span - phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelFormat;

    #[test]
    fn test_palette_is_distinct() {
        let palette = rgb332_palette();
        assert_eq!(palette.get(0), Color::BLACK);
        assert_eq!(palette.get(0xFF), Color::WHITE);
        assert_ne!(palette.get(1), palette.get(8));
    }

    #[test]
    fn test_pattern_fills_surface() {
        let mut surface = Surface::new(64, 32, PixelFormat::INDEXED8);
        let mut demo = Demo::new();
        let changed = demo.test_pattern(&mut surface);

        assert_eq!(changed, Rect::new(0, 0, 64, 32));
        assert_eq!(surface.get_pixel(0, 0), 0);
        assert_eq!(surface.get_pixel(16, 0), 1);
        assert_eq!(surface.get_pixel(0, 16), 16);
    }

    #[test]
    fn test_pattern_direct_color() {
        let mut surface = Surface::new(32, 32, PixelFormat::XRGB8888);
        let mut demo = Demo::new();
        demo.test_pattern(&mut surface);
        assert_eq!(surface.color_at(16, 0), rgb332_palette().get(1));
    }

    #[test]
    fn test_step_reports_sprite_area() {
        let mut surface = Surface::new(64, 64, PixelFormat::XRGB8888);
        let mut demo = Demo::new();
        demo.test_pattern(&mut surface);

        let first = demo.step(&mut surface);
        assert_eq!(first, Rect::new(1, 0, SPRITE_SIZE, SPRITE_SIZE));
        assert_eq!(surface.color_at(1, 0), Color::WHITE);

        let second = demo.step(&mut surface);
        // Old and new sprite positions together
        assert!(second.contains_rect(&first));
        assert_eq!(demo.frame(), 2);
    }

    #[test]
    fn test_indexed_cycle_dirties_everything() {
        let mut surface = Surface::new(64, 64, PixelFormat::INDEXED8);
        let mut demo = Demo::new();
        demo.test_pattern(&mut surface);
        let version = surface.palette_version();

        let mut changed = Rect::default();
        for _ in 0..4 {
            changed = demo.step(&mut surface);
        }
        assert_eq!(changed, Rect::new(0, 0, 64, 64));
        assert!(surface.palette_version() > version);
    }

    #[test]
    fn test_mark_is_clipped() {
        let mut surface = Surface::new(8, 8, PixelFormat::INDEXED8);
        let demo = Demo::new();
        assert_eq!(demo.mark(&mut surface, 0, 0), Rect::new(0, 0, 2, 2));
        assert_eq!(surface.get_pixel(0, 0), MARK_INDEX as u32);
    }

    #[test]
    fn test_bounce() {
        assert_eq!(bounce(0, 10), 0);
        assert_eq!(bounce(10, 10), 10);
        assert_eq!(bounce(15, 10), 5);
        assert_eq!(bounce(20, 10), 0);
    }
}
