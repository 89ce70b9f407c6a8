// Common test utilities for scaler integration tests
//
// This module provides shared functionality for building canvases,
// sessions and expected pixel layouts across the test suites.

#![allow(dead_code)]

use scaled_video::display::{MemoryDisplay, ModeRequest, PresentationFlags};
use scaled_video::geometry::{Rect, Resolution};
use scaled_video::session::VideoSession;
use scaled_video::surface::{PixelFormat, Surface};

/// Virtual resolution used by most tests
pub const QVGA: Resolution = Resolution::new(320, 240);

/// Create a canvas whose pixel at (x, y) has a value unique to that pixel
///
/// # Arguments
///
/// * `width` / `height` - Canvas size
/// * `format` - Pixel format (indexed canvases wrap at 256)
pub fn numbered_canvas(width: u32, height: u32, format: PixelFormat) -> Surface {
    let mut surface = Surface::new(width, height, format);
    for y in 0..height {
        for x in 0..width {
            surface.set_pixel(x, y, pixel_id(x, y, &format));
        }
    }
    surface
}

/// The value `numbered_canvas` stores at (x, y)
pub fn pixel_id(x: u32, y: u32, format: &PixelFormat) -> u32 {
    let id = y * 1000 + x + 1;
    if format.is_indexed() {
        id % 256
    } else {
        id & 0x00FF_FFFF
    }
}

/// A session on a 32-bit memory display
pub fn session(canvas: Surface, width: u32, height: u32) -> VideoSession<MemoryDisplay> {
    VideoSession::new(
        MemoryDisplay::new(32),
        canvas,
        ModeRequest::new(width, height, 0),
    )
    .expect("Failed to establish session")
}

/// A mode request with the high-quality flag set
pub fn high_quality(width: u32, height: u32) -> ModeRequest {
    ModeRequest::new(width, height, 32).with_flags(PresentationFlags {
        high_quality: true,
        ..Default::default()
    })
}

/// Every true pixel outside `area` is black
pub fn outside_is_black(surface: &Surface, area: Rect) -> bool {
    (0..surface.height()).all(|y| {
        (0..surface.width())
            .all(|x| area.contains(x as i32, y as i32) || surface.get_pixel(x, y) == 0)
    })
}
