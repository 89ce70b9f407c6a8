// Display module - Devices that own the true (output) surface
//
// This module provides:
// - The `Display` trait the scaler core presents through
// - Mode requests (resolution, bit depth, presentation flags)
// - A headless in-memory display for tests and batch runs
// - A window display built on winit + pixels

pub mod memory;
pub mod window;

pub use memory::MemoryDisplay;
pub use window::{run_window, WindowDisplay};

pub use crate::error::DisplayError;

use crate::geometry::{Rect, Resolution};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the display should present the true surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresentationFlags {
    /// Take over the whole screen
    pub fullscreen: bool,
    /// Let the user resize the window
    pub resizable: bool,
    /// Accept whatever depth the device prefers if the requested one is
    /// unavailable
    pub any_format: bool,
    /// Prefer the blending scaler over nearest-pixel when the ratio is not
    /// an integer
    pub high_quality: bool,
}

/// A display mode to establish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRequest {
    pub width: u32,
    pub height: u32,
    /// Bits per pixel; 0 lets the device choose
    pub bit_depth: u8,
    pub flags: PresentationFlags,
}

impl ModeRequest {
    /// Create a request with default flags
    pub fn new(width: u32, height: u32, bit_depth: u8) -> Self {
        Self {
            width,
            height,
            bit_depth,
            flags: PresentationFlags::default(),
        }
    }

    /// Replace the presentation flags
    pub fn with_flags(mut self, flags: PresentationFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Grow the request so it is at least `minimum` in both dimensions
    ///
    /// Window sizes come from the user; a window dragged smaller than the
    /// virtual surface is still given a surface the size of the virtual one.
    pub fn at_least(mut self, minimum: Resolution) -> Self {
        self.width = self.width.max(minimum.width);
        self.height = self.height.max(minimum.height);
        self
    }

    /// The requested resolution
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

impl fmt::Display for ModeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@{}", self.width, self.height, self.bit_depth)?;
        if self.flags.fullscreen {
            write!(f, " fullscreen")?;
        }
        Ok(())
    }
}

/// A device that owns the true surface and can show it
///
/// The scaler core only ever borrows the surface for the duration of a call;
/// setting a new mode may replace it entirely.
pub trait Display {
    /// Switch to a new mode, replacing the true surface
    ///
    /// On error the previous surface must be left untouched.
    fn set_mode(&mut self, request: &ModeRequest) -> Result<(), DisplayError>;

    /// The current true surface
    fn surface(&self) -> &Surface;

    /// Mutable access to the current true surface
    fn surface_mut(&mut self) -> &mut Surface;

    /// Show a rectangle of the true surface on the device
    fn present(&mut self, rect: Rect) -> Result<(), DisplayError>;

    /// Get the name of this display (for debugging)
    fn name(&self) -> &str;
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn set_mode(&mut self, request: &ModeRequest) -> Result<(), DisplayError> {
        (**self).set_mode(request)
    }

    fn surface(&self) -> &Surface {
        (**self).surface()
    }

    fn surface_mut(&mut self) -> &mut Surface {
        (**self).surface_mut()
    }

    fn present(&mut self, rect: Rect) -> Result<(), DisplayError> {
        (**self).present(rect)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_request_defaults() {
        let request = ModeRequest::new(640, 480, 0);
        assert_eq!(request.resolution(), Resolution::new(640, 480));
        assert_eq!(request.flags, PresentationFlags::default());
        assert_eq!(request.to_string(), "640x480@0");
    }

    #[test]
    fn test_mode_request_at_least() {
        let request = ModeRequest::new(200, 600, 32).at_least(Resolution::new(320, 240));
        assert_eq!(request.resolution(), Resolution::new(320, 600));
    }

    #[test]
    fn test_mode_request_display_fullscreen() {
        let request = ModeRequest::new(1920, 1080, 32).with_flags(PresentationFlags {
            fullscreen: true,
            ..Default::default()
        });
        assert_eq!(request.to_string(), "1920x1080@32 fullscreen");
    }
}
