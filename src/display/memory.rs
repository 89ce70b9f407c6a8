// Memory display - A headless display device
//
// Behaves like a window system that hands out software surfaces: it picks a
// pixel format from the requested depth, can refuse modes, and records what
// it was asked to present so callers can inspect it.

use super::{Display, DisplayError, ModeRequest};
use crate::geometry::{Rect, Resolution};
use crate::surface::{PixelFormat, Surface};

/// Depths a memory display supports unless told otherwise
pub const DEFAULT_DEPTHS: [u8; 4] = [8, 16, 24, 32];

/// Headless display device
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    surface: Surface,
    native_depth: u8,
    depths: Vec<u8>,
    max_resolution: Option<Resolution>,
    presented: Vec<Rect>,
    mode_changes: usize,
}

impl MemoryDisplay {
    /// Create a display whose preferred depth is `native_depth`
    ///
    /// Until a mode is set the surface is a 1x1 placeholder.
    ///
    /// # Panics
    /// Panics if `native_depth` has no pixel format
    pub fn new(native_depth: u8) -> Self {
        let format = PixelFormat::for_depth(native_depth)
            .unwrap_or_else(|| panic!("no pixel format for {}-bit depth", native_depth));
        Self {
            surface: Surface::new(1, 1, format),
            native_depth,
            depths: DEFAULT_DEPTHS.to_vec(),
            max_resolution: None,
            presented: Vec::new(),
            mode_changes: 0,
        }
    }

    /// Restrict the depths this display can produce
    pub fn with_depths(mut self, depths: &[u8]) -> Self {
        self.depths = depths.to_vec();
        self
    }

    /// Refuse modes larger than `max` in either dimension
    pub fn with_max_resolution(mut self, max: Resolution) -> Self {
        self.max_resolution = Some(max);
        self
    }

    /// Rectangles passed to `present`, oldest first
    pub fn presented(&self) -> &[Rect] {
        &self.presented
    }

    /// Forget recorded presentations
    pub fn clear_presented(&mut self) {
        self.presented.clear();
    }

    /// Number of successful `set_mode` calls
    pub fn mode_changes(&self) -> usize {
        self.mode_changes
    }

    /// Decide the format for a request, or refuse it
    fn pick_format(&self, request: &ModeRequest) -> Result<PixelFormat, DisplayError> {
        let depth = match request.bit_depth {
            0 => self.native_depth,
            depth if self.depths.contains(&depth) => depth,
            _ if request.flags.any_format => self.native_depth,
            depth => return Err(DisplayError::UnsupportedDepth(depth)),
        };
        PixelFormat::for_depth(depth).ok_or(DisplayError::UnsupportedDepth(depth))
    }
}

impl Default for MemoryDisplay {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Display for MemoryDisplay {
    fn set_mode(&mut self, request: &ModeRequest) -> Result<(), DisplayError> {
        let requested = request.resolution();
        if requested.is_empty() {
            return Err(DisplayError::Backend(format!(
                "invalid resolution {}",
                requested
            )));
        }
        if let Some(max) = self.max_resolution {
            if !max.covers(requested) {
                return Err(DisplayError::TooLarge { requested, max });
            }
        }

        let format = self.pick_format(request)?;
        self.surface = Surface::new(request.width, request.height, format);
        self.mode_changes += 1;
        log::debug!("memory display set to {} ({})", request, format);
        Ok(())
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn present(&mut self, rect: Rect) -> Result<(), DisplayError> {
        self.presented.push(rect);
        Ok(())
    }

    fn name(&self) -> &str {
        "Memory Display"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::PresentationFlags;

    #[test]
    fn test_set_mode_native_depth() {
        let mut display = MemoryDisplay::new(32);
        display.set_mode(&ModeRequest::new(640, 480, 0)).unwrap();
        assert_eq!(display.surface().resolution(), Resolution::new(640, 480));
        assert_eq!(*display.surface().format(), PixelFormat::XRGB8888);
        assert_eq!(display.mode_changes(), 1);
    }

    #[test]
    fn test_set_mode_requested_depth() {
        let mut display = MemoryDisplay::new(32);
        display.set_mode(&ModeRequest::new(320, 200, 8)).unwrap();
        assert!(display.surface().format().is_indexed());
    }

    #[test]
    fn test_unsupported_depth_refused() {
        let mut display = MemoryDisplay::new(32).with_depths(&[32]);
        let err = display.set_mode(&ModeRequest::new(320, 200, 8)).unwrap_err();
        assert_eq!(err, DisplayError::UnsupportedDepth(8));
        assert_eq!(display.surface().resolution(), Resolution::new(1, 1));
    }

    #[test]
    fn test_any_format_falls_back_to_native() {
        let mut display = MemoryDisplay::new(32).with_depths(&[32]);
        let request = ModeRequest::new(320, 200, 8).with_flags(PresentationFlags {
            any_format: true,
            ..Default::default()
        });
        display.set_mode(&request).unwrap();
        assert_eq!(*display.surface().format(), PixelFormat::XRGB8888);
    }

    #[test]
    fn test_max_resolution_refused() {
        let mut display = MemoryDisplay::new(32).with_max_resolution(Resolution::new(800, 600));
        let err = display.set_mode(&ModeRequest::new(1024, 768, 0)).unwrap_err();
        assert!(matches!(err, DisplayError::TooLarge { .. }));
    }

    #[test]
    fn test_present_is_recorded() {
        let mut display = MemoryDisplay::default();
        display.present(Rect::new(1, 2, 3, 4)).unwrap();
        assert_eq!(display.presented(), &[Rect::new(1, 2, 3, 4)]);
        display.clear_presented();
        assert!(display.presented().is_empty());
    }
}
