// No-op scaler - The virtual surface is the true surface
//
// Only chosen when both resolution and format match exactly. The session
// then hands the display's own surface to the application, so there is
// nothing to copy.

use super::{check_same_format, check_upscale, Scaler, ScalerKind};
use crate::error::ScaleError;
use crate::geometry::{clip_point, Rect, Resolution};
use crate::surface::{PixelFormat, Surface};

/// Identity scaler for an in-place virtual surface
#[derive(Debug, Clone)]
pub struct NoOp {
    resolution: Resolution,
}

impl NoOp {
    /// Create a no-op scaler
    ///
    /// # Errors
    /// Fails unless resolutions are equal and formats identical
    pub fn new(
        virtual_res: Resolution,
        virtual_format: &PixelFormat,
        true_res: Resolution,
        true_format: &PixelFormat,
    ) -> Result<Self, ScaleError> {
        check_upscale(virtual_res, true_res)?;
        if virtual_res != true_res {
            return Err(ScaleError::Geometry {
                scaler: ScalerKind::NoOp,
                virtual_res,
                true_res,
            });
        }
        check_same_format(ScalerKind::NoOp, virtual_format, true_format)?;
        Ok(Self {
            resolution: virtual_res,
        })
    }
}

impl Scaler for NoOp {
    fn kind(&self) -> ScalerKind {
        ScalerKind::NoOp
    }

    fn virtual_resolution(&self) -> Resolution {
        self.resolution
    }

    fn true_resolution(&self) -> Resolution {
        self.resolution
    }

    fn active_area(&self) -> Rect {
        self.resolution.bounds()
    }

    fn blit(&mut self, _source: &Surface, _target: &mut Surface, _dirty: Rect) {}

    fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        (x, y)
    }

    fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        clip_point(x, y, self.resolution)
    }

    fn describe(&self) -> String {
        "no scaling (drawing directly to the display surface)".to_string()
    }

    fn is_in_place(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VGA: Resolution = Resolution::new(640, 480);

    #[test]
    fn test_noop_identity() {
        let scaler = NoOp::new(VGA, &PixelFormat::XRGB8888, VGA, &PixelFormat::XRGB8888).unwrap();
        assert!(scaler.is_in_place());
        assert_eq!(scaler.map_virtual_to_true(12, 34), (12, 34));
        assert_eq!(scaler.map_true_to_virtual(12, 34), (12, 34));
        assert_eq!(scaler.map_true_to_virtual(-1, 999), (0, 479));
        assert_eq!(scaler.true_extent(Rect::new(1, 2, 3, 4)), Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn test_noop_requires_equal_resolution() {
        let err = NoOp::new(
            Resolution::new(320, 240),
            &PixelFormat::INDEXED8,
            VGA,
            &PixelFormat::INDEXED8,
        )
        .unwrap_err();
        assert!(matches!(err, ScaleError::Geometry { .. }));
    }

    #[test]
    fn test_noop_requires_identical_format() {
        let err = NoOp::new(VGA, &PixelFormat::INDEXED8, VGA, &PixelFormat::XRGB8888).unwrap_err();
        assert!(matches!(err, ScaleError::FormatMismatch { .. }));
    }
}
