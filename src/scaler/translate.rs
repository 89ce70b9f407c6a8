// Translate-only scaler - Centered 1:1 copy
//
// Used when the true surface matches the virtual one in at least one
// dimension, so no factor above 1 could fit. The image is centered and the
// border is left as the display blanked it.

use super::{assert_surfaces, check_same_format, check_upscale, Scaler, ScalerKind};
use crate::error::ScaleError;
use crate::geometry::{clip_point, Rect, Resolution};
use crate::surface::{PixelFormat, Surface};

/// Centered copy without scaling
#[derive(Debug, Clone)]
pub struct TranslateOnly {
    virtual_res: Resolution,
    true_res: Resolution,
    offset_x: i32,
    offset_y: i32,
}

impl TranslateOnly {
    /// Create a translate-only scaler
    ///
    /// # Errors
    /// Fails on downscaling, on formats that differ, or if neither
    /// dimension matches
    pub fn new(
        virtual_res: Resolution,
        virtual_format: &PixelFormat,
        true_res: Resolution,
        true_format: &PixelFormat,
    ) -> Result<Self, ScaleError> {
        check_upscale(virtual_res, true_res)?;
        if virtual_res.width != true_res.width && virtual_res.height != true_res.height {
            return Err(ScaleError::Geometry {
                scaler: ScalerKind::TranslateOnly,
                virtual_res,
                true_res,
            });
        }
        check_same_format(ScalerKind::TranslateOnly, virtual_format, true_format)?;

        Ok(Self {
            virtual_res,
            true_res,
            offset_x: ((true_res.width - virtual_res.width) / 2) as i32,
            offset_y: ((true_res.height - virtual_res.height) / 2) as i32,
        })
    }

    /// Offset of the image inside the true surface
    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }
}

impl Scaler for TranslateOnly {
    fn kind(&self) -> ScalerKind {
        ScalerKind::TranslateOnly
    }

    fn virtual_resolution(&self) -> Resolution {
        self.virtual_res
    }

    fn true_resolution(&self) -> Resolution {
        self.true_res
    }

    fn active_area(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.virtual_res.width as i32,
            self.virtual_res.height as i32,
        )
    }

    fn blit(&mut self, source: &Surface, target: &mut Surface, dirty: Rect) {
        assert_surfaces(self.kind(), source, target, self.virtual_res, self.true_res);
        if dirty.is_empty() {
            return;
        }

        let (x, w) = (dirty.x as u32, dirty.w as u32);
        let dst_x = (dirty.x + self.offset_x) as u32;
        for y in dirty.y..dirty.bottom() {
            let dst_y = (y + self.offset_y) as u32;
            target
                .span_mut(dst_x, dst_y, w)
                .copy_from_slice(source.span(x, y as u32, w));
        }
    }

    fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        (x + self.offset_x, y + self.offset_y)
    }

    fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        clip_point(x - self.offset_x, y - self.offset_y, self.virtual_res)
    }

    fn describe(&self) -> String {
        format!("translate by {}, {}", self.offset_x, self.offset_y)
    }
}
