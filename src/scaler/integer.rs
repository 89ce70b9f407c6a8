// Integer scaler - Pixel replication by a whole-number factor
//
// Every virtual pixel becomes an N x N block. The factor is the largest
// whole number that fits both dimensions, and must fill at least one of
// them exactly; the other is letterboxed.

use super::{assert_surfaces, check_same_format, check_upscale, Scaler, ScalerKind};
use crate::error::ScaleError;
use crate::geometry::{clip_point, Rect, Resolution};
use crate::surface::{PixelFormat, Surface};

/// Pixel replication by a whole-number factor
#[derive(Debug, Clone)]
pub struct IntegerReplicate {
    virtual_res: Resolution,
    true_res: Resolution,
    factor: u32,
    offset_x: i32,
    offset_y: i32,
    /// One replicated virtual row, reused between blits
    scratch: Vec<u8>,
}

impl IntegerReplicate {
    /// Largest whole factor that fits, if it fills a dimension exactly
    ///
    /// Returns `None` when the true resolution is smaller than the virtual
    /// one, or when no whole factor fills either dimension.
    pub fn factor_for(virtual_res: Resolution, true_res: Resolution) -> Option<u32> {
        if virtual_res.is_empty() || !true_res.covers(virtual_res) {
            return None;
        }
        let factor = (true_res.width / virtual_res.width).min(true_res.height / virtual_res.height);
        let fills = factor * virtual_res.width == true_res.width
            || factor * virtual_res.height == true_res.height;
        fills.then_some(factor)
    }

    /// Create an integer scaler
    ///
    /// # Errors
    /// Fails on downscaling, on formats that differ, or if no whole factor
    /// fills a dimension
    pub fn new(
        virtual_res: Resolution,
        virtual_format: &PixelFormat,
        true_res: Resolution,
        true_format: &PixelFormat,
    ) -> Result<Self, ScaleError> {
        check_upscale(virtual_res, true_res)?;
        let factor = Self::factor_for(virtual_res, true_res).ok_or(ScaleError::Geometry {
            scaler: ScalerKind::IntegerReplicate,
            virtual_res,
            true_res,
        })?;
        check_same_format(ScalerKind::IntegerReplicate, virtual_format, true_format)?;

        Ok(Self {
            virtual_res,
            true_res,
            factor,
            offset_x: ((true_res.width - virtual_res.width * factor) / 2) as i32,
            offset_y: ((true_res.height - virtual_res.height * factor) / 2) as i32,
            scratch: Vec::new(),
        })
    }

    /// The replication factor
    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Offset of the image inside the true surface
    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }
}

impl Scaler for IntegerReplicate {
    fn kind(&self) -> ScalerKind {
        ScalerKind::IntegerReplicate
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
            (self.virtual_res.width * self.factor) as i32,
            (self.virtual_res.height * self.factor) as i32,
        )
    }

    fn blit(&mut self, source: &Surface, target: &mut Surface, dirty: Rect) {
        assert_surfaces(self.kind(), source, target, self.virtual_res, self.true_res);
        if dirty.is_empty() {
            return;
        }

        let bpp = source.bytes_per_pixel();
        let n = self.factor;
        let block = bpp * n as usize;
        let (x, w) = (dirty.x as u32, dirty.w as u32);
        let dst_x = x * n + self.offset_x as u32;

        self.scratch.resize(w as usize * block, 0);
        for vy in dirty.y as u32..dirty.bottom() as u32 {
            let src = source.span(x, vy, w);
            for (pixel, out) in src.chunks_exact(bpp).zip(self.scratch.chunks_exact_mut(block)) {
                for slot in out.chunks_exact_mut(bpp) {
                    slot.copy_from_slice(pixel);
                }
            }

            let dst_y = vy * n + self.offset_y as u32;
            for row in dst_y..dst_y + n {
                target
                    .span_mut(dst_x, row, w * n)
                    .copy_from_slice(&self.scratch);
            }
        }
    }

    fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        let n = self.factor as i32;
        (x * n + self.offset_x, y * n + self.offset_y)
    }

    fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        let n = self.factor as i32;
        clip_point(
            (x - self.offset_x).div_euclid(n),
            (y - self.offset_y).div_euclid(n),
            self.virtual_res,
        )
    }

    fn describe(&self) -> String {
        format!(
            "integer scale x{} ({} -> {}), offset {}, {}",
            self.factor,
            self.virtual_res,
            self.true_res,
            self.offset_x,
            self.offset_y
        )
    }
}
