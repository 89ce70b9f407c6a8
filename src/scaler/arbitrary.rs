// Arbitrary scalers - Nearest-pixel resampling by any ratio
//
// The image keeps its aspect ratio and is letterboxed inside the true
// surface. Each true pixel samples the virtual pixel it falls in.
//
// Two variants share the letterbox geometry:
// - ArbitraryResample copies pixel bytes between identical formats
// - ArbitraryPaletteConvert looks indexed pixels up in a translated palette
//   and writes 32-bit direct color

use super::{assert_surfaces, check_same_format, check_upscale, Scaler, ScalerKind};
use crate::error::ScaleError;
use crate::geometry::{clip_point, clip_rect, Rect, Resolution};
use crate::surface::{encode_pixel, Palette, PixelFormat, Surface, PALETTE_SIZE};

/// Aspect-preserving placement of the virtual image inside the true surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letterbox {
    virtual_res: Resolution,
    true_res: Resolution,
    active: Rect,
}

impl Letterbox {
    /// Fit `virtual_res` inside `true_res`, centered
    ///
    /// # Panics
    /// Panics if the virtual resolution is empty
    pub fn new(virtual_res: Resolution, true_res: Resolution) -> Self {
        assert!(!virtual_res.is_empty(), "virtual resolution is empty");
        let (vw, vh) = (virtual_res.width as u64, virtual_res.height as u64);
        let (tw, th) = (true_res.width as u64, true_res.height as u64);

        // Full height first; fall back to full width if that is too wide
        let full_height_width = th * vw / vh;
        let (aw, ah) = if full_height_width > tw {
            (tw, tw * vh / vw)
        } else {
            (full_height_width, th)
        };

        Self {
            virtual_res,
            true_res,
            active: Rect::new(
                ((tw - aw) / 2) as i32,
                ((th - ah) / 2) as i32,
                aw as i32,
                ah as i32,
            ),
        }
    }

    /// True-space area the image covers
    pub fn active(&self) -> Rect {
        self.active
    }

    pub fn virtual_resolution(&self) -> Resolution {
        self.virtual_res
    }

    pub fn true_resolution(&self) -> Resolution {
        self.true_res
    }

    /// First true column that samples virtual column `x`
    #[inline]
    pub fn true_x(&self, x: i32) -> i32 {
        scale_ceil(x, self.active.w, self.virtual_res.width as i32) + self.active.x
    }

    /// First true row that samples virtual row `y`
    #[inline]
    pub fn true_y(&self, y: i32) -> i32 {
        scale_ceil(y, self.active.h, self.virtual_res.height as i32) + self.active.y
    }

    /// Virtual column under true column `x`, unclipped
    #[inline]
    pub fn virtual_x(&self, x: i32) -> i32 {
        scale_floor(x - self.active.x, self.virtual_res.width as i32, self.active.w)
    }

    /// Virtual row under true row `y`, unclipped
    #[inline]
    pub fn virtual_y(&self, y: i32) -> i32 {
        scale_floor(y - self.active.y, self.virtual_res.height as i32, self.active.h)
    }

    pub fn to_true(&self, x: i32, y: i32) -> (i32, i32) {
        (self.true_x(x), self.true_y(y))
    }

    pub fn to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        clip_point(self.virtual_x(x), self.virtual_y(y), self.virtual_res)
    }

    /// True-space pixels a virtual rectangle covers
    pub fn extent(&self, dirty: Rect) -> Rect {
        if dirty.is_empty() {
            return Rect::default();
        }
        let (x1, y1) = self.to_true(dirty.x, dirty.y);
        let (x2, y2) = self.to_true(dirty.right(), dirty.bottom());
        clip_rect(Rect::from_corners(x1, y1, x2, y2), self.true_res)
    }

    fn describe(&self, name: &str) -> String {
        format!(
            "{} {} -> {}, active area {}x{} at {}, {}",
            name,
            self.virtual_res,
            self.true_res,
            self.active.w,
            self.active.h,
            self.active.x,
            self.active.y
        )
    }
}

/// `floor(value * num / den)` without overflow
#[inline]
fn scale_floor(value: i32, num: i32, den: i32) -> i32 {
    (value as i64 * num as i64).div_euclid(den as i64) as i32
}

/// `ceil(value * num / den)` without overflow
#[inline]
fn scale_ceil(value: i32, num: i32, den: i32) -> i32 {
    -(-(value as i64) * num as i64).div_euclid(den as i64) as i32
}

/// Nearest-pixel resampling between identical formats
#[derive(Debug, Clone)]
pub struct ArbitraryResample {
    letterbox: Letterbox,
}

impl ArbitraryResample {
    /// Create a resampling scaler
    ///
    /// # Errors
    /// Fails on downscaling or on formats that differ
    pub fn new(
        virtual_res: Resolution,
        virtual_format: &PixelFormat,
        true_res: Resolution,
        true_format: &PixelFormat,
    ) -> Result<Self, ScaleError> {
        check_upscale(virtual_res, true_res)?;
        check_same_format(ScalerKind::ArbitraryResample, virtual_format, true_format)?;
        Ok(Self {
            letterbox: Letterbox::new(virtual_res, true_res),
        })
    }

    pub fn letterbox(&self) -> &Letterbox {
        &self.letterbox
    }
}

impl Scaler for ArbitraryResample {
    fn kind(&self) -> ScalerKind {
        ScalerKind::ArbitraryResample
    }

    fn virtual_resolution(&self) -> Resolution {
        self.letterbox.virtual_res
    }

    fn true_resolution(&self) -> Resolution {
        self.letterbox.true_res
    }

    fn active_area(&self) -> Rect {
        self.letterbox.active
    }

    fn blit(&mut self, source: &Surface, target: &mut Surface, dirty: Rect) {
        let lb = self.letterbox;
        assert_surfaces(self.kind(), source, target, lb.virtual_res, lb.true_res);
        let area = lb.extent(dirty);
        if area.is_empty() {
            return;
        }

        let bpp = source.bytes_per_pixel();
        for ty in area.y..area.bottom() {
            let src = source.row(lb.virtual_y(ty) as u32);
            let dst = target.span_mut(area.x as u32, ty as u32, area.w as u32);
            for (tx, out) in (area.x..).zip(dst.chunks_exact_mut(bpp)) {
                let at = lb.virtual_x(tx) as usize * bpp;
                out.copy_from_slice(&src[at..at + bpp]);
            }
        }
    }

    fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        self.letterbox.to_true(x, y)
    }

    fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        self.letterbox.to_virtual(x, y)
    }

    fn true_extent(&self, dirty: Rect) -> Rect {
        self.letterbox.extent(dirty)
    }

    fn describe(&self) -> String {
        self.letterbox.describe("arbitrary scale")
    }
}

/// Nearest-pixel resampling from 8-bit indexed to 32-bit direct color
///
/// The translated palette is rebuilt lazily whenever the virtual surface's
/// palette changes. Changing the palette does not mark anything dirty; the
/// application decides whether the whole screen must be redrawn.
#[derive(Debug, Clone)]
pub struct ArbitraryPaletteConvert {
    letterbox: Letterbox,
    true_format: PixelFormat,
    table: [u32; PALETTE_SIZE],
    table_version: Option<u64>,
}

impl ArbitraryPaletteConvert {
    /// Create a palette-converting scaler
    ///
    /// # Errors
    /// Fails on downscaling, or unless the virtual format is 8-bit indexed
    /// and the true format 32-bit direct color
    pub fn new(
        virtual_res: Resolution,
        virtual_format: &PixelFormat,
        true_res: Resolution,
        true_format: &PixelFormat,
    ) -> Result<Self, ScaleError> {
        check_upscale(virtual_res, true_res)?;
        if !virtual_format.is_indexed() || !true_format.is_direct32() {
            return Err(ScaleError::FormatMismatch {
                scaler: ScalerKind::ArbitraryPaletteConvert,
                requirement: "an 8-bit indexed virtual surface and a 32-bit direct color true surface",
            });
        }
        Ok(Self {
            letterbox: Letterbox::new(virtual_res, true_res),
            true_format: *true_format,
            table: [0; PALETTE_SIZE],
            table_version: None,
        })
    }

    pub fn letterbox(&self) -> &Letterbox {
        &self.letterbox
    }

    /// Rebuild the translated palette if the source's palette changed
    fn refresh_table(&mut self, source: &Surface) {
        let version = source.palette_version();
        if self.table_version == Some(version) {
            return;
        }
        self.table = match source.palette() {
            Some(palette) => palette.translate(&self.true_format),
            None => Palette::grayscale().translate(&self.true_format),
        };
        self.table_version = Some(version);
        log::trace!("palette table rebuilt (version {})", version);
    }
}

impl Scaler for ArbitraryPaletteConvert {
    fn kind(&self) -> ScalerKind {
        ScalerKind::ArbitraryPaletteConvert
    }

    fn virtual_resolution(&self) -> Resolution {
        self.letterbox.virtual_res
    }

    fn true_resolution(&self) -> Resolution {
        self.letterbox.true_res
    }

    fn active_area(&self) -> Rect {
        self.letterbox.active
    }

    fn blit(&mut self, source: &Surface, target: &mut Surface, dirty: Rect) {
        let lb = self.letterbox;
        assert_surfaces(self.kind(), source, target, lb.virtual_res, lb.true_res);
        assert!(
            source.format().is_indexed() && target.format().is_direct32(),
            "{} scaler: surface formats changed",
            self.kind()
        );
        let area = lb.extent(dirty);
        if area.is_empty() {
            return;
        }
        self.refresh_table(source);

        for ty in area.y..area.bottom() {
            let src = source.row(lb.virtual_y(ty) as u32);
            let dst = target.span_mut(area.x as u32, ty as u32, area.w as u32);
            for (tx, out) in (area.x..).zip(dst.chunks_exact_mut(4)) {
                let index = src[lb.virtual_x(tx) as usize];
                encode_pixel(out, self.table[index as usize]);
            }
        }
    }

    fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        self.letterbox.to_true(x, y)
    }

    fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        self.letterbox.to_virtual(x, y)
    }

    fn true_extent(&self, dirty: Rect) -> Rect {
        self.letterbox.extent(dirty)
    }

    fn describe(&self) -> String {
        self.letterbox.describe("arbitrary scale with palette conversion")
    }
}
