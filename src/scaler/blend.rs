// Blend scaler - Edge-blended resampling for 32-bit direct color
//
// Same letterbox geometry as the nearest-pixel scalers, but a true pixel
// that straddles two virtual pixels is mixed from both, weighted by how
// much of it each covers. Mixing happens in linear light (gamma 2.2).
//
// Blending is slow, so results are memoized in a bounded cache. The cache
// lives and dies with the scaler; a mode change starts a fresh one.

use super::{assert_surfaces, check_same_format, check_upscale, Letterbox, Scaler, ScalerKind};
use crate::error::ScaleError;
use crate::geometry::{Rect, Resolution};
use crate::surface::{decode_pixel, encode_pixel, Color, PixelFormat, Surface};
use std::collections::HashMap;

/// Default number of memoized blends
pub const DEFAULT_CACHE_CAPACITY: usize = 65536;

/// Display gamma blends are computed under
pub const GAMMA: f32 = 2.2;

/// Memoized pixel blends
///
/// Keyed by both input pixels and the blend weight. Once `capacity` entries
/// exist, new results are computed but no longer stored.
#[derive(Debug, Clone)]
pub struct BlendCache {
    format: PixelFormat,
    entries: HashMap<(u32, u32, u32), u32>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl BlendCache {
    /// Create a cache for pixels of `format`
    pub fn new(format: PixelFormat, capacity: usize) -> Self {
        Self {
            format,
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Mix two pixels: `weight` 0 gives `one`, 1 gives `two`
    pub fn blend(&mut self, one: u32, two: u32, weight: f32) -> u32 {
        if one == two || weight <= 0.0 {
            return one;
        }
        if weight >= 1.0 {
            return two;
        }

        let key = (one, two, weight.to_bits());
        if let Some(&value) = self.entries.get(&key) {
            self.hits += 1;
            return value;
        }
        self.misses += 1;

        let value = self.mix(one, two, weight);
        if self.entries.len() < self.capacity {
            self.entries.insert(key, value);
            if self.entries.len() == self.capacity {
                log::debug!("blend cache full at {} entries", self.capacity);
            }
        }
        value
    }

    fn mix(&self, one: u32, two: u32, weight: f32) -> u32 {
        let a = self.format.unpack(one);
        let b = self.format.unpack(two);
        self.format.pack(Color::new(
            mix_channel(a.r, b.r, weight),
            mix_channel(a.g, b.g, weight),
            mix_channel(a.b, b.b, weight),
        ))
    }

    /// Number of memoized blends
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// No further results will be stored
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[inline]
fn mix_channel(a: u8, b: u8, weight: f32) -> u8 {
    let la = (a as f32 / 255.0).powf(GAMMA);
    let lb = (b as f32 / 255.0).powf(GAMMA);
    let linear = la * (1.0 - weight) + lb * weight;
    (linear.powf(1.0 / GAMMA) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Per-true-line weight of the following virtual pixel
///
/// Entry `t` is 0 when true line `t` lies within one virtual line; otherwise
/// it is the share of line `t` covered by the next virtual line.
fn edge_weights(virtual_len: u32, active_len: i32, offset: i32, true_len: u32) -> Vec<f32> {
    let mut weights = vec![0.0; true_len as usize];
    let (v, a) = (virtual_len as i64, active_len as i64);
    for line in 1..v {
        let start = line * a;
        let rem = start % v;
        if rem != 0 {
            let t = (start / v) as usize + offset as usize;
            weights[t] = 1.0 - rem as f32 / v as f32;
        }
    }
    weights
}

/// Edge-blended resampling between identical 32-bit formats
#[derive(Debug, Clone)]
pub struct ArbitraryBlend {
    letterbox: Letterbox,
    weights_x: Vec<f32>,
    weights_y: Vec<f32>,
    cache: BlendCache,
}

impl ArbitraryBlend {
    /// Create a blending scaler with the default cache size
    ///
    /// # Errors
    /// Fails on downscaling, or unless both formats are the same 32-bit
    /// direct color format
    pub fn new(
        virtual_res: Resolution,
        virtual_format: &PixelFormat,
        true_res: Resolution,
        true_format: &PixelFormat,
    ) -> Result<Self, ScaleError> {
        Self::with_cache_capacity(
            virtual_res,
            virtual_format,
            true_res,
            true_format,
            DEFAULT_CACHE_CAPACITY,
        )
    }

    /// Create a blending scaler with a specific cache size
    pub fn with_cache_capacity(
        virtual_res: Resolution,
        virtual_format: &PixelFormat,
        true_res: Resolution,
        true_format: &PixelFormat,
        capacity: usize,
    ) -> Result<Self, ScaleError> {
        check_upscale(virtual_res, true_res)?;
        check_same_format(ScalerKind::ArbitraryBlend, virtual_format, true_format)?;
        if !true_format.is_direct32() {
            return Err(ScaleError::FormatMismatch {
                scaler: ScalerKind::ArbitraryBlend,
                requirement: "32-bit direct color surfaces",
            });
        }

        let letterbox = Letterbox::new(virtual_res, true_res);
        let active = letterbox.active();
        Ok(Self {
            weights_x: edge_weights(virtual_res.width, active.w, active.x, true_res.width),
            weights_y: edge_weights(virtual_res.height, active.h, active.y, true_res.height),
            letterbox,
            cache: BlendCache::new(*true_format, capacity),
        })
    }

    pub fn cache(&self) -> &BlendCache {
        &self.cache
    }
}

impl Scaler for ArbitraryBlend {
    fn kind(&self) -> ScalerKind {
        ScalerKind::ArbitraryBlend
    }

    fn virtual_resolution(&self) -> Resolution {
        self.letterbox.virtual_resolution()
    }

    fn true_resolution(&self) -> Resolution {
        self.letterbox.true_resolution()
    }

    fn active_area(&self) -> Rect {
        self.letterbox.active()
    }

    fn blit(&mut self, source: &Surface, target: &mut Surface, dirty: Rect) {
        let lb = self.letterbox;
        assert_surfaces(
            self.kind(),
            source,
            target,
            lb.virtual_resolution(),
            lb.true_resolution(),
        );
        let area = self.true_extent(dirty);
        if area.is_empty() {
            return;
        }

        let last_x = lb.virtual_resolution().width - 1;
        let last_y = lb.virtual_resolution().height - 1;
        let pixel = |x: u32, y: u32| decode_pixel(source.span(x, y, 1));

        for ty in area.y..area.bottom() {
            let vy = lb.virtual_y(ty).clamp(0, last_y as i32) as u32;
            let below = (vy + 1).min(last_y);
            let wy = self.weights_y[ty as usize];
            let dst = target.span_mut(area.x as u32, ty as u32, area.w as u32);

            for (tx, out) in (area.x..).zip(dst.chunks_exact_mut(4)) {
                let vx = lb.virtual_x(tx).clamp(0, last_x as i32) as u32;
                let right = (vx + 1).min(last_x);
                let wx = self.weights_x[tx as usize];

                let value = match (wx > 0.0, wy > 0.0) {
                    (false, false) => pixel(vx, vy),
                    (true, false) => self.cache.blend(pixel(vx, vy), pixel(right, vy), wx),
                    (false, true) => self.cache.blend(pixel(vx, vy), pixel(vx, below), wy),
                    (true, true) => {
                        let near = self.cache.blend(pixel(vx, vy), pixel(vx, below), wy);
                        let far = self.cache.blend(pixel(right, vy), pixel(right, below), wy);
                        self.cache.blend(near, far, wx)
                    }
                };
                encode_pixel(out, value);
            }
        }
    }

    fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        self.letterbox.to_true(x, y)
    }

    fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        self.letterbox.to_virtual(x, y)
    }

    /// The nearest-pixel extent plus the edge pixel to the left and above,
    /// which blends in the first dirty column and row
    fn true_extent(&self, dirty: Rect) -> Rect {
        let extent = self.letterbox.extent(dirty);
        if extent.is_empty() {
            return extent;
        }
        let active = self.letterbox.active();
        Rect::from_corners(
            (extent.x - 1).max(active.x),
            (extent.y - 1).max(active.y),
            extent.right(),
            extent.bottom(),
        )
    }

    fn describe(&self) -> String {
        let active = self.letterbox.active();
        format!(
            "blended scale {} -> {}, active area {}x{} at {}, {}",
            self.letterbox.virtual_resolution(),
            self.letterbox.true_resolution(),
            active.w,
            active.h,
            active.x,
            active.y
        )
    }

    fn is_high_quality(&self) -> bool {
        true
    }
}
