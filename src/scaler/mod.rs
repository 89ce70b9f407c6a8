// Scaler module - Projects the virtual surface onto the true surface
//
// This module provides:
// - The `Scaler` trait every strategy implements
// - One strategy per virtual/true relationship (see `ScalerKind`)
// - The factory that picks a strategy for a display mode (`select`)
// - `ScaledVideo`, which pairs the active scaler with its dirty region and
//   drives presentation

pub mod arbitrary;
pub mod blend;
pub mod integer;
pub mod noop;
pub mod select;
pub mod translate;
mod video;

pub use arbitrary::{ArbitraryPaletteConvert, ArbitraryResample, Letterbox};
pub use blend::{ArbitraryBlend, BlendCache};
pub use integer::IntegerReplicate;
pub use noop::NoOp;
pub use select::{choose_scaler, establish};
pub use translate::TranslateOnly;
pub use video::ScaledVideo;

use crate::error::ScaleError;
use crate::geometry::{Rect, Resolution};
use crate::surface::{PixelFormat, Surface};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The scaling strategies, fastest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerKind {
    /// Application draws straight into the display surface
    NoOp,
    /// Same size in at least one dimension, centered copy
    TranslateOnly,
    /// Exact integer factor, pixel replication
    IntegerReplicate,
    /// Any factor, nearest pixel, identical formats
    ArbitraryResample,
    /// Any factor, nearest pixel, indexed to 32-bit RGB
    ArbitraryPaletteConvert,
    /// Any factor, blended pixel edges, identical 32-bit formats
    ArbitraryBlend,
}

impl ScalerKind {
    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            ScalerKind::NoOp => "no-op",
            ScalerKind::TranslateOnly => "translate-only",
            ScalerKind::IntegerReplicate => "integer replicate",
            ScalerKind::ArbitraryResample => "arbitrary resample",
            ScalerKind::ArbitraryPaletteConvert => "arbitrary palette convert",
            ScalerKind::ArbitraryBlend => "arbitrary blend",
        }
    }
}

impl fmt::Display for ScalerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Diagnostic summary of an active scaler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalerInfo {
    pub kind: ScalerKind,
    pub description: String,
    pub virtual_resolution: Resolution,
    pub true_resolution: Resolution,
    /// True-space area the scaled image covers
    pub active_area: Rect,
    pub scale_x: f64,
    pub scale_y: f64,
    pub in_place: bool,
    pub high_quality: bool,
    pub hardware_accelerated: bool,
}

/// A strategy for turning virtual pixels into true pixels
///
/// Implementations are immutable apart from caches: the transform is fixed
/// at construction, and both mappings are pure.
pub trait Scaler {
    /// Which strategy this is
    fn kind(&self) -> ScalerKind;

    fn virtual_resolution(&self) -> Resolution;

    fn true_resolution(&self) -> Resolution;

    /// True-space rectangle covered by the scaled image
    fn active_area(&self) -> Rect;

    /// Redraw the true pixels that depend on a virtual rectangle
    ///
    /// # Arguments
    /// * `source` - The virtual surface
    /// * `target` - The true surface
    /// * `dirty` - Changed virtual rectangle, already clipped to the virtual
    ///   resolution
    ///
    /// # Panics
    /// Panics if the surfaces do not have the sizes and formats the scaler
    /// was constructed for
    fn blit(&mut self, source: &Surface, target: &mut Surface, dirty: Rect);

    /// Map a virtual point to the true point where its pixel starts
    fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32);

    /// Map a true point (e.g. a mouse position) to the virtual pixel under
    /// it, clipped to the virtual surface
    fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32);

    /// True-space rectangle a blit of `dirty` writes
    fn true_extent(&self, dirty: Rect) -> Rect {
        if dirty.is_empty() {
            return Rect::default();
        }
        let (x1, y1) = self.map_virtual_to_true(dirty.x, dirty.y);
        let (x2, y2) = self.map_virtual_to_true(dirty.right(), dirty.bottom());
        Rect::from_corners(x1, y1, x2, y2)
    }

    /// Human-readable summary of the transform
    fn describe(&self) -> String;

    /// The application draws into the true surface directly
    fn is_in_place(&self) -> bool {
        false
    }

    /// Blends pixel edges instead of picking the nearest pixel
    fn is_high_quality(&self) -> bool {
        false
    }

    /// Scales on the GPU (no current implementation does)
    fn is_hardware_accelerated(&self) -> bool {
        false
    }

    /// Diagnostic summary
    fn info(&self) -> ScalerInfo {
        let virtual_res = self.virtual_resolution();
        let active = self.active_area();
        ScalerInfo {
            kind: self.kind(),
            description: self.describe(),
            virtual_resolution: virtual_res,
            true_resolution: self.true_resolution(),
            active_area: active,
            scale_x: active.w as f64 / virtual_res.width as f64,
            scale_y: active.h as f64 / virtual_res.height as f64,
            in_place: self.is_in_place(),
            high_quality: self.is_high_quality(),
            hardware_accelerated: self.is_hardware_accelerated(),
        }
    }
}

/// Reject true resolutions smaller than the virtual one
pub(crate) fn check_upscale(
    virtual_res: Resolution,
    true_res: Resolution,
) -> Result<(), ScaleError> {
    if virtual_res.is_empty() || !true_res.covers(virtual_res) {
        return Err(ScaleError::Downscale {
            virtual_res,
            true_res,
        });
    }
    Ok(())
}

/// Reject format pairs that cannot be copied byte-for-byte
pub(crate) fn check_same_format(
    scaler: ScalerKind,
    virtual_format: &PixelFormat,
    true_format: &PixelFormat,
) -> Result<(), ScaleError> {
    if !virtual_format.matches(true_format) {
        return Err(ScaleError::FormatMismatch {
            scaler,
            requirement: "identical virtual and true pixel formats",
        });
    }
    Ok(())
}

/// Assert that a blit was handed the surfaces the scaler was built for
#[inline]
pub(crate) fn assert_surfaces(
    scaler: ScalerKind,
    source: &Surface,
    target: &Surface,
    virtual_res: Resolution,
    true_res: Resolution,
) {
    assert_eq!(
        source.resolution(),
        virtual_res,
        "{} scaler: virtual surface changed size",
        scaler
    );
    assert_eq!(
        target.resolution(),
        true_res,
        "{} scaler: true surface changed size",
        scaler
    );
}
