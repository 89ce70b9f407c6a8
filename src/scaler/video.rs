// Scaled video - The active scaler plus its dirty region

use super::{Scaler, ScalerInfo, ScalerKind};
use crate::dirty::DirtyTracker;
use crate::display::{Display, DisplayError};
use crate::geometry::{Rect, Resolution};
use crate::surface::Surface;
use std::fmt;

/// An established scaler and the virtual area waiting to be presented
///
/// Built by [`establish`](super::establish) for one display mode. Dropping
/// it discards the scaler along with any caches it holds.
pub struct ScaledVideo {
    scaler: Box<dyn Scaler>,
    dirty: DirtyTracker,
}

impl ScaledVideo {
    /// Wrap a scaler with an empty dirty region
    pub fn new(scaler: Box<dyn Scaler>) -> Self {
        let dirty = DirtyTracker::new(scaler.virtual_resolution());
        Self { scaler, dirty }
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn kind(&self) -> ScalerKind {
        self.scaler.kind()
    }

    pub fn virtual_resolution(&self) -> Resolution {
        self.scaler.virtual_resolution()
    }

    pub fn true_resolution(&self) -> Resolution {
        self.scaler.true_resolution()
    }

    /// The application draws directly into the display surface
    pub fn is_in_place(&self) -> bool {
        self.scaler.is_in_place()
    }

    /// Add a virtual rectangle to the dirty region
    ///
    /// The rectangle is clipped to the virtual surface first; anything
    /// entirely outside is ignored.
    pub fn mark_dirty(&mut self, rect: Rect) {
        self.dirty.mark_dirty(rect);
    }

    /// Mark the whole virtual surface dirty
    pub fn mark_all_dirty(&mut self) {
        self.dirty.mark_all();
    }

    /// Something is waiting to be presented
    pub fn has_pending(&self) -> bool {
        self.dirty.has_pending()
    }

    /// The pending region, without clearing it
    pub fn pending(&self) -> Option<Rect> {
        self.dirty.peek()
    }

    /// Take and clear the pending region
    pub fn take_dirty(&mut self) -> Option<Rect> {
        self.dirty.take_dirty()
    }

    /// Push the dirty region to the display
    ///
    /// Blits the dirty virtual rectangle into the true surface, copies the
    /// palette across for indexed displays, and if `present` is set asks the
    /// device to show the affected true rectangle. Does nothing if nothing
    /// is dirty.
    ///
    /// # Arguments
    /// * `source` - The virtual surface
    /// * `display` - Device that owns the true surface
    /// * `present` - Show the result now rather than just updating the
    ///   surface
    ///
    /// # Errors
    /// Returns the device's error if presentation fails. The dirty region is
    /// cleared either way.
    pub fn update(
        &mut self,
        source: &Surface,
        display: &mut dyn Display,
        present: bool,
    ) -> Result<(), DisplayError> {
        let Some(dirty) = self.dirty.take_dirty() else {
            return Ok(());
        };

        if !self.scaler.is_in_place() {
            let target = display.surface_mut();
            self.scaler.blit(source, target, dirty);
            if let Some(palette) = source.palette() {
                target.set_palette(palette);
            }
        }

        if present {
            let extent = self.scaler.true_extent(dirty);
            log::trace!("presenting virtual {} as true {}", dirty, extent);
            display.present(extent)?;
        }
        Ok(())
    }

    /// Map a virtual point to the true point where its pixel starts
    pub fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        self.scaler.map_virtual_to_true(x, y)
    }

    /// Map a true point to the virtual pixel under it, clipped
    pub fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        self.scaler.map_true_to_virtual(x, y)
    }

    pub fn describe(&self) -> String {
        self.scaler.describe()
    }

    pub fn info(&self) -> ScalerInfo {
        self.scaler.info()
    }
}

impl fmt::Debug for ScaledVideo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaledVideo")
            .field("kind", &self.kind())
            .field("virtual", &self.virtual_resolution())
            .field("true", &self.true_resolution())
            .field("dirty", &self.dirty.peek())
            .finish()
    }
}
