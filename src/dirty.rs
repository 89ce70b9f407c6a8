// Dirty tracking - Accumulates changed virtual-space rectangles
//
// Every mark is clipped to the virtual resolution and merged into a single
// bounding rectangle. Taking the region hands it out and resets the tracker
// in one step.

use crate::geometry::{clip_rect, union_rect, Rect, Resolution};

/// Bounding-box dirty region for one virtual surface
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    bounds: Resolution,
    dirty: Option<Rect>,
}

impl DirtyTracker {
    /// Create an empty tracker for a space of the given size
    pub fn new(bounds: Resolution) -> Self {
        Self {
            bounds,
            dirty: None,
        }
    }

    /// The space marks are clipped to
    pub fn bounds(&self) -> Resolution {
        self.bounds
    }

    /// Register a rectangle as changed
    ///
    /// Off-surface parts are clipped away; a rectangle with nothing left
    /// after clipping is ignored.
    pub fn mark_dirty(&mut self, rect: Rect) {
        let clipped = clip_rect(rect, self.bounds);
        if clipped.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(current) => union_rect(current, clipped),
            None => clipped,
        });
    }

    /// Mark the whole space as changed
    pub fn mark_all(&mut self) {
        self.mark_dirty(self.bounds.bounds());
    }

    /// True if anything has been marked since the last take
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.dirty.is_some()
    }

    /// The current region without clearing it
    pub fn peek(&self) -> Option<Rect> {
        self.dirty
    }

    /// Return the accumulated region and clear it
    pub fn take_dirty(&mut self) -> Option<Rect> {
        self.dirty.take()
    }
}
