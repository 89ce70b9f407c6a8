// Geometry - Rectangles, resolutions and clipping
//
// All pixel spaces in this crate share the same conventions: the origin is
// the top-left pixel, x grows right, y grows down, and a rectangle covers
// the half-open ranges [x, x + w) × [y, y + h).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of a pixel space with an implicit origin at (0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a new resolution
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True if either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The rectangle covering the whole space
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Check whether a point lies inside the space
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }

    /// Check whether this resolution is at least `other` in both dimensions
    pub fn covers(&self, other: Resolution) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle in some pixel space
///
/// Width and height are signed so callers can pass rectangles computed from
/// arbitrary coordinates; anything with `w <= 0` or `h <= 0` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle from its two corners (right/bottom exclusive)
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }

    /// True if the rectangle covers no pixels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Exclusive right edge, saturating at `i32::MAX`
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Number of pixels covered (zero when empty)
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.w as usize * self.h as usize
        }
    }

    /// Check whether a point lies inside the rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Check whether `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{} {}x{}]", self.x, self.y, self.w, self.h)
    }
}

/// Clamp a point into `[0, width-1] × [0, height-1]`
///
/// Used to keep mapped coordinates (pointer positions, mostly) inside a
/// surface even when the input lies outside the displayed image.
///
/// # Arguments
/// * `x`, `y` - Raw point
/// * `bounds` - Space to clamp into (must not be empty)
#[inline]
pub fn clip_point(x: i32, y: i32, bounds: Resolution) -> (i32, i32) {
    let max_x = bounds.width.saturating_sub(1) as i32;
    let max_y = bounds.height.saturating_sub(1) as i32;
    (x.clamp(0, max_x), y.clamp(0, max_y))
}

/// Clip a rectangle against a space
///
/// The origin is clamped with [`clip_point`]; the extent is what remains of
/// the intersection with the space. A rectangle lying entirely outside the
/// space, or with a negative extent, clips to an empty rectangle.
///
/// # Returns
/// A rectangle contained in `bounds`. Clipping is idempotent.
pub fn clip_rect(rect: Rect, bounds: Resolution) -> Rect {
    let (x, y) = clip_point(rect.x, rect.y, bounds);

    let w = if rect.w <= 0 {
        0
    } else {
        let right = rect.right().min(bounds.width as i32);
        (right - rect.x.max(0)).max(0)
    };
    let h = if rect.h <= 0 {
        0
    } else {
        let bottom = rect.bottom().min(bounds.height as i32);
        (bottom - rect.y.max(0)).max(0)
    };

    Rect::new(x, y, w, h)
}

/// Smallest rectangle containing both `a` and `b`
///
/// Empty operands do not contribute; the union of two empty rectangles is
/// the default (empty) rectangle.
pub fn union_rect(a: Rect, b: Rect) -> Rect {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Rect::default(),
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            let x = a.x.min(b.x);
            let y = a.y.min(b.y);
            Rect::from_corners(x, y, a.right().max(b.right()), a.bottom().max(b.bottom()))
        }
    }
}
