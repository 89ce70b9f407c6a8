// Presentation tests
// These tests verify dirty tracking and what reaches the display device

mod common;

use common::{high_quality, numbered_canvas, session};
use scaled_video::dirty::DirtyTracker;
use scaled_video::display::{Display, MemoryDisplay, ModeRequest};
use scaled_video::geometry::{clip_rect, Rect, Resolution};
use scaled_video::scaler::{ArbitraryBlend, Scaler, ScalerKind};
use scaled_video::session::VideoSession;
use scaled_video::surface::{PixelFormat, Surface};

#[test]
fn test_overlapping_marks_union() {
    let mut tracker = DirtyTracker::new(Resolution::new(320, 240));
    tracker.mark_dirty(Rect::new(10, 10, 20, 20));
    tracker.mark_dirty(Rect::new(0, 5, 15, 10));
    tracker.mark_dirty(Rect::new(25, 25, 15, 10));

    assert_eq!(tracker.take_dirty(), Some(Rect::new(0, 5, 40, 30)));
    assert_eq!(tracker.take_dirty(), None);
}

#[test]
fn test_clip_rect_is_idempotent() {
    let bounds = Resolution::new(100, 50);
    let rects = [
        Rect::new(-10, -10, 30, 30),
        Rect::new(90, 40, 30, 30),
        Rect::new(200, 200, 5, 5),
        Rect::new(10, 10, 0, 5),
    ];
    for rect in rects {
        let once = clip_rect(rect, bounds);
        assert_eq!(clip_rect(once, bounds), once);
        assert!(once.is_empty() || bounds.bounds().contains_rect(&once));
    }
}

#[test]
fn test_presentation_covers_mapped_dirty_rect() {
    let canvas = Surface::new(320, 240, PixelFormat::XRGB8888);
    let mut session = session(canvas, 1000, 700);
    assert_eq!(session.kind(), ScalerKind::ArbitraryResample);
    session.update(true).unwrap();
    session.display_mut().clear_presented();

    let dirty = Rect::new(100, 50, 10, 20);
    session.mark_dirty(dirty);
    session.update(true).unwrap();

    let (x1, y1) = session.map_virtual_to_true(dirty.x, dirty.y);
    let (x2, y2) = session.map_virtual_to_true(dirty.right(), dirty.bottom());
    assert_eq!(
        session.display().presented(),
        &[Rect::from_corners(x1, y1, x2, y2)]
    );
}

#[test]
fn test_update_without_present_still_clears() {
    let canvas = Surface::new(320, 240, PixelFormat::XRGB8888);
    let mut session = session(canvas, 640, 480);
    session.update(false).unwrap();

    assert!(!session.has_pending());
    assert!(session.display().presented().is_empty());
    session.update(true).unwrap();
    assert!(session.display().presented().is_empty());
}

#[test]
fn test_in_place_presents_without_copy() {
    let canvas = Surface::new(320, 240, PixelFormat::INDEXED8);
    let display = MemoryDisplay::new(8);
    let mut session = VideoSession::new(display, canvas, ModeRequest::new(320, 240, 8)).unwrap();
    assert_eq!(session.kind(), ScalerKind::NoOp);

    session.canvas_mut().set_pixel(7, 7, 42);
    session.mark_dirty(Rect::new(7, 7, 1, 1));
    session.update(true).unwrap();

    assert_eq!(session.display().surface().get_pixel(7, 7), 42);
    assert_eq!(session.display().presented().last(), Some(&Rect::new(7, 7, 1, 1)));
}

#[test]
fn test_high_quality_session_uses_blend() {
    let canvas = numbered_canvas(320, 240, PixelFormat::XRGB8888);
    let mut session = VideoSession::new(MemoryDisplay::new(32), canvas, high_quality(1000, 700))
        .unwrap();
    assert_eq!(session.kind(), ScalerKind::ArbitraryBlend);
    assert!(session.info().high_quality);
    session.update(true).unwrap();

    // Presentation grows to include the blended edge, clipped to the image
    let active = session.info().active_area;
    assert_eq!(session.display().presented(), &[active]);
}

#[test]
fn test_blend_cache_stops_growing_at_capacity() {
    let v = Resolution::new(64, 48);
    let t = Resolution::new(200, 140);
    let mut scaler = ArbitraryBlend::with_cache_capacity(
        v,
        &PixelFormat::XRGB8888,
        t,
        &PixelFormat::XRGB8888,
        100,
    )
    .unwrap();
    let source = numbered_canvas(64, 48, PixelFormat::XRGB8888);
    let mut target = Surface::new(200, 140, PixelFormat::XRGB8888);

    scaler.blit(&source, &mut target, v.bounds());
    assert_eq!(scaler.cache().len(), 100);
    assert!(scaler.cache().is_full());

    // Further blits still draw, without growing the cache
    let mut again = Surface::new(200, 140, PixelFormat::XRGB8888);
    scaler.blit(&source, &mut again, v.bounds());
    assert_eq!(scaler.cache().len(), 100);
    assert_eq!(again.as_bytes(), target.as_bytes());
}
