// Host-side tests for the engagement tracker.

use glam::Vec2;
use lobby_core::constants::*;
use lobby_core::*;

const DT: f32 = 1.0 / 60.0;

fn rect() -> ControlRect {
    ControlRect::new(100.0, 100.0, 200.0, 100.0)
}

fn enter(tracker: &mut EngagementTracker, source: InputSource, x: f32, y: f32) {
    tracker.record_input(InputEvent::ControlEnter {
        source,
        x,
        y,
        rect: rect(),
    });
}

fn settle(tracker: &mut EngagementTracker, open: bool) -> EngagementState {
    let mut s = tracker.current_engagement();
    for i in 0..600 {
        s = tracker.drain(i as f64 * 16.0, DT, open);
    }
    s
}

#[test]
fn normalized_maps_rect_to_unit_square() {
    let r = rect();
    assert_eq!(r.normalized(200.0, 150.0), Vec2::ZERO);
    assert_eq!(r.normalized(100.0, 100.0), Vec2::new(-1.0, -1.0));
    assert_eq!(r.normalized(300.0, 200.0), Vec2::new(1.0, 1.0));
    assert_eq!(r.normalized(900.0, -900.0), Vec2::new(1.0, -1.0));
    assert_eq!(ControlRect::default().normalized(1.0, 1.0), Vec2::ZERO);
}

#[test]
fn idle_tracker_reports_zero() {
    let mut tracker = EngagementTracker::new(false);
    let s = tracker.drain(0.0, DT, true);
    assert_eq!(s.raw, 0.0);
    assert_eq!(s.tilt_x, 0.0);
    assert_eq!(s.tilt_y, 0.0);
}

#[test]
fn pointer_enter_and_leave() {
    let mut tracker = EngagementTracker::new(false);
    enter(&mut tracker, InputSource::Pointer, 200.0, 150.0);
    let s = tracker.drain(0.0, DT, true);
    assert_eq!(s.raw, 1.0);
    assert_eq!(s.source, InputSource::Pointer);

    tracker.record_input(InputEvent::ControlLeave);
    let s = tracker.drain(16.0, DT, true);
    assert_eq!(s.raw, 0.0);
}

#[test]
fn closed_gate_reports_no_engagement_or_tilt() {
    let mut tracker = EngagementTracker::new(false);
    enter(&mut tracker, InputSource::Pointer, 300.0, 200.0);
    let s = settle(&mut tracker, false);
    assert_eq!(s.raw, 0.0);
    assert_eq!(s.tilt_x, 0.0);
    assert_eq!(s.tilt_y, 0.0);

    // the pointer is still inside; opening the gate engages immediately
    let s = tracker.drain(10_000.0, DT, true);
    assert_eq!(s.raw, 1.0);
}

#[test]
fn pointer_tilt_follows_offset_and_is_clamped() {
    let mut tracker = EngagementTracker::new(false);
    // bottom-right corner
    enter(&mut tracker, InputSource::Pointer, 300.0, 200.0);
    let s = settle(&mut tracker, true);
    assert!((s.tilt_x + TILT_MAX_DEG).abs() < 0.01);
    assert!((s.tilt_y - TILT_MAX_DEG).abs() < 0.01);

    tracker.record_input(InputEvent::ControlMove {
        x: 5000.0,
        y: -5000.0,
        rect: rect(),
    });
    let s = settle(&mut tracker, true);
    assert!(s.tilt_x.abs() <= TILT_MAX_DEG);
    assert!(s.tilt_y.abs() <= TILT_MAX_DEG);
}

#[test]
fn tilt_returns_to_rest_after_leave() {
    let mut tracker = EngagementTracker::new(false);
    enter(&mut tracker, InputSource::Pointer, 300.0, 100.0);
    settle(&mut tracker, true);
    tracker.record_input(InputEvent::ControlLeave);
    let s = settle(&mut tracker, true);
    assert!(s.tilt_x.abs() < 0.01);
    assert!(s.tilt_y.abs() < 0.01);
}

#[test]
fn touch_on_control_engages_until_end() {
    let mut tracker = EngagementTracker::new(true);
    enter(&mut tracker, InputSource::Touch, 150.0, 120.0);
    assert_eq!(tracker.drain(0.0, DT, true).raw, 1.0);
    tracker.record_input(InputEvent::TouchEnd);
    assert_eq!(tracker.drain(16.0, DT, true).raw, 0.0);
}

#[test]
fn page_wide_touch_only_with_fallback() {
    let viewport = Vec2::new(400.0, 800.0);
    let mut desktop = EngagementTracker::new(false);
    desktop.record_input(InputEvent::TouchMove {
        x: 10.0,
        y: 10.0,
        viewport,
    });
    assert_eq!(desktop.drain(0.0, DT, true).raw, 0.0);

    let mut mobile = EngagementTracker::new(true);
    mobile.record_input(InputEvent::TouchMove {
        x: 10.0,
        y: 10.0,
        viewport,
    });
    let s = mobile.drain(0.0, DT, true);
    assert_eq!(s.raw, 1.0);
    assert_eq!(s.source, InputSource::Touch);
}

#[test]
fn viewport_pointer_drives_parallax_only() {
    let mut tracker = EngagementTracker::new(false);
    tracker.record_input(InputEvent::ViewportPointer {
        x: 800.0,
        y: 0.0,
        viewport: Vec2::new(800.0, 600.0),
    });
    let s = settle(&mut tracker, true);
    assert_eq!(s.raw, 0.0);
    let p = tracker.parallax();
    assert!((p.x - PARALLAX_X_PX).abs() < 0.01);
    assert!((p.y + PARALLAX_Y_PX).abs() < 0.01);
}

#[test]
fn orientation_ignored_without_capability() {
    let mut tracker = EngagementTracker::new(true);
    tracker.record_input(InputEvent::Orientation {
        gamma: 0.0,
        beta: 45.0,
        at_ms: 0.0,
    });
    tracker.record_input(InputEvent::Orientation {
        gamma: 10.0,
        beta: 60.0,
        at_ms: 16.0,
    });
    assert_eq!(tracker.drain(16.0, DT, true).raw, 0.0);
}

#[test]
fn orientation_motion_engages_and_lingers() {
    let mut tracker = EngagementTracker::new(true);
    tracker.set_orientation_capability(OrientationCapability::NotRequired);
    tracker.record_input(InputEvent::Orientation {
        gamma: 0.0,
        beta: 45.0,
        at_ms: 0.0,
    });
    tracker.record_input(InputEvent::Orientation {
        gamma: 5.0,
        beta: 45.0,
        at_ms: 16.0,
    });
    let s = tracker.drain(20.0, DT, true);
    assert_eq!(s.raw, 1.0);
    assert_eq!(s.source, InputSource::Orientation);

    // still within the linger window
    assert_eq!(tracker.drain(16.0 + MOTION_LINGER_MS - 1.0, DT, true).raw, 1.0);
    // after it
    assert_eq!(tracker.drain(16.0 + MOTION_LINGER_MS + 1.0, DT, true).raw, 0.0);
}

#[test]
fn orientation_tilt_is_clamped() {
    let mut tracker = EngagementTracker::new(true);
    tracker.set_orientation_capability(OrientationCapability::Granted);
    tracker.record_input(InputEvent::Orientation {
        gamma: 90.0,
        beta: 180.0,
        at_ms: 0.0,
    });
    let s = settle(&mut tracker, true);
    assert!((s.tilt_x + TILT_MAX_DEG).abs() < 0.01);
    assert!((s.tilt_y - TILT_MAX_DEG).abs() < 0.01);
}

#[test]
fn permission_flow() {
    let mut tracker = EngagementTracker::new(true);
    tracker.set_orientation_capability(OrientationCapability::NeedsPermission);
    assert!(tracker.needs_permission_request());
    tracker.set_orientation_capability(OrientationCapability::Pending);
    assert!(!tracker.needs_permission_request());
    assert!(!tracker.capability().accepts_samples());
}

#[test]
fn permission_denied_keeps_pointer_and_touch() {
    let mut tracker = EngagementTracker::new(true);
    tracker.set_orientation_capability(OrientationCapability::Pending);
    tracker.permission_denied(&LobbyError::PermissionDenied("denied".into()));
    assert_eq!(tracker.capability(), OrientationCapability::Denied);
    assert!(!tracker.needs_permission_request());

    tracker.record_input(InputEvent::Orientation {
        gamma: 0.0,
        beta: 0.0,
        at_ms: 0.0,
    });
    tracker.record_input(InputEvent::Orientation {
        gamma: 15.0,
        beta: 10.0,
        at_ms: 16.0,
    });
    assert_eq!(tracker.drain(20.0, DT, true).raw, 0.0);

    enter(&mut tracker, InputSource::Touch, 150.0, 150.0);
    assert_eq!(tracker.drain(40.0, DT, true).raw, 1.0);
}

#[test]
fn pending_queue_is_bounded() {
    let mut tracker = EngagementTracker::new(false);
    for _ in 0..100 {
        tracker.record_input(InputEvent::ControlLeave);
    }
    assert_eq!(tracker.pending_len(), 16);
    // the newest event replaces the last slot
    enter(&mut tracker, InputSource::Pointer, 200.0, 150.0);
    assert_eq!(tracker.pending_len(), 16);
    assert_eq!(tracker.drain(0.0, DT, true).raw, 1.0);
    assert_eq!(tracker.pending_len(), 0);
}

#[test]
fn non_finite_input_is_ignored() {
    let mut tracker = EngagementTracker::new(true);
    tracker.set_orientation_capability(OrientationCapability::NotRequired);
    tracker.record_input(InputEvent::Orientation {
        gamma: f32::NAN,
        beta: 0.0,
        at_ms: 0.0,
    });
    tracker.record_input(InputEvent::TouchMove {
        x: f32::INFINITY,
        y: 0.0,
        viewport: Vec2::new(400.0, 800.0),
    });
    let s = tracker.drain(0.0, DT, true);
    assert!(s.tilt_x.is_finite() && s.tilt_y.is_finite());
    assert!(tracker.parallax().is_finite());
}
