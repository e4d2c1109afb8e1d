//! Engagement tracker: raw pointer/touch/orientation input in, a normalized
//! 0..1 engagement signal plus a gentle 2-axis tilt out.
//!
//! Input handlers only call [`EngagementTracker::record_input`]; the frame
//! loop calls [`EngagementTracker::drain`] once per frame, so there is a
//! single writer per frame.

use crate::constants::*;
use crate::error::LobbyError;
use crate::warp::blend_alpha;
use glam::Vec2;
use smallvec::SmallVec;

const PENDING_CAP: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputSource {
    #[default]
    Pointer,
    Touch,
    Orientation,
}

/// Bounding box of the status control in client pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ControlRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ControlRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Offset of `(x, y)` from the centre, normalized to `[-1, 1]` per axis.
    pub fn normalized(&self, x: f32, y: f32) -> Vec2 {
        if !(self.width > 0.0 && self.height > 0.0) || !x.is_finite() || !y.is_finite() {
            return Vec2::ZERO;
        }
        let nx = ((x - self.left) / self.width) * 2.0 - 1.0;
        let ny = ((y - self.top) / self.height) * 2.0 - 1.0;
        Vec2::new(nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer entered or touch started on the status control.
    ControlEnter {
        source: InputSource,
        x: f32,
        y: f32,
        rect: ControlRect,
    },
    /// Pointer moved while over the status control.
    ControlMove { x: f32, y: f32, rect: ControlRect },
    /// Pointer left the status control.
    ControlLeave,
    /// Touch moved anywhere on the page (mobile fallback).
    TouchMove { x: f32, y: f32, viewport: Vec2 },
    /// Touch ended or was cancelled.
    TouchEnd,
    /// Pointer position over the whole viewport, drives parallax only.
    ViewportPointer { x: f32, y: f32, viewport: Vec2 },
    /// Device orientation sample in degrees.
    Orientation { gamma: f32, beta: f32, at_ms: f64 },
}

/// Whether the tracker may use device-orientation samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OrientationCapability {
    /// No orientation API on this platform.
    #[default]
    Unavailable,
    /// API present and ungated.
    NotRequired,
    /// API gated behind a one-time user gesture.
    NeedsPermission,
    /// Permission prompt is in flight.
    Pending,
    Granted,
    Denied,
}

impl OrientationCapability {
    pub fn accepts_samples(self) -> bool {
        matches!(
            self,
            OrientationCapability::NotRequired | OrientationCapability::Granted
        )
    }
}

/// Snapshot read by the simulator each frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EngagementState {
    pub raw: f32,
    /// Rotation around the X axis in degrees.
    pub tilt_x: f32,
    /// Rotation around the Y axis in degrees.
    pub tilt_y: f32,
    pub source: InputSource,
}

#[derive(Debug, Default)]
pub struct EngagementTracker {
    pending: SmallVec<[InputEvent; PENDING_CAP]>,
    pointer_inside: bool,
    touch_inside: bool,
    touch_anywhere: bool,
    motion_until_ms: f64,
    last_orientation: Option<Vec2>,
    tilt_target: Vec2,
    tilt: Vec2,
    parallax_target: Vec2,
    parallax: Vec2,
    source: InputSource,
    capability: OrientationCapability,
    touch_fallback: bool,
    state: EngagementState,
}

fn tilt_from_normalized(n: Vec2) -> Vec2 {
    // x rotation follows vertical offset, y rotation follows horizontal offset
    Vec2::new(-n.y * TILT_MAX_DEG, n.x * TILT_MAX_DEG)
}

fn tilt_from_orientation(gamma: f32, beta: f32) -> Vec2 {
    let g = gamma.clamp(-ORIENTATION_CLAMP_DEG, ORIENTATION_CLAMP_DEG) / ORIENTATION_CLAMP_DEG;
    let b = (beta - ORIENTATION_REST_BETA_DEG)
        .clamp(-ORIENTATION_CLAMP_DEG, ORIENTATION_CLAMP_DEG)
        / ORIENTATION_CLAMP_DEG;
    tilt_from_normalized(Vec2::new(g, b))
}

fn parallax_from_viewport(x: f32, y: f32, viewport: Vec2) -> Vec2 {
    if !(viewport.x > 0.0 && viewport.y > 0.0) || !x.is_finite() || !y.is_finite() {
        return Vec2::ZERO;
    }
    let nx = ((x / viewport.x) * 2.0 - 1.0).clamp(-1.0, 1.0);
    let ny = ((y / viewport.y) * 2.0 - 1.0).clamp(-1.0, 1.0);
    Vec2::new(nx * PARALLAX_X_PX, ny * PARALLAX_Y_PX)
}

impl EngagementTracker {
    /// `touch_fallback` enables page-wide touch-move engagement (touch devices).
    pub fn new(touch_fallback: bool) -> Self {
        Self {
            touch_fallback,
            ..Self::default()
        }
    }

    /// Queue an input sample. When the queue is full the newest sample
    /// overwrites the last pending one.
    pub fn record_input(&mut self, ev: InputEvent) {
        if self.pending.len() == PENDING_CAP {
            if let Some(last) = self.pending.last_mut() {
                *last = ev;
            }
            return;
        }
        self.pending.push(ev);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn capability(&self) -> OrientationCapability {
        self.capability
    }

    pub fn set_orientation_capability(&mut self, cap: OrientationCapability) {
        if cap != self.capability {
            log::info!("[engage] orientation capability {:?} -> {:?}", self.capability, cap);
        }
        self.capability = cap;
        if !cap.accepts_samples() {
            self.last_orientation = None;
            self.motion_until_ms = 0.0;
        }
    }

    /// Record a refused or failed permission prompt; only orientation input
    /// is disabled.
    pub fn permission_denied(&mut self, err: &LobbyError) {
        log::warn!("[engage] {}", err);
        self.set_orientation_capability(OrientationCapability::Denied);
    }

    /// True once, until the host starts the prompt via
    /// [`Self::set_orientation_capability`] with `Pending`.
    pub fn needs_permission_request(&self) -> bool {
        self.capability == OrientationCapability::NeedsPermission
    }

    fn apply(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::ControlEnter { source, x, y, rect } => {
                match source {
                    InputSource::Touch => self.touch_inside = true,
                    _ => self.pointer_inside = true,
                }
                self.source = source;
                self.tilt_target = tilt_from_normalized(rect.normalized(x, y));
            }
            InputEvent::ControlMove { x, y, rect } => {
                if self.pointer_inside {
                    self.source = InputSource::Pointer;
                    self.tilt_target = tilt_from_normalized(rect.normalized(x, y));
                }
            }
            InputEvent::ControlLeave => {
                self.pointer_inside = false;
                if self.source == InputSource::Pointer {
                    self.tilt_target = Vec2::ZERO;
                }
            }
            InputEvent::TouchMove { x, y, viewport } => {
                self.parallax_target = parallax_from_viewport(x, y, viewport);
                if self.touch_fallback {
                    self.touch_anywhere = true;
                    self.source = InputSource::Touch;
                    let n = self.parallax_target
                        / Vec2::new(PARALLAX_X_PX, PARALLAX_Y_PX);
                    self.tilt_target = tilt_from_normalized(n);
                }
            }
            InputEvent::TouchEnd => {
                self.touch_inside = false;
                self.touch_anywhere = false;
                if self.source == InputSource::Touch {
                    self.tilt_target = Vec2::ZERO;
                }
            }
            InputEvent::ViewportPointer { x, y, viewport } => {
                self.parallax_target = parallax_from_viewport(x, y, viewport);
            }
            InputEvent::Orientation { gamma, beta, at_ms } => {
                if !self.capability.accepts_samples() || !gamma.is_finite() || !beta.is_finite() {
                    return;
                }
                let sample = Vec2::new(gamma, beta);
                let moved = self
                    .last_orientation
                    .map(|prev| (sample - prev).abs().max_element() > ORIENTATION_MOTION_DEG)
                    .unwrap_or(false);
                self.last_orientation = Some(sample);
                if moved {
                    self.motion_until_ms = at_ms + MOTION_LINGER_MS;
                }
                if !self.pointer_inside && !self.touch_inside {
                    self.source = InputSource::Orientation;
                    self.tilt_target = tilt_from_orientation(gamma, beta);
                }
            }
        }
    }

    /// Apply all pending input and advance the smoothed tilt/parallax.
    ///
    /// While the gate is closed input is still consumed, but the raw signal
    /// and tilt report zero.
    pub fn drain(&mut self, now_ms: f64, dt: f32, gate_open: bool) -> EngagementState {
        let pending = std::mem::take(&mut self.pending);
        for ev in pending {
            self.apply(ev);
        }

        let motion = self.capability.accepts_samples() && now_ms < self.motion_until_ms;
        let active = self.pointer_inside || self.touch_inside || self.touch_anywhere || motion;
        let raw = if gate_open && active { 1.0 } else { 0.0 };
        let tilt_target = if gate_open { self.tilt_target } else { Vec2::ZERO };

        self.tilt += (tilt_target - self.tilt) * blend_alpha(TILT_BLEND, dt);
        self.tilt = self.tilt.clamp(Vec2::splat(-TILT_MAX_DEG), Vec2::splat(TILT_MAX_DEG));
        self.parallax += (self.parallax_target - self.parallax) * blend_alpha(PARALLAX_BLEND, dt);
        if !self.tilt.is_finite() {
            self.tilt = Vec2::ZERO;
        }
        if !self.parallax.is_finite() {
            self.parallax = Vec2::ZERO;
        }

        self.state = EngagementState {
            raw,
            tilt_x: self.tilt.x,
            tilt_y: self.tilt.y,
            source: self.source,
        };
        self.state
    }

    pub fn current_engagement(&self) -> EngagementState {
        self.state
    }

    /// Smoothed parallax offset in CSS pixels.
    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }
}
