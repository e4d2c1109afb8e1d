//! Warp simulator: turns engagement into a smoothed visual intensity.
//!
//! The signal chain per frame is
//! `target -> engage (fast low-pass) -> hold (asymmetric accumulator) ->
//! smoothstep -> target intensity -> intensity (slow low-pass)`.
//! Every stage is clamped, and a zero `dt` leaves the state untouched.

use crate::constants::*;

/// Convert a per-frame blend factor defined at the reference frame rate
/// into an alpha for a frame of `dt` seconds. Zero or invalid `dt` yields 0.
#[inline]
pub fn blend_alpha(per_frame: f32, dt: f32) -> f32 {
    if !(dt > 0.0) || !dt.is_finite() {
        return 0.0;
    }
    let keep = (1.0 - per_frame.clamp(0.0, 1.0)).powf(dt * REFERENCE_FPS);
    (1.0 - keep).clamp(0.0, 1.0)
}

/// `t² (3 − 2t)` on `t` clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Tuning for [`WarpSimulator`]. Defaults come from [`crate::constants`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpParams {
    pub hold_cap: f32,
    pub rise_per_sec: f32,
    pub fall_per_sec: f32,
    pub engage_blend: f32,
    pub engage_threshold: f32,
    pub intensity_floor: f32,
    pub intensity_gain: f32,
    pub intensity_max: f32,
    pub intensity_blend: f32,
    pub stars_floor: f32,
    pub stars_gain: f32,
    pub stars_blend: f32,
    pub pulse_intensity: f32,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            hold_cap: HOLD_CAP,
            rise_per_sec: HOLD_RISE_PER_SEC,
            fall_per_sec: HOLD_FALL_PER_SEC,
            engage_blend: ENGAGE_BLEND,
            engage_threshold: ENGAGE_THRESHOLD,
            intensity_floor: INTENSITY_FLOOR,
            intensity_gain: INTENSITY_GAIN,
            intensity_max: INTENSITY_MAX,
            intensity_blend: INTENSITY_BLEND,
            stars_floor: STARS_FLOOR,
            stars_gain: STARS_GAIN,
            stars_blend: STARS_BLEND,
            pulse_intensity: PULSE_INTENSITY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WarpState {
    /// Sustained-engagement accumulator in `[0, hold_cap]`.
    pub hold: f32,
    /// Visible output in `[0, intensity_max]`.
    pub intensity: f32,
    /// Low-passed engagement gate in `[0, 1]`.
    pub engage: f32,
    /// Rate of change of `intensity` over the last frame, per second.
    pub velocity: f32,
    /// Secondary, slower channel for star brightness.
    pub stars_boost: f32,
}

#[derive(Clone, Debug, Default)]
pub struct WarpSimulator {
    params: WarpParams,
    state: WarpState,
}

impl WarpSimulator {
    pub fn new(params: WarpParams) -> Self {
        Self {
            params,
            state: WarpState::default(),
        }
    }

    pub fn params(&self) -> &WarpParams {
        &self.params
    }

    pub fn state(&self) -> WarpState {
        self.state
    }

    pub fn intensity(&self) -> f32 {
        self.state.intensity
    }

    /// Whether hold may grow this frame. Requires the raw target as well as the
    /// smoothed gate so that release starts the fall path immediately.
    fn is_engaged(&self, target: f32, gate_open: bool) -> bool {
        gate_open
            && target > self.params.engage_threshold
            && self.state.engage > self.params.engage_threshold
    }

    /// Integrate one frame.
    ///
    /// `target_engage` is the tracker's raw 0..1 signal; `gate_open` gates
    /// every engagement effect.
    pub fn step(&mut self, dt: f32, target_engage: f32, gate_open: bool) -> WarpState {
        let p = self.params;
        let dt = finite_or_zero(dt).clamp(0.0, MAX_FRAME_DT_SEC);
        let target = if gate_open {
            finite_or_zero(target_engage).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let engage =
            self.state.engage + (target - self.state.engage) * blend_alpha(p.engage_blend, dt);
        self.state.engage = finite_or_zero(engage).clamp(0.0, 1.0);
        let engaged = self.is_engaged(target, gate_open);

        let s = &mut self.state;
        let delta = if engaged {
            dt * p.rise_per_sec
        } else {
            -dt * p.fall_per_sec
        };
        s.hold = (s.hold + delta).clamp(0.0, p.hold_cap);

        let ease = if p.hold_cap > 0.0 {
            smoothstep(s.hold / p.hold_cap)
        } else {
            0.0
        };
        let (target_intensity, target_stars) = if gate_open {
            (
                (p.intensity_floor + ease * p.intensity_gain) * s.engage,
                (p.stars_floor + ease * p.stars_gain) * s.engage,
            )
        } else {
            (0.0, 0.0)
        };

        let prev = s.intensity;
        s.intensity += (target_intensity - s.intensity) * blend_alpha(p.intensity_blend, dt);
        s.intensity = finite_or_zero(s.intensity).clamp(0.0, p.intensity_max);
        s.stars_boost += (target_stars - s.stars_boost) * blend_alpha(p.stars_blend, dt);
        s.stars_boost = finite_or_zero(s.stars_boost).clamp(0.0, p.intensity_max);
        s.velocity = if dt > 0.0 {
            (s.intensity - prev) / dt
        } else {
            0.0
        };
        self.state
    }

    /// One-shot kick: saturate hold and lift intensity immediately, then let
    /// the normal per-frame decay bring it back down.
    pub fn pulse(&mut self) {
        let p = self.params;
        let s = &mut self.state;
        s.hold = p.hold_cap;
        s.intensity = s.intensity.max(p.pulse_intensity).min(p.intensity_max);
        s.stars_boost = s.stars_boost.max(p.pulse_intensity).min(p.intensity_max);
        log::debug!("[warp] pulse");
    }

    /// Drop all accumulated state (used when the viewport is rebuilt).
    pub fn reset(&mut self) {
        self.state = WarpState::default();
    }
}
