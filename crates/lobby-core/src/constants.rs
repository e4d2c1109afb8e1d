//! Warp, starfield and interaction tuning constants.
//!
//! These constants express intended behavior (rates, blend factors, clamp
//! limits) and keep magic numbers out of the simulation code. Per-frame blend
//! factors are defined at the 60 Hz reference rate and converted to a
//! frame-rate independent alpha with [`crate::warp::blend_alpha`].

// Frame driver
pub const MAX_FRAME_DT_SEC: f32 = 0.050; // longest step a single frame may integrate
pub const REFERENCE_FPS: f32 = 60.0;

// Engage gate: one-pole low-pass toward the tracker's 0/1 target
pub const ENGAGE_BLEND: f32 = 0.09;
pub const ENGAGE_THRESHOLD: f32 = 0.05;

// Hold accumulator (seconds of sustained engagement, bounded)
pub const HOLD_CAP: f32 = 1.6;
pub const HOLD_RISE_PER_SEC: f32 = 0.95;
pub const HOLD_FALL_PER_SEC: f32 = 1.4; // must exceed HOLD_RISE_PER_SEC

// Intensity mapping: floor + smoothstep(hold) * gain
pub const INTENSITY_FLOOR: f32 = 0.25;
pub const INTENSITY_GAIN: f32 = 0.95;
pub const INTENSITY_MAX: f32 = 1.2;
pub const INTENSITY_BLEND: f32 = 0.07; // slowest stage

// Secondary "stars boost" channel published alongside intensity
pub const STARS_FLOOR: f32 = 0.15;
pub const STARS_GAIN: f32 = 1.05;
pub const STARS_BLEND: f32 = 0.045;

// Pulse (page transition kick)
pub const PULSE_INTENSITY: f32 = 1.0;

// Starfield
pub const DENSITY_DESKTOP_PX2: f32 = 11_000.0; // viewport area per particle
pub const DENSITY_TOUCH_PX2: f32 = 14_000.0; // sparser on touch devices
pub const MAX_PARTICLES: usize = 900;
pub const WRAP_MARGIN_PX: f32 = 10.0;
pub const RADIUS_MIN: f32 = 0.6;
pub const RADIUS_SPAN: f32 = 1.6;
pub const ALPHA_MIN: f32 = 0.05;
pub const ALPHA_SPAN: f32 = 0.35;
pub const VX_MIN: f32 = 0.10; // px per reference frame
pub const VX_SPAN: f32 = 0.14;
pub const VY_MIN: f32 = -0.04;
pub const VY_SPAN: f32 = 0.12;
pub const TWINKLE_RATE_MIN: f32 = 0.35; // rad per second
pub const TWINKLE_RATE_SPAN: f32 = 1.2;
pub const TWINKLE_FLOOR: f32 = 0.5; // alpha blend floor at the sine trough
pub const SPEED_OPEN_BASE: f32 = 1.0;
pub const SPEED_CLOSED_BASE: f32 = 0.45; // drift while closed, never zero
pub const SPEED_WARP_GAIN: f32 = 2.6;
pub const GLOW_RADIUS_SCALE: f32 = 2.8;
pub const GLOW_ALPHA_BASE: f32 = 0.06;
pub const GLOW_ALPHA_WARP: f32 = 0.10;

// Tunnel mode (depth range is (TUNNEL_NEAR, 1])
pub const TUNNEL_NEAR: f32 = 0.08;
pub const TUNNEL_SPEED_PER_SEC: f32 = 0.12;
pub const TUNNEL_SPREAD: f32 = 0.18; // origin offset as a fraction of the shorter side

// Engagement / tilt
pub const TILT_MAX_DEG: f32 = 6.0; // on-screen rotation ceiling, kept gentle
pub const ORIENTATION_CLAMP_DEG: f32 = 18.0;
pub const ORIENTATION_REST_BETA_DEG: f32 = 45.0; // phone held upright-ish
pub const ORIENTATION_MOTION_DEG: f32 = 0.5; // smallest change that counts as motion
pub const MOTION_LINGER_MS: f64 = 400.0;
pub const TILT_BLEND: f32 = 0.12;

// Parallax
pub const PARALLAX_X_PX: f32 = 18.0;
pub const PARALLAX_Y_PX: f32 = 14.0;
pub const PARALLAX_BLEND: f32 = 0.07;

// Style bridge mapping
pub const BG_DURATION_IDLE_SEC: f32 = 60.0;
pub const BG_DURATION_WARP_SEC: f32 = 14.0;
pub const BG_HUE_OPEN_DEG: f32 = 190.0;
pub const BG_HUE_CLOSED_DEG: f32 = 24.0;
pub const BG_HUE_WARP_SHIFT_DEG: f32 = 40.0;
pub const GLOW_TEXT_BASE: f32 = 0.2;
pub const GLOW_TEXT_SPAN: f32 = 0.8;

// Router
pub const ROUTE_SETTLE_MS: f64 = 520.0; // matches the CSS page transition
pub const SWIPE_MIN_DX_PX: f32 = 70.0;
pub const SWIPE_MIN_RATIO: f32 = 1.35; // |dx| must exceed |dy| * ratio

// Polling and countdown
pub const POLL_INTERVAL_DEFAULT_MS: u32 = 2_000;
pub const POLL_INTERVAL_MIN_MS: u32 = 1_000;
pub const POLL_INTERVAL_MAX_MS: u32 = 5_000;
pub const COUNTDOWN_INTERVAL_MS: u32 = 1_000;
pub const CURRENT_TRACK_INTERVAL_MS: u32 = 7_000;
