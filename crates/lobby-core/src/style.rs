//! Style bridge: publishes simulator outputs as CSS custom properties.
//!
//! Write-only. Values are formatted to a fixed precision and compared with
//! the last value written, so repeated publishes with the same inputs touch
//! nothing.

use crate::constants::*;
use fnv::FnvHashMap;
use glam::Vec2;
use smallvec::SmallVec;

pub const VAR_WARP: &str = "--warp";
pub const VAR_STARS_BOOST: &str = "--starsBoost";
pub const VAR_TILT_X: &str = "--tiltX";
pub const VAR_TILT_Y: &str = "--tiltY";
pub const VAR_PAR_X: &str = "--parX";
pub const VAR_PAR_Y: &str = "--parY";
pub const VAR_BG_SPEED: &str = "--bgSpeed";
pub const VAR_BG_HUE: &str = "--bgHue";
pub const VAR_GLOW: &str = "--glow";
pub const VAR_GATE: &str = "--gate";

/// External style target (the document root in the browser).
pub trait StyleSink {
    fn set_var(&mut self, name: &str, value: &str);
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StyleInputs {
    pub intensity: f32,
    pub stars_boost: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
    pub parallax: Vec2,
    pub gate_open: bool,
}

type VarBatch = SmallVec<[(&'static str, String); 10]>;

fn finite(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Derived, formatted variable values for one set of inputs.
pub fn derive_vars(inputs: &StyleInputs) -> VarBatch {
    let intensity = finite(inputs.intensity).clamp(0.0, INTENSITY_MAX);
    let norm = intensity / INTENSITY_MAX;
    let bg_speed = BG_DURATION_IDLE_SEC + (BG_DURATION_WARP_SEC - BG_DURATION_IDLE_SEC) * norm;
    let hue_base = if inputs.gate_open {
        BG_HUE_OPEN_DEG
    } else {
        BG_HUE_CLOSED_DEG
    };
    let hue = hue_base + BG_HUE_WARP_SHIFT_DEG * norm;
    let glow = GLOW_TEXT_BASE + GLOW_TEXT_SPAN * norm;

    let mut vars = VarBatch::new();
    vars.push((VAR_WARP, format!("{:.3}", intensity)));
    vars.push((
        VAR_STARS_BOOST,
        format!("{:.3}", finite(inputs.stars_boost).clamp(0.0, INTENSITY_MAX)),
    ));
    vars.push((VAR_TILT_X, format!("{:.2}deg", finite(inputs.tilt_x))));
    vars.push((VAR_TILT_Y, format!("{:.2}deg", finite(inputs.tilt_y))));
    vars.push((VAR_PAR_X, format!("{:.2}px", finite(inputs.parallax.x))));
    vars.push((VAR_PAR_Y, format!("{:.2}px", finite(inputs.parallax.y))));
    vars.push((VAR_BG_SPEED, format!("{:.2}s", bg_speed)));
    vars.push((VAR_BG_HUE, format!("{:.1}", hue)));
    vars.push((VAR_GLOW, format!("{:.3}", glow)));
    vars.push((VAR_GATE, if inputs.gate_open { "1" } else { "0" }.to_string()));
    vars
}

#[derive(Debug, Default)]
pub struct StyleBridge {
    last: FnvHashMap<&'static str, String>,
}

impl StyleBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every variable whose formatted value changed. Returns the number
    /// of writes issued.
    pub fn publish<S: StyleSink>(&mut self, inputs: &StyleInputs, sink: &mut S) -> usize {
        let mut writes = 0;
        for (name, value) in derive_vars(inputs) {
            if self.last.get(name) == Some(&value) {
                continue;
            }
            sink.set_var(name, &value);
            self.last.insert(name, value);
            writes += 1;
        }
        writes
    }

    /// Last value written for `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.last.get(name).map(String::as_str)
    }

    /// Forget the cache so the next publish rewrites everything.
    pub fn invalidate(&mut self) {
        self.last.clear();
    }
}
