//! Runtime configuration resolved once at startup.

use crate::constants::{
    COUNTDOWN_INTERVAL_MS, CURRENT_TRACK_INTERVAL_MS, DENSITY_DESKTOP_PX2, DENSITY_TOUCH_PX2,
    POLL_INTERVAL_DEFAULT_MS, POLL_INTERVAL_MAX_MS, POLL_INTERVAL_MIN_MS,
};
use crate::particles::FieldMode;

const DEFAULT_STATE_PATH: &str = "/state";

/// Trim whitespace and strip trailing slashes so paths can be appended.
pub fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[derive(Clone, Debug)]
pub struct LobbyConfig {
    api_base: String,
    state_path: String,
    pub poll_interval_ms: u32,
    pub countdown_interval_ms: u32,
    pub current_track_interval_ms: u32,
    pub touch_device: bool,
    pub field_mode: FieldMode,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self::new("", false)
    }
}

impl LobbyConfig {
    pub fn new(api_base: &str, touch_device: bool) -> Self {
        Self {
            api_base: normalize_base(api_base),
            state_path: DEFAULT_STATE_PATH.to_string(),
            poll_interval_ms: POLL_INTERVAL_DEFAULT_MS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
            current_track_interval_ms: CURRENT_TRACK_INTERVAL_MS,
            touch_device,
            field_mode: FieldMode::Drift,
        }
    }

    /// Gate endpoint path relative to the base, e.g. `/lobby` instead of
    /// `/state`. A missing leading slash is added; blank input keeps `/state`.
    pub fn with_state_path(mut self, path: &str) -> Self {
        let path = path.trim().trim_end_matches('/');
        self.state_path = if path.is_empty() {
            DEFAULT_STATE_PATH.to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        self
    }

    pub fn with_field_mode(mut self, mode: FieldMode) -> Self {
        self.field_mode = mode;
        self
    }

    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms.clamp(POLL_INTERVAL_MIN_MS, POLL_INTERVAL_MAX_MS);
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn state_url(&self) -> String {
        format!("{}{}", self.api_base, self.state_path)
    }

    pub fn tracks_url(&self) -> String {
        format!("{}/tracks", self.api_base)
    }

    pub fn current_track_url(&self) -> String {
        format!("{}/track/current", self.api_base)
    }

    /// Viewport area per particle for this device class.
    pub fn particle_density(&self) -> f32 {
        if self.touch_device {
            DENSITY_TOUCH_PX2
        } else {
            DENSITY_DESKTOP_PX2
        }
    }
}
