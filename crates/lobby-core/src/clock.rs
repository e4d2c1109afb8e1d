//! Frame timing helpers.
//!
//! The host supplies monotonic timestamps (milliseconds) once per display
//! refresh; [`FrameClock`] turns them into clamped per-frame deltas so a
//! backgrounded tab cannot produce one catastrophic integration step.

use crate::constants::MAX_FRAME_DT_SEC;

#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    elapsed_sec: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now_ms` and return `dt` in seconds, clamped to
    /// `[0, MAX_FRAME_DT_SEC]`. The first tick only primes the clock and
    /// returns 0. Non-finite or backwards timestamps yield 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() => ((now_ms - last) / 1000.0).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(match self.last_ms {
                Some(last) => last.max(now_ms),
                None => now_ms,
            });
        }
        let dt = (dt as f32).min(MAX_FRAME_DT_SEC);
        self.elapsed_sec += dt as f64;
        dt
    }

    /// Total integrated (clamped) time in seconds; drives twinkle phases.
    pub fn elapsed_sec(&self) -> f64 {
        self.elapsed_sec
    }

    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }
}

/// Fixed-period schedule checked against the frame timestamp.
#[derive(Clone, Debug)]
pub struct Interval {
    period_ms: f64,
    next_due_ms: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1) as f64,
            next_due_ms: None,
        }
    }

    /// True at most once per period. Fires immediately on the first call and
    /// never tries to catch up on missed periods.
    pub fn due(&mut self, now_ms: f64) -> bool {
        match self.next_due_ms {
            Some(next) if now_ms < next => false,
            _ => {
                self.next_due_ms = Some(now_ms + self.period_ms);
                true
            }
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}
