//! Simulation context owned by the frame driver.
//!
//! Holds every piece of mutable lobby state and wires the per-frame data
//! flow: gate snapshot -> engagement -> warp -> {field, style}. Input
//! handlers and the poller only touch it through the methods here.

use crate::clock::{FrameClock, Interval};
use crate::config::LobbyConfig;
use crate::countdown::countdown_text;
use crate::engagement::{EngagementState, EngagementTracker, InputEvent};
use crate::gate::{GateState, GateStore};
use crate::error::LobbyError;
use crate::particles::{ParticleField, StarSurface};
use crate::router::{Direction, Route, Router, Transition};
use crate::style::{StyleBridge, StyleInputs, StyleSink};
use crate::warp::{WarpParams, WarpSimulator, WarpState};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub dt: f32,
    pub gate_open: bool,
    pub engagement: EngagementState,
    pub warp: WarpState,
    /// Transition committed this frame, if any.
    pub committed: Option<Transition>,
}

pub struct Simulation {
    pub clock: FrameClock,
    pub gate: GateStore,
    pub engagement: EngagementTracker,
    pub warp: WarpSimulator,
    pub field: ParticleField,
    pub style: StyleBridge,
    pub router: Router,
    countdown_tick: Interval,
    last_report: Option<FrameReport>,
}

impl Simulation {
    pub fn new(config: &LobbyConfig, seed: u64, fragment: &str) -> Self {
        Self {
            clock: FrameClock::new(),
            gate: GateStore::new(),
            engagement: EngagementTracker::new(config.touch_device),
            warp: WarpSimulator::new(WarpParams::default()),
            field: ParticleField::new(seed, config.particle_density(), config.field_mode),
            style: StyleBridge::new(),
            router: Router::from_fragment(fragment),
            countdown_tick: Interval::new(config.countdown_interval_ms),
            last_report: None,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.field.resize(width, height);
    }

    pub fn record_input(&mut self, ev: InputEvent) {
        self.engagement.record_input(ev);
    }

    pub fn gate(&self) -> Rc<GateState> {
        self.gate.current()
    }

    pub fn commit_poll(&mut self, result: Result<GateState, LobbyError>) {
        match result {
            Ok(state) => {
                self.gate.commit_success(state);
            }
            Err(e) => self.gate.commit_failure(&e),
        }
    }

    /// Timestamp of the last frame; input handlers use it so router timing
    /// shares the frame clock.
    pub fn now_ms(&self) -> f64 {
        self.clock.last_ms().unwrap_or(0.0)
    }

    pub fn navigate(&mut self, target: Route, now_ms: f64) -> Option<Transition> {
        self.router.navigate(target, now_ms, &mut self.warp)
    }

    pub fn swipe(&mut self, dir: Direction, now_ms: f64) -> Option<Transition> {
        self.router.step(dir, now_ms, &mut self.warp)
    }

    pub fn pulse(&mut self) {
        self.warp.pulse();
    }

    /// Advance the simulation without drawing.
    pub fn step(&mut self, now_ms: f64) -> FrameReport {
        let dt = self.clock.tick(now_ms);
        let gate_open = self.gate.is_open();
        let engagement = self.engagement.drain(now_ms, dt, gate_open);
        let warp = self.warp.step(dt, engagement.raw, gate_open);
        self.field.advance(dt, warp.intensity, gate_open);
        let committed = self.router.poll(now_ms);
        let report = FrameReport {
            dt,
            gate_open,
            engagement,
            warp,
            committed,
        };
        self.last_report = Some(report);
        report
    }

    pub fn style_inputs(&self) -> StyleInputs {
        let warp = self.warp.state();
        let eng = self.engagement.current_engagement();
        StyleInputs {
            intensity: warp.intensity,
            stars_boost: warp.stars_boost,
            tilt_x: eng.tilt_x,
            tilt_y: eng.tilt_y,
            parallax: self.engagement.parallax(),
            gate_open: self.gate.is_open(),
        }
    }

    /// Full frame: step, draw the starfield, publish style variables.
    pub fn frame<S: StarSurface, T: StyleSink>(
        &mut self,
        now_ms: f64,
        surface: &mut S,
        sink: &mut T,
    ) -> FrameReport {
        let report = self.step(now_ms);
        self.field.render(
            surface,
            report.gate_open,
            report.warp.intensity,
            report.warp.stars_boost,
        );
        self.publish_style(sink);
        report
    }

    /// Publish the current outputs through the style bridge.
    pub fn publish_style<T: StyleSink>(&mut self, sink: &mut T) -> usize {
        let inputs = self.style_inputs();
        self.style.publish(&inputs, sink)
    }

    /// Countdown label for the current gate phase at wall-clock `epoch_ms`.
    pub fn countdown(&self, epoch_ms: f64) -> String {
        countdown_text(self.gate.current().countdown_target(), epoch_ms)
    }

    /// Countdown label when the refresh cadence is due at frame time
    /// `now_ms`; `None` between refreshes.
    pub fn countdown_due(&mut self, now_ms: f64, epoch_ms: f64) -> Option<String> {
        self.countdown_tick
            .due(now_ms)
            .then(|| self.countdown(epoch_ms))
    }

    pub fn last_report(&self) -> Option<FrameReport> {
        self.last_report
    }
}
