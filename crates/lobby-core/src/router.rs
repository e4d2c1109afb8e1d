//! Page router over a fixed, ordered set of views, with swipe recognition.

use crate::constants::{ROUTE_SETTLE_MS, SWIPE_MIN_DX_PX, SWIPE_MIN_RATIO};
use crate::warp::WarpSimulator;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Library,
    Player,
    Game,
}

pub const ROUTE_ORDER: [Route; 4] = [Route::Home, Route::Library, Route::Player, Route::Game];

impl Route {
    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Library => "library",
            Route::Player => "player",
            Route::Game => "game",
        }
    }

    pub fn from_name(name: &str) -> Option<Route> {
        ROUTE_ORDER.iter().copied().find(|r| r.name() == name)
    }

    pub fn index(self) -> usize {
        ROUTE_ORDER.iter().position(|r| *r == self).unwrap_or(0)
    }

    /// Neighbour in the given direction; `None` at either end.
    pub fn adjacent(self, dir: Direction) -> Option<Route> {
        let i = self.index();
        match dir {
            Direction::Forward => ROUTE_ORDER.get(i + 1).copied(),
            Direction::Backward => i.checked_sub(1).and_then(|j| ROUTE_ORDER.get(j).copied()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn between(from: Route, to: Route) -> Direction {
        if to.index() >= from.index() {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Value for the `data-dir` hint consumed by the page CSS.
    pub fn as_attr(self) -> &'static str {
        match self {
            Direction::Forward => "1",
            Direction::Backward => "-1",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub from: Route,
    pub to: Route,
    pub direction: Direction,
    pub started_ms: f64,
}

#[derive(Clone, Debug)]
pub struct Router {
    current: Route,
    pending: Option<Transition>,
    settle_ms: f64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::default())
    }
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            pending: None,
            settle_ms: ROUTE_SETTLE_MS,
        }
    }

    /// Resolve the initial route from a location fragment (`#player` or
    /// `player`); unknown or empty values fall back to the default view.
    pub fn from_fragment(fragment: &str) -> Self {
        let name = fragment.trim().trim_start_matches('#');
        Self::new(Route::from_name(name).unwrap_or_default())
    }

    pub fn with_settle_ms(mut self, settle_ms: f64) -> Self {
        self.settle_ms = settle_ms.max(0.0);
        self
    }

    /// Committed route.
    pub fn current(&self) -> Route {
        self.current
    }

    /// Route whose view is (or is becoming) visible.
    pub fn active(&self) -> Route {
        self.pending.map(|t| t.to).unwrap_or(self.current)
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Transition> {
        self.pending
    }

    pub fn fragment(&self) -> String {
        format!("#{}", self.current.name())
    }

    /// Start a transition and kick the warp. Dropped (returns `None`) while
    /// another transition is in flight or when `target` is already current.
    pub fn navigate(
        &mut self,
        target: Route,
        now_ms: f64,
        warp: &mut WarpSimulator,
    ) -> Option<Transition> {
        if self.pending.is_some() {
            log::debug!("[router] drop {} (transition in flight)", target.name());
            return None;
        }
        if target == self.current {
            return None;
        }
        let t = Transition {
            from: self.current,
            to: target,
            direction: Direction::between(self.current, target),
            started_ms: now_ms,
        };
        warp.pulse();
        self.pending = Some(t);
        log::info!("[router] {} -> {}", t.from.name(), t.to.name());
        Some(t)
    }

    /// Navigate to the neighbour in `dir`, if any.
    pub fn step(
        &mut self,
        dir: Direction,
        now_ms: f64,
        warp: &mut WarpSimulator,
    ) -> Option<Transition> {
        let target = self.active().adjacent(dir)?;
        self.navigate(target, now_ms, warp)
    }

    /// Commit the in-flight transition once the settle delay has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<Transition> {
        let t = self.pending?;
        if now_ms - t.started_ms < self.settle_ms {
            return None;
        }
        self.pending = None;
        self.current = t.to;
        Some(t)
    }
}

/// Horizontal swipe recognizer fed with touch start/end positions.
#[derive(Clone, Debug, Default)]
pub struct SwipeTracker {
    start: Option<Vec2>,
}

impl SwipeTracker {
    pub fn start(&mut self, x: f32, y: f32) {
        self.start = Some(Vec2::new(x, y));
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Direction of a completed swipe, or `None` for taps, short drags and
    /// mostly-vertical or diagonal movement. A leftward swipe moves forward.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Direction> {
        let start = self.start.take()?;
        classify_swipe(Vec2::new(x, y) - start)
    }
}

pub fn classify_swipe(delta: Vec2) -> Option<Direction> {
    if !delta.is_finite() {
        return None;
    }
    let (adx, ady) = (delta.x.abs(), delta.y.abs());
    if adx > SWIPE_MIN_DX_PX && adx > ady * SWIPE_MIN_RATIO {
        Some(if delta.x < 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        })
    } else {
        None
    }
}
