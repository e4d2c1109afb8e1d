//! Starfield particle pool.
//!
//! The pool is the lifetime unit: particles are rerolled in place when they
//! leave the wrap boundary (or reach the near plane in tunnel mode) and the
//! whole pool is rebuilt on resize.

use crate::constants::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FieldMode {
    /// Slow sideways drift with edge wrapping.
    #[default]
    Drift,
    /// Particles stream outward from the centre through a depth range.
    Tunnel,
}

impl FieldMode {
    /// Parse a page-level mode name (`drift`, `tunnel`), case-insensitive.
    pub fn from_name(name: &str) -> Option<FieldMode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "drift" => Some(FieldMode::Drift),
            "tunnel" => Some(FieldMode::Tunnel),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
    pub base_alpha: f32,
    /// Pixels per reference frame.
    pub vel: Vec2,
    pub twinkle_rate: f32,
    pub twinkle_phase: f32,
    /// Tunnel mode only: depth in `(TUNNEL_NEAR, 1]` and unit-square origin.
    pub depth: f32,
    pub origin: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba()` string for canvas fill styles.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Core and glow colours for one gate phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub core: Rgba,
    pub glow: Rgba,
}

pub const PALETTE_OPEN: Palette = Palette {
    core: Rgba::rgb(255, 255, 255),
    glow: Rgba::rgb(0, 220, 255), // cool neon
};

pub const PALETTE_CLOSED: Palette = Palette {
    core: Rgba::rgb(255, 244, 230),
    glow: Rgba::rgb(255, 150, 80), // warm ember
};

pub fn palette_for(gate_open: bool) -> Palette {
    if gate_open {
        PALETTE_OPEN
    } else {
        PALETTE_CLOSED
    }
}

/// Drawing target for the render pass.
pub trait StarSurface {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);
}

/// Pool size for a viewport: `floor(area / density)`, capped.
pub fn particle_count_for(width: f32, height: f32, density_px2: f32) -> usize {
    if !(width > 0.0 && height > 0.0 && density_px2 > 0.0) || !(width * height).is_finite() {
        return 0;
    }
    (((width * height) / density_px2).floor() as usize).min(MAX_PARTICLES)
}

/// Position multiplier per reference frame; never zero so the closed scene
/// keeps drifting.
pub fn speed_factor(intensity: f32, gate_open: bool) -> f32 {
    let base = if gate_open {
        SPEED_OPEN_BASE
    } else {
        SPEED_CLOSED_BASE
    };
    let intensity = if intensity.is_finite() {
        intensity.clamp(0.0, INTENSITY_MAX)
    } else {
        0.0
    };
    base + intensity * SPEED_WARP_GAIN
}

/// Twinkled alpha: `base_alpha` scaled by a 0.5..1 blend of a per-particle sine.
pub fn twinkle_alpha(p: &Particle, elapsed_sec: f64) -> f32 {
    let phase = (elapsed_sec as f32) * p.twinkle_rate + p.twinkle_phase;
    let tw = (phase.sin() + 1.0) * 0.5;
    p.base_alpha * (TWINKLE_FLOOR + tw * (1.0 - TWINKLE_FLOOR))
}

pub struct ParticleField {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    density_px2: f32,
    mode: FieldMode,
    rng: StdRng,
    elapsed_sec: f64,
}

impl ParticleField {
    pub fn new(seed: u64, density_px2: f32, mode: FieldMode) -> Self {
        Self {
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            density_px2,
            mode,
            rng: StdRng::seed_from_u64(seed),
            elapsed_sec: 0.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    pub fn elapsed_sec(&self) -> f64 {
        self.elapsed_sec
    }

    /// Rebuild the pool for a new viewport size.
    pub fn resize(&mut self, width: f32, height: f32) {
        let (width, height) = if width.is_finite() && height.is_finite() {
            (width.max(0.0), height.max(0.0))
        } else {
            (0.0, 0.0)
        };
        self.width = width;
        self.height = height;
        let count = particle_count_for(width, height, self.density_px2);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let p = self.roll(true);
            self.particles.push(p);
        }
        log::info!(
            "[field] resize {:.0}x{:.0} -> {} particles ({:?})",
            width,
            height,
            count,
            self.mode
        );
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    fn tunnel_spread(&self) -> f32 {
        self.width.min(self.height) * TUNNEL_SPREAD
    }

    fn tunnel_pos(&self, origin: Vec2, depth: f32) -> Vec2 {
        self.center() + origin * (self.tunnel_spread() / depth.max(TUNNEL_NEAR))
    }

    /// Fresh particle. `scatter` spreads tunnel depths over the whole range so
    /// the initial field is not a single shell.
    fn roll(&mut self, scatter: bool) -> Particle {
        let rng = &mut self.rng;
        let pos = Vec2::new(rng.gen::<f32>() * self.width, rng.gen::<f32>() * self.height);
        let radius = RADIUS_MIN + rng.gen::<f32>() * RADIUS_SPAN;
        let base_alpha = ALPHA_MIN + rng.gen::<f32>() * ALPHA_SPAN;
        let vel = Vec2::new(
            VX_MIN + rng.gen::<f32>() * VX_SPAN,
            VY_MIN + rng.gen::<f32>() * VY_SPAN,
        );
        let twinkle_rate = TWINKLE_RATE_MIN + rng.gen::<f32>() * TWINKLE_RATE_SPAN;
        let twinkle_phase = rng.gen::<f32>() * TAU;
        let origin = Vec2::new(rng.gen::<f32>() * 2.0 - 1.0, rng.gen::<f32>() * 2.0 - 1.0);
        let depth = if scatter {
            TUNNEL_NEAR + (1.0 - TUNNEL_NEAR) * (0.25 + 0.75 * rng.gen::<f32>())
        } else {
            1.0
        };
        let mut p = Particle {
            pos,
            radius,
            base_alpha,
            vel,
            twinkle_rate,
            twinkle_phase,
            depth,
            origin,
        };
        if self.mode == FieldMode::Tunnel {
            p.pos = self.tunnel_pos(origin, depth);
            if !self.in_bounds(p.pos) {
                p.depth = 1.0;
                p.pos = self.tunnel_pos(origin, 1.0);
            }
        }
        p
    }

    fn in_bounds(&self, pos: Vec2) -> bool {
        let m = WRAP_MARGIN_PX;
        pos.x >= -m && pos.x <= self.width + m && pos.y >= -m && pos.y <= self.height + m
    }

    /// Move every particle by `vel * speed_factor` (scaled to `dt`) and apply
    /// the wrap/regenerate rule.
    pub fn advance(&mut self, dt: f32, intensity: f32, gate_open: bool) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.elapsed_sec += dt as f64;
        let speed = speed_factor(intensity, gate_open);
        let frames = dt * REFERENCE_FPS;
        let m = WRAP_MARGIN_PX;
        let (w, h) = (self.width, self.height);

        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            match self.mode {
                FieldMode::Drift => {
                    p.pos += p.vel * speed * frames;
                    if p.pos.x > w + m {
                        p.pos.x = -m;
                    }
                    if p.pos.x < -m {
                        p.pos.x = w + m;
                    }
                    if p.pos.y > h + m {
                        p.pos.y = -m;
                    }
                    if p.pos.y < -m {
                        p.pos.y = h + m;
                    }
                }
                FieldMode::Tunnel => {
                    p.depth -= dt * TUNNEL_SPEED_PER_SEC * speed;
                    if p.depth <= TUNNEL_NEAR {
                        p = self.roll(false);
                    } else {
                        p.pos = self.tunnel_pos(p.origin, p.depth);
                        if !self.in_bounds(p.pos) {
                            p = self.roll(false);
                        }
                    }
                }
            }
            // Stale data from before a resize, or a non-finite position.
            if !p.pos.is_finite() || !self.in_bounds(p.pos) {
                p = self.roll(false);
            }
            self.particles[i] = p;
        }
    }

    fn apparent_radius(&self, p: &Particle) -> f32 {
        match self.mode {
            FieldMode::Drift => p.radius,
            FieldMode::Tunnel => p.radius * (1.0 / p.depth.max(TUNNEL_NEAR)).sqrt().min(3.0),
        }
    }

    /// Draw a solid core and a larger low-alpha glow per particle.
    pub fn render<S: StarSurface>(
        &self,
        surface: &mut S,
        gate_open: bool,
        intensity: f32,
        stars_boost: f32,
    ) {
        surface.clear(self.width, self.height);
        let palette = palette_for(gate_open);
        let boost = 1.0 + 0.5 * stars_boost.clamp(0.0, INTENSITY_MAX);
        let glow_gain = GLOW_ALPHA_BASE + GLOW_ALPHA_WARP * intensity.clamp(0.0, INTENSITY_MAX);
        for p in &self.particles {
            let a = (twinkle_alpha(p, self.elapsed_sec) * boost).min(1.0);
            let r = self.apparent_radius(p);
            surface.fill_circle(p.pos.x, p.pos.y, r, palette.core.with_alpha(a));
            surface.fill_circle(
                p.pos.x,
                p.pos.y,
                r * GLOW_RADIUS_SCALE,
                palette.glow.with_alpha(a * glow_gain),
            );
        }
    }
}
