// Host-side tests for the warp simulator.

use lobby_core::constants::*;
use lobby_core::*;

const DT: f32 = 1.0 / 60.0;

fn run(sim: &mut WarpSimulator, frames: usize, target: f32, open: bool) -> WarpState {
    let mut s = sim.state();
    for _ in 0..frames {
        s = sim.step(DT, target, open);
    }
    s
}

#[test]
fn blend_alpha_is_zero_for_zero_dt() {
    assert_eq!(blend_alpha(0.09, 0.0), 0.0);
    assert_eq!(blend_alpha(0.09, -1.0), 0.0);
    assert_eq!(blend_alpha(0.09, f32::NAN), 0.0);
}

#[test]
fn blend_alpha_matches_per_frame_factor_at_reference_rate() {
    let a = blend_alpha(0.09, 1.0 / 60.0);
    assert!((a - 0.09).abs() < 1e-4);
}

#[test]
fn smoothstep_endpoints_and_midpoint() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    assert_eq!(smoothstep(-3.0), 0.0);
    assert_eq!(smoothstep(7.0), 1.0);
}

#[test]
fn zero_dt_leaves_state_unchanged() {
    let mut sim = WarpSimulator::default();
    run(&mut sim, 60, 1.0, true);
    let before = sim.state();
    let after = sim.step(0.0, 1.0, true);
    assert_eq!(after.hold, before.hold);
    assert_eq!(after.intensity, before.intensity);
    assert_eq!(after.engage, before.engage);
    assert_eq!(after.velocity, 0.0);
}

#[test]
fn huge_dt_is_clamped_and_stays_finite() {
    let mut sim = WarpSimulator::default();
    let s = sim.step(30.0, 1.0, true);
    assert!(s.intensity.is_finite());
    assert!(s.hold <= HOLD_CAP);
    // one clamped frame cannot saturate hold
    assert!(s.hold <= MAX_FRAME_DT_SEC * HOLD_RISE_PER_SEC + 1e-6);

    let s = sim.step(f32::INFINITY, f32::NAN, true);
    assert!(s.intensity.is_finite());
    assert!(s.engage.is_finite());
}

#[test]
fn sustained_engagement_builds_and_stays_bounded() {
    let mut sim = WarpSimulator::default();
    let s = run(&mut sim, 600, 1.0, true);
    assert!(s.hold > HOLD_CAP * 0.99);
    assert!(s.intensity > INTENSITY_FLOOR);
    assert!(s.intensity <= INTENSITY_MAX);
    assert!(s.stars_boost > 0.0);
    assert!(s.stars_boost <= INTENSITY_MAX);
}

#[test]
fn hold_rises_monotonically_while_engaged() {
    let mut sim = WarpSimulator::default();
    // let engage cross the threshold first
    run(&mut sim, 10, 1.0, true);
    let mut prev = sim.state().hold;
    for _ in 0..60 {
        let s = sim.step(DT, 1.0, true);
        assert!(s.hold >= prev);
        prev = s.hold;
    }
}

#[test]
fn release_decays_monotonically_to_zero() {
    let mut sim = WarpSimulator::default();
    run(&mut sim, 300, 1.0, true);
    let mut prev = sim.state();
    for _ in 0..1200 {
        let s = sim.step(DT, 0.0, true);
        assert!(s.hold < prev.hold || s.hold == 0.0);
        assert!(s.intensity <= prev.intensity + 1e-6);
        prev = s;
    }
    assert_eq!(prev.hold, 0.0);
    assert!(prev.intensity < 1e-3);
}

#[test]
fn closed_gate_ignores_engagement() {
    let mut sim = WarpSimulator::default();
    let s = run(&mut sim, 300, 1.0, false);
    assert_eq!(s.hold, 0.0);
    assert_eq!(s.engage, 0.0);
    assert_eq!(s.intensity, 0.0);
    assert_eq!(s.stars_boost, 0.0);
}

#[test]
fn gate_closing_mid_hold_falls_back() {
    let mut sim = WarpSimulator::default();
    run(&mut sim, 120, 1.0, true);
    let held = sim.state();
    assert!(held.hold > 0.0);
    let s = run(&mut sim, 600, 1.0, false);
    assert_eq!(s.hold, 0.0);
    assert!(s.intensity < held.intensity);
}

#[test]
fn pulse_saturates_then_decays_without_input() {
    let mut sim = WarpSimulator::default();
    sim.pulse();
    let s = sim.state();
    assert_eq!(s.hold, HOLD_CAP);
    assert!(s.intensity >= PULSE_INTENSITY.min(INTENSITY_MAX));

    let after = run(&mut sim, 600, 0.0, true);
    assert!(after.intensity < 0.05);
    assert_eq!(after.hold, 0.0);
}

#[test]
fn reset_clears_state() {
    let mut sim = WarpSimulator::default();
    run(&mut sim, 120, 1.0, true);
    sim.reset();
    assert_eq!(sim.state(), WarpState::default());
}

#[test]
fn frame_rate_independent_trajectory() {
    let mut a = WarpSimulator::default();
    let mut b = WarpSimulator::default();
    for _ in 0..120 {
        a.step(1.0 / 60.0, 1.0, true);
    }
    for _ in 0..240 {
        b.step(1.0 / 120.0, 1.0, true);
    }
    assert!((a.state().hold - b.state().hold).abs() < 0.05);
    assert!((a.state().intensity - b.state().intensity).abs() < 0.05);
}
