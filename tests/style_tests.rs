// Host-side tests for the CSS variable bridge.

use glam::Vec2;
use lobby_core::*;
use std::collections::HashMap;

#[derive(Default)]
struct MapSink {
    vars: HashMap<String, String>,
    writes: usize,
}

impl StyleSink for MapSink {
    fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
        self.writes += 1;
    }
}

fn inputs(intensity: f32) -> StyleInputs {
    StyleInputs {
        intensity,
        stars_boost: 0.3,
        tilt_x: 1.5,
        tilt_y: -2.25,
        parallax: Vec2::new(4.0, -3.0),
        gate_open: true,
    }
}

#[test]
fn first_publish_writes_every_variable() {
    let mut bridge = StyleBridge::new();
    let mut sink = MapSink::default();
    let n = bridge.publish(&inputs(0.5), &mut sink);
    assert_eq!(n, derive_vars(&inputs(0.5)).len());
    assert_eq!(sink.vars[VAR_WARP], "0.500");
    assert_eq!(sink.vars[VAR_TILT_X], "1.50deg");
    assert_eq!(sink.vars[VAR_TILT_Y], "-2.25deg");
    assert_eq!(sink.vars[VAR_PAR_X], "4.00px");
    assert_eq!(sink.vars[VAR_GATE], "1");
}

#[test]
fn publish_is_idempotent() {
    let mut bridge = StyleBridge::new();
    let mut sink = MapSink::default();
    bridge.publish(&inputs(0.5), &mut sink);
    let before = sink.writes;
    assert_eq!(bridge.publish(&inputs(0.5), &mut sink), 0);
    assert_eq!(sink.writes, before);
}

#[test]
fn only_changed_values_are_written() {
    let mut bridge = StyleBridge::new();
    let mut sink = MapSink::default();
    bridge.publish(&inputs(0.5), &mut sink);
    let mut next = inputs(0.5);
    next.tilt_x = 3.0;
    assert_eq!(bridge.publish(&next, &mut sink), 1);
    assert_eq!(bridge.value(VAR_TILT_X), Some("3.00deg"));
}

#[test]
fn invalidate_forces_rewrite() {
    let mut bridge = StyleBridge::new();
    let mut sink = MapSink::default();
    let n = bridge.publish(&inputs(0.2), &mut sink);
    bridge.invalidate();
    assert_eq!(bridge.value(VAR_WARP), None);
    assert_eq!(bridge.publish(&inputs(0.2), &mut sink), n);
}

#[test]
fn derived_values_track_intensity() {
    let idle = derive_vars(&inputs(0.0));
    let warp = derive_vars(&inputs(1.2));
    let get = |vars: &[(&'static str, String)], name: &str| -> f32 {
        let v = &vars.iter().find(|(n, _)| *n == name).expect("var").1;
        v.trim_end_matches(|c: char| c.is_alphabetic()).parse().expect("number")
    };
    assert!(get(&warp[..], VAR_BG_SPEED) < get(&idle[..], VAR_BG_SPEED));
    assert!(get(&warp[..], VAR_GLOW) > get(&idle[..], VAR_GLOW));
    assert!(get(&warp[..], VAR_BG_HUE) > get(&idle[..], VAR_BG_HUE));
}

#[test]
fn gate_phase_changes_hue() {
    let mut closed = inputs(0.0);
    closed.gate_open = false;
    let open = derive_vars(&inputs(0.0));
    let closed = derive_vars(&closed);
    let hue = |vars: &[(&'static str, String)]| {
        vars.iter().find(|(n, _)| *n == VAR_BG_HUE).map(|(_, v)| v.clone())
    };
    assert_ne!(hue(&open[..]), hue(&closed[..]));
}

#[test]
fn non_finite_inputs_publish_zeroes() {
    let vars = derive_vars(&StyleInputs {
        intensity: f32::NAN,
        stars_boost: f32::INFINITY,
        tilt_x: f32::NAN,
        tilt_y: 0.0,
        parallax: Vec2::new(f32::NAN, 0.0),
        gate_open: false,
    });
    for (name, value) in &vars {
        assert!(!value.contains("NaN"), "{} = {}", name, value);
        assert!(!value.contains("inf"), "{} = {}", name, value);
    }
}
