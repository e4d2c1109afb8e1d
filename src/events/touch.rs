use super::orientation;
use super::pointer::{control_rect, InputWiring};
use crate::dom;
use lobby_core::{InputEvent, InputSource};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn first_touch(ev: &web::TouchEvent) -> Option<web::Touch> {
    ev.touches().get(0).or_else(|| ev.changed_touches().get(0))
}

pub fn wire_touch_handlers(w: &InputWiring) {
    wire_control_touchstart(w);
    wire_touch_end(w, "touchend");
    wire_touch_end(w, "touchcancel");
    wire_touchmove(w);
}

fn wire_control_touchstart(w: &InputWiring) {
    let w2 = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        // First qualifying touch doubles as the motion-permission gesture.
        orientation::request_permission_if_needed(&w2.sim);
        let Some(t) = first_touch(&ev) else {
            return;
        };
        let rect = control_rect(&w2.status);
        w2.sim.borrow_mut().record_input(InputEvent::ControlEnter {
            source: InputSource::Touch,
            x: t.client_x() as f32,
            y: t.client_y() as f32,
            rect,
        });
    }) as Box<dyn FnMut(_)>);
    _ = w
        .status
        .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_touch_end(w: &InputWiring, kind: &str) {
    let sim = w.sim.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::TouchEvent| {
        sim.borrow_mut().record_input(InputEvent::TouchEnd);
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_touchmove(w: &InputWiring) {
    let sim = w.sim.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        let Some(t) = first_touch(&ev) else {
            return;
        };
        let (vw, vh) = dom::viewport_size();
        sim.borrow_mut().record_input(InputEvent::TouchMove {
            x: t.client_x() as f32,
            y: t.client_y() as f32,
            viewport: glam::Vec2::new(vw, vh),
        });
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
