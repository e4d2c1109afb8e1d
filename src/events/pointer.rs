use crate::constants::{ROOM_URL, STATUS_ID};
use crate::dom;
use lobby_core::{ControlRect, InputEvent, InputSource, Simulation};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub sim: Rc<RefCell<Simulation>>,
    pub status: web::Element,
}

#[inline]
pub fn control_rect(el: &web::Element) -> ControlRect {
    let r = el.get_bounding_client_rect();
    ControlRect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

#[inline]
fn viewport() -> glam::Vec2 {
    let (w, h) = dom::viewport_size();
    glam::Vec2::new(w, h)
}

pub fn wire_pointer_handlers(w: &InputWiring) {
    wire_enter(w);
    wire_move(w);
    wire_leave(w);
    wire_viewport_move(w);
    wire_status_click(w);
}

fn wire_enter(w: &InputWiring) {
    let w2 = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let rect = control_rect(&w2.status);
        w2.sim.borrow_mut().record_input(InputEvent::ControlEnter {
            source: InputSource::Pointer,
            x: ev.client_x() as f32,
            y: ev.client_y() as f32,
            rect,
        });
    }) as Box<dyn FnMut(_)>);
    _ = w
        .status
        .add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_move(w: &InputWiring) {
    let w2 = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let rect = control_rect(&w2.status);
        w2.sim.borrow_mut().record_input(InputEvent::ControlMove {
            x: ev.client_x() as f32,
            y: ev.client_y() as f32,
            rect,
        });
    }) as Box<dyn FnMut(_)>);
    _ = w
        .status
        .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_leave(w: &InputWiring) {
    let w2 = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
        w2.sim.borrow_mut().record_input(InputEvent::ControlLeave);
    }) as Box<dyn FnMut(_)>);
    _ = w
        .status
        .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_viewport_move(w: &InputWiring) {
    let w2 = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        w2.sim.borrow_mut().record_input(InputEvent::ViewportPointer {
            x: ev.client_x() as f32,
            y: ev.client_y() as f32,
            viewport: viewport(),
        });
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_status_click(w: &InputWiring) {
    let sim = w.sim.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
        if sim.borrow().gate.is_open() {
            if let Some(wnd) = web::window() {
                _ = wnd.location().set_href(ROOM_URL);
            }
        }
    }) as Box<dyn FnMut()>);
    _ = w
        .status
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Status control, if the page has one.
pub fn find_status(document: &web::Document) -> Option<web::Element> {
    document.get_element_by_id(STATUS_ID)
}
