use lobby_core::{InputEvent, LobbyError, OrientationCapability, Simulation};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn orientation_ctor() -> Option<JsValue> {
    let w = web::window()?;
    let ctor = js_sys::Reflect::get(&w, &"DeviceOrientationEvent".into()).ok()?;
    (!ctor.is_undefined() && !ctor.is_null()).then_some(ctor)
}

fn request_permission_fn(ctor: &JsValue) -> Option<js_sys::Function> {
    js_sys::Reflect::get(ctor, &"requestPermission".into())
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()
}

/// What this platform offers for motion input.
pub fn detect_capability() -> OrientationCapability {
    match orientation_ctor() {
        None => OrientationCapability::Unavailable,
        Some(ctor) => {
            if request_permission_fn(&ctor).is_some() {
                OrientationCapability::NeedsPermission
            } else {
                OrientationCapability::NotRequired
            }
        }
    }
}

/// Start the one-time permission prompt. Must run inside a user gesture.
/// Any failure only disables orientation input.
pub fn request_permission_if_needed(sim: &Rc<RefCell<Simulation>>) {
    if !sim.borrow().engagement.needs_permission_request() {
        return;
    }
    let Some((ctor, f)) = orientation_ctor().and_then(|c| {
        let f = request_permission_fn(&c)?;
        Some((c, f))
    }) else {
        sim.borrow_mut()
            .engagement
            .set_orientation_capability(OrientationCapability::Unavailable);
        return;
    };
    let promise = match f.call0(&ctor).map(js_sys::Promise::from) {
        Ok(p) => p,
        Err(e) => {
            sim.borrow_mut()
                .engagement
                .permission_denied(&LobbyError::PermissionDenied(format!("{:?}", e)));
            return;
        }
    };
    sim.borrow_mut()
        .engagement
        .set_orientation_capability(OrientationCapability::Pending);
    let sim = sim.clone();
    spawn_local(async move {
        let answer = JsFuture::from(promise).await;
        let mut s = sim.borrow_mut();
        match answer.ok().and_then(|v| v.as_string()).as_deref() {
            Some("granted") => s
                .engagement
                .set_orientation_capability(OrientationCapability::Granted),
            other => s.engagement.permission_denied(&LobbyError::PermissionDenied(
                other.unwrap_or("prompt failed").to_string(),
            )),
        }
    });
}

pub fn wire_orientation(sim: &Rc<RefCell<Simulation>>) {
    let cap = detect_capability();
    sim.borrow_mut().engagement.set_orientation_capability(cap);
    if cap == OrientationCapability::Unavailable {
        return;
    }
    let sim = sim.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::DeviceOrientationEvent| {
        let (Some(gamma), Some(beta)) = (ev.gamma(), ev.beta()) else {
            return;
        };
        let mut s = sim.borrow_mut();
        let at_ms = s.now_ms();
        s.record_input(InputEvent::Orientation {
            gamma: gamma as f32,
            beta: beta as f32,
            at_ms,
        });
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback(
            "deviceorientation",
            closure.as_ref().unchecked_ref(),
        );
    }
    closure.forget();
}
