//! Gate-state polling on a fixed browser interval. The frame loop never
//! awaits it; it only reads the committed snapshot.

use crate::dom;
use crate::status;
use lobby_core::{parse_gate_body, GateState, LobbyError, LobbyResult, Simulation};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn js_err(e: JsValue) -> LobbyError {
    LobbyError::Network(format!("{:?}", e))
}

fn parse_browser_date(s: &str) -> Option<f64> {
    let v = js_sys::Date::parse(s);
    v.is_finite().then_some(v)
}

/// GET `url` bypassing the HTTP cache. Non-2xx responses are errors.
pub async fn fetch_text(url: &str) -> LobbyResult<String> {
    let window = web::window().ok_or_else(|| LobbyError::Network("no window".to_string()))?;
    let opts = web::RequestInit::new();
    opts.set_cache(web::RequestCache::NoStore);
    let resp = JsFuture::from(window.fetch_with_str_and_init(url, &opts))
        .await
        .map_err(js_err)?;
    let resp: web::Response = resp.dyn_into().map_err(js_err)?;
    if !resp.ok() {
        return Err(LobbyError::Http {
            status: resp.status(),
        });
    }
    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    text.as_string()
        .ok_or_else(|| LobbyError::Malformed("response body is not text".to_string()))
}

pub async fn poll_gate(url: &str) -> LobbyResult<GateState> {
    let body = fetch_text(url).await?;
    Ok(parse_gate_body(&body, js_sys::Date::now(), parse_browser_date))
}

fn refresh_status(sim: &Rc<RefCell<Simulation>>) {
    if let Some(document) = dom::window_document() {
        let s = sim.borrow();
        let gate = s.gate();
        status::render_gate(&document, &gate, s.gate.is_offline());
        status::render_countdown(&document, &s.countdown(js_sys::Date::now()));
    }
}

fn poll_once(sim: Rc<RefCell<Simulation>>, url: Rc<str>, in_flight: Rc<Cell<bool>>) {
    if in_flight.replace(true) {
        return;
    }
    spawn_local(async move {
        let result = poll_gate(&url).await;
        sim.borrow_mut().commit_poll(result);
        in_flight.set(false);
        refresh_status(&sim);
    });
}

pub fn set_interval(period_ms: u32, mut tick: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || tick()) as Box<dyn FnMut()>);
    if let Some(w) = web::window() {
        _ = w.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms as i32,
        );
    }
    closure.forget();
}

/// Poll immediately, then every `period_ms`. A failed poll is retried on the
/// next tick only.
pub fn start_polling(sim: Rc<RefCell<Simulation>>, url: String, period_ms: u32) {
    let url: Rc<str> = url.into();
    let in_flight = Rc::new(Cell::new(false));
    log::info!("[poll] {} every {}ms", url, period_ms);
    poll_once(sim.clone(), url.clone(), in_flight.clone());
    set_interval(period_ms, move || {
        poll_once(sim.clone(), url.clone(), in_flight.clone());
    });
}
