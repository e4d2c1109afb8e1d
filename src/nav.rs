//! DOM side of the page router: view flags, nav buttons, swipe and exit.

use crate::constants::*;
use crate::dom;
use lobby_core::{Route, Simulation, SwipeTracker, Transition};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct PageNav {
    pages: Vec<(Route, web::Element)>,
    nav_buttons: Vec<web::Element>,
}

fn set_display(el: &web::Element, value: &str) {
    if let Some(h) = el.dyn_ref::<web::HtmlElement>() {
        _ = h.style().set_property("display", value);
    }
}

impl PageNav {
    pub fn collect(document: &web::Document) -> Self {
        let pages = dom::query_all(document, PAGE_SELECTOR)
            .into_iter()
            .filter_map(|el| {
                let route = Route::from_name(&el.get_attribute("data-page")?)?;
                Some((route, el))
            })
            .collect();
        let nav_buttons = dom::query_all(document, NAV_SELECTOR);
        for b in &nav_buttons {
            if b.get_attribute("data-label").is_none() {
                let label = b.text_content().unwrap_or_default();
                _ = b.set_attribute("data-label", label.trim());
            }
        }
        Self { pages, nav_buttons }
    }

    fn page(&self, route: Route) -> Option<&web::Element> {
        self.pages.iter().find(|(r, _)| *r == route).map(|(_, el)| el)
    }

    fn set_active_nav(&self, route: Route) {
        for b in &self.nav_buttons {
            let on = b.get_attribute("data-route").as_deref() == Some(route.name());
            dom::set_class(b, CLASS_ACTIVE, on);
            if on {
                _ = b.set_attribute("aria-current", "page");
            } else {
                _ = b.remove_attribute("aria-current");
            }
        }
    }

    /// Show the initial route without animation.
    pub fn init(&self, route: Route) {
        for (r, el) in &self.pages {
            dom::set_class(el, CLASS_ACTIVE, *r == route);
        }
        self.set_active_nav(route);
    }

    /// Swap active-view flags at the start of a transition.
    pub fn begin(&self, t: &Transition) {
        if let Some(next) = self.page(t.to) {
            set_display(next, "flex");
            dom::set_class(next, CLASS_ENTERING, true);
            dom::set_class(next, CLASS_LEAVING, false);
            dom::set_class(next, CLASS_ACTIVE, true);
            _ = next.set_attribute("data-dir", t.direction.as_attr());
        }
        if let Some(cur) = self.page(t.from) {
            dom::set_class(cur, CLASS_LEAVING, true);
            dom::set_class(cur, CLASS_ENTERING, false);
            dom::set_class(cur, CLASS_ACTIVE, false);
        }
    }

    /// Clear transition classes and write the route into the fragment.
    pub fn commit(&self, t: &Transition) {
        if let Some(cur) = self.page(t.from) {
            dom::set_class(cur, CLASS_LEAVING, false);
            set_display(cur, "");
        }
        if let Some(next) = self.page(t.to) {
            dom::set_class(next, CLASS_ENTERING, false);
            _ = next.set_attribute("data-dir", "");
        }
        self.set_active_nav(t.to);
        if let Some(history) = web::window().and_then(|w| w.history().ok()) {
            let fragment = format!("#{}", t.to.name());
            _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&fragment));
        }
    }
}

pub fn initial_fragment() -> String {
    web::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

fn go(sim: &Rc<RefCell<Simulation>>, pages: &PageNav, target: Route) {
    let mut s = sim.borrow_mut();
    let now = s.now_ms();
    if let Some(t) = s.navigate(target, now) {
        pages.begin(&t);
    }
}

fn wire_route_buttons(
    sim: &Rc<RefCell<Simulation>>,
    pages: &Rc<PageNav>,
    selector: &str,
    attr: &'static str,
) {
    let Some(document) = dom::window_document() else {
        return;
    };
    for el in dom::query_all(&document, selector) {
        let Some(route) = el.get_attribute(attr).and_then(|n| Route::from_name(&n)) else {
            continue;
        };
        let sim = sim.clone();
        let pages = pages.clone();
        let closure = Closure::wrap(Box::new(move || {
            go(&sim, &pages, route);
        }) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn wire_swipe(sim: &Rc<RefCell<Simulation>>, pages: &Rc<PageNav>) {
    let Some(stage) = dom::window_document().and_then(|d| d.get_element_by_id(STAGE_ID)) else {
        return;
    };
    let swipe = Rc::new(RefCell::new(SwipeTracker::default()));

    let swipe_start = swipe.clone();
    let on_start = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        if let Some(t) = ev.touches().get(0) {
            swipe_start
                .borrow_mut()
                .start(t.client_x() as f32, t.client_y() as f32);
        }
    }) as Box<dyn FnMut(_)>);
    _ = stage.add_event_listener_with_callback("touchstart", on_start.as_ref().unchecked_ref());
    on_start.forget();

    let sim = sim.clone();
    let pages = pages.clone();
    let on_end = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        let Some(t) = ev.changed_touches().get(0) else {
            swipe.borrow_mut().cancel();
            return;
        };
        let Some(dir) = swipe
            .borrow_mut()
            .end(t.client_x() as f32, t.client_y() as f32)
        else {
            return;
        };
        let mut s = sim.borrow_mut();
        let now = s.now_ms();
        if let Some(tr) = s.swipe(dir, now) {
            pages.begin(&tr);
        }
    }) as Box<dyn FnMut(_)>);
    _ = stage.add_event_listener_with_callback("touchend", on_end.as_ref().unchecked_ref());
    on_end.forget();
}

/// Close the host web-app if it exposes `Telegram.WebApp.close`, otherwise
/// go back in history.
pub fn exit_host() {
    let Some(window) = web::window() else {
        return;
    };
    let close = js_sys::Reflect::get(&window, &"Telegram".into())
        .and_then(|tg| js_sys::Reflect::get(&tg, &"WebApp".into()))
        .and_then(|app| {
            let f = js_sys::Reflect::get(&app, &"close".into())?;
            Ok((app, f))
        });
    if let Ok((app, f)) = close {
        if let Some(f) = f.dyn_ref::<js_sys::Function>() {
            if f.call0(&app).is_ok() {
                return;
            }
        }
    }
    if let Ok(history) = window.history() {
        _ = history.back();
    }
}

pub fn wire_router(sim: &Rc<RefCell<Simulation>>, pages: &Rc<PageNav>) {
    wire_route_buttons(sim, pages, NAV_SELECTOR, "data-route");
    wire_route_buttons(sim, pages, GO_SELECTOR, "data-go");
    wire_swipe(sim, pages);
    if let Some(document) = dom::window_document() {
        dom::add_click_listener(&document, EXIT_ID, exit_host);
    }
}
