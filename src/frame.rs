use crate::nav;
use crate::render::CanvasSurface;
use crate::status;
use crate::style::RootStyleSink;
use instant::Instant;
use lobby_core::Simulation;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub sim: Rc<RefCell<Simulation>>,
    pub surface: Option<CanvasSurface>,
    pub sink: RootStyleSink,
    pub pages: Rc<nav::PageNav>,
    pub document: web::Document,
    pub resize_pending: Rc<Cell<bool>>,
    pub started: Instant,
    pub frames: u64,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;

        if self.resize_pending.replace(false) {
            if let Some(surface) = &mut self.surface {
                let (w, h) = surface.sync_size();
                self.sim.borrow_mut().resize(w, h);
            }
        }

        let report = {
            let mut sim = self.sim.borrow_mut();
            match &mut self.surface {
                Some(surface) => sim.frame(now_ms, surface, &mut self.sink),
                None => {
                    let report = sim.step(now_ms);
                    sim.publish_style(&mut self.sink);
                    report
                }
            }
        };

        if let Some(t) = report.committed {
            self.pages.commit(&t);
        }

        let countdown = self
            .sim
            .borrow_mut()
            .countdown_due(now_ms, js_sys::Date::now());
        if let Some(text) = countdown {
            status::render_countdown(&self.document, &text);
        }

        self.frames += 1;
        if self.frames % 600 == 0 {
            log::debug!(
                "[frame] t={:.1}s intensity={:.3} hold={:.3} engage={:.2}",
                now_ms / 1000.0,
                report.warp.intensity,
                report.warp.hold,
                report.warp.engage
            );
        }
    }
}

/// Flag a pool rebuild on window resize; the frame loop performs it.
pub fn wire_resize(resize_pending: &Rc<Cell<bool>>) {
    let flag = resize_pending.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        flag.set(true);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
