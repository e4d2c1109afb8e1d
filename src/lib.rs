#![cfg(target_arch = "wasm32")]
use instant::Instant;
use lobby_core::{FieldMode, LobbyConfig, Simulation};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod nav;
mod poll;
mod render;
mod status;
mod style;

fn resolve_config() -> LobbyConfig {
    let base = dom::global_string(constants::API_BASE_GLOBAL).unwrap_or_default();
    let mut config = LobbyConfig::new(&base, dom::is_touch_device());
    if let Some(path) = dom::global_string(constants::STATE_PATH_GLOBAL) {
        config = config.with_state_path(&path);
    }
    if let Some(ms) = dom::global_number(constants::POLL_MS_GLOBAL) {
        config = config.with_poll_interval(ms.max(0.0).min(u32::MAX as f64) as u32);
    }
    if let Some(name) = dom::global_string(constants::STAR_MODE_GLOBAL) {
        match FieldMode::from_name(&name) {
            Some(mode) => config = config.with_field_mode(mode),
            None => log::warn!("[config] unknown star mode '{}'", name),
        }
    }
    log::info!(
        "[config] api_base='{}' state={} poll={}ms mode={:?} touch={} density={}",
        config.api_base(),
        config.state_url(),
        config.poll_interval_ms,
        config.field_mode,
        config.touch_device,
        config.particle_density()
    );
    config
}

fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    if getrandom::getrandom(&mut bytes).is_err() {
        return js_sys::Date::now() as u64;
    }
    u64::from_le_bytes(bytes)
}

fn build_surface(document: &web::Document) -> anyhow::Result<render::CanvasSurface> {
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::STARS_CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::STARS_CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    render::CanvasSurface::new(canvas)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("lobby-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = resolve_config();
    let sim = Rc::new(RefCell::new(Simulation::new(
        &config,
        random_seed(),
        &nav::initial_fragment(),
    )));

    // Router
    let pages = Rc::new(nav::PageNav::collect(&document));
    pages.init(sim.borrow().router.current());
    nav::wire_router(&sim, &pages);

    // Engagement input: status control, page-wide touch, device orientation
    if let Some(status_el) = events::find_status(&document) {
        let wiring = events::InputWiring {
            sim: sim.clone(),
            status: status_el,
        };
        events::wire_pointer_handlers(&wiring);
        events::wire_touch_handlers(&wiring);
    }
    events::wire_orientation(&sim);

    // Remote state runs on its own interval; the frame loop ticks the countdown
    poll::start_polling(sim.clone(), config.state_url(), config.poll_interval_ms);

    audio::start_player(&document, &config);

    // Starfield; without a canvas the style bridge still drives the page
    let surface = match build_surface(&document) {
        Ok(mut surface) => {
            let (w, h) = surface.sync_size();
            sim.borrow_mut().resize(w, h);
            Some(surface)
        }
        Err(e) => {
            log::warn!("[field] starfield disabled: {:?}", e);
            None
        }
    };

    let resize_pending = Rc::new(Cell::new(false));
    frame::wire_resize(&resize_pending);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        sim: sim.clone(),
        surface,
        sink: style::RootStyleSink::new(&document),
        pages: pages.clone(),
        document: document.clone(),
        resize_pending,
        started: Instant::now(),
        frames: 0,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
