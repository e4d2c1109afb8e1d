use crate::constants::MAX_DEVICE_PIXEL_RATIO;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// All elements matching `selector`, in document order.
pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::Element> {
    let mut out = Vec::new();
    if let Ok(list) = document.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

#[inline]
pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

#[inline]
pub fn set_class(el: &web::Element, class: &str, on: bool) {
    let cl = el.class_list();
    _ = if on { cl.add_1(class) } else { cl.remove_1(class) };
}

/// Viewport size in CSS pixels.
pub fn viewport_size() -> (f32, f32) {
    let Some(w) = web::window() else {
        return (0.0, 0.0);
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width.floor() as f32, height.floor() as f32)
}

/// Match the canvas backing store to the viewport at a capped device pixel
/// ratio. Returns the ratio used so the 2D context can be scaled.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> f64 {
    let Some(w) = web::window() else {
        return 1.0;
    };
    let dpr = w.device_pixel_ratio().clamp(1.0, MAX_DEVICE_PIXEL_RATIO);
    let (css_w, css_h) = viewport_size();
    canvas.set_width(((css_w as f64) * dpr).max(1.0) as u32);
    canvas.set_height(((css_h as f64) * dpr).max(1.0) as u32);
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", css_w));
    _ = style.set_property("height", &format!("{}px", css_h));
    dpr
}

/// Whether the device reports touch points (selects a sparser starfield).
pub fn is_touch_device() -> bool {
    web::window()
        .map(|w| w.navigator().max_touch_points() > 0)
        .unwrap_or(false)
}

fn global_value(name: &str) -> Option<wasm_bindgen::JsValue> {
    let w = web::window()?;
    js_sys::Reflect::get(&w, &name.into()).ok()
}

/// Read a string global such as `window.API_BASE`.
pub fn global_string(name: &str) -> Option<String> {
    global_value(name)?.as_string()
}

/// Read a numeric global such as `window.POLL_MS`; numeric strings count.
pub fn global_number(name: &str) -> Option<f64> {
    let v = global_value(name)?;
    v.as_f64()
        .or_else(|| v.as_string().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|n| n.is_finite())
}
