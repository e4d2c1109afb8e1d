use crate::constants::{META_ID, STATUS_ID, TIMER_ID, WINDOW_BADGE_ID};
use crate::dom;
use lobby_core::GateState;
use web_sys as web;

/// Reflect the gate snapshot on the status control and meta line.
pub fn render_gate(document: &web::Document, gate: &GateState, offline: bool) {
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        let label = if gate.open { "OPEN" } else { "CLOSED" };
        if el.text_content().as_deref() != Some(label) {
            el.set_text_content(Some(label));
        }
        dom::set_class(&el, "open", gate.open);
        dom::set_class(&el, "closed", !gate.open);
        _ = el.set_attribute("aria-disabled", if gate.open { "false" } else { "true" });
    }
    let meta = if offline {
        "offline".to_string()
    } else {
        match &gate.window_id {
            Some(id) => format!("window: {}", id),
            None => String::new(),
        }
    };
    dom::set_text(document, META_ID, &meta);
    dom::set_text(
        document,
        WINDOW_BADGE_ID,
        &format!("window: {}", if gate.open { "OPEN" } else { "CLOSED" }),
    );
}

#[inline]
pub fn render_countdown(document: &web::Document, text: &str) {
    dom::set_text(document, TIMER_ID, text);
}
