use lobby_core::StyleSink;
use web_sys as web;

/// Writes custom properties onto `document.documentElement`.
pub struct RootStyleSink {
    style: Option<web::CssStyleDeclaration>,
}

impl RootStyleSink {
    pub fn new(document: &web::Document) -> Self {
        let style = document
            .document_element()
            .and_then(|el| wasm_bindgen::JsCast::dyn_into::<web::HtmlElement>(el).ok())
            .map(|el| el.style());
        if style.is_none() {
            log::warn!("[style] no root element; style variables disabled");
        }
        Self { style }
    }
}

impl StyleSink for RootStyleSink {
    fn set_var(&mut self, name: &str, value: &str) {
        if let Some(style) = &self.style {
            _ = style.set_property(name, value);
        }
    }
}
