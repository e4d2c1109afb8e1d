use lobby_core::{Rgba, StarSurface};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Canvas 2D target for the starfield pass. Coordinates are CSS pixels; the
/// context transform maps them onto the device-pixel backing store.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    last_fill: String,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            canvas,
            ctx,
            last_fill: String::new(),
        })
    }

    /// Resize the backing store and reset the CSS-pixel transform.
    pub fn sync_size(&mut self) -> (f32, f32) {
        let dpr = crate::dom::sync_canvas_backing_size(&self.canvas);
        _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.last_fill.clear();
        crate::dom::viewport_size()
    }
}

impl StarSurface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        if color.a <= 0.001 || radius <= 0.0 {
            return;
        }
        let fill = color.css();
        if fill != self.last_fill {
            self.ctx.set_fill_style_str(&fill);
            self.last_fill = fill;
        }
        self.ctx.begin_path();
        _ = self
            .ctx
            .arc(x as f64, y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }
}
