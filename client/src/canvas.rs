use pixel_debate_shared::{Pen, Point, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// The on-screen board. Canvas pixels map one to one onto CSS pixels, so
/// pointer coordinates need no scaling.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let surface = Self { canvas, ctx };
        surface.apply_line_style();
        Ok(surface)
    }

    /// Changing the size wipes the bitmap and the context state.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.apply_line_style();
    }

    pub fn snapshot_data_uri(&self) -> Result<String, JsValue> {
        self.canvas.to_data_url_with_type("image/png")
    }

    fn apply_line_style(&self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn stroke_line(&mut self, from: Point, to: Point, pen: &Pen) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(&pen.color);
        ctx.set_line_width(pen.width);
        if let Some([on, off]) = pen.dash {
            let _ = ctx.set_line_dash(&js_sys::Array::of2(&on.into(), &off.into()));
        }
        ctx.begin_path();
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        ctx.stroke();
        if pen.dash.is_some() {
            let _ = ctx.set_line_dash(&js_sys::Array::new());
        }
    }
}
