use pixel_debate_shared::Point;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent,
    Window,
};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_visible(element: &HtmlElement, visible: bool) {
    element.set_hidden(!visible);
}

pub fn set_text(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

pub fn set_busy(button: &HtmlButtonElement, busy: bool, label: &str) {
    button.set_disabled(busy);
    let _ = button.set_attribute("aria-busy", if busy { "true" } else { "false" });
    button.set_text_content(Some(label));
}

/// Viewport size in CSS pixels, `(0, 0)` when the browser reports none.
pub fn window_size(window: &Window) -> (u32, u32) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    (width.max(0.0) as u32, height.max(0.0) as u32)
}

fn canvas_origin(canvas: &HtmlCanvasElement) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(rect.left(), rect.top())
}

pub fn mouse_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Point {
    Point::new(event.client_x() as f64, event.client_y() as f64).relative_to(canvas_origin(canvas))
}

/// Position of the first active touch, if any is still down.
pub fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Point> {
    let touch = event.touches().get(0)?;
    Some(
        Point::new(touch.client_x() as f64, touch.client_y() as f64)
            .relative_to(canvas_origin(canvas)),
    )
}
