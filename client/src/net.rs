use pixel_debate_shared::ANALYZE_PATH;
use wasm_bindgen::JsValue;
use web_sys::Window;

pub fn analysis_url(window: &Window) -> Result<String, JsValue> {
    let origin = window.location().origin()?;
    Ok(analysis_url_for_origin(&origin))
}

pub fn analysis_url_for_origin(origin: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), ANALYZE_PATH)
}

/// Best-effort text for a thrown JS value.
pub fn describe_js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
