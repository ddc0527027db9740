//! Small helpers over `web_sys` globals.

use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

use crate::error::SiteError;

/// Global `window`.
pub fn window() -> Result<Window, SiteError> {
	web_sys::window().ok_or(SiteError::NoWindow)
}

/// Global `document`.
pub fn document() -> Result<Document, SiteError> {
	window()?.document().ok_or(SiteError::NoDocument)
}

/// Window inner size in CSS pixels, 0 for anything the browser refuses to report.
pub fn window_size(window: &Window) -> (f64, f64) {
	let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(read(window.inner_width()), read(window.inner_height()))
}
