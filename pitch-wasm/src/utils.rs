use pitch_core::geometry::Rect;
use pitch_core::{Config, Point};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, MouseEvent, Window};

use crate::state::State;

/// CSS size of the canvas. A canvas not laid out yet borrows its parent's
/// box, or a share of the viewport.
fn css_size(window: &Window, canvas: &HtmlCanvasElement) -> (f64, f64) {
    let (w, h) = (canvas.client_width() as f64, canvas.client_height() as f64);
    if w > 0.0 && h > 0.0 {
        return (w, h);
    }
    let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let (vw, vh) = (inner(window.inner_width()), inner(window.inner_height()));
    match canvas.parent_element() {
        Some(parent) => {
            let rect = parent.get_bounding_client_rect();
            let pw = if rect.width() > 0.0 { rect.width() } else { vw };
            let ph = if rect.height() > 0.0 {
                rect.height()
            } else {
                (vh * 0.6).max(200.0)
            };
            (pw, ph)
        }
        None => (vw, (vh * 0.6).max(200.0)),
    }
}

/// Sizes both backing stores to CSS size times the device pixel ratio and
/// scales the contexts so drawing code works in CSS pixels. Returns the CSS
/// size.
pub fn sync_canvas_size(state: &mut State) -> (f64, f64) {
    let dpr = state.window.device_pixel_ratio().max(1.0);
    let (css_w, css_h) = css_size(&state.window, &state.canvas);
    let (css_w, css_h) = (css_w.max(1.0), css_h.max(1.0));
    let _ = state
        .canvas
        .style()
        .set_property("width", &format!("{css_w}px"));
    let _ = state
        .canvas
        .style()
        .set_property("height", &format!("{css_h}px"));
    let target_w = (css_w * dpr).round().clamp(1.0, 10000.0) as u32;
    let target_h = (css_h * dpr).round().clamp(1.0, 10000.0) as u32;
    for cv in [&state.canvas, &state.field_canvas] {
        if cv.width() != target_w {
            cv.set_width(target_w);
        }
        if cv.height() != target_h {
            cv.set_height(target_h);
        }
    }
    // resizing resets the transform
    for ctx in [&state.ctx, &state.field_ctx] {
        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }
    state.dpr = dpr;
    (css_w, css_h)
}

/// Pointer position in canvas CSS pixels, plus the raw viewport position.
pub fn event_points(e: &MouseEvent, canvas: &HtmlCanvasElement) -> (Point, Point) {
    let client = Point::new(e.client_x() as f64, e.client_y() as f64);
    let rect = canvas.get_bounding_client_rect();
    (Point::new(client.x - rect.left(), client.y - rect.top()), client)
}

/// Viewport bounds of an element.
pub fn element_rect(document: &Document, id: &str) -> Option<Rect> {
    let el = document.get_element_by_id(id)?;
    let r = el.get_bounding_client_rect();
    Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Build an absolute URL for an asset, taking into account the optional
/// `window.__BASE_URL` which is set by the host page.
pub fn asset_url(path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let base = web_sys::window()
        .and_then(|w| {
            let v = js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok()?;
            v.as_string()
        })
        .unwrap_or_else(|| "/".to_string());
    let base = if base.ends_with('/') {
        base
    } else {
        format!("{base}/")
    };
    format!("{}{}", base, p.trim_start_matches('/'))
}

/// Board config from `window.__PITCH_CONFIG` (object or JSON string).
pub fn config_from_window(window: &Window) -> Option<Config> {
    let v = js_sys::Reflect::get(window, &JsValue::from_str("__PITCH_CONFIG")).ok()?;
    if v.is_undefined() || v.is_null() {
        return None;
    }
    let text = match v.as_string() {
        Some(s) => s,
        None => js_sys::JSON::stringify(&v).ok()?.as_string()?,
    };
    Some(Config::from_json(&text))
}

/// Fetch a resource's body, trying a list of fallback URLs in order.
pub async fn fetch_bytes_with_fallbacks(window: &Window, urls: &[String]) -> Option<Vec<u8>> {
    for url in urls {
        let resp_value =
            match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url)).await {
                Ok(v) => v,
                Err(_) => continue,
            };
        let resp: web_sys::Response = match resp_value.dyn_into() {
            Ok(r) => r,
            Err(_) => continue,
        };
        if !resp.ok() {
            continue;
        }
        let Ok(buf_promise) = resp.array_buffer() else {
            continue;
        };
        if let Ok(buf) = wasm_bindgen_futures::JsFuture::from(buf_promise).await {
            return Some(js_sys::Uint8Array::new(&buf).to_vec());
        }
    }
    None
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

/// `?draw=1` (or `true`/`on`) starts the board in draw mode.
pub fn flag_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "on" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_are_decoded() {
        assert_eq!(get_query_param("?draw=1&x=a%20b", "x").as_deref(), Some("a b"));
        assert_eq!(get_query_param("?name=Ana+Bo", "name").as_deref(), Some("Ana Bo"));
        assert_eq!(get_query_param("?draw", "draw").as_deref(), Some(""));
        assert_eq!(get_query_param("", "draw"), None);
    }

    #[test]
    fn draw_flag_values() {
        assert!(flag_enabled(Some("1")));
        assert!(flag_enabled(Some("true")));
        assert!(!flag_enabled(Some("0")));
        assert!(!flag_enabled(Some("")));
        assert!(!flag_enabled(None));
    }
}
