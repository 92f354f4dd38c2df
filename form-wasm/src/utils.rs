use std::fmt::Display;

use canvas_core::CanvasRect;
use chrono::NaiveDate;
use form_core::Timestamp;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, Element, HtmlElement, Url, Window};

/// Log a message to the browser console.
pub fn log_js(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

pub fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Blocking notification.
pub fn alert(window: &Window, message: &str) {
    if window.alert_with_message(message).is_err() {
        log_js(message);
    }
}

/// Look up a required element by id and cast it.
pub fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} not found")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected element type")))
}

pub fn set_display(el: &HtmlElement, value: &str) -> Result<(), JsValue> {
    el.style().set_property("display", value)
}

/// On-screen box of an element in client pixels.
pub fn client_rect(el: &Element) -> CanvasRect {
    let r = el.get_bounding_client_rect();
    CanvasRect {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    }
}

/// Read the browser clock once.
pub fn now() -> Result<Timestamp, JsValue> {
    let d = js_sys::Date::new_0();
    let local = NaiveDate::from_ymd_opt(d.get_full_year() as i32, d.get_month() + 1, d.get_date())
        .and_then(|day| day.and_hms_opt(d.get_hours(), d.get_minutes(), d.get_seconds()))
        .ok_or_else(|| JsValue::from_str("local clock out of range"))?;
    Ok(Timestamp {
        epoch_ms: d.get_time().max(0.0) as u64,
        local,
    })
}

/// Offer `bytes` as a file download.
pub fn save_bytes_as_file(
    document: &Document,
    filename: &str,
    mime: &str,
    bytes: &[u8],
) -> Result<(), JsValue> {
    let array = Array::new();
    array.push(&Uint8Array::from(bytes));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &opts)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

/// Build an absolute URL for an asset, taking into account the optional
/// `window.__BASE_URL` which is set by the host page.
pub fn asset_url(path: &str) -> String {
    let base = web_sys::window().and_then(|w| {
        let v = js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok()?;
        v.as_string()
    });
    join_asset_url(base.as_deref(), path)
}

fn join_asset_url(base: Option<&str>, path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let base = base.unwrap_or("/");
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    format!("{base}{}", p.trim_start_matches('/'))
}

/// Fetch a text resource trying a list of fallback URLs in order.
pub async fn fetch_text_with_fallbacks(window: &Window, urls: &[&str]) -> Option<String> {
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
        if let Ok(text_promise) = resp.text()
            && let Ok(text_js) = wasm_bindgen_futures::JsFuture::from(text_promise).await
            && let Some(s) = text_js.as_string()
        {
            return Some(s);
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
    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .unwrap_or_else(|_| s.into())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_are_decoded() {
        let search = "?lang=en&profile=summer%20cup&x";
        assert_eq!(get_query_param(search, "profile").as_deref(), Some("summer cup"));
        assert_eq!(get_query_param(search, "x").as_deref(), Some(""));
        assert_eq!(get_query_param(search, "missing"), None);
    }

    #[test]
    fn asset_urls_respect_base() {
        assert_eq!(join_asset_url(None, "profiles/a.json"), "/profiles/a.json");
        assert_eq!(
            join_asset_url(Some("/form"), "/profiles/a.json"),
            "/form/profiles/a.json"
        );
        assert_eq!(
            join_asset_url(Some("/form/"), "https://cdn.example/p.json"),
            "https://cdn.example/p.json"
        );
    }
}
