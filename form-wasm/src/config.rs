use form_core::EventProfile;
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::utils::{asset_url, fetch_text_with_fallbacks, get_query_param};

fn parse_or_default(text: &str, origin: &str) -> EventProfile {
    EventProfile::from_json(text).unwrap_or_else(|e| {
        log::warn!("invalid event profile from {origin}: {e}; using defaults");
        EventProfile::default()
    })
}

/// Event profile for this page: inline `window.__EVENT_PROFILE`, then
/// `?profile=<name>` from `profiles/<name>.json`, then the built-in event.
pub async fn resolve_profile(window: &Window) -> EventProfile {
    let inline = js_sys::Reflect::get(window, &JsValue::from_str("__EVENT_PROFILE"))
        .ok()
        .and_then(|v| v.as_string());
    if let Some(text) = inline {
        return parse_or_default(&text, "window.__EVENT_PROFILE");
    }

    if let Ok(search) = window.location().search()
        && let Some(name) = get_query_param(&search, "profile")
    {
        let path = format!("profiles/{name}.json");
        return match fetch_text_with_fallbacks(window, &[&asset_url(&path), &path]).await {
            Some(text) => parse_or_default(&text, &path),
            None => {
                log::warn!("event profile {path} not found; using defaults");
                EventProfile::default()
            }
        };
    }
    EventProfile::default()
}
