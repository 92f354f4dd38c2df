use std::cell::RefCell;
use std::rc::Rc;

use form_core::{EventProfile, Session};
use wasm_bindgen::prelude::*;
use web_sys::Window;

mod config;
mod download;
mod feedback;
mod logos;
mod modal;
mod signature;
mod state;
mod submit;
mod upload;
mod utils;

use state::{STATE, State};
use utils::log_js;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log_js("console logger already installed");
    }
    let window = web_sys::window().ok_or("no window")?;
    wasm_bindgen_futures::spawn_local(async move {
        let profile = config::resolve_profile(&window).await;
        if let Err(err) = boot(window, profile) {
            log_js(&format!("Failed to start registration form: {err:?}"));
        }
    });
    Ok(())
}

fn boot(window: Window, profile: EventProfile) -> Result<(), JsValue> {
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = signature::init_canvas(&document)?;
    let pad = signature::new_surface(&canvas, &profile)?;
    let limits = profile.limits;

    let state = Rc::new(RefCell::new(State {
        window,
        document: document.clone(),
        canvas,
        ctx,
        session: Session::new(profile),
        pad,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    signature::present(&mut state.borrow_mut())?;
    logos::load_logos(state.clone())?;
    upload::attach_photo_input(state.clone())?;
    signature::attach_signature(state.clone())?;
    feedback::attach_field_feedback(&document, &limits)?;
    submit::attach_submit(state.clone())?;
    modal::attach_modal(state)?;
    log::info!("registration form ready");
    Ok(())
}
