use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, Window};

use crate::download::download_document;
use crate::state::State;
use crate::utils::{element, log_js, set_display};

/// Show the success modal with the new identifier.
pub fn show_success(doc: &Document, registration_id: &str) -> Result<(), JsValue> {
    if let Some(span) = doc.get_element_by_id("regId") {
        span.set_text_content(Some(registration_id));
    }
    let modal: HtmlElement = element(doc, "successModal")?;
    set_display(&modal, "flex")
}

/// Dismissing the modal ends the session.
fn close_and_reload(window: &Window, modal: &HtmlElement) {
    let _ = set_display(modal, "none");
    if let Err(e) = window.location().reload() {
        log_js(&format!("reload failed: {e:?}"));
    }
}

pub fn attach_modal(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let (window, doc) = {
        let s = state.borrow();
        (s.window.clone(), s.document.clone())
    };

    if let Some(btn) = doc.get_element_by_id("downloadPdfBtn") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(e) = download_document(&st.borrow()) {
                log_js(&format!("download failed: {e:?}"));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    let Some(modal) = doc.get_element_by_id("successModal") else {
        return Ok(());
    };
    let modal: HtmlElement = modal.dyn_into()?;

    if let Some(btn) = doc.get_element_by_id("closeSuccessModal") {
        let btn: HtmlElement = btn.dyn_into()?;
        let (win, m) = (window.clone(), modal.clone());
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || close_and_reload(&win, &m)));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // A click on the backdrop itself, not the dialog inside it.
    let win = window.clone();
    let onclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let on_backdrop = e
            .target()
            .is_some_and(|t| JsValue::from(t) == JsValue::from(modal.clone()));
        if on_backdrop {
            close_and_reload(&win, &modal);
        }
    }));
    window.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}
