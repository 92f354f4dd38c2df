use std::cell::RefCell;
use std::rc::Rc;

use form_core::FieldValues;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement};

use crate::feedback::field_value;
use crate::modal::show_success;
use crate::state::State;
use crate::utils::{alert, element, now};

fn text_value(doc: &Document, id: &str) -> Result<String, JsValue> {
    let el: HtmlElement = element(doc, id)?;
    field_value(&el).ok_or_else(|| JsValue::from_str(&format!("#{id} holds no value")))
}

fn checked_value(doc: &Document, name: &str) -> Result<String, JsValue> {
    doc.query_selector(&format!("input[name=\"{name}\"]:checked"))?
        .ok_or_else(|| JsValue::from_str(&format!("no `{name}` option selected")))?
        .dyn_into::<HtmlInputElement>()
        .map(|input| input.value())
        .map_err(|_| JsValue::from_str(&format!("`{name}` is not an input")))
}

/// Read every tracked field; a missing element is an error, never a default.
fn read_fields(doc: &Document) -> Result<FieldValues, JsValue> {
    Ok(FieldValues {
        first_name: text_value(doc, "firstName")?,
        last_name: text_value(doc, "lastName")?,
        phone: text_value(doc, "phone")?,
        email: text_value(doc, "email")?,
        address: text_value(doc, "address")?,
        city: text_value(doc, "city")?,
        state: text_value(doc, "state")?,
        pincode: text_value(doc, "pincode")?,
        handed: checked_value(doc, "handed")?,
        specialist: checked_value(doc, "specialist")?,
        achievement: text_value(doc, "achievement")?,
        jersey_size: checked_value(doc, "jerseySize")?,
    })
}

fn on_submit(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    if let Err(e) = s.session.check_ready(&s.pad) {
        alert(&s.window, &e.user_message());
        return Ok(());
    }
    let fields = read_fields(&s.document)?;
    match s.session.submit(&s.pad, fields, now()?, js_sys::Math::random()) {
        Ok(snapshot) => show_success(&s.document, snapshot.registration_id()),
        Err(e) => {
            alert(&s.window, &e.user_message());
            Ok(())
        }
    }
}

pub fn attach_submit(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(form) = doc.get_element_by_id("registrationForm") else {
        return Ok(());
    };
    let st = state.clone();
    let onsubmit = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        if let Err(err) = on_submit(&st) {
            web_sys::console::error_1(&err);
        }
    }));
    form.add_event_listener_with_callback("submit", onsubmit.as_ref().unchecked_ref())?;
    onsubmit.forget();
    Ok(())
}
