//! Live field feedback: border marks and digit-only inputs.

use std::cell::Cell;
use std::rc::Rc;

use form_core::{DigitField, FieldEvent, FieldMark, InputLimits, filter_digits, next_mark};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

/// Current text of an input or textarea.
pub fn field_value(el: &HtmlElement) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlTextAreaElement>().map(|t| t.value())
}

fn apply_mark(el: &HtmlElement, mark: FieldMark) {
    if let Some(color) = mark.border_color() {
        let _ = el.style().set_property("border-bottom-color", color);
    }
}

pub fn attach_field_feedback(doc: &Document, limits: &InputLimits) -> Result<(), JsValue> {
    // Digit filters run first so the marks see the filtered value.
    for field in [DigitField::Phone, DigitField::Pincode] {
        let Some(el) = doc.get_element_by_id(field.element_id()) else {
            continue;
        };
        let input: HtmlInputElement = el.dyn_into()?;
        let max = field.max_digits(limits);
        let target = input.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let raw = target.value();
            let digits = filter_digits(&raw, max);
            if digits != raw {
                target.set_value(&digits);
            }
        }));
        input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    let nodes = doc.query_selector_all("input[required], textarea[required]")?;
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let mark = Rc::new(Cell::new(FieldMark::Neutral));
        for (name, event) in [("blur", FieldEvent::Blur), ("input", FieldEvent::Input)] {
            let target = el.clone();
            let mark = mark.clone();
            let cb = Closure::<dyn FnMut()>::wrap(Box::new(move || {
                let value = field_value(&target).unwrap_or_default();
                let next = next_mark(mark.get(), event, &value);
                apply_mark(&target, next);
                mark.set(next);
            }));
            el.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
            cb.forget();
        }
    }
    Ok(())
}
