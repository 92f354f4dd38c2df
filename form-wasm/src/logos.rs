use std::cell::RefCell;
use std::rc::Rc;

use canvas_core::{SourceRaster, normalize_logo};
use form_core::LogoSlot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::state::State;

/// Capture both header logos from the page, or their placeholders.
pub fn load_logos(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let document = state.borrow().document.clone();
    for slot in LogoSlot::ALL {
        let id = format!("logo{}Image", slot.number());
        let Some(el) = document.get_element_by_id(&id) else {
            store(&state, slot, None);
            continue;
        };
        let img: HtmlImageElement = el.dyn_into()?;
        if img.complete() {
            capture(&state, slot, &img);
            continue;
        }

        let st = state.clone();
        let loaded = img.clone();
        let onload = Closure::<dyn FnMut()>::wrap(Box::new(move || capture(&st, slot, &loaded)));
        img.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
        onload.forget();

        let st = state.clone();
        let onerror = Closure::<dyn FnMut()>::wrap(Box::new(move || store(&st, slot, None)));
        img.add_event_listener_with_callback("error", onerror.as_ref().unchecked_ref())?;
        onerror.forget();
    }
    Ok(())
}

fn capture(state: &Rc<RefCell<State>>, slot: LogoSlot, img: &HtmlImageElement) {
    let document = state.borrow().document.clone();
    match read_pixels(&document, img) {
        Ok(source) => store(state, slot, Some(&source)),
        Err(e) => {
            log::error!("error converting logo {}: {e:?}", slot.number());
            store(state, slot, None);
        }
    }
}

fn store(state: &Rc<RefCell<State>>, slot: LogoSlot, source: Option<&SourceRaster>) {
    let mut s = state.borrow_mut();
    let logo = normalize_logo(slot, source, s.session.profile());
    s.session.set_logo(slot, logo);
}

/// Draw the image at natural size on an off-screen canvas and read it back.
fn read_pixels(document: &Document, img: &HtmlImageElement) -> Result<SourceRaster, JsValue> {
    let (width, height) = (img.natural_width(), img.natural_height());
    if width == 0 || height == 0 {
        return Err(JsValue::from_str("image has no pixels"));
    }
    let cv = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    cv.set_width(width);
    cv.set_height(height);
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)?;
    // Throws for cross-origin images.
    let data = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
    Ok(SourceRaster {
        src: img.src().to_lowercase(),
        width,
        height,
        rgba: data.data().0,
    })
}
