//! Signature canvas: pointer and touch input, resize, clear, display.

use std::cell::RefCell;
use std::rc::Rc;

use canvas_core::{PixelRect, PointerInput, PointerPhase, SignatureSurface};
use form_core::EventProfile;
use wasm_bindgen::Clamped;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlElement, MouseEvent,
    TouchEvent,
};

use crate::state::State;
use crate::utils::{client_rect, element, js_err, log_js};

pub fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv: HtmlCanvasElement = element(document, "signatureCanvas")?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

fn container_width(canvas: &HtmlCanvasElement) -> f64 {
    match canvas.parent_element() {
        Some(parent) => parent.get_bounding_client_rect().width(),
        None => canvas.client_width() as f64,
    }
}

pub fn new_surface(
    canvas: &HtmlCanvasElement,
    profile: &EventProfile,
) -> Result<SignatureSurface, JsValue> {
    SignatureSurface::new(&profile.signature, container_width(canvas)).map_err(js_err)
}

/// Copy changed pixels onto the visible canvas.
///
/// A size change re-uploads everything; otherwise only the pad's dirty
/// rectangle is transferred.
pub fn present(state: &mut State) -> Result<(), JsValue> {
    let (w, h) = (state.pad.width(), state.pad.height());
    let resized = state.canvas.width() != w || state.canvas.height() != h;
    if resized {
        // Setting either dimension wipes the element.
        state.canvas.set_width(w);
        state.canvas.set_height(h);
    }
    let dirty = state.pad.take_dirty();
    let Some(rect) = (if resized { Some(PixelRect::full(w, h)) } else { dirty }) else {
        return Ok(());
    };
    let pixels = state.pad.raster().image_data_in(rect);
    if pixels.data.is_empty() {
        return Ok(());
    }
    let data = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(pixels.data.as_slice()),
        pixels.width,
        pixels.height,
    )?;
    state.ctx.put_image_data(&data, rect.x as f64, rect.y as f64)
}

fn feed(state: &Rc<RefCell<State>>, input: PointerInput) {
    let mut s = state.borrow_mut();
    let rect = client_rect(&s.canvas);
    if s.pad.handle(input, &rect)
        && let Err(e) = present(&mut s)
    {
        log_js(&format!("signature redraw failed: {e:?}"));
    }
}

fn is_drawing(state: &Rc<RefCell<State>>) -> bool {
    state.borrow().pad.is_drawing()
}

const MOUSE_EVENTS: [(&str, PointerPhase); 4] = [
    ("mousedown", PointerPhase::Down),
    ("mousemove", PointerPhase::Move),
    ("mouseup", PointerPhase::Up),
    ("mouseout", PointerPhase::Leave),
];

const TOUCH_EVENTS: [(&str, PointerPhase); 4] = [
    ("touchstart", PointerPhase::Down),
    ("touchmove", PointerPhase::Move),
    ("touchend", PointerPhase::Up),
    ("touchcancel", PointerPhase::Cancel),
];

pub fn attach_signature(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let canvas = state.borrow().canvas.clone();

    for (name, phase) in MOUSE_EVENTS {
        let st = state.clone();
        let cb = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let active = phase == PointerPhase::Down
                || (phase == PointerPhase::Move && is_drawing(&st));
            if active {
                e.prevent_default();
            }
            feed(
                &st,
                PointerInput {
                    phase,
                    client_x: e.client_x() as f64,
                    client_y: e.client_y() as f64,
                },
            );
        }));
        canvas.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    for (name, phase) in TOUCH_EVENTS {
        let st = state.clone();
        let cb = Closure::<dyn FnMut(TouchEvent)>::wrap(Box::new(move |e: TouchEvent| {
            let active = phase == PointerPhase::Down
                || (phase == PointerPhase::Move && is_drawing(&st));
            if active {
                e.prevent_default();
            }
            // Only the first touch point draws; end events carry none.
            let (client_x, client_y) = e
                .touches()
                .get(0)
                .map(|t| (t.client_x() as f64, t.client_y() as f64))
                .unwrap_or_default();
            feed(
                &st,
                PointerInput {
                    phase,
                    client_x,
                    client_y,
                },
            );
        }));
        canvas.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // Window resize keeps the ink anchored top-left.
    {
        let st = state.clone();
        let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let width = container_width(&s.canvas);
            let result = s.pad.resize(width).map_err(js_err).and_then(|_| present(&mut s));
            if let Err(e) = result {
                log_js(&format!("signature resize failed: {e:?}"));
            }
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    // Clear button
    if let Some(btn) = state.borrow().document.get_element_by_id("clearSignature") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            s.pad.clear();
            if let Err(e) = present(&mut s) {
                log_js(&format!("signature redraw failed: {e:?}"));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}
