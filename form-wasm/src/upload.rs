use std::cell::RefCell;
use std::rc::Rc;

use canvas_core::capture_photo;
use form_core::check_photo_file;
use js_sys::Uint8Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Event, File, HtmlElement, HtmlImageElement, HtmlInputElement, Url};

use crate::state::{State, with_state};
use crate::utils::{alert, log_js, set_display};

// Wires up the photo box and its hidden file input.
pub fn attach_photo_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc: Document = state.borrow().document.clone();
    let Some(input) = doc.get_element_by_id("photoInput") else {
        return Ok(());
    };
    let input: HtmlInputElement = input.dyn_into()?;

    if let Some(bx) = doc.get_element_by_id("photoBox") {
        let bx: HtmlElement = bx.dyn_into()?;
        let picker = input.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || picker.click()));
        bx.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(file) = input_for_closure.files().and_then(|f| f.item(0)) else {
            return;
        };
        {
            let s = st.borrow();
            let limits = s.session.profile().limits;
            if let Err(e) = check_photo_file(file.size() as u64, &file.type_(), &limits) {
                alert(&s.window, &e.user_message());
                return;
            }
        }
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = accept_photo(file).await {
                log_js(&format!("Failed to read photo: {e:?}"));
            }
        });
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}

async fn accept_photo(file: File) -> Result<(), JsValue> {
    let buf = JsFuture::from(file.array_buffer()).await?;
    let bytes = Uint8Array::new(&buf).to_vec();
    let mime = file.type_();
    with_state(|s| {
        let limits = s.session.profile().limits;
        match capture_photo(bytes, &mime, &limits) {
            Ok(photo) => {
                s.session.set_photo(photo);
                show_preview(&s.document, &file)
            }
            Err(e) => {
                alert(&s.window, &e.user_message());
                Ok(())
            }
        }
    })
    .unwrap_or(Ok(()))
}

fn show_preview(doc: &Document, file: &File) -> Result<(), JsValue> {
    if let Some(preview) = doc.get_element_by_id("photoPreview") {
        let preview: HtmlImageElement = preview.dyn_into()?;
        preview.set_src(&Url::create_object_url_with_blob(file)?);
        set_display(&preview, "block")?;
    }
    if let Some(placeholder) = doc.query_selector(".photo-placeholder")? {
        set_display(placeholder.dyn_ref::<HtmlElement>().ok_or("bad placeholder")?, "none")?;
    }
    Ok(())
}
