use std::cell::RefCell;
use std::rc::Rc;

use canvas_core::SignatureSurface;
use form_core::Session;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// Page state shared across the WASM callbacks behind an `Rc<RefCell<_>>`.
pub struct State {
    pub window: Window,
    pub document: Document,
    /// Visible signature canvas; its pixels mirror `pad`.
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub session: Session,
    pub pad: SignatureSurface,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

/// Run `f` against the live state, if the page finished starting up.
pub fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> Option<R> {
    STATE.with(|st| st.borrow().as_ref().map(|rc| f(&mut rc.borrow_mut())))
}
