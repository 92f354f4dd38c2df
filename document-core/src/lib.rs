pub mod canvas;
pub mod error;
pub mod images;
pub mod layout;
pub mod metrics;
pub mod render;

pub use canvas::{Align, PageCanvas, PaintStyle};
pub use error::{RenderError, Result};
pub use layout::LayoutCursor;
pub use metrics::{Face, wrap_text};
pub use render::{DocumentImages, RenderedDocument, render_registration, render_session};
