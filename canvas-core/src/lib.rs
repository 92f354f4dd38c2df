pub mod encode;
pub mod error;
pub mod logo;
pub mod photo;
pub mod raster;
pub mod signature;

pub use encode::{encode_rgba, encode_rgba_to_png_bytes};
pub use error::{CanvasError, Result};
pub use logo::{SourceRaster, normalize_image, normalize_logo, placeholder_logo};
pub use photo::capture_photo;
pub use raster::{ImageData, PixelRect, RasterBuffer};
pub use signature::{CanvasRect, PointerInput, PointerPhase, SignatureSurface};
