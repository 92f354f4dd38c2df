//! Error types for raster capture and encoding.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CanvasError>;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("raster of {width}x{height} cannot be allocated")]
    ZeroSized { width: u32, height: u32 },

    #[error("image data holds {actual} bytes, expected {expected}")]
    ImageDataSize { expected: usize, actual: usize },

    #[error("decode: {0}")]
    Decode(String),

    #[error("encode: {0}")]
    Encode(String),
}

impl From<png::EncodingError> for CanvasError {
    fn from(e: png::EncodingError) -> Self {
        CanvasError::Encode(e.to_string())
    }
}

impl From<image::ImageError> for CanvasError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Encoding(_) => CanvasError::Encode(e.to_string()),
            _ => CanvasError::Decode(e.to_string()),
        }
    }
}
