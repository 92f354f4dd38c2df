use std::io::Cursor;

use form_core::{CapturedImage, FormError, ImageFormat, InputLimits, check_photo_file};

/// Accept a picked photo file as the session photo.
///
/// The upload rules are applied first; the payload must then be a JPEG, PNG
/// or WEBP whose header yields its pixel size.
pub fn capture_photo(
    bytes: Vec<u8>,
    mime: &str,
    limits: &InputLimits,
) -> form_core::Result<CapturedImage> {
    check_photo_file(bytes.len() as u64, mime, limits)?;
    let not_image = || FormError::NotAnImage(mime.to_string());
    let format = ImageFormat::sniff(&bytes).ok_or_else(not_image)?;
    let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|_| not_image())?
        .into_dimensions()
        .map_err(|_| not_image())?;
    log::debug!("photo accepted: {} {width}x{height}", format.tag());
    Ok(CapturedImage::new(format, width, height, bytes))
}
