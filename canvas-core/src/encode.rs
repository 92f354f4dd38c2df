use form_core::ImageFormat;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use png::{BitDepth, ColorType, Encoder};

use crate::error::Result;

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> std::result::Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}

/// Encode straight RGBA in `format` at the highest fidelity each codec offers.
///
/// JPEG has no alpha channel, so pixels are composited onto black first.
pub fn encode_rgba(format: ImageFormat, width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => buf = encode_rgba_to_png_bytes(width, height, rgba)?,
        ImageFormat::Jpeg => {
            let rgb = composite_on_black(rgba);
            JpegEncoder::new_with_quality(&mut buf, 100).encode(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ImageFormat::Webp => {
            WebPEncoder::new_lossless(&mut buf).encode(
                rgba,
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
    }
    Ok(buf)
}

fn composite_on_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u16;
        for c in &px[..3] {
            rgb.push(((*c as u16 * a + 127) / 255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trips_through_decoder() {
        let rgba = [10, 20, 30, 255, 0, 0, 0, 0];
        let bytes = encode_rgba_to_png_bytes(2, 1, &rgba).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.as_raw().as_slice(), &rgba);
    }

    #[test]
    fn each_format_carries_its_magic() {
        let rgba = [200u8, 100, 50, 255].repeat(16);
        for f in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Webp] {
            let bytes = encode_rgba(f, 4, 4, &rgba).unwrap();
            assert_eq!(ImageFormat::sniff(&bytes), Some(f));
        }
    }

    #[test]
    fn jpeg_drops_alpha_onto_black() {
        assert_eq!(composite_on_black(&[255, 255, 255, 0]), vec![0, 0, 0]);
        assert_eq!(composite_on_black(&[200, 100, 50, 255]), vec![200, 100, 50]);
        assert_eq!(composite_on_black(&[255, 0, 0, 128]), vec![128, 0, 0]);
    }
}
