//! Image XObjects from captured payloads.

use std::io::Cursor;

use form_core::{CapturedImage, ImageFormat};
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder};
use pdf_writer::{Filter, Pdf, Ref};

/// Pixel data ready to be written, decoded up front so a bad payload never
/// leaves half-written objects behind.
enum Prepared {
    Dct {
        data: Vec<u8>,
        width: u32,
        height: u32,
        gray: bool,
    },
    Flate {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
        width: u32,
        height: u32,
    },
}

fn prepare(img: &CapturedImage) -> Result<Prepared, String> {
    if img.bytes.is_empty() {
        return Err("empty payload".to_string());
    }
    match ImageFormat::sniff(&img.bytes) {
        Some(ImageFormat::Jpeg) => {
            let decoder = JpegDecoder::new(Cursor::new(&img.bytes)).map_err(|e| e.to_string())?;
            let (width, height) = decoder.dimensions();
            let gray = match decoder.color_type() {
                ColorType::L8 => true,
                ColorType::Rgb8 => false,
                other => return Err(format!("unsupported JPEG colour type {other:?}")),
            };
            Ok(Prepared::Dct {
                data: img.bytes.clone(),
                width,
                height,
                gray,
            })
        }
        Some(_) => {
            let rgba = image::load_from_memory(&img.bytes)
                .map_err(|e| e.to_string())?
                .to_rgba8();
            let (width, height) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
            let rgb: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect());
            Ok(Prepared::Flate {
                rgb,
                alpha,
                width,
                height,
            })
        }
        None => Err(format!("{} payload is not a known image", img.format.tag())),
    }
}

/// Write `img` as an image XObject and return its reference.
///
/// JPEG data is passed through as-is; anything else is decoded and stored
/// as deflated RGB with an optional soft mask.
pub fn embed_image(pdf: &mut Pdf, alloc: &mut Ref, img: &CapturedImage) -> Result<Ref, String> {
    match prepare(img)? {
        Prepared::Dct {
            data,
            width,
            height,
            gray,
        } => {
            let id = alloc.bump();
            let mut xobj = pdf.image_xobject(id, &data);
            xobj.filter(Filter::DctDecode);
            xobj.width(width as i32);
            xobj.height(height as i32);
            if gray {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
            Ok(id)
        }
        Prepared::Flate {
            rgb,
            alpha,
            width,
            height,
        } => {
            let mask_id = alpha.map(|alpha| {
                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&alpha, 6);
                let mask_id = alloc.bump();
                let mut mask = pdf.image_xobject(mask_id, &compressed);
                mask.filter(Filter::FlateDecode);
                mask.width(width as i32);
                mask.height(height as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask_id
            });
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&rgb, 6);
            let id = alloc.bump();
            let mut xobj = pdf.image_xobject(id, &compressed);
            xobj.filter(Filter::FlateDecode);
            xobj.width(width as i32);
            xobj.height(height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_id) = mask_id {
                xobj.s_mask(mask_id);
            }
            Ok(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(w: u32, h: u32, px: [u8; 4]) -> CapturedImage {
        let mut buf = Vec::new();
        image::RgbaImage::from_pixel(w, h, image::Rgba(px))
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        CapturedImage::new(ImageFormat::Png, w, h, buf)
    }

    fn written(f: impl FnOnce(&mut Pdf, &mut Ref)) -> String {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        f(&mut pdf, &mut alloc);
        String::from_utf8_lossy(&pdf.finish()).into_owned()
    }

    #[test]
    fn opaque_png_has_no_soft_mask() {
        let img = png(3, 2, [10, 20, 30, 255]);
        let out = written(|pdf, alloc| {
            embed_image(pdf, alloc, &img).unwrap();
        });
        assert!(out.contains("/FlateDecode"));
        assert!(out.contains("/DeviceRGB"));
        assert!(!out.contains("/SMask"));
    }

    #[test]
    fn transparent_png_gets_soft_mask() {
        let img = png(2, 2, [0, 0, 0, 0]);
        let out = written(|pdf, alloc| {
            let id = embed_image(pdf, alloc, &img).unwrap();
            assert_eq!(id, Ref::new(2));
        });
        assert!(out.contains("/SMask 1 0 R"));
        assert!(out.contains("/DeviceGray"));
    }

    #[test]
    fn jpeg_is_passed_through() {
        let mut buf = Vec::new();
        image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]))
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        let img = CapturedImage::new(ImageFormat::Jpeg, 4, 4, buf);
        let out = written(|pdf, alloc| {
            embed_image(pdf, alloc, &img).unwrap();
        });
        assert!(out.contains("/DCTDecode"));
        assert!(out.contains("/Width 4"));
    }

    #[test]
    fn garbage_fails_without_writing() {
        let img = CapturedImage::new(ImageFormat::Png, 1, 1, b"nope".to_vec());
        let mut alloc = Ref::new(5);
        let out = written(|pdf, _| {
            assert!(embed_image(pdf, &mut alloc, &img).is_err());
            let empty = CapturedImage::default();
            assert_eq!(embed_image(pdf, &mut alloc, &empty), Err("empty payload".into()));
        });
        assert_eq!(alloc, Ref::new(5));
        assert!(!out.contains("XObject"));
    }
}
