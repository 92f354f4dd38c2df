//! Header logo capture with a drawn placeholder fallback.

use std::sync::Arc;

use form_core::{CapturedImage, EventProfile, ImageFormat, LogoSlot, parse_hex_color};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::encode::{encode_rgba, encode_rgba_to_png_bytes};
use crate::error::{CanvasError, Result};
use crate::raster::{ImageData, RasterBuffer};

pub const PLACEHOLDER_SIZE: u32 = 150;

/// A decoded logo as the page holds it: its source identifier plus pixels at
/// natural size.
#[derive(Clone, Debug)]
pub struct SourceRaster {
    pub src: String,
    pub width: u32,
    pub height: u32,
    /// Straight RGBA, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl SourceRaster {
    /// Decode an encoded file into a source raster.
    pub fn decode(src: &str, bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        Ok(SourceRaster {
            src: src.to_string(),
            width: img.width(),
            height: img.height(),
            rgba: img.into_raw(),
        })
    }
}

/// Re-encode a logo in the format its source name suggests, at natural size.
pub fn normalize_image(source: &SourceRaster) -> Result<CapturedImage> {
    let format = ImageFormat::detect_from_source(&source.src);
    let (width, height) = (source.width, source.height);
    if width == 0 || height == 0 {
        return Err(CanvasError::ZeroSized { width, height });
    }
    // Straight RGBA reaches the encoder untouched, never via a premultiplied canvas.
    let pixels = ImageData::new(width, height, source.rgba.clone())?;
    let bytes = encode_rgba(format, width, height, &pixels.data)?;
    Ok(CapturedImage::new(
        format,
        source.width,
        source.height,
        bytes,
    ))
}

/// Produce the logo for `slot`. Never fails: a missing source or any
/// conversion error yields the slot's placeholder.
pub fn normalize_logo(
    slot: LogoSlot,
    source: Option<&SourceRaster>,
    profile: &EventProfile,
) -> CapturedImage {
    let n = slot.number();
    let Some(source) = source else {
        log::warn!("logo {n} not found, creating placeholder");
        return placeholder_logo(slot, profile);
    };
    match normalize_image(source) {
        Ok(img) => {
            log::info!(
                "logo {n} loaded (format: {}, size: {}x{})",
                img.format.tag(),
                img.width,
                img.height
            );
            img
        }
        Err(e) => {
            log::error!("error converting logo {n}: {e}");
            placeholder_logo(slot, profile)
        }
    }
}

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn slot_color(slot: LogoSlot, profile: &EventProfile) -> [u8; 3] {
    parse_hex_color(&profile.logo(slot).background).unwrap_or([0x64, 0x74, 0x8b])
}

/// SVG source of the placeholder: a filled circle with a centred label.
pub fn placeholder_svg(slot: LogoSlot, profile: &EventProfile) -> String {
    let [r, g, b] = slot_color(slot, profile);
    let size = PLACEHOLDER_SIZE;
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    ));
    svg.push_str(&format!(
        r##"<circle cx="75" cy="75" r="70" fill="#{r:02x}{g:02x}{b:02x}"/>"##
    ));
    svg.push_str(&format!(
        r##"<text x="75" y="75" fill="#ffffff" font-family="sans-serif" font-weight="bold" font-size="50" text-anchor="middle" dominant-baseline="central">{}</text>"##,
        svg_escape(&profile.logo(slot).label)
    ));
    svg.push_str("</svg>");
    svg
}

fn font_database() -> usvg::fontdb::Database {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_font_data(fonts::FONT_BYTES.to_vec());
    // Map generic 'sans-serif' to the embedded font family
    let family_name = fontdb
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
    if let Some(name) = family_name {
        fontdb.set_sans_serif_family(name);
    }
    fontdb
}

fn render_svg(svg: &str, width: u32, height: u32) -> Result<Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::new(font_database());
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| CanvasError::Decode(format!("SVG parse error: {e:?}")))?;
    let mut pixmap = Pixmap::new(width, height).ok_or(CanvasError::ZeroSized { width, height })?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, Transform::identity(), &mut pm);
    Ok(pixmap)
}

/// Circle only, for when the SVG path is unavailable.
fn draw_plain_circle(color: [u8; 3]) -> Result<Pixmap> {
    let size = PLACEHOLDER_SIZE;
    let mut pixmap = Pixmap::new(size, size).ok_or(CanvasError::ZeroSized {
        width: size,
        height: size,
    })?;
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 255);
    paint.anti_alias = true;
    if let Some(circle) = PathBuilder::from_circle(75.0, 75.0, 70.0) {
        pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    }
    Ok(pixmap)
}

/// The synthetic 150x150 PNG logo for `slot`.
pub fn placeholder_logo(slot: LogoSlot, profile: &EventProfile) -> CapturedImage {
    let n = slot.number();
    let size = PLACEHOLDER_SIZE;
    let pixmap = render_svg(&placeholder_svg(slot, profile), size, size).or_else(|e| {
        log::warn!("placeholder {n} drawn without label: {e}");
        draw_plain_circle(slot_color(slot, profile))
    });
    let bytes = pixmap.and_then(|p| {
        let rgba = RasterBuffer::from_pixmap(p).to_rgba();
        Ok(encode_rgba_to_png_bytes(size, size, &rgba)?)
    });
    match bytes {
        Ok(bytes) => {
            log::info!("placeholder logo {n} created");
            CapturedImage::new(ImageFormat::Png, size, size, bytes)
        }
        Err(e) => {
            log::error!("placeholder logo {n} failed: {e}");
            CapturedImage::new(ImageFormat::Png, size, size, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(img: &CapturedImage) -> image::RgbaImage {
        image::load_from_memory(&img.bytes).unwrap().to_rgba8()
    }

    fn solid(src: &str, w: u32, h: u32, px: [u8; 4]) -> SourceRaster {
        SourceRaster {
            src: src.into(),
            width: w,
            height: h,
            rgba: px.repeat((w * h) as usize),
        }
    }

    #[test]
    fn missing_source_gives_slot_placeholder() {
        let profile = EventProfile::default();
        for (slot, rgb) in [
            (LogoSlot::Left, [0x1e, 0x40, 0xaf]),
            (LogoSlot::Right, [0xf5, 0x9e, 0x0b]),
        ] {
            let img = normalize_logo(slot, None, &profile);
            assert_eq!(img.format, ImageFormat::Png);
            assert_eq!((img.width, img.height), (150, 150));
            let px = decode(&img);
            assert_eq!((px.width(), px.height()), (150, 150));
            // Inside the circle, above the label.
            assert_eq!(px.get_pixel(75, 15).0, [rgb[0], rgb[1], rgb[2], 255]);
            // Corners stay transparent.
            assert_eq!(px.get_pixel(2, 2).0[3], 0);
        }
    }

    #[test]
    fn placeholder_draws_white_label_glyphs() {
        let profile = EventProfile::default();
        for slot in [LogoSlot::Left, LogoSlot::Right] {
            let px = decode(&placeholder_logo(slot, &profile));
            // The label band around the centre; the disc itself is never white.
            let mut white = 0;
            for y in 50..100 {
                for x in 20..130 {
                    let [r, g, b, a] = px.get_pixel(x, y).0;
                    if a == 255 && r > 230 && g > 230 && b > 230 {
                        white += 1;
                    }
                }
            }
            assert!(white > 50, "slot {}: {white} label pixels", slot.number());
        }
    }

    #[test]
    fn placeholder_svg_carries_label_and_colour() {
        let profile = EventProfile::default();
        let svg = placeholder_svg(LogoSlot::Right, &profile);
        assert!(svg.contains(">YSC</text>"));
        assert!(svg.contains(r##"fill="#f59e0b""##));
        let mut p = profile.clone();
        p.logos[0].label = "A&B".into();
        assert!(placeholder_svg(LogoSlot::Left, &p).contains(">A&amp;B<"));
    }

    #[test]
    fn bad_colour_still_yields_placeholder() {
        let mut profile = EventProfile::default();
        profile.logos[1].background = "orange".into();
        let img = placeholder_logo(LogoSlot::Right, &profile);
        assert!(!img.bytes.is_empty());
    }

    #[test]
    fn keeps_native_size_and_detected_format() {
        let src = solid("https://x.test/img/ysc.JPEG", 7, 3, [200, 10, 10, 255]);
        let img = normalize_logo(LogoSlot::Right, Some(&src), &EventProfile::default());
        assert_eq!(img.format, ImageFormat::Jpeg);
        assert_eq!((img.width, img.height), (7, 3));
        assert_eq!(ImageFormat::sniff(&img.bytes), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn png_is_lossless() {
        let src = solid("logo.png", 3, 2, [201, 37, 90, 3]);
        let img = normalize_image(&src).unwrap();
        assert_eq!(decode(&img).into_raw(), src.rgba);
    }

    #[test]
    fn webp_keeps_translucent_pixels() {
        let mut src = solid("logo.webp", 2, 2, [201, 37, 90, 3]);
        src.rgba[4..8].copy_from_slice(&[10, 250, 128, 77]);
        let img = normalize_image(&src).unwrap();
        assert_eq!(img.format, ImageFormat::Webp);
        assert_eq!(decode(&img).into_raw(), src.rgba);
    }

    #[test]
    fn unknown_extension_falls_back_to_png() {
        let src = solid("data:image/svg+xml;base64,AAAA", 2, 2, [0, 0, 0, 255]);
        assert_eq!(normalize_image(&src).unwrap().format, ImageFormat::Png);
    }

    #[test]
    fn conversion_error_falls_back_to_placeholder() {
        let mut src = solid("logo.webp", 4, 4, [9, 9, 9, 255]);
        src.rgba.truncate(10);
        assert!(normalize_image(&src).is_err());
        let img = normalize_logo(LogoSlot::Left, Some(&src), &EventProfile::default());
        assert_eq!((img.format, img.width, img.height), (ImageFormat::Png, 150, 150));
    }

    #[test]
    fn zero_sized_source_falls_back_to_placeholder() {
        let src = solid("logo.png", 0, 0, [0, 0, 0, 0]);
        let img = normalize_logo(LogoSlot::Right, Some(&src), &EventProfile::default());
        assert_eq!(img.width, 150);
    }

    #[test]
    fn decode_reads_natural_size() {
        let bytes = encode_rgba_to_png_bytes(5, 4, &[7u8; 80]).unwrap();
        let src = SourceRaster::decode("a.png", &bytes).unwrap();
        assert_eq!((src.width, src.height, src.rgba.len()), (5, 4, 80));
        assert!(SourceRaster::decode("a.png", b"not an image").is_err());
    }
}
