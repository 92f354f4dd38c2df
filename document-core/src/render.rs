//! The one-page registration document.

use form_core::{CapturedImage, EventProfile, LogoSlot, RegistrationSnapshot, Session};
use pdf_writer::{Name, Pdf, Rect, Ref, TextStr};

use crate::canvas::{Align, PageCanvas, PaintStyle, Rgb};
use crate::error::{RenderError, Result};
use crate::images::embed_image;
use crate::layout::LayoutCursor;
use crate::metrics::Face;

const MARGIN: f32 = 15.0;
const HEADER_HEIGHT: f32 = 65.0;
const HEADER_RULE_Y: f32 = 60.0;
const ID_BOX_Y: f32 = 70.0;
const FOOTER_HEIGHT: f32 = 20.0;
const ROW_STEP: f32 = 6.0;

const BLUE: Rgb = [30, 64, 175];
const RED: Rgb = [220, 38, 38];
const GREY: Rgb = [100, 100, 100];
const AMBER: Rgb = [245, 158, 11];
const BLACK: Rgb = [0, 0, 0];
const WHITE: Rgb = [255, 255, 255];
const HEADER_BG: Rgb = [240, 248, 255];
const FOOTER_BG: Rgb = [248, 250, 252];

/// The four images a document may carry. `None` means "never captured".
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentImages<'a> {
    pub photo: Option<&'a CapturedImage>,
    pub signature: Option<&'a CapturedImage>,
    pub logos: [Option<&'a CapturedImage>; 2],
}

impl<'a> DocumentImages<'a> {
    pub fn from_session(session: &'a Session) -> Self {
        DocumentImages {
            photo: session.photo(),
            signature: session.signature(),
            logos: [session.logo(LogoSlot::Left), session.logo(LogoSlot::Right)],
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Cursor position after the last body section, in millimetres.
    pub cursor_end: f32,
    /// XObject names of images that could not be embedded.
    pub failed_images: Vec<String>,
}

#[derive(Clone, Copy)]
enum Slot {
    Logo1,
    Logo2,
    Photo,
    Signature,
}

impl Slot {
    fn name(&self) -> &'static [u8] {
        match self {
            Slot::Logo1 => b"Logo1",
            Slot::Logo2 => b"Logo2",
            Slot::Photo => b"Photo",
            Slot::Signature => b"Signature",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Slot::Logo1 => "logo 1",
            Slot::Logo2 => "logo 2",
            Slot::Photo => "photo",
            Slot::Signature => "signature",
        }
    }
}

/// Render the document for the session's accepted registration.
pub fn render_session(session: &Session, generated_at: &str) -> Result<RenderedDocument> {
    let snapshot = session.snapshot().ok_or(RenderError::MissingSnapshot)?;
    render_registration(
        session.profile(),
        snapshot,
        &DocumentImages::from_session(session),
        generated_at,
    )
}

/// Render one registration. `generated_at` is printed verbatim in the footer.
///
/// Images that fail to embed are logged and left out; the rest of the page
/// is still produced.
pub fn render_registration(
    profile: &EventProfile,
    snapshot: &RegistrationSnapshot,
    images: &DocumentImages<'_>,
    generated_at: &str,
) -> Result<RenderedDocument> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let pages_id = alloc.bump();
    let page_id = alloc.bump();
    let content_id = alloc.bump();
    let info_id = alloc.bump();
    let font_ids: Vec<(Face, Ref)> = Face::ALL.iter().map(|f| (*f, alloc.bump())).collect();

    let mut pdf = Pdf::new();
    let mut placed: Vec<(&'static [u8], Ref)> = Vec::new();
    let mut failed_images = Vec::new();
    let slots = [
        (Slot::Logo1, images.logos[0]),
        (Slot::Logo2, images.logos[1]),
        (Slot::Photo, images.photo),
        (Slot::Signature, images.signature),
    ];
    for (slot, img) in slots {
        let Some(img) = img else { continue };
        match embed_image(&mut pdf, &mut alloc, img) {
            Ok(id) => placed.push((slot.name(), id)),
            Err(reason) => {
                let err = RenderError::Image {
                    name: slot.label().to_string(),
                    reason,
                };
                log::warn!("could not add {err}");
                failed_images.push(String::from_utf8_lossy(slot.name()).into_owned());
            }
        }
    }
    let has = |slot: Slot| placed.iter().any(|(n, _)| *n == slot.name());

    let mut page = PageCanvas::a4();
    let cursor_end = lay_out(&mut page, profile, snapshot, images, generated_at, &has);
    let (w_pt, h_pt) = page.size_pt();
    pdf.stream(content_id, &page.finish());

    for (face, id) in &font_ids {
        pdf.type1_font(*id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);
    {
        let mut p = pdf.page(page_id);
        p.media_box(Rect::new(0.0, 0.0, w_pt, h_pt))
            .parent(pages_id)
            .contents(content_id);
        let mut resources = p.resources();
        {
            let mut fonts = resources.fonts();
            for (face, id) in &font_ids {
                fonts.pair(Name(face.resource()), *id);
            }
        }
        if !placed.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, id) in &placed {
                xobjects.pair(Name(name), *id);
            }
        }
    }
    let title = format!("{} Registration {}", profile.file_prefix, snapshot.registration_id());
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .creator(TextStr(&profile.header.title));

    let filename = profile.document_filename(snapshot.registration_id());
    log::info!("document generated: {filename}");
    Ok(RenderedDocument {
        filename,
        bytes: pdf.finish(),
        cursor_end,
        failed_images,
    })
}

/// Draw every section top to bottom. Returns the final cursor position.
fn lay_out(
    page: &mut PageCanvas,
    profile: &EventProfile,
    snapshot: &RegistrationSnapshot,
    images: &DocumentImages<'_>,
    generated_at: &str,
    has: &dyn Fn(Slot) -> bool,
) -> f32 {
    let width = page.width();
    let height = page.height();
    let centre = width / 2.0;
    let mut cursor = LayoutCursor::new(MARGIN);
    let m = cursor.margin();
    let f = snapshot.fields();

    // Header band with logos pinned to the corners.
    page.set_fill_color(HEADER_BG);
    page.rect(0.0, 0.0, width, HEADER_HEIGHT, PaintStyle::Fill);
    let y = cursor.y();
    if has(Slot::Logo1) {
        page.image(Slot::Logo1.name(), m, y - 5.0, 35.0, 35.0);
    }
    if has(Slot::Logo2) {
        page.image(Slot::Logo2.name(), width - m - 22.0, y + 2.0, 20.0, 20.0);
    }

    let h = &profile.header;
    let title_lines: [(&str, Face, f32, Rgb, f32); 7] = [
        (h.organiser.as_str(), Face::Bold, 12.0, BLUE, 2.0),
        (h.joiner.as_str(), Face::Bold, 10.0, BLUE, 8.0),
        (h.co_organiser.as_str(), Face::Bold, 11.0, BLUE, 13.0),
        (h.presents.as_str(), Face::Oblique, 8.0, GREY, 18.0),
        (h.title.as_str(), Face::Bold, 14.0, BLUE, 25.0),
        (h.season.as_str(), Face::Bold, 10.0, RED, 31.0),
        (h.form_title.as_str(), Face::Bold, 11.0, BLUE, 38.0),
    ];
    for (text, face, size, color, dy) in title_lines {
        page.set_font(face, size);
        page.set_text_color(color);
        page.text(text, centre, y + dy, Align::Center);
    }

    page.set_draw_color(BLUE);
    page.set_line_width(0.8);
    page.line(m, HEADER_RULE_Y, width - m, HEADER_RULE_Y);

    // Identifier box.
    cursor.set(ID_BOX_Y);
    let y = cursor.y();
    page.set_fill_color(HEADER_BG);
    page.rounded_rect(m, y, width - 2.0 * m, 12.0, 2.0, PaintStyle::Fill);
    page.set_line_width(0.5);
    page.rounded_rect(m, y, width - 2.0 * m, 12.0, 2.0, PaintStyle::Stroke);

    page.set_font(Face::Bold, 10.0);
    page.set_text_color(BLUE);
    page.text("Registration ID:", m + 5.0, y + 7.0, Align::Left);
    page.set_font_size(11.0);
    page.set_text_color(RED);
    page.text(snapshot.registration_id(), m + 45.0, y + 7.0, Align::Left);
    page.set_font(Face::Regular, 9.0);
    page.set_text_color(BLACK);
    let date = format!("Date: {}", snapshot.registration_date());
    page.text(&date, width - m - 5.0, y + 7.0, Align::Right);
    cursor.advance(20.0);

    // Photo beside the personal block.
    if has(Slot::Photo) {
        page.image(Slot::Photo.name(), width - m - 28.0, cursor.y(), 25.0, 30.0);
    }

    section_title(page, "PERSONAL INFORMATION", 11.0, m, &mut cursor);
    page.set_draw_color(BLUE);
    page.set_line_width(0.3);
    page.line(m, cursor.y(), width - m - 30.0, cursor.y());
    cursor.advance(5.0);

    page.set_font(Face::Regular, 9.0);
    page.set_text_color(BLACK);
    let name = snapshot.full_name();
    let personal: [(&str, &str); 7] = [
        ("Name", name.as_str()),
        ("Phone", f.phone.as_str()),
        ("Email", f.email.as_str()),
        ("Address", f.address.as_str()),
        ("City", f.city.as_str()),
        ("State", f.state.as_str()),
        ("Pin Code", f.pincode.as_str()),
    ];
    for (label, value) in personal {
        label_row(page, label, m, cursor.y());
        let lines = page.split_text(value, width - m - 70.0);
        page.text_lines(&lines, m + 30.0, cursor.y(), Align::Left);
        cursor.advance_lines(lines.len(), ROW_STEP);
    }
    cursor.advance(5.0);

    section_title(page, "PLAYER INFORMATION", 11.0, m, &mut cursor);
    page.line(m, cursor.y(), width - m, cursor.y());
    cursor.advance(5.0);

    page.set_font(Face::Regular, 9.0);
    page.set_text_color(BLACK);
    let player: [(&str, &str); 3] = [
        ("Handed", f.handed.as_str()),
        ("Specialist In", f.specialist.as_str()),
        ("Jersey Size", f.jersey_size.as_str()),
    ];
    for (label, value) in player {
        label_row(page, label, m, cursor.y());
        page.text(value, m + 30.0, cursor.y(), Align::Left);
        cursor.advance(ROW_STEP);
    }
    if let Some(achievement) = snapshot.achievement() {
        cursor.advance(2.0);
        page.set_font_face(Face::Bold);
        page.text("Achievements:", m + 3.0, cursor.y(), Align::Left);
        cursor.advance(5.0);
        page.set_font_face(Face::Regular);
        let lines = page.split_text(achievement, width - 2.0 * m - 6.0);
        page.text_lines(&lines, m + 3.0, cursor.y(), Align::Left);
        cursor.advance_lines(lines.len(), 5.0);
    }
    cursor.advance(8.0);

    // Fee highlight.
    let y = cursor.y();
    page.set_fill_color(BLUE);
    page.rounded_rect(m, y, width - 2.0 * m, 18.0, 3.0, PaintStyle::Fill);
    page.set_font(Face::Bold, 10.0);
    page.set_text_color(WHITE);
    page.text(&profile.fee_label, centre, y + 7.0, Align::Center);
    page.set_font_size(13.0);
    page.set_text_color(AMBER);
    page.text(&profile.fee_text, centre, y + 14.0, Align::Center);
    cursor.advance(25.0);

    page.set_font(Face::Bold, 10.0);
    page.set_text_color(BLUE);
    page.text("IMPORTANT INFORMATION", m, cursor.y(), Align::Left);
    cursor.advance(6.0);
    page.set_font(Face::Regular, 8.0);
    page.set_text_color(BLACK);
    for point in &profile.info_points {
        let lines = page.split_text(point, width - 2.0 * m);
        page.text_lines(&lines, m + 2.0, cursor.y(), Align::Left);
        cursor.advance_lines(lines.len(), 4.5);
    }
    cursor.advance(8.0);

    if images.signature.is_some() {
        let y = cursor.y();
        page.set_font(Face::Bold, 9.0);
        page.set_text_color(BLACK);
        page.text("Applicant Signature:", m, y, Align::Left);
        if has(Slot::Signature) {
            page.image(Slot::Signature.name(), m + 42.0, y - 4.0, 45.0, 12.0);
        }
        page.set_draw_color(BLACK);
        page.set_line_width(0.3);
        page.line(m + 42.0, y + 9.0, m + 87.0, y + 9.0);
    }
    cursor.advance(15.0);

    // Footer band, pinned to the page bottom.
    page.set_fill_color(FOOTER_BG);
    page.rect(0.0, height - FOOTER_HEIGHT, width, FOOTER_HEIGHT, PaintStyle::Fill);
    page.set_font(Face::Oblique, 7.0);
    page.set_text_color(GREY);
    page.text(&profile.footer_notice, centre, height - 12.0, Align::Center);
    let stamp = format!("Generated on: {generated_at}");
    page.text(&stamp, centre, height - 8.0, Align::Center);
    page.text(&profile.footer_tagline, centre, height - 4.0, Align::Center);

    cursor.y()
}

fn section_title(page: &mut PageCanvas, title: &str, size: f32, x: f32, cursor: &mut LayoutCursor) {
    page.set_font(Face::Bold, size);
    page.set_text_color(BLUE);
    page.text(title, x, cursor.y(), Align::Left);
    cursor.advance(7.0);
}

fn label_row(page: &mut PageCanvas, label: &str, margin: f32, y: f32) {
    page.set_font_face(Face::Bold);
    page.text(&format!("{label}:"), margin + 3.0, y, Align::Left);
    page.set_font_face(Face::Regular);
}
