//! Millimetre page surface over a PDF content stream.
//!
//! Callers place things with a top-left origin and y growing downwards, the
//! way the layout is written; conversion to PDF user space (points, origin
//! bottom-left) happens here.

use pdf_writer::{Content, Name, Str};

use crate::metrics::{Face, text_width_pt, to_winansi, wrap_text};

pub const MM_TO_PT: f32 = 72.0 / 25.4;
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
/// Baseline distance of multi-line text, as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintStyle {
    Fill,
    Stroke,
}

pub type Rgb = [u8; 3];

pub struct PageCanvas {
    content: Content,
    width: f32,
    height: f32,
    face: Face,
    font_size: f32,
    fill: Rgb,
    draw: Rgb,
    text: Rgb,
}

fn unit(c: Rgb) -> (f32, f32, f32) {
    (c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0)
}

impl PageCanvas {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        PageCanvas {
            content: Content::new(),
            width: width_mm,
            height: height_mm,
            face: Face::Regular,
            font_size: 16.0,
            fill: [0, 0, 0],
            draw: [0, 0, 0],
            text: [0, 0, 0],
        }
    }

    pub fn a4() -> Self {
        Self::new(A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Page size in points.
    pub fn size_pt(&self) -> (f32, f32) {
        (self.width * MM_TO_PT, self.height * MM_TO_PT)
    }

    fn px(&self, x: f32) -> f32 {
        x * MM_TO_PT
    }

    fn py(&self, y: f32) -> f32 {
        (self.height - y) * MM_TO_PT
    }

    pub fn set_font(&mut self, face: Face, size: f32) {
        self.face = face;
        self.font_size = size;
    }

    pub fn set_font_face(&mut self, face: Face) {
        self.face = face;
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    pub fn set_fill_color(&mut self, rgb: Rgb) {
        self.fill = rgb;
    }

    pub fn set_draw_color(&mut self, rgb: Rgb) {
        self.draw = rgb;
    }

    pub fn set_text_color(&mut self, rgb: Rgb) {
        self.text = rgb;
    }

    pub fn set_line_width(&mut self, mm: f32) {
        self.content.set_line_width(mm * MM_TO_PT);
    }

    /// Colours must be set before a path starts.
    fn begin_path(&mut self, style: PaintStyle) {
        match style {
            PaintStyle::Fill => {
                let (r, g, b) = unit(self.fill);
                self.content.set_fill_rgb(r, g, b);
            }
            PaintStyle::Stroke => {
                let (r, g, b) = unit(self.draw);
                self.content.set_stroke_rgb(r, g, b);
            }
        }
    }

    fn end_path(&mut self, style: PaintStyle) {
        match style {
            PaintStyle::Fill => self.content.fill_nonzero(),
            PaintStyle::Stroke => self.content.stroke(),
        };
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: PaintStyle) {
        let (bx, by) = (self.px(x), self.py(y + h));
        self.begin_path(style);
        self.content.rect(bx, by, w * MM_TO_PT, h * MM_TO_PT);
        self.end_path(style);
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32, style: PaintStyle) {
        let r = r.min(w / 2.0).min(h / 2.0).max(0.0) * MM_TO_PT;
        let (x0, y0) = (self.px(x), self.py(y + h));
        let (x1, y1) = (self.px(x + w), self.py(y));
        let c = r * KAPPA;
        self.begin_path(style);
        self.content
            .move_to(x0 + r, y0)
            .line_to(x1 - r, y0)
            .cubic_to(x1 - r + c, y0, x1, y0 + r - c, x1, y0 + r)
            .line_to(x1, y1 - r)
            .cubic_to(x1, y1 - r + c, x1 - r + c, y1, x1 - r, y1)
            .line_to(x0 + r, y1)
            .cubic_to(x0 + r - c, y1, x0, y1 - r + c, x0, y1 - r)
            .line_to(x0, y0 + r)
            .cubic_to(x0, y0 + r - c, x0 + r - c, y0, x0 + r, y0)
            .close_path();
        self.end_path(style);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (ax, ay, bx, by) = (self.px(x1), self.py(y1), self.px(x2), self.py(y2));
        self.begin_path(PaintStyle::Stroke);
        self.content.move_to(ax, ay).line_to(bx, by);
        self.end_path(PaintStyle::Stroke);
    }

    /// Width of `text` in millimetres with the current font.
    pub fn text_width(&self, text: &str) -> f32 {
        text_width_pt(self.face, self.font_size, text) / MM_TO_PT
    }

    /// Wrap `text` to `max_width` millimetres with the current font.
    pub fn split_text(&self, text: &str, max_width: f32) -> Vec<String> {
        wrap_text(text, self.face, self.font_size, max_width * MM_TO_PT)
    }

    /// Distance between baselines of multi-line text, in millimetres.
    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR / MM_TO_PT
    }

    /// Draw one line with its baseline at `y`.
    pub fn text(&mut self, text: &str, x: f32, y: f32, align: Align) {
        let x = match align {
            Align::Left => x,
            Align::Center => x - self.text_width(text) / 2.0,
            Align::Right => x - self.text_width(text),
        };
        let (tx, ty) = (self.px(x), self.py(y));
        let (r, g, b) = unit(self.text);
        let encoded = to_winansi(text);
        self.content.set_fill_rgb(r, g, b);
        self.content
            .begin_text()
            .set_font(Name(self.face.resource()), self.font_size)
            .set_text_matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
            .show(Str(&encoded))
            .end_text();
    }

    /// Draw pre-wrapped lines, the first baseline at `y`.
    pub fn text_lines(&mut self, lines: &[String], x: f32, y: f32, align: Align) {
        let step = self.line_height();
        for (i, line) in lines.iter().enumerate() {
            self.text(line, x, y + step * i as f32, align);
        }
    }

    /// Paint a named image XObject into the box with top-left (x, y).
    pub fn image(&mut self, name: &[u8], x: f32, y: f32, w: f32, h: f32) {
        let (bx, by) = (self.px(x), self.py(y + h));
        self.content
            .save_state()
            .transform([w * MM_TO_PT, 0.0, 0.0, h * MM_TO_PT, bx, by])
            .x_object(Name(name))
            .restore_state();
    }

    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }
}
