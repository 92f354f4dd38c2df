//! Freehand signature pad over a [`RasterBuffer`].

use form_core::profile::SignatureGeometry;
use form_core::{CapturedImage, FormError, ImageFormat, SignatureSource, parse_hex_color};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Stroke, Transform};

use crate::encode::encode_rgba_to_png_bytes;
use crate::error::Result;
use crate::raster::{PixelRect, RasterBuffer};

const DEFAULT_INK: [u8; 3] = [0x0f, 0x17, 0x2a];

/// On-screen box of the canvas element, in client pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
    Cancel,
}

/// One mouse or first-touch sample in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub client_x: f64,
    pub client_y: f64,
}

#[derive(Clone, Copy, Debug)]
struct Pen {
    width: f32,
    ink: [u8; 3],
}

pub struct SignatureSurface {
    raster: RasterBuffer,
    drawing: bool,
    last: (f32, f32),
    pen: Pen,
    height: u32,
    padding: f64,
    /// Pixels changed since the last [`SignatureSurface::take_dirty`].
    dirty: Option<PixelRect>,
}

/// Backing width for a container of `container_width` CSS pixels.
pub fn backing_width(container_width: f64, padding: f64) -> u32 {
    let w = (container_width - padding).floor();
    if w.is_finite() && w >= 1.0 {
        w.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

impl SignatureSurface {
    pub fn new(geometry: &SignatureGeometry, container_width: f64) -> Result<Self> {
        let height = geometry.height.max(1);
        let raster = RasterBuffer::new(
            backing_width(container_width, geometry.container_padding),
            height,
        )?;
        Ok(SignatureSurface {
            raster,
            drawing: false,
            last: (0.0, 0.0),
            pen: Pen {
                width: geometry.stroke_width,
                ink: parse_hex_color(&geometry.ink).unwrap_or(DEFAULT_INK),
            },
            height,
            padding: geometry.container_padding,
            dirty: None,
        })
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn last_point(&self) -> (f32, f32) {
        self.last
    }

    /// Map client coordinates into backing-store pixels.
    ///
    /// The displayed box and the backing store are scaled independently per
    /// axis; a degenerate box maps 1:1.
    pub fn to_raster(&self, client_x: f64, client_y: f64, rect: &CanvasRect) -> (f32, f32) {
        let sx = if rect.width > 0.0 {
            self.width() as f64 / rect.width
        } else {
            1.0
        };
        let sy = if rect.height > 0.0 {
            self.height() as f64 / rect.height
        } else {
            1.0
        };
        (
            ((client_x - rect.left) * sx) as f32,
            ((client_y - rect.top) * sy) as f32,
        )
    }

    /// Feed one pointer sample. Returns true when pixels changed.
    pub fn handle(&mut self, input: PointerInput, rect: &CanvasRect) -> bool {
        let (x, y) = self.to_raster(input.client_x, input.client_y, rect);
        match input.phase {
            PointerPhase::Down => {
                self.pointer_down(x, y);
                false
            }
            PointerPhase::Move => self.pointer_move(x, y),
            PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel => {
                self.pointer_up();
                false
            }
        }
    }

    /// Start a stroke at a raster point. Nothing is drawn yet.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drawing = true;
        self.last = (x, y);
    }

    /// Extend the current stroke to (x, y). Ignored when no stroke is active.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !self.drawing {
            return false;
        }
        let drawn = self.segment(self.last, (x, y));
        self.last = (x, y);
        drawn
    }

    pub fn pointer_up(&mut self) {
        self.drawing = false;
    }

    /// Area changed since the previous call, if any, then reset it.
    pub fn take_dirty(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    fn mark_dirty(&mut self, rect: PixelRect) {
        self.dirty = Some(match self.dirty {
            Some(d) => d.union(rect),
            None => rect,
        });
    }

    fn mark_all_dirty(&mut self) {
        self.dirty = Some(PixelRect::full(self.width(), self.height()));
    }

    /// Bounding box of a pen segment, with one pixel for anti-aliasing.
    fn mark_segment(&mut self, from: (f32, f32), to: (f32, f32)) {
        let reach = self.pen.width / 2.0 + 1.0;
        let bounds = (self.width(), self.height());
        if let Some(rect) = PixelRect::covering(
            from.0.min(to.0) - reach,
            from.1.min(to.1) - reach,
            from.0.max(to.0) + reach,
            from.1.max(to.1) + reach,
            bounds,
        ) {
            self.mark_dirty(rect);
        }
    }

    fn segment(&mut self, from: (f32, f32), to: (f32, f32)) -> bool {
        let mut paint = Paint::default();
        let [r, g, b] = self.pen.ink;
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = true;

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        if dx * dx + dy * dy < 1e-6 {
            // A round cap on a zero-length segment is a dot.
            let Some(dot) = PathBuilder::from_circle(to.0, to.1, self.pen.width / 2.0) else {
                return false;
            };
            self.raster.pixmap_mut().fill_path(
                &dot,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            self.mark_segment(to, to);
            return true;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let Some(path) = pb.finish() else {
            return false;
        };
        let stroke = Stroke {
            width: self.pen.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.raster
            .pixmap_mut()
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        self.mark_segment(from, to);
        true
    }

    /// Follow a container resize, keeping existing ink anchored top-left.
    ///
    /// Any stroke in progress ends first so it cannot continue across the
    /// reallocation.
    pub fn resize(&mut self, container_width: f64) -> Result<()> {
        self.drawing = false;
        let width = backing_width(container_width, self.padding);
        self.raster.resize_preserving(width, self.height)?;
        self.mark_all_dirty();
        log::debug!("signature surface resized to {width}x{}", self.height);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.raster.clear();
        self.mark_all_dirty();
        log::info!("signature cleared");
    }

    pub fn is_blank(&self) -> bool {
        self.raster.is_blank()
    }

    /// Serialize the current raster as PNG.
    pub fn to_png(&self) -> Result<CapturedImage> {
        let (w, h) = (self.width(), self.height());
        let bytes = encode_rgba_to_png_bytes(w, h, &self.raster.to_rgba())?;
        Ok(CapturedImage::new(ImageFormat::Png, w, h, bytes))
    }
}

impl SignatureSource for SignatureSurface {
    fn is_blank(&self) -> bool {
        SignatureSurface::is_blank(self)
    }

    fn capture(&self) -> form_core::Result<CapturedImage> {
        self.to_png()
            .map_err(|e| FormError::SignatureCapture(e.to_string()))
    }
}
