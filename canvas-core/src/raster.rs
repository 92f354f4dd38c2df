//! Owned pixel backing store with canvas-like pixel access.

use tiny_skia::{ColorU8, Pixmap};

use crate::error::{CanvasError, Result};

/// Straight (non-premultiplied) RGBA pixels, as returned by `getImageData`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CanvasError::ImageDataSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(ImageData {
            width,
            height,
            data,
        })
    }

    /// RGBA of the pixel at (x, y), if inside.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.data[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Integer pixel rectangle inside a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn full(width: u32, height: u32) -> Self {
        PixelRect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Smallest rectangle covering the box `(x0, y0)..(x1, y1)`, clipped to
    /// `bounds`. `None` when nothing is left.
    pub fn covering(x0: f32, y0: f32, x1: f32, y1: f32, bounds: (u32, u32)) -> Option<Self> {
        let clip = |v: f32, max: u32| v.clamp(0.0, max as f32) as u32;
        let (left, top) = (clip(x0.floor(), bounds.0), clip(y0.floor(), bounds.1));
        let (right, bottom) = (clip(x1.ceil(), bounds.0), clip(y1.ceil(), bounds.1));
        (right > left && bottom > top).then_some(PixelRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }

    pub fn union(self, other: PixelRect) -> Self {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        PixelRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width && y - self.y < self.height
    }
}

/// A resizable raster that starts fully transparent.
///
/// Pixels are held premultiplied; [`RasterBuffer::is_blank`] inspects those
/// raw bytes directly.
#[derive(Clone, Debug)]
pub struct RasterBuffer {
    pixmap: Pixmap,
}

impl RasterBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::ZeroSized { width, height })?;
        Ok(RasterBuffer { pixmap })
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        RasterBuffer { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Raw premultiplied bytes of the whole store.
    pub fn raw(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// True iff every channel of every pixel is zero.
    pub fn is_blank(&self) -> bool {
        self.pixmap.data().iter().all(|b| *b == 0)
    }

    /// Wipe to fully transparent without resizing.
    pub fn clear(&mut self) {
        self.pixmap.data_mut().fill(0);
    }

    /// Read every pixel back as straight RGBA.
    pub fn get_image_data(&self) -> ImageData {
        self.image_data_in(PixelRect::full(self.width(), self.height()))
    }

    /// Read the pixels of `rect`, clipped to the store, as straight RGBA.
    pub fn image_data_in(&self, rect: PixelRect) -> ImageData {
        let x0 = rect.x.min(self.width());
        let y0 = rect.y.min(self.height());
        let x1 = rect.x.saturating_add(rect.width).min(self.width());
        let y1 = rect.y.saturating_add(rect.height).min(self.height());
        let stride = self.width() as usize;
        let pixels = self.pixmap.pixels();
        let mut data = Vec::with_capacity((x1 - x0) as usize * (y1 - y0) as usize * 4);
        for y in y0..y1 {
            let row = y as usize * stride;
            for p in &pixels[row + x0 as usize..row + x1 as usize] {
                let c = p.demultiply();
                data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        ImageData {
            width: x1 - x0,
            height: y1 - y0,
            data,
        }
    }

    /// Write `image` with its top-left corner at (dx, dy), replacing pixels
    /// rather than blending. Parts falling outside the store are dropped.
    pub fn put_image_data(&mut self, image: &ImageData, dx: i32, dy: i32) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let stride = self.width() as usize;
        let pixels = self.pixmap.pixels_mut();
        for sy in 0..image.height as i64 {
            let ty = sy + dy as i64;
            if ty < 0 || ty >= h {
                continue;
            }
            for sx in 0..image.width as i64 {
                let tx = sx + dx as i64;
                if tx < 0 || tx >= w {
                    continue;
                }
                let si = (sy as usize * image.width as usize + sx as usize) * 4;
                let s = &image.data[si..si + 4];
                pixels[ty as usize * stride + tx as usize] =
                    ColorU8::from_rgba(s[0], s[1], s[2], s[3]).premultiply();
            }
        }
    }

    /// Replace the store with a transparent one of the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.pixmap = Pixmap::new(width, height).ok_or(CanvasError::ZeroSized { width, height })?;
        Ok(())
    }

    /// Resize, then copy the previous contents back anchored at the origin.
    ///
    /// Content beyond the new bounds is truncated; nothing is rescaled.
    pub fn resize_preserving(&mut self, width: u32, height: u32) -> Result<()> {
        let old = std::mem::replace(
            &mut self.pixmap,
            Pixmap::new(width, height).ok_or(CanvasError::ZeroSized { width, height })?,
        );
        let copy_w = old.width().min(width) as usize * 4;
        let rows = old.height().min(height) as usize;
        let old_stride = old.width() as usize * 4;
        let new_stride = width as usize * 4;
        let dst = self.pixmap.data_mut();
        for y in 0..rows {
            dst[y * new_stride..y * new_stride + copy_w]
                .copy_from_slice(&old.data()[y * old_stride..y * old_stride + copy_w]);
        }
        Ok(())
    }

    /// Straight RGBA bytes, ready for an encoder.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.get_image_data().data
    }
}
