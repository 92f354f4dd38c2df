/// Running vertical position for one render, in millimetres from the top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCursor {
    y: f32,
    margin: f32,
}

impl LayoutCursor {
    pub fn new(margin: f32) -> Self {
        LayoutCursor { y: margin, margin }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Advance past `lines` wrapped lines of `line_height` each.
    pub fn advance_lines(&mut self, lines: usize, line_height: f32) {
        self.y += lines as f32 * line_height;
    }

    /// Jump to an absolute position, for sections pinned to the page.
    pub fn set(&mut self, y: f32) {
        self.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_margin_and_accumulates() {
        let mut c = LayoutCursor::new(15.0);
        assert_eq!(c.y(), 15.0);
        c.set(70.0);
        c.advance(20.0);
        c.advance_lines(3, 4.5);
        assert!((c.y() - 103.5).abs() < 1e-6);
        assert_eq!(c.margin(), 15.0);
    }
}
