//! Fixed-size canvas owner.

use crate::render::DrawContext;

/// Owns the drawing surface dimensions and clears it at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasRenderer {
    pub width: u32,
    pub height: u32,
}

impl CanvasRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Clear the whole surface.
    pub fn clear(&self, surface: &mut dyn DrawContext) {
        surface.clear_rect(0.0, 0.0, self.width as f32, self.height as f32);
    }
}
