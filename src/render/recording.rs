//! Headless drawing surface.
//!
//! [`RecordingCanvas`] implements [`DrawContext`] by appending a
//! [`DrawCommand`] for every call while tracking the canvas state stack, so
//! tests can assert exactly what a frame drew and the `--headless` runner can
//! report frame statistics without a window.

use crate::render::{Color, DrawContext, TextAlign};
use crate::resources::texturestore::Texture;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    ClearRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Save,
    Restore,
    SetTransform([f32; 6]),
    Rotate(f32),
    DrawImage {
        key: String,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
        /// Matrix in effect when the image was drawn.
        transform: [f32; 6],
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        max_width: Option<f32>,
        transform: [f32; 6],
        font: String,
        size_px: f32,
        align: TextAlign,
        color: Color,
    },
    SetFont {
        family: String,
        size_px: f32,
    },
    SetTextAlign(TextAlign),
    SetFillStyle(Color),
}

#[derive(Clone, Debug)]
struct CanvasState {
    transform: [f32; 6],
    font: String,
    size_px: f32,
    align: TextAlign,
    color: Color,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: IDENTITY,
            font: "sans-serif".to_string(),
            size_px: 10.0,
            align: TextAlign::Start,
            color: Color::BLACK,
        }
    }
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Canvas that records draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    state: CanvasState,
    stack: Vec<CanvasState>,
    unbalanced_restores: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded since creation or the last [`Self::take_commands`].
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands, keeping the current drawing state.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Keys of every image drawn, in draw order.
    pub fn drawn_images(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawImage { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every string passed to `fill_text`, in draw order.
    pub fn drawn_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Current save depth; zero after a well-formed frame.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Count of `restore` calls made with an empty stack.
    pub fn unbalanced_restores(&self) -> usize {
        self.unbalanced_restores
    }

    /// Matrix currently in effect.
    pub fn transform(&self) -> [f32; 6] {
        self.state.transform
    }
}

impl DrawContext for RecordingCanvas {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => self.unbalanced_restores += 1,
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.state.transform = [a, b, c, d, e, f];
        self.commands.push(DrawCommand::SetTransform([a, b, c, d, e, f]));
    }

    fn rotate(&mut self, radians: f32) {
        let [a, b, c, d, e, f] = self.state.transform;
        let (sin, cos) = radians.sin_cos();
        self.state.transform = [
            a * cos + c * sin,
            b * cos + d * sin,
            c * cos - a * sin,
            d * cos - b * sin,
            e,
            f,
        ];
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn draw_image(&mut self, image: &Texture, dx: f32, dy: f32, dw: f32, dh: f32) {
        self.commands.push(DrawCommand::DrawImage {
            key: image.key().to_string(),
            dx,
            dy,
            dw,
            dh,
            transform: self.state.transform,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            max_width,
            transform: self.state.transform,
            font: self.state.font.clone(),
            size_px: self.state.size_px,
            align: self.state.align,
            color: self.state.color,
        });
    }

    fn set_font(&mut self, family: &str, size_px: f32) {
        self.state.font = family.to_string();
        self.state.size_px = size_px;
        self.commands.push(DrawCommand::SetFont {
            family: family.to_string(),
            size_px,
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
        self.commands.push(DrawCommand::SetTextAlign(align));
    }

    fn set_fill_style(&mut self, color: Color) {
        self.state.color = color;
        self.commands.push(DrawCommand::SetFillStyle(color));
    }
}
