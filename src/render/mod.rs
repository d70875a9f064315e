//! Drawing surface abstraction.
//!
//! The core only ever talks to a [`DrawContext`], a small 2D immediate-mode
//! API shaped after an HTML canvas context: clear, save/restore, affine
//! transform, rotate, draw image, fill text and text styling. Backends:
//!
//! - [`recording`] – headless canvas that records every call (tests, `--headless`)
//! - `raylibcanvas` – windowed backend (cargo feature `raylib`)
//!
//! [`canvas::CanvasRenderer`] owns the surface size and clears it each frame.

pub mod canvas;
#[cfg(feature = "raylib")]
pub mod raylibcanvas;
pub mod recording;

pub use canvas::CanvasRenderer;
pub use recording::{DrawCommand, RecordingCanvas};

use std::fmt;
use std::str::FromStr;

use crate::resources::texturestore::Texture;

/// Horizontal text alignment relative to the draw position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Start,
    End,
}

impl TextAlign {
    /// Fraction of the measured text width to shift left when drawing.
    ///
    /// Start/End are treated as left-to-right.
    pub fn anchor(self) -> f32 {
        match self {
            TextAlign::Left | TextAlign::Start => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::Right | TextAlign::End => 1.0,
        }
    }
}

/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// What a cleared region shows on screen.
    pub const BACKGROUND: Color = Color::WHITE;

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parses `#RGB`, `#RRGGBB` and `#RRGGBBAA`.
impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with '#': {s}"))?;
        if !hex.is_ascii() {
            return Err(format!("Invalid color {s}"));
        }
        let channel = |i: usize, len: usize| {
            u8::from_str_radix(&hex[i..i + len], 16)
                .map(|v| if len == 1 { v * 17 } else { v })
                .map_err(|e| format!("Invalid color {s}: {e}"))
        };
        match hex.len() {
            3 => Ok(Color::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Ok(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            8 => Ok(Color::rgba(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                channel(6, 2)?,
            )),
            _ => Err(format!("Invalid color length: {s}")),
        }
    }
}

/// 2D immediate-mode drawing context.
///
/// Transforms follow canvas semantics: `set_transform` replaces the current
/// matrix, `rotate` post-multiplies it, and `save`/`restore` push and pop the
/// whole drawing state (matrix and text styling).
pub trait DrawContext {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn save(&mut self);
    fn restore(&mut self);
    /// Replace the current matrix with `[a c e; b d f; 0 0 1]`.
    fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32);
    fn rotate(&mut self, radians: f32);
    fn draw_image(&mut self, image: &Texture, dx: f32, dy: f32, dw: f32, dh: f32);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>);
    fn set_font(&mut self, family: &str, size_px: f32);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_fill_style(&mut self, color: Color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_color() {
        let c: Color = "#FF8000".parse().unwrap();
        assert_eq!(c, Color::rgb(255, 128, 0));
    }

    #[test]
    fn test_parse_short_and_alpha_colors() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#00000080".parse::<Color>().unwrap(),
            Color::rgba(0, 0, 0, 128)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("FFFFFF".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_round_trips_hex() {
        assert_eq!(Color::rgb(1, 2, 255).to_string(), "#0102FF");
    }

    #[test]
    fn test_align_anchor() {
        assert_eq!(TextAlign::Left.anchor(), 0.0);
        assert_eq!(TextAlign::Center.anchor(), 0.5);
        assert_eq!(TextAlign::End.anchor(), 1.0);
    }
}
