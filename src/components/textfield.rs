//! Text component.
//!
//! Draws a single line of text at the owning entity's world position and
//! rotation. World scale does not affect the font size.

use std::any::Any;

use crate::components::{Component, ComponentCore, RenderContext};
use crate::render::{Color, DrawContext, TextAlign};

/// Styling for a [`TextField`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextFieldConfig {
    /// Font family name.
    pub font: String,
    /// Font size in pixels.
    pub size_px: f32,
    pub color: Color,
    pub align: TextAlign,
    /// Width the text is squeezed into when longer.
    pub max_width: Option<f32>,
}

impl Default for TextFieldConfig {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            size_px: 12.0,
            color: Color::BLACK,
            align: TextAlign::Left,
            max_width: None,
        }
    }
}

impl TextFieldConfig {
    /// Build a config from CSS-style strings, e.g. `("Arial", "12px", "#FFFFFF")`.
    pub fn new(font: &str, size: &str, color: &str, align: TextAlign) -> Result<Self, String> {
        Ok(Self {
            font: font.to_string(),
            size_px: parse_font_size(size)?,
            color: color.parse()?,
            align,
            max_width: None,
        })
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Parse a pixel font size such as `"12px"` or `"12"`.
pub fn parse_font_size(size: &str) -> Result<f32, String> {
    let trimmed = size.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    match number.parse::<f32>() {
        Ok(px) if px.is_finite() && px > 0.0 => Ok(px),
        _ => Err(format!("Invalid font size: {size}")),
    }
}

/// Draws `text` with a [`TextFieldConfig`].
#[derive(Debug, Clone)]
pub struct TextField {
    core: ComponentCore,
    pub text: String,
    pub config: TextFieldConfig,
}

impl TextField {
    pub fn new(text: impl Into<String>, config: TextFieldConfig) -> Self {
        Self {
            core: ComponentCore::new(),
            text: text.into(),
            config,
        }
    }
}

impl Component for TextField {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn render(&self, ctx: &RenderContext<'_>, surface: &mut dyn DrawContext) {
        let (Some(position), Some(rotation)) =
            (ctx.scene.position(ctx.entity), ctx.scene.rotation(ctx.entity))
        else {
            return;
        };

        surface.save();
        surface.set_transform(1.0, 0.0, 0.0, 1.0, position.x, position.y);
        surface.rotate(rotation.to_radians());
        surface.set_font(&self.config.font, self.config.size_px);
        surface.set_text_align(self.config.align);
        surface.set_fill_style(self.config.color);
        surface.fill_text(&self.text, 0.0, 0.0, self.config.max_width);
        surface.restore();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
