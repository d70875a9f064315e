//! Windowed drawing surface backed by raylib.
//!
//! raylib has no canvas-style matrix stack, so [`RaylibCanvas`] keeps the
//! current affine matrix and text style in software and turns each draw call
//! into one raylib call: the matrix's translation becomes the draw position
//! and its rotation the draw angle. Transforms built from `set_transform`
//! with unit scale plus `rotate`, which is all the components emit, map
//! exactly.
//!
//! Textures live in the engine's [`TextureStore`] as decoded pixels and are
//! uploaded to the GPU the first time they are drawn, then cached by key.
//!
//! [`TextureStore`]: crate::resources::texturestore::TextureStore

use std::io::Cursor;

use log::{error, info};
use raylib::prelude::{
    Color as RlColor, Image as RlImage, RaylibDraw, RaylibDrawHandle, RaylibThread, Rectangle,
    Texture2D, Vector2 as RlVector2,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::render::{Color, DrawContext, TextAlign};
use crate::resources::texturestore::Texture;

/// GPU copies of store textures, keyed like the store.
#[derive(Default)]
pub struct TextureCache {
    uploaded: FxHashMap<String, Texture2D>,
    failed: FxHashSet<String>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.uploaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty()
    }

    fn get_or_upload(
        &mut self,
        d: &mut RaylibDrawHandle<'_>,
        thread: &RaylibThread,
        texture: &Texture,
    ) -> Option<&Texture2D> {
        if !self.uploaded.contains_key(texture.key()) {
            if self.failed.contains(texture.key()) {
                return None;
            }
            match upload(d, thread, texture) {
                Ok(gpu) => {
                    info!("Uploaded texture {} to GPU", texture.key());
                    self.uploaded.insert(texture.key().to_string(), gpu);
                }
                Err(e) => {
                    error!("Failed to upload texture {}: {}", texture.key(), e);
                    self.failed.insert(texture.key().to_string());
                    return None;
                }
            }
        }
        self.uploaded.get(texture.key())
    }
}

fn upload(
    d: &mut RaylibDrawHandle<'_>,
    thread: &RaylibThread,
    texture: &Texture,
) -> Result<Texture2D, String> {
    let mut png = Vec::new();
    texture
        .pixels()
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    let image = RlImage::load_image_from_mem(".png", &png).map_err(|e| format!("{e:?}"))?;
    d.load_texture_from_image(thread, &image)
        .map_err(|e| format!("{e:?}"))
}

#[derive(Clone, Debug)]
struct CanvasState {
    transform: [f32; 6],
    size_px: f32,
    align: TextAlign,
    color: Color,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            size_px: 10.0,
            align: TextAlign::Start,
            color: Color::BLACK,
        }
    }
}

fn to_raylib(color: Color) -> RlColor {
    RlColor::new(color.r, color.g, color.b, color.a)
}

/// [`DrawContext`] drawing into an open raylib frame.
pub struct RaylibCanvas<'a, 'b> {
    d: &'a mut RaylibDrawHandle<'b>,
    thread: &'a RaylibThread,
    cache: &'a mut TextureCache,
    state: CanvasState,
    stack: Vec<CanvasState>,
}

impl<'a, 'b> RaylibCanvas<'a, 'b> {
    pub fn new(
        d: &'a mut RaylibDrawHandle<'b>,
        thread: &'a RaylibThread,
        cache: &'a mut TextureCache,
    ) -> Self {
        Self {
            d,
            thread,
            cache,
            state: CanvasState::default(),
            stack: Vec::new(),
        }
    }

    /// Map a local point through the current matrix.
    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.state.transform;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Rotation of the current matrix in degrees.
    fn angle(&self) -> f32 {
        let [a, b, ..] = self.state.transform;
        b.atan2(a).to_degrees()
    }
}

impl DrawContext for RaylibCanvas<'_, '_> {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.d.draw_rectangle_rec(
            Rectangle::new(x, y, width, height),
            to_raylib(Color::BACKGROUND),
        );
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.state.transform = [a, b, c, d, e, f];
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
    }

    fn draw_image(&mut self, image: &Texture, dx: f32, dy: f32, dw: f32, dh: f32) {
        let (x, y) = self.apply(0.0, 0.0);
        let rotation = self.angle();
        let Some(gpu) = self.cache.get_or_upload(self.d, self.thread, image) else {
            return;
        };
        let source = Rectangle::new(0.0, 0.0, image.width() as f32, image.height() as f32);
        let dest = Rectangle::new(x, y, dw, dh);
        self.d.draw_texture_pro(
            gpu,
            source,
            dest,
            RlVector2::new(-dx, -dy),
            rotation,
            RlColor::WHITE,
        );
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>) {
        let mut size = self.state.size_px;
        // Default font glyphs are roughly half as wide as they are tall.
        let mut width = text.chars().count() as f32 * size * 0.5;
        if let Some(max) = max_width {
            if width > max && width > 0.0 {
                size *= max / width;
                width = max;
            }
        }
        let (px, py) = self.apply(x, y);
        let rotation = self.angle();
        let origin = RlVector2::new(width * self.state.align.anchor(), 0.0);
        let font = self.d.get_font_default();
        self.d.draw_text_pro(
            &font,
            text,
            RlVector2::new(px, py),
            origin,
            rotation,
            size,
            1.0,
            to_raylib(self.state.color),
        );
    }

    fn set_font(&mut self, _family: &str, size_px: f32) {
        // Only raylib's built-in font is available; the family is ignored.
        self.state.size_px = size_px;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    fn set_fill_style(&mut self, color: Color) {
        self.state.color = color;
    }
}
