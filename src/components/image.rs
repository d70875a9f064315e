//! Image component.
//!
//! Draws a texture from the [`TextureStore`] at the owning entity's world
//! transform. The draw size is the texture's natural size, captured when the
//! component is created, times the entity's world scale. `origin` is the
//! anchor as a fraction of that size: `(0.5, 0.5)` centres the image on the
//! entity, `(0, 0)` puts its top-left corner there.
//!
//! The texture itself is looked up again every frame, so an image created
//! before its key was published starts drawing once the key appears (at the
//! size captured at creation).
//!
//! [`TextureStore`]: crate::resources::texturestore::TextureStore

use std::any::Any;

use log::{trace, warn};

use crate::components::{Component, ComponentCore, RenderContext};
use crate::engine::EngineContext;
use crate::math::Vector2;
use crate::render::DrawContext;

/// Draws a keyed texture anchored at the entity.
#[derive(Debug, Clone)]
pub struct Image {
    core: ComponentCore,
    key: String,
    width: f32,
    height: f32,
    /// Anchor fraction per axis.
    pub origin: Vector2,
}

impl Image {
    /// Create an image for the texture published under `key`.
    ///
    /// A key with no texture yet yields a zero-sized image.
    pub fn new(context: &EngineContext, key: impl Into<String>) -> Self {
        let key = key.into();
        let (width, height) = match context.textures().get(&key) {
            Some(texture) => (texture.width() as f32, texture.height() as f32),
            None => {
                warn!("Image created for missing texture {key}");
                (0.0, 0.0)
            }
        };
        Self {
            core: ComponentCore::new(),
            key,
            width,
            height,
            origin: Vector2::new(0.5, 0.5),
        }
    }

    pub fn with_origin(mut self, origin: Vector2) -> Self {
        self.origin = origin;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Size captured at creation, before scaling.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

impl Component for Image {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn render(&self, ctx: &RenderContext<'_>, surface: &mut dyn DrawContext) {
        let scene = ctx.scene;
        let Some(texture) = scene.context().textures().get(&self.key) else {
            trace!("texture {} not loaded, skipping draw", self.key);
            return;
        };
        let (Some(position), Some(rotation), Some(scale)) = (
            scene.position(ctx.entity),
            scene.rotation(ctx.entity),
            scene.scale(ctx.entity),
        ) else {
            return;
        };

        let dw = self.width * scale.x;
        let dh = self.height * scale.y;

        surface.save();
        surface.set_transform(1.0, 0.0, 0.0, 1.0, position.x, position.y);
        surface.rotate(rotation.to_radians());
        surface.draw_image(&texture, -dw * self.origin.x, -dh * self.origin.y, dw, dh);
        surface.restore();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
