//! Behaviours attached to entities.
//!
//! Every component implements [`Component`]: an optional per-frame `update`,
//! an optional `render` onto a [`DrawContext`], and a two-phase `destroy`
//! (the flag flips immediately; the owning entity drops the component on its
//! next update pass).
//!
//! Submodules overview:
//! - [`button`] – axis-aligned clickable region bound to a callback
//! - [`image`] – draws a keyed texture at the entity's world transform
//! - [`textfield`] – draws a string with font/size/color/alignment settings

pub mod button;
pub mod image;
pub mod textfield;

pub use button::{Button, ClickCallback};
pub use image::Image;
pub use textfield::{TextField, TextFieldConfig};

use std::any::Any;

use crate::render::DrawContext;
use crate::scene::{EntityAddress, EntityId, Scene};

/// State every component carries: its owner and the destroyed flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentCore {
    owner: Option<EntityAddress>,
    destroyed: bool,
}

impl ComponentCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity this component is attached to, cleared on destroy.
    pub fn owner(&self) -> Option<EntityAddress> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: EntityAddress) {
        self.owner = Some(owner);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark destroyed and drop the owner reference.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.owner = None;
    }
}

/// Access given to a component while it updates.
pub struct UpdateContext<'a> {
    /// The entity being updated.
    pub entity: EntityId,
    /// The owning scene. The component itself is detached from the entity
    /// for the duration of the call, so the whole scene is borrowable.
    pub scene: &'a mut Scene,
}

/// Read-only access given to a component while it renders.
pub struct RenderContext<'a> {
    pub entity: EntityId,
    pub scene: &'a Scene,
}

/// A render/update behaviour owned by exactly one entity.
pub trait Component: Any {
    fn core(&self) -> &ComponentCore;
    fn core_mut(&mut self) -> &mut ComponentCore;

    /// Called once when the component is appended to an entity.
    fn on_attach(&mut self, owner: EntityAddress) {
        self.core_mut().set_owner(owner);
    }

    fn update(&mut self, _delta: f32, _ctx: &mut UpdateContext<'_>) {}

    fn render(&self, _ctx: &RenderContext<'_>, _surface: &mut dyn DrawContext) {}

    /// Mark the component destroyed. Removal from the owner's list happens
    /// on the owner's next update pass.
    fn destroy(&mut self) {
        self.core_mut().destroy();
    }

    fn is_destroyed(&self) -> bool {
        self.core().is_destroyed()
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
