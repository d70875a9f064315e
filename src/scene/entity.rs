//! Transform node stored in a [`Scene`](super::Scene)'s entity table.
//!
//! An entity holds a local position/rotation/scale, an optional parent, its
//! children and its components. Links are [`EntityId`]s into the owning
//! scene's table: children are owned by the scene, the parent link is a
//! plain back-reference, so there are no ownership cycles.
//!
//! World-space values are computed by the scene (see
//! [`Scene::position`](super::Scene::position)) since they need the ancestor
//! chain.

use smallvec::SmallVec;

use crate::components::Component;
use crate::math::Vector2;

slotmap::new_key_type! {
    /// Key of an entity inside its scene's entity table.
    pub struct EntityId;
}

/// A positioned node that owns components and references child entities.
pub struct Entity {
    /// Position relative to the parent (or the canvas when there is none).
    pub local_position: Vector2,
    /// Rotation in degrees relative to the parent.
    pub local_rotation: f32,
    /// Per-axis scale relative to the parent.
    pub local_scale: Vector2,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: SmallVec<[EntityId; 4]>,
    pub(crate) components: Vec<Box<dyn Component>>,
    pub(crate) destroyed: bool,
}

impl Entity {
    pub(crate) fn new(x: f32, y: f32) -> Self {
        Self {
            local_position: Vector2::new(x, y),
            local_rotation: 0.0,
            local_scale: Vector2::ONE,
            parent: None,
            children: SmallVec::new(),
            components: Vec::new(),
            destroyed: false,
        }
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Components in attach order, including ones destroyed this frame that
    /// have not been pruned yet.
    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("local_position", &self.local_position)
            .field("local_rotation", &self.local_rotation)
            .field("local_scale", &self.local_scale)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.components.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
