//! Scene: an ordered collection of entities updated and rendered as a unit.
//!
//! Entities live in a [`SlotMap`] keyed by [`EntityId`]; `order` keeps
//! insertion order, which is the update/render order.
//!
//! # Update pass
//!
//! The pass walks `order` by index. Entities that are not destroyed get their
//! components updated; any entity found destroyed afterwards (whether it was
//! updated or not) is removed from `order` and the table, and the same index
//! is visited again. A final sweep drops entities that were destroyed behind
//! the cursor, so nothing destroyed during a pass survives it.
//!
//! # Render pass
//!
//! Rendering never prunes; it only skips destroyed entities and components,
//! so an entity destroyed mid-frame is simply not drawn.
//!
//! # World transforms
//!
//! [`Scene::position`] walks from the entity to the root. For each ancestor,
//! nearest first, the accumulated position is scaled by the ancestor's local
//! scale, rotated by its local rotation and translated by its local position.
//! [`Scene::rotation`] is the plain sum of local rotations and
//! [`Scene::scale`] the per-axis product of local scales; neither reuses the
//! rotation applied during the position walk. Parent links must not form a
//! cycle.

use log::{debug, warn};
use slotmap::SlotMap;

use crate::components::{Component, RenderContext, UpdateContext};
use crate::engine::EngineContext;
use crate::math::Vector2;
use crate::render::DrawContext;
use crate::scene::entity::{Entity, EntityId};
use crate::scene::{EntityAddress, SceneId};

/// A collection of entities managed as one updatable/renderable unit.
pub struct Scene {
    id: SceneId,
    context: EngineContext,
    entities: SlotMap<EntityId, Entity>,
    order: Vec<EntityId>,
    destroyed: bool,
}

impl Scene {
    /// Create an empty scene bound to the engine services in `context`.
    pub fn new(context: &EngineContext) -> Self {
        Self {
            id: context.next_scene_id(),
            context: context.clone(),
            entities: SlotMap::with_key(),
            order: Vec::new(),
            destroyed: false,
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Engine services this scene was created with.
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    /// Create an entity at local position `(x, y)` and append it to the
    /// update/render order.
    pub fn spawn(&mut self, x: f32, y: f32) -> EntityId {
        let id = self.entities.insert(Entity::new(x, y));
        self.order.push(id);
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Entities in update/render order.
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Number of entities in the scene's list, including ones destroyed this
    /// frame that have not been pruned yet.
    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// True for destroyed entities and for ids that are no longer in the table.
    pub fn is_entity_destroyed(&self, id: EntityId) -> bool {
        self.entities.get(id).is_none_or(|e| e.destroyed)
    }

    pub fn set_local_position(&mut self, id: EntityId, position: Vector2) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.local_position = position;
        }
    }

    pub fn set_local_rotation(&mut self, id: EntityId, degrees: f32) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.local_rotation = degrees;
        }
    }

    pub fn set_local_scale(&mut self, id: EntityId, scale: Vector2) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.local_scale = scale;
        }
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// Make `child` a child of `parent`, detaching it from any previous parent.
    ///
    /// Returns false when either entity is missing or destroyed, when they are
    /// the same entity, or when the link already exists.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        if parent == child || self.is_entity_destroyed(parent) {
            return false;
        }
        let previous = match self.entities.get(child) {
            Some(entity) if !entity.destroyed => entity.parent,
            _ => return false,
        };
        if previous == Some(parent) {
            return false;
        }
        if let Some(old) = previous {
            self.remove_child(old, child);
        }
        if let Some(p) = self.entities.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.entities.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Unlink `child` from `parent`. The child keeps its local transform and
    /// becomes a root.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        let Some(p) = self.entities.get_mut(parent) else {
            return false;
        };
        let Some(index) = p.children.iter().position(|&c| c == child) else {
            return false;
        };
        p.children.remove(index);
        if let Some(c) = self.entities.get_mut(child) {
            c.parent = None;
        }
        true
    }

    // ------------------------------------------------------------------
    // World transforms
    // ------------------------------------------------------------------

    /// World position of `id`.
    pub fn position(&self, id: EntityId) -> Option<Vector2> {
        let entity = self.entities.get(id)?;
        let mut position = entity.local_position;
        let mut parent = entity.parent;
        while let Some(pid) = parent {
            let Some(p) = self.entities.get(pid) else {
                break;
            };
            position.multiply(p.local_scale);
            position = position.rotated(p.local_rotation) + p.local_position;
            parent = p.parent;
        }
        Some(position)
    }

    /// World rotation of `id` in degrees: the sum of local rotations.
    pub fn rotation(&self, id: EntityId) -> Option<f32> {
        let entity = self.entities.get(id)?;
        let mut rotation = entity.local_rotation;
        let mut parent = entity.parent;
        while let Some(p) = parent.and_then(|pid| self.entities.get(pid)) {
            rotation += p.local_rotation;
            parent = p.parent;
        }
        Some(rotation)
    }

    /// World scale of `id`: the per-axis product of local scales.
    pub fn scale(&self, id: EntityId) -> Option<Vector2> {
        let entity = self.entities.get(id)?;
        let mut scale = entity.local_scale;
        let mut parent = entity.parent;
        while let Some(p) = parent.and_then(|pid| self.entities.get(pid)) {
            scale.multiply(p.local_scale);
            parent = p.parent;
        }
        Some(scale)
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Append `component` to `entity`'s component list.
    ///
    /// Returns false (and drops the component) if the entity is missing or
    /// already destroyed.
    pub fn attach(&mut self, entity: EntityId, component: impl Component) -> bool {
        self.attach_boxed(entity, Box::new(component))
    }

    pub fn attach_boxed(&mut self, entity: EntityId, mut component: Box<dyn Component>) -> bool {
        let address = EntityAddress {
            scene: self.id,
            entity,
        };
        match self.entities.get_mut(entity) {
            Some(e) if !e.destroyed => {
                component.on_attach(address);
                e.components.push(component);
                true
            }
            _ => {
                warn!("Cannot attach component to missing entity {:?}", entity);
                false
            }
        }
    }

    /// First component of type `T` on `entity`.
    ///
    /// While an entity's components are updating they are detached from the
    /// entity, so this returns `None` for siblings looked up from inside
    /// [`Component::update`].
    pub fn component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.entities
            .get(entity)?
            .components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.entities
            .get_mut(entity)?
            .components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Destroy `id`, its children (recursively) and its components.
    ///
    /// Each object is destroyed at most once. The entity stays in the table,
    /// marked destroyed, until the next update pass prunes it.
    pub fn destroy_entity(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        if entity.destroyed {
            return;
        }
        entity.destroyed = true;
        let children = std::mem::take(&mut entity.children);
        let components = std::mem::take(&mut entity.components);

        for child in children {
            if let Some(c) = self.entities.get_mut(child) {
                c.parent = None;
            }
            self.destroy_entity(child);
        }
        for mut component in components {
            if !component.is_destroyed() {
                component.destroy();
            }
        }
    }

    /// Run one update pass over every entity's components.
    pub fn update(&mut self, delta: f32) {
        let mut i = 0;
        while i < self.order.len() {
            let id = self.order[i];
            if !self.is_entity_destroyed(id) {
                self.update_entity(id, delta);
            }
            if self.is_entity_destroyed(id) {
                if self.order.get(i) == Some(&id) {
                    self.order.remove(i);
                }
                self.prune(id);
            } else {
                i += 1;
            }
        }
        self.sweep();
    }

    fn update_entity(&mut self, id: EntityId, delta: f32) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        let mut components = std::mem::take(&mut entity.components);

        let mut i = 0;
        while i < components.len() {
            if !components[i].is_destroyed() {
                let mut ctx = UpdateContext {
                    entity: id,
                    scene: self,
                };
                components[i].update(delta, &mut ctx);
            }
            if self.is_entity_destroyed(id) {
                // The entity went away while its components were detached;
                // finish the cascade on the ones held here.
                for component in components.iter_mut().filter(|c| !c.is_destroyed()) {
                    component.destroy();
                }
                return;
            }
            if components[i].is_destroyed() {
                components.remove(i);
            } else {
                i += 1;
            }
        }

        if let Some(entity) = self.entities.get_mut(id) {
            // Keep anything attached while the list was detached.
            components.append(&mut entity.components);
            entity.components = components;
        }
    }

    /// Remove a destroyed entity from the table and from its parent's list.
    fn prune(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.remove(id) {
            if let Some(parent) = entity.parent.and_then(|pid| self.entities.get_mut(pid)) {
                parent.children.retain(|c| *c != id);
            }
        }
    }

    fn sweep(&mut self) {
        let dead: Vec<EntityId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| self.is_entity_destroyed(id))
            .collect();
        if dead.is_empty() {
            return;
        }
        self.order.retain(|id| !dead.contains(id));
        for id in dead {
            self.prune(id);
        }
    }

    /// Render every live component of every live entity, in order.
    pub fn render(&self, surface: &mut dyn DrawContext) {
        for &id in &self.order {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if entity.destroyed {
                continue;
            }
            let ctx = RenderContext {
                entity: id,
                scene: self,
            };
            for component in entity.components.iter().filter(|c| !c.is_destroyed()) {
                component.render(&ctx, surface);
            }
        }
    }

    /// Destroy every entity and mark the scene destroyed.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        while let Some(id) = self.order.pop() {
            self.destroy_entity(id);
        }
        self.entities.clear();
        debug!("{} destroyed", self.id);
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("entities", &self.order.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
