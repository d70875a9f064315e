//! Scene graph: entities, scenes and the scene stack.
//!
//! - [`entity`] – transform node with parent/child links and components
//! - [`graph`] – [`Scene`], the entity table plus ordered update/render passes
//! - [`manager`] – [`SceneManager`] and the [`GameScene`] trait for game scenes
//!
//! All three share one lifecycle: `destroy()` marks the object destroyed at
//! once (cascading to children and components), and the owning list drops it
//! during its next update pass. Render passes only skip destroyed entries.

pub mod entity;
pub mod graph;
pub mod manager;

pub use entity::{Entity, EntityId};
pub use graph::Scene;
pub use manager::{GameScene, SceneCommands, SceneManager};

use std::fmt;

/// Identifier of a scene, unique for the lifetime of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u64);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

/// Fully qualified entity reference: which scene, which entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityAddress {
    pub scene: SceneId,
    pub entity: EntityId,
}
