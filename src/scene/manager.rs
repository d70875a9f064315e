//! Scene stack.
//!
//! [`SceneManager`] owns the active scenes in insertion order, which is also
//! their update and render order. Game scenes implement [`GameScene`] by
//! wrapping a [`Scene`] and optionally overriding `update` to add their own
//! per-frame logic (polling a loader, switching scenes, ...).
//!
//! A scene cannot reach the manager that is iterating it; instead its
//! `update` receives [`SceneCommands`]. Removals are applied as soon as that
//! scene's update returns. Added scenes are appended to the list at the same
//! moment, so they are visited later in the same pass.

use log::{debug, info, warn};

use crate::engine::EngineContext;
use crate::render::DrawContext;
use crate::scene::{Scene, SceneId};

/// A scene as seen by the [`SceneManager`].
pub trait GameScene {
    fn scene(&self) -> &Scene;
    fn scene_mut(&mut self) -> &mut Scene;

    /// Short label used in logs.
    fn name(&self) -> &str {
        "scene"
    }

    fn update(&mut self, delta: f32, _commands: &mut SceneCommands<'_>) {
        self.scene_mut().update(delta);
    }

    fn render(&self, surface: &mut dyn DrawContext) {
        self.scene().render(surface);
    }

    fn destroy(&mut self) {
        self.scene_mut().destroy();
    }

    fn id(&self) -> SceneId {
        self.scene().id()
    }

    fn is_destroyed(&self) -> bool {
        self.scene().is_destroyed()
    }
}

impl GameScene for Scene {
    fn scene(&self) -> &Scene {
        self
    }

    fn scene_mut(&mut self) -> &mut Scene {
        self
    }
}

/// Scene-stack changes requested from inside a scene update.
pub struct SceneCommands<'a> {
    context: &'a EngineContext,
    added: Vec<Box<dyn GameScene>>,
    removed: Vec<SceneId>,
}

impl<'a> SceneCommands<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self {
            context,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Engine services, for constructing new scenes.
    pub fn context(&self) -> &EngineContext {
        self.context
    }

    /// Queue `scene` to be appended to the stack.
    pub fn add(&mut self, scene: impl GameScene + 'static) {
        self.added.push(Box::new(scene));
    }

    /// Queue the scene with `id` for destruction.
    pub fn remove(&mut self, id: SceneId) {
        self.removed.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Owns the scene list and drives per-frame update/render across it.
pub struct SceneManager {
    scenes: Vec<Box<dyn GameScene>>,
    context: EngineContext,
}

impl SceneManager {
    pub fn new(context: EngineContext) -> Self {
        Self {
            scenes: Vec::new(),
            context,
        }
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Append `scene` unless a scene with the same id is already present.
    pub fn add(&mut self, scene: impl GameScene + 'static) -> bool {
        self.add_boxed(Box::new(scene))
    }

    pub fn add_boxed(&mut self, scene: Box<dyn GameScene>) -> bool {
        let id = scene.id();
        if self.scenes.iter().any(|s| s.id() == id) {
            warn!("{} is already in the scene list", id);
            return false;
        }
        info!("Adding {} ({})", scene.name(), id);
        self.scenes.push(scene);
        true
    }

    /// Destroy the scene with `id`. It leaves the list on the next update pass.
    pub fn remove(&mut self, id: SceneId) -> bool {
        match self.scenes.iter_mut().find(|s| s.id() == id) {
            Some(scene) => {
                info!("Removing {} ({})", scene.name(), id);
                scene.destroy();
                true
            }
            None => false,
        }
    }

    /// Number of scenes in the list, including destroyed ones not yet pruned.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.scenes.iter().any(|s| s.id() == id)
    }

    /// Scenes in update/render order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn GameScene> {
        self.scenes.iter().map(|s| &**s)
    }

    pub fn get(&self, index: usize) -> Option<&dyn GameScene> {
        self.scenes.get(index).map(|s| &**s)
    }

    /// The entity graph of the scene with `id`.
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes
            .iter()
            .find(|s| s.id() == id)
            .map(|s| s.scene())
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes
            .iter_mut()
            .find(|s| s.id() == id)
            .map(|s| s.scene_mut())
    }

    /// Run one update pass over every live scene, pruning destroyed ones.
    pub fn update(&mut self, delta: f32) {
        let mut i = 0;
        while i < self.scenes.len() {
            if !self.scenes[i].is_destroyed() {
                let mut commands = SceneCommands::new(&self.context);
                self.scenes[i].update(delta, &mut commands);
                let SceneCommands { added, removed, .. } = commands;
                for id in removed {
                    self.remove(id);
                }
                for scene in added {
                    self.add_boxed(scene);
                }
            }
            if self.scenes[i].is_destroyed() {
                let scene = self.scenes.remove(i);
                debug!("Pruned {} ({})", scene.name(), scene.id());
            } else {
                i += 1;
            }
        }
        self.scenes.retain(|s| !s.is_destroyed());
    }

    /// Render every live scene, in order.
    pub fn render(&self, surface: &mut dyn DrawContext) {
        for scene in self.scenes.iter().filter(|s| !s.is_destroyed()) {
            scene.render(surface);
        }
    }
}
