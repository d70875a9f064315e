//! First scene of the game.
//!
//! Requests the `boot` manifest group (the textures the loading screen
//! needs) and, once every request has finished, replaces itself with the
//! [`LoadingScene`].

use log::info;

use crate::assets::AssetLoader;
use crate::engine::EngineContext;
use crate::game::loadingscene::LoadingScene;
use crate::scene::{GameScene, Scene, SceneCommands};

pub struct BootScene {
    scene: Scene,
    loader: AssetLoader,
}

impl BootScene {
    pub fn new(context: &EngineContext) -> Self {
        let scene = Scene::new(context);
        let mut loader = context.new_loader();
        loader.load_manifest(context.manifest().group("boot"));
        info!(
            "Boot scene requested {} assets ({} in flight, {} queued)",
            loader.total_assets(),
            loader.in_flight(),
            loader.queued()
        );
        Self { scene, loader }
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }
}

impl GameScene for BootScene {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn name(&self) -> &str {
        "boot"
    }

    fn update(&mut self, delta: f32, commands: &mut SceneCommands<'_>) {
        self.scene.update(delta);
        self.loader.poll(delta);

        if self.loader.is_complete() {
            info!(
                "Boot assets done ({}/{}), switching to loading screen",
                self.loader.assets_loaded(),
                self.loader.total_assets()
            );
            commands.remove(self.scene.id());
            let loading = LoadingScene::new(commands.context());
            commands.add(loading);
        }
    }
}
