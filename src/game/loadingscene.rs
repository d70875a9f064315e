//! Loading screen: the splash background with a "Loading..." caption.
//!
//! Owns a loader for the `loading` manifest group, the assets the game
//! proper will need.

use log::{error, info};

use crate::assets::AssetLoader;
use crate::components::{Image, TextField, TextFieldConfig};
use crate::engine::EngineContext;
use crate::render::TextAlign;
use crate::scene::{EntityId, GameScene, Scene, SceneCommands};

pub struct LoadingScene {
    scene: Scene,
    loader: AssetLoader,
    background: EntityId,
    caption: EntityId,
}

impl LoadingScene {
    pub fn new(context: &EngineContext) -> Self {
        let mut scene = Scene::new(context);
        let mut loader = context.new_loader();
        loader.load_manifest(context.manifest().group("loading"));

        let background = scene.spawn(0.0, 0.0);
        scene.attach(background, Image::new(context, "splashBackground"));

        let config = TextFieldConfig::new("Arial", "12px", "#FFFFFF", TextAlign::Left)
            .unwrap_or_else(|e| {
                error!("Bad caption style: {e}");
                TextFieldConfig::default()
            });
        let caption = scene.spawn(25.0, 25.0);
        scene.attach(caption, TextField::new("Loading...", config));

        info!(
            "Loading scene ready, {} game assets requested",
            loader.total_assets()
        );
        Self {
            scene,
            loader,
            background,
            caption,
        }
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn background(&self) -> EntityId {
        self.background
    }

    pub fn caption(&self) -> EntityId {
        self.caption
    }
}

impl GameScene for LoadingScene {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn name(&self) -> &str {
        "loading"
    }

    fn update(&mut self, delta: f32, _commands: &mut SceneCommands<'_>) {
        self.scene.update(delta);
        self.loader.poll(delta);
    }
}
