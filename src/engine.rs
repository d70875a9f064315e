//! Engine loop and shared services.
//!
//! [`Engine`] owns the canvas renderer, the scene stack, frame pacing and
//! pointer input. One frame is "update every scene, then clear the canvas
//! and render every scene", and [`Engine::frame`] runs it only when the
//! [`TimeManager`] says the target interval has elapsed.
//!
//! [`EngineContext`] is the bundle of services handed to every scene at
//! construction: the texture store, the mouse dispatcher, the asset fetcher
//! and loader settings, the asset manifest and the canvas size. Cloning it is
//! cheap; all clones share the same underlying services.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use log::{info, warn};

use crate::assets::{AssetFetcher, AssetLoader, AssetManifest, LoaderSettings};
use crate::events::mouse::MouseDispatcher;
use crate::math::Vector2;
use crate::render::{CanvasRenderer, DrawContext};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputManager;
use crate::resources::texturestore::TextureStore;
use crate::resources::timemanager::TimeManager;
use crate::scene::{GameScene, SceneId, SceneManager};

/// Services shared by every scene of one engine.
#[derive(Clone)]
pub struct EngineContext {
    textures: TextureStore,
    mouse_events: Rc<MouseDispatcher>,
    fetcher: Arc<dyn AssetFetcher>,
    loader_settings: LoaderSettings,
    manifest: Rc<AssetManifest>,
    width: u32,
    height: u32,
    next_scene: Rc<Cell<u64>>,
}

impl EngineContext {
    pub fn new(width: u32, height: u32, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            textures: TextureStore::new(),
            mouse_events: Rc::new(MouseDispatcher::new()),
            fetcher,
            loader_settings: LoaderSettings::default(),
            manifest: Rc::new(AssetManifest::builtin()),
            width,
            height,
            next_scene: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_loader_settings(mut self, settings: LoaderSettings) -> Self {
        self.loader_settings = settings;
        self
    }

    pub fn with_manifest(mut self, manifest: AssetManifest) -> Self {
        self.manifest = Rc::new(manifest);
        self
    }

    /// Allocate a fresh scene id.
    pub fn next_scene_id(&self) -> SceneId {
        let id = self.next_scene.get() + 1;
        self.next_scene.set(id);
        SceneId(id)
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn mouse_events(&self) -> Rc<MouseDispatcher> {
        Rc::clone(&self.mouse_events)
    }

    pub fn fetcher(&self) -> Arc<dyn AssetFetcher> {
        Arc::clone(&self.fetcher)
    }

    pub fn loader_settings(&self) -> LoaderSettings {
        self.loader_settings
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// An asset loader publishing into this context's texture store.
    pub fn new_loader(&self) -> AssetLoader {
        AssetLoader::new(self.textures.clone(), self.fetcher(), self.loader_settings)
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("textures", &self.textures.len())
            .field("loader_settings", &self.loader_settings)
            .finish()
    }
}

/// Top-level engine: renderer, scenes, time and input.
pub struct Engine {
    renderer: CanvasRenderer,
    scenes: SceneManager,
    time: TimeManager,
    input: InputManager,
    context: EngineContext,
}

impl Engine {
    pub fn new(context: EngineContext, target_fps: u32) -> Self {
        info!(
            "Engine {}x{} at {} fps",
            context.width(),
            context.height(),
            target_fps
        );
        Self {
            renderer: CanvasRenderer::new(context.width(), context.height()),
            scenes: SceneManager::new(context.clone()),
            time: TimeManager::new(target_fps),
            input: InputManager::new(context.mouse_events()),
            context,
        }
    }

    /// Build an engine from configuration, reading the asset manifest named
    /// there. A missing or invalid manifest falls back to the built-in one.
    pub fn from_config(config: &GameConfig, fetcher: Arc<dyn AssetFetcher>) -> Self {
        let manifest_path = config.manifest_path();
        let mut manifest = match AssetManifest::load_from_file(&manifest_path) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("{e}; using built-in asset manifest");
                AssetManifest::builtin()
            }
        };
        if !manifest.has_group("boot") {
            warn!("Manifest {:?} has no boot group; using built-in one", manifest_path);
            manifest.insert_group("boot", AssetManifest::builtin().group("boot").to_vec());
        }

        let context = EngineContext::new(config.window_width, config.window_height, fetcher)
            .with_loader_settings(config.loader_settings())
            .with_manifest(manifest);
        Self::new(context, config.target_fps)
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    pub fn time(&self) -> &TimeManager {
        &self.time
    }

    pub fn renderer(&self) -> &CanvasRenderer {
        &self.renderer
    }

    /// Append a scene to the stack.
    pub fn add_scene(&mut self, scene: impl GameScene + 'static) -> bool {
        self.scenes.add(scene)
    }

    pub fn update(&mut self, delta: f32) {
        self.scenes.update(delta);
    }

    pub fn render(&mut self, surface: &mut dyn DrawContext) {
        self.renderer.clear(surface);
        self.scenes.render(surface);
    }

    /// Update then render one frame with a known delta.
    pub fn tick(&mut self, delta: f32, surface: &mut dyn DrawContext) {
        self.update(delta);
        self.render(surface);
    }

    /// Offer a frame at `timestamp` seconds. Returns whether it ran.
    pub fn frame(&mut self, timestamp: f64, surface: &mut dyn DrawContext) -> bool {
        match self.advance(timestamp) {
            Some(_) => {
                self.render(surface);
                true
            }
            None => false,
        }
    }

    /// Update only, when the frame at `timestamp` is due. Returns its delta.
    ///
    /// For hosts that must present every display refresh and so render
    /// unconditionally.
    pub fn advance(&mut self, timestamp: f64) -> Option<f32> {
        let delta = self.time.step(timestamp)?;
        self.update(delta);
        Some(delta)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.input
            .mouse
            .on_mouse_down(Vector2::new(x, y), &mut self.scenes);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input
            .mouse
            .on_mouse_move(Vector2::new(x, y), &mut self.scenes);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.input
            .mouse
            .on_mouse_up(Vector2::new(x, y), &mut self.scenes);
    }
}
