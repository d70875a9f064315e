//! Breakout boot sequence.
//!
//! - [`bootscene`] – loads the loading-screen textures, then hands over
//! - [`loadingscene`] – splash background plus a "Loading..." caption

pub mod bootscene;
pub mod loadingscene;

pub use bootscene::BootScene;
pub use loadingscene::LoadingScene;

use std::sync::Arc;

use crate::assets::AssetFetcher;
use crate::engine::Engine;
use crate::resources::gameconfig::GameConfig;

/// The Breakout game: an engine that starts on the [`BootScene`].
pub struct Breakout;

impl Breakout {
    pub fn new(config: &GameConfig, fetcher: Arc<dyn AssetFetcher>) -> Engine {
        let mut engine = Engine::from_config(config, fetcher);
        let boot = BootScene::new(engine.context());
        engine.add_scene(boot);
        engine
    }
}
