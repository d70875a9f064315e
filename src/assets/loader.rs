//! Throttled asset loader.
//!
//! [`AssetLoader::load`] counts the request and either starts it right away
//! (fewer than `max_concurrent_requests` in flight) or appends it to a FIFO
//! queue. A started request fetches and decodes on a worker thread and sends
//! the outcome back over a `crossbeam_channel`. Nothing touches loader or
//! texture-store state off the game thread: outcomes are drained by
//! [`AssetLoader::poll`], which the owning scene calls every frame.
//!
//! Completion of a request, success or failure:
//! 1. on success the texture is published into the [`TextureStore`]; on
//!    failure the error is logged and the key stays empty;
//! 2. after `simulated_latency` seconds of game time the in-flight count
//!    drops, `assets_loaded` rises and, if there is room, the next queued
//!    request starts.
//!
//! Callers poll [`AssetLoader::is_complete`] (`assets_loaded == total_assets`);
//! there is no completion event.

use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, info};

use crate::assets::fetch::AssetFetcher;
use crate::assets::manifest::ManifestEntry;
use crate::assets::{AssetError, AssetType};
use crate::resources::texturestore::{Texture, TextureStore};

/// Default number of requests allowed in flight.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 1;
/// Default delay between a request finishing and its slot being released.
pub const DEFAULT_SIMULATED_LATENCY: f32 = 0.075;

/// Throttling knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoaderSettings {
    /// Upper bound on requests in flight. Zero is treated as one.
    pub max_concurrent_requests: usize,
    /// Seconds of game time between a request finishing and the queue
    /// advancing. Demonstration only; zero disables it.
    pub simulated_latency: f32,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
        }
    }
}

#[derive(Debug, Clone)]
struct LoadTask {
    key: String,
    path: String,
    asset_type: AssetType,
}

/// Result of one worker-thread fetch.
struct FetchOutcome {
    key: String,
    result: Result<Texture, AssetError>,
}

/// Queues and throttles asset fetches, populating a [`TextureStore`].
pub struct AssetLoader {
    textures: TextureStore,
    fetcher: Arc<dyn AssetFetcher>,
    settings: LoaderSettings,
    assets_loaded: usize,
    total_assets: usize,
    current_loads: usize,
    queue: VecDeque<LoadTask>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    /// Game-time deadlines of finished requests waiting out the latency.
    releases: VecDeque<f64>,
    /// Game time since the loader last went idle.
    clock: f64,
}

impl AssetLoader {
    pub fn new(
        textures: TextureStore,
        fetcher: Arc<dyn AssetFetcher>,
        settings: LoaderSettings,
    ) -> Self {
        let (tx, rx) = unbounded::<FetchOutcome>();
        Self {
            textures,
            fetcher,
            settings,
            assets_loaded: 0,
            total_assets: 0,
            current_loads: 0,
            queue: VecDeque::new(),
            tx,
            rx,
            releases: VecDeque::new(),
            clock: 0.0,
        }
    }

    pub fn settings(&self) -> LoaderSettings {
        self.settings
    }

    fn max_concurrent(&self) -> usize {
        self.settings.max_concurrent_requests.max(1)
    }

    /// Request `path` to be loaded as `asset_type` and published under `key`.
    pub fn load(&mut self, key: impl Into<String>, path: impl Into<String>, asset_type: AssetType) {
        self.total_assets += 1;
        let task = LoadTask {
            key: key.into(),
            path: path.into(),
            asset_type,
        };
        if self.current_loads < self.max_concurrent() {
            self.current_loads += 1;
            self.start(task);
        } else {
            debug!("Queueing {} ({})", task.key, task.path);
            self.queue.push_back(task);
        }
    }

    /// Like [`Self::load`], with the type given by name.
    ///
    /// An unknown type is logged and the request dropped. It still counts as
    /// a requested and finished asset, so [`Self::is_complete`] stays
    /// reachable.
    pub fn load_named(&mut self, key: impl Into<String>, path: impl Into<String>, asset_type: &str) {
        let key = key.into();
        match asset_type.parse::<AssetType>() {
            Ok(t) => self.load(key, path, t),
            Err(e) => {
                error!("Dropping asset request {key}: {e}");
                self.total_assets += 1;
                self.assets_loaded += 1;
            }
        }
    }

    /// Request every entry of a manifest group, in order.
    pub fn load_manifest(&mut self, entries: &[ManifestEntry]) {
        for entry in entries {
            self.load_named(entry.key.clone(), entry.path.clone(), &entry.asset_type);
        }
    }

    fn start(&mut self, task: LoadTask) {
        debug!("Fetching {} ({}, {})", task.key, task.path, task.asset_type);
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let key = task.key.clone();
        let path = task.path.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("asset-fetch-{}", task.key))
            .spawn(move || {
                let result = match task.asset_type {
                    AssetType::Texture => fetch_texture(fetcher.as_ref(), &task.key, &task.path),
                };
                // The loader may be gone by now; nothing left to report to.
                let _ = tx.send(FetchOutcome {
                    key: task.key,
                    result,
                });
            });

        if let Err(e) = spawned {
            let _ = self.tx.send(FetchOutcome {
                key,
                result: Err(AssetError::Spawn {
                    path,
                    reason: e.to_string(),
                }),
            });
        }
    }

    /// Advance the loader by `delta` seconds of game time.
    ///
    /// Publishes finished fetches and releases slots whose latency has
    /// elapsed, starting queued requests as room frees up.
    pub fn poll(&mut self, delta: f32) {
        self.clock += f64::from(delta.max(0.0));

        let outcomes: Vec<FetchOutcome> = self.rx.try_iter().collect();
        for outcome in outcomes {
            match outcome.result {
                Ok(texture) => {
                    info!(
                        "Loaded texture {} ({}x{})",
                        outcome.key,
                        texture.width(),
                        texture.height()
                    );
                    self.textures.insert(texture);
                }
                Err(e) => error!("Failed to load {}: {}", outcome.key, e),
            }
            self.releases
                .push_back(self.clock + f64::from(self.settings.simulated_latency.max(0.0)));
        }

        while self.releases.front().is_some_and(|&due| due <= self.clock) {
            self.releases.pop_front();
            self.on_asset_loaded();
        }
        if self.current_loads == 0 && self.releases.is_empty() {
            self.clock = 0.0;
        }
    }

    fn on_asset_loaded(&mut self) {
        self.current_loads = self.current_loads.saturating_sub(1);
        self.assets_loaded += 1;
        if self.current_loads < self.max_concurrent() {
            if let Some(task) = self.queue.pop_front() {
                self.current_loads += 1;
                self.start(task);
            }
        }
    }

    /// Requests finished (successfully or not).
    pub fn assets_loaded(&self) -> usize {
        self.assets_loaded
    }

    /// Requests made so far.
    pub fn total_assets(&self) -> usize {
        self.total_assets
    }

    /// Requests currently started but not yet released.
    pub fn in_flight(&self) -> usize {
        self.current_loads
    }

    /// Requests waiting for a free slot.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// True once every request made so far has finished.
    pub fn is_complete(&self) -> bool {
        self.assets_loaded == self.total_assets
    }

    /// Fraction of requests finished, 1.0 when nothing was requested.
    pub fn progress(&self) -> f32 {
        if self.total_assets == 0 {
            1.0
        } else {
            self.assets_loaded as f32 / self.total_assets as f32
        }
    }
}

/// Fetch and decode one texture. Runs on a worker thread.
fn fetch_texture(fetcher: &dyn AssetFetcher, key: &str, path: &str) -> Result<Texture, AssetError> {
    let bytes = fetcher.fetch(path)?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| AssetError::Decode {
        path: path.to_string(),
        source: e,
    })?;
    Ok(Texture::new(key, decoded.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl AssetFetcher for Unreachable {
        fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
            Err(AssetError::NotFound {
                path: path.to_string(),
            })
        }
    }

    fn loader(max: usize) -> AssetLoader {
        AssetLoader::new(
            TextureStore::new(),
            Arc::new(Unreachable),
            LoaderSettings {
                max_concurrent_requests: max,
                simulated_latency: 0.0,
            },
        )
    }

    #[test]
    fn test_idle_polling_does_not_advance_clock() {
        let mut l = loader(1);
        for _ in 0..1000 {
            l.poll(3600.0);
        }
        assert_eq!(l.clock, 0.0);
        assert!(l.is_complete());
    }

    #[test]
    fn test_nothing_requested_is_complete() {
        let l = loader(1);
        assert!(l.is_complete());
        assert_eq!(l.progress(), 1.0);
    }

    #[test]
    fn test_requests_beyond_limit_are_queued() {
        let mut l = loader(2);
        l.load("a", "a.png", AssetType::Texture);
        l.load("b", "b.png", AssetType::Texture);
        l.load("c", "c.png", AssetType::Texture);
        assert_eq!(l.total_assets(), 3);
        assert_eq!(l.in_flight(), 2);
        assert_eq!(l.queued(), 1);
        assert!(!l.is_complete());
    }

    #[test]
    fn test_unknown_type_consumes_slot_without_fetching() {
        let mut l = loader(1);
        l.load_named("song", "song.ogg", "music");
        assert_eq!(l.total_assets(), 1);
        assert_eq!(l.assets_loaded(), 1);
        assert_eq!(l.in_flight(), 0);
        assert!(l.is_complete());
    }

    #[test]
    fn test_zero_limit_behaves_as_one() {
        let mut l = loader(0);
        l.load("a", "a.png", AssetType::Texture);
        l.load("b", "b.png", AssetType::Texture);
        assert_eq!(l.in_flight(), 1);
        assert_eq!(l.queued(), 1);
    }
}
