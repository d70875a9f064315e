//! Texture store resource.
//!
//! The process-wide asset table: decoded textures keyed by string IDs. The
//! [`AssetLoader`](crate::assets::loader::AssetLoader) writes each key once;
//! [`Image`](crate::components::image::Image) components read them at
//! construction and render time.
//!
//! [`TextureStore`] is a cheap-to-clone handle onto one shared map. The engine
//! runs on a single thread, so the map lives behind `Rc<RefCell<..>>`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use image::RgbaImage;
use rustc_hash::FxHashMap;

/// A decoded RGBA8 texture.
pub struct Texture {
    key: String,
    pixels: RgbaImage,
}

impl Texture {
    /// Wrap decoded pixels under `key`.
    pub fn new(key: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            key: key.into(),
            pixels,
        }
    }

    /// Key this texture was published under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("key", &self.key)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Shared map of texture keys to loaded textures.
#[derive(Clone, Default)]
pub struct TextureStore {
    map: Rc<RefCell<FxHashMap<String, Rc<Texture>>>>,
}

impl TextureStore {
    /// Create an empty texture store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `texture` under its own key, replacing any previous entry.
    pub fn insert(&self, texture: Texture) {
        let key = texture.key().to_string();
        self.map.borrow_mut().insert(key, Rc::new(texture));
    }

    /// Get a texture by its key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<Rc<Texture>> {
        self.map.borrow().get(key.as_ref()).cloned()
    }

    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.map.borrow().contains_key(key.as_ref())
    }

    /// Get the number of loaded textures.
    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }

    /// Sorted list of loaded keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.map.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Remove all loaded textures.
    pub fn clear(&self) {
        self.map.borrow_mut().clear();
    }
}

impl fmt::Debug for TextureStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureStore")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_same_table() {
        let store = TextureStore::new();
        let other = store.clone();
        store.insert(Texture::new("brick", RgbaImage::new(8, 4)));
        let tex = other.get("brick").expect("texture visible through clone");
        assert_eq!(tex.width(), 8);
        assert_eq!(tex.height(), 4);
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = TextureStore::new();
        assert!(store.get("nope").is_none());
        assert!(!store.contains("nope"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_sorted_and_clear() {
        let store = TextureStore::new();
        store.insert(Texture::new("b", RgbaImage::new(1, 1)));
        store.insert(Texture::new("a", RgbaImage::new(1, 1)));
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
        store.clear();
        assert_eq!(store.len(), 0);
    }
}
