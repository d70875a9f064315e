//! Long-lived engine resources.
//!
//! Overview
//! - `gameconfig` – INI-backed settings (canvas size, frame rate, asset loader)
//! - `input` – latched pointer state and its event dispatcher
//! - `texturestore` – loaded textures keyed by string IDs
//! - `timemanager` – frame pacing and per-frame delta
pub mod gameconfig;
pub mod input;
pub mod texturestore;
pub mod timemanager;
