//! Breakout engine library.
//!
//! A small 2D scene-graph engine (entities with components, scenes, a
//! throttled asset loader, pointer events, a canvas-style drawing
//! abstraction) plus the Breakout boot sequence built on it. Exposed as a
//! library for the `breakout` binary and for integration tests.

pub mod assets;
pub mod components;
pub mod engine;
pub mod events;
pub mod game;
pub mod math;
pub mod render;
pub mod resources;
pub mod scene;
