//! Small math value types shared by the scene graph, input and rendering.
pub mod vector2;

pub use vector2::Vector2;
