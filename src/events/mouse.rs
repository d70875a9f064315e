//! Mouse event vocabulary.
//!
//! Pointer input is published through a [`MouseDispatcher`] owned by the
//! [`Mouse`](crate::resources::input::Mouse). Listeners receive the pointer
//! position (canvas pixels) and mutable access to the
//! [`SceneManager`], so components can resolve their owning entity's world
//! transform at the moment the event arrives.

use crate::events::dispatcher::{Callback, EventDispatcher};
use crate::math::Vector2;
use crate::scene::{EntityAddress, SceneManager};

/// Event names published by the mouse.
pub struct MouseEvent;

impl MouseEvent {
    /// A button went down.
    pub const MOUSE_DOWN: &'static str = "mouseDown";
    /// The pointer moved.
    pub const MOUSE_MOVE: &'static str = "mouseMove";
    /// A button was released.
    pub const MOUSE_UP: &'static str = "mouseUp";
}

/// Receiver bound to a mouse listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerContext {
    /// Not tied to any entity (game-level listeners).
    Global,
    /// Listener owned by a component on the given entity.
    Entity(EntityAddress),
}

/// Mouse listener callback.
pub type MouseCallback = Callback<Vector2, ListenerContext, SceneManager>;

/// Dispatcher type shared by the input manager and interested components.
pub type MouseDispatcher = EventDispatcher<Vector2, ListenerContext, SceneManager>;
