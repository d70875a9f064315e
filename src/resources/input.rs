//! Pointer input.
//!
//! The platform layer (raylib window loop, a test, a replay) feeds raw
//! pointer events into [`Mouse`]. Each handler latches the new state first
//! and then dispatches exactly one event carrying a copy of the position, so
//! listeners that keep the payload never observe later mutations.
use std::rc::Rc;

use log::trace;

use crate::events::mouse::{MouseDispatcher, MouseEvent};
use crate::math::Vector2;
use crate::scene::SceneManager;

/// Latched pointer state plus the dispatcher that publishes its changes.
#[derive(Debug, Default)]
pub struct Mouse {
    /// Whether a button is currently held.
    pub is_down: bool,
    /// Last reported pointer position in canvas pixels.
    pub position: Vector2,
    events: Rc<MouseDispatcher>,
}

impl Mouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mouse that publishes through an existing dispatcher.
    pub fn with_dispatcher(events: Rc<MouseDispatcher>) -> Self {
        Self {
            is_down: false,
            position: Vector2::ZERO,
            events,
        }
    }

    /// Shared handle to the dispatcher, for subscribing.
    pub fn events(&self) -> &Rc<MouseDispatcher> {
        &self.events
    }

    pub fn on_mouse_down(&mut self, position: Vector2, scenes: &mut SceneManager) {
        self.is_down = true;
        self.position = position;
        self.publish(MouseEvent::MOUSE_DOWN, scenes);
    }

    pub fn on_mouse_move(&mut self, position: Vector2, scenes: &mut SceneManager) {
        self.position = position;
        self.publish(MouseEvent::MOUSE_MOVE, scenes);
    }

    pub fn on_mouse_up(&mut self, position: Vector2, scenes: &mut SceneManager) {
        self.is_down = false;
        self.position = position;
        self.publish(MouseEvent::MOUSE_UP, scenes);
    }

    fn publish(&self, event: &str, scenes: &mut SceneManager) {
        let payload = self.position;
        let delivered = self.events.dispatch_event(event, &payload, scenes);
        trace!(
            "{} at ({}, {}) -> {} listeners",
            event, payload.x, payload.y, delivered
        );
    }
}

/// Input devices owned by the engine.
#[derive(Debug, Default)]
pub struct InputManager {
    pub mouse: Mouse,
}

impl InputManager {
    pub fn new(events: Rc<MouseDispatcher>) -> Self {
        Self {
            mouse: Mouse::with_dispatcher(events),
        }
    }

    /// The dispatcher pointer events are published on.
    pub fn mouse_events(&self) -> Rc<MouseDispatcher> {
        Rc::clone(self.mouse.events())
    }
}
