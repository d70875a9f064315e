//! Clickable region.
//!
//! A [`Button`] subscribes to `mouseDown` when it is attached to an entity
//! and unsubscribes when it is destroyed. On each press it resolves the
//! owner's world position and scale, builds an axis-aligned box of
//! `width x height` scaled and anchored by `origin`, and fires its click
//! callback when the pointer lies inside (edges included).
//!
//! Rotation is not taken into account: a rotated button keeps an upright
//! clickable box even though an [`Image`](super::Image) on the same entity is
//! drawn rotated.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::components::{Component, ComponentCore};
use crate::engine::EngineContext;
use crate::events::mouse::{ListenerContext, MouseCallback, MouseDispatcher, MouseEvent};
use crate::math::Vector2;
use crate::scene::{EntityAddress, SceneManager};

/// Called when a button is pressed. Any state the handler needs is captured
/// by the closure.
pub type ClickCallback = Rc<dyn Fn(&mut SceneManager)>;

struct ButtonSettings {
    width: f32,
    height: f32,
    origin: Vector2,
    on_click: Option<ClickCallback>,
}

/// Axis-aligned clickable area bound to a callback.
pub struct Button {
    core: ComponentCore,
    settings: Rc<RefCell<ButtonSettings>>,
    events: Rc<MouseDispatcher>,
    listener: Option<(MouseCallback, ListenerContext)>,
}

impl Button {
    /// A `width x height` button centred on its entity.
    pub fn new(context: &EngineContext, width: f32, height: f32) -> Self {
        Self {
            core: ComponentCore::new(),
            settings: Rc::new(RefCell::new(ButtonSettings {
                width,
                height,
                origin: Vector2::new(0.5, 0.5),
                on_click: None,
            })),
            events: context.mouse_events(),
            listener: None,
        }
    }

    pub fn with_origin(self, origin: Vector2) -> Self {
        self.settings.borrow_mut().origin = origin;
        self
    }

    pub fn with_on_click(self, on_click: impl Fn(&mut SceneManager) + 'static) -> Self {
        self.set_on_click(Rc::new(on_click));
        self
    }

    pub fn set_on_click(&self, on_click: ClickCallback) {
        self.settings.borrow_mut().on_click = Some(on_click);
    }

    pub fn set_size(&self, width: f32, height: f32) {
        let mut settings = self.settings.borrow_mut();
        settings.width = width;
        settings.height = height;
    }

    pub fn size(&self) -> (f32, f32) {
        let settings = self.settings.borrow();
        (settings.width, settings.height)
    }

    pub fn origin(&self) -> Vector2 {
        self.settings.borrow().origin
    }

    /// Whether the button currently listens for presses.
    pub fn is_subscribed(&self) -> bool {
        self.listener.is_some()
    }

    fn unsubscribe(&mut self) {
        if let Some((callback, context)) = self.listener.take() {
            self.events
                .remove_event_listener(MouseEvent::MOUSE_DOWN, &callback, &context);
        }
    }
}

/// Whether `point` lies inside the box of a `width x height` area anchored
/// at `position` by `origin` and scaled by `scale`.
pub fn hit_test(
    point: Vector2,
    position: Vector2,
    scale: Vector2,
    width: f32,
    height: f32,
    origin: Vector2,
) -> bool {
    let w = width * scale.x;
    let h = height * scale.y;
    let x0 = position.x - w * origin.x;
    let x1 = position.x + w * (1.0 - origin.x);
    let y0 = position.y - h * origin.y;
    let y1 = position.y + h * (1.0 - origin.y);
    point.x >= x0 && point.x <= x1 && point.y >= y0 && point.y <= y1
}

fn on_mouse_down(
    settings: &RefCell<ButtonSettings>,
    context: &ListenerContext,
    point: Vector2,
    scenes: &mut SceneManager,
) {
    let ListenerContext::Entity(address) = *context else {
        return;
    };
    let hit = {
        let Some(scene) = scenes.scene(address.scene) else {
            return;
        };
        if scene.is_entity_destroyed(address.entity) {
            return;
        }
        let (Some(position), Some(scale)) =
            (scene.position(address.entity), scene.scale(address.entity))
        else {
            return;
        };
        let s = settings.borrow();
        hit_test(point, position, scale, s.width, s.height, s.origin)
    };
    if !hit {
        return;
    }
    // Cloned out so the handler may reconfigure the button.
    let on_click = settings.borrow().on_click.clone();
    if let Some(on_click) = on_click {
        debug!("Button on {:?} clicked at ({}, {})", address.entity, point.x, point.y);
        on_click(scenes);
    }
}

impl Component for Button {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn on_attach(&mut self, owner: EntityAddress) {
        self.core.set_owner(owner);
        self.unsubscribe();

        let settings = Rc::clone(&self.settings);
        let callback: MouseCallback = Rc::new(
            move |context: &ListenerContext, point: &Vector2, scenes: &mut SceneManager| {
                on_mouse_down(&settings, context, *point, scenes);
            },
        );
        let context = ListenerContext::Entity(owner);
        self.events
            .add_event_listener(MouseEvent::MOUSE_DOWN, Rc::clone(&callback), context);
        self.listener = Some((callback, context));
    }

    fn destroy(&mut self) {
        self.unsubscribe();
        self.core.destroy();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.settings.borrow();
        f.debug_struct("Button")
            .field("width", &settings.width)
            .field("height", &settings.height)
            .field("origin", &settings.origin)
            .field("subscribed", &self.listener.is_some())
            .field("destroyed", &self.core.is_destroyed())
            .finish()
    }
}
