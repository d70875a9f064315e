//! Generic publish/subscribe registry keyed by event name.
//!
//! An [`EventDispatcher`] keeps an ordered list of `(event, callback, context)`
//! listeners. Dispatching an event calls every matching listener in
//! registration order, passing the listener's bound `context` (the receiver),
//! the payload, and a caller-supplied environment `E`. The environment is how
//! listeners reach engine state without a global engine reference.
//!
//! Listener storage uses interior mutability so that a listener (or anything
//! it calls) may add or remove listeners through a shared handle while a
//! dispatch is running. Dispatch walks the live list by index, so such changes
//! may or may not be observed by the pass that is in progress.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Callback invoked with `(context, payload, environment)`.
pub type Callback<P, C, E = ()> = Rc<dyn Fn(&C, &P, &mut E)>;

struct EventListener<P, C, E> {
    event: String,
    callback: Callback<P, C, E>,
    context: C,
}

/// Multi-listener event registry.
///
/// Duplicate registrations are kept; each one is called once per dispatch.
pub struct EventDispatcher<P, C = (), E = ()> {
    listeners: RefCell<Vec<EventListener<P, C, E>>>,
}

impl<P, C, E> Default for EventDispatcher<P, C, E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<P, C, E> fmt::Debug for EventDispatcher<P, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl<P, C, E> EventDispatcher<P, C, E> {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event`, bound to `context`.
    pub fn add_event_listener(
        &self,
        event: impl Into<String>,
        callback: Callback<P, C, E>,
        context: C,
    ) {
        self.listeners.borrow_mut().push(EventListener {
            event: event.into(),
            callback,
            context,
        });
    }

    /// Remove every listener matching all three of `event`, `callback`
    /// (by identity) and `context`.
    ///
    /// Returns the number of listeners removed.
    pub fn remove_event_listener(
        &self,
        event: &str,
        callback: &Callback<P, C, E>,
        context: &C,
    ) -> usize
    where
        C: PartialEq,
    {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| {
            !(l.event == event && Rc::ptr_eq(&l.callback, callback) && l.context == *context)
        });
        before - listeners.len()
    }

    /// Drop every registered listener.
    pub fn remove_all_event_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Number of registered listeners, across all events.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of listeners registered for `event`.
    pub fn listeners_for(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.event == event)
            .count()
    }

    /// Synchronously call every listener registered for `event`.
    ///
    /// Returns how many listeners were called.
    pub fn dispatch_event(&self, event: &str, payload: &P, env: &mut E) -> usize
    where
        C: Clone,
    {
        let mut delivered = 0;
        let mut index = 0;
        loop {
            // The borrow is released before the callback runs.
            let target = {
                let listeners = self.listeners.borrow();
                let Some(listener) = listeners.get(index) else {
                    break;
                };
                (listener.event == event)
                    .then(|| (listener.callback.clone(), listener.context.clone()))
            };
            index += 1;
            if let Some((callback, context)) = target {
                callback(&context, payload, env);
                delivered += 1;
            }
        }
        delivered
    }
}
