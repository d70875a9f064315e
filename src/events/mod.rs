//! Event plumbing.
//!
//! - [`dispatcher`] – generic name-keyed publish/subscribe registry
//! - [`mouse`] – mouse event names and the engine-wide mouse dispatcher type
pub mod dispatcher;
pub mod mouse;

pub use dispatcher::{Callback, EventDispatcher};
pub use mouse::{ListenerContext, MouseCallback, MouseDispatcher, MouseEvent};
