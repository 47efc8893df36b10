//! Hooks: named callback lists attached to widgets.
//!
//! A hook stores callbacks in registration order and invokes all of them,
//! synchronously, when emitted. Emission works on a snapshot of the list, so
//! callbacks may connect or disconnect (themselves included) while running
//! without affecting the dispatch already in flight.
//!
//! # Example
//!
//! ```
//! use lucy_ui::hook::{Hook, HookEvent};
//!
//! let clicked = Hook::new();
//! let id = clicked.connect(|event| {
//!     println!("{} fired", event.name);
//!     Ok(())
//! });
//! clicked.emit(&HookEvent::new("clicked")).unwrap();
//! clicked.disconnect(id);
//! ```

use std::fmt;
use std::sync::Arc;

use lucy_core::math::Vec2;
use parking_lot::Mutex;

use crate::error::{BoxError, HookError};
use crate::tree::NodeId;

/// Names of the hooks fired by the built-in input routing.
pub mod names {
    pub const MOUSE_ENTER: &str = "mouse_enter";
    pub const MOUSE_LEAVE: &str = "mouse_leave";
    pub const PRESSED: &str = "pressed";
    pub const RELEASED: &str = "released";
    pub const CLICKED: &str = "clicked";
    pub const DOUBLE_CLICKED: &str = "double_clicked";
    pub const FOCUSED: &str = "focused";
    pub const UNFOCUSED: &str = "unfocused";
    pub const CHANGED: &str = "changed";
}

/// Payload passed to every callback of an emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookEvent<'a> {
    pub name: &'a str,
    /// Widget the hook belongs to, if any.
    pub source: Option<NodeId>,
    /// Pointer position in screen space for pointer-driven hooks.
    pub pointer: Option<Vec2>,
    /// Scalar payload, e.g. the current value of a tween.
    pub value: Option<f32>,
}

impl<'a> HookEvent<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            source: None,
            pointer: None,
            value: None,
        }
    }

    pub fn with_source(mut self, node: NodeId) -> Self {
        self.source = Some(node);
        self
    }

    pub fn with_pointer(mut self, pointer: Vec2) -> Self {
        self.pointer = Some(pointer);
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = Some(value);
        self
    }
}

/// Result returned by hook callbacks.
pub type CallbackResult = Result<(), BoxError>;

/// Shared callback type.
pub type Callback = Arc<dyn Fn(&HookEvent<'_>) -> CallbackResult + Send + Sync>;

/// Handle identifying one connected callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

#[derive(Default)]
struct HookSlots {
    next_id: u64,
    slots: Vec<(ConnectionId, Callback)>,
}

/// An ordered list of callbacks.
///
/// Cloning a `Hook` yields another handle to the same list.
#[derive(Clone, Default)]
pub struct Hook {
    inner: Arc<Mutex<HookSlots>>,
}

impl Hook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a callback. It runs after every callback connected before it.
    pub fn connect<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&HookEvent<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        self.connect_shared(Arc::new(callback))
    }

    /// Connect an already shared callback.
    pub fn connect_shared(&self, callback: Callback) -> ConnectionId {
        let mut inner = self.inner.lock();
        let id = ConnectionId(inner.next_id);
        inner.next_id += 1;
        inner.slots.push((id, callback));
        id
    }

    /// Disconnect a callback. Returns false if it was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.slots.len();
        inner.slots.retain(|(slot_id, _)| *slot_id != id);
        inner.slots.len() != before
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.inner.lock().slots.iter().any(|(slot_id, _)| *slot_id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().slots.is_empty()
    }

    /// Disconnect every callback.
    pub fn clear(&self) {
        self.inner.lock().slots.clear();
    }

    /// Invoke every connected callback in registration order.
    ///
    /// Stops at the first failing callback and returns its error; callbacks
    /// after it are not invoked. Returns the number of callbacks invoked.
    pub fn emit(&self, event: &HookEvent<'_>) -> Result<usize, HookError> {
        // The lock is released before any callback runs.
        let snapshot: Vec<Callback> = {
            let inner = self.inner.lock();
            inner.slots.iter().map(|(_, cb)| cb.clone()).collect()
        };

        for (index, callback) in snapshot.iter().enumerate() {
            if let Err(source) = callback(event) {
                return Err(HookError::CallbackFailed {
                    hook: event.name.to_string(),
                    index,
                    source,
                });
            }
        }
        Ok(snapshot.len())
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("callbacks", &self.len()).finish()
    }
}
