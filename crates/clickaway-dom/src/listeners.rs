//! Event listener registry
//!
//! Per-target listener storage with `addEventListener` semantics: a handler
//! registered twice for the same type and capture flag is stored once.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Event, EventType};

/// Listener callback
pub type Handler = Rc<dyn Fn(&Event)>;

/// Listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub passive: bool,
    pub once: bool,
}

impl ListenerOptions {
    pub fn passive() -> Self {
        Self {
            passive: true,
            ..Self::default()
        }
    }
}

/// Handle returned by `add`, used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registered {
    id: ListenerId,
    options: ListenerOptions,
    handler: Handler,
}

fn same_handler(a: &Handler, b: &Handler) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Listeners of one event target (the document or the window)
pub struct ListenerRegistry {
    listeners: HashMap<EventType, Vec<Registered>>,
    next_id: u64,
    /// Whether the environment honors `passive`; when false the flag is dropped
    honors_passive: bool,
}

impl ListenerRegistry {
    pub fn new(honors_passive: bool) -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 1,
            honors_passive,
        }
    }

    /// Add a listener. Re-adding the same handler with the same capture flag
    /// returns the existing id and changes nothing.
    pub fn add(&mut self, event_type: EventType, handler: Handler, mut options: ListenerOptions) -> ListenerId {
        let entries = self.listeners.entry(event_type).or_default();

        if let Some(existing) = entries
            .iter()
            .find(|r| r.options.capture == options.capture && same_handler(&r.handler, &handler))
        {
            return existing.id;
        }

        if !self.honors_passive {
            options.passive = false;
        }

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        entries.push(Registered { id, options, handler });
        id
    }

    /// Remove a listener, returns false if it was not registered for this type
    pub fn remove(&mut self, event_type: &EventType, id: ListenerId) -> bool {
        let Some(entries) = self.listeners.get_mut(event_type) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|r| r.id != id);
        let removed = entries.len() < before;

        if entries.is_empty() {
            self.listeners.remove(event_type);
        }
        removed
    }

    /// Handlers to invoke for a dispatch, in registration order. `once`
    /// listeners are removed as they are taken.
    pub fn take_for_dispatch(&mut self, event_type: &EventType) -> Vec<Handler> {
        let Some(entries) = self.listeners.get_mut(event_type) else {
            return Vec::new();
        };

        let handlers = entries.iter().map(|r| Rc::clone(&r.handler)).collect();
        entries.retain(|r| !r.options.once);
        if entries.is_empty() {
            self.listeners.remove(event_type);
        }
        handlers
    }

    /// Effective options of a registered listener
    pub fn options(&self, id: ListenerId) -> Option<ListenerOptions> {
        self.listeners
            .values()
            .flatten()
            .find(|r| r.id == id)
            .map(|r| r.options)
    }

    /// Registered ids for an event type, in registration order
    pub fn ids(&self, event_type: &EventType) -> Vec<ListenerId> {
        self.listeners
            .get(event_type)
            .map(|entries| entries.iter().map(|r| r.id).collect())
            .unwrap_or_default()
    }

    /// Listener count for an event type
    pub fn count(&self, event_type: &EventType) -> usize {
        self.listeners.get(event_type).map_or(0, Vec::len)
    }

    /// Total listener count
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(ty, entries)| (ty.as_str(), entries.len()))
            .collect();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &counts)
            .field("honors_passive", &self.honors_passive)
            .finish()
    }
}
