//! Window
//!
//! Owns the document, the document and window listener registries and the
//! event loop. Everything is single-threaded: share it as `Rc<Window>` and
//! capture `Weak<Window>` in listeners to avoid reference cycles.
//!
//! Dispatch never holds a `RefCell` borrow while a handler runs, so handlers
//! may read or mutate the document, add or remove listeners and schedule
//! tasks.

use std::cell::{Cell, OnceCell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::{
    Document, DomError, DomResult, Event, EventLoop, EventType, Handler, ListenerId, ListenerOptions,
    ListenerRegistry, NodeId, TimerId, Touch,
};

/// Capabilities of the simulated environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFeatures {
    /// Whether `{ passive: true }` listener options are honored
    pub passive_listeners: bool,
}

impl Default for WindowFeatures {
    fn default() -> Self {
        Self { passive_listeners: true }
    }
}

/// Browsing context: one document plus window-level state
#[derive(Debug)]
pub struct Window {
    document: RefCell<Document>,
    document_listeners: RefCell<ListenerRegistry>,
    window_listeners: RefCell<ListenerRegistry>,
    event_loop: RefCell<EventLoop>,
    focused: Cell<bool>,
    passive_support: OnceCell<bool>,
}

impl Window {
    /// Create a window with default features
    pub fn new(document: Document) -> Rc<Self> {
        Self::with_features(document, WindowFeatures::default())
    }

    pub fn with_features(document: Document, features: WindowFeatures) -> Rc<Self> {
        Rc::new(Self {
            document: RefCell::new(document),
            document_listeners: RefCell::new(ListenerRegistry::new(features.passive_listeners)),
            window_listeners: RefCell::new(ListenerRegistry::new(features.passive_listeners)),
            event_loop: RefCell::new(EventLoop::new()),
            focused: Cell::new(true),
            passive_support: OnceCell::new(),
        })
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    /// Whether the window has focus (false after focus moved into a frame)
    pub fn has_focus(&self) -> bool {
        self.focused.get()
    }

    /// Passive listener support, probed once and cached for the window's
    /// lifetime. The probe registers a throwaway passive listener and checks
    /// whether the option survived.
    pub fn supports_passive_listeners(&self) -> bool {
        *self.passive_support.get_or_init(|| {
            let probe = EventType::Custom("test".to_string());
            let mut registry = self.window_listeners.borrow_mut();
            let id = registry.add(probe.clone(), Rc::new(|_| {}), ListenerOptions::passive());
            let honored = registry.options(id).is_some_and(|o| o.passive);
            registry.remove(&probe, id);
            tracing::debug!(honored, "probed passive listener support");
            honored
        })
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// `document.addEventListener`
    pub fn add_document_listener(&self, event_type: EventType, handler: Handler, options: ListenerOptions) -> ListenerId {
        self.document_listeners.borrow_mut().add(event_type, handler, options)
    }

    /// `document.removeEventListener`
    pub fn remove_document_listener(&self, event_type: &EventType, id: ListenerId) -> bool {
        self.document_listeners.borrow_mut().remove(event_type, id)
    }

    /// `window.addEventListener`
    pub fn add_window_listener(&self, event_type: EventType, handler: Handler, options: ListenerOptions) -> ListenerId {
        self.window_listeners.borrow_mut().add(event_type, handler, options)
    }

    /// `window.removeEventListener`
    pub fn remove_window_listener(&self, event_type: &EventType, id: ListenerId) -> bool {
        self.window_listeners.borrow_mut().remove(event_type, id)
    }

    pub fn document_listeners(&self) -> Ref<'_, ListenerRegistry> {
        self.document_listeners.borrow()
    }

    pub fn window_listeners(&self) -> Ref<'_, ListenerRegistry> {
        self.window_listeners.borrow()
    }

    /// Deliver an event to the document's listeners. Returns the number of
    /// handlers invoked.
    pub fn dispatch_document_event(&self, event: &Event) -> usize {
        let handlers = self.document_listeners.borrow_mut().take_for_dispatch(&event.event_type);
        tracing::trace!(event_type = %event.event_type, target = ?event.target, listeners = handlers.len(), "document dispatch");
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Deliver an event to the window's listeners
    pub fn dispatch_window_event(&self, event: &Event) -> usize {
        let handlers = self.window_listeners.borrow_mut().take_for_dispatch(&event.event_type);
        tracing::trace!(event_type = %event.event_type, listeners = handlers.len(), "window dispatch");
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// `setTimeout`
    pub fn set_timeout(&self, task: impl FnOnce() + 'static, delay_ms: u64) -> TimerId {
        self.event_loop.borrow_mut().set_timeout(Box::new(task), delay_ms)
    }

    /// `clearTimeout`
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.event_loop.borrow_mut().clear_timeout(id)
    }

    /// Run every due task, including ones scheduled by the tasks themselves.
    /// Returns the number of tasks run.
    pub fn run_pending_tasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let Some(task) = self.event_loop.borrow_mut().pop_due() else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    /// Advance the virtual clock, then run due tasks
    pub fn advance_time(&self, delta_ms: u64) -> usize {
        self.event_loop.borrow_mut().advance(delta_ms);
        self.run_pending_tasks()
    }

    pub fn pending_tasks(&self) -> usize {
        self.event_loop.borrow().pending()
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Hit-test the point and dispatch `mousedown` on the document
    pub fn pointer_down_at(&self, x: f64, y: f64) -> Event {
        let target = self.document().element_from_point(x, y);
        let event = Event::mouse(EventType::MouseDown, target, x, y);
        self.dispatch_document_event(&event);
        event
    }

    /// Hit-test the point and dispatch `touchstart` on the document
    pub fn touch_start_at(&self, x: f64, y: f64) -> Event {
        let target = self.document().element_from_point(x, y);
        let event = Event::touch(EventType::TouchStart, target, Touch::new(0, x, y));
        self.dispatch_document_event(&event);
        event
    }

    /// Move focus into an embedded frame element. The window receives `blur`
    /// before the frame becomes `document.activeElement`, which is why
    /// listeners have to look at the active element on a later turn.
    pub fn focus_frame(&self, frame: NodeId) -> DomResult<Event> {
        {
            let doc = self.document();
            let node = doc.tree().get(frame).ok_or(DomError::NotFound(frame))?;
            if !node.is_element() {
                return Err(DomError::NotAnElement(frame));
            }
        }

        let event = Event::focus(EventType::Blur, None, Some(frame));
        self.focused.set(false);
        self.dispatch_window_event(&event);
        self.document_mut().focus(frame)?;
        Ok(event)
    }

    /// Focus returns to the top-level document
    pub fn focus(&self) {
        if !self.focused.replace(true) {
            let event = Event::focus(EventType::Focus, None, None);
            self.dispatch_window_event(&event);
        }
    }
}
