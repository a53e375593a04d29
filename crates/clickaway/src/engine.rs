//! Outside-interaction filtering
//!
//! An `OutsideFilter` is the per-epoch snapshot the attached listeners
//! close over: ignore markers, the scrollbar flag and the region handles of
//! that epoch, plus the shared callback slot.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use clickaway_dom::{Document, Event, Window};

use crate::matcher::has_ignore_class;
use crate::region::live_nodes;
use crate::scrollbar::clicked_on_scrollbar;
use crate::{IgnoreClass, NodeRef};

/// Caller-supplied reaction to an outside interaction
pub type Callback = Rc<dyn Fn(&Event)>;

/// Latest-write-wins callback holder shared by every epoch's listeners.
///
/// Once killed it never invokes anything again, which makes deferred tasks
/// that outlive their owner harmless.
#[derive(Default)]
pub(crate) struct CallbackSlot {
    current: RefCell<Option<Callback>>,
    dead: Cell<bool>,
}

impl CallbackSlot {
    pub(crate) fn new(callback: Callback) -> Self {
        Self {
            current: RefCell::new(Some(callback)),
            dead: Cell::new(false),
        }
    }

    pub(crate) fn set(&self, callback: Callback) {
        if !self.dead.get() {
            *self.current.borrow_mut() = Some(callback);
        }
    }

    pub(crate) fn kill(&self) {
        self.dead.set(true);
        self.current.borrow_mut().take();
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.dead.get()
    }

    /// Invoke the current callback. The slot is not borrowed while it runs,
    /// so the callback may replace itself or tear its owner down.
    pub(crate) fn invoke(&self, event: &Event) -> bool {
        if self.dead.get() {
            return false;
        }
        let callback = self.current.borrow().clone();
        match callback {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }
}

/// Decision logic for one epoch
pub(crate) struct OutsideFilter {
    window: Weak<Window>,
    callback: Rc<CallbackSlot>,
    regions: Vec<NodeRef>,
    ignore_class: IgnoreClass,
    exclude_scrollbar: bool,
    /// Cleared when the epoch's listeners are detached
    live: Rc<Cell<bool>>,
}

impl OutsideFilter {
    pub(crate) fn new(
        window: &Rc<Window>,
        callback: Rc<CallbackSlot>,
        regions: Vec<NodeRef>,
        ignore_class: IgnoreClass,
        exclude_scrollbar: bool,
    ) -> Self {
        Self {
            window: Rc::downgrade(window),
            callback,
            regions,
            ignore_class,
            exclude_scrollbar,
            live: Rc::new(Cell::new(true)),
        }
    }

    /// Flag the lifecycle clears on detach. Frame checks queued by this
    /// epoch do nothing once it is cleared.
    pub(crate) fn liveness(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.live)
    }

    /// True when the event should reach the callback: not ignore-marked, not
    /// a scrollbar click, and contained by none of the live regions.
    pub(crate) fn is_outside(&self, document: &Document, event: &Event) -> bool {
        let tree = document.tree();

        if has_ignore_class(tree, event.target, &self.ignore_class) {
            tracing::trace!(target = ?event.target, "interaction inside ignored subtree");
            return false;
        }

        if self.exclude_scrollbar && clicked_on_scrollbar(document, event) {
            tracing::trace!(point = ?event.client_point(), "interaction on scrollbar gutter");
            return false;
        }

        let Some(origin) = event.target else {
            return true;
        };
        live_nodes(&self.regions).all(|region| !tree.contains(region, origin))
    }

    /// Interaction listener body
    pub(crate) fn handle_interaction(&self, event: &Event) {
        let Some(window) = self.window.upgrade() else {
            return;
        };

        let outside = self.is_outside(&window.document(), event);
        tracing::trace!(event_type = %event.event_type, outside, "interaction");
        if outside {
            self.callback.invoke(event);
        }
    }

    /// Window `blur` listener body. Focus moving into a frame is only
    /// visible on `document.activeElement` after the current turn, so the
    /// check runs as a zero-delay task.
    pub(crate) fn handle_window_blur(self: &Rc<Self>, event: &Event) {
        let Some(window) = self.window.upgrade() else {
            return;
        };

        let filter = Rc::clone(self);
        let event = event.clone();
        window.set_timeout(move || filter.check_frame_focus(&event), 0);
    }

    fn check_frame_focus(&self, event: &Event) {
        if !self.callback.is_alive() || !self.live.get() {
            tracing::trace!("frame check from a retired epoch");
            return;
        }
        let Some(window) = self.window.upgrade() else {
            return;
        };

        let focused_frame = {
            let document = window.document();
            let tree = document.tree();
            document.active_element().is_some_and(|active| {
                let is_frame = tree
                    .get(active)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.is("iframe"));
                is_frame
                    && !has_ignore_class(tree, Some(active), &self.ignore_class)
                    && !live_nodes(&self.regions).any(|region| region == active)
            })
        };

        tracing::trace!(focused_frame, "deferred frame focus check");
        if focused_frame {
            self.callback.invoke(event);
        }
    }
}
