//! Host adapter
//!
//! `OnClickOutside` is what a UI component holds. The host calls
//! [`OnClickOutside::update`] on every render with the latest callback and
//! options, hands out [`RegistrationHandle`]s to the elements that should
//! count as "inside", and drops the value when the component unmounts.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use clickaway_dom::{Event, NodeId, Window};

use crate::Options;
use crate::engine::{Callback, CallbackSlot, OutsideFilter};
use crate::lifecycle::{EpochKey, ListenerLifecycle};
use crate::region::RegionRegistry;

struct Shared {
    window: Rc<Window>,
    callback: Rc<CallbackSlot>,
    options: RefCell<Options>,
    registry: RefCell<RegionRegistry>,
    lifecycle: RefCell<ListenerLifecycle>,
}

impl Shared {
    fn reconcile(&self) {
        let key = {
            let options = self.options.borrow();
            let registry = self.registry.borrow();
            EpochKey::from_sources(&options, &registry)
        };

        self.lifecycle.borrow_mut().on_epoch_change(&self.window, key, |key| {
            OutsideFilter::new(
                &self.window,
                Rc::clone(&self.callback),
                key.regions.clone(),
                key.ignore_class.clone(),
                key.exclude_scrollbar,
            )
        });
    }

    fn register(&self, node: Option<NodeId>) {
        if !self.callback.is_alive() {
            return;
        }
        self.registry.borrow_mut().push(node);
        tracing::trace!(?node, registered = self.registry.borrow().len(), "region registered");
        self.reconcile();
    }

    fn teardown(&self) {
        self.callback.kill();
        self.lifecycle.borrow_mut().on_teardown(&self.window);
    }
}

/// Outside-interaction detector bound to one window.
///
/// Dropping it removes every listener it attached and silences any frame
/// focus check still queued on the window.
pub struct OnClickOutside {
    shared: Rc<Shared>,
}

impl OnClickOutside {
    /// Start detecting. Listeners are bound right away when `options`
    /// supplies declarative regions; in imperative mode they are bound on
    /// the first registration.
    pub fn attach<F>(window: &Rc<Window>, callback: F, options: Options) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        let callback: Callback = Rc::new(callback);
        let shared = Rc::new(Shared {
            window: Rc::clone(window),
            callback: Rc::new(CallbackSlot::new(callback)),
            options: RefCell::new(options),
            registry: RefCell::new(RegionRegistry::default()),
            lifecycle: RefCell::new(ListenerLifecycle::default()),
        });
        shared.reconcile();
        Self { shared }
    }

    /// Handle for imperative region registration. All handles of one
    /// detector feed the same region set.
    pub fn registration(&self) -> RegistrationHandle {
        RegistrationHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Render-time update: store the latest callback and re-evaluate the
    /// options. Listeners are only rebound when the options actually changed.
    pub fn update<F>(&self, callback: F, options: Options)
    where
        F: Fn(&Event) + 'static,
    {
        self.set_callback(callback);
        self.set_options(options);
    }

    /// Replace the callback without touching listeners
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&Event) + 'static,
    {
        self.shared.callback.set(Rc::new(callback));
    }

    /// Replace the options, rebinding listeners if this starts a new epoch
    pub fn set_options(&self, options: Options) {
        *self.shared.options.borrow_mut() = options;
        self.shared.reconcile();
    }

    /// Current options
    pub fn options(&self) -> Options {
        self.shared.options.borrow().clone()
    }

    /// Whether interaction listeners are currently bound
    pub fn is_listening(&self) -> bool {
        self.shared.lifecycle.borrow().is_attached()
    }

    /// Number of imperatively registered regions, absent ones included
    pub fn registered_regions(&self) -> usize {
        self.shared.registry.borrow().len()
    }
}

impl Drop for OnClickOutside {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl fmt::Debug for OnClickOutside {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnClickOutside")
            .field("options", &*self.shared.options.borrow())
            .field("lifecycle", &*self.shared.lifecycle.borrow())
            .finish()
    }
}

/// Imperative region registration, the equivalent of a ref callback.
///
/// Each call appends a region, so register every element that should count
/// as inside as it mounts. Calls after the detector is gone do nothing.
#[derive(Clone)]
pub struct RegistrationHandle {
    shared: Weak<Shared>,
}

impl RegistrationHandle {
    pub fn register(&self, node: Option<NodeId>) {
        if let Some(shared) = self.shared.upgrade() {
            shared.register(node);
        }
    }
}

impl fmt::Debug for RegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationHandle")
            .field("live", &(self.shared.strong_count() > 0))
            .finish()
    }
}
