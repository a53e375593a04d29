//! Listener lifecycle
//!
//! Keeps exactly one epoch's listeners bound. Every epoch change detaches
//! the previous epoch's listeners completely before attaching new ones, and
//! an unchanged epoch key leaves the bound listeners untouched.

use std::cell::Cell;
use std::rc::Rc;

use clickaway_dom::{EventType, Handler, ListenerId, ListenerOptions, Window};

use crate::engine::OutsideFilter;
use crate::passive::listener_options;
use crate::region::{RegionRegistry, effective_regions};
use crate::{IgnoreClass, NodeRef, Options};

/// Everything whose change starts a new epoch. Event types compare by
/// value, regions by handle identity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EpochKey {
    /// Regions used for containment
    pub(crate) regions: Vec<NodeRef>,
    /// Either region source is non-empty
    pub(crate) has_regions: bool,
    pub(crate) ignore_class: IgnoreClass,
    pub(crate) exclude_scrollbar: bool,
    pub(crate) disabled: bool,
    pub(crate) detect_iframe: bool,
    pub(crate) event_types: Vec<EventType>,
}

impl EpochKey {
    pub(crate) fn new(options: &Options, regions: &[NodeRef]) -> Self {
        Self {
            regions: regions.to_vec(),
            has_regions: !regions.is_empty(),
            ignore_class: options.ignore_class.clone(),
            exclude_scrollbar: options.exclude_scrollbar,
            disabled: options.disabled,
            detect_iframe: options.detect_iframe,
            event_types: options.event_types.clone(),
        }
    }

    /// Key for a detector's two region sources. Containment uses the
    /// declarative list whenever one is supplied, but listeners stay
    /// detached only when both sources are empty.
    pub(crate) fn from_sources(options: &Options, registry: &RegionRegistry) -> Self {
        let declared = options.refs.as_deref();
        let mut key = Self::new(options, effective_regions(declared, registry));
        key.has_regions = declared.map_or(0, <[NodeRef]>::len) + registry.len() > 0;
        key
    }

    /// Whether this epoch binds any listeners at all
    fn wants_listeners(&self) -> bool {
        !self.disabled && self.has_regions
    }
}

/// Listeners bound for the active epoch
#[derive(Debug, Default)]
struct Bindings {
    document: Vec<(EventType, ListenerId)>,
    window_blur: Option<ListenerId>,
    live: Rc<Cell<bool>>,
}

#[derive(Debug, Default)]
enum ListenerState {
    #[default]
    Detached,
    Attached(Bindings),
}

/// Attach/detach state machine for one `OnClickOutside`
#[derive(Debug, Default)]
pub(crate) struct ListenerLifecycle {
    state: ListenerState,
    key: Option<EpochKey>,
    torn_down: bool,
    epochs: u64,
}

impl ListenerLifecycle {
    /// Reconcile bound listeners with `key`. `make_filter` is only called
    /// when listeners are actually attached. Returns true if an epoch
    /// boundary was crossed.
    pub(crate) fn on_epoch_change(
        &mut self,
        window: &Window,
        key: EpochKey,
        make_filter: impl FnOnce(&EpochKey) -> OutsideFilter,
    ) -> bool {
        if self.torn_down || self.key.as_ref() == Some(&key) {
            return false;
        }

        self.detach(window);
        if key.wants_listeners() {
            let filter = Rc::new(make_filter(&key));
            self.attach(window, &key, filter);
        } else {
            tracing::debug!(disabled = key.disabled, has_regions = key.has_regions, "staying detached");
        }

        self.key = Some(key);
        self.epochs += 1;
        true
    }

    /// Final detach. Later epoch changes are ignored.
    pub(crate) fn on_teardown(&mut self, window: &Window) {
        self.detach(window);
        self.torn_down = true;
        tracing::debug!(epochs = self.epochs, "torn down");
    }

    pub(crate) fn is_attached(&self) -> bool {
        matches!(self.state, ListenerState::Attached(_))
    }

    pub(crate) fn epochs(&self) -> u64 {
        self.epochs
    }

    fn attach(&mut self, window: &Window, key: &EpochKey, filter: Rc<OutsideFilter>) {
        // One handler per epoch: listing a type twice binds it once.
        let interaction: Handler = {
            let filter = Rc::clone(&filter);
            Rc::new(move |event| filter.handle_interaction(event))
        };

        let mut bindings = Bindings {
            live: filter.liveness(),
            ..Bindings::default()
        };
        for event_type in &key.event_types {
            let options = listener_options(window, event_type);
            let id = window.add_document_listener(event_type.clone(), Rc::clone(&interaction), options);
            bindings.document.push((event_type.clone(), id));
        }

        if key.detect_iframe {
            let blur: Handler = Rc::new(move |event| filter.handle_window_blur(event));
            bindings.window_blur = Some(window.add_window_listener(EventType::Blur, blur, ListenerOptions::default()));
        }

        tracing::debug!(
            event_types = ?key.event_types,
            frame_detection = key.detect_iframe,
            regions = key.regions.len(),
            "attached listeners"
        );
        self.state = ListenerState::Attached(bindings);
    }

    fn detach(&mut self, window: &Window) {
        let ListenerState::Attached(bindings) = std::mem::take(&mut self.state) else {
            return;
        };

        for (event_type, id) in &bindings.document {
            window.remove_document_listener(event_type, *id);
        }
        if let Some(id) = bindings.window_blur {
            window.remove_window_listener(&EventType::Blur, id);
        }
        bindings.live.set(false);

        tracing::debug!(listeners = bindings.document.len(), "detached listeners");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CallbackSlot;
    use clickaway_dom::{Document, NodeId};

    fn setup() -> (Rc<Window>, NodeId) {
        let window = Window::new(Document::default());
        let region = {
            let mut doc = window.document_mut();
            let body = doc.body();
            doc.create_element_in(body, "div").unwrap()
        };
        (window, region)
    }

    fn reconcile(lifecycle: &mut ListenerLifecycle, window: &Rc<Window>, key: EpochKey) -> bool {
        lifecycle.on_epoch_change(window, key, |key| {
            OutsideFilter::new(
                window,
                Rc::new(CallbackSlot::default()),
                key.regions.clone(),
                key.ignore_class.clone(),
                key.exclude_scrollbar,
            )
        })
    }

    #[test]
    fn test_attach_default_listeners() {
        let (window, region) = setup();
        let mut lifecycle = ListenerLifecycle::default();
        let regions = vec![NodeRef::with(region)];

        assert!(reconcile(&mut lifecycle, &window, EpochKey::new(&Options::default(), &regions)));
        assert!(lifecycle.is_attached());
        assert_eq!(window.document_listeners().count(&EventType::MouseDown), 1);
        assert_eq!(window.document_listeners().count(&EventType::TouchStart), 1);
        assert_eq!(window.window_listeners().count(&EventType::Blur), 1);

        let touch_id = window.document_listeners().ids(&EventType::TouchStart)[0];
        assert_eq!(window.document_listeners().options(touch_id), Some(ListenerOptions::passive()));
    }

    #[test]
    fn test_no_regions_no_listeners() {
        let (window, _) = setup();
        let mut lifecycle = ListenerLifecycle::default();

        assert!(reconcile(&mut lifecycle, &window, EpochKey::new(&Options::default(), &[])));
        assert!(!lifecycle.is_attached());
        assert!(window.document_listeners().is_empty());
        assert!(window.window_listeners().is_empty());
    }

    #[test]
    fn test_empty_declared_list_with_registrations_binds() {
        let (window, region) = setup();
        let mut lifecycle = ListenerLifecycle::default();
        let mut registry = RegionRegistry::default();
        let options = Options::default().with_refs(Vec::new());

        reconcile(&mut lifecycle, &window, EpochKey::from_sources(&options, &registry));
        assert!(!lifecycle.is_attached());

        registry.push(Some(region));
        let key = EpochKey::from_sources(&options, &registry);
        assert!(key.regions.is_empty());
        assert!(reconcile(&mut lifecycle, &window, key));
        assert!(lifecycle.is_attached());
        assert_eq!(window.document_listeners().count(&EventType::MouseDown), 1);
    }

    #[test]
    fn test_equal_key_is_not_an_epoch() {
        let (window, region) = setup();
        let mut lifecycle = ListenerLifecycle::default();
        let regions = vec![NodeRef::with(region)];
        let options = Options::default().with_event_types(vec![EventType::MouseDown]);

        reconcile(&mut lifecycle, &window, EpochKey::new(&options, &regions));
        let before = window.document_listeners().ids(&EventType::MouseDown);

        let same = Options::default().with_event_types(vec!["mousedown".parse().unwrap()]);
        assert!(!reconcile(&mut lifecycle, &window, EpochKey::new(&same, &regions)));
        assert_eq!(window.document_listeners().ids(&EventType::MouseDown), before);
        assert_eq!(lifecycle.epochs(), 1);
    }

    #[test]
    fn test_epoch_change_replaces_listeners() {
        let (window, region) = setup();
        let mut lifecycle = ListenerLifecycle::default();
        let regions = vec![NodeRef::with(region)];

        reconcile(&mut lifecycle, &window, EpochKey::new(&Options::default(), &regions));
        let before = window.document_listeners().ids(&EventType::MouseDown);

        let options = Options::default().with_exclude_scrollbar(true).with_detect_iframe(false);
        assert!(reconcile(&mut lifecycle, &window, EpochKey::new(&options, &regions)));

        let after = window.document_listeners().ids(&EventType::MouseDown);
        assert_eq!(after.len(), 1);
        assert_ne!(before, after);
        assert_eq!(window.document_listeners().len(), 2);
        assert!(window.window_listeners().is_empty());
    }

    #[test]
    fn test_duplicate_event_type_binds_once() {
        let (window, region) = setup();
        let mut lifecycle = ListenerLifecycle::default();
        let regions = vec![NodeRef::with(region)];
        let options = Options::default().with_event_types(vec![EventType::Click, EventType::Click]);

        reconcile(&mut lifecycle, &window, EpochKey::new(&options, &regions));
        assert_eq!(window.document_listeners().count(&EventType::Click), 1);

        reconcile(&mut lifecycle, &window, EpochKey::new(&options.with_disabled(true), &regions));
        assert!(window.document_listeners().is_empty());
    }

    #[test]
    fn test_teardown_is_final() {
        let (window, region) = setup();
        let mut lifecycle = ListenerLifecycle::default();
        let regions = vec![NodeRef::with(region)];

        reconcile(&mut lifecycle, &window, EpochKey::new(&Options::default(), &regions));
        lifecycle.on_teardown(&window);
        assert!(window.document_listeners().is_empty());
        assert!(window.window_listeners().is_empty());

        let options = Options::default().with_exclude_scrollbar(true);
        assert!(!reconcile(&mut lifecycle, &window, EpochKey::new(&options, &regions)));
        assert!(window.document_listeners().is_empty());
    }
}
