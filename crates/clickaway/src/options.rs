//! Options
//!
//! Configuration for one `OnClickOutside` instance. Everything except the
//! declarative region list can be loaded with serde, using the camelCase
//! names hosts already know (`eventTypes`, `ignoreClass`, `detectIFrame`).

use serde::{Deserialize, Serialize};

use clickaway_dom::EventType;

use crate::NodeRef;

/// Class name that suppresses detection when present on the origin or an ancestor
pub const DEFAULT_IGNORE_CLASS: &str = "ignore-onclickoutside";

/// One ignore marker or several; with several, any one of them suffices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreClass {
    One(String),
    Many(Vec<String>),
}

impl IgnoreClass {
    /// Markers as a slice
    pub fn markers(&self) -> &[String] {
        match self {
            Self::One(marker) => std::slice::from_ref(marker),
            Self::Many(markers) => markers,
        }
    }
}

impl Default for IgnoreClass {
    fn default() -> Self {
        Self::One(DEFAULT_IGNORE_CLASS.to_string())
    }
}

impl From<&str> for IgnoreClass {
    fn from(marker: &str) -> Self {
        Self::One(marker.to_string())
    }
}

impl From<String> for IgnoreClass {
    fn from(marker: String) -> Self {
        Self::One(marker)
    }
}

impl From<Vec<String>> for IgnoreClass {
    fn from(markers: Vec<String>) -> Self {
        Self::Many(markers)
    }
}

impl From<&[&str]> for IgnoreClass {
    fn from(markers: &[&str]) -> Self {
        Self::Many(markers.iter().map(|m| m.to_string()).collect())
    }
}

/// Default interaction events: pointer activation and touch start
pub fn default_event_types() -> Vec<EventType> {
    vec![EventType::MouseDown, EventType::TouchStart]
}

/// Detection options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Declarative regions. When set, imperative registration is unused.
    #[serde(skip)]
    pub refs: Option<Vec<NodeRef>>,
    /// Suppress detection without dropping registered regions
    pub disabled: bool,
    /// Document events treated as interactions
    pub event_types: Vec<EventType>,
    /// Ignore pointer events landing in the scrollbar gutter
    pub exclude_scrollbar: bool,
    /// Marker class(es) that suppress detection for a subtree
    pub ignore_class: IgnoreClass,
    /// Report focus moving into an embedded frame
    #[serde(rename = "detectIFrame")]
    pub detect_iframe: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            refs: None,
            disabled: false,
            event_types: default_event_types(),
            exclude_scrollbar: false,
            ignore_class: IgnoreClass::default(),
            detect_iframe: true,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monitor a fixed list of regions
    pub fn with_refs(mut self, refs: Vec<NodeRef>) -> Self {
        self.refs = Some(refs);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_event_types(mut self, event_types: Vec<EventType>) -> Self {
        self.event_types = event_types;
        self
    }

    pub fn with_exclude_scrollbar(mut self, exclude: bool) -> Self {
        self.exclude_scrollbar = exclude;
        self
    }

    pub fn with_ignore_class(mut self, ignore_class: impl Into<IgnoreClass>) -> Self {
        self.ignore_class = ignore_class.into();
        self
    }

    pub fn with_detect_iframe(mut self, detect: bool) -> Self {
        self.detect_iframe = detect;
        self
    }
}
