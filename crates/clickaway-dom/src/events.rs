//! Input Events
//!
//! Event type names and the mouse, touch and focus payloads the window
//! dispatches to listeners.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EventTypeError, NodeId};

/// Event type identifier. Equality and hashing go by DOM name, so a
/// `Custom` spelling of a known name is the same type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventType {
    MouseDown,
    MouseUp,
    Click,
    PointerDown,
    PointerUp,
    TouchStart,
    TouchEnd,
    TouchMove,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    /// Any other event name, stored verbatim
    Custom(String),
}

impl EventType {
    /// DOM event name
    pub fn as_str(&self) -> &str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::Click => "click",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::TouchMove => "touchmove",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::Custom(name) => name,
        }
    }

    /// Touch-class event: any name containing "touch"
    pub fn is_touch(&self) -> bool {
        self.as_str().contains("touch")
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl FromStr for EventType {
    type Err = EventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(EventTypeError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EventTypeError::Whitespace(s.to_string()));
        }

        Ok(match s {
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "click" => Self::Click,
            "pointerdown" => Self::PointerDown,
            "pointerup" => Self::PointerUp,
            "touchstart" => Self::TouchStart,
            "touchend" => Self::TouchEnd,
            "touchmove" => Self::TouchMove,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "focusin" => Self::FocusIn,
            "focusout" => Self::FocusOut,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl TryFrom<String> for EventType {
    type Error = EventTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Unique identifier for this touch
    pub identifier: u32,
    /// X relative to viewport
    pub client_x: f64,
    /// Y relative to viewport
    pub client_y: f64,
}

impl Touch {
    pub fn new(identifier: u32, client_x: f64, client_y: f64) -> Self {
        Self { identifier, client_x, client_y }
    }
}

/// Event payload
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// MouseEvent with viewport coordinates
    Mouse { client_x: f64, client_y: f64 },
    /// TouchEvent; the coordinates live on the touch points, not the event
    Touch { changed_touches: Vec<Touch> },
    /// FocusEvent
    Focus { related_target: Option<NodeId> },
    /// Plain Event
    Basic,
}

/// A dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// Origin node; `None` for events targeting the window
    pub target: Option<NodeId>,
    pub kind: EventKind,
}

impl Event {
    /// Create a plain event
    pub fn new(event_type: EventType, target: Option<NodeId>) -> Self {
        Self {
            event_type,
            target,
            kind: EventKind::Basic,
        }
    }

    /// Create a mouse event at viewport coordinates
    pub fn mouse(event_type: EventType, target: Option<NodeId>, client_x: f64, client_y: f64) -> Self {
        Self {
            kind: EventKind::Mouse { client_x, client_y },
            ..Self::new(event_type, target)
        }
    }

    /// Create a touch event for a single changed touch
    pub fn touch(event_type: EventType, target: Option<NodeId>, touch: Touch) -> Self {
        Self {
            kind: EventKind::Touch {
                changed_touches: vec![touch],
            },
            ..Self::new(event_type, target)
        }
    }

    /// Create a focus event
    pub fn focus(event_type: EventType, target: Option<NodeId>, related_target: Option<NodeId>) -> Self {
        Self {
            kind: EventKind::Focus { related_target },
            ..Self::new(event_type, target)
        }
    }

    /// `clientX`/`clientY` for mouse events. Touch and focus events carry no
    /// event-level coordinates.
    pub fn client_point(&self) -> Option<(f64, f64)> {
        match self.kind {
            EventKind::Mouse { client_x, client_y } => Some((client_x, client_y)),
            _ => None,
        }
    }
}
