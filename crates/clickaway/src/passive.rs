//! Listener options per event type

use clickaway_dom::{EventType, ListenerOptions, Window};

/// `{ passive: true }` for touch-class events when the environment honors
/// it, plain options otherwise.
pub fn listener_options(window: &Window, event_type: &EventType) -> ListenerOptions {
    if event_type.is_touch() && window.supports_passive_listeners() {
        ListenerOptions::passive()
    } else {
        ListenerOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clickaway_dom::{Document, WindowFeatures};

    #[test]
    fn test_touch_gets_passive() {
        let window = Window::new(Document::default());
        assert_eq!(listener_options(&window, &EventType::TouchStart), ListenerOptions::passive());
        assert_eq!(listener_options(&window, &EventType::MouseDown), ListenerOptions::default());
    }

    #[test]
    fn test_unsupported_degrades() {
        let window = Window::with_features(Document::default(), WindowFeatures { passive_listeners: false });
        assert_eq!(listener_options(&window, &EventType::TouchStart), ListenerOptions::default());
    }
}
