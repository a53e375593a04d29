//! Edge case tests for clickaway-dom
//!
//! Deep trees, re-entrant dispatch and hit-testing corner cases.

use std::cell::Cell;
use std::rc::Rc;

use clickaway_dom::{
    DOMRect, Document, DomError, Event, EventType, ListenerOptions, NodeId, Window,
};

// ============================================================================
// TREE
// ============================================================================

#[test]
fn test_deep_chain_contains() {
    let mut doc = Document::default();
    let mut parent = doc.body();
    let top = parent;
    for _ in 0..1000 {
        parent = doc.create_element_in(parent, "div").unwrap();
    }

    assert!(doc.tree().contains(top, parent));
    assert_eq!(doc.tree().ancestors(parent).count(), 1000 + 3);
}

#[test]
fn test_unknown_ids_are_errors() {
    let mut doc = Document::default();
    let stray = {
        let mut other = Document::default();
        for _ in 0..10 {
            other.tree_mut().create_element("div");
        }
        other.tree_mut().create_element("div")
    };

    let body = doc.body();
    assert_eq!(doc.tree_mut().append_child(body, stray), Err(DomError::NotFound(stray)));
    assert_eq!(doc.set_rect(stray, DOMRect::default()), Err(DomError::NotFound(stray)));
    assert!(doc.class_list_mut(stray).is_err());
}

#[test]
fn test_comment_has_no_class_list() {
    let mut doc = Document::default();
    let comment = doc.tree_mut().create_comment("note");
    assert_eq!(doc.class_list_mut(comment).unwrap_err(), DomError::NotAnElement(comment));
    assert!(doc.tree().get(comment).unwrap().class_list().is_none());
}

// ============================================================================
// HIT TESTING
// ============================================================================

#[test]
fn test_later_sibling_paints_on_top() {
    let mut doc = Document::default();
    let body = doc.body();
    let under = doc.create_box(body, "div", "", DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0)).unwrap();
    let over = doc.create_box(body, "div", "", DOMRect::from_xywh(50.0, 50.0, 100.0, 100.0)).unwrap();

    assert_eq!(doc.element_from_point(75.0, 75.0), Some(over));
    assert_eq!(doc.element_from_point(25.0, 25.0), Some(under));
}

#[test]
fn test_child_without_box_does_not_hide_parent() {
    let mut doc = Document::default();
    let body = doc.body();
    let panel = doc.create_box(body, "div", "", DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0)).unwrap();
    doc.create_element_in(panel, "span").unwrap();

    assert_eq!(doc.element_from_point(10.0, 10.0), Some(panel));
}

// ============================================================================
// DISPATCH
// ============================================================================

#[test]
fn test_listener_added_during_dispatch_waits_for_next_event() {
    let window = Window::new(Document::default());
    let hits = Rc::new(Cell::new(0));
    let weak = Rc::downgrade(&window);
    let late_hits = Rc::clone(&hits);

    window.add_document_listener(
        EventType::MouseDown,
        Rc::new(move |_| {
            let late_hits = Rc::clone(&late_hits);
            if let Some(window) = weak.upgrade() {
                window.add_document_listener(
                    EventType::MouseDown,
                    Rc::new(move |_| late_hits.set(late_hits.get() + 1)),
                    ListenerOptions::default(),
                );
            }
        }),
        ListenerOptions::default(),
    );

    assert_eq!(window.pointer_down_at(1.0, 1.0).event_type, EventType::MouseDown);
    assert_eq!(hits.get(), 0);
    window.pointer_down_at(1.0, 1.0);
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_handler_may_mutate_document() {
    let window = Window::new(Document::default());
    let popup = {
        let mut doc = window.document_mut();
        let body = doc.body();
        doc.create_box(body, "div", "", DOMRect::from_xywh(0.0, 0.0, 10.0, 10.0)).unwrap()
    };
    let weak = Rc::downgrade(&window);
    window.add_document_listener(
        EventType::MouseDown,
        Rc::new(move |_| {
            if let Some(window) = weak.upgrade() {
                let mut doc = window.document_mut();
                let body = doc.body();
                let _ = doc.tree_mut().remove_child(body, popup);
            }
        }),
        ListenerOptions::default(),
    );

    window.pointer_down_at(5.0, 5.0);
    assert!(!window.document().tree().is_connected(popup));
}

#[test]
fn test_custom_spelling_receives_builtin_dispatch() {
    let window = Window::new(Document::default());
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    window.add_document_listener(
        EventType::Custom("mousedown".to_string()),
        Rc::new(move |_| counter.set(counter.get() + 1)),
        ListenerOptions::default(),
    );

    window.pointer_down_at(1.0, 1.0);
    assert_eq!(hits.get(), 1);
    assert_eq!(window.document_listeners().count(&EventType::MouseDown), 1);
}

#[test]
fn test_window_and_document_registries_are_separate() {
    let window = Window::new(Document::default());
    window.add_window_listener(EventType::Blur, Rc::new(|_| {}), ListenerOptions::default());

    assert_eq!(window.dispatch_document_event(&Event::focus(EventType::Blur, None, None)), 0);
    assert_eq!(window.dispatch_window_event(&Event::focus(EventType::Blur, None, None)), 1);
}

#[test]
fn test_advance_time_runs_delayed_tasks() {
    let window = Window::new(Document::default());
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    let id = window.set_timeout(move || flag.set(true), 5);
    let cancelled = window.set_timeout(|| panic!("cleared timer ran"), 5);
    assert!(window.clear_timeout(cancelled));
    assert_ne!(id, cancelled);

    assert_eq!(window.run_pending_tasks(), 0);
    assert_eq!(window.advance_time(5), 1);
    assert!(ran.get());
}

#[test]
fn test_focus_returns_to_window() {
    let window = Window::new(Document::default());
    let frame: NodeId = {
        let mut doc = window.document_mut();
        let body = doc.body();
        doc.create_element_in(body, "iframe").unwrap()
    };
    let focus_events = Rc::new(Cell::new(0));
    let counter = Rc::clone(&focus_events);
    window.add_window_listener(
        EventType::Focus,
        Rc::new(move |_| counter.set(counter.get() + 1)),
        ListenerOptions::default(),
    );

    window.focus();
    assert_eq!(focus_events.get(), 0);

    window.focus_frame(frame).unwrap();
    window.focus();
    window.focus();
    assert!(window.has_focus());
    assert_eq!(focus_events.get(), 1);
}
