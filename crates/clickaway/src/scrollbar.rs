//! Scrollbar click heuristic

use clickaway_dom::{Document, Event};

/// True if a pointer event landed at or beyond the root element's client
/// width or height, i.e. in the gutter a scrollbar occupies. Events without
/// client coordinates (touch, focus) are never scrollbar clicks.
///
/// This compares coordinates only; any dead zone at the viewport edge
/// counts as scrollbar too.
pub fn clicked_on_scrollbar(document: &Document, event: &Event) -> bool {
    match event.client_point() {
        Some((x, y)) => document.client_width() <= x || document.client_height() <= y,
        None => false,
    }
}
