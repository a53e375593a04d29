//! clickaway DOM - Document Object Model
//!
//! Arena-backed, single-threaded DOM environment: a node tree with class
//! lists and layout boxes, a `Document` with viewport size and focus, and a
//! `Window` that owns listener registries and a zero-delay task queue.

mod classlist;
mod document;
mod error;
mod event_loop;
mod events;
mod geometry;
mod listeners;
mod node;
mod tree;
mod window;

pub use classlist::DOMTokenList;
pub use document::Document;
pub use error::{DomError, DomResult, EventTypeError};
pub use event_loop::{EventLoop, Task, TimerId};
pub use events::{Event, EventKind, EventType, Touch};
pub use geometry::DOMRect;
pub use listeners::{Handler, ListenerId, ListenerOptions, ListenerRegistry};
pub use node::{ElementData, Node, NodeData};
pub use tree::{Ancestors, DomTree};
pub use window::{Window, WindowFeatures};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
