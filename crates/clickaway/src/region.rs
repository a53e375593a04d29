//! Region registry
//!
//! Regions are shared, nullable node handles. The engine only observes them:
//! a handle the host has cleared (unmounted) is skipped, never an error.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use clickaway_dom::NodeId;

/// Shared handle to a node that may not be mounted yet.
///
/// Clones share the same slot; equality is identity of the slot, not of
/// the node it currently points at.
#[derive(Clone, Default)]
pub struct NodeRef(Rc<Cell<Option<NodeId>>>);

impl NodeRef {
    /// Empty handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle already pointing at `node`
    pub fn with(node: NodeId) -> Self {
        Self(Rc::new(Cell::new(Some(node))))
    }

    pub fn get(&self) -> Option<NodeId> {
        self.0.get()
    }

    /// Point the handle at a node, or clear it on unmount
    pub fn set(&self, node: Option<NodeId>) {
        self.0.set(node);
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.get()).finish()
    }
}

/// Regions accumulated through imperative registration. Append-only.
#[derive(Debug, Default)]
pub(crate) struct RegionRegistry {
    registered: Vec<NodeRef>,
}

impl RegionRegistry {
    /// Append a region, even an absent one
    pub(crate) fn push(&mut self, node: Option<NodeId>) {
        let region = NodeRef::new();
        region.set(node);
        self.registered.push(region);
    }

    pub(crate) fn as_slice(&self) -> &[NodeRef] {
        &self.registered
    }

    pub(crate) fn len(&self) -> usize {
        self.registered.len()
    }
}

/// The region set in effect: the declarative list when one was supplied,
/// otherwise the imperative registrations.
pub(crate) fn effective_regions<'a>(refs: Option<&'a [NodeRef]>, registry: &'a RegionRegistry) -> &'a [NodeRef] {
    refs.unwrap_or(registry.as_slice())
}

/// Nodes of the regions that are currently mounted
pub(crate) fn live_nodes(regions: &[NodeRef]) -> impl Iterator<Item = NodeId> + '_ {
    regions.iter().filter_map(NodeRef::get)
}
