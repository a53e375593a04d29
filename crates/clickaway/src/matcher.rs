//! Ignore-subtree matching

use clickaway_dom::{DomTree, Node, NodeId};

use crate::IgnoreClass;

/// True if `origin` or any of its ancestors carries one of the ignore markers.
///
/// Nodes without a class list (text, comments, the document) never match
/// themselves, but the walk continues through them.
pub fn has_ignore_class(tree: &DomTree, origin: Option<NodeId>, ignore_class: &IgnoreClass) -> bool {
    let Some(origin) = origin else {
        return false;
    };
    let markers = ignore_class.markers();

    tree.ancestors(origin).any(|id| {
        tree.get(id)
            .and_then(Node::class_list)
            .is_some_and(|classes| markers.iter().any(|m| classes.contains(m)))
    })
}
