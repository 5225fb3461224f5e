#![forbid(unsafe_code)]

//! Explicit directional edges between nodes.
//!
//! Each entry says "pressing `intent` while `from` is focused moves to
//! `to`". Edges are independent of the tree structure: `to` may be an
//! internal node, in which case the engine descends from it as usual.
//!
//! # Invariants
//!
//! 1. At most one edge per `(from, intent)` pair; connecting again replaces it.
//! 2. [`EdgeMap::remove_node`] drops every edge into or out of the node.
//! 3. Resolution ignores edges whose target is no longer registered.
//!
//! # Complexity
//!
//! | Operation | Time |
//! |-----------|------|
//! | connect | O(1) |
//! | navigate | O(1) |
//! | remove_node | O(E) (cleans incoming edges) |

use navtree_core::{DirectionResolver, Intent, NodeId, NodeRegistry};
use rustc_hash::FxHashMap;

/// Directional edge table keyed by source node.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    edges: FxHashMap<NodeId, FxHashMap<Intent, NodeId>>,
}

impl EdgeMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect two nodes: `intent` at `from` leads to `to`.
    ///
    /// Returns the previous target for this pair, if any.
    pub fn connect(
        &mut self,
        from: impl Into<NodeId>,
        intent: Intent,
        to: impl Into<NodeId>,
    ) -> Option<NodeId> {
        self.edges
            .entry(from.into())
            .or_default()
            .insert(intent, to.into())
    }

    /// Disconnect an edge, returning its target.
    pub fn disconnect(&mut self, from: &str, intent: Intent) -> Option<NodeId> {
        let out = self.edges.get_mut(from)?;
        let removed = out.remove(&intent);
        if out.is_empty() {
            self.edges.remove(from);
        }
        removed
    }

    /// Target of `intent` at `from`, if connected.
    #[must_use = "use the returned target id (if any)"]
    pub fn navigate(&self, from: &str, intent: Intent) -> Option<&str> {
        self.edges.get(from)?.get(&intent).map(String::as_str)
    }

    /// Remove every edge touching `id`.
    pub fn remove_node(&mut self, id: &str) {
        self.edges.remove(id);
        for out in self.edges.values_mut() {
            out.retain(|_, to| to != id);
        }
        self.edges.retain(|_, out| !out.is_empty());
    }

    /// Link `ids` in sequence with `Left`/`Right` edges.
    ///
    /// With `wrap`, the last node links back to the first (and vice versa).
    pub fn connect_row(&mut self, ids: &[&str], wrap: bool) {
        self.connect_sequence(ids, Intent::Left, Intent::Right, wrap);
    }

    /// Link `ids` in sequence with `Up`/`Down` edges.
    pub fn connect_column(&mut self, ids: &[&str], wrap: bool) {
        self.connect_sequence(ids, Intent::Up, Intent::Down, wrap);
    }

    fn connect_sequence(&mut self, ids: &[&str], back: Intent, forward: Intent, wrap: bool) {
        if ids.len() < 2 {
            return;
        }
        for pair in ids.windows(2) {
            self.connect(pair[0], forward, pair[1]);
            self.connect(pair[1], back, pair[0]);
        }
        if wrap && let (Some(first), Some(last)) = (ids.first(), ids.last()) {
            self.connect(*last, forward, *first);
            self.connect(*first, back, *last);
        }
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|out| out.len()).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl DirectionResolver for EdgeMap {
    fn resolve(&self, tree: &NodeRegistry, from: &str, intent: Intent) -> Option<NodeId> {
        self.navigate(from, intent)
            .filter(|to| tree.contains(to))
            .map(str::to_owned)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use navtree_core::RegisterOptions;

    #[test]
    fn empty_map() {
        let edges = EdgeMap::new();
        assert!(edges.is_empty());
        assert_eq!(edges.edge_count(), 0);
        assert_eq!(edges.navigate("a", Intent::Up), None);
    }

    #[test]
    fn connect_and_navigate() {
        let mut edges = EdgeMap::new();
        assert_eq!(edges.connect("a", Intent::Right, "b"), None);
        assert_eq!(edges.navigate("a", Intent::Right), Some("b"));
        assert_eq!(edges.navigate("a", Intent::Left), None);
        assert_eq!(edges.navigate("b", Intent::Left), None);
    }

    #[test]
    fn connect_replaces_existing() {
        let mut edges = EdgeMap::new();
        edges.connect("a", Intent::Down, "b");
        assert_eq!(edges.connect("a", Intent::Down, "c"), Some("b".to_owned()));
        assert_eq!(edges.navigate("a", Intent::Down), Some("c"));
        assert_eq!(edges.edge_count(), 1);
    }

    #[test]
    fn disconnect_removes_edge() {
        let mut edges = EdgeMap::new();
        edges.connect("a", Intent::Enter, "menu");
        assert_eq!(edges.disconnect("a", Intent::Enter), Some("menu".to_owned()));
        assert!(edges.is_empty());
        assert_eq!(edges.disconnect("a", Intent::Enter), None);
    }

    #[test]
    fn remove_node_cleans_both_directions() {
        let mut edges = EdgeMap::new();
        edges.connect_row(&["a", "b", "c"], false);
        assert_eq!(edges.edge_count(), 4);

        edges.remove_node("b");
        assert_eq!(edges.edge_count(), 0);
        assert_eq!(edges.navigate("a", Intent::Right), None);
        assert_eq!(edges.navigate("c", Intent::Left), None);
    }

    #[test]
    fn connect_row_links_neighbours() {
        let mut edges = EdgeMap::new();
        edges.connect_row(&["a", "b", "c"], false);
        assert_eq!(edges.navigate("a", Intent::Right), Some("b"));
        assert_eq!(edges.navigate("c", Intent::Left), Some("b"));
        assert_eq!(edges.navigate("c", Intent::Right), None);
        assert_eq!(edges.navigate("a", Intent::Down), None);
    }

    #[test]
    fn connect_column_wraps() {
        let mut edges = EdgeMap::new();
        edges.connect_column(&["a", "b", "c"], true);
        assert_eq!(edges.navigate("c", Intent::Down), Some("a"));
        assert_eq!(edges.navigate("a", Intent::Up), Some("c"));
        assert_eq!(edges.edge_count(), 6);
    }

    #[test]
    fn connect_sequence_ignores_single_node() {
        let mut edges = EdgeMap::new();
        edges.connect_row(&["a"], true);
        assert!(edges.is_empty());
    }

    #[test]
    fn resolver_skips_unregistered_targets() {
        let mut tree = NodeRegistry::new();
        tree.register("a", RegisterOptions::new()).unwrap();
        tree.register("b", RegisterOptions::new()).unwrap();

        let mut edges = EdgeMap::new();
        edges.connect("a", Intent::Right, "b");
        edges.connect("a", Intent::Left, "gone");

        assert_eq!(edges.resolve(&tree, "a", Intent::Right), Some("b".to_owned()));
        assert_eq!(edges.resolve(&tree, "a", Intent::Left), None);
    }
}
