#![forbid(unsafe_code)]

//! Direction resolvers for navtree.
//!
//! The focus engine in `navtree-core` does not know how a directional intent
//! maps to a target; it asks a [`DirectionResolver`]. This crate provides
//! the two common strategies:
//!
//! - [`EdgeMap`]: explicit `(from, intent) → to` edges, for hand-wired
//!   layouts and jumps that do not follow the tree.
//! - [`OrientationResolver`]: sibling stepping inside containers tagged
//!   horizontal or vertical, climbing to outer containers at the edges.
//!
//! [`Chain`] combines them; explicit edges normally take precedence:
//!
//! ```
//! use navtree_core::{FocusTree, Intent, Orientation, RegisterOptions};
//! use navtree_nav::{Chain, EdgeMap, OrientationResolver};
//!
//! let mut tree = FocusTree::new();
//! tree.register("row", RegisterOptions::new().with_orientation(Orientation::Horizontal)).unwrap();
//! for id in ["a", "b", "c"] {
//!     tree.register(id, RegisterOptions::new().with_parent("row")).unwrap();
//! }
//!
//! let mut edges = EdgeMap::new();
//! edges.connect("a", Intent::Left, "c");
//! let nav = Chain(edges, OrientationResolver::new());
//!
//! tree.focus(Some("a")).unwrap();
//! assert_eq!(tree.move_focus(Intent::Right, &nav).unwrap().as_deref(), Some("b"));
//! tree.focus(Some("a")).unwrap();
//! assert_eq!(tree.move_focus(Intent::Left, &nav).unwrap().as_deref(), Some("c"));
//! ```

pub mod edges;
pub mod orientation;

pub use edges::EdgeMap;
pub use navtree_core::{DirectionResolver, Intent};
pub use orientation::OrientationResolver;

use navtree_core::{NodeId, NodeRegistry};

/// Try `A`, then `B`.
#[derive(Debug, Clone, Default)]
pub struct Chain<A, B>(pub A, pub B);

impl<A, B> DirectionResolver for Chain<A, B>
where
    A: DirectionResolver,
    B: DirectionResolver,
{
    fn resolve(&self, tree: &NodeRegistry, from: &str, intent: Intent) -> Option<NodeId> {
        self.0
            .resolve(tree, from, intent)
            .or_else(|| self.1.resolve(tree, from, intent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtree_core::RegisterOptions;

    #[test]
    fn chain_prefers_first() {
        let mut tree = NodeRegistry::new();
        for id in ["a", "b", "c"] {
            tree.register(id, RegisterOptions::new()).unwrap();
        }
        let mut first = EdgeMap::new();
        first.connect("a", Intent::Down, "b");
        let mut second = EdgeMap::new();
        second.connect("a", Intent::Down, "c");
        second.connect("a", Intent::Up, "c");

        let chain = Chain(first, second);
        assert_eq!(chain.resolve(&tree, "a", Intent::Down).as_deref(), Some("b"));
        assert_eq!(chain.resolve(&tree, "a", Intent::Up).as_deref(), Some("c"));
        assert_eq!(chain.resolve(&tree, "a", Intent::Left), None);
    }
}
