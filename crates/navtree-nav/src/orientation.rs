#![forbid(unsafe_code)]

//! Sibling traversal driven by container orientation.
//!
//! A directional intent moves between the children of the nearest ancestor
//! laid out along the intent's axis: `Left`/`Right` step through a
//! horizontal container, `Up`/`Down` through a vertical one. When the
//! nearest such container has no sibling in that direction, the search
//! continues with the next matching ancestor further up, so leaving the end
//! of a row can move focus to the neighbouring row.
//!
//! Siblings whose subtree cannot take focus are skipped. `Enter` never
//! resolves here.

use navtree_core::{DirectionResolver, Intent, Node, NodeId, NodeRegistry};
#[cfg(feature = "tracing")]
use tracing::trace;

/// Resolver stepping between siblings of oriented containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrientationResolver {
    wrap: bool,
}

impl OrientationResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: wrap around at either end for containers that do not set
    /// their own `wrap` flag.
    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    #[must_use]
    pub fn wraps(&self) -> bool {
        self.wrap
    }

    /// Next focusable sibling of `child` inside `container`.
    fn step<'a>(
        tree: &NodeRegistry,
        container: &'a Node,
        child: &str,
        forward: bool,
        wrap: bool,
    ) -> Option<&'a str> {
        let siblings = container.children();
        let len = siblings.len();
        let start = container.child_index(child)?;

        for offset in 1..len {
            let idx = if forward {
                let idx = start + offset;
                match (idx < len, wrap) {
                    (true, _) => idx,
                    (false, true) => idx - len,
                    (false, false) => return None,
                }
            } else {
                match (offset <= start, wrap) {
                    (true, _) => start - offset,
                    (false, true) => start + len - offset,
                    (false, false) => return None,
                }
            };
            let candidate = siblings[idx].as_str();
            if tree.has_focus_target(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

impl DirectionResolver for OrientationResolver {
    fn resolve(&self, tree: &NodeRegistry, from: &str, intent: Intent) -> Option<NodeId> {
        let axis = intent.axis()?;
        let mut child = from;
        for ancestor_id in tree.ancestors(from) {
            let ancestor = tree.get(ancestor_id)?;
            if ancestor.orientation().is_some_and(|o| o.matches(axis)) {
                let wrap = ancestor.wrap().unwrap_or(self.wrap);
                if let Some(target) =
                    Self::step(tree, ancestor, child, intent.is_forward(), wrap)
                {
                    #[cfg(feature = "tracing")]
                    trace!(from, %intent, container = ancestor_id, target, "navtree: sibling step");
                    return Some(target.to_owned());
                }
            }
            child = ancestor_id;
        }
        None
    }
}
