//! Flat node arena for the focus tree.
//!
//! Each node is identified by a string [`NodeId`] and stores its parent,
//! ordered children, and the child most recently on a focus path. The tree
//! is stored flat (id → record) with back-references instead of nested
//! ownership, so cascade removal is an iterative walk.
//!
//! # Invariants
//!
//! 1. Every id in a node's `children` is registered, and that child's
//!    `parent` is the owning node.
//! 2. `children` never contains duplicates; insertion order is navigation
//!    order and never changes on re-registration.
//! 3. `active_child`, if set, is one of the node's current children.
//! 4. Nodes are never moved: the parent is fixed at first registration.
//!
//! # Complexity
//!
//! | Operation | Time |
//! |-----------|------|
//! | register | O(C) (duplicate check in parent's children) |
//! | remove_subtree | O(S + C) for S removed nodes |
//! | resolve_focus_target | O(S) for the subtree under `start` |
//! | ancestors | O(depth) |

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::{trace, warn};

use crate::config::ReparentPolicy;
use crate::error::FocusError;
use crate::intent::Axis;

/// Unique identifier of a node within one engine.
pub type NodeId = String;

/// Layout direction of a container's children, read by direction resolvers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Whether children laid out this way are traversed along `axis`.
    #[must_use]
    pub const fn matches(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Self::Horizontal, Axis::Horizontal) | (Self::Vertical, Axis::Vertical)
        )
    }
}

/// Options for [`NodeRegistry::register`].
///
/// `parent` is structural and only honored on first registration. The other
/// fields are applied on every registration where they are `Some`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    pub parent: Option<NodeId>,
    pub focusable: Option<bool>,
    pub orientation: Option<Orientation>,
    pub wrap: Option<bool>,
}

impl RegisterOptions {
    /// Options for a root node with no flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: place the node under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Builder: set the explicit focusable flag.
    #[must_use]
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = Some(focusable);
        self
    }

    /// Builder: set child orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Builder: set wrap-around for directional moves among children.
    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = Some(wrap);
        self
    }
}

/// A registered node. Read-only outside the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active_child: Option<NodeId>,
    focusable: Option<bool>,
    orientation: Option<Orientation>,
    wrap: Option<bool>,
}

impl Node {
    fn new(id: &str, parent: Option<NodeId>) -> Self {
        Self {
            id: id.to_owned(),
            parent,
            children: Vec::new(),
            active_child: None,
            focusable: None,
            orientation: None,
            wrap: None,
        }
    }

    fn apply(&mut self, options: &RegisterOptions) {
        if options.focusable.is_some() {
            self.focusable = options.focusable;
        }
        if options.orientation.is_some() {
            self.orientation = options.orientation;
        }
        if options.wrap.is_some() {
            self.wrap = options.wrap;
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn active_child(&self) -> Option<&str> {
        self.active_child.as_deref()
    }

    /// The explicit focusable flag, `None` when left implicit.
    #[must_use]
    pub fn focusable(&self) -> Option<bool> {
        self.focusable
    }

    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    #[must_use]
    pub fn wrap(&self) -> Option<bool> {
        self.wrap
    }

    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether descent stops at this node.
    ///
    /// Explicit flags win; otherwise only leaves are focus targets.
    #[must_use]
    pub fn is_focus_target(&self) -> bool {
        self.focusable.unwrap_or(self.children.is_empty())
    }

    /// Position of `child` in navigation order.
    #[must_use]
    pub fn child_index(&self, child: &str) -> Option<usize> {
        self.children.iter().position(|c| c == child)
    }

    fn valid_active_child(&self) -> Option<&str> {
        self.active_child
            .as_deref()
            .filter(|active| self.children.iter().any(|c| c == active))
    }
}

/// Owned view of one node, as stored in a [`TreeSnapshot`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeSnapshot {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub active_child: Option<NodeId>,
    pub focusable: Option<bool>,
}

/// Owned, ordered copy of the whole tree plus the current focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeSnapshot {
    pub current_focus: Option<NodeId>,
    pub nodes: BTreeMap<NodeId, NodeSnapshot>,
}

/// Id → node arena enforcing the tree invariants.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: FxHashMap<NodeId, Node>,
    /// Root ids in registration order.
    roots: Vec<NodeId>,
    reparent_policy: ReparentPolicy,
}

impl NodeRegistry {
    /// Create an empty registry that rejects re-parenting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given re-parent policy.
    #[must_use]
    pub fn with_reparent_policy(policy: ReparentPolicy) -> Self {
        Self {
            reparent_policy: policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn reparent_policy(&self) -> ReparentPolicy {
        self.reparent_policy
    }

    /// Register `id`, or update the non-structural options of an existing node.
    ///
    /// Returns `true` when a new node was created. Re-registering under the
    /// same parent never moves or duplicates the node.
    pub fn register(&mut self, id: &str, options: RegisterOptions) -> Result<bool, FocusError> {
        if id.trim().is_empty() {
            return Err(FocusError::InvalidId);
        }
        if let Some(parent) = options.parent.as_deref()
            && !self.nodes.contains_key(parent)
        {
            return Err(FocusError::UnknownParent {
                id: id.to_owned(),
                parent: parent.to_owned(),
            });
        }

        if let Some(node) = self.nodes.get_mut(id) {
            if let Some(requested) = options.parent.as_deref()
                && node.parent.as_deref() != Some(requested)
            {
                match self.reparent_policy {
                    ReparentPolicy::Reject => {
                        return Err(FocusError::Reparent {
                            id: id.to_owned(),
                            current: node.parent.clone(),
                            requested: requested.to_owned(),
                        });
                    }
                    ReparentPolicy::Ignore => {
                        #[cfg(feature = "tracing")]
                        warn!(
                            id,
                            current = ?node.parent,
                            requested,
                            "navtree: re-parent ignored"
                        );
                    }
                }
            }
            node.apply(&options);
            return Ok(false);
        }

        let mut node = Node::new(id, options.parent.clone());
        node.apply(&options);
        match options.parent.as_deref() {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(parent_id)
                    && !parent.children.iter().any(|c| c == id)
                {
                    parent.children.push(id.to_owned());
                }
            }
            None => self.roots.push(id.to_owned()),
        }
        self.nodes.insert(id.to_owned(), node);

        #[cfg(feature = "tracing")]
        trace!(id, parent = ?options.parent, "navtree: node registered");

        Ok(true)
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Returns the removed ids in pre-order (starting with `id`), or `None`
    /// if `id` is not registered. The former parent loses `id` from its
    /// children and its `active_child` if it pointed at `id`.
    pub fn remove_subtree(&mut self, id: &str) -> Option<Vec<NodeId>> {
        let parent = self.nodes.get(id)?.parent.clone();

        let mut removed = Vec::new();
        let mut stack = vec![id.to_owned()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children.into_iter().rev());
                removed.push(next);
            }
        }

        match parent {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|c| c != id);
                    if parent.active_child.as_deref() == Some(id) {
                        parent.active_child = None;
                    }
                }
            }
            None => self.roots.retain(|r| r != id),
        }

        #[cfg(feature = "tracing")]
        trace!(id, removed = removed.len(), "navtree: subtree removed");

        Some(removed)
    }

    /// Follow children from `start` to the node that should receive focus.
    ///
    /// Candidates are tried depth-first: the node's valid `active_child`
    /// first, then the remaining children in order. Returns `None` when
    /// `start` is unknown or nothing under it can take focus.
    #[must_use]
    pub fn resolve_focus_target(&self, start: &str) -> Option<&str> {
        let mut stack = vec![self.nodes.get(start)?];
        while let Some(node) = stack.pop() {
            if node.is_focus_target() {
                return Some(node.id());
            }
            let active = node.valid_active_child();
            // Pushed in reverse so the first candidate is popped first.
            for child in node.children.iter().rev() {
                if Some(child.as_str()) == active {
                    continue;
                }
                if let Some(child) = self.nodes.get(child) {
                    stack.push(child);
                }
            }
            if let Some(active) = active.and_then(|a| self.nodes.get(a)) {
                stack.push(active);
            }
        }
        None
    }

    /// Whether focusing `id` would land anywhere.
    #[must_use]
    pub fn has_focus_target(&self, id: &str) -> bool {
        self.resolve_focus_target(id).is_some()
    }

    /// Point every ancestor's `active_child` along the path to `target`.
    pub(crate) fn record_active_path(&mut self, target: &str) {
        let mut child = target.to_owned();
        while let Some(parent_id) = self.nodes.get(&child).and_then(|n| n.parent.clone()) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.active_child = Some(child);
            }
            child = parent_id;
        }
    }

    /// Look up a node by id.
    #[must_use = "use the returned node (if any)"]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids, in no particular order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    /// Root ids in registration order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of `id`, empty when `id` is unknown.
    #[must_use]
    pub fn children(&self, id: &str) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    #[must_use]
    pub fn parent(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(Node::parent)
    }

    #[must_use]
    pub fn active_child(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(Node::active_child)
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    #[must_use]
    pub fn ancestors<'a>(&'a self, id: &str) -> Ancestors<'a> {
        Ancestors {
            registry: self,
            next: self.parent(id),
        }
    }

    /// `id` followed by its ancestors up to the root. Empty if unknown.
    #[must_use]
    pub fn path_to_root<'a>(&'a self, id: &str) -> Vec<&'a str> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        std::iter::once(node.id()).chain(self.ancestors(id)).collect()
    }

    /// Owned, ordered copy of every node.
    #[must_use]
    pub fn snapshot_nodes(&self) -> BTreeMap<NodeId, NodeSnapshot> {
        self.nodes
            .iter()
            .map(|(id, node)| {
                (
                    id.clone(),
                    NodeSnapshot {
                        parent: node.parent.clone(),
                        children: node.children.clone(),
                        active_child: node.active_child.clone(),
                        focusable: node.focusable,
                    },
                )
            })
            .collect()
    }

    /// Check the referential invariants, describing the first violation.
    pub fn verify_links(&self) -> Result<(), String> {
        for (id, node) in &self.nodes {
            let mut seen = Vec::with_capacity(node.children.len());
            for child in &node.children {
                if seen.contains(&child) {
                    return Err(format!("'{id}' lists child '{child}' twice"));
                }
                seen.push(child);
                match self.nodes.get(child) {
                    None => return Err(format!("'{id}' lists missing child '{child}'")),
                    Some(c) if c.parent.as_deref() != Some(id.as_str()) => {
                        return Err(format!(
                            "'{child}' is a child of '{id}' but has parent {:?}",
                            c.parent
                        ));
                    }
                    Some(_) => {}
                }
            }
            if let Some(active) = node.active_child.as_deref()
                && !node.children.iter().any(|c| c == active)
            {
                return Err(format!("'{id}' has stale active child '{active}'"));
            }
            match node.parent.as_deref() {
                Some(parent) => {
                    let listed = self
                        .nodes
                        .get(parent)
                        .is_some_and(|p| p.children.iter().any(|c| c == id));
                    if !listed {
                        return Err(format!("'{id}' is not listed by parent '{parent}'"));
                    }
                }
                None => {
                    if !self.roots.iter().any(|r| r == id) {
                        return Err(format!("root '{id}' missing from root list"));
                    }
                }
            }
        }
        if let Some(root) = self.roots.iter().find(|r| !self.nodes.contains_key(*r)) {
            return Err(format!("root list names missing node '{root}'"));
        }
        Ok(())
    }
}

/// Iterator over a node's ancestors, nearest first.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    registry: &'a NodeRegistry,
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let id = self.next?;
        self.next = self.registry.parent(id);
        Some(id)
    }
}

// =========================================================================
// Tests
// =========================================================================
