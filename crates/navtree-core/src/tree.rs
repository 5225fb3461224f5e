//! Focus controller coordinating the registry, current focus, and events.
//!
//! # State machine
//!
//! Two observable states: `Unfocused` (no current focus) and
//! `Focused(id)`. `register` never changes state. `unregister` moves to
//! `Unfocused` (with one `blur`) only when it removes the focused node.
//! `focus` moves to `Focused(resolve_focus_target(id))` with blur-then-focus
//! emissions, or to `Unfocused` with a lone `blur` when nothing under `id`
//! can take focus. `blur` only notifies; [`FocusTree::clear_focus`] is the
//! state-changing counterpart.
//!
//! # Dispatch and re-entrancy
//!
//! Every operation commits its state change first, then queues its events
//! and delivers them before returning. Handlers receive `&mut FocusTree`, so
//! a `blur` handler may call [`FocusTree::focus`] directly. Events raised by
//! such a nested call are appended to the queue and delivered after the
//! events already pending, so listeners see transitions in the order they
//! were committed. A handler observing [`FocusTree::current_focus`] sees the
//! state after the whole transition.
//!
//! The engine does not bound re-entrancy: handlers that keep moving focus in
//! response to each other loop forever. Breaking such cycles is the
//! caller's responsibility.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::config::{NavTreeConfig, UnknownNodePolicy};
use crate::emitter::{FocusEmitter, FocusEventKind, Subscription};
use crate::error::FocusError;
use crate::intent::{DirectionResolver, Intent};
use crate::registry::{NodeId, NodeRegistry, RegisterOptions, TreeSnapshot};

/// Focus tree engine: registry, current focus, and focus/blur emitter.
#[derive(Debug, Default)]
pub struct FocusTree {
    registry: NodeRegistry,
    current: Option<NodeId>,
    emitter: FocusEmitter<FocusTree>,
    pending: VecDeque<(FocusEventKind, NodeId)>,
    dispatching: Rc<Cell<bool>>,
    config: NavTreeConfig,
}

/// Clears the dispatch flag when delivery ends, including by unwinding.
struct DispatchGuard(Rc<Cell<bool>>);

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl FocusTree {
    /// Create an empty tree with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with the given configuration.
    #[must_use]
    pub fn with_config(config: NavTreeConfig) -> Self {
        Self {
            registry: NodeRegistry::with_reparent_policy(config.reparent_policy),
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &NavTreeConfig {
        &self.config
    }

    /// Read-only access to the node registry.
    #[must_use]
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Currently focused node.
    #[inline]
    #[must_use]
    pub fn current_focus(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn is_focused(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }

    /// Owned copy of every node plus the current focus.
    #[must_use]
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            current_focus: self.current.clone(),
            nodes: self.registry.snapshot_nodes(),
        }
    }

    /// Subscribe to focus or blur notifications.
    ///
    /// The handler receives the tree and the affected id, and may call back
    /// into the tree.
    #[must_use = "dropping the Subscription unsubscribes the handler"]
    pub fn on(
        &mut self,
        kind: FocusEventKind,
        handler: impl Fn(&mut FocusTree, &str) + 'static,
    ) -> Subscription {
        self.emitter.on(kind, handler)
    }

    /// Number of live handlers for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: FocusEventKind) -> usize {
        self.emitter.listener_count(kind)
    }

    fn queue(&mut self, kind: FocusEventKind, id: NodeId) {
        self.pending.push_back((kind, id));
    }

    /// Deliver queued events in order.
    ///
    /// Nested calls made from a handler only queue; the outermost call
    /// drains the queue, including events those nested calls added.
    fn dispatch(&mut self) {
        if self.dispatching.get() {
            return;
        }
        self.dispatching.set(true);
        let _guard = DispatchGuard(Rc::clone(&self.dispatching));

        let mut queue = std::mem::take(&mut self.pending);
        while let Some((kind, id)) = queue.pop_front() {
            #[cfg(feature = "tracing")]
            trace!(%kind, id = %id, "navtree: dispatch");
            let handlers = self.emitter.live_handlers(kind);
            for handler in &handlers {
                handler(self, &id);
            }
            queue.append(&mut self.pending);
        }
    }

    /// Register a node. Emits nothing.
    pub fn register(&mut self, id: &str, options: RegisterOptions) -> Result<(), FocusError> {
        self.registry.register(id, options).map(|_| ())
    }

    /// Remove a node and its subtree.
    ///
    /// If the current focus was removed, it is cleared and exactly one `blur`
    /// is emitted for it.
    pub fn unregister(&mut self, id: &str) -> Result<(), FocusError> {
        let Some(removed) = self.registry.remove_subtree(id) else {
            return match self.config.unknown_node_policy {
                UnknownNodePolicy::Ignore => Ok(()),
                UnknownNodePolicy::Error => Err(FocusError::UnknownNode { id: id.to_owned() }),
            };
        };

        let lost_focus = self
            .current
            .as_deref()
            .is_some_and(|current| removed.iter().any(|r| r == current));
        if lost_focus && let Some(prev) = self.current.take() {
            #[cfg(feature = "tracing")]
            debug!(id, blurred = %prev, "navtree: focused node unregistered");
            self.queue(FocusEventKind::Blur, prev);
            self.dispatch();
        }
        Ok(())
    }

    /// Follow children from `id` to the node that would receive focus.
    #[must_use]
    pub fn resolve_focus_target(&self, id: &str) -> Option<&str> {
        self.registry.resolve_focus_target(id)
    }

    /// Move focus to `id` (descending to its focus target), or re-focus the
    /// current node when `id` is `None`.
    ///
    /// Emits `blur(previous)` first when the target differs from the
    /// previous focus, then `focus(target)`. Returns the new focus. With no
    /// `id` and nothing focused, this is a no-op returning `Ok(None)`.
    ///
    /// When nothing under `id` can take focus, the previous focus is blurred
    /// and cleared, no `focus` is emitted, and `Ok(None)` is returned.
    pub fn focus(&mut self, id: Option<&str>) -> Result<Option<NodeId>, FocusError> {
        let start = match id {
            Some(id) if self.registry.contains(id) => id.to_owned(),
            Some(id) => return Err(FocusError::UnknownNode { id: id.to_owned() }),
            None => match self.current.clone() {
                Some(current) => current,
                None => return Ok(None),
            },
        };
        let target = self.registry.resolve_focus_target(&start).map(str::to_owned);

        let prev = self.current.take();
        if let Some(prev) = prev
            && target.as_deref() != Some(prev.as_str())
        {
            self.queue(FocusEventKind::Blur, prev);
        }

        let Some(target) = target else {
            #[cfg(feature = "tracing")]
            debug!(start = %start, "navtree: no focusable descendant");
            self.dispatch();
            return Ok(None);
        };

        #[cfg(feature = "tracing")]
        debug!(to = %target, "navtree: focus");

        self.current = Some(target.clone());
        self.registry.record_active_path(&target);
        self.queue(FocusEventKind::Focus, target.clone());
        self.dispatch();
        Ok(Some(target))
    }

    /// Emit `blur` for `id`, or for the current focus when `id` is `None`.
    ///
    /// This is a notification: focus state is left alone unless
    /// [`NavTreeConfig::clear_focus_on_blur`] is set and the blurred id is
    /// the current focus. Use [`FocusTree::clear_focus`] to drop focus
    /// explicitly.
    pub fn blur(&mut self, id: Option<&str>) {
        let target = match (id, self.current.as_deref()) {
            (Some(id), _) => id.to_owned(),
            (None, Some(current)) => current.to_owned(),
            (None, None) => return,
        };
        if self.config.clear_focus_on_blur && self.is_focused(&target) {
            self.current = None;
        }
        self.queue(FocusEventKind::Blur, target);
        self.dispatch();
    }

    /// Drop the current focus, emitting `blur` for it.
    ///
    /// Returns the previously focused id.
    pub fn clear_focus(&mut self) -> Option<NodeId> {
        let prev = self.current.take()?;
        #[cfg(feature = "tracing")]
        debug!(blurred = %prev, "navtree: focus cleared");
        self.queue(FocusEventKind::Blur, prev.clone());
        self.dispatch();
        Some(prev)
    }

    /// Resolve `intent` from the current focus and focus the result.
    ///
    /// Returns `Ok(None)` without emitting anything when nothing is focused
    /// or the resolver has no target.
    pub fn move_focus<R>(
        &mut self,
        intent: Intent,
        resolver: &R,
    ) -> Result<Option<NodeId>, FocusError>
    where
        R: DirectionResolver + ?Sized,
    {
        let Some(from) = self.current.as_deref() else {
            return Ok(None);
        };
        let Some(target) = resolver.resolve(&self.registry, from, intent) else {
            #[cfg(feature = "tracing")]
            trace!(from, %intent, "navtree: no target");
            return Ok(None);
        };
        self.focus(Some(&target))
    }
}

// =========================================================================
// Tests
// =========================================================================
