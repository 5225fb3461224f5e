//! Synchronous focus/blur handler registry.
//!
//! # Design
//!
//! Handlers are stored per [`FocusEventKind`] as `Weak` references; the
//! strong `Rc` lives in the [`Subscription`] guard returned by
//! [`FocusEmitter::on`]. Dropping the guard unsubscribes. Dead entries are
//! pruned on the next emission of that kind.
//!
//! Every handler receives a mutable context `C` alongside the node id. For
//! [`FocusTree`](crate::FocusTree) the context is the tree itself, which lets
//! a handler call back into the engine.
//!
//! # Invariants
//!
//! 1. Handlers run synchronously, in registration order.
//! 2. A handler registered for one kind never sees the other kind.
//! 3. The handler list is snapshotted before dispatch: a handler subscribed
//!    during an emission first runs on the next one.
//! 4. Panics in a handler are not caught; they unwind into the caller of the
//!    engine operation that emitted the event. Handlers that already ran stay
//!    run, later handlers are skipped.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

/// Handler signature: mutable context plus the affected node id.
pub type Handler<C> = dyn Fn(&mut C, &str);

/// Kind of lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusEventKind {
    Focus,
    Blur,
}

impl FocusEventKind {
    pub const ALL: [FocusEventKind; 2] = [FocusEventKind::Focus, FocusEventKind::Blur];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }

    /// Parse an event name (`"focus"` or `"blur"`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "focus" => Some(Self::Focus),
            "blur" => Some(Self::Blur),
            _ => None,
        }
    }
}

impl fmt::Display for FocusEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-instance pub/sub channel for focus and blur notifications.
pub struct FocusEmitter<C: ?Sized + 'static> {
    focus: Vec<Weak<Handler<C>>>,
    blur: Vec<Weak<Handler<C>>>,
}

impl<C: ?Sized + 'static> Default for FocusEmitter<C> {
    fn default() -> Self {
        Self {
            focus: Vec::new(),
            blur: Vec::new(),
        }
    }
}

impl<C: ?Sized + 'static> FocusEmitter<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`.
    ///
    /// The handler stays registered for as long as the returned guard lives.
    #[must_use = "dropping the Subscription unsubscribes the handler"]
    pub fn on(
        &mut self,
        kind: FocusEventKind,
        handler: impl Fn(&mut C, &str) + 'static,
    ) -> Subscription {
        let strong: Rc<Handler<C>> = Rc::new(handler);
        self.handlers_mut(kind).push(Rc::downgrade(&strong));
        Subscription {
            kind,
            _guard: Box::new(strong),
        }
    }

    /// Prune dead entries for `kind` and return strong references to the
    /// live handlers, in registration order.
    ///
    /// The returned list does not borrow the emitter, so the caller may hand
    /// out `&mut C` even when the emitter lives inside `C`.
    pub fn live_handlers(&mut self, kind: FocusEventKind) -> Vec<Rc<Handler<C>>> {
        let handlers = self.handlers_mut(kind);
        handlers.retain(|w| w.strong_count() > 0);
        handlers.iter().filter_map(Weak::upgrade).collect()
    }

    /// Invoke every live handler for `kind` with `ctx` and `id`.
    ///
    /// Returns the number of handlers invoked.
    pub fn emit(&mut self, ctx: &mut C, kind: FocusEventKind, id: &str) -> usize {
        // Upgrade before calling so a handler dropping its own guard cannot
        // shorten the list mid-dispatch.
        let live = self.live_handlers(kind);
        for handler in &live {
            handler(ctx, id);
        }
        live.len()
    }

    /// Number of live handlers for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: FocusEventKind) -> usize {
        let handlers = match kind {
            FocusEventKind::Focus => &self.focus,
            FocusEventKind::Blur => &self.blur,
        };
        handlers.iter().filter(|w| w.strong_count() > 0).count()
    }

    fn handlers_mut(&mut self, kind: FocusEventKind) -> &mut Vec<Weak<Handler<C>>> {
        match kind {
            FocusEventKind::Focus => &mut self.focus,
            FocusEventKind::Blur => &mut self.blur,
        }
    }
}

impl<C: ?Sized + 'static> fmt::Debug for FocusEmitter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusEmitter")
            .field("focus_listeners", &self.listener_count(FocusEventKind::Focus))
            .field("blur_listeners", &self.listener_count(FocusEventKind::Blur))
            .finish()
    }
}

/// RAII guard for a focus/blur handler.
///
/// Dropping the guard drops the strong `Rc`, so the `Weak` held by the
/// emitter fails to upgrade from then on.
pub struct Subscription {
    kind: FocusEventKind,
    _guard: Box<dyn Any>,
}

impl Subscription {
    /// Kind of event this subscription listens to.
    #[must_use]
    pub fn kind(&self) -> FocusEventKind {
        self.kind
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    type Seen = Vec<String>;

    #[test]
    fn emit_reaches_handler_with_context() {
        let mut emitter: FocusEmitter<Seen> = FocusEmitter::new();
        let _sub = emitter.on(FocusEventKind::Focus, |seen, id| seen.push(id.to_owned()));

        let mut seen = Seen::new();
        assert_eq!(emitter.emit(&mut seen, FocusEventKind::Focus, "a"), 1);
        assert_eq!(seen, ["a"]);
    }

    #[test]
    fn kinds_are_isolated() {
        let mut emitter: FocusEmitter<u32> = FocusEmitter::new();
        let _sub = emitter.on(FocusEventKind::Blur, |count, _| *count += 1);

        let mut count = 0;
        emitter.emit(&mut count, FocusEventKind::Focus, "a");
        assert_eq!(count, 0);
        emitter.emit(&mut count, FocusEventKind::Blur, "a");
        assert_eq!(count, 1);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let mut emitter: FocusEmitter<Vec<u32>> = FocusEmitter::new();
        let subs: Vec<_> = (0..3)
            .map(|i| emitter.on(FocusEventKind::Focus, move |order, _| order.push(i)))
            .collect();

        let mut order = Vec::new();
        emitter.emit(&mut order, FocusEventKind::Focus, "x");
        assert_eq!(order, [0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let mut emitter: FocusEmitter<()> = FocusEmitter::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);

        let sub = emitter.on(FocusEventKind::Focus, move |_, _| {
            count_clone.set(count_clone.get() + 1);
        });
        emitter.emit(&mut (), FocusEventKind::Focus, "a");
        assert_eq!(count.get(), 1);

        drop(sub);
        assert_eq!(emitter.listener_count(FocusEventKind::Focus), 0);
        assert_eq!(emitter.emit(&mut (), FocusEventKind::Focus, "a"), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_count_ignores_dropped_guards_before_emission() {
        let mut emitter: FocusEmitter<()> = FocusEmitter::new();
        let keep = emitter.on(FocusEventKind::Blur, |_, _| {});
        let gone = emitter.on(FocusEventKind::Blur, |_, _| {});
        assert_eq!(emitter.listener_count(FocusEventKind::Blur), 2);

        drop(gone);
        assert_eq!(emitter.listener_count(FocusEventKind::Blur), 1);
        assert!(format!("{emitter:?}").contains("blur_listeners: 1"));
        drop(keep);
    }

    #[test]
    fn partial_drop_keeps_remaining_order() {
        let mut emitter: FocusEmitter<Vec<u32>> = FocusEmitter::new();
        let s1 = emitter.on(FocusEventKind::Blur, |order, _| order.push(1));
        let s2 = emitter.on(FocusEventKind::Blur, |order, _| order.push(2));
        let s3 = emitter.on(FocusEventKind::Blur, |order, _| order.push(3));

        drop(s2);
        let mut order = Vec::new();
        emitter.emit(&mut order, FocusEventKind::Blur, "a");
        assert_eq!(order, [1, 3]);
        drop((s1, s3));
    }

    #[test]
    fn live_handlers_outlive_their_guard() {
        let mut emitter: FocusEmitter<Seen> = FocusEmitter::new();
        let sub = emitter.on(FocusEventKind::Focus, |seen, id| seen.push(id.to_owned()));

        let live = emitter.live_handlers(FocusEventKind::Focus);
        drop(sub);
        let mut seen = Seen::new();
        for handler in &live {
            handler(&mut seen, "late");
        }
        assert_eq!(seen, ["late"]);
    }

    #[test]
    #[should_panic(expected = "listener failed")]
    fn handler_panic_propagates() {
        let mut emitter: FocusEmitter<()> = FocusEmitter::new();
        let _sub = emitter.on(FocusEventKind::Focus, |_, _| panic!("listener failed"));
        emitter.emit(&mut (), FocusEventKind::Focus, "a");
    }

    #[test]
    fn handler_sharing_state_through_rc() {
        let mut emitter: FocusEmitter<()> = FocusEmitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = emitter.on(FocusEventKind::Blur, move |_, id| {
            seen_clone.borrow_mut().push(id.to_owned());
        });

        emitter.emit(&mut (), FocusEventKind::Blur, "a");
        emitter.emit(&mut (), FocusEventKind::Blur, "b");
        assert_eq!(*seen.borrow(), ["a", "b"]);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in FocusEventKind::ALL {
            assert_eq!(FocusEventKind::parse(kind.as_str()), Some(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert_eq!(FocusEventKind::parse("select"), None);
    }

    #[test]
    fn debug_reports_counts() {
        let mut emitter: FocusEmitter<()> = FocusEmitter::new();
        let sub = emitter.on(FocusEventKind::Blur, |_, _| {});
        let dbg = format!("{emitter:?}");
        assert!(dbg.contains("blur_listeners: 1"));
        assert!(format!("{sub:?}").contains("Blur"));
    }
}
