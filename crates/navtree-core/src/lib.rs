#![forbid(unsafe_code)]

//! Core: focus tree registry, focus controller, and focus/blur events.
//!
//! # Role in navtree
//! `navtree-core` owns the logical focus tree used for directional
//! (remote-control or keyboard) navigation. Hosts register nodes for their UI
//! regions, ask the engine to focus a node, and subscribe to `focus`/`blur`
//! notifications to drive highlighting.
//!
//! # Primary responsibilities
//! - **NodeRegistry**: flat id → node arena with parent/child back-references.
//! - **FocusTree**: current focus, descent to a focusable leaf, and strict
//!   blur-before-focus emission.
//! - **FocusEmitter**: synchronous, in-order handler registry.
//! - **DirectionResolver**: the seam through which an [`Intent`] becomes a
//!   concrete focus target (implementations live in `navtree-nav`).
//!
//! # Example
//!
//! ```
//! use navtree_core::{FocusEventKind, FocusTree, RegisterOptions};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut tree = FocusTree::new();
//! tree.register("root", RegisterOptions::new()).unwrap();
//! tree.register("a", RegisterOptions::new().with_parent("root")).unwrap();
//! tree.register("b", RegisterOptions::new().with_parent("root")).unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&seen);
//! let _sub = tree.on(FocusEventKind::Focus, move |_, id| {
//!     log.borrow_mut().push(id.to_owned());
//! });
//!
//! tree.focus(Some("root")).unwrap();
//! assert_eq!(tree.current_focus(), Some("a"));
//! assert_eq!(*seen.borrow(), vec!["a".to_owned()]);
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod intent;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod registry;
pub mod tree;

pub use config::{ConfigError, ConfigParse, NavTreeConfig, ReparentPolicy, UnknownNodePolicy};
pub use emitter::{FocusEmitter, FocusEventKind, Subscription};
pub use error::FocusError;
pub use intent::{Axis, DirectionResolver, Intent};
pub use registry::{
    Node, NodeId, NodeRegistry, NodeSnapshot, Orientation, RegisterOptions, TreeSnapshot,
};
pub use tree::FocusTree;
