//! Errors returned by focus tree operations.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Empty id | `register("")` | [`FocusError::InvalidId`], nothing changes |
//! | Missing parent | `parent` names an unregistered node | [`FocusError::UnknownParent`] |
//! | Missing node | `focus` of an unregistered id, or `unregister` under [`UnknownNodePolicy::Error`] | [`FocusError::UnknownNode`] |
//! | Re-parent | existing id registered under a different parent with [`ReparentPolicy::Reject`] | [`FocusError::Reparent`] |
//!
//! Listener panics are not represented here: they unwind through the
//! operation that emitted the event.
//!
//! [`UnknownNodePolicy::Error`]: crate::config::UnknownNodePolicy::Error
//! [`ReparentPolicy::Reject`]: crate::config::ReparentPolicy::Reject

use std::fmt;

use crate::registry::NodeId;

/// Errors from registry and focus operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusError {
    /// The node id was empty or blank.
    InvalidId,
    /// `parent` referenced a node that is not registered.
    UnknownParent { id: NodeId, parent: NodeId },
    /// The referenced node is not registered.
    UnknownNode { id: NodeId },
    /// An existing node was registered again under a different parent.
    Reparent {
        id: NodeId,
        current: Option<NodeId>,
        requested: NodeId,
    },
}

impl fmt::Display for FocusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "node id must not be empty"),
            Self::UnknownParent { id, parent } => {
                write!(f, "cannot register '{id}': unknown parent '{parent}'")
            }
            Self::UnknownNode { id } => write!(f, "unknown node '{id}'"),
            Self::Reparent {
                id,
                current: Some(current),
                requested,
            } => write!(
                f,
                "cannot move '{id}' from parent '{current}' to '{requested}'"
            ),
            Self::Reparent {
                id,
                current: None,
                requested,
            } => write!(f, "cannot move root '{id}' under '{requested}'"),
        }
    }
}

impl std::error::Error for FocusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(FocusError::InvalidId.to_string(), "node id must not be empty");
        assert_eq!(
            FocusError::UnknownParent {
                id: "a".into(),
                parent: "p".into()
            }
            .to_string(),
            "cannot register 'a': unknown parent 'p'"
        );
        assert_eq!(
            FocusError::UnknownNode { id: "x".into() }.to_string(),
            "unknown node 'x'"
        );
        assert_eq!(
            FocusError::Reparent {
                id: "a".into(),
                current: Some("p".into()),
                requested: "q".into()
            }
            .to_string(),
            "cannot move 'a' from parent 'p' to 'q'"
        );
        assert_eq!(
            FocusError::Reparent {
                id: "a".into(),
                current: None,
                requested: "q".into()
            }
            .to_string(),
            "cannot move root 'a' under 'q'"
        );
    }

    #[test]
    fn is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(FocusError::InvalidId);
        assert!(err.source().is_none());
    }
}
