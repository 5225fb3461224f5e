//! Directional intents and the resolver seam.
//!
//! Raw input (key codes, remote buttons, gamepad axes) is mapped to an
//! [`Intent`] outside the engine. A [`DirectionResolver`] then turns
//! "intent + current focus" into a concrete target id, which the engine
//! focuses through the normal descent path.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::registry::{NodeId, NodeRegistry};

/// Abstract navigation command, independent of the input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    /// Activate the focused node.
    Enter,
}

/// Layout axis a directional intent moves along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Intent {
    /// All five intents.
    pub const ALL: [Intent; 5] = [
        Intent::Up,
        Intent::Down,
        Intent::Left,
        Intent::Right,
        Intent::Enter,
    ];

    /// Axis of movement, `None` for [`Intent::Enter`].
    #[must_use]
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Self::Left | Self::Right => Some(Axis::Horizontal),
            Self::Up | Self::Down => Some(Axis::Vertical),
            Self::Enter => None,
        }
    }

    /// Whether the intent moves toward later children (right/down).
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Enter => "enter",
        }
    }

    /// Parse an intent name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "enter" => Some(Self::Enter),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for [`Intent::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIntentError(pub String);

impl fmt::Display for ParseIntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown intent '{}' (expected up|down|left|right|enter)",
            self.0
        )
    }
}

impl std::error::Error for ParseIntentError {}

impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseIntentError(s.to_owned()))
    }
}

/// Maps an intent at the current focus to a target node id.
///
/// Implementations only read the tree. Returning `None` means the move has
/// no target and the engine leaves focus untouched.
pub trait DirectionResolver {
    fn resolve(&self, tree: &NodeRegistry, from: &str, intent: Intent) -> Option<NodeId>;
}

impl<F> DirectionResolver for F
where
    F: Fn(&NodeRegistry, &str, Intent) -> Option<NodeId>,
{
    fn resolve(&self, tree: &NodeRegistry, from: &str, intent: Intent) -> Option<NodeId> {
        self(tree, from, intent)
    }
}
