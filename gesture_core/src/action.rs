//! Game actions, the keys that trigger them, and the table between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::PolicyKind;

// ════════════════════════════════════════════════════════════════════════════
// Action
// ════════════════════════════════════════════════════════════════════════════

/// A discrete runner-game command produced by classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Slide,
    Hoverboard,
    /// Nothing recognised this frame.
    None,
}

impl Action {
    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }

    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft   => "move_left",
            Action::MoveRight  => "move_right",
            Action::Jump       => "jump",
            Action::Slide      => "slide",
            Action::Hoverboard => "hoverboard",
            Action::None       => "none",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Key
// ════════════════════════════════════════════════════════════════════════════

/// Keys the game understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
}

impl Key {
    /// Key name as understood by common key-injection tools.
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Left  => "left",
            Key::Right => "right",
            Key::Up    => "up",
            Key::Down  => "down",
            Key::Space => "space",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyBindings
// ════════════════════════════════════════════════════════════════════════════

/// Action → key table.
///
/// The two policies disagree on the all-closed fist: the static pose policy
/// reads it as a roll (`down`), the motion policy as the hoverboard (`space`).
/// Their defaults keep those meanings; a config file may override either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub move_left:  Key,
    pub move_right: Key,
    pub jump:       Key,
    pub slide:      Key,
    pub hoverboard: Key,
}

impl KeyBindings {
    pub fn for_policy(policy: PolicyKind) -> Self {
        let hoverboard = match policy {
            PolicyKind::Static => Key::Down,
            PolicyKind::Motion => Key::Space,
        };
        KeyBindings {
            move_left:  Key::Left,
            move_right: Key::Right,
            jump:       Key::Up,
            slide:      Key::Down,
            hoverboard,
        }
    }

    pub fn key_for(&self, action: Action) -> Option<Key> {
        match action {
            Action::MoveLeft   => Some(self.move_left),
            Action::MoveRight  => Some(self.move_right),
            Action::Jump       => Some(self.jump),
            Action::Slide      => Some(self.slide),
            Action::Hoverboard => Some(self.hoverboard),
            Action::None       => None,
        }
    }
}

/// Overlay text for a latched action.
pub fn action_label(action: Action, policy: PolicyKind) -> Option<&'static str> {
    let label = match (action, policy) {
        (Action::MoveLeft, _)                      => "Swipe Left",
        (Action::MoveRight, _)                     => "Swipe Right",
        (Action::Jump, _)                          => "Jump",
        (Action::Slide, _)                         => "Slide",
        (Action::Hoverboard, PolicyKind::Static)   => "Roll (Hoverboard)",
        (Action::Hoverboard, PolicyKind::Motion)   => "Hoverboard",
        (Action::None, _)                          => return None,
    };
    Some(label)
}
