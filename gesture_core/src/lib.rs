//! # gesture_core
//!
//! Turn 21-point hand landmarks into runner-game key presses.
//!
//! Each frame, [`fingers_up`] reduces a hand to five extended/curled flags.
//! A [`GesturePolicy`] maps those flags (and, for the motion policy, recent
//! hand travel) to an [`Action`]; [`GestureController`] gates actions through
//! a shared cooldown and forwards their keys to a [`KeySink`].
//!
//! ## Policies
//!
//! | Pose | Static policy | Motion policy |
//! |---|---|---|
//! | index only `[0,1,0,0,0]` | MoveRight → `right` | n/a |
//! | index + middle `[0,1,1,0,0]` | MoveLeft → `left` | n/a |
//! | open palm `[1,1,1,1,1]` | Jump → `up` | swipe: Left / Right / Jump / Slide |
//! | fist `[0,0,0,0,0]` | Hoverboard (roll) → `down` | Hoverboard → `space` |
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_core::{ControlConfig, FingerState, GestureController, HandFrame, Key, KeyLog};
//! use gesture_core::synthetic::pose_at;
//!
//! let mut controller = GestureController::new(ControlConfig::default());
//! let mut sink = KeyLog::default();
//!
//! let point = pose_at(0.5, 0.5, FingerState::from_bits([0, 1, 0, 0, 0]));
//! controller.process_frame(&HandFrame::single(0.0, point), &mut sink);
//!
//! assert_eq!(sink.keys, vec![Key::Right]);
//! ```

pub mod action;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod cooldown;
pub mod fingers;
pub mod history;
pub mod landmarks;
pub mod synthetic;

pub use action::{action_label, Action, Key, KeyBindings};
pub use classifier::{
    lookup_pose, swipe_action, GesturePolicy, MotionClassifier, PolicyKind, StaticPoseClassifier,
};
pub use config::{ConfigError, ControlConfig};
pub use controller::{FrameReport, GestureController, HandReport, KeyLog, KeySink};
pub use cooldown::{CooldownTimer, GateState};
pub use fingers::{fingers_up, Finger, FingerState};
pub use history::{Point, PositionHistory};
pub use landmarks::{HandFrame, HandLandmarks, Landmark, LandmarkError};
