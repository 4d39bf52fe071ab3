//! # surfer_control
//!
//! Hand-gesture controller for runner games (Subway Surfers and friends).
//! Hand frames come from a source thread, go through
//! [`gesture_core::GestureController`] and come out as arrow/space key presses
//! on a [`KeySink`](gesture_core::KeySink).
//!
//! ## Gesture → Key mapping
//!
//! | Policy | Gesture | Action | Key |
//! |---|---|---|---|
//! | static | index finger only | Swipe Right | `right` |
//! | static | index + middle | Swipe Left | `left` |
//! | static | open palm | Jump | `up` |
//! | static | fist | Roll (Hoverboard) | `down` |
//! | motion | open palm moved left/right | Swipe Left/Right | `left` / `right` |
//! | motion | open palm moved up/down | Jump / Slide | `up` / `down` |
//! | motion | fist | Hoverboard | `space` |
//!
//! Keys are rate-limited by a shared cooldown (0.3 s by default).
//!
//! ## Feature flags
//!
//! * (default) **Simulation mode**: the overlay window's keyboard and mouse
//!   drive a synthetic hand.
//! * `leap` **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `T` `I` `M` `R` `P` | Toggle thumb / index / middle / ring / pinky |
//! | `O` | Open palm |
//! | `F` | Fist |
//! | `1` / `2` | Point / peace sign |
//! | `H` | Hide or show the hand |
//! | mouse | Move the hand |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod recording;
pub mod sink;
pub mod source;
pub mod visualizer;
