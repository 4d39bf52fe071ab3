//! Per-frame classification and cooldown-gated dispatch.
//!
//! [`GestureController`] owns everything that survives between frames: the
//! policy (with its centroid histories), the cooldown gate, the latched label
//! and the hand-presence flag.  The caller owns the controller and feeds it
//! one [`HandFrame`] at a time.

use tracing::{debug, info};

use crate::action::{action_label, Action, Key, KeyBindings};
use crate::classifier::{GesturePolicy, MotionClassifier, PolicyKind, StaticPoseClassifier};
use crate::config::ControlConfig;
use crate::cooldown::{CooldownTimer, GateState};
use crate::fingers::{fingers_up, FingerState};
use crate::landmarks::{HandFrame, HandLandmarks, Landmark};

// ════════════════════════════════════════════════════════════════════════════
// KeySink
// ════════════════════════════════════════════════════════════════════════════

/// Where dispatched keys go.  Fire-and-forget: nothing is returned.
pub trait KeySink {
    fn send_key(&mut self, key: Key);
}

impl<S: KeySink + ?Sized> KeySink for &mut S {
    fn send_key(&mut self, key: Key) {
        (**self).send_key(key)
    }
}

impl<S: KeySink + ?Sized> KeySink for Box<S> {
    fn send_key(&mut self, key: Key) {
        (**self).send_key(key)
    }
}

/// Sink that just remembers what it was sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyLog {
    pub keys: Vec<Key>,
}

impl KeySink for KeyLog {
    fn send_key(&mut self, key: Key) {
        self.keys.push(key);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameReport
// ════════════════════════════════════════════════════════════════════════════

/// What one hand looked like this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandReport {
    /// The hand as classified: confidence-filtered, and mirrored if configured.
    pub landmarks: HandLandmarks,
    /// Tracking slot; stays with the same hand while it is in view.
    pub slot:      usize,
    pub fingers:   FingerState,
    pub action:    Action,
    /// True when this hand's action made it through the gate.
    pub dispatched: bool,
}

/// Outcome of [`GestureController::process_frame`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub hands:      Vec<HandReport>,
    pub dispatched: Vec<(Action, Key)>,
}

impl FrameReport {
    pub fn hand_present(&self) -> bool {
        !self.hands.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureController
// ════════════════════════════════════════════════════════════════════════════

pub struct GestureController {
    config:       ControlConfig,
    policy:       Box<dyn GesturePolicy>,
    bindings:     KeyBindings,
    gate:         CooldownTimer,
    latched:      Option<Action>,
    hand_present: bool,
    /// Last centroid of the hand held in each slot; `None` for a free slot.
    tracks:       Vec<Option<Landmark>>,
}

impl GestureController {
    pub fn new(config: ControlConfig) -> Self {
        let policy: Box<dyn GesturePolicy> = match config.policy {
            PolicyKind::Static => Box::new(StaticPoseClassifier),
            PolicyKind::Motion => Box::new(MotionClassifier::new(
                config.history_window_size,
                config.movement_threshold_px,
                config.frame_width,
                config.frame_height,
            )),
        };
        Self::with_policy(config, policy)
    }

    /// Use a caller-supplied policy instead of the one named in `config`.
    pub fn with_policy(config: ControlConfig, policy: Box<dyn GesturePolicy>) -> Self {
        let bindings = config.bindings.unwrap_or_else(|| KeyBindings::for_policy(policy.kind()));
        GestureController {
            gate: CooldownTimer::new(config.cooldown_seconds),
            config,
            policy,
            bindings,
            latched: None,
            hand_present: false,
            tracks: Vec::new(),
        }
    }

    /// Classify every usable hand in `frame` and forward at most what the
    /// cooldown gate allows to `sink`.  `frame.timestamp` is the clock.
    pub fn process_frame<S: KeySink + ?Sized>(&mut self, frame: &HandFrame, sink: &mut S) -> FrameReport {
        let now = frame.timestamp;
        let min_conf = self.config.min_detection_confidence;

        let hands: Vec<_> = frame
            .hands
            .iter()
            .filter(|h| h.confidence >= min_conf)
            .take(self.config.max_hands)
            .map(|h| if self.config.mirror_input { h.mirrored() } else { h.clone() })
            .collect();

        if hands.is_empty() {
            if self.hand_present {
                debug!(t = now, "hand lost, clearing history and label");
            }
            self.policy.reset();
            self.latched = None;
            self.hand_present = false;
            self.tracks.clear();
            return FrameReport::default();
        }

        let centroids: Vec<Landmark> = hands.iter().map(HandLandmarks::centroid).collect();
        let slots = assign_slots(&self.tracks, &centroids);

        let mut tracks = vec![None; slots.iter().map(|s| s + 1).max().unwrap_or(0)];
        for (&slot, &c) in slots.iter().zip(&centroids) {
            tracks[slot] = Some(c);
        }
        for (slot, old) in self.tracks.iter().enumerate() {
            if old.is_some() && tracks.get(slot).map_or(true, Option::is_none) {
                debug!(slot, "hand left the frame");
                self.policy.hand_lost(slot);
            }
        }
        self.tracks = tracks;
        self.hand_present = true;

        let mut report = FrameReport::default();
        for (hand, slot) in hands.into_iter().zip(slots) {
            let fingers = fingers_up(&hand);
            let action = self.policy.classify(slot, &hand, fingers);
            debug!(slot, %fingers, %action, "classified");

            let mut dispatched = false;
            if let Some(key) = self.bindings.key_for(action) {
                if self.gate.try_fire(now) {
                    info!(t = now, %action, %key, "dispatch");
                    sink.send_key(key);
                    self.latched = Some(action);
                    report.dispatched.push((action, key));
                    dispatched = true;
                }
            }
            report.hands.push(HandReport { landmarks: hand, slot, fingers, action, dispatched });
        }
        report
    }

    /// Drop all per-run state, as if no frame had been seen.
    pub fn reset(&mut self) {
        self.policy.reset();
        self.gate.reset();
        self.latched = None;
        self.hand_present = false;
        self.tracks.clear();
    }

    pub fn latched_action(&self) -> Option<Action> { self.latched }

    /// Overlay text for the latched action.
    pub fn label(&self) -> Option<&'static str> {
        self.latched.and_then(|a| action_label(a, self.policy.kind()))
    }

    pub fn hand_present(&self) -> bool { self.hand_present }

    pub fn gate_state(&self, now: f64) -> GateState { self.gate.state(now) }

    pub fn policy(&self) -> PolicyKind { self.policy.kind() }

    pub fn bindings(&self) -> &KeyBindings { &self.bindings }

    pub fn config(&self) -> &ControlConfig { &self.config }
}

/// Give each hand a slot.  A hand takes the slot whose last centroid is
/// nearest to its own (closest pairs first); hands with no match take the
/// lowest free slot.  Returns one slot per centroid, in input order.
fn assign_slots(tracks: &[Option<Landmark>], centroids: &[Landmark]) -> Vec<usize> {
    let mut pairs = Vec::new();
    for (h, c) in centroids.iter().enumerate() {
        for (s, t) in tracks.iter().enumerate() {
            if let Some(t) = t {
                let d = (c.x - t.x).powi(2) + (c.y - t.y).powi(2);
                pairs.push((d, h, s));
            }
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut taken = vec![false; tracks.len() + centroids.len()];
    let mut matched: Vec<Option<usize>> = vec![None; centroids.len()];
    for (_, h, s) in pairs {
        if matched[h].is_none() && !taken[s] {
            matched[h] = Some(s);
            taken[s] = true;
        }
    }

    let mut slots = Vec::with_capacity(centroids.len());
    for m in matched {
        let slot = match m {
            Some(s) => s,
            None => {
                let free = taken.iter().position(|t| !t).unwrap_or(taken.len());
                if free == taken.len() {
                    taken.push(true);
                } else {
                    taken[free] = true;
                }
                free
            }
        };
        slots.push(slot);
    }
    slots
}
