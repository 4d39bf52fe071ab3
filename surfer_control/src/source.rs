//! Hand sources: LeapMotion hardware, the keyboard/mouse driven simulated
//! hand and recorded-session replay.
//!
//! Every source runs on its own thread and delivers one [`HandFrame`] per
//! captured frame over an `mpsc` channel.  The frame loop doesn't need to know
//! where frames came from.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use gesture_core::synthetic;
use gesture_core::{Finger, FingerState, HandFrame};
use tracing::{debug, info, warn};

use crate::recording::{read_frames, RecordingError};

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
///
/// Implementations return when the receiving end hangs up.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<H: HandSource>(source: H) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Leap joints are projected onto the sensor's top-down (x, z) plane so that a
/// palm-down hand looks like an upright hand facing a mirror: fingers pointing
/// away from the user read as "up", curled fingertips fold back toward the
/// wrist.  The interaction volume is ±200 mm across and ±150 mm deep.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    pub start: Instant,
}

#[cfg(feature = "leap")]
impl Default for LeapHandSource {
    fn default() -> Self {
        LeapHandSource { start: Instant::now() }
    }
}

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("failed to create LeapC connection: {e:?}");
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {e:?}");
            return;
        }
        info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands = frame.hands().filter_map(|h| leap_landmarks(&h)).collect();
                let frame = HandFrame {
                    timestamp: self.start.elapsed().as_secs_f64(),
                    hands,
                };
                if tx.send(frame).is_err() {
                    return;
                }
            }
        }
    }
}

/// Map one Leap hand into the 21-point layout.
#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::Hand) -> Option<gesture_core::HandLandmarks> {
    use gesture_core::landmarks::LANDMARK_COUNT;
    use gesture_core::{HandLandmarks, Landmark};

    const HALF_WIDTH_MM: f32 = 200.0;
    const HALF_DEPTH_MM: f32 = 150.0;

    let project = |x: f32, y: f32, z: f32| Landmark {
        x: ((x + HALF_WIDTH_MM) / (2.0 * HALF_WIDTH_MM)).clamp(0.0, 1.0),
        y: ((z + HALF_DEPTH_MM) / (2.0 * HALF_DEPTH_MM)).clamp(0.0, 1.0),
        z: y,
    };

    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 {
        return None;
    }

    let mut pts = [Landmark::default(); LANDMARK_COUNT];

    let wrist = digits[2].metacarpal().prev_joint();
    pts[0] = project(wrist.x, wrist.y, wrist.z);

    for (f, digit) in digits.iter().take(5).enumerate() {
        let base = 1 + f * 4;
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        for (j, p) in joints.iter().enumerate() {
            pts[base + j] = project(p.x, p.y, p.z);
        }
    }
    Some(HandLandmarks::new(pts))
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the overlay window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    ToggleFinger(Finger),
    Pose(FingerState),
    /// Show or hide the hand, to produce detection gaps.
    ToggleHand,
    /// Move the hand centroid, normalized coordinates.
    MoveTo { x: f32, y: f32 },
}

/// The simulated hand.
#[derive(Clone, Debug, PartialEq)]
pub struct SimHand {
    pub visible: bool,
    pub fingers: FingerState,
    pub x:       f32,
    pub y:       f32,
    pub span:    f32,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand {
            visible: true,
            // Thumb + pinky maps to no action under either policy.
            fingers: FingerState::from_bits([1, 0, 0, 0, 1]),
            x:       0.5,
            y:       0.55,
            span:    synthetic::DEFAULT_SPAN,
        }
    }
}

impl SimHand {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::ToggleFinger(f) => self.fingers.toggle(f),
            SimInput::Pose(state)     => self.fingers = state,
            SimInput::ToggleHand      => self.visible = !self.visible,
            SimInput::MoveTo { x, y } => {
                self.x = x.clamp(0.0, 1.0);
                self.y = y.clamp(0.0, 1.0);
            }
        }
    }

    pub fn frame(&self, timestamp: f64) -> HandFrame {
        if !self.visible {
            return HandFrame::empty(timestamp);
        }
        HandFrame::single(timestamp, synthetic::pose(self.x, self.y, self.fingers, self.span))
    }
}

/// Hand source driven by [`SimInput`] events from the overlay window.
///
/// Emits the current [`SimHand`] at a fixed rate, so held poses and mouse
/// swipes look to the controller like a steady camera feed.
pub struct SimHandSource {
    pub rx:             Receiver<SimInput>,
    pub frame_interval: Duration,
    pub hand:           SimHand,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>, fps: u32) -> Self {
        SimHandSource {
            rx,
            frame_interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            hand: SimHand::default(),
        }
    }
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        let SimHandSource { rx, frame_interval, mut hand } = *self;
        let start = Instant::now();

        loop {
            loop {
                match rx.try_recv() {
                    Ok(input) => {
                        debug!(?input, "sim input");
                        hand.apply(input);
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            if tx.send(hand.frame(start.elapsed().as_secs_f64())).is_err() {
                return;
            }
            thread::sleep(frame_interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayHandSource: recorded NDJSON session
// ════════════════════════════════════════════════════════════════════════════

/// Replays frames written by [`FrameRecorder`](crate::recording::FrameRecorder).
pub struct ReplayHandSource {
    pub frames: Vec<HandFrame>,
    /// Sleep between frames by their recorded timestamp gaps.
    pub realtime: bool,
}

impl ReplayHandSource {
    pub fn open(path: impl AsRef<Path>, realtime: bool) -> Result<Self, RecordingError> {
        let frames = read_frames(path)?;
        Ok(ReplayHandSource { frames, realtime })
    }
}

impl HandSource for ReplayHandSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        info!(frames = self.frames.len(), realtime = self.realtime, "replay started");
        let mut prev: Option<f64> = None;
        for frame in self.frames {
            if self.realtime {
                if let Some(p) = prev {
                    let gap = frame.timestamp - p;
                    if gap > 0.0 {
                        match Duration::try_from_secs_f64(gap) {
                            Ok(d)  => thread::sleep(d),
                            Err(e) => warn!(gap, "unusable timestamp gap, not pacing: {e}"),
                        }
                    }
                }
                prev = Some(frame.timestamp);
            }
            if tx.send(frame).is_err() {
                return;
            }
        }
        info!("replay finished");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_core::{fingers_up, ControlConfig, GestureController, KeyLog, PolicyKind};

    #[test]
    fn sim_hand_starts_idle() {
        let frame = SimHand::default().frame(0.0);
        for policy in [PolicyKind::Static, PolicyKind::Motion] {
            let mut c = GestureController::new(ControlConfig { policy, ..ControlConfig::default() });
            let mut sink = KeyLog::default();
            c.process_frame(&frame, &mut sink);
            assert!(sink.keys.is_empty(), "{policy:?} fired {:?}", sink.keys);
        }
    }

    #[test]
    fn sim_hand_toggles_fingers() {
        let mut hand = SimHand::default();
        hand.apply(SimInput::Pose(FingerState::from_bits([0, 1, 0, 0, 0])));
        hand.apply(SimInput::ToggleFinger(Finger::Middle));
        assert_eq!(hand.fingers.bits(), [0, 1, 1, 0, 0]);
        let frame = hand.frame(0.0);
        assert_eq!(fingers_up(&frame.hands[0]), hand.fingers);
    }

    #[test]
    fn hidden_sim_hand_gives_empty_frame() {
        let mut hand = SimHand::default();
        hand.apply(SimInput::ToggleHand);
        assert!(!hand.frame(1.0).has_hand());
    }

    #[test]
    fn sim_move_clamps() {
        let mut hand = SimHand::default();
        hand.apply(SimInput::MoveTo { x: 1.5, y: -0.2 });
        assert_eq!((hand.x, hand.y), (1.0, 0.0));
    }

    #[test]
    fn sim_source_emits_frames_and_stops_on_hangup() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let frames = spawn_hand_source(SimHandSource::new(sim_rx, 200));
        sim_tx.send(SimInput::Pose(FingerState::OPEN)).unwrap();

        // The pose change shows up within a few frames.
        let seen_open = frames
            .iter()
            .take(50)
            .any(|f| f.hands.first().map(fingers_up) == Some(FingerState::OPEN));
        assert!(seen_open);

        drop(sim_tx);
        // Source thread exits; the channel drains and disconnects.
        let rest: Vec<_> = frames.iter().take(1000).collect();
        assert!(rest.len() < 1000);
    }

    #[test]
    fn replay_source_sends_every_frame_in_order() {
        let frames = vec![HandFrame::empty(0.0), HandFrame::empty(0.5), HandFrame::empty(1.0)];
        let rx = spawn_hand_source(ReplayHandSource { frames: frames.clone(), realtime: false });
        let got: Vec<_> = rx.iter().collect();
        assert_eq!(got, frames);
    }

    #[test]
    fn realtime_replay_survives_absurd_gap() {
        let frames = vec![HandFrame::empty(0.0), HandFrame::empty(1e30), HandFrame::empty(1e30)];
        let rx = spawn_hand_source(ReplayHandSource { frames: frames.clone(), realtime: true });
        let got: Vec<_> = rx.iter().collect();
        assert_eq!(got, frames);
    }
}
