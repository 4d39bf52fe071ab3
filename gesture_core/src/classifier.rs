//! Gesture classification policies.
//!
//! Both policies turn one hand's [`FingerState`] into an [`Action`].  The
//! static policy looks at pose shape only; the motion policy also tracks the
//! hand centroid over a short window and reads swipes from it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::Action;
use crate::fingers::FingerState;
use crate::history::{Point, PositionHistory};
use crate::landmarks::HandLandmarks;

// ════════════════════════════════════════════════════════════════════════════
// PolicyKind
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Exact pose lookup, no motion.
    #[default]
    Static,
    /// Open-palm swipes plus fist.
    Motion,
}

impl PolicyKind {
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Static => "static",
            PolicyKind::Motion => "motion",
        }
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" | "pose" => Ok(PolicyKind::Static),
            "motion" | "swipe" => Ok(PolicyKind::Motion),
            other => Err(format!("unknown policy `{other}` (expected static or motion)")),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GesturePolicy trait
// ════════════════════════════════════════════════════════════════════════════

/// A classification policy.  `slot` is a tracking slot assigned by the
/// controller: it stays with the same hand while that hand is in view, so
/// per-hand state can be kept apart.
pub trait GesturePolicy: Send {
    fn kind(&self) -> PolicyKind;

    fn classify(&mut self, slot: usize, hand: &HandLandmarks, fingers: FingerState) -> Action;

    /// The hand tracked in `slot` was not detected this frame.
    fn hand_lost(&mut self, slot: usize);

    /// Forget all per-hand state.
    fn reset(&mut self);
}

// ════════════════════════════════════════════════════════════════════════════
// Static pose policy
// ════════════════════════════════════════════════════════════════════════════

/// Pose → action table.
pub const POSE_TABLE: [(FingerState, Action); 4] = [
    (FingerState::from_bits([0, 1, 0, 0, 0]), Action::MoveRight),
    (FingerState::from_bits([0, 1, 1, 0, 0]), Action::MoveLeft),
    (FingerState::from_bits([1, 1, 1, 1, 1]), Action::Jump),
    (FingerState::from_bits([0, 0, 0, 0, 0]), Action::Hoverboard),
];

/// Look a pose up in [`POSE_TABLE`]; unknown shapes are `Action::None`.
pub fn lookup_pose(fingers: FingerState) -> Action {
    POSE_TABLE
        .iter()
        .find(|(pose, _)| *pose == fingers)
        .map(|&(_, action)| action)
        .unwrap_or(Action::None)
}

#[derive(Clone, Debug, Default)]
pub struct StaticPoseClassifier;

impl GesturePolicy for StaticPoseClassifier {
    fn kind(&self) -> PolicyKind { PolicyKind::Static }

    fn classify(&mut self, _slot: usize, _hand: &HandLandmarks, fingers: FingerState) -> Action {
        lookup_pose(fingers)
    }

    fn hand_lost(&mut self, _slot: usize) {}
    fn reset(&mut self) {}
}

// ════════════════════════════════════════════════════════════════════════════
// Motion policy
// ════════════════════════════════════════════════════════════════════════════

/// Resolve a window displacement to a swipe.  The dominant axis wins first,
/// so one gesture is never both horizontal and vertical.
pub fn swipe_action(dx: f32, dy: f32, threshold: f32) -> Action {
    if dx.abs() > dy.abs() {
        if dx > threshold {
            Action::MoveRight
        } else if dx < -threshold {
            Action::MoveLeft
        } else {
            Action::None
        }
    } else if dy < -threshold {
        Action::Jump
    } else if dy > threshold {
        Action::Slide
    } else {
        Action::None
    }
}

#[derive(Clone, Debug)]
pub struct MotionClassifier {
    histories:    Vec<PositionHistory>,
    window:       usize,
    threshold_px: f32,
    frame_width:  u32,
    frame_height: u32,
}

impl MotionClassifier {
    pub fn new(window: usize, threshold_px: f32, frame_width: u32, frame_height: u32) -> Self {
        MotionClassifier {
            histories: Vec::new(),
            window,
            threshold_px,
            frame_width,
            frame_height,
        }
    }

    pub fn history(&self, slot: usize) -> Option<&PositionHistory> {
        self.histories.get(slot)
    }

    fn history_mut(&mut self, slot: usize) -> &mut PositionHistory {
        if self.histories.len() <= slot {
            let window = self.window;
            self.histories.resize_with(slot + 1, || PositionHistory::new(window));
        }
        &mut self.histories[slot]
    }
}

impl GesturePolicy for MotionClassifier {
    fn kind(&self) -> PolicyKind { PolicyKind::Motion }

    fn classify(&mut self, slot: usize, hand: &HandLandmarks, fingers: FingerState) -> Action {
        let (x, y) = hand.centroid().to_pixels(self.frame_width, self.frame_height);
        let threshold = self.threshold_px;
        let history = self.history_mut(slot);
        history.push(Point::new(x, y));

        if fingers.all_up() {
            match history.displacement() {
                Some((dx, dy)) => {
                    let action = swipe_action(dx, dy, threshold);
                    debug!(slot, dx, dy, %action, "open-palm displacement");
                    action
                }
                None => Action::None,
            }
        } else if fingers.all_down() {
            Action::Hoverboard
        } else {
            Action::None
        }
    }

    fn hand_lost(&mut self, slot: usize) {
        if let Some(h) = self.histories.get_mut(slot) {
            h.clear();
        }
    }

    fn reset(&mut self) {
        self.histories.iter_mut().for_each(PositionHistory::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, CENTROID, LANDMARK_COUNT};

    fn hand_at_px(x: f32, y: f32) -> HandLandmarks {
        let mut pts = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        pts[CENTROID] = Landmark::new(x / 640.0, y / 480.0);
        HandLandmarks::new(pts)
    }

    #[test]
    fn static_table_matches_exactly() {
        assert_eq!(lookup_pose(FingerState::from_bits([0, 1, 0, 0, 0])), Action::MoveRight);
        assert_eq!(lookup_pose(FingerState::from_bits([0, 1, 1, 0, 0])), Action::MoveLeft);
        assert_eq!(lookup_pose(FingerState::OPEN), Action::Jump);
        assert_eq!(lookup_pose(FingerState::CLOSED), Action::Hoverboard);
    }

    #[test]
    fn static_unknown_pose_is_none() {
        assert_eq!(lookup_pose(FingerState::from_bits([1, 1, 0, 0, 0])), Action::None);
        assert_eq!(lookup_pose(FingerState::from_bits([0, 1, 1, 1, 0])), Action::None);
    }

    #[test]
    fn swipe_axis_exclusive() {
        assert_eq!(swipe_action(80.0, 5.0, 35.0), Action::MoveRight);
        assert_eq!(swipe_action(-80.0, 40.0, 35.0), Action::MoveLeft);
        assert_eq!(swipe_action(10.0, -60.0, 35.0), Action::Jump);
        assert_eq!(swipe_action(-10.0, 60.0, 35.0), Action::Slide);
        // Dominant axis below threshold: no fallback to the other axis.
        assert_eq!(swipe_action(30.0, 20.0, 35.0), Action::None);
        // Equal magnitudes go to the vertical branch.
        assert_eq!(swipe_action(50.0, -50.0, 35.0), Action::Jump);
    }

    #[test]
    fn motion_right_swipe_from_window() {
        let mut m = MotionClassifier::new(4, 35.0, 640, 480);
        let path = [(100.0, 200.0), (100.0, 200.0), (100.0, 200.0), (180.0, 205.0)];
        let mut last = Action::None;
        for (x, y) in path {
            last = m.classify(0, &hand_at_px(x, y), FingerState::OPEN);
        }
        assert_eq!(last, Action::MoveRight);
    }

    #[test]
    fn motion_needs_two_samples() {
        let mut m = MotionClassifier::new(4, 35.0, 640, 480);
        assert_eq!(m.classify(0, &hand_at_px(100.0, 100.0), FingerState::OPEN), Action::None);
    }

    #[test]
    fn motion_records_regardless_of_pose() {
        let mut m = MotionClassifier::new(4, 35.0, 640, 480);
        m.classify(0, &hand_at_px(100.0, 300.0), FingerState::from_bits([0, 1, 0, 0, 0]));
        m.classify(0, &hand_at_px(100.0, 300.0), FingerState::from_bits([0, 1, 0, 0, 0]));
        assert_eq!(m.history(0).map(PositionHistory::len), Some(2));
        // Upward move with an open palm resolves against the older samples.
        assert_eq!(m.classify(0, &hand_at_px(105.0, 200.0), FingerState::OPEN), Action::Jump);
    }

    #[test]
    fn motion_fist_needs_no_motion() {
        let mut m = MotionClassifier::new(4, 35.0, 640, 480);
        assert_eq!(m.classify(0, &hand_at_px(10.0, 10.0), FingerState::CLOSED), Action::Hoverboard);
    }

    #[test]
    fn motion_partial_pose_is_none() {
        let mut m = MotionClassifier::new(4, 35.0, 640, 480);
        m.classify(0, &hand_at_px(100.0, 200.0), FingerState::from_bits([0, 1, 0, 0, 0]));
        assert_eq!(
            m.classify(0, &hand_at_px(300.0, 200.0), FingerState::from_bits([0, 1, 0, 0, 0])),
            Action::None
        );
    }

    #[test]
    fn hand_lost_clears_only_that_slot() {
        let mut m = MotionClassifier::new(4, 35.0, 640, 480);
        m.classify(0, &hand_at_px(1.0, 1.0), FingerState::OPEN);
        m.classify(1, &hand_at_px(1.0, 1.0), FingerState::OPEN);
        m.hand_lost(1);
        assert_eq!(m.history(0).map(PositionHistory::len), Some(1));
        assert_eq!(m.history(1).map(PositionHistory::len), Some(0));
        m.reset();
        assert_eq!(m.history(0).map(PositionHistory::len), Some(0));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("Motion".parse::<PolicyKind>(), Ok(PolicyKind::Motion));
        assert_eq!("static".parse::<PolicyKind>(), Ok(PolicyKind::Static));
        assert!("bogus".parse::<PolicyKind>().is_err());
    }
}
