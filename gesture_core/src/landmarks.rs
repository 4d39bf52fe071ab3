//! Hand landmark topology and per-frame detection records.
//!
//! The index space follows the common 21-point hand model: 0 is the wrist,
//! then four joints per digit from the thumb outward, each ending at a tip.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Number of landmarks in one hand record.
pub const LANDMARK_COUNT: usize = 21;

/// Fingertip indices, thumb first.
pub const TIP_IDS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// The point tracked for hand translation (middle-finger metacarpal base).
pub const CENTROID: usize = MIDDLE_MCP;

/// Bone connections, used by overlays to draw the skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One keypoint, `x`/`y` normalized to the frame (0.0–1.0, origin top-left).
/// `z` is carried through from detectors but never read by classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Convert to pixel coordinates for a `width`×`height` frame.
    pub fn to_pixels(&self, width: u32, height: u32) -> (f32, f32) {
        (self.x * width as f32, self.y * height as f32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongCount(usize),
}

/// All 21 landmarks of one detected hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: [Landmark; LANDMARK_COUNT],
    /// Detector confidence in 0.0–1.0.  Sources without one report 1.0.
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 { 1.0 }

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points, confidence: 1.0 }
    }

    /// Build from a slice, which must hold exactly 21 points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Ok(HandLandmarks::new(points))
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    #[inline]
    pub fn get(&self, index: usize) -> &Landmark {
        &self.points[index]
    }

    pub fn centroid(&self) -> Landmark {
        self.points[CENTROID]
    }

    /// Flip horizontally (`x ← 1 − x`), turning a camera view into a mirror view.
    pub fn mirrored(&self) -> Self {
        let mut out = self.clone();
        for p in out.points.iter_mut() {
            p.x = 1.0 - p.x;
        }
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything the detector reported for one captured frame.
///
/// An empty `hands` list means no hand was detected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    /// Source clock in seconds; only differences are meaningful.
    pub timestamp: f64,
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

impl HandFrame {
    pub fn empty(timestamp: f64) -> Self {
        HandFrame { timestamp, hands: Vec::new() }
    }

    pub fn single(timestamp: f64, hand: HandLandmarks) -> Self {
        HandFrame { timestamp, hands: vec![hand] }
    }

    pub fn has_hand(&self) -> bool {
        !self.hands.is_empty()
    }
}
