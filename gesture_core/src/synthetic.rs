//! Synthesized hands for simulation and tests.
//!
//! Builds a plausible 21-point upright right hand (as seen in a mirror) whose
//! fingers read back through [`fingers_up`](crate::fingers::fingers_up)
//! exactly as requested.  The middle-finger base sits on the given centre.

use crate::fingers::{Finger, FingerState};
use crate::landmarks::{HandLandmarks, Landmark, LANDMARK_COUNT, WRIST};

/// Default hand size in normalized units (distance from knuckles to wrist).
pub const DEFAULT_SPAN: f32 = 0.09;

// Offsets in span units, relative to the middle-finger base.
const WRIST_OFFSET: (f32, f32) = (0.0, 0.9);

const THUMB_BASE: [(f32, f32); 3] = [(-0.35, 0.6), (-0.55, 0.4), (-0.7, 0.2)];
const THUMB_TIP_UP:   (f32, f32) = (-0.9, 0.05);
const THUMB_TIP_DOWN: (f32, f32) = (-0.45, 0.25);

/// Knuckle x offset and length factor, index → pinky.
const FINGERS: [(f32, f32); 4] = [(-0.3, 0.95), (0.0, 1.0), (0.25, 0.95), (0.5, 0.75)];
const JOINTS_UP:   [f32; 3] = [-0.4, -0.7, -1.0];
const JOINTS_DOWN: [f32; 3] = [-0.3, -0.1, 0.1];

/// Build a hand centred on `(cx, cy)` with the given extended fingers.
pub fn pose(cx: f32, cy: f32, fingers: FingerState, span: f32) -> HandLandmarks {
    let at = |(dx, dy): (f32, f32)| Landmark::new(cx + dx * span, cy + dy * span);
    let mut pts = [Landmark::default(); LANDMARK_COUNT];

    pts[WRIST] = at(WRIST_OFFSET);

    for (i, &off) in THUMB_BASE.iter().enumerate() {
        pts[1 + i] = at(off);
    }
    pts[4] = at(if fingers.is_up(Finger::Thumb) { THUMB_TIP_UP } else { THUMB_TIP_DOWN });

    for (f, &(kx, len)) in FINGERS.iter().enumerate() {
        let base = 5 + f * 4;
        let up = fingers.is_up(Finger::ALL[f + 1]);
        let joints = if up { JOINTS_UP } else { JOINTS_DOWN };
        pts[base] = at((kx, 0.0));
        for (j, &jy) in joints.iter().enumerate() {
            pts[base + 1 + j] = at((kx, jy * len));
        }
    }
    HandLandmarks::new(pts)
}

/// [`pose`] with [`DEFAULT_SPAN`].
pub fn pose_at(cx: f32, cy: f32, fingers: FingerState) -> HandLandmarks {
    pose(cx, cy, fingers, DEFAULT_SPAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingers::fingers_up;
    use crate::landmarks::CENTROID;

    #[test]
    fn every_pose_reads_back() {
        for mask in 0u8..32 {
            let bits = [0, 1, 2, 3, 4].map(|i| (mask >> i) & 1);
            let wanted = FingerState::from_bits(bits);
            assert_eq!(fingers_up(&pose_at(0.5, 0.5, wanted)), wanted, "mask {mask:05b}");
        }
    }

    #[test]
    fn centroid_is_the_centre() {
        let hand = pose_at(0.25, 0.75, FingerState::OPEN);
        let c = hand.get(CENTROID);
        assert!((c.x - 0.25).abs() < 1e-6);
        assert!((c.y - 0.75).abs() < 1e-6);
    }
}
