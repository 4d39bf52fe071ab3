//! Finger-state extraction: which of the five digits are extended.

use std::fmt;

use crate::landmarks::{HandLandmarks, TIP_IDS};

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky,
    ];

    pub fn slot(self) -> usize {
        self as usize
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerState
// ════════════════════════════════════════════════════════════════════════════

/// Ordered extended/curled flags: thumb, index, middle, ring, pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    pub const CLOSED: FingerState = FingerState([false; 5]);
    pub const OPEN:   FingerState = FingerState([true; 5]);

    /// Build from 0/1 digits, e.g. `[0, 1, 1, 0, 0]`.
    pub const fn from_bits(bits: [u8; 5]) -> Self {
        FingerState([bits[0] != 0, bits[1] != 0, bits[2] != 0, bits[3] != 0, bits[4] != 0])
    }

    pub fn bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }

    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger.slot()]
    }

    pub fn set(&mut self, finger: Finger, up: bool) {
        self.0[finger.slot()] = up;
    }

    pub fn toggle(&mut self, finger: Finger) {
        self.0[finger.slot()] ^= true;
    }

    pub fn all_up(&self) -> bool {
        self.0.iter().all(|&f| f)
    }

    pub fn all_down(&self) -> bool {
        self.0.iter().all(|&f| !f)
    }

    pub fn count_up(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.bits();
        write!(f, "[{a},{b},{c},{d},{e}]")
    }
}

// ════════════════════════════════════════════════════════════════════════════
// fingers_up
// ════════════════════════════════════════════════════════════════════════════

/// Decide which fingers are extended.
///
/// * Thumb: up when its tip lies left of the joint just below it
///   (`tip − 1`).  Extension is lateral and the view is mirrored.
/// * Other fingers: up when the tip is higher on screen (smaller `y`) than
///   the joint two below it (`tip − 2`).
pub fn fingers_up(hand: &HandLandmarks) -> FingerState {
    let mut state = FingerState::CLOSED;

    let thumb = TIP_IDS[0];
    state.0[0] = hand.get(thumb).x < hand.get(thumb - 1).x;

    for (slot, &tip) in TIP_IDS.iter().enumerate().skip(1) {
        state.0[slot] = hand.get(tip).y < hand.get(tip - 2).y;
    }
    state
}
