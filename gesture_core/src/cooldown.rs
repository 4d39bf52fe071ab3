//! Timer gate shared by every hand in a frame.
//!
//! Two states, [`GateState::Idle`] and [`GateState::CoolingDown`].  A dispatch
//! moves the gate into cooldown; returning to idle is never scheduled, it is
//! simply observed the next time the gate is checked.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Idle,
    CoolingDown,
}

#[derive(Clone, Debug)]
pub struct CooldownTimer {
    cooldown:    f64,
    last_action: Option<f64>,
}

impl CooldownTimer {
    pub fn new(cooldown_seconds: f64) -> Self {
        CooldownTimer { cooldown: cooldown_seconds.max(0.0), last_action: None }
    }

    pub fn cooldown(&self) -> f64 { self.cooldown }

    pub fn last_action(&self) -> Option<f64> { self.last_action }

    /// True once strictly more than `cooldown` has passed since the last
    /// dispatch.  Always true before the first one.
    pub fn ready(&self, now: f64) -> bool {
        match self.last_action {
            None       => true,
            Some(last) => now - last > self.cooldown,
        }
    }

    pub fn state(&self, now: f64) -> GateState {
        if self.ready(now) { GateState::Idle } else { GateState::CoolingDown }
    }

    /// Claim the gate at `now`.  Returns false (and changes nothing) while
    /// still cooling down.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if !self.ready(now) {
            return false;
        }
        self.last_action = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_action = None;
    }
}
