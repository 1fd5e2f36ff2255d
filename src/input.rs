//! Control map consumed each tick
//!
//! The platform shell reports which controls are currently held. Movement
//! reads held state directly; menu-style controls fire on key-up, detected by
//! comparing against the previous snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Logical controls (arrow keys, P, M, R, Space/Enter in the default shell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
    Jump,
    Pause,
    Mute,
    Confirm,
    Restart,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Left,
        Control::Right,
        Control::Jump,
        Control::Pause,
        Control::Mute,
        Control::Confirm,
        Control::Restart,
    ];
}

/// Held-state snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: HashMap<Control, bool>,
}

impl TickInput {
    /// Snapshot with the given controls held
    pub fn with(controls: &[Control]) -> Self {
        let mut input = Self::default();
        for &c in controls {
            input.set(c, true);
        }
        input
    }

    pub fn set(&mut self, control: Control, down: bool) {
        self.held.insert(control, down);
    }

    #[inline]
    pub fn held(&self, control: Control) -> bool {
        self.held.get(&control).copied().unwrap_or(false)
    }
}

/// Remembers the previous snapshot to report key-up edges
#[derive(Debug, Clone, Default)]
pub struct ControlTracker {
    previous: HashMap<Control, bool>,
}

/// Controls released this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Released {
    bits: u8,
}

impl Released {
    fn mask(control: Control) -> u8 {
        1 << (control as u8)
    }

    pub fn contains(&self, control: Control) -> bool {
        self.bits & Self::mask(control) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl ControlTracker {
    /// Compare with the last snapshot and store this one
    pub fn advance(&mut self, input: &TickInput) -> Released {
        let mut released = Released::default();
        for control in Control::ALL {
            let was = self.previous.get(&control).copied().unwrap_or(false);
            if was && !input.held(control) {
                released.bits |= Released::mask(control);
            }
        }
        self.previous.clone_from(&input.held);
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_fires_on_key_up_only() {
        let mut tracker = ControlTracker::default();
        let down = TickInput::with(&[Control::Pause]);
        let up = TickInput::default();

        assert!(tracker.advance(&down).is_empty());
        assert!(tracker.advance(&down).is_empty());
        let released = tracker.advance(&up);
        assert!(released.contains(Control::Pause));
        assert!(!released.contains(Control::Confirm));
        assert!(tracker.advance(&up).is_empty());
    }

    #[test]
    fn test_explicit_false_counts_as_up() {
        let mut tracker = ControlTracker::default();
        tracker.advance(&TickInput::with(&[Control::Confirm]));
        let mut input = TickInput::default();
        input.set(Control::Confirm, false);
        assert!(tracker.advance(&input).contains(Control::Confirm));
    }
}
