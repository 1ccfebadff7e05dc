//! The exit gate that lets the participant leave the chat.

/// Whether the participant may move on to the next survey page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GateState {
    /// Forward navigation is suppressed.
    #[default]
    Open,
    /// Forward navigation is permitted. Terminal.
    Released,
}

/// A state change reported by [`ExitGate::record_message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateTransition {
    /// The threshold was reached by the message just recorded.
    Released,
}

/// Counts accepted participant messages and releases once at a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExitGate {
    threshold: u32,
    count: u32,
    state: GateState,
}

impl ExitGate {
    /// Creates an open gate releasing after `threshold` messages.
    #[inline]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            count: 0,
            state: GateState::Open,
        }
    }

    /// Records one accepted participant message.
    ///
    /// Returns a transition only for the message that reaches the
    /// threshold; every later call returns `None`.
    pub fn record_message(&mut self) -> Option<GateTransition> {
        self.count = self.count.saturating_add(1);
        if self.state == GateState::Open && self.count >= self.threshold {
            self.state = GateState::Released;
            return Some(GateTransition::Released);
        }
        None
    }

    /// Returns the number of accepted participant messages.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Returns `true` once the gate has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.state == GateState::Released
    }
}
