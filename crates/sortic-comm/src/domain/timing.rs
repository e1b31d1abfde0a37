//! Timing gates: monotonic-clock comparisons that throttle polling and
//! republishing. Stateless logic, reused across states.

/// Tunable intervals for the controller's timing gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommTimings {
    /// Idle bus-poll interval.
    pub bus_poll_ms: u64,
    /// Idle network-poll interval.
    pub net_poll_ms: u64,
    /// Handshake republish cadence.
    pub republish_ms: u64,
    /// Settle interval after subscribing to the availability wildcard.
    pub settle_ms: u64,
}

impl Default for CommTimings {
    fn default() -> Self {
        Self {
            bus_poll_ms: 400,
            net_poll_ms: 900,
            republish_ms: 300,
            settle_ms: 5_000,
        }
    }
}

/// A single throttle gate over a monotonic millisecond clock.
#[derive(Debug, Clone, Copy)]
pub struct PollGate {
    last: u64,
}

impl PollGate {
    #[must_use]
    pub fn new(now: u64) -> Self {
        Self { last: now }
    }

    /// True once `interval` has elapsed since the last firing; firing
    /// restarts the window.
    pub fn ready(&mut self, now: u64, interval: u64) -> bool {
        if now.saturating_sub(self.last) >= interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Restart the window without firing.
    pub fn reset(&mut self, now: u64) {
        self.last = now;
    }

    /// Arm the gate so the next `ready` check fires immediately.
    pub fn expire(&mut self, now: u64, interval: u64) {
        self.last = now.saturating_sub(interval);
    }
}
