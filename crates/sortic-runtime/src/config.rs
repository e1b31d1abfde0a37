//! Runtime configuration.

use sortic_comm::CommTimings;
use sortic_messages::Consignor;
use tracing::warn;

/// Configuration for the hub process.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Identity of this sorting unit.
    pub unit: Consignor,
    /// Timing gates for the controller.
    pub timings: CommTimings,
    /// Scheduler period: one FSM pass per tick.
    pub tick_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            unit: Consignor::SO1,
            timings: CommTimings::default(),
            tick_ms: 50,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(unit) = std::env::var("SORTIC_UNIT_ID") {
            match unit.as_str() {
                "SO1" => config.unit = Consignor::SO1,
                "SB1" => config.unit = Consignor::SB1,
                "SB2" => config.unit = Consignor::SB2,
                "SB3" => config.unit = Consignor::SB3,
                other => warn!(unit = %other, "Unknown SORTIC_UNIT_ID, keeping default"),
            }
        }

        if let Ok(tick) = std::env::var("SORTIC_TICK_MS") {
            if let Ok(ms) = tick.parse() {
                config.tick_ms = ms;
            }
        }
        if let Ok(poll) = std::env::var("SORTIC_BUS_POLL_MS") {
            if let Ok(ms) = poll.parse() {
                config.timings.bus_poll_ms = ms;
            }
        }
        if let Ok(poll) = std::env::var("SORTIC_NET_POLL_MS") {
            if let Ok(ms) = poll.parse() {
                config.timings.net_poll_ms = ms;
            }
        }

        config
    }
}
