//! # Sortic Hub Runtime
//!
//! Host wiring for the communication controller:
//!
//! - `adapters/` - gateway implementations (bus slot, pub/sub broker, clock)
//! - `config`   - runtime configuration with environment overrides
//!
//! The adapters are in-memory by design: the hub runs on a single process
//! where the motion controller side channel and the broker connection are
//! handed in as queue handles. The integration test suite drives the same
//! adapters that the binary uses.

pub mod adapters;
pub mod config;

pub use adapters::{CommandBus, CommandBusHandle, MemoryBroker, MemoryBrokerHandle, SystemClock};
pub use config::RuntimeConfig;
