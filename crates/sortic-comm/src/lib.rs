//! # Sortic Communication Controller
//!
//! The coordination layer of the Sortic sorting unit: a finite state machine
//! that negotiates the right to deposit a package into a mobile collection
//! box over an unreliable publish/subscribe network, relays telemetry, and
//! accepts commands from the attached motion controller over a narrow
//! byte-oriented side channel.
//!
//! ## Architecture
//!
//! The crate is hexagonal. The core ([`service::CommunicationService`]) is
//! pure control logic over three driven ports the host must implement:
//!
//! - [`ports::BusGateway`] - the side channel to the motion controller
//! - [`ports::NetworkGateway`] - publish/subscribe transport
//! - [`ports::TimeSource`] - monotonic clock for the timing gates
//!
//! One `tick()` per scheduling pass generates at most one event and applies
//! at most one transition. A do-action that has to wait simply returns
//! `NoEvent` and is re-invoked on the next pass; nothing blocks.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;
pub mod testing;

pub use domain::{
    BoxCandidate, BoxChoicePolicy, CommTimings, DeclineAll, MessageBuffers, SorticContext,
};
pub use events::{CommError, Event};
pub use ports::{BusGateway, GatewayError, NetworkGateway, TimeSource};
pub use service::{CommunicationService, State};
