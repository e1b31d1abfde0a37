//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the communication controller **requires** the host to provide.
//! The controller never touches a socket or a bus register itself; everything
//! below is a thin I/O wrapper with no protocol state of its own.

use sortic_messages::{ControllerCommand, HubCommand, SorticMessage};
use thiserror::Error;

/// Errors from gateway operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The underlying transport is not connected.
    #[error("transport disconnected")]
    Disconnected,

    /// Transport-level failure surfaced by the adapter.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Side channel to the attached motion controller.
///
/// The channel is narrow: at most one inbound command is pending at a time,
/// and a new value may only overwrite the previous one after it has been
/// consumed by the state that owned it.
pub trait BusGateway: Send + Sync {
    /// True if an inbound command is waiting to be taken.
    fn has_pending_inbound(&self) -> bool;

    /// Take the pending inbound command, freeing the slot.
    fn take_pending_inbound(&self) -> Option<ControllerCommand>;

    /// Queue an outbound command for transmission.
    fn send_outbound(&self, command: HubCommand) -> Result<(), GatewayError>;
}

/// Publish/subscribe network transport.
///
/// Wire encoding/decoding lives in the adapter. Malformed inbound payloads
/// are dropped by the adapter and never reach the controller.
pub trait NetworkGateway: Send + Sync {
    /// Publish one message to a topic.
    fn publish(&self, topic: &str, message: &SorticMessage) -> Result<(), GatewayError>;

    /// Subscribe to a topic pattern (`+` matches a single level).
    ///
    /// Must be idempotent: resuming an interrupted negotiation re-subscribes
    /// to patterns that may already be active.
    fn subscribe(&self, pattern: &str) -> Result<(), GatewayError>;

    /// Unsubscribe from a topic pattern. Unknown patterns are a no-op.
    fn unsubscribe(&self, pattern: &str) -> Result<(), GatewayError>;

    /// Non-blocking pump: drain whatever inbound messages are queued.
    fn pump(&self) -> Vec<SorticMessage>;
}

/// Monotonic clock for the timing gates.
///
/// Injectable so tests can drive the gates deterministically.
pub trait TimeSource: Send + Sync {
    /// Milliseconds from an arbitrary monotonic origin.
    fn now_ms(&self) -> u64;
}
