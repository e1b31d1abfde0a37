//! Events and error types for the communication controller.

use thiserror::Error;

use crate::ports::GatewayError;

/// Events produced by state do-actions or decoded from the command channel.
///
/// Consumed exactly once by the transition step; pairs without a transition
/// table entry are deliberate no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    NoEvent,
    /// A publish command arrived on the side channel.
    Publish,
    /// Start the box negotiation (phase selector: search).
    SearchBox,
    /// A box was selected (phase selector: request handshake).
    BoxAvailable,
    /// The box answered our request (phase selector: confirm handshake).
    ReqBox,
    /// The current wait is over; return to idle.
    AnswerReceived,
    /// Reserved: a wait elapsed without an answer.
    NoAnswerReceived,
    /// No box available; fall back to buffer simulation.
    SimulateBuffer,
    /// The motion controller asks to confirm package arrival.
    ArrivConfirmation,
    /// A protocol fault was observed.
    Error,
    /// Resume the interrupted activity.
    Resume,
    /// Fault confirmed; discard all in-flight negotiation state.
    Reset,
}

/// Communication controller errors.
#[derive(Debug, Error)]
pub enum CommError {
    #[error("gateway failure: {0}")]
    Gateway(#[from] GatewayError),
}
