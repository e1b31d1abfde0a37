//! # Sortic Messages - Shared Wire Types
//!
//! Common message and identity types used by the communication controller,
//! the runtime adapters and the test suite.
//!
//! Every payload on the network carries the same header: a per-sender
//! monotonically increasing message id plus the consignor identity. The pair
//! `(msg_id, consignor)` is the deduplication key for inbound buffers.

pub mod commands;
pub mod errors;
pub mod identity;
pub mod messages;
pub mod topics;

pub use commands::{ControllerCommand, HubCommand, MotionState};
pub use errors::MessageError;
pub use identity::{Consignor, Line, Region};
pub use messages::{MessageBody, SorticMessage};
