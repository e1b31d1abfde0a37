//! Typed network messages.
//!
//! A [`SorticMessage`] is the universal payload shape: a header with the
//! per-sender message id and the consignor identity, plus a tagged body.
//! Inbound kinds (error, box-available, handshake, buffer-status, box-state)
//! are classified into typed buffers by the controller; report kinds only
//! travel outbound.

use serde::{Deserialize, Serialize};

use crate::errors::MessageError;
use crate::identity::{Consignor, Line, Region};

/// Universal message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SorticMessage {
    /// Per-sender, strictly increasing message id.
    pub msg_id: u64,
    /// Sender identity. Together with `msg_id` this forms the dedup key.
    pub consignor: Consignor,
    /// Type tag plus type-specific fields.
    #[serde(flatten)]
    pub body: MessageBody,
}

impl SorticMessage {
    #[must_use]
    pub fn new(msg_id: u64, consignor: Consignor, body: MessageBody) -> Self {
        Self {
            msg_id,
            consignor,
            body,
        }
    }

    /// Deduplication key: `(msg_id, consignor)`.
    #[must_use]
    pub fn dedup_key(&self) -> (u64, Consignor) {
        (self.msg_id, self.consignor)
    }

    /// Encode to the JSON wire form.
    pub fn to_wire(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from the JSON wire form.
    pub fn from_wire(raw: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Message body, discriminated by the `msg_type` tag on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg_type", rename_all = "snake_case")]
pub enum MessageBody {
    /// Protocol fault or fault-clear signal.
    ///
    /// A *fault* carries both a code and a token; a *clear* carries neither.
    Error {
        fault_code: Option<String>,
        token: Option<String>,
    },
    /// A box advertising itself on the availability wildcard topic.
    BoxAvailable { line: Line, target_region: Region },
    /// Handshake between the unit and a box, in both directions.
    Handshake {
        req: Option<Consignor>,
        ack: Option<Consignor>,
        cargo: Option<String>,
        target_region: Option<Region>,
        target_line: Option<Line>,
    },
    /// Buffer fill state, used on the fallback simulation topic.
    BufferStatus { full: bool, cleared: bool },
    /// Box-side FSM state announcement.
    BoxState { state: String },
    /// Outbound report: unit FSM state.
    StateReport { state: String },
    /// Outbound report: unit position.
    PositionReport { position: u32 },
    /// Outbound report: package telemetry.
    PackageReport {
        package_id: u32,
        cargo: String,
        target_destination: String,
        target_region: Region,
    },
    /// Outbound report: fault forwarded from the motion controller.
    ErrorReport {
        fault_code: Option<String>,
        token: Option<String>,
    },
    /// Outbound report: startup announcement with default values.
    InitReport,
}

impl MessageBody {
    /// Box state literal announced once a package was taken over.
    /// Spelling matches the box firmware.
    pub const BOX_STATE_RETRIEVED: &'static str = "RetreivedPackage";

    /// True for an error body carrying both a fault code and a token.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            MessageBody::Error {
                fault_code: Some(_),
                token: Some(_),
            }
        )
    }

    /// True for an error body carrying neither a fault code nor a token.
    #[must_use]
    pub fn is_fault_clear(&self) -> bool {
        matches!(
            self,
            MessageBody::Error {
                fault_code: None,
                token: None,
            }
        )
    }
}
