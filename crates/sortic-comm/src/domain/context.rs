//! Mutable session state of the sorting unit.

use sortic_messages::{Consignor, Line, Region};

/// Session state owned exclusively by the FSM core.
///
/// Reset to defaults (identity preserved) only on exit from the reset state.
#[derive(Debug, Clone, PartialEq)]
pub struct SorticContext {
    /// Stable identity of this unit.
    pub id: Consignor,
    /// Line the unit currently sits on.
    pub actual_line: Line,
    /// Line negotiated for the pending package.
    pub target_line: Line,
    /// Region the pending package is destined for.
    pub target_region: Option<Region>,
    /// Cargo description of the pending package.
    pub cargo: Option<String>,
    /// Destination label of the pending package.
    pub target_destination: Option<String>,
    /// Id of the pending package.
    pub package_id: Option<u32>,
    /// Box we asked for a reservation.
    pub req: Option<Consignor>,
    /// Box that acknowledged us. Only ever set after that box addressed this
    /// unit by its own identity in a handshake message, never optimistically.
    pub ack: Option<Consignor>,
}

impl SorticContext {
    #[must_use]
    pub fn new(id: Consignor) -> Self {
        Self {
            id,
            actual_line: Line::UploadLine,
            target_line: Line::UploadLine,
            target_region: None,
            cargo: None,
            target_destination: None,
            package_id: None,
            req: None,
            ack: None,
        }
    }

    /// Reset everything except the stable identity.
    pub fn reset(&mut self) {
        *self = Self::new(self.id);
    }
}

impl Default for SorticContext {
    fn default() -> Self {
        Self::new(Consignor::SO1)
    }
}
