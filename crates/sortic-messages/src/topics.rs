//! Topic naming, by convention `<Role>/<UnitId>/<Kind>`.

use crate::identity::Consignor;

/// Unit status reports.
#[must_use]
pub fn status(unit: Consignor) -> String {
    format!("Sortic/{unit}/status")
}

/// Unit position reports.
#[must_use]
pub fn position(unit: Consignor) -> String {
    format!("Sortic/{unit}/position")
}

/// Package telemetry reports.
#[must_use]
pub fn package(unit: Consignor) -> String {
    format!("Sortic/{unit}/package")
}

/// Forwarded fault reports.
#[must_use]
pub fn error(unit: Consignor) -> String {
    format!("Sortic/{unit}/error")
}

/// Handshake messages published by the unit.
#[must_use]
pub fn handshake(unit: Consignor) -> String {
    format!("Sortic/{unit}/handshake")
}

/// Wildcard pattern matching every box availability announcement.
#[must_use]
pub fn box_available_wildcard() -> String {
    "Box/+/available".to_string()
}

/// Handshake topic of a specific box.
#[must_use]
pub fn box_handshake(box_id: Consignor) -> String {
    format!("Box/{box_id}/handshake")
}

/// State topic of a specific box.
#[must_use]
pub fn box_state(box_id: Consignor) -> String {
    format!("Box/{box_id}/state")
}

/// Loopback topic used by the buffer simulation fallback.
#[must_use]
pub fn buffer(unit: Consignor) -> String {
    format!("{unit}/buffer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_layout() {
        assert_eq!(status(Consignor::SO1), "Sortic/SO1/status");
        assert_eq!(box_handshake(Consignor::SB2), "Box/SB2/handshake");
        assert_eq!(box_state(Consignor::SB1), "Box/SB1/state");
        assert_eq!(buffer(Consignor::SO1), "SO1/buffer");
        assert_eq!(box_available_wildcard(), "Box/+/available");
    }
}
