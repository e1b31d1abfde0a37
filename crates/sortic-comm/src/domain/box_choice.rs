//! Pluggable box-choice policy.
//!
//! Applied to boxes advertising the wildcard region after the exact
//! region-match pass came up empty.

use sortic_messages::{Consignor, Line, Region};

use super::SorticContext;

/// An available box extracted from the availability buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCandidate {
    pub consignor: Consignor,
    pub line: Line,
    pub target_region: Region,
}

/// Strategy seam for picking among wildcard-region boxes.
pub trait BoxChoicePolicy: Send + Sync {
    /// Pick a box, or decline and let the unit fall back to buffer
    /// simulation.
    fn choose(&self, candidates: &[BoxCandidate], context: &SorticContext) -> Option<Consignor>;
}

/// Default policy: always decline.
///
/// A real heuristic (fill level, distance, line congestion) plugs in here;
/// until then every wildcard candidate defers to the buffer simulation path.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclineAll;

impl BoxChoicePolicy for DeclineAll {
    fn choose(&self, _candidates: &[BoxCandidate], _context: &SorticContext) -> Option<Consignor> {
        None
    }
}
