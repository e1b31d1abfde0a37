//! Identities and table geometry shared across the protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::MessageError;

/// Participant identity carried in every message header.
///
/// `SO1` is the sorting unit itself; `SB1`..`SB3` are the mobile collection
/// boxes it negotiates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consignor {
    SO1,
    SB1,
    SB2,
    SB3,
}

impl fmt::Display for Consignor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Consignor::SO1 => "SO1",
            Consignor::SB1 => "SB1",
            Consignor::SB2 => "SB2",
            Consignor::SB3 => "SB3",
        };
        write!(f, "{name}")
    }
}

/// Lines on the game table. `UploadLine` is where packages arrive; a
/// negotiated target line is handed to the motion controller for sorting.
///
/// Encoded as a plain integer on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Line {
    #[default]
    UploadLine,
    Line1,
    Line2,
    Line3,
}

impl From<Line> for u8 {
    fn from(line: Line) -> Self {
        match line {
            Line::UploadLine => 0,
            Line::Line1 => 1,
            Line::Line2 => 2,
            Line::Line3 => 3,
        }
    }
}

impl TryFrom<u8> for Line {
    type Error = MessageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Line::UploadLine),
            1 => Ok(Line::Line1),
            2 => Ok(Line::Line2),
            3 => Ok(Line::Line3),
            other => Err(MessageError::InvalidLine(other)),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Line::UploadLine => "UploadLine",
            Line::Line1 => "Line1",
            Line::Line2 => "Line2",
            Line::Line3 => "Line3",
        };
        write!(f, "{name}")
    }
}

/// Target region a package is destined for (for example `"East"`).
///
/// Boxes that serve no fixed region advertise the wildcard value `"-1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(pub String);

impl Region {
    /// Wildcard value advertised by boxes without a fixed region.
    pub const WILDCARD: &'static str = "-1";

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn wildcard() -> Self {
        Self(Self::WILDCARD.to_string())
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Region {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
