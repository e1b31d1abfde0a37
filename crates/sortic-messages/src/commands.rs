//! Command-channel records exchanged with the attached motion controller.
//!
//! The side channel is narrow: at most one pending record in each direction.
//! Tags are fixed 11-character strings inherited from the controller's bus
//! protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::Line;

/// Inbound command tags.
pub mod tags {
    /// Sentinel meaning "no command pending".
    pub const NO_COMMAND: &str = "null#######";
    pub const PUBLISH_STATE: &str = "PublishSTA#";
    pub const PUBLISH_POSITION: &str = "PublishPOS#";
    pub const PUBLISH_PACKAGE: &str = "PublishPAC#";
    pub const PUBLISH_ERROR: &str = "PublishERR#";
    pub const PUBLISH_INIT: &str = "PublishINI#";
    pub const BOX_COMMUNICATION: &str = "BoxComm####";
    pub const ARRIV_CONFIRMATION: &str = "ArrivConf##";

    /// Outbound: sort the package toward the negotiated target line.
    pub const SORT_PACKAGE: &str = "SortPackage";
    /// Outbound: the package arrived in the box (or the simulated buffer).
    pub const PACKAGE_ARRIVED: &str = "PackageArri";
}

/// Motion controller FSM states, as reported over the side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    ReadRfidVal,
    WaitForSort,
    SortPackageInBox,
    WaitForArriv,
    ErrorState,
    ResetState,
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MotionState::ReadRfidVal => "readRfidVal",
            MotionState::WaitForSort => "waitForSort",
            MotionState::SortPackageInBox => "sortPackageInBox",
            MotionState::WaitForArriv => "waitForArriv",
            MotionState::ErrorState => "errorState",
            MotionState::ResetState => "resetState",
        };
        write!(f, "{name}")
    }
}

/// Fixed-shape inbound command record from the motion controller.
///
/// Only the fields relevant to the tagged command are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerCommand {
    pub tag: String,
    pub state: Option<MotionState>,
    pub position: Option<u32>,
    pub package_id: Option<u32>,
    pub cargo: Option<String>,
    pub target_destination: Option<String>,
    pub fault_code: Option<String>,
    pub token: Option<String>,
}

impl ControllerCommand {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// True for the "no command pending" sentinel.
    #[must_use]
    pub fn is_no_command(&self) -> bool {
        self.tag == tags::NO_COMMAND
    }
}

/// Outbound command record written back to the motion controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubCommand {
    pub tag: String,
    pub target_line: Option<Line>,
}

impl HubCommand {
    #[must_use]
    pub fn sort_package(target_line: Line) -> Self {
        Self {
            tag: tags::SORT_PACKAGE.to_string(),
            target_line: Some(target_line),
        }
    }

    #[must_use]
    pub fn package_arrived() -> Self {
        Self {
            tag: tags::PACKAGE_ARRIVED.to_string(),
            target_line: None,
        }
    }
}
