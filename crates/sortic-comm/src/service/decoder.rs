//! Command decoder: maps an inbound side-channel command to an FSM event.

use sortic_messages::{commands::tags, ControllerCommand};

use crate::events::Event;

/// Decode the command's tag into an event. Pure; no side effects.
///
/// Unrecognized tags decode to [`Event::Error`]: a garbled side channel is a
/// protocol fault, not something to ignore.
#[must_use]
pub fn decode_command(command: &ControllerCommand) -> Event {
    match command.tag.as_str() {
        tags::NO_COMMAND => Event::NoEvent,
        tags::PUBLISH_STATE
        | tags::PUBLISH_POSITION
        | tags::PUBLISH_PACKAGE
        | tags::PUBLISH_ERROR
        | tags::PUBLISH_INIT => Event::Publish,
        tags::BOX_COMMUNICATION => Event::SearchBox,
        tags::ARRIV_CONFIRMATION => Event::ArrivConfirmation,
        _ => Event::Error,
    }
}
