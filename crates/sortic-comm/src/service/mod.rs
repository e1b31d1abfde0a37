//! Service layer: the communication controller FSM and its command decoder.

mod decoder;
mod fsm;


pub use decoder::decode_command;
pub use fsm::{CommunicationService, State};
