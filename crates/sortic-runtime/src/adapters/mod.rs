//! Gateway adapters connecting the controller ports to the host.

mod broker;
mod bus;
mod clock;

pub use broker::{MemoryBroker, MemoryBrokerHandle};
pub use bus::{CommandBus, CommandBusHandle};
pub use clock::SystemClock;
