//! Side-channel adapter: the single-slot command bus to the motion
//! controller.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use sortic_comm::{BusGateway, GatewayError};
use sortic_messages::{ControllerCommand, HubCommand};

#[derive(Default)]
struct BusShared {
    /// At most one inbound command pending at a time.
    inbound: Mutex<Option<ControllerCommand>>,
    outbound: Mutex<VecDeque<HubCommand>>,
}

/// Controller-facing side of the command bus.
#[derive(Clone, Default)]
pub struct CommandBus {
    shared: Arc<BusShared>,
}

/// Host-facing side: writes inbound commands, drains outbound ones.
#[derive(Clone)]
pub struct CommandBusHandle {
    shared: Arc<BusShared>,
}

impl CommandBus {
    /// Create a connected bus pair.
    #[must_use]
    pub fn new() -> (Self, CommandBusHandle) {
        let shared = Arc::new(BusShared::default());
        (
            Self {
                shared: Arc::clone(&shared),
            },
            CommandBusHandle { shared },
        )
    }
}

impl CommandBusHandle {
    /// Place a command in the inbound slot.
    ///
    /// An unconsumed previous command is overwritten; the side channel has
    /// no queueing, the latest command wins.
    pub fn write_command(&self, command: ControllerCommand) {
        let mut slot = self.shared.inbound.lock();
        if slot.is_some() {
            warn!(tag = %command.tag, "Overwriting unconsumed bus command");
        }
        *slot = Some(command);
    }

    /// Drain everything the controller has written back.
    pub fn drain_outbound(&self) -> Vec<HubCommand> {
        self.shared.outbound.lock().drain(..).collect()
    }
}

impl BusGateway for CommandBus {
    fn has_pending_inbound(&self) -> bool {
        self.shared.inbound.lock().is_some()
    }

    fn take_pending_inbound(&self) -> Option<ControllerCommand> {
        self.shared.inbound.lock().take()
    }

    fn send_outbound(&self, command: HubCommand) -> Result<(), GatewayError> {
        self.shared.outbound.lock().push_back(command);
        Ok(())
    }
}
