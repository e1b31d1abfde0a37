//! Cross-crate integration scenarios: the controller driven through the
//! runtime's gateway adapters.

pub mod negotiation;
pub mod recovery;
pub mod scheduler;

pub mod support {
    //! Shared fixture: a hub wired to the in-memory adapters with a manual
    //! clock.

    use sortic_comm::testing::ManualClock;
    use sortic_comm::{CommTimings, CommunicationService};
    use sortic_messages::{Consignor, Line, MessageBody, Region, SorticMessage};
    use sortic_runtime::{CommandBus, CommandBusHandle, MemoryBroker, MemoryBrokerHandle};

    pub type HubService = CommunicationService<CommandBus, MemoryBroker>;

    pub fn hub() -> (HubService, CommandBusHandle, MemoryBrokerHandle, ManualClock) {
        let clock = ManualClock::new(0);
        let (bus, bus_handle) = CommandBus::new();
        let (broker, broker_handle) = MemoryBroker::new();
        let service = CommunicationService::new(
            Consignor::SO1,
            CommTimings::default(),
            Box::new(clock.clone()),
            bus,
            broker,
        );
        (service, bus_handle, broker_handle, clock)
    }

    pub fn available(msg_id: u64, consignor: Consignor, line: Line, region: &str) -> SorticMessage {
        SorticMessage::new(
            msg_id,
            consignor,
            MessageBody::BoxAvailable {
                line,
                target_region: Region::from(region),
            },
        )
    }

    pub fn fault(msg_id: u64, consignor: Consignor) -> SorticMessage {
        SorticMessage::new(
            msg_id,
            consignor,
            MessageBody::Error {
                fault_code: Some("E7".into()),
                token: Some("tok".into()),
            },
        )
    }

    pub fn fault_clear(msg_id: u64, consignor: Consignor) -> SorticMessage {
        SorticMessage::new(
            msg_id,
            consignor,
            MessageBody::Error {
                fault_code: None,
                token: None,
            },
        )
    }
}
