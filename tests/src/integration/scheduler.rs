//! Runtime tick loop against the wall clock: the same wiring the binary
//! uses, with shortened timing gates.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sortic_comm::{CommTimings, CommunicationService, State};
    use sortic_messages::{commands::tags, topics, Consignor, ControllerCommand};
    use sortic_runtime::{CommandBus, MemoryBroker, SystemClock};

    fn short_timings() -> CommTimings {
        CommTimings {
            bus_poll_ms: 5,
            net_poll_ms: 5,
            republish_ms: 5,
            settle_ms: 10,
        }
    }

    #[tokio::test]
    async fn test_tick_loop_publishes_a_commanded_report() {
        let (cmd_bus, bus_handle) = CommandBus::new();
        let (broker, broker_handle) = MemoryBroker::new();
        let mut service = CommunicationService::new(
            Consignor::SO1,
            short_timings(),
            Box::new(SystemClock::new()),
            cmd_bus,
            broker,
        );

        bus_handle.write_command(ControllerCommand::new(tags::PUBLISH_INIT));

        let status_topic = topics::status(Consignor::SO1);
        let mut ticker = tokio::time::interval(Duration::from_millis(5));
        for _ in 0..100 {
            ticker.tick().await;
            service.tick().unwrap();
            if !broker_handle.published_on(&status_topic).is_empty() {
                break;
            }
        }

        assert_eq!(broker_handle.published_on(&status_topic).len(), 1);
        assert_eq!(service.state(), State::Idle);
    }
}
