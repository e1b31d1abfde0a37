//! Box reservation scenarios over the in-memory broker: wire encoding,
//! wildcard subscriptions, and the three-phase handshake all in play.

#[cfg(test)]
mod tests {
    use crate::integration::support::{available, hub};

    use sortic_comm::State;
    use sortic_messages::{
        commands::tags, topics, Consignor, ControllerCommand, Line, MessageBody, MotionState,
        Region, SorticMessage,
    };

    #[test]
    fn test_full_negotiation_over_the_broker() {
        let (mut service, bus, broker, clock) = hub();
        service.context_mut().target_region = Some(Region::from("East"));

        bus.write_command(ControllerCommand::new(tags::BOX_COMMUNICATION));
        clock.advance(400);
        service.tick().unwrap();
        assert_eq!(service.state(), State::BoxCommunication);

        // Two boxes announce themselves; the wildcard subscription catches
        // both, the region match decides.
        assert!(broker.deliver(
            "Box/SB2/available",
            &available(1, Consignor::SB2, Line::Line1, "West"),
        ));
        assert!(broker.deliver(
            "Box/SB1/available",
            &available(2, Consignor::SB1, Line::Line2, "East"),
        ));

        clock.advance(5_000);
        service.tick().unwrap();
        assert_eq!(service.context().req, Some(Consignor::SB1));
        let sorted = bus.drain_outbound();
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].tag, tags::SORT_PACKAGE);
        assert_eq!(sorted[0].target_line, Some(Line::Line2));

        // Reservation request goes out; the box answers by naming this unit.
        service.tick().unwrap();
        let handshake_topic = topics::handshake(Consignor::SO1);
        assert_eq!(broker.published_on(&handshake_topic).len(), 1);

        assert!(broker.deliver(
            &topics::box_handshake(Consignor::SB1),
            &SorticMessage::new(
                10,
                Consignor::SB1,
                MessageBody::Handshake {
                    req: Some(Consignor::SO1),
                    ack: None,
                    cargo: None,
                    target_region: None,
                    target_line: None,
                },
            ),
        ));
        service.tick().unwrap();
        assert_eq!(service.context().ack, Some(Consignor::SB1));

        // Confirmation carries the full session; the box acknowledges.
        service.tick().unwrap();
        let confirmations = broker.published_on(&handshake_topic);
        assert_eq!(confirmations.len(), 2);
        assert_eq!(
            confirmations[1].body,
            MessageBody::Handshake {
                req: Some(Consignor::SB1),
                ack: Some(Consignor::SB1),
                cargo: None,
                target_region: Some(Region::from("East")),
                target_line: Some(Line::Line2),
            }
        );

        assert!(broker.deliver(
            &topics::box_handshake(Consignor::SB1),
            &SorticMessage::new(
                11,
                Consignor::SB1,
                MessageBody::Handshake {
                    req: None,
                    ack: Some(Consignor::SO1),
                    cargo: None,
                    target_region: None,
                    target_line: None,
                },
            ),
        ));
        service.tick().unwrap();

        assert_eq!(service.state(), State::Idle);
        let sorted = bus.drain_outbound();
        assert!(sorted.iter().all(|c| c.tag == tags::SORT_PACKAGE));
        assert_eq!(sorted.last().unwrap().target_line, Some(Line::Line2));
    }

    #[test]
    fn test_no_box_falls_back_to_buffer_simulation() {
        let (mut service, bus, broker, clock) = hub();
        service.context_mut().target_region = Some(Region::from("East"));

        bus.write_command(ControllerCommand::new(tags::BOX_COMMUNICATION));
        clock.advance(400);
        service.tick().unwrap();

        // Only a region-less box announces; the default policy declines it.
        assert!(broker.deliver(
            "Box/SB3/available",
            &available(1, Consignor::SB3, Line::Line3, Region::WILDCARD),
        ));
        clock.advance(5_000);
        service.tick().unwrap();
        assert_eq!(service.state(), State::BufferSimulation);

        let buffer_topic = topics::buffer(Consignor::SO1);
        let announced = broker.published_on(&buffer_topic);
        assert_eq!(announced.len(), 1);
        assert_eq!(
            announced[0].body,
            MessageBody::BufferStatus {
                full: true,
                cleared: false,
            }
        );

        // The hub reports the buffer cleared; the package is done.
        assert!(broker.deliver(
            &buffer_topic,
            &SorticMessage::new(
                5,
                Consignor::SB1,
                MessageBody::BufferStatus {
                    full: false,
                    cleared: true,
                },
            ),
        ));
        bus.drain_outbound();
        service.tick().unwrap();

        assert_eq!(service.state(), State::Idle);
        let drained = bus.drain_outbound();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].tag, tags::PACKAGE_ARRIVED);
    }

    #[test]
    fn test_repeated_announcement_is_buffered_once() {
        let (mut service, bus, broker, clock) = hub();
        service.context_mut().target_region = Some(Region::from("East"));

        bus.write_command(ControllerCommand::new(tags::BOX_COMMUNICATION));
        clock.advance(400);
        service.tick().unwrap();

        // Boxes republish their announcements; the same (id, consignor)
        // crosses the broker twice.
        let announcement = available(7, Consignor::SB1, Line::Line2, "East");
        assert!(broker.deliver("Box/SB1/available", &announcement));
        assert!(broker.deliver("Box/SB1/available", &announcement));

        service.tick().unwrap();
        assert_eq!(service.buffers().total_len(), 1);
    }

    #[test]
    fn test_state_report_crosses_the_wire() {
        let (mut service, bus, broker, clock) = hub();
        let mut command = ControllerCommand::new(tags::PUBLISH_STATE);
        command.state = Some(MotionState::WaitForSort);
        bus.write_command(command);

        clock.advance(400);
        service.tick().unwrap();
        service.tick().unwrap();

        let reports = broker.published_on(&topics::status(Consignor::SO1));
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].body,
            MessageBody::StateReport {
                state: "waitForSort".into()
            }
        );
    }
}
