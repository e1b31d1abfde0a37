//! Fault, resume, and reset flows through the real adapters.

#[cfg(test)]
mod tests {
    use crate::integration::support::{fault, fault_clear, hub};

    use sortic_comm::{SorticContext, State};
    use sortic_messages::{commands::tags, topics, Consignor, ControllerCommand, Region};

    #[test]
    fn test_fault_clear_resumes_the_interrupted_search() {
        let (mut service, bus, broker, clock) = hub();
        service.context_mut().target_region = Some(Region::from("East"));

        bus.write_command(ControllerCommand::new(tags::BOX_COMMUNICATION));
        clock.advance(400);
        service.tick().unwrap();
        assert_eq!(service.state(), State::BoxCommunication);

        // A fault arrives on the active wildcard subscription.
        assert!(broker.deliver("Box/SB1/available", &fault(1, Consignor::SB1)));
        service.tick().unwrap();
        assert_eq!(service.state(), State::ErrorState);
        assert_eq!(
            broker.published_on(&topics::status(Consignor::SO1)).len(),
            1
        );

        // The clear arrives; the search resumes where it was interrupted,
        // with the wildcard subscription still in place.
        assert!(broker.deliver("Box/SB1/available", &fault_clear(2, Consignor::SB1)));
        service.tick().unwrap();
        assert_eq!(service.state(), State::BoxCommunication);
        assert!(broker
            .subscriptions()
            .contains(&topics::box_available_wildcard()));
    }

    #[test]
    fn test_confirmed_fault_resets_the_session() {
        let (mut service, bus, broker, clock) = hub();
        service.context_mut().target_region = Some(Region::from("East"));
        service.context_mut().cargo = Some("bolts".into());

        bus.write_command(ControllerCommand::new(tags::BOX_COMMUNICATION));
        clock.advance(400);
        service.tick().unwrap();

        assert!(broker.deliver("Box/SB1/available", &fault(1, Consignor::SB1)));
        service.tick().unwrap();
        assert_eq!(service.state(), State::ErrorState);

        // A second fault confirms: the session is torn down.
        assert!(broker.deliver("Box/SB1/available", &fault(2, Consignor::SB1)));
        service.tick().unwrap();
        assert_eq!(service.state(), State::ResetState);

        service.tick().unwrap();
        assert_eq!(service.state(), State::Idle);
        assert!(service.buffers().is_all_empty());
        assert_eq!(*service.context(), SorticContext::new(Consignor::SO1));
        // Both the error and the reset entry announced themselves.
        assert_eq!(
            broker.published_on(&topics::status(Consignor::SO1)).len(),
            2
        );
    }
}
