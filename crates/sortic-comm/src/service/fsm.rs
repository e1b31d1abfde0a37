//! # Communication Controller FSM
//!
//! Owns the current state, dispatches one do-action per tick and applies at
//! most one transition per `process` step. Entry and exit actions perform
//! side effects (subscribe, publish, write bus commands) but never produce
//! events; only do-actions do.
//!
//! The box negotiation runs as three phases of the same state, selected by
//! the event that caused (re-)entry: `SearchBox` scans availability
//! announcements, `BoxAvailable` requests a reservation, `ReqBox` confirms
//! it. Any state that observes a buffered fault stops its own work for the
//! pass and returns `Error`.

use tracing::{debug, error, info, trace, warn};

use sortic_messages::{
    commands::tags, topics, Consignor, ControllerCommand, HubCommand, Line, MessageBody, Region,
    SorticMessage,
};

use crate::domain::{
    BoxCandidate, BoxChoicePolicy, CommTimings, DeclineAll, MessageBuffers, PollGate,
    SorticContext,
};
use crate::events::{CommError, Event};
use crate::ports::{BusGateway, NetworkGateway, TimeSource};

use super::decoder::decode_command;

/// FSM states. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Publish,
    BoxCommunication,
    ArrivConfirmation,
    BufferSimulation,
    ErrorState,
    ResetState,
}

/// The communication controller.
///
/// Generic over the two gateway ports; the clock and the box-choice policy
/// are boxed seams so hosts and tests can swap them freely.
///
/// Single-threaded by design: one `tick()` per scheduling pass, no
/// preemption. A do-action that has to wait returns `NoEvent` and is
/// re-invoked on the next pass.
pub struct CommunicationService<B, N>
where
    B: BusGateway,
    N: NetworkGateway,
{
    state: State,
    /// Resume target recorded on entry to the error state.
    last_state_before_error: State,
    /// Event that caused (re-)entry into box communication; phase selector.
    phase: Event,
    context: SorticContext,
    buffers: MessageBuffers,
    timings: CommTimings,
    time: Box<dyn TimeSource>,
    policy: Box<dyn BoxChoicePolicy>,
    bus: B,
    network: N,
    /// Per-sender strictly increasing message id.
    msg_id: u64,
    /// The single in-flight inbound command; cleared by the exit action of
    /// the state that consumed it.
    pending_command: Option<ControllerCommand>,
    bus_gate: PollGate,
    net_gate: PollGate,
    publish_gate: PollGate,
    /// Availability drain is gated until this deadline after subscribing.
    settle_deadline: u64,
}

impl<B, N> CommunicationService<B, N>
where
    B: BusGateway,
    N: NetworkGateway,
{
    pub fn new(
        id: Consignor,
        timings: CommTimings,
        time: Box<dyn TimeSource>,
        bus: B,
        network: N,
    ) -> Self {
        let now = time.now_ms();
        Self {
            state: State::Idle,
            last_state_before_error: State::Idle,
            phase: Event::SearchBox,
            context: SorticContext::new(id),
            buffers: MessageBuffers::new(),
            timings,
            time,
            policy: Box::new(DeclineAll),
            bus,
            network,
            msg_id: 0,
            pending_command: None,
            bus_gate: PollGate::new(now),
            net_gate: PollGate::new(now),
            publish_gate: PollGate::new(now),
            settle_deadline: 0,
        }
    }

    /// Replace the box-choice policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn BoxChoicePolicy>) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn context(&self) -> &SorticContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SorticContext {
        &mut self.context
    }

    #[must_use]
    pub fn buffers(&self) -> &MessageBuffers {
        &self.buffers
    }

    /// One scheduling pass: run the active do-action, apply its event.
    pub fn tick(&mut self) -> Result<(), CommError> {
        let event = self.do_action()?;
        self.process(event)
    }

    /// Apply an externally supplied event first, then do an ordinary pass.
    pub fn tick_with(&mut self, event: Event) -> Result<(), CommError> {
        self.process(event)?;
        self.tick()
    }

    // =========================================================================
    // Transition step
    // =========================================================================

    /// Transition table. Unlisted pairs are deliberate no-ops so stray
    /// events cannot perturb in-progress work.
    fn next_state(&self, event: Event) -> Option<State> {
        use Event as E;
        use State as S;
        match (self.state, event) {
            (S::Idle, E::Publish) => Some(S::Publish),
            (S::Idle, E::SearchBox) => Some(S::BoxCommunication),
            (S::Idle, E::ArrivConfirmation) => Some(S::ArrivConfirmation),
            (S::Idle, E::Error) => Some(S::ErrorState),

            (S::Publish, E::NoEvent) => Some(S::Idle),
            (S::Publish, E::Error) => Some(S::ErrorState),

            (S::BoxCommunication, E::SimulateBuffer) => Some(S::BufferSimulation),
            (S::BoxCommunication, E::BoxAvailable | E::ReqBox) => Some(S::BoxCommunication),
            (S::BoxCommunication, E::AnswerReceived) => Some(S::Idle),
            (S::BoxCommunication, E::Error) => Some(S::ErrorState),

            (S::ArrivConfirmation, E::AnswerReceived) => Some(S::Idle),
            (S::ArrivConfirmation, E::Error) => Some(S::ErrorState),

            (S::BufferSimulation, E::AnswerReceived) => Some(S::Idle),
            (S::BufferSimulation, E::Error) => Some(S::ErrorState),

            (S::ErrorState, E::Resume) => Some(self.last_state_before_error),
            (S::ErrorState, E::Reset) => Some(S::ResetState),

            // A fault-confirmed reset always resumes into idle, never back
            // into the interrupted activity.
            (S::ResetState, E::Resume) => Some(S::Idle),

            _ => None,
        }
    }

    fn process(&mut self, event: Event) -> Result<(), CommError> {
        let Some(next) = self.next_state(event) else {
            trace!(state = ?self.state, ?event, "No transition");
            return Ok(());
        };

        self.exit_action()?;
        if next == State::ErrorState {
            self.last_state_before_error = self.state;
        }
        info!(from = ?self.state, to = ?next, ?event, "State transition");
        self.state = next;
        self.entry_action(event)
    }

    // =========================================================================
    // Do-actions
    // =========================================================================

    fn do_action(&mut self) -> Result<Event, CommError> {
        match self.state {
            State::Idle => self.do_idle(),
            State::Publish => self.do_publish(),
            State::BoxCommunication => self.do_box_communication(),
            State::ArrivConfirmation => self.do_arriv_confirmation(),
            State::BufferSimulation => self.do_buffer_simulation(),
            State::ErrorState => Ok(self.do_error_state()),
            State::ResetState => Ok(self.do_reset_state()),
        }
    }

    fn do_idle(&mut self) -> Result<Event, CommError> {
        let now = self.time.now_ms();
        if self.bus_gate.ready(now, self.timings.bus_poll_ms) && self.bus.has_pending_inbound() {
            if let Some(command) = self.bus.take_pending_inbound() {
                if !command.is_no_command() {
                    let event = decode_command(&command);
                    debug!(tag = %command.tag, ?event, "Decoded side-channel command");
                    self.pending_command = Some(command);
                    // Network work is skipped for this pass.
                    return Ok(event);
                }
            }
        }

        let now = self.time.now_ms();
        if self.net_gate.ready(now, self.timings.net_poll_ms) {
            self.pump_network();
        }
        if self.latch_fault() {
            return Ok(Event::Error);
        }
        Ok(Event::NoEvent)
    }

    /// One-shot side effect: publish exactly one report for the command
    /// that caused entry, then fall back to idle unconditionally.
    fn do_publish(&mut self) -> Result<Event, CommError> {
        let Some(command) = self.pending_command.clone() else {
            return Ok(Event::NoEvent);
        };
        let unit = self.context.id;
        match command.tag.as_str() {
            tags::PUBLISH_STATE => {
                let state = command
                    .state
                    .map_or_else(|| "unknown".to_string(), |s| s.to_string());
                let msg = self.next_message(MessageBody::StateReport { state });
                self.network.publish(&topics::status(unit), &msg)?;
            }
            tags::PUBLISH_POSITION => {
                let msg = self.next_message(MessageBody::PositionReport {
                    position: command.position.unwrap_or(0),
                });
                self.network.publish(&topics::position(unit), &msg)?;
            }
            tags::PUBLISH_PACKAGE => {
                // Package telemetry also refreshes the session state used by
                // the upcoming negotiation.
                self.context.package_id = command.package_id;
                self.context.cargo.clone_from(&command.cargo);
                self.context
                    .target_destination
                    .clone_from(&command.target_destination);
                let msg = self.next_message(MessageBody::PackageReport {
                    package_id: command.package_id.unwrap_or(0),
                    cargo: command.cargo.clone().unwrap_or_default(),
                    target_destination: command.target_destination.clone().unwrap_or_default(),
                    target_region: self
                        .context
                        .target_region
                        .clone()
                        .unwrap_or_else(Region::wildcard),
                });
                self.network.publish(&topics::package(unit), &msg)?;
            }
            tags::PUBLISH_ERROR => {
                let msg = self.next_message(MessageBody::ErrorReport {
                    fault_code: command.fault_code.clone(),
                    token: command.token.clone(),
                });
                self.network.publish(&topics::error(unit), &msg)?;
            }
            tags::PUBLISH_INIT => {
                let msg = self.next_message(MessageBody::InitReport);
                self.network.publish(&topics::status(unit), &msg)?;
            }
            other => warn!(tag = %other, "Publish entered with a non-publish command"),
        }
        Ok(Event::NoEvent)
    }

    fn do_box_communication(&mut self) -> Result<Event, CommError> {
        self.pump_network();
        if self.latch_fault() {
            return Ok(Event::Error);
        }

        match self.phase {
            Event::SearchBox => self.search_box(),
            Event::BoxAvailable => self.request_reservation(),
            Event::ReqBox => self.confirm_reservation(),
            // Entered with an event no phase claims; treat as a fault.
            _ => Ok(Event::Error),
        }
    }

    /// Phase 1: drain availability announcements and pick a box.
    fn search_box(&mut self) -> Result<Event, CommError> {
        if self.time.now_ms() < self.settle_deadline {
            return Ok(Event::NoEvent);
        }

        let drained = self.buffers.take_box_available();
        if drained.is_empty() {
            return Ok(Event::NoEvent);
        }

        // Exact region match wins over buffer order.
        if let Some(target) = self.context.target_region.clone() {
            for msg in &drained {
                if let MessageBody::BoxAvailable {
                    line,
                    target_region,
                } = &msg.body
                {
                    if *target_region == target {
                        debug!(consignor = %msg.consignor, region = %target, "Available box for target region");
                        return self.select_box(msg.consignor, *line);
                    }
                }
            }
        }

        // Wildcard-region boxes go through the pluggable policy.
        let candidates: Vec<BoxCandidate> = drained
            .iter()
            .filter_map(|msg| match &msg.body {
                MessageBody::BoxAvailable {
                    line,
                    target_region,
                } if target_region.is_wildcard() => Some(BoxCandidate {
                    consignor: msg.consignor,
                    line: *line,
                    target_region: target_region.clone(),
                }),
                _ => None,
            })
            .collect();
        if let Some(chosen) = self.policy.choose(&candidates, &self.context) {
            if let Some(candidate) = candidates.iter().find(|c| c.consignor == chosen) {
                debug!(consignor = %chosen, "Box chosen by policy");
                return self.select_box(candidate.consignor, candidate.line);
            }
        }

        debug!("No box available; falling back to buffer simulation");
        self.network.unsubscribe(&topics::box_available_wildcard())?;
        Ok(Event::SimulateBuffer)
    }

    fn select_box(&mut self, consignor: Consignor, line: Line) -> Result<Event, CommError> {
        self.context.req = Some(consignor);
        self.context.target_line = line;
        self.network.unsubscribe(&topics::box_available_wildcard())?;
        Ok(Event::BoxAvailable)
    }

    /// Phase 2: republish the reservation request until the box addresses
    /// this unit in its own request field.
    fn request_reservation(&mut self) -> Result<Event, CommError> {
        let Some(req) = self.context.req else {
            return Ok(Event::Error);
        };

        let now = self.time.now_ms();
        if self.publish_gate.ready(now, self.timings.republish_ms) {
            let msg = self.next_message(MessageBody::Handshake {
                req: Some(req),
                ack: None,
                cargo: None,
                target_region: None,
                target_line: None,
            });
            self.network
                .publish(&topics::handshake(self.context.id), &msg)?;
        }

        let unit = self.context.id;
        let answered = self.buffers.front_handshake().is_some_and(|front| {
            front.consignor == req
                && matches!(&front.body, MessageBody::Handshake { req: Some(r), .. } if *r == unit)
        });
        if answered {
            // The counterpart named us; only now may ack be set.
            self.context.ack = Some(req);
            self.network.unsubscribe(&topics::box_handshake(req))?;
            self.buffers.clear_handshake();
            return Ok(Event::ReqBox);
        }
        Ok(Event::NoEvent)
    }

    /// Phase 3: republish the full handshake until the box acknowledges it.
    fn confirm_reservation(&mut self) -> Result<Event, CommError> {
        let Some(ack) = self.context.ack else {
            return Ok(Event::Error);
        };

        let now = self.time.now_ms();
        if self.publish_gate.ready(now, self.timings.republish_ms) {
            let msg = self.next_message(MessageBody::Handshake {
                req: self.context.req,
                ack: Some(ack),
                cargo: self.context.cargo.clone(),
                target_region: self.context.target_region.clone(),
                target_line: Some(self.context.target_line),
            });
            self.network
                .publish(&topics::handshake(self.context.id), &msg)?;
        }

        let unit = self.context.id;
        let confirmed = self.buffers.front_handshake().is_some_and(|front| {
            front.consignor == ack
                && matches!(&front.body, MessageBody::Handshake { ack: Some(a), .. } if *a == unit)
        });
        if confirmed {
            self.network.unsubscribe(&topics::box_handshake(ack))?;
            self.buffers.clear_handshake();
            return Ok(Event::AnswerReceived);
        }
        Ok(Event::NoEvent)
    }

    fn do_arriv_confirmation(&mut self) -> Result<Event, CommError> {
        self.pump_network();
        if self.latch_fault() {
            return Ok(Event::Error);
        }

        let retrieved = self.buffers.front_box_state().is_some_and(|front| {
            matches!(&front.body, MessageBody::BoxState { state } if state == MessageBody::BOX_STATE_RETRIEVED)
        });
        if retrieved {
            if let Some(ack) = self.context.ack {
                self.network.unsubscribe(&topics::box_state(ack))?;
            }
            self.buffers.clear_box_state();
            self.bus.send_outbound(HubCommand::package_arrived())?;
            return Ok(Event::AnswerReceived);
        }
        Ok(Event::NoEvent)
    }

    fn do_buffer_simulation(&mut self) -> Result<Event, CommError> {
        self.pump_network();
        if self.latch_fault() {
            return Ok(Event::Error);
        }

        let cleared = self.buffers.front_buffer_status().is_some_and(|front| {
            matches!(
                &front.body,
                MessageBody::BufferStatus {
                    full: false,
                    cleared: true,
                }
            )
        });
        if cleared {
            self.network
                .unsubscribe(&topics::buffer(self.context.id))?;
            self.buffers.clear_buffer_status();
            self.bus.send_outbound(HubCommand::package_arrived())?;
            return Ok(Event::AnswerReceived);
        }
        Ok(Event::NoEvent)
    }

    /// Drain the error buffer; the last classification wins. A *clear*
    /// carries neither fault code nor token, a *fault* carries both.
    fn do_error_state(&mut self) -> Event {
        self.pump_network();
        let mut verdict = Event::NoEvent;
        for msg in self.buffers.drain_errors() {
            if msg.body.is_fault_clear() {
                verdict = Event::Resume;
            } else if msg.body.is_fault() {
                verdict = Event::Reset;
            }
        }
        verdict
    }

    fn do_reset_state(&mut self) -> Event {
        self.buffers.clear_all();
        Event::Resume
    }

    // =========================================================================
    // Entry / exit actions
    // =========================================================================

    fn entry_action(&mut self, cause: Event) -> Result<(), CommError> {
        match self.state {
            State::Idle => {
                let now = self.time.now_ms();
                self.bus_gate.reset(now);
                self.net_gate.reset(now);
                Ok(())
            }
            State::Publish => Ok(()),
            State::BoxCommunication => self.entry_box_communication(cause),
            State::ArrivConfirmation => {
                if let Some(ack) = self.context.ack {
                    self.network.subscribe(&topics::box_state(ack))?;
                }
                Ok(())
            }
            State::BufferSimulation => {
                // Publish before subscribing so our own announcement is not
                // echoed back into the buffer-status buffer.
                let msg = self.next_message(MessageBody::BufferStatus {
                    full: true,
                    cleared: false,
                });
                let topic = topics::buffer(self.context.id);
                self.network.publish(&topic, &msg)?;
                self.network.subscribe(&topic)?;
                Ok(())
            }
            State::ErrorState | State::ResetState => {
                error!(resume_target = ?self.last_state_before_error, "Entering error handling");
                let msg = self.next_message(MessageBody::StateReport {
                    state: "errorState".to_string(),
                });
                self.network.publish(&topics::status(self.context.id), &msg)?;
                Ok(())
            }
        }
    }

    /// Re-subscribes to whatever topic the stored phase requires; gateways
    /// must treat repeated subscriptions as idempotent.
    fn entry_box_communication(&mut self, cause: Event) -> Result<(), CommError> {
        if cause != Event::Resume {
            self.phase = cause;
        }
        let now = self.time.now_ms();
        match self.phase {
            Event::SearchBox => {
                if self.context.actual_line == Line::UploadLine {
                    self.network.subscribe(&topics::box_available_wildcard())?;
                }
                self.settle_deadline = now + self.timings.settle_ms;
            }
            Event::BoxAvailable => {
                if let Some(req) = self.context.req {
                    self.network.subscribe(&topics::box_handshake(req))?;
                }
                self.publish_gate.expire(now, self.timings.republish_ms);
            }
            Event::ReqBox => {
                if let Some(ack) = self.context.ack {
                    self.network.subscribe(&topics::box_handshake(ack))?;
                }
                self.publish_gate.expire(now, self.timings.republish_ms);
            }
            _ => {}
        }
        Ok(())
    }

    fn exit_action(&mut self) -> Result<(), CommError> {
        match self.state {
            State::Idle | State::ErrorState => Ok(()),
            State::Publish | State::ArrivConfirmation | State::BufferSimulation => {
                self.pending_command = None;
                Ok(())
            }
            State::BoxCommunication => {
                self.pending_command = None;
                self.bus
                    .send_outbound(HubCommand::sort_package(self.context.target_line))?;
                Ok(())
            }
            State::ResetState => {
                // The only place session state is restored to defaults.
                self.context.reset();
                Ok(())
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn pump_network(&mut self) {
        for msg in self.network.pump() {
            self.buffers.classify(msg);
        }
    }

    /// Drain the error buffer outside the error state: any fault entry
    /// aborts the pass; clear entries are discarded silently.
    fn latch_fault(&mut self) -> bool {
        if !self.buffers.has_errors() {
            return false;
        }
        let mut latched = false;
        for msg in self.buffers.drain_errors() {
            if msg.body.is_fault() {
                error!(msg_id = msg.msg_id, consignor = %msg.consignor, "Protocol fault observed");
                latched = true;
            }
        }
        latched
    }

    fn next_message(&mut self, body: MessageBody) -> SorticMessage {
        self.msg_id += 1;
        SorticMessage::new(self.msg_id, self.context.id, body)
    }
}
