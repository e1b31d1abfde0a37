//! Typed inbound buffers and the message classifier.
//!
//! One FIFO buffer per inbound message kind. The classifier is the single
//! writer; the active state's do-action is the only drainer. Within one
//! buffer no two entries share the `(msg_id, consignor)` dedup key.

use std::collections::VecDeque;
use tracing::{debug, trace};

use sortic_messages::{MessageBody, SorticMessage};

/// What the classifier did with an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyOutcome {
    /// Appended to the matching typed buffer.
    Stored,
    /// Same `(msg_id, consignor)` already buffered; discarded.
    Duplicate,
    /// Outbound-only or unrecognized kind; silently dropped.
    Ignored,
}

/// The five typed inbound buffers.
#[derive(Debug, Default)]
pub struct MessageBuffers {
    error: VecDeque<SorticMessage>,
    box_available: VecDeque<SorticMessage>,
    handshake: VecDeque<SorticMessage>,
    buffer_status: VecDeque<SorticMessage>,
    box_state: VecDeque<SorticMessage>,
}

fn push_deduped(buffer: &mut VecDeque<SorticMessage>, msg: SorticMessage) -> ClassifyOutcome {
    if buffer.iter().any(|m| m.dedup_key() == msg.dedup_key()) {
        debug!(msg_id = msg.msg_id, consignor = %msg.consignor, "Duplicated message");
        return ClassifyOutcome::Duplicate;
    }
    buffer.push_back(msg);
    ClassifyOutcome::Stored
}

impl MessageBuffers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one inbound message into its typed buffer.
    pub fn classify(&mut self, msg: SorticMessage) -> ClassifyOutcome {
        match msg.body {
            MessageBody::Error { .. } => push_deduped(&mut self.error, msg),
            MessageBody::BoxAvailable { .. } => push_deduped(&mut self.box_available, msg),
            MessageBody::Handshake { .. } => push_deduped(&mut self.handshake, msg),
            MessageBody::BufferStatus { .. } => push_deduped(&mut self.buffer_status, msg),
            MessageBody::BoxState { .. } => push_deduped(&mut self.box_state, msg),
            _ => {
                trace!(msg_id = msg.msg_id, "Dropping non-inbound message kind");
                ClassifyOutcome::Ignored
            }
        }
    }

    /// Drain the error buffer completely, front first.
    pub fn drain_errors(&mut self) -> Vec<SorticMessage> {
        self.error.drain(..).collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.error.is_empty()
    }

    /// Drain the box-available buffer completely, front first.
    pub fn take_box_available(&mut self) -> Vec<SorticMessage> {
        self.box_available.drain(..).collect()
    }

    /// Peek the oldest buffered handshake message.
    pub fn front_handshake(&self) -> Option<&SorticMessage> {
        self.handshake.front()
    }

    pub fn clear_handshake(&mut self) {
        self.handshake.clear();
    }

    /// Peek the oldest buffered buffer-status message.
    pub fn front_buffer_status(&self) -> Option<&SorticMessage> {
        self.buffer_status.front()
    }

    pub fn clear_buffer_status(&mut self) {
        self.buffer_status.clear();
    }

    /// Peek the oldest buffered box-state message.
    pub fn front_box_state(&self) -> Option<&SorticMessage> {
        self.box_state.front()
    }

    pub fn clear_box_state(&mut self) {
        self.box_state.clear();
    }

    /// Clear every typed buffer unconditionally.
    pub fn clear_all(&mut self) {
        self.error.clear();
        self.box_available.clear();
        self.handshake.clear();
        self.buffer_status.clear();
        self.box_state.clear();
    }

    /// True when all five buffers are empty.
    #[must_use]
    pub fn is_all_empty(&self) -> bool {
        self.error.is_empty()
            && self.box_available.is_empty()
            && self.handshake.is_empty()
            && self.buffer_status.is_empty()
            && self.box_state.is_empty()
    }

    /// Total buffered messages across all kinds.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.error.len()
            + self.box_available.len()
            + self.handshake.len()
            + self.buffer_status.len()
            + self.box_state.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortic_messages::{Consignor, Line, Region};

    fn available(msg_id: u64, consignor: Consignor, region: &str) -> SorticMessage {
        SorticMessage::new(
            msg_id,
            consignor,
            MessageBody::BoxAvailable {
                line: Line::Line1,
                target_region: Region::from(region),
            },
        )
    }

    #[test]
    fn test_classifier_routes_by_kind() {
        let mut buffers = MessageBuffers::new();
        assert_eq!(
            buffers.classify(available(1, Consignor::SB1, "East")),
            ClassifyOutcome::Stored
        );
        assert_eq!(
            buffers.classify(SorticMessage::new(
                1,
                Consignor::SB1,
                MessageBody::BoxState {
                    state: "idle".into()
                },
            )),
            ClassifyOutcome::Stored
        );
        assert_eq!(buffers.take_box_available().len(), 1);
        assert!(buffers.front_box_state().is_some());
    }

    #[test]
    fn test_duplicates_rejected_for_any_insertion_order() {
        let mut buffers = MessageBuffers::new();
        // Same key twice, interleaved with a different sender holding the
        // same id: only the true duplicate is dropped.
        assert_eq!(
            buffers.classify(available(5, Consignor::SB1, "East")),
            ClassifyOutcome::Stored
        );
        assert_eq!(
            buffers.classify(available(5, Consignor::SB2, "West")),
            ClassifyOutcome::Stored
        );
        assert_eq!(
            buffers.classify(available(5, Consignor::SB1, "West")),
            ClassifyOutcome::Duplicate
        );
        assert_eq!(buffers.take_box_available().len(), 2);
    }

    #[test]
    fn test_outbound_kinds_ignored() {
        let mut buffers = MessageBuffers::new();
        let report = SorticMessage::new(
            1,
            Consignor::SO1,
            MessageBody::StateReport {
                state: "idle".into(),
            },
        );
        assert_eq!(buffers.classify(report), ClassifyOutcome::Ignored);
        assert!(buffers.is_all_empty());
    }

    #[test]
    fn test_fifo_order_preserved() {
        let mut buffers = MessageBuffers::new();
        buffers.classify(available(1, Consignor::SB1, "West"));
        buffers.classify(available(2, Consignor::SB2, "East"));
        let drained = buffers.take_box_available();
        assert_eq!(drained[0].consignor, Consignor::SB1);
        assert_eq!(drained[1].consignor, Consignor::SB2);
    }

    #[test]
    fn test_clear_all() {
        let mut buffers = MessageBuffers::new();
        buffers.classify(available(1, Consignor::SB1, "East"));
        buffers.classify(SorticMessage::new(
            2,
            Consignor::SB1,
            MessageBody::Error {
                fault_code: Some("E1".into()),
                token: Some("t".into()),
            },
        ));
        assert_eq!(buffers.total_len(), 2);
        buffers.clear_all();
        assert!(buffers.is_all_empty());
    }
}
