//! In-memory publish/subscribe broker.
//!
//! Stands in for the MQTT connection: topics are `/`-separated, `+` matches
//! exactly one level, and payloads cross the broker in wire (JSON) form so
//! the decode path is exercised even in-process. Published messages are not
//! looped back to the publisher.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};

use sortic_comm::{GatewayError, NetworkGateway};
use sortic_messages::SorticMessage;

/// True if `pattern` matches `topic`, with `+` matching one level.
fn topic_matches(pattern: &str, topic: &str) -> bool {
    let mut pattern_levels = pattern.split('/');
    let mut topic_levels = topic.split('/');
    loop {
        match (pattern_levels.next(), topic_levels.next()) {
            (None, None) => return true,
            (Some(p), Some(t)) => {
                if p != "+" && p != t {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[derive(Default)]
struct BrokerShared {
    subscriptions: Mutex<HashSet<String>>,
    /// Raw wire payloads waiting for the next pump.
    inbound: Mutex<VecDeque<String>>,
    /// Everything the unit published, in wire form.
    published: Mutex<Vec<(String, String)>>,
}

/// Controller-facing side of the broker connection.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    shared: Arc<BrokerShared>,
}

/// Host-facing side: injects box traffic and observes published messages.
#[derive(Clone)]
pub struct MemoryBrokerHandle {
    shared: Arc<BrokerShared>,
}

impl MemoryBroker {
    /// Create a connected broker pair.
    #[must_use]
    pub fn new() -> (Self, MemoryBrokerHandle) {
        let shared = Arc::new(BrokerShared::default());
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MemoryBrokerHandle { shared },
        )
    }
}

impl MemoryBrokerHandle {
    /// Deliver a message on `topic`. Returns true if an active subscription
    /// matched; unmatched traffic is dropped, as a broker would.
    pub fn deliver(&self, topic: &str, message: &SorticMessage) -> bool {
        let matched = self
            .shared
            .subscriptions
            .lock()
            .iter()
            .any(|pattern| topic_matches(pattern, topic));
        if matched {
            match message.to_wire() {
                Ok(raw) => self.shared.inbound.lock().push_back(raw),
                Err(err) => warn!(%err, topic, "Undeliverable message"),
            }
        }
        matched
    }

    /// Deliver a raw payload regardless of its shape, for exercising the
    /// malformed-input path.
    pub fn deliver_raw(&self, topic: &str, raw: &str) -> bool {
        let matched = self
            .shared
            .subscriptions
            .lock()
            .iter()
            .any(|pattern| topic_matches(pattern, topic));
        if matched {
            self.shared.inbound.lock().push_back(raw.to_string());
        }
        matched
    }

    /// Decoded messages the unit published, in publication order.
    #[must_use]
    pub fn published(&self) -> Vec<(String, SorticMessage)> {
        self.shared
            .published
            .lock()
            .iter()
            .filter_map(|(topic, raw)| {
                SorticMessage::from_wire(raw)
                    .ok()
                    .map(|msg| (topic.clone(), msg))
            })
            .collect()
    }

    /// Decoded messages the unit published on one topic.
    #[must_use]
    pub fn published_on(&self, topic: &str) -> Vec<SorticMessage> {
        self.published()
            .into_iter()
            .filter_map(|(t, msg)| (t == topic).then_some(msg))
            .collect()
    }

    /// Currently active subscription patterns.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        self.shared.subscriptions.lock().iter().cloned().collect()
    }
}

impl NetworkGateway for MemoryBroker {
    fn publish(&self, topic: &str, message: &SorticMessage) -> Result<(), GatewayError> {
        let raw = message
            .to_wire()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        trace!(topic, "Publish");
        self.shared.published.lock().push((topic.to_string(), raw));
        Ok(())
    }

    fn subscribe(&self, pattern: &str) -> Result<(), GatewayError> {
        self.shared.subscriptions.lock().insert(pattern.to_string());
        Ok(())
    }

    fn unsubscribe(&self, pattern: &str) -> Result<(), GatewayError> {
        self.shared.subscriptions.lock().remove(pattern);
        Ok(())
    }

    fn pump(&self) -> Vec<SorticMessage> {
        let raws: Vec<String> = self.shared.inbound.lock().drain(..).collect();
        raws.iter()
            .filter_map(|raw| match SorticMessage::from_wire(raw) {
                Ok(msg) => Some(msg),
                Err(err) => {
                    warn!(%err, "Dropping malformed payload");
                    None
                }
            })
            .collect()
    }
}
