//! Messaging bridge to external systems.
//!
//! The coordinator publishes its state index on one topic and consumes
//! [`StepResult`] messages from another. Transports implement
//! [`StudyBridge`]; [`ChannelBridge`] is an in-process transport with a
//! [`RemoteEndpoint`] standing in for the external system.

use std::collections::HashSet;

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result reported by an external system for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: i32,
    #[serde(rename = "hasError")]
    pub has_error: bool,
    pub message: String,
}

impl StepResult {
    pub fn success(step: i32, message: impl Into<String>) -> Self {
        Self {
            step,
            has_error: false,
            message: message.into(),
        }
    }

    pub fn failure(step: i32, message: impl Into<String>) -> Self {
        Self {
            step,
            has_error: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no publisher registered for topic '{topic}'")]
    NotConnected { topic: String },

    #[error("remote endpoint disconnected")]
    Disconnected,

    #[error("could not encode message for '{topic}': {source}")]
    Encode {
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid step result on '{topic}': {source}")]
    Decode {
        topic: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Transport used by the session coordinator.
pub trait StudyBridge {
    /// Declares `topic` as a state publication topic.
    fn register_publisher(&mut self, topic: &str) -> Result<(), BridgeError>;

    /// Starts receiving step results from `topic`.
    fn subscribe(&mut self, topic: &str) -> Result<(), BridgeError>;

    fn publish_state(&mut self, topic: &str, state: u32) -> Result<(), BridgeError>;

    /// Drains the step results received since the last call, in arrival
    /// order.
    fn poll_step_results(&mut self) -> Vec<StepResult>;
}

/// Bridge that accepts every publication and never receives anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBridge;

impl StudyBridge for NoopBridge {
    fn register_publisher(&mut self, _topic: &str) -> Result<(), BridgeError> {
        Ok(())
    }

    fn subscribe(&mut self, _topic: &str) -> Result<(), BridgeError> {
        Ok(())
    }

    fn publish_state(&mut self, _topic: &str, _state: u32) -> Result<(), BridgeError> {
        Ok(())
    }

    fn poll_step_results(&mut self) -> Vec<StepResult> {
        Vec::new()
    }
}

/// In-process bridge backed by crossbeam channels.
#[derive(Debug)]
pub struct ChannelBridge {
    states: Sender<(String, u32)>,
    results: Receiver<(String, String)>,
    publishers: HashSet<String>,
    subscriptions: HashSet<String>,
}

/// The external side of a [`ChannelBridge`].
#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    states: Receiver<(String, u32)>,
    results: Sender<(String, String)>,
}

/// Creates a connected bridge and remote endpoint pair.
pub fn channel_bridge() -> (ChannelBridge, RemoteEndpoint) {
    let (state_tx, state_rx) = crossbeam_channel::unbounded();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    let bridge = ChannelBridge {
        states: state_tx,
        results: result_rx,
        publishers: HashSet::new(),
        subscriptions: HashSet::new(),
    };
    let remote = RemoteEndpoint {
        states: state_rx,
        results: result_tx,
    };
    (bridge, remote)
}

impl StudyBridge for ChannelBridge {
    fn register_publisher(&mut self, topic: &str) -> Result<(), BridgeError> {
        self.publishers.insert(topic.to_string());
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), BridgeError> {
        self.subscriptions.insert(topic.to_string());
        Ok(())
    }

    fn publish_state(&mut self, topic: &str, state: u32) -> Result<(), BridgeError> {
        if !self.publishers.contains(topic) {
            return Err(BridgeError::NotConnected {
                topic: topic.to_string(),
            });
        }
        self.states
            .send((topic.to_string(), state))
            .map_err(|_| BridgeError::Disconnected)
    }

    fn poll_step_results(&mut self) -> Vec<StepResult> {
        let mut received = Vec::new();
        for (topic, payload) in self.results.try_iter() {
            if !self.subscriptions.contains(&topic) {
                tracing::debug!(%topic, "dropping message on unsubscribed topic");
                continue;
            }
            match decode_step_result(&topic, &payload) {
                Ok(result) => received.push(result),
                Err(error) => tracing::warn!(%error, "dropping step result"),
            }
        }
        received
    }
}

impl RemoteEndpoint {
    /// Sends a step result as a JSON message on `topic`.
    pub fn send_step_result(&self, topic: &str, result: &StepResult) -> Result<(), BridgeError> {
        let payload = encode_message(topic, result)?;
        self.send_raw(topic, payload)
    }

    /// Sends an arbitrary payload on `topic`.
    pub fn send_raw(&self, topic: &str, payload: impl Into<String>) -> Result<(), BridgeError> {
        self.results
            .send((topic.to_string(), payload.into()))
            .map_err(|_| BridgeError::Disconnected)
    }

    /// Drains the states published since the last call.
    pub fn published_states(&self) -> Vec<(String, u32)> {
        self.states.try_iter().collect()
    }
}

fn encode_message(topic: &str, message: &impl Serialize) -> Result<String, BridgeError> {
    serde_json::to_string(message).map_err(|source| BridgeError::Encode {
        topic: topic.to_string(),
        source,
    })
}

fn decode_step_result(topic: &str, payload: &str) -> Result<StepResult, BridgeError> {
    serde_json::from_str(payload).map_err(|source| BridgeError::Decode {
        topic: topic.to_string(),
        source,
    })
}
