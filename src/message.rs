// Message records and the JSON batch loader.
//
// The input is a JSON array of `{ "receiver": ..., "body": ... }` objects.
// Each message's index is its position in that array and is the identity
// used by every later stage.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One message of the batch. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Position in the input batch
    pub index: usize,
    pub receiver: String,
    pub body: String,
}

impl Message {
    pub fn new(index: usize, receiver: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            index,
            receiver: receiver.into(),
            body: body.into(),
        }
    }
}

/// Wire shape of a message before it gets its index.
#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    receiver: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

/// Build an indexed batch from plain bodies. Receivers are left empty.
pub fn from_bodies<S: AsRef<str>>(bodies: &[S]) -> Vec<Message> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| Message::new(i, "", body.as_ref()))
        .collect()
}

/// Parse a JSON array of messages. A null or missing body becomes empty.
pub fn parse_messages(json: &str) -> Result<Vec<Message>> {
    let raw: Vec<RawMessage> =
        serde_json::from_str(json).context("input is not a JSON array of messages")?;

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, m)| Message {
            index,
            receiver: m.receiver.unwrap_or_default(),
            body: m.body.unwrap_or_default(),
        })
        .collect())
}

/// Read and parse a message batch from a JSON file.
pub fn load_messages(path: &Path) -> Result<Vec<Message>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read message file {}", path.display()))?;
    let messages = parse_messages(&json)
        .with_context(|| format!("failed to parse message file {}", path.display()))?;

    info!(count = messages.len(), path = %path.display(), "Loaded message batch");
    Ok(messages)
}
