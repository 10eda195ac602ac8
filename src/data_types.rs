use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Receive buffer size of the collector. Anything past this is cut off.
pub const MAX_DATAGRAM: usize = 1024;

/// Wire timestamp, ISO-8601 without offset.
const SENT_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub message: String,
}

impl Submission {
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
        }
    }

    /// Builds a submission from decoded form pairs. Blank values are skipped and
    /// the first remaining value of a field wins; absent fields stay empty.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let (mut username, mut message) = (None, None);
        for (key, value) in pairs {
            let value: String = value.into();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "username" => username.get_or_insert(value),
                "message" => message.get_or_insert(value),
                _ => continue,
            };
        }
        Self::new(username.unwrap_or_default(), message.unwrap_or_default())
    }
}

/// The datagram sent from the web server to the collector:
/// `{ "<sent_at>": { "username": ..., "message": ... } }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub sent_at: String,
    pub submission: Submission,
}

impl Envelope {
    pub fn new(sent_at: DateTime<Local>, submission: Submission) -> Self {
        Self {
            sent_at: sent_at.format(SENT_AT_FORMAT).to_string(),
            submission,
        }
    }

    pub fn now(submission: Submission) -> Self {
        Self::new(Local::now(), submission)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut wire = BTreeMap::new();
        wire.insert(self.sent_at.as_str(), &self.submission);
        Ok(serde_json::to_vec(&wire)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let wire: BTreeMap<String, Submission> = serde_json::from_slice(bytes)?;
        if wire.len() != 1 {
            return Err(Error::Payload(format!(
                "expected exactly one submission, found {}",
                wire.len()
            )));
        }
        let (sent_at, submission) = wire
            .into_iter()
            .next()
            .ok_or_else(|| Error::Payload("empty envelope".to_string()))?;
        Ok(Self { sent_at, submission })
    }
}
