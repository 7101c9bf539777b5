//! Types for console fingerprint scanning
//!
//! Instance records as seen by the scanner, the per-instance report,
//! and the error type shared by every stage of a scan.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Key/value tag attached to an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A compute instance from the inventory API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Provider instance identifier (e.g., "i-0abc123")
    pub id: String,
    /// Public IPv4 address, if the instance has one
    pub public_address: Option<String>,
    /// Tags in the order the API returned them
    pub tags: Vec<Tag>,
}

impl Instance {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            public_address: None,
            tags: Vec::new(),
        }
    }

    /// Set the public address
    pub fn public_address(mut self, address: impl Into<String>) -> Self {
        self.public_address = Some(address.into());
        self
    }

    /// Add a tag
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }
}

/// One console line that looks like an SSH host key fingerprint
///
/// Holds the raw bytes, including the trailing newline when the console
/// text had one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FingerprintLine(Vec<u8>);

impl FingerprintLine {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lossy text form without the line terminator
    pub fn to_text(&self) -> String {
        let line = self.0.strip_suffix(b"\n").unwrap_or(&self.0);
        String::from_utf8_lossy(line).into_owned()
    }
}

impl Serialize for FingerprintLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

/// Fingerprint findings for a single instance
#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    pub instance_id: String,
    pub public_address: String,
    /// Formatted `key=value` tag summary
    pub tags: String,
    pub fingerprints: Vec<FingerprintLine>,
}

impl InstanceReport {
    /// Header line for the text report: address, then tags
    pub fn header(&self) -> String {
        format!("{} {}", self.public_address, self.tags)
    }
}

/// Errors that abort a scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to list instances: {0}")]
    Inventory(String),

    #[error("failed to fetch console output for {instance_id}: {message}")]
    ConsoleOutput {
        instance_id: String,
        message: String,
    },

    #[error("console output for {instance_id} is not valid base64: {source}")]
    Decode {
        instance_id: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),
}
