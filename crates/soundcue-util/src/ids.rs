//! Playback identifiers

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of random bytes behind a generated id
const ID_BYTES: usize = 4;

/// Opaque identifier for one playback invocation
///
/// Generated ids are 8 lowercase hex characters drawn from the OS random
/// source. They are only unique among playbacks that are currently active;
/// an id may come back after its playback has finished.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaybackId(String);

impl PlaybackId {
    /// Generate a fresh random id.
    ///
    /// No check is made against ids already in use; a collision among live
    /// playbacks is accepted as vanishingly unlikely.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlaybackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlaybackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
