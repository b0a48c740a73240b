//! Attachment blob (帳戶影像 / 單據影像)

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque binary attachment (bank proof, receipt scan, avatar)
///
/// The core never inspects the bytes. On the wire and in storage the blob is
/// carried as standard base64 text.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Attachment {
    bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode as standard base64
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Decode from standard base64 (surrounding whitespace is ignored)
    pub fn from_base64(text: &str) -> Result<Self, base64::DecodeError> {
        Ok(Self::new(STANDARD.decode(text.trim())?))
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attachment({} bytes)", self.bytes.len())
    }
}

impl Serialize for Attachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Attachment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(serde::de::Error::custom)
    }
}
