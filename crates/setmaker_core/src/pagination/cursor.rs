//! Continuation key and its opaque cursor encoding.
//!
//! A cursor is the continuation key's attribute map serialized as compact
//! JSON, then base64 encoded with the standard padded alphabet.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-native resume position: the key attributes of the last item read.
///
/// Scans produce `{"Id": ...}`; index queries additionally carry the index
/// attribute, e.g. `{"ArtistId": ..., "Id": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationKey(BTreeMap<String, String>);

impl ContinuationKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(attribute.into(), value.into());
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Attribute names in sorted order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Cursor encode/decode failure.
///
/// Every decode variant means the caller passed a malformed cursor.
#[derive(Debug)]
pub enum CursorError {
    /// Input is not valid standard base64.
    Transport(base64::DecodeError),
    /// Decoded bytes are not a JSON object of string attributes.
    Structure(serde_json::Error),
    /// Decoded object carries no attributes.
    EmptyKey,
    /// Continuation key could not be serialized.
    Encode(serde_json::Error),
}

impl CursorError {
    /// True for failures caused by the caller-supplied cursor.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Encode(_))
    }
}

impl Display for CursorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(_) => write!(f, "malformed cursor: not valid base64"),
            Self::Structure(_) => write!(f, "malformed cursor: unexpected structure"),
            Self::EmptyKey => write!(f, "malformed cursor: empty key"),
            Self::Encode(err) => write!(f, "failed to encode cursor: {err}"),
        }
    }
}

impl Error for CursorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Structure(err) | Self::Encode(err) => Some(err),
            Self::EmptyKey => None,
        }
    }
}

/// Encodes a continuation key as an opaque cursor.
///
/// Absent or empty keys encode to `""`, meaning no further pages.
pub fn encode_cursor(key: Option<&ContinuationKey>) -> Result<String, CursorError> {
    let Some(key) = key.filter(|key| !key.is_empty()) else {
        return Ok(String::new());
    };
    let json = serde_json::to_vec(key).map_err(CursorError::Encode)?;
    Ok(STANDARD.encode(json))
}

/// Decodes an opaque cursor back into a continuation key.
///
/// `""` decodes to `None` (start of sequence).
pub fn decode_cursor(cursor: &str) -> Result<Option<ContinuationKey>, CursorError> {
    if cursor.is_empty() {
        return Ok(None);
    }
    let bytes = STANDARD.decode(cursor).map_err(CursorError::Transport)?;
    let key: ContinuationKey = serde_json::from_slice(&bytes).map_err(CursorError::Structure)?;
    if key.is_empty() {
        return Err(CursorError::EmptyKey);
    }
    Ok(Some(key))
}
