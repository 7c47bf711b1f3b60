use std::fmt;

use crate::error::DecodeError;

/// Decoded text of a label symbol; never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Payload(String);

impl Payload {
    /// Wrap decoded text, rejecting the empty string
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() { None } else { Some(Self(text)) }
    }

    /// Decode raw symbol bytes as UTF-8
    pub fn from_utf8(bytes: &[u8]) -> Result<Option<Self>, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
        Ok(Self::new(text))
    }

    /// Borrow the text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one decode attempt
#[derive(Debug)]
pub enum DecodeOutcome {
    /// A symbol decoded to this payload
    Found(Payload),
    /// The detector saw no symbol at all
    NotFound,
    /// Symbols were seen but none was large enough or carried data
    Empty,
    /// The backend or the image loader failed
    Failed(DecodeError),
}

impl DecodeOutcome {
    /// The payload, if any
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            DecodeOutcome::Found(p) => Some(p),
            _ => None,
        }
    }

    /// Consume into the payload, if any
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            DecodeOutcome::Found(p) => Some(p),
            _ => None,
        }
    }

    /// Kind tag, used in reports and errors
    pub fn kind(&self) -> OutcomeKind {
        match self {
            DecodeOutcome::Found(_) => OutcomeKind::Found,
            DecodeOutcome::NotFound => OutcomeKind::NotFound,
            DecodeOutcome::Empty => OutcomeKind::Empty,
            DecodeOutcome::Failed(_) => OutcomeKind::Failed,
        }
    }
}

/// Payload-free tag of a [`DecodeOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Payload decoded
    Found,
    /// No symbol detected
    NotFound,
    /// No qualifying symbol
    Empty,
    /// Backend or loader error
    Failed,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Found => write!(f, "found"),
            OutcomeKind::NotFound => write!(f, "no symbol detected"),
            OutcomeKind::Empty => write!(f, "no qualifying symbol"),
            OutcomeKind::Failed => write!(f, "decoder failed"),
        }
    }
}
