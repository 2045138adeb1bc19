//! Error types for the event codec and router configuration
//!
//! The codec exposes exactly two failure types. [`DecodeError`] covers every
//! way an incoming token can be unusable; the router catches it and falls
//! back to the home view. [`EncodeError`] signals an event that violates its
//! own invariants and is returned to the caller unguarded.

use thiserror::Error;

// ============================================================================
// Codec errors
// ============================================================================

/// A token could not be turned back into an event.
///
/// Variants exist for diagnostics only. Callers implementing fallback
/// behavior should treat every variant the same way.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A `%` escape was truncated or not followed by two hex digits.
    #[error("invalid percent-encoding at byte {position}")]
    Escape {
        /// Byte offset of the offending `%`.
        position: usize,
    },

    /// The percent-decoded bytes are not valid UTF-8.
    #[error("token is not valid UTF-8 after unescaping")]
    Utf8(#[from] std::str::Utf8Error),

    /// The compressed payload is damaged (missing sentinel, bad key list).
    #[error("corrupt token payload: {0}")]
    Corrupt(&'static str),

    /// The decompressed text is not the expected JSON object.
    #[error("malformed event data: {0}")]
    Json(#[from] serde_json::Error),

    /// The object parsed but a field fails validation.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// An in-memory event cannot be encoded.
///
/// This only happens for events that skipped validation, which points at a
/// bug in whatever produced the event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The event name is empty.
    #[error("event name must not be empty")]
    EmptyName,

    /// The origin timezone identifier is empty.
    #[error("origin timezone must not be empty")]
    EmptyTimezone,

    /// The instant cannot be represented as a calendar date.
    #[error("instant {0} ms is outside the supported date range")]
    InstantOutOfRange(i64),

    /// The event could not be written as JSON.
    #[error("event could not be serialized: {0}")]
    Serialize(String),
}

impl EncodeError {
    /// Wire name of the field this error is about.
    pub fn field(&self) -> &'static str {
        match self {
            EncodeError::EmptyName => "n",
            EncodeError::EmptyTimezone => "otz",
            EncodeError::InstantOutOfRange(_) => "d",
            EncodeError::Serialize(_) => "event",
        }
    }
}

impl From<EncodeError> for DecodeError {
    fn from(error: EncodeError) -> Self {
        DecodeError::InvalidField {
            field: error.field(),
            reason: error.to_string(),
        }
    }
}

// ============================================================================
// Configuration errors
// ============================================================================

/// Router configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for [`RouterConfig`](crate::RouterConfig).
    #[error("invalid router configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured origin is not an absolute URL.
    #[error("invalid origin '{origin}': {source}")]
    Origin {
        origin: String,
        #[source]
        source: url::ParseError,
    },
}

// ============================================================================
// Tests
// ============================================================================
