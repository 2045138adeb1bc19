//! Event URL codec
//!
//! Turns an [`EventDetails`] into a [`Token`] that fits in a single URL path
//! segment, and back.
//!
//! # Token format
//!
//! 1. The event is serialized as `{"n":<name>,"d":<ms>,"otz":<zone>}`.
//!    `d` is always an integer count of milliseconds.
//! 2. The JSON text is crushed (punctuation swap plus repeated-substring
//!    substitution, see the `crush` module) and terminated with `_`.
//! 3. The result is percent-encoded with the `encodeURIComponent` set, so a
//!    token only ever contains ASCII alphanumerics, `-_.!~*'()` and `%XX`.
//!
//! Tokens written by schemes that rescale the instant are not detected;
//! they decode to whatever millisecond value they literally contain, or fail.
//!
//! Only short documents get substitutions, so a real token never expands
//! far. Decoding stops with [`DecodeError::Corrupt`] once substitutions
//! would grow the text past 64 KiB.
//!
//! # Example
//!
//! ```
//! use gpui_eventlink::{decode, encode, EventDetails};
//!
//! let event = EventDetails::new("Launch", 1_735_689_600_000, "UTC");
//! let token = encode(&event).unwrap();
//! assert_eq!(decode(token.as_str()).unwrap(), event);
//! ```

mod crush;

pub use crush::DEFAULT_MAX_SUBSTRING_LEN;

use crate::error::{DecodeError, EncodeError};
use crate::event::EventDetails;
use crate::trace_log;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;
use std::fmt;

/// Bytes left alone by `encodeURIComponent`.
const TOKEN_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// ============================================================================
// Token
// ============================================================================

/// A URL-path-safe encoded event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Root-relative path for this token (`/<token>`).
    pub fn to_path(&self) -> String {
        format!("/{}", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

// ============================================================================
// EventCodec
// ============================================================================

/// A reversible, URL-safe event encoding.
///
/// The router only talks to the codec through this trait, so the
/// compression strategy can be swapped without touching route resolution.
pub trait EventCodec: Send + Sync + 'static {
    /// Encode a valid event. Fails only when the event breaks its invariants.
    fn encode(&self, event: &EventDetails) -> Result<Token, EncodeError>;

    /// Decode a token (the path without its leading slash).
    fn decode(&self, token: &str) -> Result<EventDetails, DecodeError>;

    /// Codec name for debugging
    fn name(&self) -> &str {
        "EventCodec"
    }
}

/// The default codec: JSON, crushed, percent-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrushCodec {
    max_substring_len: usize,
}

impl CrushCodec {
    pub fn new() -> Self {
        Self {
            max_substring_len: DEFAULT_MAX_SUBSTRING_LEN,
        }
    }

    /// Limit the substring length the compressor searches.
    ///
    /// Shorter limits encode faster and produce slightly longer tokens.
    /// Decoding does not depend on this value.
    pub fn with_max_substring_len(max_substring_len: usize) -> Self {
        Self {
            max_substring_len: max_substring_len.max(3),
        }
    }

    pub fn max_substring_len(&self) -> usize {
        self.max_substring_len
    }
}

impl Default for CrushCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl EventCodec for CrushCodec {
    fn encode(&self, event: &EventDetails) -> Result<Token, EncodeError> {
        event.validate()?;

        let json =
            serde_json::to_string(event).map_err(|e| EncodeError::Serialize(e.to_string()))?;
        let crushed = crush::crush(&json, self.max_substring_len);
        let token = utf8_percent_encode(&crushed, TOKEN_ESCAPE).to_string();

        trace_log!(
            "Encoded event '{}': {} bytes of JSON -> {} byte token",
            event.name(),
            json.len(),
            token.len()
        );

        Ok(Token(token))
    }

    fn decode(&self, token: &str) -> Result<EventDetails, DecodeError> {
        let crushed = unescape(token)?;
        let json = crush::uncrush(&crushed)?;
        let event: EventDetails = serde_json::from_str(&json)?;
        event.validate()?;
        Ok(event)
    }

    fn name(&self) -> &str {
        "CrushCodec"
    }
}

/// Percent-decode, rejecting `%` not followed by two hex digits.
fn unescape(token: &str) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = token.as_bytes();
    for (position, _) in token.match_indices('%') {
        let well_formed = bytes
            .get(position + 1..position + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(DecodeError::Escape { position });
        }
    }

    Ok(percent_decode_str(token).decode_utf8()?)
}

/// Encode with the default [`CrushCodec`].
pub fn encode(event: &EventDetails) -> Result<Token, EncodeError> {
    CrushCodec::default().encode(event)
}

/// Decode with the default [`CrushCodec`].
pub fn decode(token: &str) -> Result<EventDetails, DecodeError> {
    CrushCodec::default().decode(token)
}

/// Whether `token` can sit in a single path segment without further escaping.
pub fn is_path_safe(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        if b == b'%' {
            bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        } else {
            b.is_ascii() && crush::is_unescaped(char::from(b))
        }
    })
}
