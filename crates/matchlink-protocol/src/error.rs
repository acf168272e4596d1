//! Error types for the protocol layer.
//!
//! Each crate in Matchlink defines its own error enum. A
//! `ProtocolError` always means the problem is in
//! serialization/deserialization, not in the channel or match state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, wrong
    /// data types, or truncated messages. Note that an *unrecognized
    /// envelope tag* is not a decode error — it decodes to
    /// [`PlatformMessage::Unknown`](crate::PlatformMessage::Unknown).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
