//! Codec trait and implementations for serializing/deserializing envelopes.
//!
//! The protocol layer doesn't care HOW envelopes become bytes — it just
//! needs something that implements the [`Codec`] trait. [`JsonCodec`]
//! matches the host platform's JSON wire format and is the default
//! everywhere; a binary codec could be swapped in for a host that
//! speaks one, without touching any other layer.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because the codec is shared with the
/// rate-limiter's timer tasks, which may run on any runtime thread.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] for the platform's JSON wire format.
///
/// ## Example
///
/// ```rust
/// use matchlink_protocol::{Codec, GameMessage, JsonCodec};
///
/// let codec = JsonCodec;
///
/// let bytes = codec.encode(&GameMessage::Ready).unwrap();
/// let decoded: GameMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, GameMessage::Ready);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
