//! Wire protocol for Matchlink.
//!
//! This crate defines the "language" that an embedded game and its
//! hosting platform speak across the message channel:
//!
//! - **Types** ([`PlatformMessage`], [`GameMessage`], [`Player`], etc.) —
//!   the tagged envelopes that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those envelopes
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the channel (raw bytes plus a sender
//! origin) and the match layer (player identity, results). It doesn't
//! know about origins or match state — it only knows how to serialize
//! and deserialize envelopes.
//!
//! ```text
//! Channel (bytes) → Protocol (PlatformMessage / GameMessage) → Match (context)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    DeviceType, GameMessage, Key, PlatformMessage, Player, PlayerId,
};
