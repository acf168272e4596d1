//! Host channel abstraction layer for Matchlink.
//!
//! Provides the [`HostChannel`] trait that abstracts over whatever
//! message transport connects the sandboxed game surface to its hosting
//! platform. The SDK never creates the transport itself — the embedding
//! supplies a channel, and everything above this crate only sees tagged
//! byte envelopes plus a sender [`Origin`] per delivery.
//!
//! # Feature Flags
//!
//! - `local` (default) — in-process channel pair via tokio mpsc, used
//!   by demos and tests.

mod error;
#[cfg(feature = "local")]
mod local;

pub use error::ChannelError;
#[cfg(feature = "local")]
pub use local::{LocalChannel, LocalHost};

use std::fmt;
use std::future::Future;

/// The origin of a messaging context, e.g. `https://host.example`.
///
/// The host origin is captured once when the channel is constructed
/// ("load time"). Outbound sends target that single origin; inbound
/// deliveries carry the sender's origin so the dispatcher can reject
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Creates an `Origin` from any string-like value.
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    /// Returns the origin as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Origin {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Origin {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One inbound envelope together with the origin that sent it.
///
/// The origin is metadata attached by the transport, not part of the
/// envelope payload — spoofed or misrouted deliveries are expected
/// background noise, which is why it must be checked before `data` is
/// ever decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Who sent this envelope.
    pub origin: Origin,
    /// The raw envelope bytes.
    pub data: Vec<u8>,
}

/// The asynchronous message channel between game surface and host.
///
/// Delivery is assumed reliable and FIFO per sender once the surface is
/// loaded; no retries or acknowledgments exist at this boundary.
///
/// The futures are `Send` so that sends can run inside spawned tasks
/// (the peer-message throttle flushes from a timer task).
pub trait HostChannel: Send + Sync + 'static {
    /// Sends raw envelope bytes to the host origin. Fire-and-forget.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Receives the next inbound delivery.
    ///
    /// Returns `Ok(None)` when the channel is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Delivery>, ChannelError>> + Send;

    /// The host origin captured when the channel was created.
    fn origin(&self) -> &Origin;
}
