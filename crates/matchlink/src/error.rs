//! Unified error type for the Matchlink SDK.

use matchlink_channel::ChannelError;
use matchlink_match::MatchError;
use matchlink_protocol::ProtocolError;

use crate::HandlerError;

/// Top-level error that wraps all layer-specific errors.
///
/// When using the `matchlink` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MatchlinkError {
    /// A channel-level error (send, recv, closed).
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A match-state error (result resolution before matchPrepare).
    #[error(transparent)]
    Match(#[from] MatchError),

    /// An error raised by one of the game's callbacks.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}
