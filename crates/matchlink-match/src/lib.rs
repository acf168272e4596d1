//! Match context and result resolution for Matchlink.
//!
//! This crate holds the SDK's only piece of per-match state:
//!
//! 1. **Identity** — who the local player and the opponent are
//!    ([`MatchContext`]), as assigned by the `matchPrepare` envelope
//! 2. **Result resolution** — mapping a winner id from the platform
//!    into a [`GameResult`] relative to that identity
//!
//! # How it fits in the stack
//!
//! ```text
//! Dispatcher (above)  ← owns the context, replaces it on matchPrepare
//!     ↕
//! Match layer (this crate)  ← identity and WON/LOST/DRAW derivation
//!     ↕
//! Protocol layer (below)  ← provides Player, PlayerId, DeviceType
//! ```

mod context;
mod error;

pub use context::{GameResult, MatchContext};
pub use error::MatchError;
