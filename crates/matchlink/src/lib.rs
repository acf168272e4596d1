//! # Matchlink
//!
//! Bridge SDK for games embedded in a sandboxed surface (e.g. an
//! iframe) hosted by a gaming platform.
//!
//! The embedding game implements the [`GameHandlers`] trait, hands the
//! SDK a [`HostChannel`](matchlink_channel::HostChannel), and Matchlink
//! takes care of the rest: origin-checked inbound dispatch, match
//! context tracking, WON/LOST/DRAW derivation, the move-validation
//! gate, and rate-limited peer messaging. The raw channel is never
//! exposed to the game.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matchlink::prelude::*;
//!
//! // Implement GameHandlers for your game, then:
//! // let (channel, _host) = LocalChannel::pair("https://host.example");
//! // let platform = Platform::new(channel);
//! // let game = MyGame::new(platform.clone());
//! // let mut client = MatchClient::init(platform, game).await?;
//! // client.run().await
//! ```

#![allow(async_fn_in_trait)]

mod client;
mod error;
mod handler;
mod platform;

pub use client::MatchClient;
pub use error::MatchlinkError;
pub use handler::{GameHandlers, HandlerError};
pub use platform::Platform;

/// Everything an embedding game typically needs.
pub mod prelude {
    pub use crate::{
        GameHandlers, HandlerError, MatchClient, MatchlinkError, Platform,
    };
    pub use matchlink_channel::{
        ChannelError, Delivery, HostChannel, Origin,
    };
    #[cfg(feature = "local")]
    pub use matchlink_channel::{LocalChannel, LocalHost};
    pub use matchlink_match::{GameResult, MatchContext, MatchError};
    pub use matchlink_protocol::{
        Codec, DeviceType, GameMessage, JsonCodec, Key, PlatformMessage,
        Player, PlayerId, ProtocolError,
    };
}
