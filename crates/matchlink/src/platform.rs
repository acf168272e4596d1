//! `Platform` — the outbound message dispatcher.
//!
//! Everything the game sends to the platform goes through here: the
//! lifecycle signals, moves (with the optional validation gate), server
//! messages with their ordering flag, and peer messages through the
//! coalescing rate limiter. All sends are fire-and-forget; the channel
//! is assumed reliable and nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;

use matchlink_channel::HostChannel;
use matchlink_protocol::{Codec, GameMessage, JsonCodec};
use matchlink_throttle::{PeerThrottle, SendOutcome};

use crate::MatchlinkError;

/// Shared outbound state: one per embedding game instance, cloned
/// between the dispatcher and the game itself.
struct Shared<C, X> {
    channel: C,
    codec: X,
    throttle: Mutex<PeerThrottle<Value>>,
}

/// Handle for sending messages to the hosting platform.
///
/// Cheaply cloneable (`Arc` inner): the game keeps a clone to call from
/// inside its handlers while [`MatchClient`](crate::MatchClient) owns
/// another for the dispatch loop.
pub struct Platform<C, X = JsonCodec> {
    inner: Arc<Shared<C, X>>,
}

impl<C, X> Clone for Platform<C, X> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: HostChannel> Platform<C> {
    /// Wraps a host channel with the default JSON codec.
    pub fn new(channel: C) -> Self {
        Self::with_codec(channel, JsonCodec)
    }
}

impl<C: HostChannel, X: Codec> Platform<C, X> {
    /// Wraps a host channel with an explicit codec.
    pub fn with_codec(channel: C, codec: X) -> Self {
        Self {
            inner: Arc::new(Shared {
                channel,
                codec,
                throttle: Mutex::new(PeerThrottle::new()),
            }),
        }
    }

    pub(crate) fn channel(&self) -> &C {
        &self.inner.channel
    }

    pub(crate) fn codec(&self) -> &X {
        &self.inner.codec
    }

    /// Encodes and sends one envelope to the host origin.
    pub(crate) async fn send(
        &self,
        message: &GameMessage,
    ) -> Result<(), MatchlinkError> {
        let bytes = self.inner.codec.encode(message)?;
        self.inner.channel.send(&bytes).await?;
        Ok(())
    }

    // -- Lifecycle signals --

    /// Informs the platform that the client is ready to start the match.
    pub async fn ready(&self) -> Result<(), MatchlinkError> {
        self.send(&GameMessage::Ready).await
    }

    /// Optional pre-ready signal: lets the game show its screen (and
    /// let the player configure the match) before committing to start.
    pub async fn prepared(&self) -> Result<(), MatchlinkError> {
        self.send(&GameMessage::Prepared).await
    }

    /// Asks the platform to show the game menu.
    pub async fn show_menu(&self) -> Result<(), MatchlinkError> {
        self.send(&GameMessage::ShowMenu).await
    }

    // -- Moves --

    /// Sends a move to the platform's server-side rules.
    pub async fn send_move(&self, content: Value) -> Result<(), MatchlinkError> {
        self.send(&GameMessage::Move { content }).await
    }

    /// Sends a move, gated by a local validator.
    ///
    /// The validator is invoked exactly once with the move content. A
    /// `false` result aborts the send without touching the channel and
    /// returns `Ok(false)` — normal control flow, not an error.
    pub async fn send_move_validated<F>(
        &self,
        content: Value,
        validate: F,
    ) -> Result<bool, MatchlinkError>
    where
        F: FnOnce(&Value) -> bool,
    {
        if !validate(&content) {
            tracing::debug!("move rejected by local validator, not sent");
            return Ok(false);
        }
        self.send(&GameMessage::Move { content }).await?;
        Ok(true)
    }

    // -- Server messages --

    /// Sends a message to the game's server-side rules, asking the host
    /// to process it strictly after any prior in-flight server message
    /// from this client.
    ///
    /// `public_answer` controls whether the rules' reply is broadcast
    /// to all players or sent back only to this one.
    pub async fn send_server_message(
        &self,
        content: Value,
        public_answer: bool,
    ) -> Result<(), MatchlinkError> {
        self.send(&GameMessage::ServerMessage {
            public_answer,
            requires_concurrency_control: true,
            content,
        })
        .await
    }

    /// Like [`send_server_message`](Self::send_server_message), but
    /// tells the host this message may be processed in parallel with
    /// other in-flight server messages.
    pub async fn send_server_message_unordered(
        &self,
        content: Value,
        public_answer: bool,
    ) -> Result<(), MatchlinkError> {
        self.send(&GameMessage::ServerMessage {
            public_answer,
            requires_concurrency_control: false,
            content,
        })
        .await
    }

    // -- Peer messages --

    /// Sends a peer-to-peer message to the other player immediately,
    /// clearing any pending throttle state.
    pub async fn send_player_message(
        &self,
        content: Value,
    ) -> Result<(), MatchlinkError> {
        self.player_message_inner(content, None).await
    }

    /// Sends a peer-to-peer message through the coalescing rate
    /// limiter: at most one transmission per `interval`, always
    /// carrying the freshest payload.
    ///
    /// A zero `interval` behaves like
    /// [`send_player_message`](Self::send_player_message).
    pub async fn send_player_message_throttled(
        &self,
        content: Value,
        interval: Duration,
    ) -> Result<(), MatchlinkError> {
        self.player_message_inner(content, Some(interval)).await
    }

    async fn player_message_inner(
        &self,
        content: Value,
        interval: Option<Duration>,
    ) -> Result<(), MatchlinkError> {
        // Lock scope ends before any channel I/O.
        let outcome = self.inner.throttle.lock().await.send(content, interval);

        match outcome {
            SendOutcome::Send { payload, window } => {
                self.send(&GameMessage::PlayerMessage { content: payload })
                    .await?;

                if let Some(window) = window {
                    let platform = self.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(window.interval()).await;
                        let pending = platform
                            .inner
                            .throttle
                            .lock()
                            .await
                            .window_closed(window);
                        if let Some(content) = pending {
                            let flush =
                                GameMessage::PlayerMessage { content };
                            if let Err(e) = platform.send(&flush).await {
                                tracing::warn!(
                                    error = %e,
                                    "failed to flush coalesced player message"
                                );
                            }
                        }
                    });
                }
            }
            SendOutcome::Coalesced => {
                tracing::trace!("player message coalesced into pending slot");
            }
        }
        Ok(())
    }
}
