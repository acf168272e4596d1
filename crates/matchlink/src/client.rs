//! `MatchClient` — the inbound protocol dispatcher.
//!
//! Receives every envelope the host channel delivers and, in order:
//!   1. Rejects deliveries whose origin is not the host origin
//!   2. Decodes the envelope (undecodable ones are dropped)
//!   3. Updates the match context where applicable
//!   4. Routes to the matching game callback, with results derived
//!      through the match context
//!
//! One client handles exactly one match context at a time; each
//! `matchPrepare` replaces the context whole.

use matchlink_channel::HostChannel;
use matchlink_match::{MatchContext, MatchError};
use matchlink_protocol::{Codec, GameMessage, JsonCodec, PlatformMessage};

use crate::{GameHandlers, MatchlinkError, Platform};

/// The inbound half of the SDK: owns the callback table and the match
/// context, and drives dispatch from the host channel.
pub struct MatchClient<C: HostChannel, H: GameHandlers, X: Codec = JsonCodec> {
    platform: Platform<C, X>,
    handlers: H,
    context: Option<MatchContext>,
}

impl<C, H, X> MatchClient<C, H, X>
where
    C: HostChannel,
    H: GameHandlers,
    X: Codec,
{
    /// Registers the callback table and announces the game to the host.
    ///
    /// Emits the `loaded` envelope unconditionally — the platform waits
    /// for it before it starts the match lifecycle.
    pub async fn init(
        platform: Platform<C, X>,
        handlers: H,
    ) -> Result<Self, MatchlinkError> {
        platform.send(&GameMessage::Loaded).await?;
        tracing::info!(
            origin = %platform.channel().origin(),
            "matchlink client listening"
        );
        Ok(Self {
            platform,
            handlers,
            context: None,
        })
    }

    /// A clone of the outbound handle, for the game to send through.
    pub fn platform(&self) -> Platform<C, X> {
        self.platform.clone()
    }

    /// The current match context, if a `matchPrepare` has arrived.
    pub fn match_context(&self) -> Option<&MatchContext> {
        self.context.as_ref()
    }

    /// Processes inbound envelopes until the channel closes or a
    /// handler fails.
    ///
    /// Envelopes are dispatched strictly in host-delivery order.
    pub async fn run(&mut self) -> Result<(), MatchlinkError> {
        while self.process_next().await? {}
        Ok(())
    }

    /// Receives and dispatches a single delivery.
    ///
    /// Returns `Ok(false)` once the channel reports a clean close.
    /// Origin-rejected, undecodable, and unrecognized envelopes are
    /// dropped without invoking any callback; this still counts as a
    /// processed delivery (`Ok(true)`).
    pub async fn process_next(&mut self) -> Result<bool, MatchlinkError> {
        let Some(delivery) = self.platform.channel().recv().await? else {
            tracing::info!("host channel closed");
            return Ok(false);
        };

        // Security boundary: never act on messages from an unexpected
        // origin, regardless of their content.
        if delivery.origin != *self.platform.channel().origin() {
            tracing::warn!(
                origin = %delivery.origin,
                "origin not recognized, dropping message"
            );
            return Ok(true);
        }

        let message: PlatformMessage =
            match self.platform.codec().decode(&delivery.data) {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(error = %e, "failed to decode envelope");
                    return Ok(true);
                }
            };

        self.dispatch(message).await?;
        Ok(true)
    }

    async fn dispatch(
        &mut self,
        message: PlatformMessage,
    ) -> Result<(), MatchlinkError> {
        match message {
            PlatformMessage::MatchPrepare {
                player,
                opponent,
                move_timeout,
                device_type,
            } => {
                // Replaced whole; identical envelopes are idempotent.
                self.context = Some(MatchContext::new(
                    player.clone(),
                    opponent.clone(),
                    device_type,
                ));
                self.handlers
                    .on_match_prepare(player, opponent, move_timeout, device_type)
                    .await?;
            }

            PlatformMessage::MatchStart { next_player_id } => {
                self.handlers.on_match_start(next_player_id).await?;
            }

            PlatformMessage::MatchMoveValid {
                player_id,
                next_player_id,
                content,
                evaluation_content,
                winner_player_id,
            } => {
                let context =
                    self.context.as_ref().ok_or(MatchError::NotPrepared)?;
                let result = context.resolve(winner_player_id);
                self.handlers
                    .on_move_valid(
                        player_id,
                        next_player_id,
                        content,
                        evaluation_content,
                        result,
                    )
                    .await?;
            }

            PlatformMessage::MatchMoveInvalid {
                player_id,
                next_player_id,
            } => {
                self.handlers
                    .on_move_invalid(player_id, next_player_id)
                    .await?;
            }

            PlatformMessage::MatchEnd { winner_player_id } => {
                let context =
                    self.context.as_ref().ok_or(MatchError::NotPrepared)?;
                let result = context.resolve(winner_player_id);
                self.handlers.on_match_end(result).await?;
            }

            PlatformMessage::ServerMessage {
                player_id,
                content,
                result,
            } => {
                self.handlers
                    .on_server_message(player_id, content, result)
                    .await?;
            }

            PlatformMessage::PlayerMessage { content } => {
                self.handlers.on_player_message(content).await?;
            }

            PlatformMessage::KeyPress { value } => {
                self.handlers.on_key_press(value).await?;
            }

            PlatformMessage::Unknown => {
                tracing::debug!("ignoring unrecognized platform message");
            }
        }

        Ok(())
    }
}
