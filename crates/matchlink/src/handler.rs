//! The `GameHandlers` trait — the extension point for embedding games.
//!
//! This is the callback table the game registers once at
//! initialization. The dispatcher invokes these methods as platform
//! envelopes arrive; it never inspects what the game does with them.
//!
//! Every method defaults to failing with
//! [`HandlerError::Unimplemented`]. A lifecycle event the game forgot
//! to handle therefore surfaces immediately and loudly out of the
//! dispatch loop instead of being silently swallowed. Override exactly
//! the handlers your game needs.

use serde_json::Value;

use matchlink_match::GameResult;
use matchlink_protocol::{DeviceType, Key, Player, PlayerId};

/// Errors produced by game callbacks.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A lifecycle event fired whose handler was never overridden by
    /// the embedding game.
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    /// The game's own handler logic failed.
    #[error("handler failed: {0}")]
    Failed(String),
}

/// The callback table an embedding game implements.
///
/// Handler errors are not caught by the dispatcher — they propagate out
/// of [`MatchClient::run`](crate::MatchClient::run). The SDK provides
/// no isolation between callbacks.
pub trait GameHandlers: Send + 'static {
    /// The game should build its UI and get ready to start playing.
    ///
    /// `move_timeout_ms` is the time allowed for the player to make a
    /// move.
    async fn on_match_prepare(
        &mut self,
        _local: Player,
        _opponent: Player,
        _move_timeout_ms: u64,
        _device: DeviceType,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_match_prepare"))
    }

    /// Match start confirmation. Only now is the player allowed to play.
    async fn on_match_start(
        &mut self,
        _next_player: PlayerId,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_match_start"))
    }

    /// Acknowledgment of a valid move.
    ///
    /// `result` is `Some` only when the move ended the match; `None`
    /// means the match continues.
    async fn on_move_valid(
        &mut self,
        _sender: PlayerId,
        _next_player: PlayerId,
        _content: Value,
        _evaluation: Value,
        _result: Option<GameResult>,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_move_valid"))
    }

    /// Acknowledgment of an invalid move.
    async fn on_move_invalid(
        &mut self,
        _sender: PlayerId,
        _next_player: PlayerId,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_move_invalid"))
    }

    /// The match ended. `None` means the platform reported no winner id
    /// — distinct from a draw.
    async fn on_match_end(
        &mut self,
        _result: Option<GameResult>,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_match_end"))
    }

    /// A reply from the game's server-side rules arrived.
    async fn on_server_message(
        &mut self,
        _sender: PlayerId,
        _content: Value,
        _result: Value,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_server_message"))
    }

    /// A message sent directly by the other player arrived.
    async fn on_player_message(
        &mut self,
        _content: Value,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_player_message"))
    }

    /// A keyboard or TV remote key was pressed.
    async fn on_key_press(&mut self, _key: Key) -> Result<(), HandlerError> {
        Err(HandlerError::Unimplemented("on_key_press"))
    }
}
