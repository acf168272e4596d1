//! Core protocol types for Matchlink's wire format.
//!
//! Every envelope on the channel is a JSON object with a `type` string
//! tag. Inbound envelopes ([`PlatformMessage`]) are untrusted input from
//! the hosting platform; outbound envelopes ([`GameMessage`]) are owned
//! by this SDK until handed to the channel, fire-and-forget.
//!
//! Game-specific payloads (`content`, `evaluationContent`, `result`,
//! player profiles) are opaque to the platform and to this crate — they
//! are carried as raw [`serde_json::Value`]s and never inspected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player, assigned by the platform.
///
/// Newtype wrapper over `u64` so a player id can't be confused with any
/// other numeric field. `#[serde(transparent)]` serializes it as the
/// plain number the platform sends, not as `{ "0": 42 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A participant in a match: an id plus an opaque profile blob.
///
/// Two players live at a time — the local player and the opponent.
/// Both are assigned by the `matchPrepare` envelope and are immutable
/// until the next `matchPrepare` replaces them. The profile is
/// platform-defined (display name, avatar, rating, …) and is passed
/// through to the game untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// The platform-assigned player id.
    pub id: PlayerId,
    /// Opaque profile data. Defaults to `null` when the platform
    /// omits it.
    #[serde(default)]
    pub profile: Value,
}

// ---------------------------------------------------------------------------
// Enumerated wire values
// ---------------------------------------------------------------------------

/// The kind of device the game surface is running on.
///
/// Sent by the platform in `matchPrepare` so the game can pick a layout.
/// The wire values are the platform's uppercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceType {
    /// Phone or tablet.
    Mobile,
    /// Television (remote-control navigation).
    Tv,
}

/// A key reported by the platform's `keyPress` envelope.
///
/// These are the navigation keys a TV remote (or keyboard) produces;
/// the platform forwards them to the game surface as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Key::Left => "left",
            Key::Right => "right",
            Key::Up => "up",
            Key::Down => "down",
            Key::Enter => "enter",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// PlatformMessage — inbound envelopes (platform → game)
// ---------------------------------------------------------------------------

/// An envelope delivered by the hosting platform.
///
/// `#[serde(tag = "type")]` produces the internally tagged JSON the
/// platform sends: `{ "type": "matchStart", "nextPlayerId": 7 }`.
/// Tags and field names are camelCase on the wire.
///
/// The [`Unknown`](Self::Unknown) variant absorbs every unrecognized
/// tag via `#[serde(other)]`. New envelope types added by the platform
/// therefore decode successfully and are dropped by the dispatcher
/// instead of failing the whole message — forward compatibility is a
/// protocol requirement, not an error condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlatformMessage {
    /// The game should build its UI and get ready to play.
    /// Carries both player identities for the upcoming match.
    #[serde(rename_all = "camelCase")]
    MatchPrepare {
        /// The local player.
        player: Player,
        /// The opponent.
        opponent: Player,
        /// Time allowed for the player to make a move, in milliseconds.
        move_timeout: u64,
        /// The device the game surface is running on.
        device_type: DeviceType,
    },

    /// Match start confirmation. Only now may the player move.
    #[serde(rename_all = "camelCase")]
    MatchStart {
        /// The player to whom the first move belongs.
        next_player_id: PlayerId,
    },

    /// Acknowledgment of a valid move (the local player's or the
    /// opponent's). `winner_player_id` is present only when the move
    /// ended the match.
    #[serde(rename_all = "camelCase")]
    MatchMoveValid {
        /// Who sent the move.
        player_id: PlayerId,
        /// Whose move is next.
        next_player_id: PlayerId,
        /// The move details, opaque to the platform.
        #[serde(default)]
        content: Value,
        /// The server-side rules' evaluation of the move.
        #[serde(default)]
        evaluation_content: Value,
        /// Winner of the match, if this move decided it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner_player_id: Option<PlayerId>,
    },

    /// Acknowledgment of an invalid move.
    #[serde(rename_all = "camelCase")]
    MatchMoveInvalid {
        /// Who sent the rejected move.
        player_id: PlayerId,
        /// Whose move is next.
        next_player_id: PlayerId,
    },

    /// The match is over. `winner_player_id` may be absent (e.g. the
    /// match was aborted with no winner).
    #[serde(rename_all = "camelCase")]
    MatchEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner_player_id: Option<PlayerId>,
    },

    /// A reply from the game's server-side rules.
    #[serde(rename_all = "camelCase")]
    ServerMessage {
        /// The player whose request produced this reply.
        player_id: PlayerId,
        /// Game-specific message body.
        #[serde(default)]
        content: Value,
        /// The result returned by the server-side rules.
        #[serde(default)]
        result: Value,
    },

    /// A message sent directly by the other player.
    PlayerMessage {
        #[serde(default)]
        content: Value,
    },

    /// A keyboard or TV remote key was pressed.
    KeyPress { value: Key },

    /// Any envelope whose tag this SDK doesn't recognize.
    /// Decoded successfully and silently ignored downstream.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// GameMessage — outbound envelopes (game → platform)
// ---------------------------------------------------------------------------

/// An envelope sent by the game to the hosting platform.
///
/// Same internally tagged camelCase wire shape as [`PlatformMessage`].
/// All sends are fire-and-forget: the platform never acknowledges them
/// and this SDK never retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameMessage {
    /// Emitted exactly once when the SDK starts listening, informing
    /// the platform that the game loaded successfully.
    Loaded,

    /// Optional pre-ready signal: the game screen is showing and the
    /// player may configure the match before committing to start.
    Prepared,

    /// The client is ready to start the match.
    Ready,

    /// Asks the platform to show the game menu.
    ShowMenu,

    /// A move, to be validated by the server-side rules.
    Move { content: Value },

    /// A message for the game's server-side rules. The platform itself
    /// never interprets `content`.
    #[serde(rename_all = "camelCase")]
    ServerMessage {
        /// Whether the rules' reply should be broadcast to all players.
        public_answer: bool,
        /// Ordering hint: `true` asks the host to process this message
        /// strictly after any prior in-flight server message from this
        /// client. Consumed by the host; not enforced here.
        requires_concurrency_control: bool,
        content: Value,
    },

    /// A peer-to-peer message for the other player.
    PlayerMessage { content: Value },
}

// =========================================================================
// Tests
// =========================================================================
