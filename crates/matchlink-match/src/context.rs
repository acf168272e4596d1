//! Match context: the identities a match runs between, and the result
//! derivation relative to them.

use serde::{Deserialize, Serialize};

use matchlink_protocol::{DeviceType, Player, PlayerId};

// ---------------------------------------------------------------------------
// GameResult
// ---------------------------------------------------------------------------

/// The outcome of a match (or of a match-deciding move), from the local
/// player's point of view.
///
/// Serialized lowercase (`"won"`, `"lost"`, `"draw"`) for games that
/// persist or display raw results. Note that "no result" is not a
/// variant — callbacks receive `Option<GameResult>`, where `None` means
/// the platform supplied no winner id at all (the match continues or
/// ended undecided). The two must never be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    /// The local player won.
    Won,
    /// The opponent won.
    Lost,
    /// Neither — see [`MatchContext::resolve`] for what falls in here.
    Draw,
}

// ---------------------------------------------------------------------------
// MatchContext
// ---------------------------------------------------------------------------

/// The identities of the current match.
///
/// Created whole from a `matchPrepare` envelope and replaced whole by
/// the next one — never partially updated. Owned exclusively by the
/// inbound dispatcher; everything else reads it through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    local_player: Player,
    opponent: Player,
    device_type: DeviceType,
}

impl MatchContext {
    /// Builds the context for a freshly prepared match.
    pub fn new(
        local_player: Player,
        opponent: Player,
        device_type: DeviceType,
    ) -> Self {
        tracing::debug!(
            local = %local_player.id,
            opponent = %opponent.id,
            device = ?device_type,
            "match context prepared"
        );
        Self {
            local_player,
            opponent,
            device_type,
        }
    }

    /// The local player.
    pub fn local_player(&self) -> &Player {
        &self.local_player
    }

    /// The opponent.
    pub fn opponent(&self) -> &Player {
        &self.opponent
    }

    /// The device the game surface runs on.
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Maps a winner id from the platform to a result relative to this
    /// context. Pure and synchronous.
    ///
    /// - `None` → `None`: no winner id was supplied — an intermediate
    ///   move, not a decided match.
    /// - `Some(id)` equal to the local player → `Some(Won)`.
    /// - `Some(id)` equal to the opponent → `Some(Lost)`.
    /// - Any other id → `Some(Draw)`. Closed-world default: the
    ///   platform's draw signal is an id matching neither player, so an
    ///   unrecognized id is indistinguishable from a legitimate draw
    ///   and is never reported as an error.
    pub fn resolve(&self, winner: Option<PlayerId>) -> Option<GameResult> {
        let winner = winner?;
        let result = if winner == self.local_player.id {
            GameResult::Won
        } else if winner == self.opponent.id {
            GameResult::Lost
        } else {
            GameResult::Draw
        };
        Some(result)
    }
}
