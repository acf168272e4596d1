//! Tic-tac-toe over Matchlink, against a scripted platform.
//!
//! The game side implements [`GameHandlers`] and plays the first empty
//! cell whenever it has the turn. The host side is a `LocalHost` script
//! that prepares the match, echoes moves back as `matchMoveValid`, and
//! plays a fixed opponent — enough to drive a full match lifecycle
//! without a real platform. Run with `RUST_LOG=debug` to watch the
//! envelope flow.

use matchlink::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

// ---------------------------------------------------------------------------
// Game types
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    X,
    O,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct Move {
    row: usize,
    col: usize,
}

// ---------------------------------------------------------------------------
// Game logic
// ---------------------------------------------------------------------------

/// The local player is always X; the opponent is O.
struct TicTacToe {
    platform: Platform<LocalChannel>,
    board: [[Cell; 3]; 3],
    me: Option<PlayerId>,
}

impl TicTacToe {
    fn new(platform: Platform<LocalChannel>) -> Self {
        Self {
            platform,
            board: [[Cell::Empty; 3]; 3],
            me: None,
        }
    }

    fn mark_for(&self, player: PlayerId) -> Cell {
        if Some(player) == self.me { Cell::X } else { Cell::O }
    }

    fn is_empty(&self, mv: Move) -> bool {
        mv.row < 3 && mv.col < 3 && self.board[mv.row][mv.col] == Cell::Empty
    }

    fn first_empty(&self) -> Option<Move> {
        (0..3)
            .flat_map(|row| (0..3).map(move |col| Move { row, col }))
            .find(|mv| self.is_empty(*mv))
    }

    fn apply(&mut self, player: PlayerId, mv: Move) {
        if mv.row < 3 && mv.col < 3 {
            self.board[mv.row][mv.col] = self.mark_for(player);
        }
    }

    /// Picks the next cell and submits it, gated by the local validator.
    async fn take_turn(&mut self) -> Result<(), HandlerError> {
        let Some(mv) = self.first_empty() else {
            return Ok(());
        };
        tracing::info!(row = mv.row, col = mv.col, "playing");
        let content = serde_json::to_value(mv)
            .map_err(|e| HandlerError::Failed(e.to_string()))?;
        let sent = self
            .platform
            .send_move_validated(content, |content| {
                serde_json::from_value::<Move>(content.clone())
                    .is_ok_and(|mv| self.is_empty(mv))
            })
            .await
            .map_err(|e| HandlerError::Failed(e.to_string()))?;
        if !sent {
            tracing::warn!("picked an occupied cell, move not sent");
        }
        Ok(())
    }
}

impl GameHandlers for TicTacToe {
    async fn on_match_prepare(
        &mut self,
        local: Player,
        opponent: Player,
        move_timeout_ms: u64,
        device: DeviceType,
    ) -> Result<(), HandlerError> {
        tracing::info!(
            local = %local.id,
            opponent = %opponent.id,
            move_timeout_ms,
            ?device,
            "match prepared"
        );
        self.me = Some(local.id);
        self.board = [[Cell::Empty; 3]; 3];
        self.platform
            .ready()
            .await
            .map_err(|e| HandlerError::Failed(e.to_string()))
    }

    async fn on_match_start(
        &mut self,
        next_player: PlayerId,
    ) -> Result<(), HandlerError> {
        tracing::info!(first = %next_player, "match started");
        if Some(next_player) == self.me {
            self.take_turn().await?;
        }
        Ok(())
    }

    async fn on_move_valid(
        &mut self,
        sender: PlayerId,
        next_player: PlayerId,
        content: serde_json::Value,
        _evaluation: serde_json::Value,
        result: Option<GameResult>,
    ) -> Result<(), HandlerError> {
        let mv: Move = serde_json::from_value(content)
            .map_err(|e| HandlerError::Failed(e.to_string()))?;
        self.apply(sender, mv);

        if let Some(result) = result {
            tracing::info!(?result, "winning move");
        } else if Some(next_player) == self.me {
            self.take_turn().await?;
        }
        Ok(())
    }

    async fn on_move_invalid(
        &mut self,
        sender: PlayerId,
        _next_player: PlayerId,
    ) -> Result<(), HandlerError> {
        tracing::warn!(sender = %sender, "move rejected by server-side rules");
        Ok(())
    }

    async fn on_match_end(
        &mut self,
        result: Option<GameResult>,
    ) -> Result<(), HandlerError> {
        match result {
            Some(result) => tracing::info!(?result, "match over"),
            None => tracing::info!("match over with no winner"),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scripted platform
// ---------------------------------------------------------------------------

type ScriptError = Box<dyn std::error::Error + Send + Sync>;

fn deliver(host: &LocalHost, envelope: serde_json::Value) -> Result<(), ScriptError> {
    host.deliver(envelope.to_string().into_bytes())?;
    Ok(())
}

async fn next_game_message(host: &LocalHost) -> Result<GameMessage, ScriptError> {
    let bytes = host.next_outbound().await.ok_or("game side closed early")?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Plays the platform: prepare, start, echo the game's moves as valid,
/// interleave a fixed opponent, declare the local player the winner.
async fn run_host(host: LocalHost) -> Result<(), ScriptError> {
    match next_game_message(&host).await? {
        GameMessage::Loaded => {}
        other => return Err(format!("expected loaded, got {other:?}").into()),
    }

    deliver(
        &host,
        json!({
            "type": "matchPrepare",
            "player": { "id": 1, "profile": { "name": "you" } },
            "opponent": { "id": 2, "profile": { "name": "script" } },
            "moveTimeout": 30000,
            "deviceType": "MOBILE"
        }),
    )?;
    match next_game_message(&host).await? {
        GameMessage::Ready => {}
        other => return Err(format!("expected ready, got {other:?}").into()),
    }
    deliver(&host, json!({ "type": "matchStart", "nextPlayerId": 1 }))?;

    // The game plays the first empty cell, so against this opponent it
    // takes the top row in three moves.
    let opponent_moves = [(1, 0), (1, 1)];
    for turn in 0..3 {
        let content = match next_game_message(&host).await? {
            GameMessage::Move { content } => content,
            other => return Err(format!("expected move, got {other:?}").into()),
        };

        let mut valid = json!({
            "type": "matchMoveValid",
            "playerId": 1,
            "nextPlayerId": 2,
            "content": content
        });
        if turn == 2 {
            valid["winnerPlayerId"] = json!(1);
        }
        deliver(&host, valid)?;

        if let Some((row, col)) = opponent_moves.get(turn) {
            deliver(
                &host,
                json!({
                    "type": "matchMoveValid",
                    "playerId": 2,
                    "nextPlayerId": 1,
                    "content": { "row": row, "col": col }
                }),
            )?;
        }
    }

    deliver(&host, json!({ "type": "matchEnd", "winnerPlayerId": 1 }))?;
    // Dropping the host closes the channel, which ends the client's run
    // loop cleanly.
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (channel, host) = LocalChannel::pair("https://platform.local");
    let platform = Platform::new(channel);
    let game = TicTacToe::new(platform.clone());
    let mut client = MatchClient::init(platform, game).await?;

    let script = tokio::spawn(run_host(host));
    client.run().await?;
    script.await??;

    eprintln!("match finished");
    Ok(())
}
