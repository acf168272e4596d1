//! Integration tests for the Matchlink client, platform handle, and
//! full dispatch flow.
//!
//! A `LocalChannel` pair stands in for the real game-surface transport:
//! the test plays the hosting platform through `LocalHost`, injecting
//! envelopes (with arbitrary origins where needed) and draining what
//! the game side sent.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use matchlink::prelude::*;
use serde_json::{Value, json};

const HOST: &str = "https://host.example";

// =========================================================================
// Recording handlers
// =========================================================================

/// One entry per callback invocation, so tests can assert both the
/// routing and the arguments.
#[derive(Debug, PartialEq)]
enum Event {
    Prepare {
        local: PlayerId,
        opponent: PlayerId,
        move_timeout_ms: u64,
        device: DeviceType,
    },
    Start(PlayerId),
    MoveValid {
        sender: PlayerId,
        next: PlayerId,
        content: Value,
        result: Option<GameResult>,
    },
    MoveInvalid {
        sender: PlayerId,
        next: PlayerId,
    },
    End(Option<GameResult>),
    Server {
        sender: PlayerId,
        content: Value,
        result: Value,
    },
    Peer(Value),
    Key(Key),
}

/// Implements every callback, appending to a shared log.
struct RecordingHandlers {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingHandlers {
    fn log(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl GameHandlers for RecordingHandlers {
    async fn on_match_prepare(
        &mut self,
        local: Player,
        opponent: Player,
        move_timeout_ms: u64,
        device: DeviceType,
    ) -> Result<(), HandlerError> {
        self.log(Event::Prepare {
            local: local.id,
            opponent: opponent.id,
            move_timeout_ms,
            device,
        });
        Ok(())
    }

    async fn on_match_start(
        &mut self,
        next_player: PlayerId,
    ) -> Result<(), HandlerError> {
        self.log(Event::Start(next_player));
        Ok(())
    }

    async fn on_move_valid(
        &mut self,
        sender: PlayerId,
        next_player: PlayerId,
        content: Value,
        _evaluation: Value,
        result: Option<GameResult>,
    ) -> Result<(), HandlerError> {
        self.log(Event::MoveValid {
            sender,
            next: next_player,
            content,
            result,
        });
        Ok(())
    }

    async fn on_move_invalid(
        &mut self,
        sender: PlayerId,
        next_player: PlayerId,
    ) -> Result<(), HandlerError> {
        self.log(Event::MoveInvalid {
            sender,
            next: next_player,
        });
        Ok(())
    }

    async fn on_match_end(
        &mut self,
        result: Option<GameResult>,
    ) -> Result<(), HandlerError> {
        self.log(Event::End(result));
        Ok(())
    }

    async fn on_server_message(
        &mut self,
        sender: PlayerId,
        content: Value,
        result: Value,
    ) -> Result<(), HandlerError> {
        self.log(Event::Server {
            sender,
            content,
            result,
        });
        Ok(())
    }

    async fn on_player_message(
        &mut self,
        content: Value,
    ) -> Result<(), HandlerError> {
        self.log(Event::Peer(content));
        Ok(())
    }

    async fn on_key_press(&mut self, key: Key) -> Result<(), HandlerError> {
        self.log(Event::Key(key));
        Ok(())
    }
}

/// Implements nothing — every callback keeps its failing default.
struct BareHandlers;
impl GameHandlers for BareHandlers {}

/// Implements only `on_match_end`, like a game that cares about
/// nothing but the outcome.
struct EndOnlyHandlers {
    results: Arc<Mutex<Vec<Option<GameResult>>>>,
}

impl GameHandlers for EndOnlyHandlers {
    async fn on_match_end(
        &mut self,
        result: Option<GameResult>,
    ) -> Result<(), HandlerError> {
        self.results.lock().unwrap().push(result);
        Ok(())
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn deliver(host: &LocalHost, envelope: Value) {
    host.deliver(serde_json::to_vec(&envelope).unwrap())
        .expect("deliver");
}

fn deliver_from(host: &LocalHost, origin: &str, envelope: Value) {
    host.deliver_from(origin, serde_json::to_vec(&envelope).unwrap())
        .expect("deliver");
}

async fn next_game_message(host: &LocalHost) -> GameMessage {
    let bytes = host.next_outbound().await.expect("outbound envelope");
    serde_json::from_slice(&bytes).expect("decode outbound")
}

/// Starts a client with recording handlers and drains the `loaded`
/// envelope init emits.
async fn start_client() -> (
    MatchClient<LocalChannel, RecordingHandlers>,
    LocalHost,
    Arc<Mutex<Vec<Event>>>,
) {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);
    let events = Arc::new(Mutex::new(Vec::new()));
    let handlers = RecordingHandlers {
        events: Arc::clone(&events),
    };
    let client = MatchClient::init(platform, handlers)
        .await
        .expect("init should succeed");

    assert_eq!(next_game_message(&host).await, GameMessage::Loaded);
    (client, host, events)
}

fn match_prepare_envelope() -> Value {
    json!({
        "type": "matchPrepare",
        "player": { "id": 1, "profile": { "name": "ada" } },
        "opponent": { "id": 2, "profile": { "name": "bob" } },
        "moveTimeout": 30000,
        "deviceType": "MOBILE"
    })
}

// =========================================================================
// Initialization
// =========================================================================

#[tokio::test]
async fn test_init_emits_loaded() {
    // start_client asserts the loaded envelope itself; this test exists
    // to make the contract explicit.
    let (_client, _host, events) = start_client().await;
    assert!(events.lock().unwrap().is_empty());
}

// =========================================================================
// Origin filtering and drop semantics
// =========================================================================

#[tokio::test]
async fn test_wrong_origin_never_reaches_a_callback() {
    let (mut client, host, events) = start_client().await;

    deliver_from(
        &host,
        "https://evil.example",
        json!({ "type": "matchStart", "nextPlayerId": 1 }),
    );

    assert!(client.process_next().await.expect("processed"));
    assert!(events.lock().unwrap().is_empty());
    assert!(client.match_context().is_none());
}

#[tokio::test]
async fn test_wrong_origin_match_prepare_does_not_touch_context() {
    let (mut client, host, _events) = start_client().await;

    deliver_from(&host, "https://evil.example", match_prepare_envelope());

    assert!(client.process_next().await.expect("processed"));
    assert!(client.match_context().is_none());
}

#[tokio::test]
async fn test_unknown_envelope_type_is_ignored() {
    let (mut client, host, events) = start_client().await;

    deliver(
        &host,
        json!({ "type": "tournamentStandings", "entries": [] }),
    );

    assert!(client.process_next().await.expect("processed"));
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_payload_is_ignored() {
    let (mut client, host, events) = start_client().await;

    host.deliver(b"not json at all".to_vec()).unwrap();

    assert!(client.process_next().await.expect("processed"));
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_channel_close_ends_run_cleanly() {
    let (mut client, host, _events) = start_client().await;
    drop(host);

    client.run().await.expect("run should end cleanly");
}

// =========================================================================
// Lifecycle dispatch and result resolution
// =========================================================================

#[tokio::test]
async fn test_full_lifecycle_dispatches_in_order() {
    let (mut client, host, events) = start_client().await;

    deliver(&host, match_prepare_envelope());
    deliver(&host, json!({ "type": "matchStart", "nextPlayerId": 1 }));
    deliver(
        &host,
        json!({
            "type": "matchMoveValid",
            "playerId": 1,
            "nextPlayerId": 2,
            "content": { "row": 0 },
            "evaluationContent": null
        }),
    );
    deliver(
        &host,
        json!({ "type": "matchMoveInvalid", "playerId": 2, "nextPlayerId": 2 }),
    );
    deliver(&host, json!({ "type": "matchEnd", "winnerPlayerId": 1 }));

    for _ in 0..5 {
        assert!(client.process_next().await.expect("processed"));
    }

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            Event::Prepare {
                local: PlayerId(1),
                opponent: PlayerId(2),
                move_timeout_ms: 30000,
                device: DeviceType::Mobile,
            },
            Event::Start(PlayerId(1)),
            Event::MoveValid {
                sender: PlayerId(1),
                next: PlayerId(2),
                content: json!({ "row": 0 }),
                result: None,
            },
            Event::MoveInvalid {
                sender: PlayerId(2),
                next: PlayerId(2),
            },
            Event::End(Some(GameResult::Won)),
        ]
    );
}

#[tokio::test]
async fn test_move_valid_with_winner_resolves_relative_result() {
    let (mut client, host, events) = start_client().await;

    deliver(&host, match_prepare_envelope());
    deliver(
        &host,
        json!({
            "type": "matchMoveValid",
            "playerId": 2,
            "nextPlayerId": 1,
            "winnerPlayerId": 2
        }),
    );

    client.process_next().await.unwrap();
    client.process_next().await.unwrap();

    let events = events.lock().unwrap();
    assert!(matches!(
        events.last(),
        Some(Event::MoveValid {
            result: Some(GameResult::Lost),
            ..
        })
    ));
}

#[tokio::test]
async fn test_match_end_without_winner_reports_none() {
    let (mut client, host, events) = start_client().await;

    deliver(&host, match_prepare_envelope());
    deliver(&host, json!({ "type": "matchEnd" }));

    client.process_next().await.unwrap();
    client.process_next().await.unwrap();

    assert_eq!(events.lock().unwrap().last(), Some(&Event::End(None)));
}

#[tokio::test]
async fn test_match_end_with_third_party_winner_is_draw() {
    let (mut client, host, events) = start_client().await;

    deliver(&host, match_prepare_envelope());
    deliver(&host, json!({ "type": "matchEnd", "winnerPlayerId": 999 }));

    client.process_next().await.unwrap();
    client.process_next().await.unwrap();

    assert_eq!(
        events.lock().unwrap().last(),
        Some(&Event::End(Some(GameResult::Draw)))
    );
}

#[tokio::test]
async fn test_match_end_before_prepare_is_an_error() {
    let (mut client, host, events) = start_client().await;

    deliver(&host, json!({ "type": "matchEnd", "winnerPlayerId": 1 }));

    let err = client.process_next().await.expect_err("must fail");
    assert!(matches!(
        err,
        MatchlinkError::Match(MatchError::NotPrepared)
    ));
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_match_prepare_replaces_context_idempotently() {
    let (mut client, host, events) = start_client().await;

    deliver(&host, match_prepare_envelope());
    client.process_next().await.unwrap();
    let first = client.match_context().cloned().expect("context set");

    deliver(&host, match_prepare_envelope());
    client.process_next().await.unwrap();
    let second = client.match_context().cloned().expect("context set");

    assert_eq!(first, second);
    assert_eq!(events.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_server_player_and_key_envelopes_route_through() {
    let (mut client, host, events) = start_client().await;

    deliver(
        &host,
        json!({
            "type": "serverMessage",
            "playerId": 2,
            "content": { "kind": "taunt" },
            "result": { "allowed": true }
        }),
    );
    deliver(
        &host,
        json!({ "type": "playerMessage", "content": { "emote": "wave" } }),
    );
    deliver(&host, json!({ "type": "keyPress", "value": "enter" }));

    for _ in 0..3 {
        client.process_next().await.unwrap();
    }

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            Event::Server {
                sender: PlayerId(2),
                content: json!({ "kind": "taunt" }),
                result: json!({ "allowed": true }),
            },
            Event::Peer(json!({ "emote": "wave" })),
            Event::Key(Key::Enter),
        ]
    );
}

// =========================================================================
// Unimplemented callbacks fail loudly
// =========================================================================

#[tokio::test]
async fn test_unimplemented_callback_surfaces_as_error() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);
    let mut client = MatchClient::init(platform, BareHandlers).await.unwrap();
    assert_eq!(next_game_message(&host).await, GameMessage::Loaded);

    deliver(&host, json!({ "type": "matchStart", "nextPlayerId": 1 }));

    let err = client.process_next().await.expect_err("must fail");
    match err {
        MatchlinkError::Handler(HandlerError::Unimplemented(name)) => {
            assert_eq!(name, "on_match_start");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_end_only_game_still_sees_resolved_result() {
    // A game that implements only on_match_end: matchPrepare still
    // populates the context (before its unimplemented callback fails),
    // so the final result resolves to WON.
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);
    let results = Arc::new(Mutex::new(Vec::new()));
    let handlers = EndOnlyHandlers {
        results: Arc::clone(&results),
    };
    let mut client = MatchClient::init(platform, handlers).await.unwrap();
    assert_eq!(next_game_message(&host).await, GameMessage::Loaded);

    deliver(&host, match_prepare_envelope());
    let err = client.process_next().await.expect_err("prepare unhandled");
    assert!(matches!(
        err,
        MatchlinkError::Handler(HandlerError::Unimplemented(
            "on_match_prepare"
        ))
    ));

    deliver(&host, json!({ "type": "matchEnd", "winnerPlayerId": 1 }));
    client.process_next().await.expect("end handled");

    assert_eq!(*results.lock().unwrap(), vec![Some(GameResult::Won)]);
}

// =========================================================================
// Outbound: signals, moves, server messages
// =========================================================================

#[tokio::test]
async fn test_lifecycle_signals_have_expected_tags() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    platform.prepared().await.unwrap();
    platform.ready().await.unwrap();
    platform.show_menu().await.unwrap();

    assert_eq!(next_game_message(&host).await, GameMessage::Prepared);
    assert_eq!(next_game_message(&host).await, GameMessage::Ready);
    assert_eq!(next_game_message(&host).await, GameMessage::ShowMenu);
}

#[tokio::test]
async fn test_send_move_without_validator_always_sends() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    platform.send_move(json!({ "row": 1 })).await.unwrap();

    assert_eq!(
        next_game_message(&host).await,
        GameMessage::Move {
            content: json!({ "row": 1 })
        }
    );
}

#[tokio::test]
async fn test_send_move_validated_accepts_and_calls_validator_once() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    let mut calls = 0;
    let sent = platform
        .send_move_validated(json!({ "row": 1 }), |content| {
            calls += 1;
            content["row"] == 1
        })
        .await
        .unwrap();

    assert!(sent);
    assert_eq!(calls, 1);
    assert_eq!(
        next_game_message(&host).await,
        GameMessage::Move {
            content: json!({ "row": 1 })
        }
    );
}

#[tokio::test]
async fn test_send_move_validated_rejection_touches_nothing() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    let mut calls = 0;
    let sent = platform
        .send_move_validated(json!({ "row": 9 }), |_| {
            calls += 1;
            false
        })
        .await
        .unwrap();

    assert!(!sent);
    assert_eq!(calls, 1);

    // Sentinel: the next outbound envelope is the ready signal, proving
    // the rejected move never reached the channel.
    platform.ready().await.unwrap();
    assert_eq!(next_game_message(&host).await, GameMessage::Ready);
}

#[tokio::test]
async fn test_server_message_orders_by_default() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    platform
        .send_server_message(json!({ "kind": "deal" }), true)
        .await
        .unwrap();

    assert_eq!(
        next_game_message(&host).await,
        GameMessage::ServerMessage {
            public_answer: true,
            requires_concurrency_control: true,
            content: json!({ "kind": "deal" }),
        }
    );
}

#[tokio::test]
async fn test_server_message_unordered_clears_the_flag() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    platform
        .send_server_message_unordered(json!({ "kind": "peek" }), false)
        .await
        .unwrap();

    assert_eq!(
        next_game_message(&host).await,
        GameMessage::ServerMessage {
            public_answer: false,
            requires_concurrency_control: false,
            content: json!({ "kind": "peek" }),
        }
    );
}

// =========================================================================
// Peer message throttling (paused time; the runtime auto-advances the
// clock past the sleep when the test awaits the flushed envelope)
// =========================================================================

const WINDOW: Duration = Duration::from_millis(1000);

fn peer(content: &Value) -> GameMessage {
    GameMessage::PlayerMessage {
        content: content.clone(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_trailing_flush_arrives_from_timer_task() {
    // The flush at window close is transmitted by a spawned task, so it
    // exercises sending through the channel off the caller's task.
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    let (a, b) = (json!({"m":"A"}), json!({"m":"B"}));
    platform
        .send_player_message_throttled(a.clone(), WINDOW)
        .await
        .unwrap();
    platform
        .send_player_message_throttled(b.clone(), WINDOW)
        .await
        .unwrap();

    assert_eq!(next_game_message(&host).await, peer(&a));
    assert_eq!(next_game_message(&host).await, peer(&b));
}

#[tokio::test(start_paused = true)]
async fn test_rapid_peer_messages_coalesce_to_two_sends() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    let (a, b, c) = (json!({"m":"A"}), json!({"m":"B"}), json!({"m":"C"}));
    platform
        .send_player_message_throttled(a.clone(), WINDOW)
        .await
        .unwrap();
    platform
        .send_player_message_throttled(b, WINDOW)
        .await
        .unwrap();
    platform
        .send_player_message_throttled(c.clone(), WINDOW)
        .await
        .unwrap();

    // Leading edge: A went out immediately.
    assert_eq!(next_game_message(&host).await, peer(&a));
    // Trailing edge: C at window expiry. B was dropped.
    assert_eq!(next_game_message(&host).await, peer(&c));

    // Sentinel proves nothing else was transmitted in between or after.
    platform.ready().await.unwrap();
    assert_eq!(next_game_message(&host).await, GameMessage::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_quiet_window_expires_without_extra_send() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    let a = json!({"m":"hi"});
    platform
        .send_player_message_throttled(a.clone(), WINDOW)
        .await
        .unwrap();
    assert_eq!(next_game_message(&host).await, peer(&a));

    // Let the armed window run out with nothing pending.
    tokio::time::advance(WINDOW + Duration::from_millis(500)).await;
    tokio::task::yield_now().await;

    // An interval-free send afterwards is immediate, no coalescing.
    let b = json!({"m":"bye"});
    platform.send_player_message(b.clone()).await.unwrap();
    assert_eq!(next_game_message(&host).await, peer(&b));

    platform.ready().await.unwrap();
    assert_eq!(next_game_message(&host).await, GameMessage::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_unthrottled_send_mid_window_drops_pending() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    let (a, b, c) = (json!({"m":"A"}), json!({"m":"B"}), json!({"m":"C"}));
    platform
        .send_player_message_throttled(a.clone(), WINDOW)
        .await
        .unwrap();
    platform
        .send_player_message_throttled(b, WINDOW)
        .await
        .unwrap();
    // Interval-free send mid-window: immediate, and B's pending slot is
    // cleared — the window later closes as a no-op.
    platform.send_player_message(c.clone()).await.unwrap();

    assert_eq!(next_game_message(&host).await, peer(&a));
    assert_eq!(next_game_message(&host).await, peer(&c));

    tokio::time::advance(WINDOW + Duration::from_millis(100)).await;
    tokio::task::yield_now().await;

    platform.ready().await.unwrap();
    assert_eq!(next_game_message(&host).await, GameMessage::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_never_arms_a_window() {
    let (channel, host) = LocalChannel::pair(HOST);
    let platform = Platform::new(channel);

    for m in ["a", "b", "c"] {
        platform
            .send_player_message_throttled(json!({ "m": m }), Duration::ZERO)
            .await
            .unwrap();
    }

    for m in ["a", "b", "c"] {
        assert_eq!(next_game_message(&host).await, peer(&json!({ "m": m })));
    }
}
