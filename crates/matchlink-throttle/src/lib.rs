//! Trailing-edge coalescing rate limiter for peer-directed messages.
//!
//! [`PeerThrottle`] caps peer sends at one transmission per window,
//! always favoring the most recent payload: the first send in a quiet
//! period goes out immediately (leading edge) and the latest send of a
//! busy period goes out once the window closes (trailing edge).
//! Everything in between is dropped, last-write-wins.
//!
//! The throttle itself is a pure state machine — it never touches a
//! clock. The caller performs the actual transmissions and drives time
//! by sleeping for [`ThrottleWindow::interval`] and then reporting
//! [`PeerThrottle::window_closed`]. This keeps every transition
//! directly testable without wall-clock timing.
//!
//! # Integration
//!
//! ```ignore
//! match throttle.send(content, Some(interval)) {
//!     SendOutcome::Send { payload, window } => {
//!         transmit(payload).await?;
//!         if let Some(window) = window {
//!             tokio::spawn(async move {
//!                 tokio::time::sleep(window.interval()).await;
//!                 if let Some(pending) = throttle.window_closed(window) {
//!                     transmit(pending).await;
//!                 }
//!             });
//!         }
//!     }
//!     SendOutcome::Coalesced => {} // pending slot updated, nothing to do
//! }
//! ```

use std::time::Duration;

use tracing::trace;

// ---------------------------------------------------------------------------
// Outcomes and window tokens
// ---------------------------------------------------------------------------

/// What the caller must do after offering a payload to the throttle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome<T> {
    /// Transmit `payload` now. If `window` is present, the caller must
    /// report [`PeerThrottle::window_closed`] after the window's
    /// interval elapses; until then further throttled sends coalesce.
    Send {
        payload: T,
        window: Option<ThrottleWindow>,
    },

    /// The payload was written to the single pending slot instead of
    /// being transmitted. Only the most recent coalesced payload
    /// survives to the end of the window.
    Coalesced,
}

/// Token for one armed throttle window.
///
/// Consumed by [`PeerThrottle::window_closed`], so a window can't be
/// reported closed twice. The generation inside lets the throttle
/// recognize windows that were superseded by an interval-free send —
/// those close as no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleWindow {
    interval: Duration,
    generation: u64,
}

impl ThrottleWindow {
    /// How long the caller should wait before reporting the window
    /// closed.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Which of the three limiter states the throttle is in. Exposed for
/// inspection and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottlePhase {
    /// No window armed; the next send goes out immediately.
    Idle,
    /// A send went out and its window is still open; nothing pending.
    Armed,
    /// A window is open and a coalesced payload waits for its close.
    ArmedWithPending,
}

// ---------------------------------------------------------------------------
// PeerThrottle
// ---------------------------------------------------------------------------

enum State<T> {
    Idle,
    Armed { last_sent: T },
    ArmedWithPending { last_sent: T, pending: T },
}

/// The coalescing rate limiter. One instance per embedding game.
pub struct PeerThrottle<T> {
    state: State<T>,
    /// Bumped whenever the state is re-armed or reset, so an
    /// outstanding window token from a previous arm is recognized as
    /// stale in `window_closed`.
    generation: u64,
}

impl<T: Clone> PeerThrottle<T> {
    /// Creates an idle throttle.
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            generation: 0,
        }
    }

    /// Offers a payload for sending.
    ///
    /// `interval` of `None` — or zero, which must not be misread as
    /// "always coalesce" — bypasses throttling entirely: the payload is
    /// always transmitted immediately, any pending payload is
    /// discarded, and any open window is invalidated (it will close as
    /// a no-op).
    pub fn send(
        &mut self,
        payload: T,
        interval: Option<Duration>,
    ) -> SendOutcome<T> {
        let interval = interval.filter(|d| !d.is_zero());

        let Some(interval) = interval else {
            self.generation = self.generation.wrapping_add(1);
            self.state = State::Idle;
            trace!("throttle bypassed: immediate send, state cleared");
            return SendOutcome::Send {
                payload,
                window: None,
            };
        };

        match std::mem::replace(&mut self.state, State::Idle) {
            // Leading edge: quiet period, send now and open a window.
            State::Idle => {
                self.generation = self.generation.wrapping_add(1);
                self.state = State::Armed {
                    last_sent: payload.clone(),
                };
                trace!(interval_ms = interval.as_millis() as u64, "throttle armed");
                SendOutcome::Send {
                    payload,
                    window: Some(ThrottleWindow {
                        interval,
                        generation: self.generation,
                    }),
                }
            }

            // Window open: overwrite the single pending slot.
            State::Armed { last_sent }
            | State::ArmedWithPending { last_sent, .. } => {
                self.state = State::ArmedWithPending {
                    last_sent,
                    pending: payload,
                };
                trace!("throttle coalesced: pending slot overwritten");
                SendOutcome::Coalesced
            }
        }
    }

    /// Reports that a window's interval has elapsed.
    ///
    /// Returns the coalesced payload to transmit now, if one was
    /// recorded during the window. The window is never renewed: the
    /// throttle returns to [`ThrottlePhase::Idle`] either way, so the
    /// next send goes out immediately. A stale window (superseded by an
    /// interval-free send) closes as a no-op.
    pub fn window_closed(&mut self, window: ThrottleWindow) -> Option<T> {
        if window.generation != self.generation {
            trace!("stale throttle window closed as no-op");
            return None;
        }

        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle | State::Armed { .. } => {
                trace!("throttle window closed, nothing pending");
                None
            }
            State::ArmedWithPending { pending, .. } => {
                trace!("throttle window closed, flushing pending payload");
                Some(pending)
            }
        }
    }

    /// The current limiter state.
    pub fn phase(&self) -> ThrottlePhase {
        match self.state {
            State::Idle => ThrottlePhase::Idle,
            State::Armed { .. } => ThrottlePhase::Armed,
            State::ArmedWithPending { .. } => ThrottlePhase::ArmedWithPending,
        }
    }

    /// The payload transmitted at the open window's leading edge, if a
    /// window is open.
    pub fn last_sent(&self) -> Option<&T> {
        match &self.state {
            State::Idle => None,
            State::Armed { last_sent }
            | State::ArmedWithPending { last_sent, .. } => Some(last_sent),
        }
    }
}

impl<T: Clone> Default for PeerThrottle<T> {
    fn default() -> Self {
        Self::new()
    }
}
