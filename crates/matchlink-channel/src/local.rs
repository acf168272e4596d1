//! In-process channel pair over tokio mpsc.
//!
//! [`LocalChannel::pair`] wires a game-side [`LocalChannel`] to a
//! host-side [`LocalHost`]. Demos use it to script a platform; tests
//! use it to inject deliveries with arbitrary origins.

use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{ChannelError, Delivery, HostChannel, Origin};

/// The game side of an in-process channel pair.
pub struct LocalChannel {
    origin: Origin,
    to_host: UnboundedSender<Vec<u8>>,
    from_host: Mutex<UnboundedReceiver<Delivery>>,
}

impl LocalChannel {
    /// Creates a connected `(game, host)` pair whose host lives at the
    /// given origin.
    pub fn pair(origin: impl Into<Origin>) -> (LocalChannel, LocalHost) {
        let origin = origin.into();
        let (to_host_tx, to_host_rx) = mpsc::unbounded_channel();
        let (to_game_tx, to_game_rx) = mpsc::unbounded_channel();

        let channel = LocalChannel {
            origin: origin.clone(),
            to_host: to_host_tx,
            from_host: Mutex::new(to_game_rx),
        };
        let host = LocalHost {
            origin,
            to_game: to_game_tx,
            from_game: Mutex::new(to_host_rx),
        };
        (channel, host)
    }
}

impl HostChannel for LocalChannel {
    async fn send(&self, data: &[u8]) -> Result<(), ChannelError> {
        self.to_host
            .send(data.to_vec())
            .map_err(|_| ChannelError::Closed("host side dropped".into()))
    }

    async fn recv(&self) -> Result<Option<Delivery>, ChannelError> {
        // `None` from mpsc means every host sender is gone — clean close.
        Ok(self.from_host.lock().await.recv().await)
    }

    fn origin(&self) -> &Origin {
        &self.origin
    }
}

/// The host side of an in-process channel pair.
///
/// Stands in for the hosting platform: it injects deliveries toward the
/// game and drains what the game sent.
pub struct LocalHost {
    origin: Origin,
    to_game: UnboundedSender<Delivery>,
    from_game: Mutex<UnboundedReceiver<Vec<u8>>>,
}

impl LocalHost {
    /// Delivers envelope bytes to the game, tagged with the host's own
    /// origin.
    pub fn deliver(&self, data: Vec<u8>) -> Result<(), ChannelError> {
        self.deliver_from(self.origin.clone(), data)
    }

    /// Delivers envelope bytes tagged with an arbitrary sender origin.
    ///
    /// This is how tests exercise the dispatcher's origin filter with
    /// spoofed or misrouted deliveries.
    pub fn deliver_from(
        &self,
        origin: impl Into<Origin>,
        data: Vec<u8>,
    ) -> Result<(), ChannelError> {
        self.to_game
            .send(Delivery {
                origin: origin.into(),
                data,
            })
            .map_err(|_| ChannelError::Closed("game side dropped".into()))
    }

    /// Receives the next envelope the game sent, or `None` once the
    /// game side is gone.
    pub async fn next_outbound(&self) -> Option<Vec<u8>> {
        self.from_game.lock().await.recv().await
    }

    /// The origin this host answers for.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}
