/// Errors that can occur at the channel boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The channel was closed by the other side.
    #[error("channel closed: {0}")]
    Closed(String),

    /// Sending an envelope failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receiving a delivery failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}
