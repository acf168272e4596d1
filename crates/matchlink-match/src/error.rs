//! Error types for the match layer.

/// Errors that can occur around match state.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// An envelope that requires result resolution (`matchMoveValid`,
    /// `matchEnd`) arrived before any `matchPrepare` populated the
    /// context. The platform never does this to a well-behaved client,
    /// so it indicates a broken or hostile host.
    #[error("match context not prepared: no matchPrepare received yet")]
    NotPrepared,
}
