use thiserror::Error;

/// Unified error type for the engine. A rejected input never mutates the
/// session, so the caller can always retry with corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The identifier does not name one of the 32 playable squares.
    /// This is a programming error at the boundary, not a rule rejection.
    #[error("'{0}' is not a playable square")]
    OutOfRange(String),

    /// Selecting an empty square, an opponent piece, or a piece outside
    /// the current obligation set.
    #[error("illegal selection: {0}")]
    IllegalSelection(String),

    /// The requested destination is not among the current legal targets.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}
