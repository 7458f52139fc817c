//! Error type shared by the engine, opponents and channels

use thiserror::Error;

/// Everything the game core can reject.
///
/// None of these are recoverable mid-match: sessions reset the match to
/// `NotStarted` and surface the error to the UI.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArcadeError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("no legal move available on a full board")]
    NoLegalMove,

    #[error("match is not in progress")]
    MatchNotInProgress,

    #[error("invalid room code: {0}")]
    InvalidRoomCode(String),

    #[error("channel error: {0}")]
    Channel(String),
}

impl ArcadeError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ArcadeError::Configuration(message.into())
    }

    pub(crate) fn invalid_move(message: impl Into<String>) -> Self {
        ArcadeError::InvalidMove(message.into())
    }
}

impl From<serde_json::Error> for ArcadeError {
    fn from(e: serde_json::Error) -> Self {
        ArcadeError::Configuration(format!("malformed JSON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ArcadeError::invalid_move("cell 9 is off the board").to_string(),
            "invalid move: cell 9 is off the board"
        );
        assert_eq!(
            ArcadeError::NoLegalMove.to_string(),
            "no legal move available on a full board"
        );
    }

    #[test]
    fn test_json_error_is_configuration() {
        let err: ArcadeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ArcadeError::Configuration(_)));
    }
}
