//! Arcade match logic
//!
//! Round and score engine for short arcade matches (Rock-Paper-Scissors and
//! Tic-Tac-Toe), the heuristic opponents, and the channels that carry moves
//! between two seats of a room. This crate is compiled to:
//! - Native (for tests, headless play and the ledger)
//! - WASM (for the browser frontend)

mod board;
mod channel;
mod config;
mod engine;
mod error;
mod opponent;
mod random;
mod room;
mod rules;
mod session;
mod store;
mod tictactoe;

#[cfg(feature = "wasm")]
mod wasm;

pub use board::{Board, BoardStatus, Mark, CELLS, CENTER, CORNERS, WIN_LINES};
pub use channel::{Envelope, MoveChannel, PollingChannel, RelayChannel, RoundBarrier, SimulatedChannel, Transport};
pub use config::{ArcadeConfig, PacingConfig, RewardConfig};
pub use engine::{start_match, MatchRecord, MatchResult, MatchState, Phase, RoundOutcome, RoundPlay, Verdict};
pub use error::ArcadeError;
pub use opponent::{describe_opponent, GameKind, Opponent, OpponentKind, PriorityMover, RandomMover};
pub use random::SeededRng;
pub use room::{RoomCode, Seat};
pub use rules::{judge, Outcome, RpsMove};
pub use session::{
    EventLog, MatchDriver, MatchEvent, MatchObserver, RewardSink, RewardTally, RpsSession, TttMode, TttSession,
    TurnReport,
};
pub use store::{KeyValueStore, MemoryStore};
pub use tictactoe::TicTacToe;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_table() {
        use crate::rules::RpsMove::*;
        assert_eq!(judge(Rock, Scissors), Outcome::Win);
        assert_eq!(judge(Scissors, Paper), Outcome::Win);
        assert_eq!(judge(Paper, Rock), Outcome::Win);
        assert_eq!(judge(Rock, Paper), Outcome::Lose);
        assert_eq!(judge(Paper, Paper), Outcome::Tie);
    }
}
