//! Match state machine
//!
//! A match is a fixed number of rounds. Each resolved round adds at most one
//! point to one side; when the last round resolves the match finishes and
//! can be finalized into a verdict and a coin reward.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark};
use crate::config::{validate_rounds, RewardConfig};
use crate::error::ArcadeError;
use crate::rules::{judge, Outcome, RpsMove};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

/// What was played in a round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPlay {
    Throws { player: RpsMove, opponent: RpsMove },
    Board { board: Board, player_mark: Mark },
}

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub outcome: Outcome,
    pub play: RoundPlay,
    pub player_score: u32,
    pub opponent_score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    PlayerWin,
    PlayerLoss,
    Tie,
}

/// What the lifetime counters need to know about a finished match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub win: bool,
    pub tie: bool,
}

/// Result of a complete match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub verdict: Verdict,
    pub player_score: u32,
    pub opponent_score: u32,
    pub total_rounds: u32,
    pub reward: u32,
    pub rounds: Vec<RoundOutcome>,
}

impl MatchResult {
    pub fn record(&self) -> MatchRecord {
        MatchRecord {
            win: self.verdict == Verdict::PlayerWin,
            tie: self.verdict == Verdict::Tie,
        }
    }
}

/// One game instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    total_rounds: u32,
    current_round: u32,
    player_score: u32,
    opponent_score: u32,
    phase: Phase,
    history: Vec<RoundOutcome>,
}

/// Create a match and move it straight to round 1
pub fn start_match(total_rounds: u32) -> Result<MatchState, ArcadeError> {
    let mut state = MatchState::new(total_rounds)?;
    state.begin()?;
    Ok(state)
}

impl MatchState {
    /// A `NotStarted` match. Zero rounds is a configuration error.
    pub fn new(total_rounds: u32) -> Result<Self, ArcadeError> {
        validate_rounds(total_rounds)?;
        Ok(Self {
            total_rounds,
            current_round: 1,
            player_score: 0,
            opponent_score: 0,
            phase: Phase::NotStarted,
            history: Vec::new(),
        })
    }

    pub fn begin(&mut self) -> Result<(), ArcadeError> {
        if self.phase != Phase::NotStarted {
            return Err(ArcadeError::MatchNotInProgress);
        }
        self.phase = Phase::InProgress;
        log::info!("match started: {} rounds", self.total_rounds);
        Ok(())
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Round being played. `total_rounds + 1` once finished.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    pub fn opponent_score(&self) -> u32 {
        self.opponent_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &[RoundOutcome] {
        &self.history
    }

    pub fn is_match_over(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Resolve a Rock-Paper-Scissors round
    pub fn resolve_round(&mut self, player: RpsMove, opponent: RpsMove) -> Result<RoundOutcome, ArcadeError> {
        self.ensure_in_progress()?;
        let outcome = judge(player, opponent);
        Ok(self.apply(outcome, RoundPlay::Throws { player, opponent }))
    }

    /// Resolve a Tic-Tac-Toe round from a decided board
    pub fn resolve_board(&mut self, board: &Board, player_mark: Mark) -> Result<RoundOutcome, ArcadeError> {
        self.ensure_in_progress()?;
        let outcome = board
            .outcome_for(player_mark)
            .ok_or_else(|| ArcadeError::invalid_move(format!("board {} is still open", board)))?;
        Ok(self.apply(outcome, RoundPlay::Board { board: *board, player_mark }))
    }

    fn ensure_in_progress(&self) -> Result<(), ArcadeError> {
        if self.phase != Phase::InProgress {
            return Err(ArcadeError::MatchNotInProgress);
        }
        Ok(())
    }

    fn apply(&mut self, outcome: Outcome, play: RoundPlay) -> RoundOutcome {
        match outcome {
            Outcome::Win => self.player_score += 1,
            Outcome::Lose => self.opponent_score += 1,
            Outcome::Tie => {}
        }

        let resolved = RoundOutcome {
            round: self.current_round,
            outcome,
            play,
            player_score: self.player_score,
            opponent_score: self.opponent_score,
        };
        log::debug!(
            "round {}/{}: {:?} ({}-{})",
            resolved.round,
            self.total_rounds,
            outcome,
            self.player_score,
            self.opponent_score
        );

        self.history.push(resolved.clone());
        self.current_round += 1;
        if self.current_round > self.total_rounds {
            self.phase = Phase::Finished;
        }
        resolved
    }

    /// Verdict and payout of a finished match
    pub fn finalize_match(&self, rewards: &RewardConfig) -> Result<MatchResult, ArcadeError> {
        if self.phase != Phase::Finished {
            return Err(ArcadeError::MatchNotInProgress);
        }

        let (verdict, reward) = match self.player_score.cmp(&self.opponent_score) {
            std::cmp::Ordering::Greater => (Verdict::PlayerWin, rewards.win_reward),
            std::cmp::Ordering::Less => (Verdict::PlayerLoss, 0),
            std::cmp::Ordering::Equal => (Verdict::Tie, rewards.tie_reward),
        };

        Ok(MatchResult {
            verdict,
            player_score: self.player_score,
            opponent_score: self.opponent_score,
            total_rounds: self.total_rounds,
            reward,
            rounds: self.history.clone(),
        })
    }

    /// Back to `NotStarted`, keeping the round count
    pub fn reset(&mut self) {
        self.current_round = 1;
        self.player_score = 0;
        self.opponent_score = 0;
        self.phase = Phase::NotStarted;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RpsMove::*;

    fn play_all(state: &mut MatchState, rounds: &[(RpsMove, RpsMove)]) {
        for (p, o) in rounds {
            state.resolve_round(*p, *o).unwrap();
        }
    }

    #[test]
    fn test_start_match() {
        let state = start_match(3).unwrap();
        assert_eq!(state.phase(), Phase::InProgress);
        assert_eq!(state.current_round(), 1);
        assert_eq!(state.player_score(), 0);
        assert_eq!(state.opponent_score(), 0);
        assert_eq!(state.total_rounds(), 3);
    }

    #[test]
    fn test_zero_rounds_is_configuration_error() {
        assert!(matches!(start_match(0), Err(ArcadeError::Configuration(_))));
    }

    #[test]
    fn test_round_scoring() {
        let mut state = start_match(5).unwrap();

        let r = state.resolve_round(Rock, Scissors).unwrap();
        assert_eq!(r.outcome, Outcome::Win);
        assert_eq!((r.player_score, r.opponent_score), (1, 0));

        let r = state.resolve_round(Rock, Paper).unwrap();
        assert_eq!(r.outcome, Outcome::Lose);
        assert_eq!((r.player_score, r.opponent_score), (1, 1));

        let r = state.resolve_round(Paper, Paper).unwrap();
        assert_eq!(r.outcome, Outcome::Tie);
        assert_eq!((r.player_score, r.opponent_score), (1, 1));
        assert_eq!(r.round, 3);
        assert_eq!(state.current_round(), 4);
    }

    #[test]
    fn test_match_over_exactly_after_last_round() {
        let mut state = start_match(3).unwrap();
        state.resolve_round(Rock, Rock).unwrap();
        assert!(!state.is_match_over());
        state.resolve_round(Rock, Rock).unwrap();
        assert!(!state.is_match_over());
        assert_eq!(state.current_round(), 3);
        state.resolve_round(Rock, Rock).unwrap();
        assert!(state.is_match_over());
        assert_eq!(state.phase(), Phase::Finished);
    }

    #[test]
    fn test_no_rounds_after_finish() {
        let mut state = start_match(1).unwrap();
        state.resolve_round(Paper, Rock).unwrap();
        let before = state.clone();
        assert_eq!(state.resolve_round(Paper, Rock), Err(ArcadeError::MatchNotInProgress));
        assert_eq!(state, before);
    }

    #[test]
    fn test_no_rounds_before_begin() {
        let mut state = MatchState::new(2).unwrap();
        assert_eq!(state.resolve_round(Paper, Rock), Err(ArcadeError::MatchNotInProgress));
        state.begin().unwrap();
        assert!(state.resolve_round(Paper, Rock).is_ok());
        assert_eq!(state.begin(), Err(ArcadeError::MatchNotInProgress));
    }

    #[test]
    fn test_finalize_verdicts() {
        let rewards = RewardConfig::standard();

        let mut win = start_match(3).unwrap();
        play_all(&mut win, &[(Rock, Scissors), (Paper, Rock), (Rock, Paper)]);
        let result = win.finalize_match(&rewards).unwrap();
        assert_eq!(result.verdict, Verdict::PlayerWin);
        assert_eq!((result.player_score, result.opponent_score), (2, 1));
        assert_eq!(result.reward, 10);
        assert_eq!(result.rounds.len(), 3);
        assert_eq!(result.record(), MatchRecord { win: true, tie: false });

        let mut loss = start_match(1).unwrap();
        play_all(&mut loss, &[(Rock, Paper)]);
        let result = loss.finalize_match(&rewards).unwrap();
        assert_eq!(result.verdict, Verdict::PlayerLoss);
        assert_eq!(result.reward, 0);

        let mut tie = start_match(2).unwrap();
        play_all(&mut tie, &[(Rock, Paper), (Rock, Scissors)]);
        let result = tie.finalize_match(&rewards).unwrap();
        assert_eq!(result.verdict, Verdict::Tie);
        assert_eq!(result.reward, 5);
        assert_eq!(result.record(), MatchRecord { win: false, tie: true });
    }

    #[test]
    fn test_finalize_requires_finished_match() {
        let state = start_match(2).unwrap();
        assert!(state.finalize_match(&RewardConfig::standard()).is_err());
    }

    #[test]
    fn test_win_only_rewards() {
        let mut tie = start_match(1).unwrap();
        play_all(&mut tie, &[(Scissors, Scissors)]);
        let result = tie.finalize_match(&RewardConfig::win_only()).unwrap();
        assert_eq!(result.reward, 0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let fresh = MatchState::new(4).unwrap();

        let mut state = start_match(4).unwrap();
        play_all(&mut state, &[(Rock, Scissors), (Rock, Paper)]);
        state.reset();
        assert_eq!(state, fresh);
        state.reset();
        assert_eq!(state, fresh);

        let mut finished = start_match(4).unwrap();
        play_all(&mut finished, &[(Rock, Rock); 4]);
        finished.reset();
        assert_eq!(finished, fresh);
    }

    #[test]
    fn test_resolve_board() {
        let mut state = start_match(2).unwrap();
        let won: Board = "XXXOO____".parse().unwrap();
        let r = state.resolve_board(&won, Mark::X).unwrap();
        assert_eq!(r.outcome, Outcome::Win);
        assert!(matches!(r.play, RoundPlay::Board { player_mark: Mark::X, .. }));

        let open: Board = "XO_______".parse().unwrap();
        let err = state.resolve_board(&open, Mark::X).unwrap_err();
        assert!(matches!(err, ArcadeError::InvalidMove(_)));
        assert_eq!(state.current_round(), 2);
        assert_eq!(state.player_score(), 1);
    }

    #[test]
    fn test_cumulative_history() {
        let mut state = start_match(4).unwrap();
        play_all(&mut state, &[(Rock, Scissors), (Rock, Paper), (Paper, Rock), (Rock, Rock)]);

        let mut expected_player = 0;
        let mut expected_opponent = 0;
        for (i, round) in state.history().iter().enumerate() {
            assert_eq!(round.round, i as u32 + 1);
            match round.outcome {
                Outcome::Win => expected_player += 1,
                Outcome::Lose => expected_opponent += 1,
                Outcome::Tie => {}
            }
            assert_eq!(round.player_score, expected_player);
            assert_eq!(round.opponent_score, expected_opponent);
        }
    }
}
