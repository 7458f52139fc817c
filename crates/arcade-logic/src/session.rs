//! Sessions: a match wired to its opponent, its observer and its reward sink
//!
//! [`MatchDriver`] is the shared part: it applies round outcomes, reports them,
//! and pays out once when the last round resolves. [`RpsSession`] and
//! [`TttSession`] feed it moves from a [`MoveChannel`] or the Tic-Tac-Toe
//! heuristic.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardStatus, Mark};
use crate::channel::{MoveChannel, RoundBarrier};
use crate::config::{ArcadeConfig, RewardConfig};
use crate::engine::{start_match, MatchRecord, MatchResult, MatchState, Phase, RoundOutcome};
use crate::error::ArcadeError;
use crate::opponent::{Opponent, PriorityMover};
use crate::rules::RpsMove;
use crate::tictactoe::TicTacToe;

/// Callbacks into the UI layer
pub trait MatchObserver {
    fn on_round_resolved(&mut self, outcome: &RoundOutcome);
    fn on_match_finished(&mut self, result: &MatchResult);
    fn on_error(&mut self, _error: &ArcadeError) {}
}

/// Where coins and lifetime results go
pub trait RewardSink {
    fn award_coins(&mut self, amount: u32);
    fn persist_match_result(&mut self, _record: MatchRecord) {}
}

impl<T: MatchObserver + ?Sized> MatchObserver for &mut T {
    fn on_round_resolved(&mut self, outcome: &RoundOutcome) {
        (**self).on_round_resolved(outcome)
    }

    fn on_match_finished(&mut self, result: &MatchResult) {
        (**self).on_match_finished(result)
    }

    fn on_error(&mut self, error: &ArcadeError) {
        (**self).on_error(error)
    }
}

impl<T: RewardSink + ?Sized> RewardSink for &mut T {
    fn award_coins(&mut self, amount: u32) {
        (**self).award_coins(amount)
    }

    fn persist_match_result(&mut self, record: MatchRecord) {
        (**self).persist_match_result(record)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    RoundResolved(RoundOutcome),
    MatchFinished(MatchResult),
    Error(String),
}

/// Observer that keeps every event, in order
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<MatchEvent>,
}

impl EventLog {
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }
}

impl MatchObserver for EventLog {
    fn on_round_resolved(&mut self, outcome: &RoundOutcome) {
        self.events.push(MatchEvent::RoundResolved(outcome.clone()));
    }

    fn on_match_finished(&mut self, result: &MatchResult) {
        self.events.push(MatchEvent::MatchFinished(result.clone()));
    }

    fn on_error(&mut self, error: &ArcadeError) {
        self.events.push(MatchEvent::Error(error.to_string()));
    }
}

/// Reward sink that only counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTally {
    pub coins: u64,
    pub awards: u32,
    pub games: u32,
    pub wins: u32,
    pub ties: u32,
}

impl RewardSink for RewardTally {
    fn award_coins(&mut self, amount: u32) {
        self.coins += amount as u64;
        self.awards += 1;
    }

    fn persist_match_result(&mut self, record: MatchRecord) {
        self.games += 1;
        if record.win {
            self.wins += 1;
        }
        if record.tie {
            self.ties += 1;
        }
    }
}

pub struct MatchDriver<O, S> {
    state: MatchState,
    rewards: RewardConfig,
    observer: O,
    sink: S,
}

impl<O: MatchObserver, S: RewardSink> MatchDriver<O, S> {
    /// Start a match. Bad round counts or reward tiers fail here, never mid-match.
    pub fn new(total_rounds: u32, rewards: RewardConfig, observer: O, sink: S) -> Result<Self, ArcadeError> {
        rewards.validate()?;
        Ok(Self {
            state: start_match(total_rounds)?,
            rewards,
            observer,
            sink,
        })
    }

    pub fn from_config(config: &ArcadeConfig, observer: O, sink: S) -> Result<Self, ArcadeError> {
        Self::new(config.rounds, config.rewards, observer, sink)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Moves outside a running match are refused without touching the state,
    /// so a finished match keeps its scores.
    pub fn ensure_in_progress(&self) -> Result<(), ArcadeError> {
        if self.state.phase() != Phase::InProgress {
            return Err(ArcadeError::MatchNotInProgress);
        }
        Ok(())
    }

    pub fn resolve_round(&mut self, player: RpsMove, opponent: RpsMove) -> Result<RoundOutcome, ArcadeError> {
        self.ensure_in_progress()?;
        match self.state.resolve_round(player, opponent) {
            Ok(outcome) => self.settle(outcome),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn resolve_board(&mut self, board: &Board, player_mark: Mark) -> Result<RoundOutcome, ArcadeError> {
        self.ensure_in_progress()?;
        match self.state.resolve_board(board, player_mark) {
            Ok(outcome) => self.settle(outcome),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn settle(&mut self, outcome: RoundOutcome) -> Result<RoundOutcome, ArcadeError> {
        self.observer.on_round_resolved(&outcome);
        if self.state.is_match_over() {
            let result = match self.state.finalize_match(&self.rewards) {
                Ok(result) => result,
                Err(e) => return Err(self.fail(e)),
            };
            log::info!(
                "match finished {:?} {}-{}, awarding {} coins",
                result.verdict,
                result.player_score,
                result.opponent_score,
                result.reward
            );
            self.sink.award_coins(result.reward);
            self.sink.persist_match_result(result.record());
            self.observer.on_match_finished(&result);
        }
        Ok(outcome)
    }

    /// Abort the match and report `error`. Scores are discarded, nothing is paid.
    pub fn fail(&mut self, error: ArcadeError) -> ArcadeError {
        log::warn!("match aborted: {}", error);
        self.state.reset();
        self.observer.on_error(&error);
        error
    }

    /// Player went back to the menu
    pub fn abandon(&mut self) {
        if self.state.phase() == Phase::InProgress {
            log::info!("match abandoned in round {}", self.state.current_round());
        }
        self.state.reset();
    }

    /// Fresh match with the same round count
    pub fn restart(&mut self) -> Result<(), ArcadeError> {
        self.state.reset();
        self.state.begin()
    }
}

/// Rock-Paper-Scissors against whatever is behind the channel
pub struct RpsSession<C, O, S> {
    driver: MatchDriver<O, S>,
    channel: C,
    barrier: RoundBarrier,
}

impl<C: MoveChannel, O: MatchObserver, S: RewardSink> RpsSession<C, O, S> {
    pub fn new(driver: MatchDriver<O, S>, channel: C) -> Self {
        Self {
            driver,
            channel,
            barrier: RoundBarrier::default(),
        }
    }

    pub fn driver(&self) -> &MatchDriver<O, S> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut MatchDriver<O, S> {
        &mut self.driver
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn state(&self) -> &MatchState {
        self.driver.state()
    }

    /// Local move submitted, opponent's still outstanding
    pub fn is_waiting(&self) -> bool {
        self.barrier.has_player_move()
    }

    /// Submit the player's throw. Resolves immediately if the opponent's
    /// throw is already in; otherwise call [`RpsSession::pump`] later.
    /// A second throw in the same round is ignored.
    pub fn choose(&mut self, mv: RpsMove) -> Result<Option<RoundOutcome>, ArcadeError> {
        self.driver.ensure_in_progress()?;
        if !self.barrier.submit_player(mv) {
            log::debug!("ignoring second throw in round {}", self.state().current_round());
            return Ok(None);
        }
        let round = self.state().current_round();
        if let Err(e) = self.channel.submit_move(round, mv) {
            return Err(self.fail(e));
        }
        self.pump()
    }

    /// Throw from UI input such as `"rock"`
    pub fn choose_str(&mut self, raw: &str) -> Result<Option<RoundOutcome>, ArcadeError> {
        self.driver.ensure_in_progress()?;
        match raw.parse::<RpsMove>() {
            Ok(mv) => self.choose(mv),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Check the channel for the opponent's throw and resolve if both are in
    pub fn pump(&mut self) -> Result<Option<RoundOutcome>, ArcadeError> {
        if self.state().phase() != Phase::InProgress {
            return Ok(None);
        }
        if !self.barrier.has_opponent_move() {
            let round = self.state().current_round();
            match self.channel.opponent_move(round) {
                Ok(Some(mv)) => self.barrier.deliver_opponent(mv),
                Ok(None) => {}
                Err(e) => return Err(self.fail(e)),
            }
        }
        match self.barrier.take_pair() {
            Some((player, opponent)) => self.driver.resolve_round(player, opponent).map(Some),
            None => Ok(None),
        }
    }

    fn fail(&mut self, error: ArcadeError) -> ArcadeError {
        self.barrier.clear();
        self.driver.fail(error)
    }

    pub fn abandon(&mut self) {
        self.barrier.clear();
        self.channel.close();
        self.driver.abandon();
    }

    /// Play again in the same room. Moves from the previous match are never
    /// paired with moves from this one.
    pub fn restart(&mut self) -> Result<(), ArcadeError> {
        self.barrier.clear();
        self.channel.next_match();
        self.driver.restart()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TttMode {
    /// Player is X, the priority heuristic answers as O
    VsComputer,
    /// Both marks come from the UI; scores are from X's side
    TwoPlayer,
}

/// What happened after one click on the board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Cell the computer answered with
    pub reply: Option<usize>,
    pub status: BoardStatus,
    /// Set when this click decided the game
    pub round: Option<RoundOutcome>,
}

/// Tic-Tac-Toe match; every round is one full game
pub struct TttSession<R, O, S> {
    driver: MatchDriver<O, S>,
    game: TicTacToe,
    mode: TttMode,
    opponent: PriorityMover,
    rng: R,
}

impl<R: Rng, O: MatchObserver, S: RewardSink> TttSession<R, O, S> {
    pub fn new(driver: MatchDriver<O, S>, mode: TttMode, rng: R) -> Self {
        Self {
            driver,
            game: TicTacToe::new(),
            mode,
            opponent: PriorityMover::new(Mark::O),
            rng,
        }
    }

    pub fn driver(&self) -> &MatchDriver<O, S> {
        &self.driver
    }

    pub fn state(&self) -> &MatchState {
        self.driver.state()
    }

    pub fn game(&self) -> &TicTacToe {
        &self.game
    }

    pub fn mode(&self) -> TttMode {
        self.mode
    }

    /// Place the current mark on `cell`; against the computer its reply
    /// follows immediately.
    pub fn place(&mut self, cell: usize) -> Result<TurnReport, ArcadeError> {
        self.driver.ensure_in_progress()?;

        let status = match self.game.play(cell) {
            Ok(status) => status,
            Err(e) => return Err(self.fail(e)),
        };
        if status.is_decided() {
            return self.finish_game(None);
        }

        if self.mode == TttMode::TwoPlayer {
            return Ok(TurnReport { reply: None, status, round: None });
        }

        let reply = match self.opponent.choose(self.game.board(), &mut self.rng) {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(e)),
        };
        let status = match self.game.play(reply) {
            Ok(status) => status,
            Err(e) => return Err(self.fail(e)),
        };
        if status.is_decided() {
            return self.finish_game(Some(reply));
        }
        Ok(TurnReport { reply: Some(reply), status, round: None })
    }

    fn finish_game(&mut self, reply: Option<usize>) -> Result<TurnReport, ArcadeError> {
        let board = *self.game.board();
        self.game.reset();
        let round = self.driver.resolve_board(&board, Mark::X)?;
        Ok(TurnReport {
            reply,
            status: board.status(),
            round: Some(round),
        })
    }

    fn fail(&mut self, error: ArcadeError) -> ArcadeError {
        self.game.reset();
        self.driver.fail(error)
    }

    pub fn abandon(&mut self) {
        self.game.reset();
        self.driver.abandon();
    }

    pub fn restart(&mut self) -> Result<(), ArcadeError> {
        self.game.reset();
        self.driver.restart()
    }
}
