//! Computer opponents

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark, CENTER, CORNERS};
use crate::error::ArcadeError;
use crate::rules::RpsMove;

/// Which game a session is playing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    RockPaperScissors,
    TicTacToe,
}

/// Opponent variant behind each game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentKind {
    /// Uniform random throw, no memory.
    RandomMover,
    /// Win, block, center, corner, anything.
    PriorityMover,
}

impl GameKind {
    pub fn opponent(self) -> OpponentKind {
        match self {
            GameKind::RockPaperScissors => OpponentKind::RandomMover,
            GameKind::TicTacToe => OpponentKind::PriorityMover,
        }
    }
}

/// Human-readable description of an opponent (used by the WASM module)
pub fn describe_opponent(kind: OpponentKind) -> &'static str {
    match kind {
        OpponentKind::RandomMover => "Throws rock, paper or scissors at random.",
        OpponentKind::PriorityMover => {
            "Wins if it can, blocks if it must, then takes the center, a corner, or any cell."
        }
    }
}

/// A computer player for one game.
pub trait Opponent {
    /// What the opponent looks at before moving
    type Position: ?Sized;
    type Move;

    fn choose<R: Rng + ?Sized>(&self, position: &Self::Position, rng: &mut R) -> Result<Self::Move, ArcadeError>;
}

/// Rock-Paper-Scissors opponent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomMover;

impl RandomMover {
    pub fn throw<R: Rng + ?Sized>(&self, rng: &mut R) -> RpsMove {
        RpsMove::ALL[rng.random_range(0..RpsMove::ALL.len())]
    }

    /// Interim throws to animate while "thinking". Purely cosmetic; the
    /// real throw is drawn separately.
    pub fn flicker<R: Rng + ?Sized>(&self, ticks: u32, rng: &mut R) -> Vec<RpsMove> {
        (0..ticks).map(|_| self.throw(rng)).collect()
    }
}

impl Opponent for RandomMover {
    type Position = ();
    type Move = RpsMove;

    fn choose<R: Rng + ?Sized>(&self, _position: &(), rng: &mut R) -> Result<RpsMove, ArcadeError> {
        Ok(self.throw(rng))
    }
}

/// Single-ply Tic-Tac-Toe heuristic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriorityMover {
    mark: Mark,
}

impl PriorityMover {
    pub fn new(mark: Mark) -> Self {
        Self { mark }
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }
}

impl Default for PriorityMover {
    fn default() -> Self {
        Self::new(Mark::O)
    }
}

impl Opponent for PriorityMover {
    type Position = Board;
    type Move = usize;

    fn choose<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Result<usize, ArcadeError> {
        if !board.has_legal_move() {
            return Err(ArcadeError::NoLegalMove);
        }

        if let Some(cell) = board.completing_cell(self.mark) {
            return Ok(cell);
        }
        if let Some(cell) = board.completing_cell(self.mark.other()) {
            return Ok(cell);
        }
        if board.is_empty_cell(CENTER) {
            return Ok(CENTER);
        }

        let corners: Vec<usize> = CORNERS.iter().copied().filter(|c| board.is_empty_cell(*c)).collect();
        if let Some(corner) = corners.choose(rng) {
            return Ok(*corner);
        }

        board
            .empty_cells()
            .choose(rng)
            .copied()
            .ok_or(ArcadeError::NoLegalMove)
    }
}
