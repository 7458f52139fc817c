//! A single Tic-Tac-Toe game

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardStatus, Mark};
use crate::error::ArcadeError;

/// Board plus turn order. X always opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToe {
    board: Board,
    to_move: Mark,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn status(&self) -> BoardStatus {
        self.board.status()
    }

    /// Place the mark whose turn it is
    pub fn play(&mut self, cell: usize) -> Result<BoardStatus, ArcadeError> {
        if self.status().is_decided() {
            return Err(ArcadeError::invalid_move("game is already decided"));
        }
        self.board.place(cell, self.to_move)?;
        self.to_move = self.to_move.other();
        Ok(self.status())
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
