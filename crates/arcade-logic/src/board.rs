//! Tic-Tac-Toe board

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::rules::Outcome;

pub const CELLS: usize = 9;
pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Rows, columns, diagonals
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// Where a board stands after the latest mark
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    Open,
    Won { mark: Mark, line: [usize; 3] },
    Draw,
}

impl BoardStatus {
    pub fn is_decided(self) -> bool {
        !matches!(self, BoardStatus::Open)
    }
}

/// 3x3 grid, cells indexed 0..9 row-major
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_empty_cell(&self, index: usize) -> bool {
        index < CELLS && self.cells[index].is_none()
    }

    /// Place a mark. Marks are never overwritten.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), ArcadeError> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or_else(|| ArcadeError::invalid_move(format!("cell {} is off the board", index)))?;
        if let Some(existing) = cell {
            return Err(ArcadeError::invalid_move(format!(
                "cell {} already holds {}",
                index,
                existing.symbol()
            )));
        }
        *cell = Some(mark);
        Ok(())
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|i| self.cells[*i].is_none()).collect()
    }

    pub fn has_legal_move(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        !self.has_legal_move()
    }

    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// First completed line, if any
    pub fn winning_line(&self) -> Option<(Mark, [usize; 3])> {
        WIN_LINES.iter().find_map(|line| {
            let [a, b, c] = *line;
            match self.cells[a] {
                Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => {
                    Some((mark, *line))
                }
                _ => None,
            }
        })
    }

    /// A cell that would complete three-in-a-row for `mark`.
    ///
    /// A line qualifies when exactly one cell is empty and the other two hold
    /// `mark`. Lines are scanned in `WIN_LINES` order on every call.
    pub fn completing_cell(&self, mark: Mark) -> Option<usize> {
        WIN_LINES.iter().find_map(|line| {
            let empty: Vec<usize> = line.iter().copied().filter(|i| self.cells[*i].is_none()).collect();
            let owned = line.iter().filter(|i| self.cells[**i] == Some(mark)).count();
            if empty.len() == 1 && owned == 2 {
                Some(empty[0])
            } else {
                None
            }
        })
    }

    pub fn status(&self) -> BoardStatus {
        if let Some((mark, line)) = self.winning_line() {
            BoardStatus::Won { mark, line }
        } else if self.is_full() {
            BoardStatus::Draw
        } else {
            BoardStatus::Open
        }
    }

    /// Outcome for `mark`'s side, or `None` while the game is still open
    pub fn outcome_for(&self, mark: Mark) -> Option<Outcome> {
        match self.status() {
            BoardStatus::Open => None,
            BoardStatus::Draw => Some(Outcome::Tie),
            BoardStatus::Won { mark: winner, .. } if winner == mark => Some(Outcome::Win),
            BoardStatus::Won { .. } => Some(Outcome::Lose),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            let c = cell.map(Mark::symbol).unwrap_or('_');
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ArcadeError;

    /// Nine cells row-major: `X`, `O`, or one of `_ . -` for empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != CELLS {
            return Err(ArcadeError::invalid_move(format!(
                "board needs {} cells, got {}",
                CELLS,
                symbols.len()
            )));
        }
        let mut board = Board::new();
        for (i, c) in symbols.into_iter().enumerate() {
            board.cells[i] = match c.to_ascii_uppercase() {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                '_' | '.' | '-' => None,
                other => {
                    return Err(ArcadeError::invalid_move(format!(
                        "unknown board symbol {:?} at cell {}",
                        other, i
                    )))
                }
            };
        }
        Ok(board)
    }
}
