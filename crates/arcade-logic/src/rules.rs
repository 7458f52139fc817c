//! Rock-Paper-Scissors rules and round outcomes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;

/// A throw in Rock-Paper-Scissors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpsMove {
    Rock,
    Paper,
    Scissors,
}

impl RpsMove {
    /// The whole move-domain, in display order.
    pub const ALL: [RpsMove; 3] = [RpsMove::Rock, RpsMove::Paper, RpsMove::Scissors];

    /// The move this one defeats.
    pub fn beaten(self) -> RpsMove {
        match self {
            RpsMove::Rock => RpsMove::Scissors,
            RpsMove::Paper => RpsMove::Rock,
            RpsMove::Scissors => RpsMove::Paper,
        }
    }

    pub fn beats(self, other: RpsMove) -> bool {
        self.beaten() == other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RpsMove::Rock => "rock",
            RpsMove::Paper => "paper",
            RpsMove::Scissors => "scissors",
        }
    }
}

impl fmt::Display for RpsMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpsMove {
    type Err = ArcadeError;

    /// Unknown input is rejected, never scored as a loss.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" => Ok(RpsMove::Rock),
            "paper" => Ok(RpsMove::Paper),
            "scissors" => Ok(RpsMove::Scissors),
            _ => Err(ArcadeError::invalid_move(format!(
                "{:?} is not one of rock, paper, scissors",
                s
            ))),
        }
    }
}

/// Result of a round from the player's perspective
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Outcome {
    /// The same round seen from the other side.
    pub fn reversed(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// Judge one exchange of throws
pub fn judge(player: RpsMove, opponent: RpsMove) -> Outcome {
    if player == opponent {
        Outcome::Tie
    } else if player.beats(opponent) {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_table() {
        assert!(RpsMove::Rock.beats(RpsMove::Scissors));
        assert!(RpsMove::Paper.beats(RpsMove::Rock));
        assert!(RpsMove::Scissors.beats(RpsMove::Paper));
        assert!(!RpsMove::Scissors.beats(RpsMove::Rock));
    }

    #[test]
    fn test_cyclic_dominance() {
        for a in RpsMove::ALL {
            assert!(!a.beats(a), "{} beats itself", a);
            for b in RpsMove::ALL {
                let relations = [a.beats(b), b.beats(a), a == b];
                assert_eq!(
                    relations.iter().filter(|r| **r).count(),
                    1,
                    "pair ({}, {}) is not exactly one of win/lose/equal",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_judge_is_antisymmetric() {
        for a in RpsMove::ALL {
            for b in RpsMove::ALL {
                assert_eq!(judge(a, b), judge(b, a).reversed());
            }
        }
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!("rock".parse::<RpsMove>().unwrap(), RpsMove::Rock);
        assert_eq!(" Paper ".parse::<RpsMove>().unwrap(), RpsMove::Paper);
        assert_eq!("SCISSORS".parse::<RpsMove>().unwrap(), RpsMove::Scissors);
    }

    #[test]
    fn test_unknown_move_is_rejected() {
        let err = "rokc".parse::<RpsMove>().unwrap_err();
        assert!(matches!(err, ArcadeError::InvalidMove(_)));
        assert!("".parse::<RpsMove>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&RpsMove::Scissors).unwrap(), "\"scissors\"");
        let m: RpsMove = serde_json::from_str("\"paper\"").unwrap();
        assert_eq!(m, RpsMove::Paper);
        assert_eq!(serde_json::to_string(&Outcome::Tie).unwrap(), "\"tie\"");
    }
}
