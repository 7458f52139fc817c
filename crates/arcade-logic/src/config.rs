//! Arcade configuration
//!
//! Loaded from JSON by the front end; every field has a default so a partial
//! document (or `{}`) is valid.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;

/// Coins paid out when a match ends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub win_reward: u32,
    pub tie_reward: u32,
}

impl RewardConfig {
    /// 10 for a win, 5 for a tie
    pub fn standard() -> Self {
        Self { win_reward: 10, tie_reward: 5 }
    }

    /// Ties pay nothing
    pub fn win_only() -> Self {
        Self { win_reward: 10, tie_reward: 0 }
    }

    pub fn validate(&self) -> Result<(), ArcadeError> {
        if self.tie_reward >= self.win_reward {
            return Err(ArcadeError::config(format!(
                "tie reward {} must be below win reward {}",
                self.tie_reward, self.win_reward
            )));
        }
        Ok(())
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// UI pacing hints. The core never waits on these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Interim throws shown while the computer "thinks"
    pub thinking_ticks: u32,
    pub tick_ms: u32,
    /// Pause before a simulated remote opponent answers
    pub opponent_delay_ms: u32,
    /// Pause before the Tic-Tac-Toe computer replies
    pub reply_delay_ms: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            thinking_ticks: 5,
            tick_ms: 200,
            opponent_delay_ms: 2000,
            reply_delay_ms: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Rounds per match
    pub rounds: u32,
    pub rewards: RewardConfig,
    pub pacing: PacingConfig,
    /// Balance of a fresh account
    pub starting_coins: u64,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            rewards: RewardConfig::standard(),
            pacing: PacingConfig::default(),
            starting_coins: 100,
        }
    }
}

impl ArcadeConfig {
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let config: ArcadeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ArcadeError> {
        validate_rounds(self.rounds)?;
        self.rewards.validate()
    }
}

pub(crate) fn validate_rounds(rounds: u32) -> Result<(), ArcadeError> {
    if rounds < 1 {
        return Err(ArcadeError::config("a match needs at least one round"));
    }
    Ok(())
}
