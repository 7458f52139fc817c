//! Player account: coin balance and lifetime counters

use arcade_logic::{ArcadeConfig, MatchRecord, RewardSink};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Balance for a brand new player
pub const STARTING_COINS: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Coin balance
    pub coins: u64,
    /// Matches finished (abandoned matches never count)
    pub total_games: u32,
    pub total_wins: u32,
    pub total_ties: u32,
}

impl Default for Account {
    fn default() -> Self {
        Self::new(STARTING_COINS)
    }
}

impl Account {
    pub fn new(starting_coins: u64) -> Self {
        Self {
            coins: starting_coins,
            total_games: 0,
            total_wins: 0,
            total_ties: 0,
        }
    }

    pub fn from_config(config: &ArcadeConfig) -> Self {
        Self::new(config.starting_coins)
    }

    /// Add coins, returning the new balance
    pub fn credit(&mut self, amount: u64) -> Result<u64, LedgerError> {
        self.coins = self.coins.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(self.coins)
    }

    pub fn total_losses(&self) -> u32 {
        self.total_games
            .saturating_sub(self.total_wins)
            .saturating_sub(self.total_ties)
    }

    /// Wins as a rounded percentage of games played
    pub fn win_rate(&self) -> u32 {
        if self.total_games == 0 {
            return 0;
        }
        (self.total_wins as f64 / self.total_games as f64 * 100.0).round() as u32
    }

    /// Clear lifetime counters. The balance stays.
    pub fn reset_stats(&mut self) {
        self.total_games = 0;
        self.total_wins = 0;
        self.total_ties = 0;
    }
}

impl RewardSink for Account {
    fn award_coins(&mut self, amount: u32) {
        match self.credit(amount as u64) {
            Ok(balance) => log::info!("awarded {} coins, balance {}", amount, balance),
            Err(e) => {
                log::warn!("award of {} coins failed ({}), balance capped", amount, e);
                self.coins = u64::MAX;
            }
        }
    }

    fn persist_match_result(&mut self, record: MatchRecord) {
        self.total_games = self.total_games.saturating_add(1);
        if record.win {
            self.total_wins = self.total_wins.saturating_add(1);
        }
        if record.tie {
            self.total_ties = self.total_ties.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::default();
        assert_eq!(account.coins, 100);
        assert_eq!(account.total_games, 0);
        assert_eq!(account.win_rate(), 0);

        let config = ArcadeConfig {
            starting_coins: 250,
            ..ArcadeConfig::default()
        };
        assert_eq!(Account::from_config(&config).coins, 250);
    }

    #[test]
    fn test_credit_overflow() {
        let mut account = Account::new(u64::MAX - 5);
        assert_eq!(account.credit(5), Ok(u64::MAX));
        assert_eq!(account.credit(1), Err(LedgerError::Overflow));
        assert_eq!(account.coins, u64::MAX);
    }

    #[test]
    fn test_award_saturates() {
        let mut account = Account::new(u64::MAX - 3);
        account.award_coins(10);
        assert_eq!(account.coins, u64::MAX);
    }

    #[test]
    fn test_persist_records() {
        let mut account = Account::new(0);
        account.persist_match_result(MatchRecord { win: true, tie: false });
        account.persist_match_result(MatchRecord { win: false, tie: true });
        account.persist_match_result(MatchRecord { win: false, tie: false });
        assert_eq!(account.total_games, 3);
        assert_eq!(account.total_wins, 1);
        assert_eq!(account.total_ties, 1);
        assert_eq!(account.total_losses(), 1);
        // 1/3 = 33.3%
        assert_eq!(account.win_rate(), 33);
    }

    #[test]
    fn test_win_rate_rounds() {
        let account = Account {
            coins: 0,
            total_games: 3,
            total_wins: 2,
            total_ties: 0,
        };
        assert_eq!(account.win_rate(), 67);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(Account::new(5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"coins": 5, "totalGames": 0, "totalWins": 0, "totalTies": 0})
        );
    }

    #[test]
    fn test_reset_stats_keeps_coins() {
        let mut account = Account::new(40);
        account.persist_match_result(MatchRecord { win: true, tie: false });
        account.award_coins(10);
        account.reset_stats();
        assert_eq!(account, Account::new(50));
    }
}
