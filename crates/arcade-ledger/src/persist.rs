//! Saving and loading an account through a key-value store
//!
//! One key per field, values as decimal strings, so a browser's
//! `localStorage` can be inspected and edited by hand.

use std::str::FromStr;

use arcade_logic::KeyValueStore;

use crate::account::Account;
use crate::error::LedgerError;

pub const COINS_KEY: &str = "coins";
pub const WINS_KEY: &str = "totalWins";
pub const GAMES_KEY: &str = "totalGames";
pub const TIES_KEY: &str = "totalTies";

fn read<T: FromStr, S: KeyValueStore + ?Sized>(store: &S, key: &str, default: T) -> Result<T, LedgerError> {
    match store.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            log::warn!("corrupt value under {}: {:?}", key, raw);
            LedgerError::Corrupt { key: key.to_string() }
        }),
    }
}

impl Account {
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set(COINS_KEY, self.coins.to_string());
        store.set(WINS_KEY, self.total_wins.to_string());
        store.set(GAMES_KEY, self.total_games.to_string());
        store.set(TIES_KEY, self.total_ties.to_string());
    }

    /// Load an account. Missing keys fall back to a fresh account's values.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, starting_coins: u64) -> Result<Account, LedgerError> {
        let account = Account {
            coins: read(store, COINS_KEY, starting_coins)?,
            total_wins: read(store, WINS_KEY, 0)?,
            total_games: read(store, GAMES_KEY, 0)?,
            total_ties: read(store, TIES_KEY, 0)?,
        };
        if account.total_wins.saturating_add(account.total_ties) > account.total_games {
            log::warn!("stored stats are inconsistent: {:?}", account);
            return Err(LedgerError::Corrupt { key: GAMES_KEY.to_string() });
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_logic::MemoryStore;

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let account = Account {
            coins: 135,
            total_games: 7,
            total_wins: 4,
            total_ties: 1,
        };
        account.save(&mut store);
        assert_eq!(store.get("totalWins").as_deref(), Some("4"));
        assert_eq!(Account::load(&store, 100).unwrap(), account);
    }

    #[test]
    fn test_empty_store_is_fresh_account() {
        let store = MemoryStore::new();
        assert_eq!(Account::load(&store, 100).unwrap(), Account::new(100));
    }

    #[test]
    fn test_partial_store() {
        let mut store = MemoryStore::new();
        store.set(COINS_KEY, "42".to_string());
        let account = Account::load(&store, 100).unwrap();
        assert_eq!(account.coins, 42);
        assert_eq!(account.total_games, 0);
    }

    #[test]
    fn test_corrupt_value() {
        let mut store = MemoryStore::new();
        store.set(TIES_KEY, "lots".to_string());
        assert_eq!(
            Account::load(&store, 100),
            Err(LedgerError::Corrupt { key: "totalTies".to_string() })
        );

        store.set(TIES_KEY, "-1".to_string());
        assert!(Account::load(&store, 100).is_err());
    }

    #[test]
    fn test_inconsistent_counters() {
        let mut store = MemoryStore::new();
        store.set(WINS_KEY, "5".to_string());
        store.set(GAMES_KEY, "2".to_string());
        assert!(matches!(Account::load(&store, 100), Err(LedgerError::Corrupt { .. })));
    }
}
