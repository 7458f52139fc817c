//! Arcade ledger
//!
//! The player's account: coin balance plus lifetime games, wins and ties.
//! [`Account`] is the reward sink sessions pay into, and saves itself to any
//! `KeyValueStore`.

mod account;
mod error;
mod persist;

pub use account::{Account, STARTING_COINS};
pub use error::LedgerError;
pub use persist::{COINS_KEY, GAMES_KEY, TIES_KEY, WINS_KEY};
