//! Sessions paying into a real account

use arcade_ledger::Account;
use arcade_logic::{EventLog, MatchDriver, MemoryStore, RewardConfig, RpsMove, RpsSession, SeededRng, SimulatedChannel};

#[test]
fn win_is_credited_and_survives_reload() {
    use arcade_logic::RpsMove::*;
    let mut store = MemoryStore::new();
    let mut account = Account::load(&store, 100).unwrap();

    {
        let mut driver = MatchDriver::new(3, RewardConfig::standard(), EventLog::default(), &mut account).unwrap();
        driver.resolve_round(Rock, Scissors).unwrap();
        driver.resolve_round(Paper, Rock).unwrap();
        driver.resolve_round(Rock, Paper).unwrap();
        assert!(driver.state().is_match_over());
    }

    assert_eq!(account.coins, 110);
    assert_eq!((account.total_games, account.total_wins, account.total_ties), (1, 1, 0));
    assert_eq!(account.win_rate(), 100);

    account.save(&mut store);
    assert_eq!(Account::load(&store, 100).unwrap(), account);
}

#[test]
fn abandoned_match_leaves_account_untouched() {
    let mut account = Account::default();
    let driver = MatchDriver::new(5, RewardConfig::standard(), EventLog::default(), &mut account).unwrap();
    let mut session = RpsSession::new(driver, SimulatedChannel::new(SeededRng::new(3)));
    session.choose(RpsMove::Rock).unwrap();
    session.choose(RpsMove::Paper).unwrap();
    session.abandon();
    drop(session);

    assert_eq!(account, Account::default());
}

#[test]
fn several_matches_accumulate() {
    let mut account = Account::new(0);
    for seed in 0..4 {
        let driver = MatchDriver::new(3, RewardConfig::standard(), EventLog::default(), &mut account).unwrap();
        let mut session = RpsSession::new(driver, SimulatedChannel::new(SeededRng::new(seed)));
        for _ in 0..3 {
            session.choose(RpsMove::Scissors).unwrap();
        }
    }

    assert_eq!(account.total_games, 4);
    assert_eq!(account.total_wins + account.total_ties + account.total_losses(), 4);
    let expected = account.total_wins as u64 * 10 + account.total_ties as u64 * 5;
    assert_eq!(account.coins, expected);
}
