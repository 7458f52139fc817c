//! Ledger error codes

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("stored value for {key:?} is corrupt")]
    Corrupt { key: String },
}
