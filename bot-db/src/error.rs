use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Not enough coins, the balance is {balance} but {needed} is needed")]
    InsufficientFunds { balance: i64, needed: i64 },
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error("Adding {amount} to {balance} coins doesn't fit in a balance")]
    BalanceOverflow { balance: i64, amount: i64 },
    #[error("Source and destination are the same account")]
    SameAccount,
    #[error("Storage failure: {0}")]
    Storage(#[from] sled::Error),
    #[error("Failed to (de)serialize an account: {0}")]
    Codec(#[from] bincode::Error),
}
