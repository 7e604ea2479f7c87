use coal_db::LedgerError;
use std::time::Duration;
use thiserror::Error;

pub type EconomyResult<T> = Result<T, EconomyError>;

#[derive(Error, Debug)]
pub enum EconomyError {
    #[error("Stakes must be positive, got {0}")]
    InvalidStake(i64),
    #[error("Can't stake {stake}, the limit is {cap}")]
    StakeTooLarge { stake: i64, cap: i64 },
    #[error("You only have {balance} coins, {needed} needed")]
    InsufficientFunds { balance: i64, needed: i64 },
    #[error("Slow down, try again in {}", format_remaining(.remaining))]
    CooldownActive { remaining: Duration },
    #[error("You can roll between 1 and {max} dice, not {count}")]
    InvalidDiceCount { count: i64, max: i64 },
    #[error("Couldn't understand `{0}`, guess heads or tails")]
    InvalidGuess(String),
    #[error("You can't target yourself")]
    InvalidTarget,
    #[error("That account only has {balance} coins, too broke to rob")]
    TargetTooPoor { balance: i64 },
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error("A {multiplier}x payout on {stake} coins is more than the bank can count")]
    PayoutOverflow { stake: i64, multiplier: i64 },
    #[error("That many coins won't fit in one account")]
    BalanceOverflow,
    #[error(transparent)]
    Storage(LedgerError),
    #[error("Ledger worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl EconomyError {
    /// Whether this is the caller's fault, rather than something breaking.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, EconomyError::Storage(_) | EconomyError::Worker(_))
    }
}

impl From<LedgerError> for EconomyError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds { balance, needed } => {
                EconomyError::InsufficientFunds { balance, needed }
            }
            LedgerError::InvalidAmount(amount) => EconomyError::InvalidAmount(amount),
            LedgerError::SameAccount => EconomyError::InvalidTarget,
            LedgerError::BalanceOverflow { .. } => EconomyError::BalanceOverflow,
            err => EconomyError::Storage(err),
        }
    }
}

fn format_remaining(remaining: &Duration) -> String {
    humantime::format_duration(Duration::from_secs(remaining.as_secs().max(1))).to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cooldowns_read_well() {
        let err = EconomyError::CooldownActive {
            remaining: Duration::from_millis(754_250),
        };

        assert_eq!(err.to_string(), "Slow down, try again in 12m 34s");
        assert!(err.is_rejection());
    }

    #[test]
    fn ledger_errors_keep_their_meaning() {
        let err = EconomyError::from(LedgerError::InsufficientFunds {
            balance: 5,
            needed: 10,
        });
        assert!(matches!(
            err,
            EconomyError::InsufficientFunds {
                balance: 5,
                needed: 10
            }
        ));

        let err = EconomyError::from(LedgerError::SameAccount);
        assert!(matches!(err, EconomyError::InvalidTarget));

        assert!(!EconomyError::Storage(LedgerError::SameAccount).is_rejection());
    }
}
