mod admin;
mod coinflip;
mod dice;
mod rewards;
mod rob;
mod slots;

pub use coinflip::{COINFLIP_MULTIPLIER, CoinSide};
pub use dice::dice_target;
pub use rewards::{FAILURE_PHRASES, RewardResult, SUCCESS_PHRASES};
pub use rob::RobberyResult;
pub use slots::{SYMBOLS, SlotOutcome, Symbol};

use crate::{
    config::Config,
    error::{EconomyError, EconomyResult},
};
use coal_db::{AccountId, Ledger};
use coal_traits::{Clock, Dealer};
use std::sync::Arc;

/// What happened to a single stake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerResult {
    pub won: bool,
    pub multiplier: i64,
    pub stake: i64,
    /// Net change to the balance, stake included.
    pub delta: i64,
    /// Balance once the wager settled.
    pub balance: i64,
    pub detail: WagerDetail,
    pub narrative: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WagerDetail {
    CoinFlip { guess: CoinSide, landed: CoinSide },
    Dice { rolls: Vec<i64>, target: i64 },
    Slots { reels: [Symbol; 3], outcome: SlotOutcome },
}

/// A game's verdict once the draws are in.
struct Resolution {
    multiplier: i64,
    detail: WagerDetail,
    headline: String,
}

/// The wagering engine. Every balance change goes through the ledger.
pub struct Casino {
    ledger: Ledger,
    config: Config,
    dealer: Arc<dyn Dealer>,
    clock: Arc<dyn Clock>,
}

impl Casino {
    pub fn new(
        ledger: Ledger,
        config: Config,
        dealer: Arc<dyn Dealer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            config,
            dealer,
            clock,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Takes the stake, lets the game draw, then credits `stake * multiplier`.
    ///
    /// All of it happens in one ledger transaction, so a stake can never be
    /// spent twice by concurrent wagers. Rejected stakes draw nothing.
    fn wager(
        &self,
        id: AccountId,
        stake: i64,
        game: &str,
        resolve: impl Fn(&dyn Dealer) -> Resolution,
    ) -> EconomyResult<WagerResult> {
        let dealer = self.dealer.as_ref();

        let (balance, payout, multiplier, detail, headline) =
            self.ledger.update(id, game, |account| {
                if account.balance < stake {
                    return Err(EconomyError::InsufficientFunds {
                        balance: account.balance,
                        needed: stake,
                    });
                }

                let Resolution {
                    multiplier,
                    detail,
                    headline,
                } = resolve(dealer);

                let payout = stake
                    .checked_mul(multiplier)
                    .ok_or(EconomyError::PayoutOverflow { stake, multiplier })?;

                account.balance -= stake;
                account.credit(payout)?;

                Ok((account.balance, payout, multiplier, detail, headline))
            })?;

        let delta = payout - stake;
        let won = delta > 0;

        tracing::debug!(%id, game, stake, multiplier, delta, "Wager settled");

        let narrative = if won {
            format!("{headline}\nYou won {delta} coins! Your balance is {balance}")
        } else if delta == 0 {
            format!("{headline}\nYou got your stake back. Your balance is {balance}")
        } else {
            format!(
                "{headline}\nYou lost {} coins. Your balance is {balance}",
                -delta
            )
        };

        Ok(WagerResult {
            won,
            multiplier,
            stake,
            delta,
            balance,
            detail,
            narrative,
        })
    }
}

fn check_stake(stake: i64, cap: Option<i64>) -> EconomyResult<()> {
    if stake <= 0 {
        return Err(EconomyError::InvalidStake(stake));
    }

    match cap {
        Some(cap) if stake > cap => Err(EconomyError::StakeTooLarge { stake, cap }),
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::{DateTime, Utc};
    use coal_db::CoalDb;
    use coal_traits::{FixedClock, ScriptedDealer};

    pub(crate) struct Table {
        pub casino: Casino,
        pub dealer: Arc<ScriptedDealer>,
        pub clock: Arc<FixedClock>,
    }

    pub(crate) fn start() -> DateTime<Utc> {
        // 2024-03-09 12:00:00 UTC
        DateTime::<Utc>::from_timestamp(1_709_985_600, 0).unwrap()
    }

    pub(crate) fn table() -> Table {
        table_with(Config::default())
    }

    pub(crate) fn table_with(config: Config) -> Table {
        let db = CoalDb::temporary().unwrap();
        let ledger = Ledger::new(&db, config.starting_balance).unwrap();
        let dealer = Arc::new(ScriptedDealer::default());
        let clock = Arc::new(FixedClock::new(start()));

        Table {
            casino: Casino::new(ledger, config, dealer.clone(), clock.clone()),
            dealer,
            clock,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stakes_are_checked_before_anything_else() {
        assert!(matches!(
            check_stake(0, None),
            Err(EconomyError::InvalidStake(0))
        ));
        assert!(matches!(
            check_stake(-20, Some(3000)),
            Err(EconomyError::InvalidStake(-20))
        ));
        assert!(matches!(
            check_stake(3001, Some(3000)),
            Err(EconomyError::StakeTooLarge {
                stake: 3001,
                cap: 3000
            })
        ));
        assert!(check_stake(3000, Some(3000)).is_ok());
        assert!(check_stake(i64::MAX, None).is_ok());
    }

    #[test]
    fn winnings_that_would_overflow_are_refused() {
        let table = testing::table();
        let id = AccountId(1);
        let ledger = table.casino.ledger();
        ledger.add_balance(id, i64::MAX - 1000, "Setup").unwrap();
        // Heads
        table.dealer.push([0]);

        let err = table
            .casino
            .play_coinflip(id, CoinSide::Heads, i64::MAX - 1)
            .unwrap_err();

        assert!(matches!(err, EconomyError::PayoutOverflow { multiplier: 2, .. }));
        assert!(err.is_rejection());
        assert_eq!(ledger.get_balance(id).unwrap(), i64::MAX);
        assert_eq!(ledger.history(id).unwrap().len(), 1);
    }

    #[test]
    fn a_wager_is_one_history_entry() {
        let table = testing::table();
        let id = AccountId(1);
        // Tails
        table.dealer.push([1]);

        table.casino.play_coinflip(id, CoinSide::Heads, 100).unwrap();

        let history = table.casino.ledger().history(id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, -100);
        assert_eq!(history[0].reason, "Coin flip");
    }
}
