use super::{Casino, Resolution, WagerDetail, WagerResult, check_stake};
use crate::error::{EconomyError, EconomyResult};
use coal_db::AccountId;
use coal_traits::Dealer;
use std::{fmt, str::FromStr};

pub const COINFLIP_MULTIPLIER: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn draw(dealer: &dyn Dealer) -> Self {
        match dealer.between(0, 1) {
            0 => CoinSide::Heads,
            _ => CoinSide::Tails,
        }
    }
}

impl FromStr for CoinSide {
    type Err = EconomyError;

    fn from_str(guess: &str) -> Result<Self, Self::Err> {
        match guess.trim().to_lowercase().as_str() {
            "heads" | "h" => Ok(CoinSide::Heads),
            "tails" | "t" => Ok(CoinSide::Tails),
            _ => Err(EconomyError::InvalidGuess(guess.to_owned())),
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => write!(f, "heads"),
            CoinSide::Tails => write!(f, "tails"),
        }
    }
}

impl Casino {
    /// Call the coin, double your stake if it lands your way.
    pub fn play_coinflip(
        &self,
        id: AccountId,
        guess: CoinSide,
        stake: i64,
    ) -> EconomyResult<WagerResult> {
        check_stake(stake, self.config.coinflip.max_stake)?;

        self.wager(id, stake, "Coin flip", |dealer| {
            let landed = CoinSide::draw(dealer);

            Resolution {
                multiplier: if landed == guess {
                    COINFLIP_MULTIPLIER
                } else {
                    0
                },
                detail: WagerDetail::CoinFlip { guess, landed },
                headline: format!("🪙 The coin landed on **{landed}**"),
            }
        })
    }
}
