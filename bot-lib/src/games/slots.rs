use super::{Casino, Resolution, WagerDetail, WagerResult, check_stake};
use crate::error::EconomyResult;
use coal_db::AccountId;
use coal_traits::Dealer;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Star,
    Cherry,
    Lemon,
    Orange,
    Watermelon,
    Seven,
    MoneyBag,
    Gem,
    Dollar,
}

/// Every reel carries each symbol once.
pub const SYMBOLS: [Symbol; 9] = [
    Symbol::Star,
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Watermelon,
    Symbol::Seven,
    Symbol::MoneyBag,
    Symbol::Gem,
    Symbol::Dollar,
];

impl Symbol {
    pub fn emoji(self) -> &'static str {
        match self {
            Symbol::Star => "⭐",
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Watermelon => "🍉",
            Symbol::Seven => "7️⃣",
            Symbol::MoneyBag => "💰",
            Symbol::Gem => "💎",
            Symbol::Dollar => "💵",
        }
    }

    pub fn draw(dealer: &dyn Dealer) -> Self {
        let index = dealer.between(0, SYMBOLS.len() as i64 - 1);
        SYMBOLS[index.clamp(0, SYMBOLS.len() as i64 - 1) as usize]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Payout tiers, best first. Star count and reel equality split every
/// spin into exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Jackpot,
    Triple,
    Wild,
    TwoStars,
    OneStar,
    Pair,
    NoMatch,
}

impl SlotOutcome {
    pub fn evaluate(reels: &[Symbol; 3]) -> Self {
        let stars = reels.iter().filter(|&&s| s == Symbol::Star).count();
        let [a, b, c] = *reels;
        let any_pair = a == b || b == c || a == c;

        match stars {
            3 => SlotOutcome::Jackpot,
            2 => SlotOutcome::TwoStars,
            // With one star, any pair has to be the other two reels
            1 if any_pair => SlotOutcome::Wild,
            1 => SlotOutcome::OneStar,
            _ if a == b && b == c => SlotOutcome::Triple,
            _ if any_pair => SlotOutcome::Pair,
            _ => SlotOutcome::NoMatch,
        }
    }

    pub fn multiplier(self) -> i64 {
        match self {
            SlotOutcome::Jackpot => 100,
            SlotOutcome::Triple => 50,
            SlotOutcome::Wild => 10,
            SlotOutcome::TwoStars => 5,
            SlotOutcome::OneStar => 3,
            SlotOutcome::Pair => 2,
            SlotOutcome::NoMatch => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SlotOutcome::Jackpot => "🎰 **JACKPOT!**",
            SlotOutcome::Triple => "🎉 Triple match!",
            SlotOutcome::Wild => "✨ Wild match!",
            SlotOutcome::TwoStars => "⭐ Two stars!",
            SlotOutcome::OneStar => "⭐ One star!",
            SlotOutcome::Pair => "👀 Pair!",
            SlotOutcome::NoMatch => "😔 No match.",
        }
    }
}

impl Casino {
    pub fn play_slots(&self, id: AccountId, stake: i64) -> EconomyResult<WagerResult> {
        check_stake(stake, self.config.slots.max_stake)?;

        self.wager(id, stake, "Slots", |dealer| {
            let reels = [
                Symbol::draw(dealer),
                Symbol::draw(dealer),
                Symbol::draw(dealer),
            ];
            let outcome = SlotOutcome::evaluate(&reels);

            Resolution {
                multiplier: outcome.multiplier(),
                headline: format!("**{}**\n{}", reels.iter().join(" | "), outcome.label()),
                detail: WagerDetail::Slots { reels, outcome },
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::EconomyError, games::testing::table};
    use super::Symbol::*;

    fn index(symbol: Symbol) -> i64 {
        SYMBOLS.iter().position(|&s| s == symbol).unwrap() as i64
    }

    #[test]
    fn every_tier_pays_exactly() {
        let cases = [
            ([Star, Star, Star], SlotOutcome::Jackpot, 9900),
            ([Cherry, Cherry, Cherry], SlotOutcome::Triple, 4900),
            ([Star, Cherry, Cherry], SlotOutcome::Wild, 900),
            ([Cherry, Star, Star], SlotOutcome::TwoStars, 400),
            ([Lemon, Star, Cherry], SlotOutcome::OneStar, 200),
            ([Cherry, Cherry, Lemon], SlotOutcome::Pair, 100),
            ([Cherry, Lemon, Gem], SlotOutcome::NoMatch, -100),
        ];

        for (reels, outcome, delta) in cases {
            let table = table();
            table.dealer.push(reels.map(index));

            let result = table.casino.play_slots(AccountId(1), 100).unwrap();

            assert_eq!(
                result.detail,
                WagerDetail::Slots { reels, outcome },
                "{reels:?}"
            );
            assert_eq!(result.delta, delta, "{reels:?}");
            assert_eq!(result.balance, 1000 + delta, "{reels:?}");
            assert_eq!(result.won, delta > 0);
            assert_eq!(
                table.casino.ledger().get_balance(AccountId(1)).unwrap(),
                1000 + delta
            );
        }
    }

    #[test]
    fn tiers_do_not_overlap() {
        assert_eq!(
            SlotOutcome::evaluate(&[Star, Gem, Star]),
            SlotOutcome::TwoStars
        );
        assert_eq!(SlotOutcome::evaluate(&[Gem, Star, Gem]), SlotOutcome::Wild);
        assert_eq!(SlotOutcome::evaluate(&[Gem, Lemon, Gem]), SlotOutcome::Pair);
        assert_eq!(
            SlotOutcome::evaluate(&[Seven, Seven, Seven]),
            SlotOutcome::Triple
        );
    }

    #[test]
    fn slots_cap_the_stake() {
        let table = table();
        table.casino.ledger().add_balance(AccountId(1), 10_000, "Setup").unwrap();

        assert!(matches!(
            table.casino.play_slots(AccountId(1), 3001),
            Err(EconomyError::StakeTooLarge { cap: 3000, .. })
        ));
        assert!(matches!(
            table.casino.play_slots(AccountId(1), 0),
            Err(EconomyError::InvalidStake(0))
        ));
        assert_eq!(
            table.casino.ledger().get_balance(AccountId(1)).unwrap(),
            11_000
        );
    }

    #[test]
    fn narrative_shows_the_reels() {
        let table = table();
        table.dealer.push([Star, Star, Star].map(index));

        let result = table.casino.play_slots(AccountId(1), 100).unwrap();

        assert!(result.narrative.starts_with("**⭐ | ⭐ | ⭐**\n🎰 **JACKPOT!**"));
        assert!(result.narrative.contains("You won 9900 coins"));
    }
}
