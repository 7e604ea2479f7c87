use super::{Casino, Resolution, WagerDetail, WagerResult, check_stake};
use crate::error::{EconomyError, EconomyResult};
use coal_db::AccountId;
use itertools::Itertools;

const TARGET_PER_DIE: i64 = 3;

/// The total a roll of `count` dice has to reach.
pub fn dice_target(count: i64) -> i64 {
    count * TARGET_PER_DIE
}

impl Casino {
    /// Roll `count` six sided dice, reach [`dice_target`] to win.
    pub fn play_dice(&self, id: AccountId, count: i64, stake: i64) -> EconomyResult<WagerResult> {
        let config = &self.config.dice;

        check_stake(stake, config.max_stake)?;

        if !(1..=config.max_dice).contains(&count) {
            return Err(EconomyError::InvalidDiceCount {
                count,
                max: config.max_dice,
            });
        }

        self.wager(id, stake, "Dice", |dealer| {
            let rolls = (0..count).map(|_| dealer.between(1, 6)).collect_vec();
            let total: i64 = rolls.iter().sum();
            let target = dice_target(count);

            Resolution {
                multiplier: if total >= target { config.payout } else { 0 },
                headline: format!(
                    "🎲 {} = **{total}** (needed {target})",
                    rolls.iter().join(" + ")
                ),
                detail: WagerDetail::Dice { rolls, target },
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::games::testing::table;

    #[test]
    fn reaching_the_target_pays_five_times() {
        let table = table();
        table.dealer.push([1, 2, 6]);

        let result = table.casino.play_dice(AccountId(1), 3, 100).unwrap();

        assert!(result.won);
        assert_eq!(result.multiplier, 5);
        assert_eq!(result.delta, 400);
        assert_eq!(result.balance, 1400);
        assert_eq!(
            result.detail,
            WagerDetail::Dice {
                rolls: vec![1, 2, 6],
                target: 9
            }
        );
        assert!(result.narrative.contains("1 + 2 + 6 = **9**"));
    }

    #[test]
    fn falling_short_loses_the_stake() {
        let table = table();
        table.dealer.push([1, 2, 5]);

        let result = table.casino.play_dice(AccountId(1), 3, 100).unwrap();

        assert!(!result.won);
        assert_eq!(result.delta, -100);
        assert_eq!(result.balance, 900);
    }

    #[test]
    fn dice_count_is_bounded() {
        let table = table();

        for count in [0, 21] {
            assert!(matches!(
                table.casino.play_dice(AccountId(1), count, 100),
                Err(EconomyError::InvalidDiceCount { max: 20, .. })
            ));
        }
        assert!(matches!(
            table.casino.play_dice(AccountId(1), 2, 3001),
            Err(EconomyError::StakeTooLarge { cap: 3000, .. })
        ));
        assert_eq!(table.casino.ledger().len(), 0);
    }
}
