use super::Casino;
use crate::error::{EconomyError, EconomyResult};
use coal_db::AccountId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobberyResult {
    pub caught: bool,
    /// The fine paid when caught, the haul otherwise.
    pub amount: i64,
    pub attacker_balance: i64,
    pub target_balance: i64,
    pub narrative: String,
}

impl Casino {
    /// Try to take coins off someone else. Getting caught costs a fine.
    ///
    /// Both accounts settle in the same transaction.
    pub fn attempt_rob(
        &self,
        attacker: AccountId,
        target: AccountId,
    ) -> EconomyResult<RobberyResult> {
        if attacker == target {
            return Err(EconomyError::InvalidTarget);
        }

        let config = &self.config.rob;
        let dealer = self.dealer.as_ref();

        let (caught, amount, attacker_balance, target_balance) = self.ledger.update_pair(
            attacker,
            target,
            "Robbery",
            |robber, victim| {
                if victim.balance < config.min_target_balance {
                    return Err(EconomyError::TargetTooPoor {
                        balance: victim.balance,
                    });
                }

                let caught = dealer.between(1, 100) <= config.catch_chance;

                let amount = if caught {
                    let fine = dealer.between(config.min_penalty, config.max_penalty);
                    robber.debit_clamped(fine)
                } else {
                    let most = victim.balance.min(config.max_haul).max(1);
                    let haul = victim.debit_clamped(dealer.between(1, most));
                    robber.credit(haul)?;
                    haul
                };

                Ok((caught, amount, robber.balance, victim.balance))
            },
        )?;

        tracing::info!(%attacker, %target, caught, amount, "Robbery attempted");

        let narrative = if caught {
            format!("🚔 You got caught and lost **{amount}** coins!")
        } else {
            format!("💸 You stole **{amount}** coins from {target}!")
        };

        Ok(RobberyResult {
            caught,
            amount,
            attacker_balance,
            target_balance,
            narrative,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::games::testing::table;

    #[test]
    fn caught_robbers_pay_a_fine() {
        let table = table();
        table.dealer.push([75, 400]);

        let result = table.casino.attempt_rob(AccountId(1), AccountId(2)).unwrap();

        assert!(result.caught);
        assert_eq!(result.amount, 400);
        assert_eq!(result.attacker_balance, 600);
        assert_eq!(result.target_balance, 1000);
    }

    #[test]
    fn fines_stop_at_zero() {
        let table = table();
        table
            .casino
            .ledger()
            .add_balance(AccountId(1), -850, "Setup")
            .unwrap();
        table.dealer.push([1, 1000]);

        let result = table.casino.attempt_rob(AccountId(1), AccountId(2)).unwrap();

        assert!(result.caught);
        assert_eq!(result.amount, 150);
        assert_eq!(result.attacker_balance, 0);
    }

    #[test]
    fn successful_robbery_moves_coins() {
        let table = table();
        table.dealer.push([76, 321]);

        let result = table.casino.attempt_rob(AccountId(1), AccountId(2)).unwrap();

        assert!(!result.caught);
        assert_eq!(result.amount, 321);
        assert_eq!(result.attacker_balance + result.target_balance, 2000);
        assert_eq!(result.target_balance, 679);
    }

    #[test]
    fn haul_is_capped() {
        let table = table();
        table.dealer.push([100, 5000]);

        let result = table.casino.attempt_rob(AccountId(1), AccountId(2)).unwrap();

        assert_eq!(result.amount, 500);
    }

    #[test]
    fn broke_and_self_targets_are_refused() {
        let table = table();
        let ledger = table.casino.ledger();
        ledger.add_balance(AccountId(2), -901, "Setup").unwrap();
        table.dealer.push([100, 50]);

        assert!(matches!(
            table.casino.attempt_rob(AccountId(1), AccountId(1)),
            Err(EconomyError::InvalidTarget)
        ));
        assert!(matches!(
            table.casino.attempt_rob(AccountId(1), AccountId(2)),
            Err(EconomyError::TargetTooPoor { balance: 99 })
        ));
        assert_eq!(ledger.get_balance(AccountId(2)).unwrap(), 99);
        assert_eq!(table.dealer.remaining(), 2);
    }
}
