use super::Casino;
use crate::error::{EconomyError, EconomyResult};
use coal_db::AccountId;

impl Casino {
    /// Coins from nowhere. Returns the new balance.
    pub fn grant(&self, id: AccountId, amount: i64) -> EconomyResult<i64> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount(amount));
        }

        let balance = self.ledger.add_balance(id, amount, "Granted by an admin")?;
        tracing::info!(%id, amount, balance, "Granted coins");

        Ok(balance)
    }

    /// Takes up to `amount`, never below zero. Returns what was taken and the new balance.
    pub fn seize(&self, id: AccountId, amount: i64) -> EconomyResult<(i64, i64)> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount(amount));
        }

        let (taken, balance) = self.ledger.update(id, "Seized by an admin", |account| {
            Ok::<_, EconomyError>((account.debit_clamped(amount), account.balance))
        })?;
        tracing::info!(%id, taken, balance, "Seized coins");

        Ok((taken, balance))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::games::testing::table;

    #[test]
    fn grant_and_seize() {
        let table = table();
        let id = AccountId(9);

        assert_eq!(table.casino.grant(id, 500).unwrap(), 1500);
        assert_eq!(table.casino.seize(id, 200).unwrap(), (200, 1300));
        assert_eq!(table.casino.seize(id, 5000).unwrap(), (1300, 0));

        assert!(matches!(
            table.casino.grant(id, 0),
            Err(EconomyError::InvalidAmount(0))
        ));
        assert!(matches!(
            table.casino.seize(id, -1),
            Err(EconomyError::InvalidAmount(-1))
        ));

        let history = table.casino.ledger().history(id).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].amount, -1300);
    }
}
