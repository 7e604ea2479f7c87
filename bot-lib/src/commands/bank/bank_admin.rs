use crate::{
    commands::{Reply, respond},
    economy::Economy,
};
use coal_db::AccountId;
use color_eyre::eyre::Result;

/// Grant coins without deducting from anyone.
pub async fn grant(economy: &Economy, user: AccountId, amount: i64) -> Result<Reply> {
    respond(economy.grant(user, amount).await, |balance| {
        format!("✅ Granted **{amount}** coins to {user}, who now has {balance}.")
    })
}

/// Remove coins from a user, as many as they have.
pub async fn seize(economy: &Economy, user: AccountId, amount: i64) -> Result<Reply> {
    respond(economy.seize(user, amount).await, |(taken, balance)| {
        format!("✅ Removed **{taken}** coins from {user}, who now has {balance}.")
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::games::testing::table;

    #[tokio::test]
    async fn seize_reports_what_was_taken() {
        let economy = Economy::new(table().casino);

        let reply = seize(&economy, AccountId(5), 2500).await.unwrap();

        assert_eq!(
            reply.text(),
            "✅ Removed **1000** coins from 5, who now has 0."
        );
    }
}
