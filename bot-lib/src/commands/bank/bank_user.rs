use super::{build_history_message, build_leaderboard_message};
use crate::{
    commands::{Reply, respond},
    economy::Economy,
    games::{CoinSide, WagerResult},
};
use coal_db::AccountId;
use color_eyre::eyre::Result;

/// What's my balance?
pub async fn balance(economy: &Economy, user: AccountId) -> Result<Reply> {
    respond(economy.get_balance(user).await, |balance| {
        format!("💰 Account {user} has **{balance}** coins")
    })
}

/// Give some of your coins to someone else.
pub async fn give(economy: &Economy, from: AccountId, to: AccountId, amount: i64) -> Result<Reply> {
    respond(economy.transfer(from, to, amount).await, |()| {
        format!("💸 Transferred **{amount}** coins to {to}.")
    })
}

/// The richest accounts.
pub async fn leaderboard(economy: &Economy, limit: Option<usize>) -> Result<Reply> {
    respond(economy.leaderboard(limit).await, |rankings| {
        build_leaderboard_message(&rankings)
    })
}

/// Inspect your own history
pub async fn history(economy: &Economy, user: AccountId) -> Result<Reply> {
    respond(economy.history(user).await, |history| {
        if history.is_empty() {
            String::from("No history found for that user")
        } else {
            build_history_message(&history, user)
        }
    })
}

fn wager_text(result: WagerResult) -> String {
    result.narrative
}

/// Guess heads or tails, double up on a correct call.
pub async fn coinflip(economy: &Economy, user: AccountId, guess: &str, stake: i64) -> Result<Reply> {
    let guess = match guess.parse::<CoinSide>() {
        Ok(guess) => guess,
        Err(err) => return Ok(Reply::Rejected(err.to_string())),
    };

    respond(economy.play_coinflip(user, guess, stake).await, wager_text)
}

/// Roll some dice, reach three per die to win.
pub async fn roll(economy: &Economy, user: AccountId, dice: i64, stake: i64) -> Result<Reply> {
    respond(economy.play_dice(user, dice, stake).await, wager_text)
}

/// Spin the slot machine.
pub async fn slots(economy: &Economy, user: AccountId, stake: i64) -> Result<Reply> {
    respond(economy.play_slots(user, stake).await, wager_text)
}

/// Claim the daily reward.
pub async fn daily(economy: &Economy, user: AccountId) -> Result<Reply> {
    respond(economy.claim_daily(user).await, |reward| reward.narrative)
}

/// Work a shift. Usually pays.
pub async fn work(economy: &Economy, user: AccountId) -> Result<Reply> {
    respond(economy.claim_work(user).await, |reward| reward.narrative)
}

/// Attempt to rob another user (risky!)
pub async fn rob(economy: &Economy, attacker: AccountId, target: AccountId) -> Result<Reply> {
    respond(economy.attempt_rob(attacker, target).await, |robbery| {
        robbery.narrative
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::games::testing::table;

    #[tokio::test]
    async fn rejections_are_replies() {
        let table = table();
        table.dealer.push([0]);
        let economy = Economy::new(table.casino);
        let user = AccountId(1);

        let reply = coinflip(&economy, user, "sideways", 100).await.unwrap();
        assert_eq!(
            reply,
            Reply::Rejected(String::from(
                "Couldn't understand `sideways`, guess heads or tails"
            ))
        );

        let reply = slots(&economy, user, 5000).await.unwrap();
        assert!(reply.is_rejected());
        assert_eq!(reply.text(), "Can't stake 5000, the limit is 3000");

        let reply = coinflip(&economy, user, "h", 100).await.unwrap();
        assert!(!reply.is_rejected());
        assert!(reply.text().contains("You won 100 coins! Your balance is 1100"));
    }

    #[tokio::test]
    async fn balance_and_give() {
        let economy = Economy::new(table().casino);

        let reply = give(&economy, AccountId(1), AccountId(2), 300).await.unwrap();
        assert_eq!(reply.text(), "💸 Transferred **300** coins to 2.");

        let reply = balance(&economy, AccountId(2)).await.unwrap();
        assert_eq!(reply.text(), "💰 Account 2 has **1300** coins");

        let reply = give(&economy, AccountId(1), AccountId(2), 0).await.unwrap();
        assert_eq!(reply, Reply::Rejected(String::from("Amount must be positive, got 0")));
    }
}
