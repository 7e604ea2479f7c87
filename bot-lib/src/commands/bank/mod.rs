mod bank_admin;
mod bank_user;

pub use bank_admin::*;
pub use bank_user::*;

use coal_db::{AccountId, Change};

/// Newest change first. The ledger already keeps only the recent ones.
fn build_history_message(history: &[Change], user: AccountId) -> String {
    let lines = history
        .iter()
        .rev()
        .map(|Change { amount, reason }| format!("`{amount:>9}`: {reason}\n"))
        .collect::<String>();

    format!("### History:\nAccount {user}\n{lines}")
}

fn build_leaderboard_message(rankings: &[(AccountId, i64)]) -> String {
    if rankings.is_empty() {
        return String::from("No balances recorded yet.");
    }

    let mut message_text = String::from("### 💰 Wealth Leaderboard:\n");

    for (place, (user_id, balance)) in rankings.iter().enumerate() {
        let medal = match place {
            0 => String::from("🥇"),
            1 => String::from("🥈"),
            2 => String::from("🥉"),
            _ => format!("{}.", place + 1),
        };

        message_text.push_str(&format!("{medal} {user_id}: {balance} coins\n"));
    }

    message_text
}
