use super::Casino;
use crate::error::{EconomyError, EconomyResult};
use chrono::{DateTime, Utc};
use coal_db::AccountId;
use std::time::Duration;

pub static SUCCESS_PHRASES: [&str; 6] = [
    "You finished the slides the night before and they actually look good!",
    "You graded a hundred assignments in record time!",
    "You fixed a critical bug and saved the release!",
    "You ran the lab flawlessly, every student got their work reviewed.",
    "You organised a department event people still talk about!",
    "You aced your exams. Congrats!",
];

pub static FAILURE_PHRASES: [&str; 5] = [
    "You tried to edit the course page and broke the whole thing.",
    "You pushed to main instead of dev. Everything is on fire.",
    "You spilled coffee on your keyboard.",
    "You accidentally emailed the entire university.",
    "You deleted the project folder. There was no backup.",
];

/// A reward that was paid out, or a shift that went badly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardResult {
    /// Signed, a failed shift is negative.
    pub amount: i64,
    pub balance: i64,
    pub narrative: String,
}

/// Time left until the next UTC day starts.
fn until_tomorrow(now: DateTime<Utc>) -> Duration {
    now.date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|midnight| (midnight.and_utc() - now).to_std().ok())
        .unwrap_or_default()
}

impl Casino {
    /// Once per UTC calendar day.
    pub fn claim_daily(&self, id: AccountId) -> EconomyResult<RewardResult> {
        let now = self.clock.now();
        let today = now.date_naive();
        let reward = self.config.daily_reward;

        let balance = self.ledger.update(id, "Daily reward", |account| {
            if account.last_daily.is_some_and(|last| last >= today) {
                return Err(EconomyError::CooldownActive {
                    remaining: until_tomorrow(now),
                });
            }

            account.last_daily = Some(today);
            account.credit(reward)?;
            Ok(account.balance)
        })?;

        tracing::info!(%id, reward, balance, "Daily claimed");

        Ok(RewardResult {
            amount: reward,
            balance,
            narrative: format!("💰 You claimed **{reward}** coins! Come back tomorrow for more."),
        })
    }

    /// Once per rolling cooldown window. Shifts can go wrong and cost coins.
    pub fn claim_work(&self, id: AccountId) -> EconomyResult<RewardResult> {
        let now = self.clock.now();
        let config = &self.config.work;
        let dealer = self.dealer.as_ref();

        let (amount, balance, phrase) = self.ledger.update(id, "Work", |account| {
            if let Some(last) = account.last_work {
                let elapsed = now - last;

                if elapsed < config.cooldown {
                    return Err(EconomyError::CooldownActive {
                        remaining: (config.cooldown - elapsed).to_std().unwrap_or_default(),
                    });
                }
            }

            account.last_work = Some(now);

            let failed = dealer.between(1, 100) <= config.failure_chance;
            let earnings = dealer.between(config.min_earnings, config.max_earnings);

            let (amount, phrases) = if failed {
                (-account.debit_clamped(earnings), &FAILURE_PHRASES[..])
            } else {
                account.credit(earnings)?;
                (earnings, &SUCCESS_PHRASES[..])
            };
            let phrase = phrases[dealer.between(0, phrases.len() as i64 - 1) as usize];

            Ok((amount, account.balance, phrase))
        })?;

        tracing::info!(%id, amount, balance, "Worked a shift");

        let narrative = if amount < 0 {
            format!("{phrase}\nYou lost **{}** coins.", -amount)
        } else {
            format!("{phrase}\nYou earned **{amount}** coins.")
        };

        Ok(RewardResult {
            amount,
            balance,
            narrative,
        })
    }
}
