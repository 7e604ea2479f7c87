use crate::{
    config::Config,
    error::EconomyResult,
    games::{Casino, CoinSide, RewardResult, RobberyResult, WagerResult},
};
use coal_db::{AccountId, Change, CoalDb, Ledger};
use coal_traits::{Clock, Dealer};
use std::sync::Arc;

/// The economy as the command layer sees it.
///
/// Cheap to clone. Every call runs on the blocking pool, so a slow disk
/// only holds up the command that hit it.
#[derive(Clone)]
pub struct Economy(Arc<Casino>);

impl Economy {
    pub fn new(casino: Casino) -> Self {
        Self(Arc::new(casino))
    }

    /// Opens the database named in the config.
    pub fn open(
        config: Config,
        dealer: Arc<dyn Dealer>,
        clock: Arc<dyn Clock>,
    ) -> EconomyResult<Self> {
        let db = CoalDb::open(&config.database_path)?;
        let ledger = Ledger::new(&db, config.starting_balance)?;

        Ok(Self::new(Casino::new(ledger, config, dealer, clock)))
    }

    pub fn config(&self) -> &Config {
        self.0.config()
    }

    async fn blocking<T: Send + 'static>(
        &self,
        f: impl FnOnce(&Casino) -> EconomyResult<T> + Send + 'static,
    ) -> EconomyResult<T> {
        let casino = Arc::clone(&self.0);
        tokio::task::spawn_blocking(move || f(&casino)).await?
    }

    pub async fn get_balance(&self, id: AccountId) -> EconomyResult<i64> {
        self.blocking(move |casino| Ok(casino.ledger().get_balance(id)?))
            .await
    }

    pub async fn add_balance(&self, id: AccountId, delta: i64) -> EconomyResult<i64> {
        self.blocking(move |casino| Ok(casino.ledger().add_balance(id, delta, "Adjustment")?))
            .await
    }

    pub async fn transfer(&self, from: AccountId, to: AccountId, amount: i64) -> EconomyResult<()> {
        self.blocking(move |casino| Ok(casino.ledger().transfer(from, to, amount)?))
            .await
    }

    /// `None` uses the configured size.
    pub async fn leaderboard(&self, limit: Option<usize>) -> EconomyResult<Vec<(AccountId, i64)>> {
        self.blocking(move |casino| {
            let limit = limit.unwrap_or(casino.config().leaderboard_size);
            Ok(casino.ledger().leaderboard(limit)?)
        })
        .await
    }

    pub async fn history(&self, id: AccountId) -> EconomyResult<Vec<Change>> {
        self.blocking(move |casino| Ok(casino.ledger().history(id)?))
            .await
    }

    pub async fn play_coinflip(
        &self,
        id: AccountId,
        guess: CoinSide,
        stake: i64,
    ) -> EconomyResult<WagerResult> {
        self.blocking(move |casino| casino.play_coinflip(id, guess, stake))
            .await
    }

    pub async fn play_dice(&self, id: AccountId, count: i64, stake: i64) -> EconomyResult<WagerResult> {
        self.blocking(move |casino| casino.play_dice(id, count, stake))
            .await
    }

    pub async fn play_slots(&self, id: AccountId, stake: i64) -> EconomyResult<WagerResult> {
        self.blocking(move |casino| casino.play_slots(id, stake))
            .await
    }

    pub async fn claim_daily(&self, id: AccountId) -> EconomyResult<RewardResult> {
        self.blocking(move |casino| casino.claim_daily(id)).await
    }

    pub async fn claim_work(&self, id: AccountId) -> EconomyResult<RewardResult> {
        self.blocking(move |casino| casino.claim_work(id)).await
    }

    pub async fn attempt_rob(&self, attacker: AccountId, target: AccountId) -> EconomyResult<RobberyResult> {
        self.blocking(move |casino| casino.attempt_rob(attacker, target))
            .await
    }

    pub async fn grant(&self, id: AccountId, amount: i64) -> EconomyResult<i64> {
        self.blocking(move |casino| casino.grant(id, amount)).await
    }

    pub async fn seize(&self, id: AccountId, amount: i64) -> EconomyResult<(i64, i64)> {
        self.blocking(move |casino| casino.seize(id, amount)).await
    }

    pub async fn flush(&self) -> EconomyResult<()> {
        self.blocking(|casino| Ok(casino.ledger().flush()?)).await
    }
}
