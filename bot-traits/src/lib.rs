use std::{collections::VecDeque, fmt::Debug};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

// This trait should be usable on all iterator chains, notably, any Result (eyre or ledger)
pub trait ForwardRefToTracing<T, E> {
    fn trace_err(self) -> Result<T, E>;
    fn trace_err_ok(self) -> Option<T>;
}

impl<T, E> ForwardRefToTracing<T, E> for Result<T, E>
where
    E: Debug,
{
    fn trace_err(self) -> Result<T, E> {
        self.map_err(|e| {
            tracing::error!("{:?}", e);
            e
        })
    }

    fn trace_err_ok(self) -> Option<T> {
        self.trace_err().ok()
    }
}

/// Source of every random draw the games make.
///
/// All draws are inclusive integer ranges, so a coin is `between(0, 1)`,
/// a die is `between(1, 6)` and a percentile roll is `between(1, 100)`.
pub trait Dealer: Send + Sync {
    fn between(&self, low: i64, high: i64) -> i64;
}

/// Draws from the thread local rng.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDealer;

impl Dealer for ThreadDealer {
    fn between(&self, low: i64, high: i64) -> i64 {
        rand::rng().random_range(low..=high)
    }
}

/// A reproducible dealer, same seed same games.
#[derive(Debug)]
pub struct SeededDealer(Mutex<StdRng>);

impl SeededDealer {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl Dealer for SeededDealer {
    fn between(&self, low: i64, high: i64) -> i64 {
        self.0.lock().random_range(low..=high)
    }
}

/// Hands out a fixed list of draws in order.
///
/// Draws are clamped into the requested range. Once the script runs out
/// every draw returns the low end of the range.
#[derive(Debug, Default)]
pub struct ScriptedDealer(Mutex<VecDeque<i64>>);

impl ScriptedDealer {
    pub fn new(draws: impl IntoIterator<Item = i64>) -> Self {
        Self(Mutex::new(draws.into_iter().collect()))
    }

    pub fn push(&self, draws: impl IntoIterator<Item = i64>) {
        self.0.lock().extend(draws);
    }

    pub fn remaining(&self) -> usize {
        self.0.lock().len()
    }
}

impl Dealer for ScriptedDealer {
    fn between(&self, low: i64, high: i64) -> i64 {
        match self.0.lock().pop_front() {
            Some(draw) => draw.clamp(low, high),
            None => {
                tracing::warn!("Scripted dealer ran out of draws");
                low
            }
        }
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.0.lock() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scripted_dealer_clamps_and_runs_dry() {
        let dealer = ScriptedDealer::new([3, 42, -7]);

        assert_eq!(dealer.between(1, 6), 3);
        assert_eq!(dealer.between(1, 6), 6);
        assert_eq!(dealer.between(1, 6), 1);
        assert_eq!(dealer.remaining(), 0);
        assert_eq!(dealer.between(100, 1000), 100);
    }

    #[test]
    fn seeded_dealer_is_reproducible() {
        let a = SeededDealer::new(7);
        let b = SeededDealer::new(7);

        let left: Vec<i64> = (0..32).map(|_| a.between(1, 100)).collect();
        let right: Vec<i64> = (0..32).map(|_| b.between(1, 100)).collect();

        assert_eq!(left, right);
        assert!(left.iter().all(|draw| (1..=100).contains(draw)));
    }

    #[test]
    fn fixed_clock_advances() {
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = FixedClock::new(start);

        clock.advance(chrono::Duration::hours(1));

        assert_eq!(clock.now() - start, chrono::Duration::hours(1));
    }
}
