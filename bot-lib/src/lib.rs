pub mod commands;
pub mod config;
pub mod economy;
pub mod error;
pub mod games;

pub use coal_db::{AccountId, Change};
pub use config::Config;
pub use economy::Economy;
pub use error::{EconomyError, EconomyResult};
pub use games::{CoinSide, RewardResult, RobberyResult, SlotOutcome, Symbol, WagerDetail, WagerResult};
