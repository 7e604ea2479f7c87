use chrono::Duration;
use color_eyre::eyre::{Result, WrapErr, ensure};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use std::path::{Path, PathBuf};

/// Every knob of the economy. Anything left out of the file keeps its default.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the sled database lives.
    pub database_path: PathBuf,
    /// What a brand new account starts with.
    pub starting_balance: i64,
    /// How many accounts `/leaderboard` shows.
    pub leaderboard_size: usize,
    /// Coins handed out by the daily reward.
    pub daily_reward: i64,
    pub coinflip: CoinflipConfig,
    pub dice: DiceConfig,
    pub slots: SlotsConfig,
    pub work: WorkConfig,
    pub rob: RobConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from("coal.db"),
            starting_balance: 1000,
            leaderboard_size: 10,
            daily_reward: 500,
            coinflip: CoinflipConfig::default(),
            dice: DiceConfig::default(),
            slots: SlotsConfig::default(),
            work: WorkConfig::default(),
            rob: RobConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CoinflipConfig {
    /// No cap unless set, the balance is the only limit.
    pub max_stake: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DiceConfig {
    pub max_stake: Option<i64>,
    pub max_dice: i64,
    /// Multiple of the stake paid back on a win.
    pub payout: i64,
}

impl Default for DiceConfig {
    fn default() -> Self {
        DiceConfig {
            max_stake: Some(3000),
            max_dice: 20,
            payout: 5,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SlotsConfig {
    pub max_stake: Option<i64>,
}

impl Default for SlotsConfig {
    fn default() -> Self {
        SlotsConfig {
            max_stake: Some(3000),
        }
    }
}

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorkConfig {
    /// Rolling window between two shifts, in seconds.
    #[serde_as(as = "DurationSeconds<i64>")]
    pub cooldown: Duration,
    /// Percent chance that a shift goes wrong.
    pub failure_chance: i64,
    pub min_earnings: i64,
    pub max_earnings: i64,
}

impl Default for WorkConfig {
    fn default() -> Self {
        WorkConfig {
            cooldown: get_default_work_cooldown(),
            failure_chance: 25,
            min_earnings: 50,
            max_earnings: 500,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RobConfig {
    /// Percent chance the robber gets caught.
    pub catch_chance: i64,
    pub min_penalty: i64,
    pub max_penalty: i64,
    /// The most a single robbery can take.
    pub max_haul: i64,
    /// Targets with less than this are left alone.
    pub min_target_balance: i64,
}

impl Default for RobConfig {
    fn default() -> Self {
        RobConfig {
            catch_chance: 75,
            min_penalty: 100,
            max_penalty: 1000,
            max_haul: 500,
            min_target_balance: 100,
        }
    }
}

impl Config {
    /// Reads the config from a toml file.
    pub fn create_from_file(config_path: impl AsRef<Path>) -> Result<Config> {
        let file = std::fs::read_to_string(config_path).wrap_err("Could not read config file")?;

        let config: Config = toml::from_str(&file).wrap_err("Could not parse config file")?;
        config.validate().wrap_err("Invalid config file")?;

        Ok(config)
    }

    /// Rejects settings the games can't run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.starting_balance >= 0,
            "starting_balance can't be negative, got {}",
            self.starting_balance
        );
        ensure!(
            self.daily_reward >= 0,
            "daily_reward can't be negative, got {}",
            self.daily_reward
        );
        ensure!(self.leaderboard_size > 0, "leaderboard_size must be at least 1");

        for (game, cap) in [
            ("coinflip", self.coinflip.max_stake),
            ("dice", self.dice.max_stake),
            ("slots", self.slots.max_stake),
        ] {
            if let Some(cap) = cap {
                ensure!(cap > 0, "[{game}] max_stake must be positive, got {cap}");
            }
        }

        let DiceConfig {
            max_dice, payout, ..
        } = self.dice;
        ensure!(max_dice >= 1, "[dice] max_dice must be at least 1, got {max_dice}");
        ensure!(payout >= 0, "[dice] payout can't be negative, got {payout}");

        let work = &self.work;
        ensure!(
            work.cooldown >= Duration::zero(),
            "[work] cooldown can't be negative"
        );
        check_chance("[work] failure_chance", work.failure_chance)?;
        check_range("[work] earnings", work.min_earnings, work.max_earnings)?;

        let rob = &self.rob;
        check_chance("[rob] catch_chance", rob.catch_chance)?;
        check_range("[rob] penalty", rob.min_penalty, rob.max_penalty)?;
        ensure!(
            rob.max_haul >= 1,
            "[rob] max_haul must be at least 1, got {}",
            rob.max_haul
        );
        ensure!(
            rob.min_target_balance >= 0,
            "[rob] min_target_balance can't be negative, got {}",
            rob.min_target_balance
        );

        Ok(())
    }

    /// Like [`Config::create_from_file`], but a missing file means defaults.
    pub fn create_from_file_or_default(config_path: impl AsRef<Path>) -> Result<Config> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            tracing::warn!(
                "No config at {}, using the defaults",
                config_path.display()
            );
            return Ok(Config::default());
        }

        Config::create_from_file(config_path)
    }

    pub fn save(&self, config_path: impl AsRef<Path>) -> Result<()> {
        let toml = toml::to_string(&self).wrap_err("Could not serialize config")?;

        std::fs::write(config_path, toml).wrap_err("Could not save config")
    }
}

fn check_chance(name: &str, chance: i64) -> Result<()> {
    ensure!(
        (0..=100).contains(&chance),
        "{name} is a percentage, got {chance}"
    );
    Ok(())
}

fn check_range(name: &str, min: i64, max: i64) -> Result<()> {
    ensure!(min >= 0, "{name} can't start below zero, got {min}");
    ensure!(min <= max, "{name} range is backwards, {min} > {max}");
    Ok(())
}

const fn get_default_work_cooldown() -> Duration {
    match chrono::TimeDelta::try_seconds(3600) {
        Some(duration) => duration,
        None => panic!("Could not create default work cooldown"),
    }
}
