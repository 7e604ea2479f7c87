use clap::{Parser, Subcommand};
use coal_lib::{
    AccountId, Config, Economy,
    commands::{Reply, bank},
};
use coal_traits::{Dealer, SeededDealer, SystemClock, ThreadDealer};
use color_eyre::eyre::{Result, WrapErr};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing_subscriber::util::SubscriberInitExt;

/// The cli arguments for the economy
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file, defaults are used if it doesn't exist
    #[arg(short, long, default_value_t = String::from("config.toml"))]
    pub config: String,

    /// Overrides the database path from the config
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Seed the dealer, same seed same games
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// What's my balance?
    Balance { user: u64 },
    /// Transfer coins to another user
    Give { from: u64, to: u64, amount: i64 },
    /// The richest users
    Leaderboard {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Recent balance changes
    History { user: u64 },
    /// Guess heads or tails, win 2x on a correct guess
    Coinflip {
        user: u64,
        guess: String,
        #[arg(default_value_t = 100)]
        stake: i64,
    },
    /// Roll dice, a total of at least 3 per die wins 5x
    Roll {
        user: u64,
        #[arg(default_value_t = 1)]
        dice: i64,
        #[arg(default_value_t = 100)]
        stake: i64,
    },
    /// Spin the slot machine
    Slots {
        user: u64,
        #[arg(default_value_t = 100)]
        stake: i64,
    },
    /// Claim the daily reward
    Daily { user: u64 },
    /// Work a shift
    Work { user: u64 },
    /// Attempt to rob another user
    Rob { attacker: u64, target: u64 },
    /// [Admin] Grant coins without deducting from anyone
    Grant { user: u64, amount: i64 },
    /// [Admin] Remove coins from a user
    Seize { user: u64, amount: i64 },
}

async fn run(economy: &Economy, command: Command) -> Result<Reply> {
    match command {
        Command::Balance { user } => bank::balance(economy, AccountId(user)).await,
        Command::Give { from, to, amount } => {
            bank::give(economy, AccountId(from), AccountId(to), amount).await
        }
        Command::Leaderboard { limit } => bank::leaderboard(economy, limit).await,
        Command::History { user } => bank::history(economy, AccountId(user)).await,
        Command::Coinflip { user, guess, stake } => {
            bank::coinflip(economy, AccountId(user), &guess, stake).await
        }
        Command::Roll { user, dice, stake } => {
            bank::roll(economy, AccountId(user), dice, stake).await
        }
        Command::Slots { user, stake } => bank::slots(economy, AccountId(user), stake).await,
        Command::Daily { user } => bank::daily(economy, AccountId(user)).await,
        Command::Work { user } => bank::work(economy, AccountId(user)).await,
        Command::Rob { attacker, target } => {
            bank::rob(economy, AccountId(attacker), AccountId(target)).await
        }
        Command::Grant { user, amount } => bank::grant(economy, AccountId(user), amount).await,
        Command::Seize { user, amount } => bank::seize(economy, AccountId(user), amount).await,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
        .init();

    let Args {
        config: config_path,
        db,
        seed,
        command,
    } = Args::parse();

    let mut config =
        Config::create_from_file_or_default(&config_path).wrap_err("Failed to load config")?;
    if let Some(db) = db {
        config.database_path = db;
    }

    let dealer: Arc<dyn Dealer> = match seed {
        Some(seed) => Arc::new(SeededDealer::new(seed)),
        None => Arc::new(ThreadDealer),
    };

    let economy =
        Economy::open(config, dealer, Arc::new(SystemClock)).wrap_err("Failed to open economy")?;

    tracing::debug!("Running {:?}", command);

    let reply = run(&economy, command).await?;

    economy
        .flush()
        .await
        .wrap_err("Failed to flush the database")?;

    println!("{reply}");

    Ok(if reply.is_rejected() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_game_defaults() {
        let args = Args::parse_from(["coal", "--seed", "4", "roll", "42"]);

        assert_eq!(args.seed, Some(4));
        assert_eq!(args.config, "config.toml");
        assert!(matches!(
            args.command,
            Command::Roll {
                user: 42,
                dice: 1,
                stake: 100
            }
        ));
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;

        Args::command().debug_assert();
    }
}
