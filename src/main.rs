use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use laurel::TimeWindow;

mod cli;

#[derive(Parser)]
#[command(name = "laurel")]
#[command(about = "Achievement and leaderboard bookkeeping for games")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.laurel/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the ledger database (defaults to ~/.laurel/ledger.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new config file with sample achievements and leaderboards
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Report achievement progress (an increment or a new total)
    Progress {
        /// Achievement group key
        achievement: String,
        /// Increment for incremental groups, total otherwise
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },

    /// Claim the reward of a completed tier
    Claim {
        /// Achievement group key
        achievement: String,
        /// Tier index (defaults to the next claimable tier)
        tier: Option<usize>,
    },

    /// Report a finished game's score
    Score {
        /// Leaderboard key
        leaderboard: String,
        score: i64,
    },

    /// Show a cached top table
    Top {
        /// Leaderboard key
        leaderboard: String,
        /// all_time, week or today (defaults to the last shown window)
        #[arg(short, long)]
        window: Option<TimeWindow>,
    },

    /// Show achievement progress and leaderboard records
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Erase all progress
    Reset {
        /// Confirm without prompting
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Status { json: false });
    let open = || -> Result<laurel::Ledger> {
        let mut ledger = cli::open_ledger(cli.config.as_deref(), cli.db.as_deref())?;
        ledger.start()?;
        Ok(ledger)
    };

    match command {
        Commands::Init { force } => {
            cli::init::init_command(cli.config.clone(), force)?;
        }
        Commands::Progress { achievement, value } => {
            cli::achievement::progress_command(&open()?, &achievement, value)?;
        }
        Commands::Claim { achievement, tier } => {
            cli::achievement::claim_command(&open()?, &achievement, tier)?;
        }
        Commands::Score { leaderboard, score } => {
            cli::leaderboard::score_command(&mut open()?, &leaderboard, score)?;
        }
        Commands::Top {
            leaderboard,
            window,
        } => {
            cli::leaderboard::top_command(&mut open()?, &leaderboard, window)?;
        }
        Commands::Status { json } => {
            cli::status::status_command(&open()?, json)?;
        }
        Commands::Reset { yes } => {
            cli::reset::reset_command(&mut open()?, yes)?;
        }
    }

    Ok(())
}
