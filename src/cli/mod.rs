//! CLI command implementations

pub mod achievement;
pub mod init;
pub mod leaderboard;
pub mod reset;
pub mod status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use laurel::platform::platform_for;
use laurel::store::{ProgressStore, SqliteStore};
use laurel::{Config, Ledger};

/// Load the config (global unless a path is given) and open the ledger on
/// the SQLite store (~/.laurel/ledger.db unless a path is given)
pub fn open_ledger(config_path: Option<&Path>, db_path: Option<&Path>) -> Result<Ledger> {
    let config = match config_path {
        Some(path) => {
            let config = Config::from_file(path)?;
            config.validate()?;
            config
        }
        None => Config::load()?,
    };

    let db_path: PathBuf = db_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::global_config_dir().join("ledger.db"));
    let store: Arc<dyn ProgressStore> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open ledger database: {}", db_path.display()))?,
    );
    let platform = platform_for(config.settings.platform.kind);

    Ledger::new(config, store, platform).context("Failed to build ledger")
}
