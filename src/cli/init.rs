//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use laurel::Config;

/// Initialize a new laurel configuration
/// By default creates the global config at ~/.laurel/config.toml
/// Use --config to specify a custom path
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if Config::init_at(&config_path, force)? {
        println!("Created: {}", config_path.display());
    }

    Ok(())
}
