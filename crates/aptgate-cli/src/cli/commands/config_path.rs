//! `aptgate config-path` – print where the default config lives.

use anyhow::Result;
use aptgate_core::config;

pub fn run_config_path() -> Result<()> {
    println!("{}", config::config_path()?.display());
    Ok(())
}
