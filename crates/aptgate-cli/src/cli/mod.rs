//! CLI for the aptgate request gatekeeper.

mod commands;

use anyhow::Result;
use aptgate_core::config::{self, GateConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{run_check, run_config_path, run_serve};

/// Top-level CLI for aptgate.
#[derive(Debug, Parser)]
#[command(name = "aptgate")]
#[command(about = "aptgate: request gatekeeper for a static APT repository", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/aptgate/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Serve the repository tree behind the gatekeeper.
    Serve {
        /// Address to listen on (overrides `listen` from the config).
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
        /// Directory holding the repository tree (overrides `site_root`).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Show what the gatekeeper would answer for a request path.
    Check {
        /// Request path, e.g. /pool/main/k/keystone-cli/keystone-cli_0.1.9_amd64.deb
        path: String,
    },

    /// Print the location of the default config file.
    ConfigPath,
}

fn load_config(explicit: Option<&Path>) -> Result<GateConfig> {
    let cfg = match explicit {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Serve { listen, root } => {
                let mut cfg = load_config(cli.config.as_deref())?;
                if let Some(listen) = listen {
                    cfg.listen = listen;
                }
                if let Some(root) = root {
                    cfg.site_root = root;
                }
                run_serve(&cfg).await?;
            }
            CliCommand::Check { path } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_check(&cfg, &path)?;
            }
            CliCommand::ConfigPath => run_config_path()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
