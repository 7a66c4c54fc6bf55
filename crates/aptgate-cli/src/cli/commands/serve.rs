//! `aptgate serve` – run the HTTP host.

use anyhow::Result;
use aptgate_core::config::GateConfig;
use aptgate_core::server;

pub async fn run_serve(cfg: &GateConfig) -> Result<()> {
    if !cfg.site_root.is_dir() {
        anyhow::bail!("site root {} is not a directory", cfg.site_root.display());
    }
    server::serve(cfg).await
}
