//! `aptgate check` – dry-run the gatekeeper on one request path.

use anyhow::Result;
use aptgate_core::config::GateConfig;
use aptgate_core::gate::{GateRequest, Gatekeeper, Outcome};

pub fn run_check(cfg: &GateConfig, target: &str) -> Result<()> {
    let gate = Gatekeeper::from_config(cfg)?;
    println!("{}", describe(&gate, target));
    Ok(())
}

/// One-line summary: `continue`, `302 <location>`, or `<status> <body>`.
pub(crate) fn describe(gate: &Gatekeeper, target: &str) -> String {
    let req = GateRequest::from_target("GET", target);
    match gate.handle(&req) {
        Outcome::Continue => "continue".to_string(),
        Outcome::Respond(resp) => match resp.location() {
            Some(location) => format!("{} {}", resp.status, location),
            None => format!("{} {}", resp.status, resp.body),
        },
    }
}
