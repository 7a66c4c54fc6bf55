//! Per-request composition of the path gate and the package redirectors.
//!
//! The gate runs on every request. A redirector only runs when the path lies
//! in its package's pool directory; everything else that passes the gate is
//! handed back to the host for static serving.

use crate::artifact::{ArtifactRedirector, VersionGrammar};
use crate::config::{ConfigError, GateConfig};
use crate::path_gate::AllowList;
use crate::response::GateResponse;

/// The parts of an inbound request the core looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRequest {
    pub method: String,
    /// URL path only; the host strips query and fragment.
    pub path: String,
}

impl GateRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    /// Builds a request from a path that may still carry `?query` or `#fragment`.
    pub fn from_target(method: &str, target: &str) -> Self {
        let end = target.find(['?', '#']).unwrap_or(target.len());
        Self::new(method, &target[..end])
    }
}

/// What the host should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Serve normally (static files).
    Continue,
    Respond(GateResponse),
}

/// Immutable, shareable request gatekeeper.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    allow: AllowList,
    redirectors: Vec<ArtifactRedirector>,
}

impl Gatekeeper {
    pub fn new(allow: AllowList, redirectors: Vec<ArtifactRedirector>) -> Self {
        Self { allow, redirectors }
    }

    pub fn from_config(cfg: &GateConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let redirectors = cfg
            .packages
            .iter()
            .map(|spec| ArtifactRedirector::new(spec, cfg.version_grammar))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(AllowList::from_config(&cfg.allow), redirectors))
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    pub fn redirectors(&self) -> &[ArtifactRedirector] {
        &self.redirectors
    }

    /// Grammar in force, if any package is redirected.
    pub fn grammar(&self) -> Option<VersionGrammar> {
        self.redirectors.first().map(|r| r.grammar())
    }

    pub fn handle(&self, req: &GateRequest) -> Outcome {
        let path = req.path.as_str();

        if let Some(blocked) = self.allow.classify(path).response() {
            tracing::debug!(method = %req.method, path, "blocked by path gate");
            return Outcome::Respond(blocked);
        }

        if let Some(redirector) = self.redirectors.iter().find(|r| r.handles(path)) {
            let resolution = redirector.resolve(path);
            tracing::info!(
                method = %req.method,
                path,
                package = redirector.package(),
                ?resolution,
                "pool request"
            );
            return Outcome::Respond(resolution.into_response());
        }

        tracing::debug!(method = %req.method, path, "continue");
        Outcome::Continue
    }
}

impl Default for Gatekeeper {
    /// Allow-list and the single keystone-cli redirector under strict grammar.
    fn default() -> Self {
        match Self::from_config(&GateConfig::default()) {
            Ok(gate) => gate,
            Err(_) => Self::new(AllowList::default(), Vec::new()),
        }
    }
}
