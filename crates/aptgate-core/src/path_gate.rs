//! Allow-list classification of request paths.
//!
//! Only the public APT surface (landing page, signing key, `dists/` and
//! `pool/`) is served. Anything else colocated with the repository tree is
//! blocked, so unlisted paths fail closed.

use serde::{Deserialize, Serialize};

use crate::response::{GateResponse, BLOCKED_BODY};

/// Exact paths allowed by default.
pub const DEFAULT_EXACT: [&str; 3] = ["/", "/index.html", "/PUBLIC.KEY"];

/// Path prefixes allowed by default.
pub const DEFAULT_PREFIXES: [&str; 2] = ["/dists", "/pool/"];

/// A single allow rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowRule {
    /// String equality with the whole path.
    Exact(String),
    /// Ordinal starts-with on the path, ending on a segment boundary.
    ///
    /// A prefix without a trailing `/` (such as `/dists`) matches the path
    /// itself and anything below it, never a sibling like `/distsx`.
    Prefix(String),
}

impl AllowRule {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            AllowRule::Exact(p) => path == p,
            AllowRule::Prefix(p) => match path.strip_prefix(p.as_str()) {
                Some(rest) => p.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// Outcome of classifying a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Block,
}

impl Verdict {
    /// Response for a blocked request, `None` when the request should continue.
    pub fn response(self) -> Option<GateResponse> {
        match self {
            Verdict::Allow => None,
            Verdict::Block => Some(GateResponse::not_found(BLOCKED_BODY)),
        }
    }
}

/// Allow-list as it appears in `config.toml` (`[allow]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowConfig {
    #[serde(default)]
    pub exact: Vec<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
}

impl Default for AllowConfig {
    fn default() -> Self {
        Self {
            exact: DEFAULT_EXACT.iter().map(|s| s.to_string()).collect(),
            prefixes: DEFAULT_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable table of allow rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    rules: Vec<AllowRule>,
}

impl AllowList {
    pub fn new(rules: Vec<AllowRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(cfg: &AllowConfig) -> Self {
        let exact = cfg.exact.iter().cloned().map(AllowRule::Exact);
        let prefixes = cfg.prefixes.iter().cloned().map(AllowRule::Prefix);
        Self::new(exact.chain(prefixes).collect())
    }

    pub fn rules(&self) -> &[AllowRule] {
        &self.rules
    }

    /// Classifies `path` (query and fragment already stripped by the host).
    pub fn classify(&self, path: &str) -> Verdict {
        if self.rules.iter().any(|r| r.matches(path)) {
            Verdict::Allow
        } else {
            Verdict::Block
        }
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::from_config(&AllowConfig::default())
    }
}
