//! `.deb` pool requests rewritten into release asset redirects.
//!
//! A redirector serves one package. It takes the last segment of the request
//! path, matches it against `<package>_<version>_<arch>.deb` and points the
//! client at `<origin>/<org>/<package>/releases/download/v<version>/<filename>`.
//! The target is never fetched, so a missing release still redirects.

mod filename;
mod grammar;
mod target;

pub use filename::last_segment;
pub use grammar::VersionGrammar;
pub use target::{ReleaseTarget, DEFAULT_RELEASE_ORIGIN};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::response::{GateResponse, UNRESOLVED_BODY};

/// Architectures published when a package does not list its own.
pub const DEFAULT_ARCHITECTURES: [&str; 2] = ["amd64", "arm64"];

/// Pool component used when a package does not name one.
pub const DEFAULT_COMPONENT: &str = "main";

/// One redirected package (`[[packages]]` entry in `config.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Debian package name, also the release repository name.
    pub name: String,
    /// Owner of the release repository.
    pub org: String,
    #[serde(default = "default_component")]
    pub component: String,
    #[serde(default = "default_architectures")]
    pub architectures: Vec<String>,
    #[serde(default = "default_release_origin")]
    pub release_origin: String,
}

fn default_component() -> String {
    DEFAULT_COMPONENT.to_string()
}

fn default_architectures() -> Vec<String> {
    DEFAULT_ARCHITECTURES.iter().map(|s| s.to_string()).collect()
}

fn default_release_origin() -> String {
    DEFAULT_RELEASE_ORIGIN.to_string()
}

impl PackageSpec {
    pub fn new(name: &str, org: &str) -> Self {
        Self {
            name: name.to_string(),
            org: org.to_string(),
            component: default_component(),
            architectures: default_architectures(),
            release_origin: default_release_origin(),
        }
    }

    /// `/pool/<component>/<initial>/<name>`, where `<initial>` is the first
    /// letter of the name, or `lib` plus the next letter for `lib*` packages.
    pub fn pool_dir(&self) -> String {
        let initial: String = if self.name.starts_with("lib") && self.name.len() > 3 {
            self.name.chars().take(4).collect()
        } else {
            self.name.chars().take(1).collect()
        };
        format!("/pool/{}/{}/{}", self.component, initial, self.name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let field = |field: &'static str, value: &str| ConfigError::InvalidField {
            package: self.name.clone(),
            field,
            value: value.to_string(),
        };

        let name_ok = !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-.".contains(c));
        if !name_ok {
            return Err(field("name", &self.name));
        }
        let org_ok = !self.org.is_empty()
            && self
                .org
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c));
        if !org_ok {
            return Err(field("org", &self.org));
        }
        let component_ok = !self.component.is_empty()
            && self
                .component
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c));
        if !component_ok {
            return Err(field("component", &self.component));
        }
        if self.architectures.is_empty() {
            return Err(field("architectures", ""));
        }
        for arch in &self.architectures {
            if arch.is_empty() || !arch.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(field("architectures", arch));
            }
        }
        Ok(())
    }
}

/// Result of resolving one pool path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect(String),
    NotFound,
}

impl Resolution {
    /// `302` with `Location`, or plain-text `404 Not found`.
    pub fn into_response(self) -> GateResponse {
        match self {
            Resolution::Redirect(url) => GateResponse::redirect(&url),
            Resolution::NotFound => GateResponse::not_found(UNRESOLVED_BODY),
        }
    }
}

/// Resolves pool filenames of one package into release asset URLs.
#[derive(Debug, Clone)]
pub struct ArtifactRedirector {
    package: String,
    pool_dir: String,
    grammar: VersionGrammar,
    pattern: Regex,
    target: ReleaseTarget,
}

impl ArtifactRedirector {
    pub fn new(spec: &PackageSpec, grammar: VersionGrammar) -> Result<Self, ConfigError> {
        spec.validate()?;
        let target = ReleaseTarget::new(&spec.release_origin, &spec.org, &spec.name)?;

        let archs = spec
            .architectures
            .iter()
            .map(|a| regex::escape(a))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(
            r"^{}_({})_({})\.deb$",
            regex::escape(&spec.name),
            grammar.pattern(),
            archs
        );
        let pattern = Regex::new(&source).map_err(|e| ConfigError::Pattern {
            package: spec.name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            package: spec.name.clone(),
            pool_dir: spec.pool_dir(),
            grammar,
            pattern,
            target,
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn pool_dir(&self) -> &str {
        &self.pool_dir
    }

    pub fn grammar(&self) -> VersionGrammar {
        self.grammar
    }

    /// True for the pool directory itself and anything below it.
    pub fn handles(&self, path: &str) -> bool {
        match path.strip_prefix(self.pool_dir.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Resolves the artifact named by the last segment of `path`.
    pub fn resolve(&self, path: &str) -> Resolution {
        let filename = last_segment(path);
        let Some(caps) = self.pattern.captures(filename) else {
            tracing::debug!(package = %self.package, filename, "artifact filename did not match");
            return Resolution::NotFound;
        };

        let version = &caps[1];
        let arch = &caps[2];
        if !self.grammar.token_is_safe(version) {
            tracing::debug!(package = %self.package, version, "refusing unsafe version token");
            return Resolution::NotFound;
        }

        let url = self.target.url_for(version, filename);
        tracing::debug!(package = %self.package, version, arch, url = %url, "resolved artifact");
        Resolution::Redirect(url)
    }
}
