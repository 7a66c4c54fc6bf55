//! Release asset URL construction.

use crate::config::ConfigError;

/// Default host of the release assets.
pub const DEFAULT_RELEASE_ORIGIN: &str = "https://github.com";

/// Where a package's release assets live: `<origin>/<org>/<package>/releases/download/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    base: String,
}

impl ReleaseTarget {
    /// Validates `origin` and fixes the download base for `org`/`package`.
    ///
    /// `origin` must be an absolute `http`/`https` URL with a host and no
    /// path, query or fragment.
    pub fn new(origin: &str, org: &str, package: &str) -> Result<Self, ConfigError> {
        let parsed = url::Url::parse(origin).map_err(|e| ConfigError::InvalidOrigin {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;

        let invalid = |reason: &str| ConfigError::InvalidOrigin {
            origin: origin.to_string(),
            reason: reason.to_string(),
        };
        if !matches!(parsed.scheme(), "https" | "http") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("origin must not carry a path, query or fragment"));
        }

        let origin = parsed.as_str().trim_end_matches('/');
        Ok(Self {
            base: format!("{origin}/{org}/{package}/releases/download/"),
        })
    }

    /// `<base>v<version>/<filename>`, both substituted verbatim.
    pub fn url_for(&self, version: &str, filename: &str) -> String {
        format!("{}v{}/{}", self.base, version, filename)
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}
