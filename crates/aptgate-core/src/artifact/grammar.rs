//! Version token grammars for artifact filenames.

use serde::{Deserialize, Serialize};

/// Which version tokens an artifact filename may carry.
///
/// `Strict` accepts `MAJOR.MINOR.PATCH` with an optional `-prerelease` of
/// alphanumerics and dots. `Permissive` accepts any run of characters that
/// contains no `_`; tokens that are not plain URL path characters are still
/// refused when the redirect is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionGrammar {
    #[default]
    Strict,
    Permissive,
}

impl VersionGrammar {
    /// Regex fragment for the version token (no capture group).
    pub fn pattern(self) -> &'static str {
        match self {
            VersionGrammar::Strict => r"[0-9]+\.[0-9]+\.[0-9]+(?:-[A-Za-z0-9.]+)?",
            VersionGrammar::Permissive => r"[^_]+",
        }
    }

    /// True when every character of `token` may be placed unescaped into a
    /// URL path segment under this grammar.
    pub fn token_is_safe(self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        match self {
            VersionGrammar::Strict => token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'),
            VersionGrammar::Permissive => token.chars().all(is_path_char),
        }
    }
}

/// RFC 3986 `pchar` without percent-encoding: unreserved, sub-delims, `:`, `@`.
fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:@".contains(c)
}
