use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{PackageSpec, VersionGrammar};
use crate::path_gate::AllowConfig;

/// Invalid values in an otherwise well-formed config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid release origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },
    #[error("package {package:?}: invalid {field} {value:?}")]
    InvalidField {
        package: String,
        field: &'static str,
        value: String,
    },
    #[error("package {package:?}: artifact pattern failed to compile: {reason}")]
    Pattern { package: String, reason: String },
    #[error("empty allow rule")]
    EmptyAllowRule,
    #[error("allow rule {0:?} must start with '/'")]
    RelativeAllowRule(String),
    #[error("package {0:?} is configured more than once")]
    DuplicatePackage(String),
}

/// Global configuration loaded from `~/.config/aptgate/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Socket address the HTTP host binds to.
    pub listen: String,
    /// Directory served for allowed, non-redirected paths.
    pub site_root: PathBuf,
    /// Version grammar for artifact filenames: "strict" (default) or "permissive".
    #[serde(default)]
    pub version_grammar: VersionGrammar,
    #[serde(default)]
    pub allow: AllowConfig,
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            site_root: PathBuf::from("."),
            version_grammar: VersionGrammar::default(),
            allow: AllowConfig::default(),
            packages: vec![PackageSpec::new("keystone-cli", "knight-owl-dev")],
        }
    }
}

impl GateConfig {
    /// Checks the parts that serde cannot: allow rules and package uniqueness.
    /// Package fields themselves are validated when redirectors are built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rule in self.allow.exact.iter().chain(&self.allow.prefixes) {
            if rule.is_empty() {
                return Err(ConfigError::EmptyAllowRule);
            }
            if !rule.starts_with('/') {
                return Err(ConfigError::RelativeAllowRule(rule.clone()));
            }
        }
        for (i, pkg) in self.packages.iter().enumerate() {
            if self.packages[..i].iter().any(|p| p.name == pkg.name) {
                return Err(ConfigError::DuplicatePackage(pkg.name.clone()));
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("aptgate")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GateConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GateConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from(path: &Path) -> Result<GateConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: GateConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = GateConfig::default();
        assert_eq!(cfg.listen, "127.0.0.1:8080");
        assert_eq!(cfg.version_grammar, VersionGrammar::Strict);
        assert_eq!(cfg.allow.exact, vec!["/", "/index.html", "/PUBLIC.KEY"]);
        assert_eq!(cfg.allow.prefixes, vec!["/dists", "/pool/"]);
        assert_eq!(cfg.packages.len(), 1);
        assert_eq!(cfg.packages[0].name, "keystone-cli");
        assert_eq!(cfg.packages[0].org, "knight-owl-dev");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = GateConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GateConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.listen, cfg.listen);
        assert_eq!(parsed.site_root, cfg.site_root);
        assert_eq!(parsed.allow, cfg.allow);
        assert_eq!(parsed.packages, cfg.packages);
    }

    #[test]
    fn config_toml_minimal_uses_defaults() {
        let toml = r#"
            listen = "0.0.0.0:80"
            site_root = "/srv/apt"

            [[packages]]
            name = "tool"
            org = "acme"
        "#;
        let cfg: GateConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.version_grammar, VersionGrammar::Strict);
        assert_eq!(cfg.allow, AllowConfig::default());
        let pkg = &cfg.packages[0];
        assert_eq!(pkg.component, "main");
        assert_eq!(pkg.architectures, vec!["amd64", "arm64"]);
        assert_eq!(pkg.release_origin, "https://github.com");
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            listen = "127.0.0.1:9000"
            site_root = "public"
            version_grammar = "permissive"

            [allow]
            exact = ["/KEY.gpg"]
            prefixes = ["/debian/"]

            [[packages]]
            name = "tool"
            org = "acme"
            component = "contrib"
            architectures = ["riscv64"]
            release_origin = "https://mirror.example.com"
        "#;
        let cfg: GateConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.version_grammar, VersionGrammar::Permissive);
        assert_eq!(cfg.allow.exact, vec!["/KEY.gpg"]);
        assert_eq!(cfg.allow.prefixes, vec!["/debian/"]);
        assert_eq!(cfg.packages[0].component, "contrib");
        assert_eq!(cfg.packages[0].architectures, vec!["riscv64"]);
    }

    #[test]
    fn validate_rejects_bad_rules_and_duplicates() {
        let mut cfg = GateConfig::default();
        cfg.allow.prefixes.push("dists".to_string());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RelativeAllowRule(r)) if r == "dists"
        ));

        let mut cfg = GateConfig::default();
        cfg.allow.exact.push(String::new());
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyAllowRule)));

        let mut cfg = GateConfig::default();
        cfg.packages.push(cfg.packages[0].clone());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DuplicatePackage(n)) if n == "keystone-cli"
        ));
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"
            listen = "127.0.0.1:0"
            site_root = "/tmp"
            "#
        )
        .unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:0");
        assert!(cfg.packages.is_empty());
    }

    #[test]
    fn load_from_reports_path() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "listen = ").unwrap();
        let err = load_from(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parse config"));

        let err = load_from(Path::new("/nonexistent/aptgate.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("read config"));
    }
}
