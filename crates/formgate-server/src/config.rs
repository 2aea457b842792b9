use anyhow::Context;
use formgate_core::HoneypotPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    /// Path serving the contact page (GET) and receiving submissions (POST).
    pub route: String,
    /// Contact schema file; the embedded schema is used when unset.
    pub schema: Option<PathBuf>,
    pub honeypot: HoneypotPolicy,
    pub max_body_bytes: usize,
    pub delivery_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            route: "/contact-me".to_string(),
            schema: None,
            honeypot: HoneypotPolicy::default(),
            max_body_bytes: 64 * 1024,
            delivery_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut cfg: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        if let Some(schema) = cfg.schema.as_mut() {
            if schema.is_relative() {
                if let Some(dir) = path.parent() {
                    *schema = dir.join(&*schema);
                }
            }
        }
        Ok(cfg)
    }

    /// Defaults overlaid with `FORMGATE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    pub fn with_env(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Overlay values from `lookup`. Unparseable values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("FORMGATE_BIND") {
            self.bind = v;
        }
        if let Some(v) = lookup("FORMGATE_ROUTE") {
            self.route = v;
        }
        if let Some(v) = lookup("FORMGATE_SCHEMA") {
            self.schema = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("FORMGATE_HONEYPOT") {
            self.honeypot.enabled = !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }
        if let Some(v) = lookup("FORMGATE_HONEYPOT_FIELD") {
            self.honeypot.field = v;
        }
        if let Some(v) = lookup("FORMGATE_MAX_BODY_BYTES") {
            match v.trim().parse::<usize>() {
                Ok(n) => self.max_body_bytes = n,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid FORMGATE_MAX_BODY_BYTES"),
            }
        }
        if let Some(v) = lookup("FORMGATE_DELIVERY_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(n) => self.delivery_timeout_secs = n,
                Err(_) => {
                    tracing::warn!(value = %v, "ignoring invalid FORMGATE_DELIVERY_TIMEOUT_SECS")
                }
            }
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.route.starts_with('/') {
            anyhow::bail!("route must start with '/', got {:?}", self.route);
        }
        if self.route == "/healthz" {
            anyhow::bail!("route /healthz is reserved");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("max_body_bytes must be greater than zero");
        }
        if self.delivery_timeout_secs == 0 {
            anyhow::bail!("delivery_timeout_secs must be greater than zero");
        }
        if self.honeypot.enabled && self.honeypot.field.trim().is_empty() {
            anyhow::bail!("honeypot field name must not be empty");
        }
        Ok(())
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = ServerConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.route, "/contact-me");
        assert!(cfg.honeypot.enabled);
        assert_eq!(cfg.honeypot.field, "password");
        assert_eq!(cfg.delivery_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = ServerConfig::default().with_overrides(lookup(&[
            ("FORMGATE_BIND", "0.0.0.0:9000"),
            ("FORMGATE_HONEYPOT", "off"),
            ("FORMGATE_HONEYPOT_FIELD", "website"),
            ("FORMGATE_MAX_BODY_BYTES", "1024"),
        ]));
        assert_eq!(cfg.bind, "0.0.0.0:9000");
        assert!(!cfg.honeypot.enabled);
        assert_eq!(cfg.honeypot.field, "website");
        assert_eq!(cfg.max_body_bytes, 1024);
    }

    #[test]
    fn invalid_numbers_are_ignored() {
        let cfg = ServerConfig::default().with_overrides(lookup(&[
            ("FORMGATE_MAX_BODY_BYTES", "lots"),
            ("FORMGATE_DELIVERY_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(cfg.max_body_bytes, 64 * 1024);
        assert_eq!(cfg.delivery_timeout_secs, 10);
    }

    #[test]
    fn validate_rejects_bad_route() {
        let cfg = ServerConfig {
            route: "contact".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn file_resolves_schema_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formgate.yaml");
        std::fs::write(
            &path,
            "route: /contact\nschema: contact.yaml\nhoneypot:\n  field: website\n",
        )
        .unwrap();
        let cfg = ServerConfig::from_file(&path).unwrap();
        assert_eq!(cfg.route, "/contact");
        assert_eq!(cfg.schema, Some(dir.path().join("contact.yaml")));
        assert_eq!(cfg.honeypot.field, "website");
        assert!(cfg.honeypot.enabled);
    }
}
