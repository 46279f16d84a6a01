use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::logs::config::LogsConfig;

use super::authn::config::AuthnConfig;
use super::authz::config::AuthzConfig;
use super::db::config::DbConfig;
use super::router::ApiVersion;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_bind")]
    pub bind: String,

    #[serde(default = "ServerConfig::default_ssl")]
    pub ssl: bool,

    #[serde(default = "ServerConfig::default_cert_path")]
    pub cert_path: String,

    #[serde(default = "ServerConfig::default_key_path")]
    pub key_path: String,

    #[serde(default = "ServerConfig::default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    #[serde(default = "ServerConfig::default_workers")]
    pub workers: u64,

    #[serde(default = "ServerConfig::default_payload_limit_mib")]
    pub payload_limit_mib: usize,

    /// Versions accepted in `/api/v{version}/...`.
    #[serde(default = "ServerConfig::default_api_versions")]
    pub api_versions: Vec<ApiVersion>,

    /// Version assumed for paths without a version segment.
    #[serde(default = "ServerConfig::default_api_version")]
    pub default_api_version: ApiVersion,

    #[serde(default = "AuthnConfig::default")]
    pub authn: AuthnConfig,

    #[serde(default = "AuthzConfig::default")]
    pub authz: AuthzConfig,

    #[serde(default = "DbConfig::default")]
    pub db: DbConfig,

    #[serde(default = "LogsConfig::default")]
    pub logs: LogsConfig,
}

impl CommonConfig for ServerConfig {
    fn default() -> Self {
        Self {
            bind: Self::default_bind(),
            ssl: Self::default_ssl(),
            cert_path: Self::default_cert_path(),
            key_path: Self::default_key_path(),
            keep_alive_secs: Self::default_keep_alive_secs(),
            workers: Self::default_workers(),
            payload_limit_mib: Self::default_payload_limit_mib(),
            api_versions: Self::default_api_versions(),
            default_api_version: Self::default_api_version(),
            authn: AuthnConfig::default(),
            authz: AuthzConfig::default(),
            db: DbConfig::default(),
            logs: LogsConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.bind = expandenv("bind", &self.bind)?;
        if self.bind.is_empty() {
            bail!("bind cannot be empty");
        }

        self.cert_path = expandenv("cert_path", &self.cert_path)?;
        if self.cert_path.is_empty() {
            let path = ps.pki_path.join("server.crt");
            self.cert_path = format!("{}", path.display());
        }

        self.key_path = expandenv("key_path", &self.key_path)?;
        if self.key_path.is_empty() {
            let path = ps.pki_path.join("server.key");
            self.key_path = format!("{}", path.display());
        }

        if self.payload_limit_mib < Self::MIN_PAYLOAD_LIMIT_MIB {
            bail!(
                "payload_limit_mib must be greater than or equal to {}",
                Self::MIN_PAYLOAD_LIMIT_MIB
            );
        }
        if self.payload_limit_mib > Self::MAX_PAYLOAD_LIMIT_MIB {
            bail!(
                "payload_limit_mib must be less than or equal to {}",
                Self::MAX_PAYLOAD_LIMIT_MIB
            );
        }

        if self.api_versions.is_empty() {
            bail!("api_versions cannot be empty");
        }
        self.api_versions.sort();
        self.api_versions.dedup();
        if !self.api_versions.contains(&self.default_api_version) {
            bail!(
                "default_api_version {} is not in api_versions",
                self.default_api_version
            );
        }

        self.authn.complete(ps).context("authn")?;
        self.authz.complete(ps).context("authz")?;
        self.db.complete(ps).context("db")?;
        self.logs.complete(ps).context("logs")?;

        Ok(())
    }
}

impl ServerConfig {
    const MAX_PAYLOAD_LIMIT_MIB: usize = 10;
    const MIN_PAYLOAD_LIMIT_MIB: usize = 1;

    pub fn default_bind() -> String {
        String::from("127.0.0.1:5000")
    }

    pub fn default_ssl() -> bool {
        false
    }

    pub fn default_cert_path() -> String {
        String::new()
    }

    pub fn default_key_path() -> String {
        String::new()
    }

    pub fn default_keep_alive_secs() -> u64 {
        0
    }

    pub fn default_workers() -> u64 {
        0
    }

    pub fn default_payload_limit_mib() -> usize {
        1
    }

    pub fn default_api_versions() -> Vec<ApiVersion> {
        vec![ApiVersion::default()]
    }

    pub fn default_api_version() -> ApiVersion {
        ApiVersion::default()
    }
}

#[cfg(test)]
mod tests {
    use crate::server::db::config::DbType;

    use super::*;

    fn complete(toml_str: &str) -> Result<ServerConfig> {
        let ps = PathSet::new_test("server_config");
        let mut cfg: ServerConfig = toml::from_str(toml_str)?;
        cfg.complete(&ps)?;
        Ok(cfg)
    }

    #[test]
    fn test_complete() {
        let ps = PathSet::new_test("server_config");
        let cfg = complete("").unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:5000");
        assert_eq!(cfg.api_versions, vec![ApiVersion::new(1, 0)]);
        assert_eq!(cfg.default_api_version, ApiVersion::new(1, 0));
        assert_eq!(cfg.payload_limit_mib, 1);
        assert_eq!(
            cfg.cert_path,
            format!("{}", ps.pki_path.join("server.crt").display())
        );
        assert_eq!(cfg.db.name, DbType::Sqlite);
        assert!(!cfg.authn.allow_anonymous);

        let cfg = complete(
            r#"
bind = "0.0.0.0:8080"
api_versions = ["2", "v1.0", "1"]
default_api_version = "2.0"

[authn]
allow_anonymous = true

[db]
name = "transient"
"#,
        )
        .unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8080");
        assert_eq!(
            cfg.api_versions,
            vec![ApiVersion::new(1, 0), ApiVersion::new(2, 0)]
        );
        assert_eq!(cfg.default_api_version, ApiVersion::new(2, 0));
        assert!(cfg.authn.allow_anonymous);
        assert_eq!(cfg.db.name, DbType::Transient);

        assert!(complete("payload_limit_mib = 0\n").is_err());
        assert!(complete("payload_limit_mib = 11\n").is_err());
        assert!(complete("api_versions = []\n").is_err());
        assert!(complete("default_api_version = \"3.0\"\n").is_err());
        assert!(complete("default_api_version = \"three\"\n").is_err());
        assert!(complete("bind = \"\"\n").is_err());
    }
}
