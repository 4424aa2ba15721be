//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `SPEADWEAR_*` environment variables, an optional
//! configuration file and command-line flags, in increasing precedence.
//! Every field is optional; the accessors below supply the defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::outbound::security::DEFAULT_TTL_HOURS;
use crate::outbound::storage::DEFAULT_MAX_UPLOAD_BYTES;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_PATH: &str = "uploads";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// Runtime settings for the API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SPEADWEAR")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it the process keeps all data
    /// in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// HMAC secret used to sign bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in hours.
    pub jwt_ttl_hours: Option<i64>,
    /// Directory receiving uploaded pictures.
    pub upload_path: Option<PathBuf>,
    /// Largest accepted picture, in bytes.
    pub max_upload_bytes: Option<usize>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim().parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::BindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Connection string, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections {
            Some(0) => Err(SettingsError::NotPositive {
                field: "db_max_connections",
            }),
            Some(max) => Ok(max),
            None => Ok(DEFAULT_DB_MAX_CONNECTIONS),
        }
    }

    /// Token signing secret, if one was configured.
    ///
    /// The copy is wiped on drop; callers decide how to handle absence.
    pub fn jwt_secret(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Zeroizing::new(secret.as_bytes().to_vec()))
    }

    pub fn jwt_ttl_hours(&self) -> Result<i64, SettingsError> {
        match self.jwt_ttl_hours {
            Some(hours) if hours <= 0 => Err(SettingsError::NotPositive {
                field: "jwt_ttl_hours",
            }),
            Some(hours) => Ok(hours),
            None => Ok(DEFAULT_TTL_HOURS),
        }
    }

    pub fn upload_path(&self) -> PathBuf {
        self.upload_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_PATH))
    }

    pub fn max_upload_bytes(&self) -> Result<usize, SettingsError> {
        match self.max_upload_bytes {
            Some(0) => Err(SettingsError::NotPositive {
                field: "max_upload_bytes",
            }),
            Some(bytes) => Ok(bytes),
            None => Ok(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "SPEADWEAR_BIND_ADDR",
        "SPEADWEAR_DATABASE_URL",
        "SPEADWEAR_DB_MAX_CONNECTIONS",
        "SPEADWEAR_JWT_SECRET",
        "SPEADWEAR_JWT_TTL_HOURS",
        "SPEADWEAR_UPLOAD_PATH",
        "SPEADWEAR_MAX_UPLOAD_BYTES",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("speadwear")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().map(|addr| addr.port()),
            Ok(8080)
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), Ok(10));
        assert!(settings.jwt_secret().is_none());
        assert_eq!(settings.jwt_ttl_hours(), Ok(24));
        assert_eq!(settings.upload_path(), PathBuf::from("uploads"));
        assert_eq!(settings.max_upload_bytes(), Ok(10 * 1024 * 1024));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.extend([
            ("SPEADWEAR_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "SPEADWEAR_DATABASE_URL",
                Some("postgres://localhost/speadwear".to_owned()),
            ),
            ("SPEADWEAR_JWT_SECRET", Some("s3cret".to_owned())),
            ("SPEADWEAR_JWT_TTL_HOURS", Some("2".to_owned())),
            ("SPEADWEAR_UPLOAD_PATH", Some("/srv/pictures".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().map(|addr| addr.to_string()),
            Ok("127.0.0.1:9000".to_owned())
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/speadwear")
        );
        assert_eq!(
            settings.jwt_secret().as_deref().map(Vec::as_slice),
            Some(b"s3cret".as_slice())
        );
        assert_eq!(settings.jwt_ttl_hours(), Ok(2));
        assert_eq!(settings.upload_path(), PathBuf::from("/srv/pictures"));
    }

    #[rstest]
    #[case("SPEADWEAR_BIND_ADDR", "not-an-address")]
    #[case("SPEADWEAR_JWT_TTL_HOURS", "0")]
    #[case("SPEADWEAR_MAX_UPLOAD_BYTES", "0")]
    #[case("SPEADWEAR_DB_MAX_CONNECTIONS", "0")]
    fn out_of_range_values_are_rejected(#[case] var: &'static str, #[case] value: &str) {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != var);
        vars.push((var, Some(value.to_owned())));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        let failures = [
            settings.bind_addr().err(),
            settings.jwt_ttl_hours().err(),
            settings.max_upload_bytes().err(),
            settings.db_max_connections().err(),
        ];
        assert_eq!(failures.iter().flatten().count(), 1);
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != "SPEADWEAR_DATABASE_URL");
        vars.push(("SPEADWEAR_DATABASE_URL", Some("  ".to_owned())));
        let _guard = lock_env(vars);

        assert!(load_from_empty_args().database_url().is_none());
    }
}
