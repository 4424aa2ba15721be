//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use speadwear::outbound::persistence::DbPool;
use speadwear::outbound::security::DEFAULT_TTL_HOURS;
use speadwear::outbound::storage::DEFAULT_MAX_UPLOAD_BYTES;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) jwt_ttl_hours: i64,
    pub(crate) upload_path: PathBuf,
    pub(crate) max_upload_bytes: usize,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration keeping data in memory and pictures under
    /// `upload_path`.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        jwt_secret: Zeroizing<Vec<u8>>,
        upload_path: PathBuf,
    ) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            jwt_ttl_hours: DEFAULT_TTL_HOURS,
            upload_path,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; every repository then uses the
    /// Diesel adapters instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_jwt_ttl_hours(mut self, hours: i64) -> Self {
        self.jwt_ttl_hours = hours;
        self
    }

    #[must_use]
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
