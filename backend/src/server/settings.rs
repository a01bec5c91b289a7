//! Server settings loaded via OrthoConfig.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use rfood::outbound::persistence::PoolConfig;
use serde::Deserialize;

/// Errors raised while interpreting [`ServerSettings`].
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Listener, store and CORS settings.
///
/// Every field may come from `RFOOD_*` environment variables, CLI flags or a
/// configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RFOOD")]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[ortho_config(default = "0.0.0.0:5000".to_owned())]
    pub bind_addr: String,
    /// PostgreSQL connection string; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Origins allowed to make credentialed requests; comma-separated in the
    /// environment.
    pub allowed_origins: Option<Vec<String>>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl ServerSettings {
    /// Parse the configured bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ServerConfigError> {
        self.bind_addr
            .trim()
            .parse()
            .map_err(|source| ServerConfigError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Configured origins, trimmed, without empty entries.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .iter()
            .flatten()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Pool settings when a database URL is configured.
    pub fn pool_config(&self) -> Result<Option<PoolConfig>, ServerConfigError> {
        let Some(url) = self.database_url.as_deref().filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };
        let config = PoolConfig::new(url);
        match self.pool_max_size {
            Some(0) => Err(ServerConfigError::EmptyPool),
            Some(max_size) => Ok(Some(config.with_max_size(max_size))),
            None => Ok(Some(config)),
        }
    }
}
