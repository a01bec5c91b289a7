//! RFood entry point: loads configuration, prepares the document store and
//! serves the HTTP API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rfood::domain::ports::DocumentStore;
use rfood::inbound::http::health::HealthState;
use rfood::inbound::http::session_config::session_settings_from_env;
use rfood::outbound::persistence::{DbPool, DieselDocumentStore};
use server::{ServerConfig, ServerSettings, create_server, drain_on, shutdown_signal};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Build the pool, create the `documents` table and confirm the store answers.
async fn connect_store(settings: &ServerSettings) -> Result<Option<DbPool>> {
    let Some(pool_config) = settings.pool_config()? else {
        return Ok(None);
    };
    let max_size = pool_config.max_size();
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;
    let store = DieselDocumentStore::new(pool.clone());
    store
        .ensure_schema()
        .await
        .wrap_err("failed to prepare documents table")?;
    store.ping().await.wrap_err("document store did not answer")?;
    info!(max_size, "document store ready");
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = ServerSettings::load()
        .map_err(|err| eyre!("failed to load server settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_allowed_origins(settings.allowed_origins());
    if let Some(pool) = connect_store(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, mode = ?session.mode, "RFood listening");

    actix_web::rt::spawn(drain_on(shutdown_signal(), server.handle(), health_state));
    server.await.wrap_err("server stopped with an error")
}
