//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use server::{ServerConfig, create_server};
use speadwear::inbound::http::health::HealthState;
use speadwear::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use speadwear::settings::AppSettings;

const EPHEMERAL_SECRET_LEN: usize = 32;

fn config_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("invalid configuration: {err}"))
}

/// Signing secret from settings; debug builds fall back to a random one.
fn jwt_secret(settings: &AppSettings) -> std::io::Result<Zeroizing<Vec<u8>>> {
    if let Some(secret) = settings.jwt_secret() {
        return Ok(secret);
    }
    if cfg!(debug_assertions) {
        warn!("SPEADWEAR_JWT_SECRET unset; using an ephemeral secret (dev only)");
        let mut secret = Zeroizing::new(vec![0u8; EPHEMERAL_SECRET_LEN]);
        rand::thread_rng().fill_bytes(&mut secret);
        Ok(secret)
    } else {
        Err(config_error("SPEADWEAR_JWT_SECRET must be set"))
    }
}

async fn server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let config = ServerConfig::new(
        settings.bind_addr().map_err(config_error)?,
        jwt_secret(settings)?,
        settings.upload_path(),
    )
    .with_jwt_ttl_hours(settings.jwt_ttl_hours().map_err(config_error)?)
    .with_max_upload_bytes(settings.max_upload_bytes().map_err(config_error)?);

    let Some(database_url) = settings.database_url() else {
        warn!("SPEADWEAR_DATABASE_URL unset; data is kept in memory and lost on exit");
        return Ok(config);
    };

    run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    let pool_config = PoolConfig::new(database_url)
        .with_max_size(settings.db_max_connections().map_err(config_error)?);
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(config_error)?;
    let config = server_config(&settings).await?;
    info!(bind_addr = %config.bind_addr(), "starting speadwear");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
