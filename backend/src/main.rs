//! Explorer entry-point: loads settings, wires storage, and serves the API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use explorer::inbound::http::health::HealthState;
use ortho_config::OrthoConfig;
use server::{ServerSettings, Storage, build_http_state, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let discovery = settings
        .discovery_settings()
        .map_err(std::io::Error::other)?;
    let storage = match settings.pool_config() {
        Some(config) => Storage::Postgres(config),
        None => Storage::Memory {
            seed_example_data: settings.seed_example_data,
        },
    };

    let http_state = build_http_state(storage, discovery)
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, bind_addr)?;
    info!(%bind_addr, "explorer listening");
    server.await
}
