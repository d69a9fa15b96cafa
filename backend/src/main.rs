//! Step challenge entry-point: loads settings, validates the session key and
//! runs the HTTP server.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use step_challenge::inbound::http::health::HealthState;
use step_challenge::inbound::http::session_config::BuildMode;
use step_challenge::inbound::http::session_config::fingerprint::key_fingerprint;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).context("failed to load settings")?;
    let session = settings
        .session_toggles()
        .into_settings(BuildMode::from_debug_assertions())
        .context("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let bind_addr = settings.bind_addr().context("invalid bind address")?;
    let view_override = settings
        .view_override()
        .context("invalid view-override identity")?;
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        view_override,
    )
    .with_account_settings(settings.account_settings())
    .with_demo_data(settings.seed_demo_data());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await?;
    Ok(())
}
