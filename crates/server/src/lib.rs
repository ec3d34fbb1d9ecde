pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

use crate::{
    router::create_router,
    state::{build_app_state, AppState},
};
use climate_qa::config::{get_config, AppConfig, SessionsConfig};
use std::{env, net::SocketAddr};
use tokio::{net::TcpListener, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

/// Configures and runs the web server.
///
/// This function initializes the application state, creates the router,
/// and starts the Axum server.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    debug!(?config, "Server configuration loaded");

    let app_state = build_app_state(&config)?;
    let sweeper = spawn_idle_sweep(app_state.clone(), &config.sessions);
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    let served = axum::serve(listener, app).await;
    sweeper.abort();
    served?;

    Ok(())
}

/// Periodically ends sessions that have been idle past the configured timeout.
pub fn spawn_idle_sweep(app_state: AppState, config: &SessionsConfig) -> JoinHandle<()> {
    let idle_timeout = config.idle_timeout();
    let mut ticker = tokio::time::interval(config.sweep_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::spawn(async move {
        loop {
            ticker.tick().await;
            let expired = app_state.expire_idle(idle_timeout).await;
            if !expired.is_empty() {
                info!(count = expired.len(), "Expired idle sessions");
            }
        }
    })
}

/// The library's main entry point.
///
/// Sets up logging, configuration, and the TCP listener, then calls `run`.
/// `CONFIG_PATH` points at a configuration file other than the default one.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = env::var("CONFIG_PATH").ok();
    let config = get_config(config_path.as_deref())?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    run(listener, config).await
}
