//! Minigame scoreboard binary entrypoint wiring REST, SSE and the roster store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minigame_scoreboard::{
    config::AppConfig,
    dao::{
        roster_store::{RosterStore, memory::MemoryRosterStore},
        storage::StorageError,
    },
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};

const STORE_BACKEND_ENV: &str = "STORE_BACKEND";
const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    spawn_supervisor(app_state.clone(), selected_backend())?;
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

fn selected_backend() -> String {
    let default = if cfg!(feature = "mongo-store") {
        "mongo"
    } else {
        "memory"
    };
    env::var(STORE_BACKEND_ENV)
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_else(|_| default.into())
}

/// Start the storage supervisor for the configured backend.
fn spawn_supervisor(state: SharedState, backend: String) -> anyhow::Result<()> {
    info!(backend = %backend, "selected roster store backend");
    match backend.as_str() {
        #[cfg(feature = "mongo-store")]
        "mongo" | "mongodb" => {
            tokio::spawn(storage_supervisor::run(state, connect_mongo));
        }
        #[cfg(feature = "couch-store")]
        "couch" | "couchdb" => {
            tokio::spawn(storage_supervisor::run(state, connect_couch));
        }
        "memory" => {
            warn!("roster is kept in memory and will be lost on restart");
            let store = MemoryRosterStore::new();
            tokio::spawn(storage_supervisor::run(state, move || {
                let store = store.clone();
                async move { Ok::<_, StorageError>(Arc::new(store) as Arc<dyn RosterStore>) }
            }));
        }
        other => anyhow::bail!("unsupported {STORE_BACKEND_ENV} value `{other}`"),
    }
    Ok(())
}

#[cfg(feature = "mongo-store")]
async fn connect_mongo() -> Result<Arc<dyn RosterStore>, StorageError> {
    use minigame_scoreboard::dao::roster_store::mongodb::{MongoConfig, MongoRosterStore};

    let config = MongoConfig::from_env().await?;
    let store = MongoRosterStore::connect(config).await?;
    Ok(Arc::new(store))
}

#[cfg(feature = "couch-store")]
async fn connect_couch() -> Result<Arc<dyn RosterStore>, StorageError> {
    use minigame_scoreboard::dao::roster_store::couchdb::{CouchConfig, CouchRosterStore};

    let config = CouchConfig::from_env();
    let store = CouchRosterStore::connect(config).await?;
    Ok(Arc::new(store))
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
