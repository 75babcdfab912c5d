//! Server startup and shutdown
//!
//! Wires the registry, store and auth provider into the router, runs the
//! listener, and coordinates graceful shutdown: on SIGINT/SIGTERM the
//! listener stops accepting, in-flight handlers get a bounded grace
//! period, and the cache advance tasks are stopped.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use beacon_api::{AppState, build_router};
use beacon_auth::{AdminAuth, JwksConfig, JwksProvider, LocalHsProvider};
use beacon_registry::AppRegistry;
use beacon_store::EventStore;

use crate::config::{AuthConfig, Config};

/// How long in-flight handlers may run after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub async fn run(config: Config) -> Result<()> {
    let registry = AppRegistry::open(&config.server.registry_path)
        .context("failed to open application registry")?;
    let store = EventStore::new(&config.server.data_dir);

    info!(
        registry_path = %config.server.registry_path.display(),
        data_dir = %config.server.data_dir.display(),
        apps = registry.list().len(),
        "registry loaded"
    );

    registry.warm_up(&store);

    let auth = build_auth_provider(&config.auth)?;
    let state = AppState::new(registry, store, auth);
    let registry = Arc::clone(&state.registry);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, "server listening");

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let shutdown = {
        let cancel = cancel.clone();
        async move { cancel.cancelled().await }
    };
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown);

    let mut server_task = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server_task => {
            result.context("server task failed")?.context("server error")?;
        }
        _ = cancel.cancelled() => {
            info!("shutdown signal received, draining in-flight requests");
            registry.stop_caches();

            match tokio::time::timeout(SHUTDOWN_GRACE, server_task).await {
                Ok(result) => {
                    result.context("server task failed")?.context("server error")?;
                }
                Err(_) => {
                    warn!(
                        grace_secs = SHUTDOWN_GRACE.as_secs(),
                        "grace period expired before all handlers finished"
                    );
                }
            }
        }
    }

    info!("server stopped");
    Ok(())
}

/// Pick the admin auth provider from config.
fn build_auth_provider(auth: &AuthConfig) -> Result<Arc<dyn AdminAuth>> {
    if let Some(ref jwks_url) = auth.jwks_url {
        info!(jwks_url = %jwks_url, "admin auth: remote JWKS");
        return Ok(Arc::new(JwksProvider::new(JwksConfig {
            jwks_url: jwks_url.clone(),
            issuer: auth.issuer.clone(),
            audience: auth.audience.clone(),
        })));
    }

    let secret: Vec<u8> = match auth.local_secret {
        Some(ref secret) => {
            anyhow::ensure!(
                secret.len() >= 32,
                "auth.local_secret must be at least 32 bytes"
            );
            info!("admin auth: local shared secret");
            secret.as_bytes().to_vec()
        }
        None => {
            warn!(
                "no admin auth configured, generating a random secret; \
                 admin endpoints will reject all tokens"
            );
            let secret: [u8; 32] = rand::random();
            secret.to_vec()
        }
    };

    Ok(Arc::new(LocalHsProvider::new(&secret)))
}

/// Cancel the token on SIGINT or SIGTERM.
fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            signal::ctrl_c().await.ok();
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(_) => std::future::pending().await,
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        cancel.cancel();
    });
}
