// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::info;

use rolegate_server::{
    api::router,
    auth::AuthService,
    config::Config,
    state::AppState,
    store::InMemoryCredentialStore,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("Invalid configuration");
    init_tracing(config.server.log_format);

    info!(auth = ?config.auth, "Loaded configuration");

    // Seed accounts are hashed at the configured cost before serving.
    let store = InMemoryCredentialStore::with_default_accounts(config.auth.bcrypt_cost)
        .expect("Failed to seed credential store");
    let auth = AuthService::new(&config.auth, Arc::new(store))
        .expect("Failed to initialize authentication service");

    let state = AppState::new(Arc::new(auth), config.auth.rejection_logging);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    info!(%addr, "Rolegate server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .expect("HTTP server failed");

    info!("Server shutdown complete");
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    use tokio::signal;

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
