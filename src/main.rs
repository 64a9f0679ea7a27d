// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use course_enrollment_server::{
    api::router,
    auth::TokenKeys,
    config::ServerConfig,
    state::AppState,
    storage::CourseDatabase,
    telemetry,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    telemetry::init(config.log_format);

    let db = CourseDatabase::open(&config.database_path).expect("Failed to open course database");
    info!(path = %config.database_path.display(), "Database opened");

    let state = AppState::new(db, TokenKeys::from_secret(&config.token_secret));
    let app = router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");

    info!(%addr, "Course enrollment server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");

    info!("Server stopped");
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
