//! AdForge stub creative service
//!
//! An in-memory stand-in for the creative-generation backend. Jobs start
//! pending and complete after a configurable number of status queries.
//! Used for local runs of the CLI and for black-box tests.

pub mod api;
pub mod config;
pub mod state;

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::MockConfig;
use crate::state::MockState;

/// Serves the stub API on an already-bound listener until the task is dropped
pub async fn serve(listener: TcpListener, state: MockState) -> std::io::Result<()> {
    axum::serve(listener, api::create_router(state)).await
}

/// Starts the stub on an ephemeral localhost port in a background task
///
/// `config.bind_addr` is ignored.
pub async fn spawn_local(config: MockConfig) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState::new(config);

    tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            tracing::error!("Stub service stopped: {}", e);
        }
    });

    Ok(addr)
}
