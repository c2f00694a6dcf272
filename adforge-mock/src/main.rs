//! AdForge stub creative service binary

use adforge_mock::config::MockConfig;
use adforge_mock::state::MockState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adforge_mock=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MockConfig::from_env();
    tracing::info!(
        "Starting stub creative service (pending polls: {}, batch size: {})",
        config.pending_polls,
        config.batch_size
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    adforge_mock::serve(listener, MockState::new(config)).await
}
