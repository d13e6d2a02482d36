use groupdash::config::Config;
use groupdash::{AppState, server};
use tracing::info;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groupdash=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    info!(
        groups = config.groups.len(),
        mode = ?config.mode,
        "loaded configuration"
    );

    let addr = config.listen_addr();
    let app = server::router(AppState::new(config));

    info!(%addr, "dashboard is listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    axum::serve(listener, app).await.expect("server error");
}
