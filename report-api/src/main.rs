//! Development backend for the incident report mini-app

use report_api::{router, AppState, SUBMIT_PATH};
use std::{env, net::SocketAddr};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Load environment variables first so .env RUST_LOG is available to tracing
    dotenvy::dotenv().ok();

    // Initialize tracing with RUST_LOG environment variable support
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();

    let api_port = env::var("API_PORT")
        .unwrap_or_else(|_| "4001".to_string())
        .parse::<u16>()
        .expect("API_PORT must be a valid port number");
    let api_secret =
        env::var("API_SECRET").expect("API_SECRET environment variable not set");
    if api_secret.is_empty() {
        panic!("API_SECRET must not be empty");
    }

    let app = router(AppState::new(api_secret));

    let addr = SocketAddr::from(([0, 0, 0, 0], api_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to port");

    info!("Report backend running on {} (POST {})", addr, SUBMIT_PATH);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
