use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let http_port = std::env::var("DASHGATE_HTTP_PORT").unwrap_or_else(|_| "8088".to_string());
    let api_url = std::env::var("DASHGATE_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let ttl = std::env::var("DASHGATE_SESSION_TTL_SECS").unwrap_or_else(|_| "86400".to_string());
    info!(
        target: "dashgate",
        "dashgate starting: RUST_LOG='{}', http_port={}, api_url='{}', session_ttl_secs={}",
        rust_log, http_port, api_url, ttl
    );

    dashgate::server::run().await
}
