/**
 * Gamechat Server Entry Point
 *
 * Loads `.env`, initializes tracing, reads the layered configuration and
 * serves the HTTP and socket endpoints.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use gamechat::backend::server::{config::ServerConfig, create_app};

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    // Initialize tracing, INFO by default
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = ServerConfig::load()?;
    let addr = config.socket_addr()?;
    let websocket_path = config.websocket_path.clone();

    // Create the Axum app
    let app = create_app(config);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[STARTUP] Listening on {} (socket endpoint {})", addr, websocket_path);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin gamechat-server --features ssr");
    std::process::exit(1);
}
