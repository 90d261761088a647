//! In-process test servers

use gamechat::backend::server::{create_app_with_state, AppState, ServerConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Configuration for tests: loopback, cheap hashing, no pings during a test
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        bcrypt_cost: 4,
        message_history: 10,
        ..ServerConfig::default()
    }
}

/// Fresh state with the test configuration
pub fn test_state() -> AppState {
    AppState::new(test_config())
}

/// A server listening on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: ServerConfig) -> Self {
        let state = AppState::new(config);
        let app = create_app_with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Socket URL without credentials
    pub fn socket_base(&self) -> String {
        format!("ws://{}{}", self.addr, self.state.config.websocket_path)
    }

    /// Socket URL with the token as a query parameter
    pub fn socket_url(&self, token: &str) -> String {
        format!("{}?token={}", self.socket_base(), token)
    }
}
