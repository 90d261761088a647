/**
 * Auth Client
 *
 * HTTP helpers for the auth endpoints. Login returns the session token taken
 * from the `authToken` cookie; `websocket_token` trades it for a token to put
 * in the socket URL.
 */

use crate::client::error::{ClientError, ClientResult};
use crate::shared::{ClientConfig, ConfigError};
use reqwest::header::SET_COOKIE;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const AUTH_COOKIE: &str = "authToken";

/// A logged-in user
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub display_name: String,
    /// Session token from the auth cookie
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterReply {
    user_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginReply {
    user_id: Uuid,
    display_name: String,
}

#[derive(Deserialize)]
struct TokenReply {
    token: String,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

/// Client for the `/auth` endpoints
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for a REST base URL such as `http://127.0.0.1:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the configured HTTP URL
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = config
            .http_url
            .as_deref()
            .ok_or(ConfigError::MissingValue("http_url"))?;
        Ok(Self::new(base_url))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /auth/register
    pub async fn register(&self, email: &str, password: &str, display_name: Option<&str>) -> ClientResult<Uuid> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&RegisterBody {
                email,
                password,
                display_name,
            })
            .send()
            .await?;
        let reply: RegisterReply = checked(response).await?.json().await?;
        Ok(reply.user_id)
    }

    /// POST /auth/login
    ///
    /// # Errors
    ///
    /// * `ClientError::Rejected` - Wrong credentials (401)
    /// * `ClientError::MissingCookie` - Server did not set `authToken`
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        let response = checked(response).await?;

        let token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookie| {
                cookie
                    .split(';')
                    .next()
                    .and_then(|pair| pair.trim().strip_prefix(AUTH_COOKIE))
                    .and_then(|rest| rest.strip_prefix('='))
                    .map(str::to_string)
            })
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::MissingCookie)?;

        let reply: LoginReply = response.json().await?;
        tracing::info!("[Client] Logged in as {}", reply.display_name);
        Ok(AuthSession {
            user_id: reply.user_id,
            display_name: reply.display_name,
            token,
        })
    }

    /// GET /auth/websocket-token
    pub async fn websocket_token(&self, session: &AuthSession) -> ClientResult<String> {
        let response = self
            .http
            .get(self.url("/auth/websocket-token"))
            .bearer_auth(&session.token)
            .send()
            .await?;
        let reply: TokenReply = checked(response).await?.json().await?;
        Ok(reply.token)
    }
}

/// Socket URL carrying a token in the query string
pub fn websocket_url(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}token={}", base, separator, token)
}

async fn checked(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorReply>().await {
        Ok(reply) => reply.error,
        Err(_) => status.to_string(),
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}
