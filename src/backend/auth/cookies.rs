//! `authToken` cookie helpers
//!
//! Browsers carry the session token in an HttpOnly cookie, which is also how
//! the socket handshake finds it when no `?token=` query parameter is given.

use axum::http::{header::COOKIE, HeaderMap};

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "authToken";

/// `Set-Cookie` value carrying a fresh token
pub fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        AUTH_COOKIE, token, max_age_secs
    )
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", AUTH_COOKIE)
}

/// Token from the request's `authToken` cookie, if present
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
