/**
 * User Store
 *
 * In-memory user accounts for the REST auth service. Emails are normalised
 * (trimmed, lowercased) before use as keys. Passwords are hashed with bcrypt
 * on the blocking pool so hashing never stalls socket workers.
 */

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user
#[derive(Debug, Clone)]
pub struct User {
    /// User ID (UUID)
    pub id: Uuid,
    /// Normalised email address
    pub email: String,
    /// Name shown in chat rooms
    pub display_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// User store errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Email is already registered")]
    DuplicateEmail,
    #[error("{0}")]
    Validation(String),
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Thread-safe in-memory user store
#[derive(Debug, Clone)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    bcrypt_cost: u32,
}

impl UserStore {
    /// Create an empty store hashing with the given bcrypt cost
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            bcrypt_cost,
        }
    }

    /// Register a new user
    ///
    /// # Arguments
    /// * `email` - Login email (case-insensitive)
    /// * `password` - Plain-text password, at least [`MIN_PASSWORD_LEN`] chars
    /// * `display_name` - Optional chat name; defaults to the email's local part
    ///
    /// # Errors
    /// `Validation` for a bad email or short password, `DuplicateEmail` if
    /// the email is taken.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, UserError> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::Validation("A valid email is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(UserError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.users.read().await.contains_key(&email) {
            return Err(UserError::DuplicateEmail);
        }

        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            display_name,
            password_hash,
            created_at: Utc::now(),
        };

        // Re-check under the write lock: another registration may have won the race
        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            return Err(UserError::DuplicateEmail);
        }
        users.insert(email, user.clone());
        tracing::info!("[Auth] Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Check credentials
    ///
    /// # Returns
    /// The user when the email exists and the password matches, `None` otherwise
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, UserError> {
        let Some(user) = self.get_user_by_email(email).await else {
            return Ok(None);
        };
        let password = password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(valid.then_some(user))
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users.read().await.get(&normalize_email(email)).cloned()
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Option<User> {
        self.users.read().await.values().find(|user| user.id == id).cloned()
    }

    /// Number of registered users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
