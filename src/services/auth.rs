//! Basic-credential authentication service

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{config::CredentialEntry, error::AppError};

/// Why a login was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("unknown user")]
    UserNotFound,
    #[error("bad password")]
    BadPassword,
}

impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        // One message for both causes; the cause is only logged
        AppError::Authentication("Credenciais inválidas.".to_string())
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub scopes: Vec<String>,
}

/// Compared against when the username is unknown, so a miss costs the same
/// digest work as a wrong password
const DUMMY_PASSWORD: &[u8] = b"livros-no-such-user";

/// Read-only username → credential table, built once at startup
#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: HashMap<String, CredentialEntry>,
}

impl CredentialStore {
    pub fn new(entries: impl IntoIterator<Item = CredentialEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.username.clone(), entry))
                .collect(),
        }
    }

    pub fn get(&self, username: &str) -> Option<&CredentialEntry> {
        self.entries.get(username)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<CredentialStore>,
}

impl AuthService {
    pub fn new(credentials: Arc<CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Check a username/password pair. No session is created.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let Some(entry) = self.credentials.get(username) else {
            std::hint::black_box(constant_time_eq(password.as_bytes(), DUMMY_PASSWORD));
            tracing::warn!("Login refused: unknown user '{}'", username);
            return Err(AuthError::UserNotFound);
        };

        if !constant_time_eq(password.as_bytes(), entry.password.as_bytes()) {
            tracing::warn!("Login refused: bad password for '{}'", username);
            return Err(AuthError::BadPassword);
        }

        tracing::debug!("Authenticated '{}'", username);
        Ok(Identity {
            username: entry.username.clone(),
            scopes: entry.scopes.clone(),
        })
    }
}

/// Compare two secrets in time independent of where they differ.
///
/// Both sides are digested first so the comparison length is fixed and
/// does not leak the stored password's length either.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let a = Sha256::digest(a);
    let b = Sha256::digest(b);
    let mut diff = 0u8;
    for (left, right) in a.iter().zip(b.iter()) {
        diff |= left ^ right;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn service() -> AuthService {
        let store = CredentialStore::new(AuthConfig::default().users);
        AuthService::new(Arc::new(store))
    }

    #[test]
    fn wrong_password_is_refused() {
        assert_eq!(
            service().authenticate("admin", "wrong"),
            Err(AuthError::BadPassword)
        );
    }

    #[test]
    fn unknown_user_is_refused() {
        assert_eq!(
            service().authenticate("ghost", "admin123"),
            Err(AuthError::UserNotFound)
        );
    }

    #[test]
    fn correct_password_returns_scopes() {
        let identity = service().authenticate("admin", "admin123").unwrap();
        assert_eq!(identity.username, "admin");
        assert_eq!(identity.scopes, vec!["admin", "user"]);

        let identity = service().authenticate("user", "user123").unwrap();
        assert_eq!(identity.scopes, vec!["user"]);
    }

    #[test]
    fn unknown_user_is_refused_even_with_the_fallback_secret() {
        let dummy = std::str::from_utf8(DUMMY_PASSWORD).unwrap();
        assert_eq!(
            service().authenticate("ghost", dummy),
            Err(AuthError::UserNotFound)
        );
        assert_eq!(service().authenticate("", ""), Err(AuthError::UserNotFound));
    }

    #[test]
    fn prefix_of_password_is_refused() {
        assert_eq!(
            service().authenticate("admin", "admin"),
            Err(AuthError::BadPassword)
        );
        assert_eq!(
            service().authenticate("admin", "admin1234"),
            Err(AuthError::BadPassword)
        );
    }

    #[test]
    fn comparison_matches_only_identical_input() {
        assert!(constant_time_eq(b"s3cret", b"s3cret"));
        assert!(!constant_time_eq(b"s3cret", b"s3creT"));
        assert!(!constant_time_eq(b"", b"x"));
    }
}
