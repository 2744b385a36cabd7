// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email/password authentication over the shared database.
//!
//! Accounts live in the `users` table next to messages and profiles.
//! Passwords are stored as argon2id PHC strings. Sign-in state is published
//! through a `watch` channel; the message feed lifecycle is driven entirely
//! by transitions on that stream.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::params;
use tokio::sync::watch;
use tracing::{debug, info};

use chatternest_core::types::{AdapterType, AuthUser, HealthStatus};
use chatternest_core::{ChatterNestError, PluginAdapter};
use chatternest_store::Database;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// One stored account row.
struct AccountRow {
    uid: String,
    email: String,
    password_hash: String,
}

/// Email/password auth service with a sign-in state stream.
pub struct AuthService {
    db: Database,
    state: watch::Sender<Option<AuthUser>>,
}

impl AuthService {
    pub fn new(db: Database) -> Self {
        let (state, _) = watch::channel(None);
        Self { db, state }
    }

    /// The state-change notification stream: `Some(user)` on sign-in,
    /// `None` on sign-out. New subscribers observe the current value first.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }

    /// The currently signed-in user, if any.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    /// Registers a new account and signs it in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, ChatterNestError> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(auth_error(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if find_account(&self.db, &email).await?.is_some() {
            return Err(auth_error(format!("an account already exists for {email}")));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ChatterNestError::Internal(format!("password hashing failed: {e}")))?
            .to_string();

        let user = AuthUser {
            uid: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
        };
        insert_account(&self.db, &user, &password_hash).await?;

        info!(uid = %user.uid, "account created");
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Signs in an existing account.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<AuthUser, ChatterNestError> {
        let email = normalize_email(email)?;
        let Some(account) = find_account(&self.db, &email).await? else {
            return Err(auth_error(format!("no account found for {email}")));
        };

        let parsed = PasswordHash::new(&account.password_hash)
            .map_err(|e| ChatterNestError::Internal(format!("stored hash is invalid: {e}")))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(auth_error("incorrect password".to_string()));
        }

        let user = AuthUser {
            uid: account.uid,
            email: account.email,
        };
        debug!(uid = %user.uid, "signed in");
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Signs the current user out. A no-op when nobody is signed in.
    pub fn log_out(&self) {
        if self.state.send_replace(None).is_some() {
            debug!("signed out");
        }
    }
}

#[async_trait]
impl PluginAdapter for AuthService {
    fn name(&self) -> &str {
        "local-auth"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatterNestError> {
        self.db
            .connection()
            .call(|conn| {
                conn.execute_batch("SELECT count(*) FROM users;")?;
                Ok(())
            })
            .await
            .map_err(|e: tokio_rusqlite::Error| ChatterNestError::Storage {
                source: Box::new(e),
            })?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatterNestError> {
        self.log_out();
        Ok(())
    }
}

fn auth_error(message: String) -> ChatterNestError {
    ChatterNestError::Auth { message }
}

fn normalize_email(email: &str) -> Result<String, ChatterNestError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(auth_error("email address is invalid".to_string()));
    }
    Ok(email)
}

async fn find_account(db: &Database, email: &str) -> Result<Option<AccountRow>, ChatterNestError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT uid, email, password_hash FROM users WHERE email = ?1")?;
            let result = stmt.query_row(params![email], |row| {
                Ok(AccountRow {
                    uid: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            });
            match result {
                Ok(account) => Ok(Some(account)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(|e: tokio_rusqlite::Error| ChatterNestError::Storage {
            source: Box::new(e),
        })
}

async fn insert_account(
    db: &Database,
    user: &AuthUser,
    password_hash: &str,
) -> Result<(), ChatterNestError> {
    let uid = user.uid.clone();
    let email = user.email.clone();
    let password_hash = password_hash.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (uid, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    uid,
                    email,
                    password_hash,
                    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e: tokio_rusqlite::Error| ChatterNestError::Storage {
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup() -> (AuthService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("auth.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (AuthService::new(db), dir)
    }

    #[tokio::test]
    async fn sign_up_then_log_in_round_trips() {
        let (auth, _dir) = setup().await;

        let created = auth.sign_up("Alice@Example.com", "hunter22").await.unwrap();
        assert_eq!(created.email, "alice@example.com");
        assert_eq!(auth.current_user(), Some(created.clone()));

        auth.log_out();
        assert!(auth.current_user().is_none());

        let signed_in = auth.log_in("alice@example.com", "hunter22").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (auth, _dir) = setup().await;

        auth.sign_up("bob@example.com", "secret1").await.unwrap();
        let err = auth.sign_up("bob@example.com", "secret2").await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (auth, _dir) = setup().await;

        auth.sign_up("carol@example.com", "secret1").await.unwrap();
        auth.log_out();

        let err = auth
            .log_in("carol@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("incorrect password"));
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn unknown_account_is_rejected() {
        let (auth, _dir) = setup().await;
        let err = auth.log_in("nobody@example.com", "secret1").await.unwrap_err();
        assert!(err.to_string().contains("no account found"));
    }

    #[tokio::test]
    async fn invalid_email_and_short_password_are_rejected() {
        let (auth, _dir) = setup().await;
        assert!(auth.sign_up("not-an-email", "secret1").await.is_err());
        assert!(auth.sign_up("dave@example.com", "short").await.is_err());
    }

    #[tokio::test]
    async fn state_stream_sees_sign_in_and_sign_out() {
        let (auth, _dir) = setup().await;
        let mut rx = auth.subscribe();

        assert!(rx.borrow_and_update().is_none());

        let user = auth.sign_up("erin@example.com", "secret1").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().clone(), Some(user));

        auth.log_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn relogin_switches_the_published_user() {
        let (auth, _dir) = setup().await;

        let first = auth.sign_up("frank@example.com", "secret1").await.unwrap();
        let second = auth.sign_up("grace@example.com", "secret1").await.unwrap();
        assert_ne!(first.uid, second.uid);
        assert_eq!(auth.current_user(), Some(second));
    }
}
