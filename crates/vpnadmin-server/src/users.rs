//! JSON-backed user store.
//!
//! The store is a single JSON file `{"users": [{username, password,
//! role}]}`; passwords are salted SHA-256 digests in `salt$digest` hex
//! form. Reads and writes go through the file on every call, matching
//! how the rest of the system treats on-disk state as authoritative.

use std::path::PathBuf;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};

/// Role granted to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// One stored user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// `salt$digest` where digest = sha256(salt_bytes || password).
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserFile {
    users: Vec<UserRecord>,
}

/// Errors from the user store.
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Failed to read user store: {0}")]
    Unreadable(std::io::Error),

    #[error("Failed to write user store: {0}")]
    Unwritable(std::io::Error),

    #[error("User store is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// File-backed user accounts with salted-hash passwords.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Verify a username/password pair; returns the user's role on
    /// success.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Option<Role>, UserStoreError> {
        let file = self.load().await?;
        let Some(user) = file.users.iter().find(|u| u.username == username) else {
            return Ok(None);
        };
        if verify_password(&user.password, password) {
            Ok(Some(user.role))
        } else {
            Ok(None)
        }
    }

    /// Add a user, rejecting duplicates.
    pub async fn add_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<(), UserStoreError> {
        let mut file = self.load().await?;
        if file.users.iter().any(|u| u.username == username) {
            return Err(UserStoreError::DuplicateUsername(username.to_string()));
        }
        file.users.push(UserRecord {
            username: username.to_string(),
            password: hash_password(password),
            role,
        });
        self.save(&file).await?;
        info!(username, ?role, "User added");
        Ok(())
    }

    async fn load(&self) -> Result<UserFile, UserStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.bootstrap().await,
            Err(e) => Err(UserStoreError::Unreadable(e)),
        }
    }

    /// First run: create the store with a default admin account and a
    /// random password, logged once so the operator can log in and
    /// change it.
    async fn bootstrap(&self) -> Result<UserFile, UserStoreError> {
        let mut password_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut password_bytes);
        let password = hex::encode(password_bytes);

        let file = UserFile {
            users: vec![UserRecord {
                username: "admin".to_string(),
                password: hash_password(&password),
                role: Role::Admin,
            }],
        };
        self.save(&file).await?;
        warn!(
            path = %self.path.display(),
            username = "admin",
            password = %password,
            "User store created with a generated admin password; change it"
        );
        Ok(file)
    }

    async fn save(&self, file: &UserFile) -> Result<(), UserStoreError> {
        let json = serde_json::to_string_pretty(file)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(UserStoreError::Unwritable)
    }
}

/// Hash a password with a fresh random 16-byte salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), digest(&salt, password))
}

/// Constant-time verification against a stored `salt$digest` value.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Some((salt_hex, expected)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let actual = digest(&salt, password);
    actual.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, UserStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path().join("users.json"));
        (dir, store)
    }

    #[test]
    fn test_password_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password(&stored, "hunter2"));
        assert!(!verify_password(&stored, "hunter3"));
    }

    #[test]
    fn test_distinct_salts() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_verify_rejects_malformed_stored_value() {
        assert!(!verify_password("no-dollar-sign", "x"));
        assert!(!verify_password("nothex$abc", "x"));
    }

    #[tokio::test]
    async fn test_bootstrap_creates_default_admin() {
        let (_dir, store) = store();
        // First access bootstraps the file
        assert!(store.verify("admin", "wrong").await.unwrap().is_none());
        assert!(store.path.exists());

        let content = std::fs::read_to_string(&store.path).unwrap();
        assert!(content.contains("\"admin\""));
    }

    #[tokio::test]
    async fn test_add_and_verify_user() {
        let (_dir, store) = store();
        store.add_user("alice", "secret", Role::User).await.unwrap();
        assert_eq!(store.verify("alice", "secret").await.unwrap(), Some(Role::User));
        assert_eq!(store.verify("alice", "nope").await.unwrap(), None);
        assert_eq!(store.verify("nobody", "secret").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (_dir, store) = store();
        store.add_user("alice", "secret", Role::User).await.unwrap();
        let err = store.add_user("alice", "other", Role::Admin).await.unwrap_err();
        assert!(matches!(err, UserStoreError::DuplicateUsername(_)));
    }
}
