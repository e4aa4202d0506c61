//! The patient creation service.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by a patient service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Reading or writing the store failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store holds malformed data.
    #[error("store format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Data needed to create a patient user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A created patient user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier used in patient routes.
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Creates and lists patient users.
pub trait PatientService: Send + Sync {
    /// Creates a user.
    ///
    /// Resolves to `None` when the backend accepted the request without
    /// returning a record.
    fn create_user(
        &self,
        user: NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>>> + Send + '_>>;

    /// Lists users, oldest first.
    fn list_users(&self) -> Pin<Box<dyn Future<Output = Result<Vec<UserRecord>>> + Send + '_>>;
}

/// A patient service keeping users in memory, optionally mirrored to a JSON file.
///
/// Creating a user whose email is already registered returns the existing
/// record instead of a duplicate. A new record becomes visible only once the
/// store has been written.
#[derive(Debug, Default)]
pub struct InMemoryPatientService {
    users: Mutex<Vec<UserRecord>>,
    store: Option<PathBuf>,
    /// Held from building the next user list until it is committed.
    writes: tokio::sync::Mutex<()>,
}

impl InMemoryPatientService {
    /// Creates an empty, unpersisted service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a service backed by a JSON file, loading it if it exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let users = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), count = users.len(), "patient store loaded");

        Ok(Self {
            users: Mutex::new(users),
            store: Some(path),
            writes: tokio::sync::Mutex::new(()),
        })
    }

    fn snapshot(&self) -> Vec<UserRecord> {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn persist(&self, users: &[UserRecord]) -> Result<()> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(users)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

impl PatientService for InMemoryPatientService {
    fn create_user(
        &self,
        user: NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>>> + Send + '_>> {
        Box::pin(async move {
            let _write = self.writes.lock().await;

            let (record, next) = {
                let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);

                if let Some(existing) = users.iter().find(|u| u.email == user.email) {
                    info!(id = %existing.id, "patient already registered");
                    return Ok(Some(existing.clone()));
                }

                let record = UserRecord {
                    id: format!("{:08x}", users.len() + 1),
                    name: user.name,
                    email: user.email,
                    phone: user.phone,
                    created_at: Utc::now(),
                };
                let mut next = users.clone();
                next.push(record.clone());
                (record, next)
            };

            if let Err(err) = self.persist(&next).await {
                warn!(error = %err, "patient store write failed; record discarded");
                return Err(err);
            }
            *self.users.lock().unwrap_or_else(PoisonError::into_inner) = next;

            info!(id = %record.id, "patient created");
            Ok(Some(record))
        })
    }

    fn list_users(&self) -> Pin<Box<dyn Future<Output = Result<Vec<UserRecord>>> + Send + '_>> {
        Box::pin(async move { Ok(self.snapshot()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> NewUser {
        NewUser {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "+15551234567".into(),
        }
    }

    #[tokio::test]
    async fn test_create_user_assigns_ids() {
        let service = InMemoryPatientService::new();
        let first = service.create_user(jane()).await.unwrap().unwrap();
        let second = service
            .create_user(NewUser {
                email: "john@example.com".into(),
                ..jane()
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, "00000001");
        assert_eq!(second.id, "00000002");
        assert_eq!(service.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("missing").join("patients.json");
        let service = InMemoryPatientService::open(&store).await.unwrap();

        assert!(matches!(
            service.create_user(jane()).await,
            Err(ServiceError::Io(_))
        ));
        // Retrying does not find a half-created record.
        assert!(matches!(
            service.create_user(jane()).await,
            Err(ServiceError::Io(_))
        ));
        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_all_reach_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.json");
        let service = InMemoryPatientService::open(&path).await.unwrap();

        let user = |email: &str| NewUser {
            email: email.into(),
            ..jane()
        };
        let (a, b, c) = tokio::join!(
            service.create_user(user("a@example.com")),
            service.create_user(user("b@example.com")),
            service.create_user(user("c@example.com")),
        );
        for result in [a, b, c] {
            assert!(result.unwrap().is_some());
        }

        let reopened = InMemoryPatientService::open(&path).await.unwrap();
        let mut ids: Vec<String> = reopened
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["00000001", "00000002", "00000003"]);
    }

    #[tokio::test]
    async fn test_existing_email_returns_existing_record() {
        let service = InMemoryPatientService::new();
        let first = service.create_user(jane()).await.unwrap().unwrap();
        let again = service.create_user(jane()).await.unwrap().unwrap();

        assert_eq!(first, again);
        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }
}
