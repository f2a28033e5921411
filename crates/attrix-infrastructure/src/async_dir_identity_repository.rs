//! AsyncDirStorage-based IdentityRepository implementation.
//!
//! The identity aggregate lives in the shared (cross-site) scope so every
//! embedding site resolves the same visitor — the native equivalent of a
//! parent-domain cookie.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use version_migrate::AsyncDirStorage;

use attrix_core::error::AttrixError;
use attrix_core::identity::{IdentityRepository, VisitorIdentity};

use crate::dto::create_identity_migrator;
use crate::paths::AttrixPaths;
use crate::storage::{is_not_found_message, open_storage};

const ENTITY: &str = "visitor_identity";
const IDENTITY_KEY: &str = "visitor";

/// AsyncDirStorage-based identity repository.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── identity/
///     └── visitor.toml
/// ```
pub struct AsyncDirIdentityRepository {
    storage: AsyncDirStorage,
}

impl AsyncDirIdentityRepository {
    /// Creates a repository at the shared default location
    /// (`~/.local/share/attrix`).
    pub async fn shared_location() -> Result<Self> {
        let base_dir = AttrixPaths::shared_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get shared directory: {}", e))?;
        Self::new(base_dir).await
    }

    /// Creates a repository rooted at an explicit base directory.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let storage = open_storage(base_dir, "identity", create_identity_migrator()).await?;
        Ok(Self { storage })
    }

    /// Returns the directory identity files are stored in.
    pub fn dir(&self) -> &Path {
        self.storage.base_path()
    }
}

#[async_trait]
impl IdentityRepository for AsyncDirIdentityRepository {
    async fn load(&self) -> attrix_core::Result<Option<VisitorIdentity>> {
        match self
            .storage
            .load::<VisitorIdentity>(ENTITY, IDENTITY_KEY)
            .await
        {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                let message = e.to_string();
                if is_not_found_message(&message) {
                    return Ok(None);
                }
                // Unreadable identity is treated as absent so a fresh one
                // gets minted instead of failing the whole tracker.
                tracing::warn!("Resetting unreadable visitor identity: {message}");
                Ok(None)
            }
        }
    }

    async fn store(&self, identity: &VisitorIdentity) -> attrix_core::Result<()> {
        self.storage
            .save(ENTITY, IDENTITY_KEY, identity)
            .await
            .map_err(|e| AttrixError::storage_unavailable(e.to_string()))
    }

    async fn clear(&self) -> attrix_core::Result<()> {
        match self.storage.delete(IDENTITY_KEY).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let message = e.to_string();
                if is_not_found_message(&message) {
                    return Ok(());
                }
                Err(AttrixError::storage_unavailable(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirIdentityRepository::new(temp_dir.path()).await.unwrap();

        let identity = VisitorIdentity::generate();
        repository.store(&identity).await.unwrap();

        let loaded = repository.load().await.unwrap();
        assert_eq!(loaded, Some(identity));
    }

    #[tokio::test]
    async fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirIdentityRepository::new(temp_dir.path()).await.unwrap();

        assert_eq!(repository.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_identity_survives_reopening() {
        let temp_dir = TempDir::new().unwrap();
        let identity = VisitorIdentity::generate();

        {
            let repository = AsyncDirIdentityRepository::new(temp_dir.path()).await.unwrap();
            repository.store(&identity).await.unwrap();
        }

        let repository = AsyncDirIdentityRepository::new(temp_dir.path()).await.unwrap();
        assert_eq!(repository.load().await.unwrap(), Some(identity));
    }

    #[tokio::test]
    async fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirIdentityRepository::new(temp_dir.path()).await.unwrap();

        let identity = VisitorIdentity::generate();
        repository.store(&identity).await.unwrap();
        repository.clear().await.unwrap();

        assert_eq!(repository.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_file_loads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirIdentityRepository::new(temp_dir.path()).await.unwrap();

        let path = repository.dir().join("visitor.toml");
        std::fs::create_dir_all(repository.dir()).unwrap();
        std::fs::write(&path, "this is { not toml").unwrap();

        assert_eq!(repository.load().await.unwrap(), None);
    }
}
