use super::traits::StorageRepository;
use crate::errors::ClientError;
use crate::models::StoredEntry;
use crate::schema::local_storage;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Clone)]
pub struct SqliteStorageRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteStorageRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }

    /// Open (creating if needed) the store at `path` and bring its schema up
    /// to date.
    pub fn open(path: &Path) -> Result<Self, ClientError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let database_url = path.to_string_lossy();
        let mut connection = SqliteConnection::establish(&database_url)?;
        run_migrations(&mut connection)?;

        info!(path = %database_url, "Opened local storage");
        Ok(Self::new(Arc::new(Mutex::new(connection))))
    }

    fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, ClientError> {
        self.db.lock().map_err(|_| ClientError::StoragePoisoned)
    }
}

pub fn run_migrations(connection: &mut SqliteConnection) -> Result<(), ClientError> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| ClientError::Migration(err.to_string()))?;
    debug!(count = applied.len(), "Applied pending migrations");
    Ok(())
}

#[async_trait]
impl StorageRepository for SqliteStorageRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let mut conn = self.conn()?;
        let result = local_storage::table
            .find(key)
            .select(StoredEntry::as_select())
            .first::<StoredEntry>(&mut *conn)
            .optional()?;
        Ok(result.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut conn = self.conn()?;
        diesel::replace_into(local_storage::table)
            .values(&StoredEntry::new(key, value))
            .execute(&mut *conn)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut conn = self.conn()?;
        diesel::delete(local_storage::table.find(key)).execute(&mut *conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_utils::{count_entries, get_all_entries};
    use crate::test_helpers::{in_memory_storage, in_memory_storage_with_db};

    #[tokio::test]
    async fn test_set_then_get() {
        let storage = in_memory_storage();
        storage.set("token", "abc").await.unwrap();
        assert_eq!(storage.get("token").await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let storage = in_memory_storage();
        storage.set("email", "a@example.com").await.unwrap();
        storage.set("email", "b@example.com").await.unwrap();
        assert_eq!(
            storage.get("email").await.unwrap().as_deref(),
            Some("b@example.com")
        );
    }

    #[tokio::test]
    async fn test_set_keeps_one_row_per_key() {
        let (storage, db) = in_memory_storage_with_db();
        storage.set("token", "first").await.unwrap();
        storage.set("token", "second").await.unwrap();
        storage.set("email", "a@example.com").await.unwrap();

        let mut conn = db.lock().unwrap();
        assert_eq!(count_entries(&mut conn), 2);

        let entries = get_all_entries(&mut conn);
        let token = entries.iter().find(|e| e.key == "token").unwrap();
        assert_eq!(token.value, "second");
    }

    #[tokio::test]
    async fn test_remove_deletes_row() {
        let (storage, db) = in_memory_storage_with_db();
        storage.set("token", "abc").await.unwrap();
        storage.remove("token").await.unwrap();

        assert_eq!(count_entries(&mut db.lock().unwrap()), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let storage = in_memory_storage();
        storage.remove("token").await.unwrap();
        assert!(storage.get("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_connection() {
        let storage = in_memory_storage();
        let other = storage.clone();
        storage.set("token", "shared").await.unwrap();
        assert_eq!(other.get("token").await.unwrap().as_deref(), Some("shared"));
    }
}
