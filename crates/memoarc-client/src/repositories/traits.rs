use crate::errors::ClientError;
use async_trait::async_trait;

/// Persistent string key/value store holding the session between runs.
#[async_trait]
pub trait StorageRepository: Clone + Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    async fn remove(&self, key: &str) -> Result<(), ClientError>;
}
