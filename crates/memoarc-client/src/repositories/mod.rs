pub mod storage;
pub mod traits;

pub use storage::SqliteStorageRepository;
pub use traits::StorageRepository;
