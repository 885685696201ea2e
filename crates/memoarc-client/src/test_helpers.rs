use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

use crate::repositories::SqliteStorageRepository;
use crate::repositories::storage::run_migrations;

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    run_migrations(&mut connection).expect("Failed to run migrations");

    connection
}

pub fn in_memory_storage() -> SqliteStorageRepository {
    in_memory_storage_with_db().0
}

pub fn in_memory_storage_with_db() -> (SqliteStorageRepository, Arc<Mutex<SqliteConnection>>) {
    let db = Arc::new(Mutex::new(establish_test_connection()));
    (SqliteStorageRepository::new(db.clone()), db)
}

pub mod test_utils {
    use super::*;
    use crate::models::StoredEntry;
    use crate::schema::local_storage;

    pub fn count_entries(conn: &mut SqliteConnection) -> i64 {
        local_storage::table
            .count()
            .get_result(conn)
            .expect("Failed to count storage entries")
    }

    pub fn get_all_entries(conn: &mut SqliteConnection) -> Vec<StoredEntry> {
        local_storage::table
            .select(StoredEntry::as_select())
            .load::<StoredEntry>(conn)
            .expect("Failed to load storage entries")
    }
}
