use std::path::PathBuf;

use directories::ProjectDirs;

pub const BACKEND_URL_ENV: &str = "MEMOARC_BACKEND_URL";
pub const STORAGE_ENV: &str = "MEMOARC_STORAGE";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

const STORAGE_FILE: &str = "storage.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub storage_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        ClientConfig {
            backend_url: var(BACKEND_URL_ENV).unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            storage_path: var(STORAGE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_storage_path),
        }
    }
}

/// Platform data directory, or the working directory when there is none.
pub fn default_storage_path() -> PathBuf {
    ProjectDirs::from("", "", "memoarc")
        .map(|dirs| dirs.data_dir().join(STORAGE_FILE))
        .unwrap_or_else(|| PathBuf::from(STORAGE_FILE))
}
