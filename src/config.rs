//! Runtime configuration, resolved from the environment.

use std::env;
use std::path::{Path, PathBuf};

/// Overrides the database location when set
pub const DB_PATH_ENV: &str = "SNIP_DB_PATH";

const DATA_DIR_NAME: &str = ".snipdb";
const DB_FILE_NAME: &str = "snippets.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = resolve_db_path(env::var(DB_PATH_ENV).ok(), dirs::home_dir());
        Self { db_path }
    }

    /// Directory holding the database file
    pub fn data_dir(&self) -> &Path {
        self.db_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// `override_path` wins when non-empty, then `~/.snipdb/snippets.db`, then the temp dir.
pub fn resolve_db_path(override_path: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    match home {
        Some(home) => home.join(DATA_DIR_NAME).join(DB_FILE_NAME),
        None => env::temp_dir().join("snip.db"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let path = resolve_db_path(Some("/tmp/custom.db".into()), Some("/home/me".into()));
        assert_eq!(path, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let path = resolve_db_path(Some(String::new()), Some("/home/me".into()));
        assert_eq!(path, PathBuf::from("/home/me/.snipdb/snippets.db"));
    }

    #[test]
    fn falls_back_to_temp_dir_without_home() {
        let path = resolve_db_path(None, None);
        assert_eq!(path, env::temp_dir().join("snip.db"));
    }

    #[test]
    fn data_dir_is_parent_of_db() {
        let config = Config {
            db_path: PathBuf::from("/home/me/.snipdb/snippets.db"),
        };
        assert_eq!(config.data_dir(), Path::new("/home/me/.snipdb"));
    }
}
