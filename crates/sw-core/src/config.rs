//! Configuration types and parsing for stepwise.yml

use crate::error::{MigrateError, MigrateResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, searched in the working directory
pub const CONFIG_FILE: &str = "stepwise.yml";

/// Project configuration from stepwise.yml
///
/// Resolves the database path and migrations directory once, outside the
/// engine; the engine itself takes plain paths and holds no ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the managed SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Directory containing migration scripts
    #[serde(default = "default_migrations")]
    pub migrations: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from("data/database.db")
}

fn default_migrations() -> PathBuf {
    PathBuf::from("migrations")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            migrations: default_migrations(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file path
    pub fn load(path: &Path) -> MigrateResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
        serde_yaml::from_str(&text).map_err(|e| MigrateError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load `stepwise.yml` from a directory, falling back to defaults when
    /// the file does not exist
    pub fn load_from_dir(dir: &Path) -> MigrateResult<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database, PathBuf::from("data/database.db"));
        assert_eq!(config.migrations, PathBuf::from("migrations"));
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "database: state/app.db\nmigrations: db/migrations\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database, PathBuf::from("state/app.db"));
        assert_eq!(config.migrations, PathBuf::from("db/migrations"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "database: state/app.db\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database, PathBuf::from("state/app.db"));
        assert_eq!(config.migrations, PathBuf::from("migrations"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "database: a.db\nmigration_dir: oops\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(MigrateError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_from_dir_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.migrations, PathBuf::from("migrations"));
    }
}
