//! Migration script identification and filename parsing

use crate::error::{MigrateError, MigrateResult};
use std::path::{Path, PathBuf};

/// Width of the zero-padded ordinal prefix
const ORDINAL_WIDTH: usize = 4;

/// How a migration script is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// SQL statement batch executed through the backend
    Sql,
    /// Python script invoked as a child process
    Python,
    /// Shell script invoked as a child process
    Shell,
}

impl ScriptKind {
    /// Classify a file extension; None for unsupported extensions
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "sql" => Some(ScriptKind::Sql),
            "py" => Some(ScriptKind::Python),
            "sh" => Some(ScriptKind::Shell),
            _ => None,
        }
    }

    /// Whether the script runs as an external process
    pub fn is_process(&self) -> bool {
        matches!(self, ScriptKind::Python | ScriptKind::Shell)
    }
}

/// A migration script discovered in the migrations directory
#[derive(Debug, Clone)]
pub struct Script {
    /// 4-digit ordinal: the script's position and the database version it
    /// produces
    pub ordinal: u32,
    /// Description from the filename; informational only, never ordering
    pub description: String,
    /// Path to the script file
    pub path: PathBuf,
    /// Execution strategy
    pub kind: ScriptKind,
}

impl Script {
    /// Parse a directory entry into a script reference.
    ///
    /// Returns `Ok(None)` for entries that are not migration scripts at all:
    /// hidden files, unsupported extensions, and helper modules without a
    /// digit prefix (an adapter's `config.py` may live beside the scripts).
    /// A digit-prefixed name with a supported extension must match
    /// `NNNN-description.ext` exactly, otherwise parsing fails loudly.
    pub fn parse(path: &Path) -> MigrateResult<Option<Script>> {
        let Some(file) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        if file.starts_with('.') {
            return Ok(None);
        }
        let Some(kind) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ScriptKind::from_extension)
        else {
            return Ok(None);
        };

        // Strip ".<ext>"; the extension was validated just above
        let stem = &file[..file.rfind('.').unwrap_or(file.len())];
        let digits: &str = &stem[..stem
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(stem.len())];

        if digits.is_empty() {
            return Ok(None);
        }

        let violation = |reason: &str| {
            Err(MigrateError::NamingViolation {
                file: file.to_string(),
                reason: reason.to_string(),
            })
        };

        if digits.len() != ORDINAL_WIDTH {
            return violation("ordinal must be exactly 4 digits");
        }
        let ordinal: u32 = match digits.parse() {
            Ok(n) => n,
            Err(_) => return violation("ordinal is not a valid integer"),
        };
        if ordinal == 0 {
            return violation("ordinal must be positive");
        }
        let rest = &stem[ORDINAL_WIDTH..];
        let Some(description) = rest.strip_prefix('-') else {
            return violation("expected '-' after the ordinal");
        };
        if description.is_empty() {
            return violation("missing description after the ordinal");
        }

        Ok(Some(Script {
            ordinal,
            description: description.to_string(),
            path: path.to_path_buf(),
            kind,
        }))
    }

    /// The script's file name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str) -> MigrateResult<Option<Script>> {
        Script::parse(Path::new(name))
    }

    #[test]
    fn test_parse_sql_script() {
        let script = parse("0001-create-users.sql").unwrap().unwrap();
        assert_eq!(script.ordinal, 1);
        assert_eq!(script.description, "create-users");
        assert_eq!(script.kind, ScriptKind::Sql);
    }

    #[test]
    fn test_parse_process_scripts() {
        let py = parse("0002-backfill.py").unwrap().unwrap();
        assert_eq!(py.kind, ScriptKind::Python);
        assert!(py.kind.is_process());

        let sh = parse("0003-vacuum.sh").unwrap().unwrap();
        assert_eq!(sh.kind, ScriptKind::Shell);
        assert!(sh.kind.is_process());
    }

    #[test]
    fn test_unsupported_extension_is_ignored() {
        assert!(parse("0001-readme.md").unwrap().is_none());
        assert!(parse("notes.txt").unwrap().is_none());
    }

    #[test]
    fn test_helper_module_without_digit_prefix_is_ignored() {
        assert!(parse("config.py").unwrap().is_none());
        assert!(parse("helpers.sh").unwrap().is_none());
    }

    #[test]
    fn test_hidden_files_are_ignored() {
        assert!(parse(".0001-hidden.sql").unwrap().is_none());
    }

    #[test]
    fn test_wrong_ordinal_width_is_rejected() {
        assert!(parse("001-short.sql").is_err());
        assert!(parse("00001-long.sql").is_err());
        assert!(parse("1-min.sql").is_err());
    }

    #[test]
    fn test_zero_ordinal_is_rejected() {
        assert!(parse("0000-nothing.sql").is_err());
    }

    #[test]
    fn test_missing_separator_is_rejected() {
        assert!(parse("0001create.sql").is_err());
        assert!(parse("0001.sql").is_err());
    }

    #[test]
    fn test_empty_description_is_rejected() {
        assert!(parse("0001-.sql").is_err());
    }
}
