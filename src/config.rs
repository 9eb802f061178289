//! Global rules file handling.
//!
//! The global configuration is a plain text file holding one
//! `Category: ext, ext, ...` rule per line:
//!
//! ```text
//! IGNORE: crdownload, part
//! Pictures: jpg, png
//! Plain Text: txt, md
//! ```
//!
//! The file is created with [`DEFAULT_RULES`] the first time it is needed
//! and is never overwritten afterwards, except by an explicit reset.

use crate::error::{Error, Result};
use crate::platform;
use crate::rules::{DEFAULT_RULES, RuleTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Handle on the global rules file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Uses the rules file at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the platform's conventional location in the home directory.
    pub fn default_location() -> Self {
        Self::at(platform::default_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with the default rules if it does not exist yet.
    ///
    /// Returns `true` when the file was created by this call.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.is_file() {
            return Ok(false);
        }
        self.write_defaults()?;
        log::info!("created default rules at {}", self.path.display());
        Ok(true)
    }

    /// Overwrites the file with the default rules.
    pub fn reset(&self) -> Result<()> {
        self.write_defaults()?;
        log::info!("reset rules at {}", self.path.display());
        Ok(())
    }

    /// Reads the raw text of the rules file.
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    /// Loads the rule table, creating the file first if needed.
    ///
    /// Malformed lines do not fail the load; they are skipped and returned
    /// next to the table so the caller can report them.
    pub fn load(&self) -> Result<(RuleTable, Vec<Error>)> {
        self.ensure_exists()?;
        let text = self.read()?;
        let (table, errors) = RuleTable::parse_lenient(&text);
        for error in &errors {
            log::warn!("{}: {}", self.path.display(), error);
        }
        Ok((table, errors))
    }

    fn write_defaults(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&self.path, DEFAULT_RULES).map_err(|e| Error::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_creates_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = ConfigStore::at(temp_dir.path().join("nested").join("rules.conf"));

        assert!(store.ensure_exists().unwrap());
        assert_eq!(store.read().unwrap(), DEFAULT_RULES);

        let (table, errors) = store.load().unwrap();
        assert!(errors.is_empty());
        assert_eq!(table, RuleTable::default_rules());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("rules.conf");
        fs::write(&path, "Mine: abc").unwrap();
        let store = ConfigStore::at(&path);

        assert!(!store.ensure_exists().unwrap());
        let (table, _) = store.load().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Mine: abc");
        assert_eq!(table.rules()[0].category, "Mine");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("rules.conf");
        fs::write(&path, "Mine: abc").unwrap();

        ConfigStore::at(&path).reset().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_RULES);
    }

    #[test]
    fn test_load_reports_malformed_lines() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("rules.conf");
        fs::write(&path, "BadLine\nAudio: mp3\n").unwrap();

        let (table, errors) = ConfigStore::at(&path).load().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], Error::ConfigMalformed { line: 1, .. }));
        assert_eq!(table.matches("mp3").count(), 1);
    }
}
