//! Test environment for the CSV backend.
//!
//! The temporary directory is removed when the environment is dropped, even
//! if the test panics.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::csv_storage::CsvStorage;

pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// Open a fresh gateway over the environment's directory
    pub fn storage(&self) -> Result<CsvStorage> {
        Ok(CsvStorage::open(self.connection.clone())?)
    }
}
