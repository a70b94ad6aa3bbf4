use csv::{Reader, Writer};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::storage::error::StorageError;

const TRANS_UNITS_FILE: &str = "trans_units.csv";
const TRANSLATIONS_FILE: &str = "translations.csv";
const FILES_FILE: &str = "files.csv";

/// CsvConnection manages the data directory and the table files inside it
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StorageError> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn trans_units_file_path(&self) -> PathBuf {
        self.base_directory.join(TRANS_UNITS_FILE)
    }

    pub fn translations_file_path(&self) -> PathBuf {
        self.base_directory.join(TRANSLATIONS_FILE)
    }

    pub fn files_file_path(&self) -> PathBuf {
        self.base_directory.join(FILES_FILE)
    }

    /// Read every row of a table file. A missing file is an empty table.
    pub fn read_rows<T: DeserializeOwned>(&self, file_path: &Path) -> Result<Vec<T>, StorageError> {
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for result in csv_reader.deserialize() {
            rows.push(result?);
        }

        debug!("Read {} rows from {}", rows.len(), file_path.display());
        Ok(rows)
    }

    /// Write `rows` next to the table file, returning the temp file path.
    /// The table itself is untouched until `replace_with_temp`.
    pub fn write_temp_rows<T: Serialize>(
        &self,
        file_path: &Path,
        rows: &[T],
    ) -> Result<PathBuf, StorageError> {
        let temp_path = file_path.with_extension("csv.tmp");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut csv_writer = Writer::from_writer(BufWriter::new(file));
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;

        debug!("Wrote {} rows to {}", rows.len(), temp_path.display());
        Ok(temp_path)
    }

    /// Atomic move from temp to final file
    pub fn replace_with_temp(&self, temp_path: &Path, file_path: &Path) -> Result<(), StorageError> {
        fs::rename(temp_path, file_path)?;
        Ok(())
    }
}
