use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use super::connection::CsvConnection;
use super::records::{FileRow, TranslationRow, UnitRow};
use crate::domain::models::{File, FileId, FileNaming, Translation};
use crate::storage::error::StorageError;
use crate::storage::tables::{PendingOperation, Tables};
use crate::storage::traits::{
    EntityKind, FileStorage, RemovedEntity, StagedEntity, TranslationStorage,
};
use crate::storage::unit_of_work::UnitOfWork;

/// Storage gateway persisting its tables as CSV files in the data directory.
///
/// Every commit rewrites the tables it holds; each file is replaced atomically.
#[derive(Debug)]
pub struct CsvStorage {
    connection: CsvConnection,
    state: Mutex<UnitOfWork>,
}

impl CsvStorage {
    /// Open the tables found in the connection's directory
    pub fn open(connection: CsvConnection) -> Result<Self, StorageError> {
        let tables = load_tables(&connection)?;
        info!(
            "Opened CSV storage at {} ({} trans units)",
            connection.base_directory().display(),
            tables.unit_count()
        );
        Ok(Self {
            connection,
            state: Mutex::new(UnitOfWork::new(tables)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, UnitOfWork>, StorageError> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn load_tables(connection: &CsvConnection) -> Result<Tables, StorageError> {
    let mut tables = Tables::default();

    let units: Vec<UnitRow> = connection.read_rows(&connection.trans_units_file_path())?;
    for row in units {
        tables.apply(PendingOperation::UpsertUnit(row.into()))?;
    }

    let translations: Vec<TranslationRow> =
        connection.read_rows(&connection.translations_file_path())?;
    for row in translations {
        let id = row.id;
        match tables.apply(PendingOperation::UpsertTranslation(row.into())) {
            Ok(()) => {}
            Err(StorageError::MissingParent { unit, .. }) => {
                warn!("Skipping translation {} of missing trans unit {}", id, unit);
            }
            Err(e) => return Err(e),
        }
    }

    let files: Vec<FileRow> = connection.read_rows(&connection.files_file_path())?;
    for row in files {
        tables.insert_file(row.into());
    }

    Ok(tables)
}

fn write_tables(connection: &CsvConnection, tables: &Tables) -> Result<(), StorageError> {
    let units: Vec<UnitRow> = tables.units().map(UnitRow::from).collect();
    let translations: Vec<TranslationRow> = tables
        .units()
        .flat_map(|unit| tables.translations_of(unit))
        .filter_map(TranslationRow::from_translation)
        .collect();
    let files: Vec<FileRow> = tables.files().map(FileRow::from).collect();

    // Every table is written aside before any of them is replaced
    let mut written = Vec::with_capacity(3);
    let outcome = write_temp_tables(connection, &units, &translations, &files, &mut written);
    if let Err(e) = outcome {
        for (temp_path, _) in &written {
            if let Err(cleanup) = fs::remove_file(temp_path) {
                warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
            }
        }
        return Err(e);
    }
    for (temp_path, file_path) in &written {
        connection.replace_with_temp(temp_path, file_path)?;
    }

    debug!(
        "Persisted {} trans units, {} translations, {} files",
        units.len(),
        translations.len(),
        files.len()
    );
    Ok(())
}

fn write_temp_tables(
    connection: &CsvConnection,
    units: &[UnitRow],
    translations: &[TranslationRow],
    files: &[FileRow],
    written: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<(), StorageError> {
    let file_path = connection.trans_units_file_path();
    written.push((connection.write_temp_rows(&file_path, units)?, file_path));
    let file_path = connection.translations_file_path();
    written.push((connection.write_temp_rows(&file_path, translations)?, file_path));
    let file_path = connection.files_file_path();
    written.push((connection.write_temp_rows(&file_path, files)?, file_path));
    Ok(())
}

impl TranslationStorage for CsvStorage {
    fn model_class_for(&self, kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::TransUnit => "csv::trans_unit",
            EntityKind::Translation => "csv::translation",
            EntityKind::File => "csv::file",
        }
    }

    fn stage(&self, entity: StagedEntity<'_>) -> Result<(), StorageError> {
        self.lock()?.stage(entity)
    }

    fn remove(&self, entity: RemovedEntity<'_>) -> Result<(), StorageError> {
        self.lock()?.remove(entity)
    }

    fn remove_now(&self, entity: RemovedEntity<'_>) -> Result<(), StorageError> {
        self.lock()?
            .remove_with(entity, |tables| write_tables(&self.connection, tables))?;
        Ok(())
    }

    fn replace_translation(
        &self,
        retired: &Translation,
        replacement: &mut Translation,
    ) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.stage_replace(retired, replacement)?;
        state.commit_with(|tables| write_tables(&self.connection, tables))?;
        Ok(())
    }

    fn commit(&self) -> Result<(), StorageError> {
        self.lock()?
            .commit_with(|tables| write_tables(&self.connection, tables))?;
        Ok(())
    }

    fn read<R, F>(&self, reader: F) -> Result<R, StorageError>
    where
        F: FnOnce(&Tables) -> R,
    {
        Ok(reader(self.lock()?.tables()))
    }
}

impl FileStorage for CsvStorage {
    fn find_file(&self, id: FileId) -> Result<Option<File>, StorageError> {
        Ok(self.lock()?.tables().file(id).cloned())
    }

    fn find_file_by_location(&self, path: &str, name: &str) -> Result<Option<File>, StorageError> {
        Ok(self
            .lock()?
            .tables()
            .files()
            .find(|file| file.path == path && file.name == name)
            .cloned())
    }

    fn insert_file(&self, naming: &FileNaming, path: &str) -> Result<File, StorageError> {
        let file = self
            .lock()?
            .insert_file_with(naming, path, |tables| write_tables(&self.connection, tables))?;
        info!("Registered resource file {}/{}", file.path, file.name);
        Ok(file)
    }
}
