//! In-memory storage backend. Committed state lives only as long as the value.

use log::debug;
use std::sync::{Mutex, MutexGuard};

use super::error::StorageError;
use super::tables::Tables;
use super::traits::{EntityKind, FileStorage, RemovedEntity, StagedEntity, TranslationStorage};
use super::unit_of_work::UnitOfWork;
use crate::domain::models::{File, FileId, FileNaming, Translation};

#[derive(Debug)]
pub struct InMemoryStorage {
    state: Mutex<UnitOfWork>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(UnitOfWork::new(Tables::default())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, UnitOfWork>, StorageError> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStorage for InMemoryStorage {
    fn model_class_for(&self, kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::TransUnit => "memory::trans_unit",
            EntityKind::Translation => "memory::translation",
            EntityKind::File => "memory::file",
        }
    }

    fn stage(&self, entity: StagedEntity<'_>) -> Result<(), StorageError> {
        self.lock()?.stage(entity)
    }

    fn remove(&self, entity: RemovedEntity<'_>) -> Result<(), StorageError> {
        self.lock()?.remove(entity)
    }

    fn remove_now(&self, entity: RemovedEntity<'_>) -> Result<(), StorageError> {
        self.lock()?.remove_with(entity, |_| Ok(()))?;
        Ok(())
    }

    fn replace_translation(
        &self,
        retired: &Translation,
        replacement: &mut Translation,
    ) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.stage_replace(retired, replacement)?;
        state.commit_with(|_| Ok(()))?;
        Ok(())
    }

    fn commit(&self) -> Result<(), StorageError> {
        let applied = self.lock()?.commit_with(|_| Ok(()))?;
        debug!("In-memory commit applied {} operations", applied);
        Ok(())
    }

    fn read<R, F>(&self, reader: F) -> Result<R, StorageError>
    where
        F: FnOnce(&Tables) -> R,
    {
        Ok(reader(self.lock()?.tables()))
    }
}

impl FileStorage for InMemoryStorage {
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
        self.lock()?.insert_file_with(naming, path, |_| Ok(()))
    }
}
