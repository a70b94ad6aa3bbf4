//! Staging area shared by every backend.
//!
//! Ids are handed out at staging time from monotonic sequences, so callers can
//! link translations to a unit before anything is committed. A commit applies
//! the staged operations to a copy of the committed tables and only swaps the
//! copy in once every operation validated and the backend persisted it.

use log::debug;
use std::mem;

use super::error::StorageError;
use super::tables::{PendingOperation, Tables, UnitRecord};
use super::traits::{EntityKind, RemovedEntity, StagedEntity};
use crate::domain::models::{File, FileId, FileNaming, Translation, TranslationId, UnitId};

#[derive(Debug, Clone, Copy)]
struct Sequences {
    next_unit: u64,
    next_translation: u64,
    next_file: u64,
}

impl Sequences {
    fn after(tables: &Tables) -> Self {
        let (unit, translation, file) = tables.max_ids();
        Self {
            next_unit: unit + 1,
            next_translation: translation + 1,
            next_file: file + 1,
        }
    }

    fn unit(&mut self) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        id
    }

    fn translation(&mut self) -> TranslationId {
        let id = TranslationId(self.next_translation);
        self.next_translation += 1;
        id
    }

    fn file(&mut self) -> FileId {
        let id = FileId(self.next_file);
        self.next_file += 1;
        id
    }
}

#[derive(Debug)]
pub(crate) struct UnitOfWork {
    tables: Tables,
    pending: Vec<PendingOperation>,
    sequences: Sequences,
}

impl UnitOfWork {
    pub(crate) fn new(tables: Tables) -> Self {
        let sequences = Sequences::after(&tables);
        Self {
            tables,
            pending: Vec::new(),
            sequences,
        }
    }

    pub(crate) fn tables(&self) -> &Tables {
        &self.tables
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn stage(&mut self, entity: StagedEntity<'_>) -> Result<(), StorageError> {
        match entity {
            StagedEntity::TransUnit(unit) => {
                let id = match unit.id {
                    Some(id) => id,
                    None => {
                        let id = self.sequences.unit();
                        unit.id = Some(id);
                        id
                    }
                };
                self.pending
                    .push(PendingOperation::UpsertUnit(UnitRecord::from_unit(id, unit)));

                for translation in unit.translations.iter_mut() {
                    translation.trans_unit_id = Some(id);
                    self.stage_translation(translation)?;
                }
                Ok(())
            }
            StagedEntity::Translation(translation) => self.stage_translation(translation),
        }
    }

    fn stage_translation(&mut self, translation: &mut Translation) -> Result<(), StorageError> {
        if translation.trans_unit_id.is_none() {
            return Err(StorageError::Detached {
                kind: EntityKind::TransUnit,
            });
        }
        if translation.id.is_none() {
            translation.id = Some(self.sequences.translation());
        }
        self.pending
            .push(PendingOperation::UpsertTranslation(translation.clone()));
        Ok(())
    }

    pub(crate) fn remove(&mut self, entity: RemovedEntity<'_>) -> Result<(), StorageError> {
        let operation = removal(entity)?;
        self.pending.push(operation);
        Ok(())
    }

    pub(crate) fn stage_replace(
        &mut self,
        retired: &Translation,
        replacement: &mut Translation,
    ) -> Result<(), StorageError> {
        let retired_id = retired.id.ok_or(StorageError::Detached {
            kind: EntityKind::Translation,
        })?;
        replacement.id = Some(self.sequences.translation());
        replacement.trans_unit_id = retired.trans_unit_id;
        self.pending.push(PendingOperation::ReplaceTranslation {
            retired: retired_id,
            replacement: replacement.clone(),
        });
        Ok(())
    }

    /// Apply staged operations, handing the resulting tables to `persist`
    /// before they become the committed state.
    pub(crate) fn commit_with<F>(&mut self, persist: F) -> Result<usize, StorageError>
    where
        F: FnOnce(&Tables) -> Result<(), StorageError>,
    {
        let operations = mem::take(&mut self.pending);
        if operations.is_empty() {
            return Ok(0);
        }

        let count = operations.len();
        let mut next = self.tables.clone();
        for operation in operations {
            next.apply(operation)?;
        }
        persist(&next)?;

        self.tables = next;
        debug!("Committed {} staged operations", count);
        Ok(count)
    }

    /// Remove `entity` and commit it together with the staged operations.
    ///
    /// Unlike `commit_with`, a failure leaves the staged operations in place:
    /// the removal is dropped and the batch waits for its own commit.
    pub(crate) fn remove_with<F>(
        &mut self,
        entity: RemovedEntity<'_>,
        persist: F,
    ) -> Result<usize, StorageError>
    where
        F: FnOnce(&Tables) -> Result<(), StorageError>,
    {
        let operation = removal(entity)?;

        let mut next = self.tables.clone();
        for staged in &self.pending {
            next.apply(staged.clone())?;
        }
        next.apply(operation)?;
        persist(&next)?;

        let count = self.pending.len() + 1;
        self.pending.clear();
        self.tables = next;
        debug!("Committed removal with {} staged operations", count - 1);
        Ok(count)
    }

    /// Register a file, persisting the tables right away
    pub(crate) fn insert_file_with<F>(
        &mut self,
        naming: &FileNaming,
        path: &str,
        persist: F,
    ) -> Result<File, StorageError>
    where
        F: FnOnce(&Tables) -> Result<(), StorageError>,
    {
        let file = File {
            id: self.sequences.file(),
            domain: naming.domain.clone(),
            locale: naming.locale.clone(),
            extension: naming.extension.clone(),
            path: path.to_string(),
            name: naming.file_name(),
        };

        let mut next = self.tables.clone();
        next.insert_file(file.clone());
        persist(&next)?;

        self.tables = next;
        Ok(file)
    }
}

fn removal(entity: RemovedEntity<'_>) -> Result<PendingOperation, StorageError> {
    match entity {
        RemovedEntity::TransUnit(unit) => unit
            .id
            .map(PendingOperation::RemoveUnit)
            .ok_or(StorageError::Detached {
                kind: EntityKind::TransUnit,
            }),
        RemovedEntity::Translation(translation) => translation
            .id
            .map(PendingOperation::RemoveTranslation)
            .ok_or(StorageError::Detached {
                kind: EntityKind::Translation,
            }),
    }
}
