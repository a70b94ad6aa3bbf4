//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! Writes go through a unit of work: entities are *staged* and only become
//! visible to readers on `commit`. Reads always see committed state.

use std::fmt;

use super::error::StorageError;
use super::tables::Tables;
use crate::domain::models::{File, FileId, FileNaming, TransUnit, Translation};

/// Entity kinds a gateway stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    TransUnit,
    Translation,
    File,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::TransUnit => "trans unit",
            EntityKind::Translation => "translation",
            EntityKind::File => "file",
        };
        f.write_str(name)
    }
}

/// An entity handed to `stage`. Staging assigns ids to entities that have none.
#[derive(Debug)]
pub enum StagedEntity<'a> {
    /// Stages the unit and, cascading, every translation it holds
    TransUnit(&'a mut TransUnit),
    /// Stages a single translation; its `trans_unit_id` must be set
    Translation(&'a mut Translation),
}

/// An entity handed to `remove`
#[derive(Debug, Clone, Copy)]
pub enum RemovedEntity<'a> {
    /// Removes the unit and, cascading, its translations
    TransUnit(&'a TransUnit),
    Translation(&'a Translation),
}

/// Trait defining the storage gateway for trans units and translations
///
/// Backends only decide where committed tables live; staging, validation and
/// id allocation behave the same everywhere.
pub trait TranslationStorage: Send + Sync {
    /// Backend-specific model identifier for an entity kind
    fn model_class_for(&self, kind: EntityKind) -> &'static str;

    /// Stage an insert or update for the next commit
    fn stage(&self, entity: StagedEntity<'_>) -> Result<(), StorageError>;

    /// Stage a removal for the next commit
    fn remove(&self, entity: RemovedEntity<'_>) -> Result<(), StorageError>;

    /// Remove `entity` and commit right away together with anything already
    /// staged. If that fails, nothing is applied and the staged operations
    /// are kept for a later commit.
    fn remove_now(&self, entity: RemovedEntity<'_>) -> Result<(), StorageError>;

    /// Retire `retired` and insert `replacement` in its slot, committing
    /// immediately together with anything already staged.
    ///
    /// `replacement` receives a fresh id.
    fn replace_translation(
        &self,
        retired: &Translation,
        replacement: &mut Translation,
    ) -> Result<(), StorageError>;

    /// Apply every staged operation atomically. On failure nothing is applied
    /// and the staged operations are discarded.
    fn commit(&self) -> Result<(), StorageError>;

    /// Run a read against the committed tables
    fn read<R, F>(&self, reader: F) -> Result<R, StorageError>
    where
        F: FnOnce(&Tables) -> R,
        Self: Sized;
}

/// Trait defining the interface for resource file storage operations
pub trait FileStorage: Send + Sync {
    fn find_file(&self, id: FileId) -> Result<Option<File>, StorageError>;

    /// Look up a file by its relative directory and file name
    fn find_file_by_location(&self, path: &str, name: &str) -> Result<Option<File>, StorageError>;

    /// Register a file. Takes effect immediately, outside the unit of work.
    fn insert_file(&self, naming: &FileNaming, path: &str) -> Result<File, StorageError>;
}
