//! Committed entity tables.
//!
//! Units, translations and files live in separate id-keyed tables. A unit
//! record lists its translation ids in order; a translation points back at its
//! unit by id. `TransUnit` aggregates are hydrated from these tables on read.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::error::StorageError;
use super::traits::EntityKind;
use crate::domain::models::{File, FileId, TransUnit, Translation, TranslationId, UnitId};

/// Stored form of a trans unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    pub id: UnitId,
    pub domain: String,
    pub key: String,
    /// Ordered translation ids; the unit owns these translations
    pub translation_ids: Vec<TranslationId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UnitRecord {
    /// Record for a staged unit. Translation ids are maintained by the tables.
    pub(crate) fn from_unit(id: UnitId, unit: &TransUnit) -> Self {
        Self {
            id,
            domain: unit.domain.clone(),
            key: unit.key.clone(),
            translation_ids: Vec::new(),
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}

/// A write waiting for the next commit
#[derive(Debug, Clone)]
pub(crate) enum PendingOperation {
    UpsertUnit(UnitRecord),
    UpsertTranslation(Translation),
    RemoveUnit(UnitId),
    RemoveTranslation(TranslationId),
    ReplaceTranslation {
        retired: TranslationId,
        replacement: Translation,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Tables {
    units: BTreeMap<UnitId, UnitRecord>,
    translations: BTreeMap<TranslationId, Translation>,
    files: BTreeMap<FileId, File>,
}

impl Tables {
    /// Units in id order
    pub fn units(&self) -> impl Iterator<Item = &UnitRecord> + '_ {
        self.units.values()
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitRecord> {
        self.units.get(&id)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Translations in id order, which is insertion order
    pub fn translations(&self) -> impl Iterator<Item = &Translation> + '_ {
        self.translations.values()
    }

    pub fn translation(&self, id: TranslationId) -> Option<&Translation> {
        self.translations.get(&id)
    }

    /// A unit's translations in collection order
    pub fn translations_of<'a>(
        &'a self,
        unit: &'a UnitRecord,
    ) -> impl Iterator<Item = &'a Translation> + 'a {
        unit.translation_ids
            .iter()
            .filter_map(move |id| self.translations.get(id))
    }

    pub fn files(&self) -> impl Iterator<Item = &File> + '_ {
        self.files.values()
    }

    pub fn file(&self, id: FileId) -> Option<&File> {
        self.files.get(&id)
    }

    /// Build the unit aggregate with all of its translations
    pub fn hydrate(&self, id: UnitId) -> Option<TransUnit> {
        self.hydrate_with(id, |_| true)
    }

    /// Build the unit aggregate keeping only the translations `keep` accepts
    pub fn hydrate_with<F>(&self, id: UnitId, keep: F) -> Option<TransUnit>
    where
        F: Fn(&Translation) -> bool,
    {
        let record = self.units.get(&id)?;
        Some(TransUnit {
            id: Some(record.id),
            domain: record.domain.clone(),
            key: record.key.clone(),
            translations: self
                .translations_of(record)
                .filter(|translation| keep(translation))
                .cloned()
                .collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Highest ids in use, as (unit, translation, file)
    pub(crate) fn max_ids(&self) -> (u64, u64, u64) {
        (
            self.units.keys().next_back().map_or(0, |id| id.0),
            self.translations.keys().next_back().map_or(0, |id| id.0),
            self.files.keys().next_back().map_or(0, |id| id.0),
        )
    }

    pub(crate) fn insert_file(&mut self, file: File) {
        self.files.insert(file.id, file);
    }

    pub(crate) fn apply(&mut self, operation: PendingOperation) -> Result<(), StorageError> {
        match operation {
            PendingOperation::UpsertUnit(record) => {
                match self.units.get_mut(&record.id) {
                    Some(existing) => {
                        existing.domain = record.domain;
                        existing.key = record.key;
                        existing.updated_at = record.updated_at;
                    }
                    None => {
                        self.units.insert(
                            record.id,
                            UnitRecord {
                                translation_ids: Vec::new(),
                                ..record
                            },
                        );
                    }
                }
            }
            PendingOperation::UpsertTranslation(translation) => {
                let id = translation.id.ok_or(StorageError::Detached {
                    kind: EntityKind::Translation,
                })?;
                let unit_id = translation.trans_unit_id.ok_or(StorageError::Detached {
                    kind: EntityKind::TransUnit,
                })?;
                let unit = self.units.get_mut(&unit_id).ok_or(StorageError::MissingParent {
                    translation: id.0,
                    unit: unit_id.0,
                })?;

                let translations = &self.translations;
                let clash = unit
                    .translation_ids
                    .iter()
                    .filter(|other| **other != id)
                    .filter_map(|other| translations.get(other))
                    .any(|other| other.locale == translation.locale);
                if clash {
                    return Err(StorageError::DuplicateLocale {
                        unit: unit_id.0,
                        locale: translation.locale,
                    });
                }

                if !unit.translation_ids.contains(&id) {
                    unit.translation_ids.push(id);
                }
                self.translations.insert(id, translation);
            }
            PendingOperation::RemoveUnit(id) => {
                let record = self.units.remove(&id).ok_or(StorageError::UnknownEntity {
                    kind: EntityKind::TransUnit,
                    id: id.0,
                })?;
                for translation_id in &record.translation_ids {
                    self.translations.remove(translation_id);
                }
            }
            PendingOperation::RemoveTranslation(id) => {
                let translation =
                    self.translations
                        .remove(&id)
                        .ok_or(StorageError::UnknownEntity {
                            kind: EntityKind::Translation,
                            id: id.0,
                        })?;
                if let Some(unit) = translation
                    .trans_unit_id
                    .and_then(|unit_id| self.units.get_mut(&unit_id))
                {
                    unit.translation_ids.retain(|other| *other != id);
                }
            }
            PendingOperation::ReplaceTranslation {
                retired,
                mut replacement,
            } => {
                let new_id = replacement.id.ok_or(StorageError::Detached {
                    kind: EntityKind::Translation,
                })?;
                let old = self
                    .translations
                    .remove(&retired)
                    .ok_or(StorageError::UnknownEntity {
                        kind: EntityKind::Translation,
                        id: retired.0,
                    })?;
                let unit_id = old.trans_unit_id.ok_or(StorageError::Detached {
                    kind: EntityKind::TransUnit,
                })?;
                let unit = self.units.get_mut(&unit_id).ok_or(StorageError::MissingParent {
                    translation: new_id.0,
                    unit: unit_id.0,
                })?;

                match unit.translation_ids.iter().position(|id| *id == retired) {
                    Some(slot) => unit.translation_ids[slot] = new_id,
                    None => unit.translation_ids.push(new_id),
                }
                replacement.trans_unit_id = Some(unit_id);
                self.translations.insert(new_id, replacement);
            }
        }
        Ok(())
    }
}
