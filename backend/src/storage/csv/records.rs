//! Row layouts of the CSV tables.
//!
//! Translations are written grouped by unit, in each unit's collection order,
//! so re-reading them in file order rebuilds that order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{File, FileId, Translation, TranslationId, UnitId};
use crate::storage::tables::UnitRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRow {
    pub id: u64,
    pub domain: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UnitRecord> for UnitRow {
    fn from(record: &UnitRecord) -> Self {
        Self {
            id: record.id.0,
            domain: record.domain.clone(),
            key: record.key.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<UnitRow> for UnitRecord {
    fn from(row: UnitRow) -> Self {
        Self {
            id: UnitId(row.id),
            domain: row.domain,
            key: row.key,
            translation_ids: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRow {
    pub id: u64,
    pub trans_unit_id: u64,
    pub locale: String,
    /// Empty cell for no content
    pub content: Option<String>,
    pub file_id: Option<u64>,
    pub modified_manually: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslationRow {
    /// Only committed translations have both ids
    pub fn from_translation(translation: &Translation) -> Option<Self> {
        Some(Self {
            id: translation.id?.0,
            trans_unit_id: translation.trans_unit_id?.0,
            locale: translation.locale.clone(),
            content: translation.content.clone(),
            file_id: translation.file_id.map(|id| id.0),
            modified_manually: translation.modified_manually,
            created_at: translation.created_at,
            updated_at: translation.updated_at,
        })
    }
}

impl From<TranslationRow> for Translation {
    fn from(row: TranslationRow) -> Self {
        Self {
            id: Some(TranslationId(row.id)),
            trans_unit_id: Some(UnitId(row.trans_unit_id)),
            locale: row.locale,
            content: row.content,
            file_id: row.file_id.map(FileId),
            modified_manually: row.modified_manually,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRow {
    pub id: u64,
    pub domain: String,
    pub locale: String,
    pub extension: String,
    pub path: String,
    pub name: String,
}

impl From<&File> for FileRow {
    fn from(file: &File) -> Self {
        Self {
            id: file.id.0,
            domain: file.domain.clone(),
            locale: file.locale.clone(),
            extension: file.extension.clone(),
            path: file.path.clone(),
            name: file.name.clone(),
        }
    }
}

impl From<FileRow> for File {
    fn from(row: FileRow) -> Self {
        Self {
            id: FileId(row.id),
            domain: row.domain,
            locale: row.locale,
            extension: row.extension,
            path: row.path,
            name: row.name,
        }
    }
}
