//! Domain model for a single locale's translation of a trans unit.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::file::FileId;
use super::trans_unit::UnitId;

/// Storage identity of a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationId(pub u64);

impl fmt::Display for TranslationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One locale's content for a trans unit.
///
/// The unit is referenced by id only; the unit aggregate owns the translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// `None` until the translation is staged
    pub id: Option<TranslationId>,
    pub trans_unit_id: Option<UnitId>,
    pub locale: String,
    pub content: Option<String>,
    /// Weak reference to the resource file this translation was imported from
    pub file_id: Option<FileId>,
    pub modified_manually: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Translation {
    /// Create an empty translation for a locale
    pub fn new(locale: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            trans_unit_id: None,
            locale: locale.into(),
            content: None,
            file_id: None,
            modified_manually: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the content, refreshing `updated_at` when it actually changes.
    ///
    /// Returns true if the content changed.
    pub fn set_content(&mut self, content: &str) -> bool {
        if self.content.as_deref() == Some(content) {
            return false;
        }
        self.content = Some(content.to_string());
        self.touch();
        true
    }

    /// Move `updated_at` forward. Always strictly later than the previous value,
    /// even when the clock has not advanced.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// True once the translation was edited after it was created or imported
    pub fn is_updated_since_creation(&self) -> bool {
        self.updated_at > self.created_at
    }

    /// Build the record that supersedes this one with new content.
    ///
    /// Non-identity fields carry over; identity and timestamps start fresh.
    pub fn replacement(&self, content: &str) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            trans_unit_id: self.trans_unit_id,
            locale: self.locale.clone(),
            content: Some(content.to_string()),
            file_id: self.file_id,
            modified_manually: self.modified_manually,
            created_at: now,
            updated_at: now,
        }
    }
}
