//! Domain model for a trans unit: a (domain, key) pair and its translations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::translation::Translation;

/// Storage identity of a trans unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A translatable string and its per-locale translations.
///
/// Holds at most one translation per locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransUnit {
    /// `None` until the unit is staged
    pub id: Option<UnitId>,
    pub domain: String,
    pub key: String,
    pub translations: Vec<Translation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransUnit {
    pub fn new(domain: impl Into<String>, key: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            domain: domain.into(),
            key: key.into(),
            translations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_translation(&self, locale: &str) -> bool {
        self.position_of(locale).is_some()
    }

    pub fn translation(&self, locale: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.locale == locale)
    }

    pub fn translation_mut(&mut self, locale: &str) -> Option<&mut Translation> {
        self.translations.iter_mut().find(|t| t.locale == locale)
    }

    /// Index of the translation for `locale` in the ordered collection
    pub fn position_of(&self, locale: &str) -> Option<usize> {
        self.translations.iter().position(|t| t.locale == locale)
    }

    pub fn locales(&self) -> Vec<&str> {
        self.translations.iter().map(|t| t.locale.as_str()).collect()
    }
}

impl fmt::Display for TransUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{} {}/{}", id, self.domain, self.key),
            None => write!(f, "(new) {}/{}", self.domain, self.key),
        }
    }
}
