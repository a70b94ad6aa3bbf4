//! Inputs and results of the domain services.

use super::filters::UnitFilters;

/// A validated `list_units` request
#[derive(Debug, Clone, PartialEq)]
pub struct UnitListQuery {
    pub locales: Option<Vec<String>>,
    pub rows: u32,
    pub page: u32,
    pub filters: Option<UnitFilters>,
}

/// A (locale, domain) pair with at least one translation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocaleDomain {
    pub locale: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
}

/// Key to content mapping of one resource file, in translation insertion order.
///
/// A key seen twice keeps its first position and takes the later content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileTranslations {
    entries: Vec<(String, Option<String>)>,
}

impl FileTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, content: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((key, content)),
        }
    }

    /// `None` for an unknown key, `Some(None)` for a key without content
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, content)| content.as_deref())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
