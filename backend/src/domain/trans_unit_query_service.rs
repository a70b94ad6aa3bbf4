//! Read-only queries over committed trans units.
//!
//! `list_units` and `count` work in two phases: unit ids are selected, sorted
//! and paginated first, then only the selected units are hydrated.

use log::{debug, info};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::commands::{DomainCount, FileTranslations, LocaleDomain};
use super::errors::QueryError;
use super::filters::{SortColumn, SortOrder, UnitFilters};
use super::models::{FileId, TransUnit, UnitId};
use crate::storage::tables::{Tables, UnitRecord};
use crate::storage::traits::TranslationStorage;

pub struct TransUnitQueryService<S: TranslationStorage> {
    storage: Arc<S>,
}

impl<S: TranslationStorage> TransUnitQueryService<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Distinct (locale, domain) pairs with at least one translation
    pub fn domains_by_locale(&self) -> Result<Vec<LocaleDomain>, QueryError> {
        let pairs = self.storage.read(|tables| {
            let mut pairs = BTreeSet::new();
            for unit in tables.units() {
                for translation in tables.translations_of(unit) {
                    pairs.insert(LocaleDomain {
                        locale: translation.locale.clone(),
                        domain: unit.domain.clone(),
                    });
                }
            }
            pairs.into_iter().collect::<Vec<_>>()
        })?;

        debug!("Found {} locale/domain pairs", pairs.len());
        Ok(pairs)
    }

    /// Units of `domain` translated into `locale`, with all their translations
    pub fn units_by_locale_and_domain(
        &self,
        locale: &str,
        domain: &str,
    ) -> Result<Vec<TransUnit>, QueryError> {
        let units = self.storage.read(|tables| {
            tables
                .units()
                .filter(|unit| unit.domain == domain)
                .filter(|unit| tables.translations_of(unit).any(|t| t.locale == locale))
                .filter_map(|unit| tables.hydrate(unit.id))
                .collect::<Vec<_>>()
        })?;

        debug!("Found {} units for {}/{}", units.len(), locale, domain);
        Ok(units)
    }

    /// Distinct domains, ascending
    pub fn all_domains(&self) -> Result<Vec<String>, QueryError> {
        Ok(self.storage.read(|tables| {
            tables
                .units()
                .map(|unit| unit.domain.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })?)
    }

    /// One page of units matching `filters`.
    ///
    /// With `locales`, only units translated into at least one of them are
    /// listed, and only those translations are attached.
    pub fn list_units(
        &self,
        locales: Option<&[String]>,
        rows: u32,
        page: u32,
        filters: Option<&UnitFilters>,
    ) -> Result<Vec<TransUnit>, QueryError> {
        if rows < 1 || page < 1 {
            return Err(QueryError::InvalidPagination { rows, page });
        }
        info!(
            "Listing trans units: locales={:?}, rows={}, page={}",
            locales, rows, page
        );

        let offset = (rows as usize).saturating_mul(page as usize - 1);
        let units = self.storage.read(|tables| {
            let mut selected = select_units(tables, locales, filters);
            let (column, order) = filters
                .map(|f| (f.sort_column, f.sort_order))
                .unwrap_or_default();
            selected.sort_by(|a, b| compare_units(a, b, column, order));

            selected
                .into_iter()
                .skip(offset)
                .take(rows as usize)
                .filter_map(|unit| {
                    tables.hydrate_with(unit.id, |translation| {
                        locales.map_or(true, |locales| {
                            locales.iter().any(|locale| *locale == translation.locale)
                        })
                    })
                })
                .collect::<Vec<_>>()
        })?;

        info!("Found {} trans units on page {}", units.len(), page);
        Ok(units)
    }

    /// Number of units `list_units` would page through
    pub fn count(
        &self,
        locales: Option<&[String]>,
        filters: Option<&UnitFilters>,
    ) -> Result<usize, QueryError> {
        Ok(self
            .storage
            .read(|tables| select_units(tables, locales, filters).len())?)
    }

    /// Unit count per domain, ordered by domain
    pub fn count_by_domain(&self) -> Result<Vec<DomainCount>, QueryError> {
        Ok(self.storage.read(|tables| {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for unit in tables.units() {
                *counts.entry(unit.domain.as_str()).or_default() += 1;
            }
            counts
                .into_iter()
                .map(|(domain, count)| DomainCount {
                    domain: domain.to_string(),
                    count,
                })
                .collect()
        })?)
    }

    /// Key to content pairs of the translations stored in a file. With
    /// `only_updated`, only translations edited since they were created.
    pub fn translations_for_file(
        &self,
        file_id: FileId,
        only_updated: bool,
    ) -> Result<FileTranslations, QueryError> {
        let translations = self.storage.read(|tables| {
            let mut translations = FileTranslations::new();
            let in_file = tables
                .translations()
                .filter(|t| t.file_id == Some(file_id))
                .filter(|t| !only_updated || t.is_updated_since_creation());

            for translation in in_file {
                let unit = translation.trans_unit_id.and_then(|id| tables.unit(id));
                if let Some(unit) = unit {
                    translations.insert(unit.key.clone(), translation.content.clone());
                }
            }
            translations
        })?;

        debug!("File {} has {} translations", file_id, translations.len());
        Ok(translations)
    }

    pub fn find(&self, id: UnitId) -> Result<Option<TransUnit>, QueryError> {
        Ok(self.storage.read(|tables| tables.hydrate(id))?)
    }

    pub fn find_by_key_and_domain(
        &self,
        key: &str,
        domain: &str,
    ) -> Result<Option<TransUnit>, QueryError> {
        Ok(self.storage.read(|tables| {
            tables
                .units()
                .find(|unit| unit.key == key && unit.domain == domain)
                .and_then(|unit| tables.hydrate(unit.id))
        })?)
    }
}

/// Units passing the unit filters and, when `locales` is given, the
/// translation filters. No match means an empty selection, never an
/// unfiltered one.
fn select_units<'a>(
    tables: &'a Tables,
    locales: Option<&[String]>,
    filters: Option<&UnitFilters>,
) -> Vec<&'a UnitRecord> {
    tables
        .units()
        .filter(|unit| filters.map_or(true, |filters| matches_unit_filters(unit, filters)))
        .filter(|unit| {
            locales.map_or(true, |locales| {
                matches_translation_filters(tables, unit, locales, filters)
            })
        })
        .collect()
}

fn matches_unit_filters(unit: &UnitRecord, filters: &UnitFilters) -> bool {
    let domain_ok = filters
        .domain_filter()
        .map_or(true, |needle| contains_ignore_case(&unit.domain, needle));
    let key_ok = filters
        .key_filter()
        .map_or(true, |needle| contains_ignore_case(&unit.key, needle));
    domain_ok && key_ok
}

fn matches_translation_filters(
    tables: &Tables,
    unit: &UnitRecord,
    locales: &[String],
    filters: Option<&UnitFilters>,
) -> bool {
    let translated = tables
        .translations_of(unit)
        .any(|t| locales.iter().any(|locale| *locale == t.locale));
    if !translated {
        return false;
    }

    // Content filters AND together across locales
    locales.iter().all(|locale| {
        match filters.and_then(|filters| filters.content_for(locale)) {
            None => true,
            Some(needle) => tables.translations_of(unit).any(|t| {
                t.locale == *locale
                    && t.content
                        .as_deref()
                        .map_or(false, |content| contains_ignore_case(content, needle))
            }),
        }
    })
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn compare_units(a: &UnitRecord, b: &UnitRecord, column: SortColumn, order: SortOrder) -> Ordering {
    let ordering = match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Domain => a.domain.cmp(&b.domain),
        SortColumn::Key => a.key.cmp(&b.key),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        SortColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    let ordering = match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    };
    ordering.then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Translation;
    use crate::storage::traits::StagedEntity;
    use crate::storage::InMemoryStorage;

    fn seed(storage: &InMemoryStorage, domain: &str, key: &str, contents: &[(&str, &str)]) -> TransUnit {
        let mut unit = TransUnit::new(domain, key);
        for (locale, content) in contents {
            let mut translation = Translation::new(*locale);
            translation.content = Some(content.to_string());
            unit.translations.push(translation);
        }
        storage.stage(StagedEntity::TransUnit(&mut unit)).unwrap();
        storage.commit().unwrap();
        unit
    }

    fn service() -> (Arc<InMemoryStorage>, TransUnitQueryService<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        (storage.clone(), TransUnitQueryService::new(storage))
    }

    fn locales(list: &[&str]) -> Vec<String> {
        list.iter().map(|l| l.to_string()).collect()
    }

    fn keys(units: &[TransUnit]) -> Vec<&str> {
        units.iter().map(|u| u.key.as_str()).collect()
    }

    #[test]
    fn test_all_domains_is_distinct_and_sorted() {
        let (storage, service) = service();
        seed(&storage, "b", "one", &[]);
        seed(&storage, "a", "two", &[]);
        seed(&storage, "b", "three", &[]);

        assert_eq!(service.all_domains().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_domains_by_locale_needs_a_translation() {
        let (storage, service) = service();
        seed(&storage, "messages", "hello", &[("fr", "Salut"), ("en", "Hi")]);
        seed(&storage, "admin", "save", &[("en", "Save")]);
        seed(&storage, "empty", "nothing", &[]);

        let pairs: Vec<(String, String)> = service
            .domains_by_locale()
            .unwrap()
            .into_iter()
            .map(|p| (p.locale, p.domain))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("en".to_string(), "admin".to_string()),
                ("en".to_string(), "messages".to_string()),
                ("fr".to_string(), "messages".to_string()),
            ]
        );
    }

    #[test]
    fn test_units_by_locale_and_domain_keep_all_translations() {
        let (storage, service) = service();
        seed(&storage, "messages", "hello", &[("en", "Hi"), ("fr", "Salut")]);
        seed(&storage, "messages", "bye", &[("fr", "Au revoir")]);
        seed(&storage, "admin", "save", &[("en", "Save")]);

        let units = service.units_by_locale_and_domain("en", "messages").unwrap();
        assert_eq!(keys(&units), vec!["hello"]);
        assert_eq!(units[0].locales(), vec!["en", "fr"]);
    }

    #[test]
    fn test_search_flag_gates_domain_and_key_filters() {
        let (storage, service) = service();
        seed(&storage, "bar", "hello", &[("en", "Hi")]);

        let mut filters = UnitFilters {
            domain: Some("foo".to_string()),
            ..Default::default()
        };
        assert_eq!(keys(&service.list_units(None, 10, 1, Some(&filters)).unwrap()), vec!["hello"]);
        assert_eq!(service.count(None, Some(&filters)).unwrap(), 1);

        filters.search = true;
        assert!(service.list_units(None, 10, 1, Some(&filters)).unwrap().is_empty());
        assert_eq!(service.count(None, Some(&filters)).unwrap(), 0);
    }

    #[test]
    fn test_domain_and_key_filters_match_substrings() {
        let (storage, service) = service();
        seed(&storage, "messages", "user.greeting", &[]);
        seed(&storage, "messages", "user.farewell", &[]);
        seed(&storage, "validators", "user.email", &[]);

        let filters = UnitFilters {
            search: true,
            domain: Some("MESS".to_string()),
            key: Some("user".to_string()),
            ..Default::default()
        };
        let units = service.list_units(None, 10, 1, Some(&filters)).unwrap();
        assert_eq!(keys(&units), vec!["user.greeting", "user.farewell"]);
    }

    #[test]
    fn test_unmatched_content_filter_forces_empty_result() {
        let (storage, service) = service();
        seed(&storage, "messages", "hello", &[("en", "Hi")]);
        seed(&storage, "messages", "bye", &[("en", "Bye")]);

        let mut filters = UnitFilters::default();
        filters.content.insert("en".to_string(), "zzz-no-match".to_string());
        let en = locales(&["en"]);

        assert!(service.list_units(Some(&en), 10, 1, Some(&filters)).unwrap().is_empty());
        assert_eq!(service.count(Some(&en), Some(&filters)).unwrap(), 0);
    }

    #[test]
    fn test_content_filters_and_across_locales() {
        let (storage, service) = service();
        seed(&storage, "messages", "hello", &[("en", "Hello"), ("fr", "Bonjour")]);
        seed(&storage, "messages", "hi", &[("en", "Hello there"), ("fr", "Salut")]);

        let mut filters = UnitFilters::default();
        filters.content.insert("en".to_string(), "hello".to_string());
        filters.content.insert("fr".to_string(), "jour".to_string());
        let both = locales(&["en", "fr"]);

        let units = service.list_units(Some(&both), 10, 1, Some(&filters)).unwrap();
        assert_eq!(keys(&units), vec!["hello"]);
        assert_eq!(service.count(Some(&both), Some(&filters)).unwrap(), 1);
    }

    #[test]
    fn test_content_filter_for_unrequested_locale_is_ignored() {
        let (storage, service) = service();
        seed(&storage, "messages", "hello", &[("en", "Hi"), ("fr", "Salut")]);

        let mut filters = UnitFilters::default();
        filters.content.insert("fr".to_string(), "zzz".to_string());
        let en = locales(&["en"]);
        assert_eq!(service.count(Some(&en), Some(&filters)).unwrap(), 1);
    }

    #[test]
    fn test_locales_restrict_units_and_hydrated_translations() {
        let (storage, service) = service();
        seed(&storage, "messages", "hello", &[("en", "Hi"), ("fr", "Salut"), ("de", "Hallo")]);
        seed(&storage, "messages", "only_de", &[("de", "Nur")]);
        seed(&storage, "messages", "untranslated", &[]);

        let requested = locales(&["en", "fr"]);
        let units = service.list_units(Some(&requested), 10, 1, None).unwrap();
        assert_eq!(keys(&units), vec!["hello"]);
        assert_eq!(units[0].locales(), vec!["en", "fr"]);

        let all = service.list_units(None, 10, 1, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].locales(), vec!["en", "fr", "de"]);
    }

    #[test]
    fn test_sorting_and_pagination() {
        let (storage, service) = service();
        seed(&storage, "b", "beta", &[]);
        seed(&storage, "a", "alpha", &[]);
        seed(&storage, "b", "gamma", &[]);
        seed(&storage, "a", "delta", &[]);

        let by_key_desc = UnitFilters {
            sort_column: SortColumn::Key,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let page_one = service.list_units(None, 3, 1, Some(&by_key_desc)).unwrap();
        assert_eq!(keys(&page_one), vec!["gamma", "delta", "beta"]);
        let page_two = service.list_units(None, 3, 2, Some(&by_key_desc)).unwrap();
        assert_eq!(keys(&page_two), vec!["alpha"]);
        assert!(service.list_units(None, 3, 3, Some(&by_key_desc)).unwrap().is_empty());

        // Equal domains fall back to id order
        let by_domain = UnitFilters {
            sort_column: SortColumn::Domain,
            ..Default::default()
        };
        let units = service.list_units(None, 10, 1, Some(&by_domain)).unwrap();
        assert_eq!(keys(&units), vec!["alpha", "delta", "beta", "gamma"]);

        let by_id = service.list_units(None, 10, 1, None).unwrap();
        assert_eq!(keys(&by_id), vec!["beta", "alpha", "gamma", "delta"]);
    }

    #[test]
    fn test_pagination_must_start_at_one() {
        let (_storage, service) = service();
        assert!(matches!(
            service.list_units(None, 0, 1, None),
            Err(QueryError::InvalidPagination { rows: 0, page: 1 })
        ));
        assert!(matches!(
            service.list_units(None, 10, 0, None),
            Err(QueryError::InvalidPagination { rows: 10, page: 0 })
        ));
    }

    #[test]
    fn test_count_by_domain() {
        let (storage, service) = service();
        seed(&storage, "validators", "email", &[]);
        seed(&storage, "messages", "hello", &[("en", "Hi")]);
        seed(&storage, "messages", "bye", &[]);

        let counts: Vec<(String, usize)> = service
            .count_by_domain()
            .unwrap()
            .into_iter()
            .map(|c| (c.domain, c.count))
            .collect();
        assert_eq!(
            counts,
            vec![("messages".to_string(), 2), ("validators".to_string(), 1)]
        );
    }

    #[test]
    fn test_translations_for_file() {
        let (storage, service) = service();
        let file = FileId(1);
        let mut first = seed(&storage, "messages", "hello", &[("en", "Hi")]);
        let mut second = seed(&storage, "messages", "bye", &[("en", "Bye")]);
        seed(&storage, "messages", "elsewhere", &[("en", "Other")]);

        first.translations[0].file_id = Some(file);
        second.translations[0].file_id = Some(file);
        storage.stage(StagedEntity::TransUnit(&mut first)).unwrap();
        storage.stage(StagedEntity::TransUnit(&mut second)).unwrap();
        storage.commit().unwrap();

        let all = service.translations_for_file(file, false).unwrap();
        assert_eq!(all.keys(), vec!["hello", "bye"]);
        assert_eq!(all.get("hello"), Some(Some("Hi")));
        assert!(service.translations_for_file(file, true).unwrap().is_empty());

        first.translations[0].set_content("Hello");
        storage.stage(StagedEntity::TransUnit(&mut first)).unwrap();
        storage.commit().unwrap();

        let updated = service.translations_for_file(file, true).unwrap();
        assert_eq!(updated.keys(), vec!["hello"]);
        assert_eq!(updated.get("hello"), Some(Some("Hello")));
    }

    #[test]
    fn test_find_by_key_and_domain() {
        let (storage, service) = service();
        let unit = seed(&storage, "messages", "hello", &[("en", "Hi")]);

        let found = service.find_by_key_and_domain("hello", "messages").unwrap().unwrap();
        assert_eq!(found, unit);
        assert_eq!(service.find(unit.id.unwrap()).unwrap(), Some(unit));
        assert!(service.find_by_key_and_domain("hello", "admin").unwrap().is_none());
    }
}
