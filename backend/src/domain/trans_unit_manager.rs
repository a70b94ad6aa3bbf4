//! Merge engine for trans units and their translations.
//!
//! Content imported from resource files is merged without overwriting
//! translations someone edited by hand. Writes are staged on the storage
//! gateway and only committed when the caller asks for a flush, except for
//! deletes and merge-mode replacements which commit right away.

use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use super::errors::TranslationError;
use super::file_resolver::{FileLocator, FileResolver};
use super::models::{File, FileNaming, TransUnit, Translation};
use crate::storage::error::StorageError;
use crate::storage::traits::{EntityKind, RemovedEntity, StagedEntity, TranslationStorage};

pub struct TransUnitManager<S: TranslationStorage, L: FileLocator> {
    storage: Arc<S>,
    file_resolver: FileResolver<L>,
    resources_dir: PathBuf,
}

impl<S: TranslationStorage, L: FileLocator> TransUnitManager<S, L> {
    pub fn new(
        storage: Arc<S>,
        file_resolver: FileResolver<L>,
        resources_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            file_resolver,
            resources_dir: resources_dir.into(),
        }
    }

    /// Build an unpersisted unit with one empty translation per locale
    pub fn new_instance<T: AsRef<str>>(&self, locales: &[T]) -> TransUnit {
        let mut unit = TransUnit::new("", "");
        for locale in locales {
            let locale = locale.as_ref();
            if !unit.has_translation(locale) {
                unit.translations.push(Translation::new(locale));
            }
        }

        debug!(
            "New {} instance with {} translations",
            self.storage.model_class_for(EntityKind::TransUnit),
            unit.translations.len()
        );
        unit
    }

    /// Create and stage a unit for `(domain, key)`
    pub fn create(&self, key: &str, domain: &str, flush: bool) -> Result<TransUnit, TranslationError> {
        info!("Creating trans unit: domain={}, key={}", domain, key);

        let mut unit = self.new_instance::<&str>(&[]);
        unit.key = key.to_string();
        unit.domain = domain.to_string();

        self.storage.stage(StagedEntity::TransUnit(&mut unit))?;
        if flush {
            self.storage.commit()?;
        }

        info!("Created trans unit {}", unit);
        Ok(unit)
    }

    /// Attach a new translation for `locale`. Existing translations are never
    /// touched: an already present locale returns `None`.
    pub fn add_translation(
        &self,
        unit: &mut TransUnit,
        locale: &str,
        content: &str,
        file: Option<&File>,
        flush: bool,
    ) -> Result<Option<Translation>, TranslationError> {
        if unit.has_translation(locale) {
            debug!("{} already has a '{}' translation", unit, locale);
            return Ok(None);
        }

        let mut translation = Translation::new(locale);
        translation.content = Some(content.to_string());
        translation.file_id = file.map(|file| file.id);
        translation.trans_unit_id = unit.id;
        unit.translations.push(translation);

        if let Err(e) = self.stage_last_translation(unit) {
            unit.translations.pop();
            return Err(e.into());
        }
        if flush {
            self.storage.commit()?;
        }

        debug!("Added '{}' translation to {}", locale, unit);
        Ok(unit.translations.last().cloned())
    }

    fn stage_last_translation(&self, unit: &mut TransUnit) -> Result<(), StorageError> {
        if unit.id.is_none() {
            return self.storage.stage(StagedEntity::TransUnit(unit));
        }
        match unit.translations.last_mut() {
            Some(translation) => self.storage.stage(StagedEntity::Translation(translation)),
            None => Ok(()),
        }
    }

    /// Change the content of the existing `locale` translation.
    ///
    /// In merge mode a manually modified translation, or one already holding
    /// `content`, is left alone and `None` is returned. Otherwise the stored
    /// record is retired and replaced by a fresh one in the same slot.
    pub fn update_translation(
        &self,
        unit: &mut TransUnit,
        locale: &str,
        content: &str,
        flush: bool,
        merge: bool,
    ) -> Result<Option<Translation>, TranslationError> {
        let updated = match unit.position_of(locale) {
            None => {
                debug!("{} has no '{}' translation to update", unit, locale);
                None
            }
            Some(index) if merge => {
                let existing = &unit.translations[index];
                if existing.modified_manually || existing.content.as_deref() == Some(content) {
                    debug!("Keeping '{}' translation of {} as is", locale, unit);
                    return Ok(None);
                }
                Some(self.replace_translation(unit, index, content)?)
            }
            Some(index) => Some(self.overwrite_translation(unit, index, content)?),
        };

        if flush {
            self.storage.commit()?;
        }
        Ok(updated)
    }

    fn overwrite_translation(
        &self,
        unit: &mut TransUnit,
        index: usize,
        content: &str,
    ) -> Result<Translation, StorageError> {
        let unit_id = unit.id;
        let translation = &mut unit.translations[index];
        translation.set_content(content);

        if unit_id.is_none() {
            self.storage.stage(StagedEntity::TransUnit(unit))?;
        } else {
            if translation.trans_unit_id.is_none() {
                translation.trans_unit_id = unit_id;
            }
            self.storage.stage(StagedEntity::Translation(translation))?;
        }
        Ok(unit.translations[index].clone())
    }

    fn replace_translation(
        &self,
        unit: &mut TransUnit,
        index: usize,
        content: &str,
    ) -> Result<Translation, StorageError> {
        // Nothing stored yet, so there is no record to retire
        if unit.translations[index].id.is_none() {
            return self.overwrite_translation(unit, index, content);
        }

        let mut replacement = unit.translations[index].replacement(content);
        self.storage
            .replace_translation(&unit.translations[index], &mut replacement)?;

        info!(
            "Replaced '{}' translation of {} with record {:?}",
            replacement.locale, unit, replacement.id
        );
        unit.translations[index] = replacement.clone();
        Ok(replacement)
    }

    /// Apply edited contents keyed by locale, flagging genuinely changed or
    /// added translations as manually modified. Blank contents are skipped.
    pub fn update_translations_content<I, K, V>(
        &self,
        unit: &mut TransUnit,
        translations: I,
        flush: bool,
    ) -> Result<(), TranslationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (locale, content) in translations {
            let (locale, content) = (locale.as_ref(), content.as_ref());
            if content.trim().is_empty() {
                debug!("Skipping blank '{}' content for {}", locale, unit);
                continue;
            }

            let changed = match unit.translation(locale) {
                Some(existing) => {
                    let original = existing.content.clone();
                    self.update_translation(unit, locale, content, false, false)?
                        .map_or(false, |updated| updated.content != original)
                }
                None => {
                    let file = self.translation_file(unit, locale)?;
                    self.add_translation(unit, locale, content, file.as_ref(), false)?
                        .is_some()
                }
            };

            if changed {
                if let Some(translation) = unit.translation_mut(locale) {
                    translation.modified_manually = true;
                    self.storage.stage(StagedEntity::Translation(translation))?;
                }
            }
        }

        if flush {
            self.storage.commit()?;
        }
        Ok(())
    }

    /// The file a new `locale` translation of `unit` belongs in, derived from
    /// the first translation of the unit that references a file.
    pub fn translation_file(
        &self,
        unit: &TransUnit,
        locale: &str,
    ) -> Result<Option<File>, TranslationError> {
        let mut reference = None;
        for file_id in unit.translations.iter().filter_map(|t| t.file_id) {
            reference = self.file_resolver.find(file_id)?;
            if reference.is_some() {
                break;
            }
        }

        let Some(reference) = reference else {
            return Ok(None);
        };

        let naming = FileNaming {
            locale: locale.to_string(),
            ..reference.naming()
        };
        let base_dir = self.resources_dir.join(&reference.path);
        Ok(Some(self.file_resolver.resolve(&naming, &base_dir)?))
    }

    /// Remove the unit and its translations. Returns false if storage failed.
    pub fn delete(&self, unit: &TransUnit) -> bool {
        match self.storage.remove_now(RemovedEntity::TransUnit(unit)) {
            Ok(()) => {
                info!("Deleted trans unit {}", unit);
                true
            }
            Err(e) => {
                warn!("Failed to delete trans unit {}: {}", unit, e);
                false
            }
        }
    }

    /// Remove the `locale` translation. Returns false if there is none or
    /// storage failed.
    pub fn delete_translation(&self, unit: &mut TransUnit, locale: &str) -> bool {
        let outcome = match unit.translation(locale) {
            Some(translation) => self
                .storage
                .remove_now(RemovedEntity::Translation(translation)),
            None => {
                warn!("{} has no '{}' translation to delete", unit, locale);
                return false;
            }
        };

        match outcome {
            Ok(()) => {
                unit.translations.retain(|t| t.locale != locale);
                info!("Deleted '{}' translation of {}", locale, unit);
                true
            }
            Err(e) => {
                warn!("Failed to delete '{}' translation of {}: {}", locale, unit, e);
                false
            }
        }
    }
}
