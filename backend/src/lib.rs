//! # Translation Unit Backend
//!
//! Synchronization and query core for localized text resources. A trans unit
//! is a `(domain, key)` pair carrying one translation per locale; translations
//! imported from resource files are merged without clobbering manual edits.
//!
//! - [`domain`]: merge engine, query engine and file resolution
//! - [`storage`]: gateway traits with in-memory and CSV backends
//! - [`io`]: mapping to the `shared` DTOs
//! - [`config`]: YAML configuration
//!
//! The crate logs through the `log` facade and installs no logger itself.

use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

pub use config::TranslationConfig;
pub use storage::{CsvConnection, CsvStorage};

use domain::models::{FileId, TransUnit};
use domain::{FileManager, FileResolver, QueryError, TransUnitManager, TransUnitQueryService};
use io::mappers::{FileMapper, TransUnitMapper, UnitListMapper};
use shared::{
    DomainCount, File, LocaleDomain, TransUnit as TransUnitDto, UnitListRequest, UnitListResponse,
};
use storage::FileStorage;

/// Main backend struct wiring the CSV gateway into the domain services
pub struct Backend {
    pub config: TranslationConfig,
    pub storage: Arc<CsvStorage>,
    pub trans_unit_manager: TransUnitManager<CsvStorage, FileManager<CsvStorage>>,
    pub query_service: TransUnitQueryService<CsvStorage>,
}

impl Backend {
    /// Create a backend over the directories named in `config`
    pub fn from_config(config: TranslationConfig) -> Result<Self> {
        let connection = CsvConnection::new(&config.data_directory).with_context(|| {
            format!("Failed to prepare data directory {:?}", config.data_directory)
        })?;
        let storage = Arc::new(
            CsvStorage::open(connection).context("Failed to load translation tables")?,
        );

        let file_resolver = FileResolver::new(FileManager::new(
            storage.clone(),
            config.resources_directory.clone(),
        ));
        let trans_unit_manager = TransUnitManager::new(
            storage.clone(),
            file_resolver,
            config.resources_directory.clone(),
        );
        let query_service = TransUnitQueryService::new(storage.clone());

        info!(
            "Backend ready: data={:?}, resources={:?}",
            config.data_directory, config.resources_directory
        );
        Ok(Self {
            config,
            storage,
            trans_unit_manager,
            query_service,
        })
    }

    /// Load the config file at `config_path` and create the backend from it
    pub fn open(config_path: &Path) -> Result<Self> {
        let config = TranslationConfig::load(config_path)?;
        let base = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::from_config(config.resolved_against(base))
    }

    /// The stored unit for `(domain, key)`, created and committed on first use
    pub fn trans_unit_for(&self, domain: &str, key: &str) -> Result<TransUnit> {
        if let Some(unit) = self.query_service.find_by_key_and_domain(key, domain)? {
            return Ok(unit);
        }
        Ok(self.trans_unit_manager.create(key, domain, true)?)
    }

    /// First page over the managed locales with the configured page size
    pub fn default_list_request(&self) -> UnitListRequest {
        UnitListRequest {
            locales: Some(self.config.managed_locales.clone()),
            rows: self.config.default_page_size,
            page: 1,
            filters: None,
        }
    }

    /// Answer a front-end listing request with one page and the total count
    pub fn list_trans_units(
        &self,
        request: &UnitListRequest,
    ) -> Result<UnitListResponse, QueryError> {
        let query = UnitListMapper::to_query(request)?;
        let locales = query.locales.as_deref();
        let filters = query.filters.as_ref();

        let units = self
            .query_service
            .list_units(locales, query.rows, query.page, filters)?;
        let total = self.query_service.count(locales, filters)?;

        Ok(UnitListMapper::to_response(units, total))
    }

    /// Save the contents edited in the grid for one row, flagging changed
    /// translations as manual edits
    pub fn save_edited_row(
        &self,
        row: TransUnitDto,
        contents: &BTreeMap<String, String>,
    ) -> Result<TransUnitDto> {
        let mut unit = TransUnitMapper::to_domain(row)?;
        if unit.id.is_none() {
            anyhow::bail!("Cannot save edits for unsaved trans unit {}", unit);
        }
        self.trans_unit_manager
            .update_translations_content(&mut unit, contents, true)
            .with_context(|| format!("Failed to save edits for {}", unit))?;
        Ok(TransUnitMapper::to_dto(unit))
    }

    /// Locale and domain pairs that have translations, for the editor menus
    pub fn locale_domains(&self) -> Result<Vec<LocaleDomain>, QueryError> {
        Ok(self
            .query_service
            .domains_by_locale()?
            .into_iter()
            .map(TransUnitMapper::to_locale_domain_dto)
            .collect())
    }

    /// Number of trans units per domain
    pub fn domain_counts(&self) -> Result<Vec<DomainCount>, QueryError> {
        Ok(self
            .query_service
            .count_by_domain()?
            .into_iter()
            .map(TransUnitMapper::to_domain_count_dto)
            .collect())
    }

    /// Registered resource file by id
    pub fn file(&self, id: u64) -> Result<Option<File>> {
        let file = self
            .storage
            .find_file(FileId(id))
            .with_context(|| format!("Failed to look up file {}", id))?;
        Ok(file.map(FileMapper::to_dto))
    }
}
