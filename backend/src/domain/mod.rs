//! # Domain Layer
//!
//! Business logic of the translation core: the merge engine
//! ([`TransUnitManager`]), the query engine ([`TransUnitQueryService`]) and
//! resource file resolution. Everything here talks to storage through the
//! gateway traits only.

pub mod commands;
pub mod errors;
pub mod file_resolver;
pub mod filters;
pub mod models;
pub mod trans_unit_manager;
pub mod trans_unit_query_service;

pub use commands::{DomainCount, FileTranslations, LocaleDomain, UnitListQuery};
pub use errors::{FileError, QueryError, TranslationError};
pub use file_resolver::{FileLocator, FileManager, FileResolver};
pub use filters::{SortColumn, SortOrder, UnitFilters};
pub use trans_unit_manager::TransUnitManager;
pub use trans_unit_query_service::TransUnitQueryService;
