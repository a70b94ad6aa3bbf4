//! Error types raised by the domain services.

use crate::storage::StorageError;

/// Failures while resolving a resource file
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("'{0}' does not follow the domain.locale.extension naming")]
    InvalidFileName(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures raised by the merge engine
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    File(#[from] FileError),
}

/// Failures raised by the query engine
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("unsupported sort column '{0}'")]
    UnsupportedSortColumn(String),
    #[error("unsupported sort order '{0}', expected ASC or DESC")]
    UnsupportedSortOrder(String),
    #[error("invalid pagination rows={rows} page={page}, both must be at least 1")]
    InvalidPagination { rows: u32, page: u32 },
}
