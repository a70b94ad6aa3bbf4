use super::traits::EntityKind;

/// Failures raised by a storage gateway while staging or committing
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{kind} has no identity; stage it before referencing it")]
    Detached { kind: EntityKind },
    #[error("{kind} {id} does not exist")]
    UnknownEntity { kind: EntityKind, id: u64 },
    #[error("translation {translation} references missing trans unit {unit}")]
    MissingParent { translation: u64, unit: u64 },
    #[error("trans unit {unit} already has a translation for locale '{locale}'")]
    DuplicateLocale { unit: u64, locale: String },
    #[error("storage state lock was poisoned")]
    LockPoisoned,
    #[error("backend rejected the operation: {0}")]
    Rejected(String),
}
