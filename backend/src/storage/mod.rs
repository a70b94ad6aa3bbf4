//! # Storage Layer
//!
//! Gateways that persist trans units, translations and resource files.
//! [`InMemoryStorage`] keeps committed tables in memory; [`CsvStorage`]
//! writes them to CSV files after every commit.

pub mod csv;
pub mod error;
pub mod memory;
pub mod tables;
pub mod traits;
pub(crate) mod unit_of_work;

pub use self::csv::{CsvConnection, CsvStorage};
pub use error::StorageError;
pub use memory::InMemoryStorage;
pub use tables::{Tables, UnitRecord};
pub use traits::{EntityKind, FileStorage, RemovedEntity, StagedEntity, TranslationStorage};
