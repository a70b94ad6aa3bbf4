//! CSV-backed storage.
//!
//! Three table files live in the data directory: `trans_units.csv`,
//! `translations.csv` and `files.csv`.

pub mod connection;
pub mod csv_storage;
pub mod records;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use csv_storage::CsvStorage;
