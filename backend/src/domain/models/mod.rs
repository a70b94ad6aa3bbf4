pub mod file;
pub mod trans_unit;
pub mod translation;

pub use file::{File, FileId, FileNaming};
pub use trans_unit::{TransUnit, UnitId};
pub use translation::{Translation, TranslationId};
