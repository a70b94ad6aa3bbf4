pub mod trans_unit_mapper;
pub mod unit_list_mapper;

pub use trans_unit_mapper::{FileMapper, TransUnitMapper};
pub use unit_list_mapper::UnitListMapper;
